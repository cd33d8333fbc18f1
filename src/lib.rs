//! Lanesiege combat simulation library.
//!
//! A two-faction lane battle: units spawn at their base, march on the
//! opposing base in single file, fight whatever enemy comes into reach, and
//! batter the base once they get there. This crate owns the simulation only;
//! rendering and input live in a host that talks to it through
//! [`resources::scenebridge::SceneBridge`].
//!
//! The modules are exposed for the runner binary and integration tests.

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod resources;
pub mod systems;

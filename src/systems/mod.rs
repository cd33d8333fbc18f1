//! Simulation systems.
//!
//! Submodules overview
//! - [`engagement`] – pair opposing units, trade blows, remove the dead
//! - [`movement`] – march on the opposing base, queue, attack the base
//! - [`scenebridge`] – publish stats and forward scene commands
//! - [`spawn`] – unit creation, purchases and the enemy spawn timer
//! - [`time`] – update simulation time and delta

pub mod engagement;
pub mod movement;
pub mod scenebridge;
pub mod spawn;
pub mod time;

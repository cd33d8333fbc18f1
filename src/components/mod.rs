//! ECS components for entities.
//!
//! Submodules overview:
//! - [`base`] – marker for a faction's base
//! - [`boxcollider`] – axis-aligned fighting envelope for engagement checks
//! - [`faction`] – which side an entity fights for
//! - [`mapposition`] – world-space position
//! - [`unit`] – archetype stats and mutable combat state of a unit

pub mod base;
pub mod boxcollider;
pub mod faction;
pub mod mapposition;
pub mod unit;

//! Event and message types.
//!
//! Submodules:
//! - [`battle`] – base destruction and the outcome observer
//! - [`scene`] – commands for the scene/UI collaborator
pub mod battle;
pub mod scene;

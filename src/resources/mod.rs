//! ECS resources made available to systems.
//!
//! Overview
//! - `battlestate` – victory/defeat once a base falls
//! - `catalog` – unit archetypes keyed by type name
//! - `economy` – player money, base hit points and UI notifications
//! - `rosters` – ordered live units per faction
//! - `scenebridge` – channel to the scene/UI collaborator
//! - `simconfig` – tunables loaded from INI
//! - `simrng` – seeded random source
//! - `spawner` – enemy spawn timer
//! - `worldtime` – simulation time and delta
pub mod battlestate;
pub mod catalog;
pub mod economy;
pub mod rosters;
pub mod scenebridge;
pub mod simconfig;
pub mod simrng;
pub mod spawner;
pub mod worldtime;

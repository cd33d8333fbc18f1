//! Error taxonomy for the simulation core.
//!
//! None of these errors are fatal to the simulation loop. Systems log them
//! and move on to the next unit or operation; only the direct caller of a
//! spawn/purchase/config call ever sees them as a `Result`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// The requested archetype key is not in the [`UnitCatalog`](crate::resources::catalog::UnitCatalog).
    #[error("unknown unit type: {0}")]
    UnknownUnitType(String),

    /// A purchase was rejected; the ledger was left untouched.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },

    /// The scene collaborator cannot perform the requested operation.
    #[error("scene collaborator is missing capability: {0}")]
    MissingCapability(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("catalog error: {0}")]
    Catalog(String),
}

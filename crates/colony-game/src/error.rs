use colony_core::inventory::InventoryError;
use colony_core::world::WorldError;

/// Errors that abort setting up or advancing a run.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("turn {turn} is the last turn a run can reach")]
    TurnLimit { turn: u32 },
}

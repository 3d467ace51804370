//! Colony Data -- load game configuration and content from data files.
//!
//! A data directory holds up to three files, each in RON, TOML or JSON
//! (detected by extension):
//!
//! - `config` (required) -- world size, starting colony, resource names.
//! - `technologies` (optional) -- the tech tree; defaults to the standard tree.
//! - `quests` (optional) -- the quest line; defaults to the standard quests.
//!
//! Every cross-reference in the files is by name and is resolved to an id
//! while loading; an unknown name is an error, never a silent default.

pub mod game_data;
pub mod loader;
pub mod schema;

pub use game_data::{GameData, load_game_data};
pub use loader::DataLoadError;

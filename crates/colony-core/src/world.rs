//! The world: a rectangular grid of tiles plus the arena of conversions the
//! tiles expose.
//!
//! # Architecture
//!
//! Conversions are stored once in a [`SlotMap`] keyed by [`ConversionId`].
//! Each [`Tile`] holds the ids of the conversions it currently exposes, in
//! the order they were added. Tiles are stored row-major, which is also the
//! traversal order used when collecting conversions for a turn.
//!
//! Construction on a tile (or anything else that changes what it produces)
//! adds and removes conversions between turns; nothing outside the world
//! should hold on to a list of ids across turns.

use crate::conversion::Conversion;
use crate::id::ConversionId;
use slotmap::SlotMap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when mutating the world.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("tile ({x}, {y}) is outside the {width}x{height} world")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("conversion {0:?} does not exist")]
    UnknownConversion(ConversionId),
}

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A single grid cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub x: u32,
    pub y: u32,

    /// Tile type, e.g. `"wasteland"`, `"lander"`, `"habitat"`.
    pub kind: String,

    conversions: Vec<ConversionId>,
}

impl Tile {
    /// Conversions exposed by this tile, in the order they were added.
    pub fn conversions(&self) -> &[ConversionId] {
        &self.conversions
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Tile grid and conversion arena for one run.
#[derive(Debug, Clone)]
pub struct World {
    width: u32,
    height: u32,

    /// Row-major: index = y * width + x.
    tiles: Vec<Tile>,

    conversions: SlotMap<ConversionId, Conversion>,

    /// Priority handed to the next added conversion, so that the initial
    /// ordering is creation order.
    next_priority: i32,
}

impl World {
    /// Create a world where every tile has the same kind and no conversions.
    pub fn new(width: u32, height: u32, kind: &str) -> Self {
        let mut tiles = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                tiles.push(Tile {
                    x,
                    y,
                    kind: kind.to_string(),
                    conversions: Vec::new(),
                });
            }
        }
        Self {
            width,
            height,
            tiles,
            conversions: SlotMap::with_key(),
            next_priority: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    // -- Tile queries --

    /// All tiles in row-major order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile_at(&self, x: u32, y: u32) -> Option<&Tile> {
        self.index(x, y).ok().map(|i| &self.tiles[i])
    }

    /// Tiles inside the rectangle with top-left corner `(x, y)`, clipped to
    /// the world bounds. Yields row-major order.
    pub fn tiles_in_rectangle(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> impl Iterator<Item = &Tile> {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        (y.min(y_end)..y_end).flat_map(move |row| {
            (x.min(x_end)..x_end).map(move |col| &self.tiles[(row * self.width + col) as usize])
        })
    }

    /// Number of tiles of the given kind.
    pub fn tile_count(&self, kind: &str) -> usize {
        self.tiles.iter().filter(|t| t.kind == kind).count()
    }

    /// Change a tile's kind. Its conversions are left untouched.
    pub fn set_tile_kind(&mut self, x: u32, y: u32, kind: &str) -> Result<(), WorldError> {
        let i = self.index(x, y)?;
        self.tiles[i].kind = kind.to_string();
        Ok(())
    }

    // -- Conversion arena --

    /// Attach a conversion to the tile at `(x, y)`. The conversion's priority
    /// is overwritten with the next free priority number.
    pub fn add_conversion(
        &mut self,
        x: u32,
        y: u32,
        mut conversion: Conversion,
    ) -> Result<ConversionId, WorldError> {
        let i = self.index(x, y)?;
        conversion.priority = self.next_priority;
        self.next_priority += 1;
        let id = self.conversions.insert(conversion);
        self.tiles[i].conversions.push(id);
        Ok(id)
    }

    /// Detach and return a conversion.
    pub fn remove_conversion(&mut self, id: ConversionId) -> Result<Conversion, WorldError> {
        let conversion = self
            .conversions
            .remove(id)
            .ok_or(WorldError::UnknownConversion(id))?;
        for tile in &mut self.tiles {
            tile.conversions.retain(|c| *c != id);
        }
        Ok(conversion)
    }

    /// Remove every conversion from the tile at `(x, y)`, e.g. before the
    /// tile is rebuilt as something else.
    pub fn clear_tile_conversions(&mut self, x: u32, y: u32) -> Result<usize, WorldError> {
        let i = self.index(x, y)?;
        let ids = std::mem::take(&mut self.tiles[i].conversions);
        for id in &ids {
            self.conversions.remove(*id);
        }
        Ok(ids.len())
    }

    pub fn conversion(&self, id: ConversionId) -> Option<&Conversion> {
        self.conversions.get(id)
    }

    pub fn conversion_mut(&mut self, id: ConversionId) -> Option<&mut Conversion> {
        self.conversions.get_mut(id)
    }

    /// Overwrite a conversion's priority.
    pub fn set_priority(&mut self, id: ConversionId, priority: i32) -> Result<(), WorldError> {
        let conversion = self
            .conversions
            .get_mut(id)
            .ok_or(WorldError::UnknownConversion(id))?;
        conversion.priority = priority;
        Ok(())
    }

    pub fn conversion_count(&self) -> usize {
        self.conversions.len()
    }

    /// Resolve a list of ids to conversion references, preserving order.
    /// Ids that no longer exist are skipped.
    pub fn resolve(&self, ids: &[ConversionId]) -> Vec<&Conversion> {
        ids.iter().filter_map(|id| self.conversions.get(*id)).collect()
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, WorldError> {
        if x >= self.width || y >= self.height {
            return Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y * self.width + x) as usize)
    }
}

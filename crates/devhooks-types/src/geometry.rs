//! World geometry: integer block coordinates, continuous positions, and
//! block faces.
//!
//! Block coordinates address a whole block. Positions used for sound and
//! particle feedback are continuous; a block's feedback position is its
//! center, i.e. the block coordinate offset by half a block on every axis.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Offset from a block's minimum corner to its center, on each axis.
pub const BLOCK_CENTER_OFFSET: f64 = 0.5;

/// Integer coordinates of a block in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BlockPos {
    /// East-west coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
    /// North-south coordinate.
    pub z: i32,
}

impl BlockPos {
    /// Create a block position from its coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The continuous position of this block's center.
    pub fn center(self) -> Vec3 {
        Vec3::new(
            f64::from(self.x) + BLOCK_CENTER_OFFSET,
            f64::from(self.y) + BLOCK_CENTER_OFFSET,
            f64::from(self.z) + BLOCK_CENTER_OFFSET,
        )
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A continuous position in a world.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Vec3 {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
}

impl Vec3 {
    /// Create a position from its coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One of the six faces of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Negative Y.
    Down,
    /// Positive Y.
    Up,
    /// Negative Z.
    North,
    /// Positive Z.
    South,
    /// Negative X.
    West,
    /// Positive X.
    East,
}

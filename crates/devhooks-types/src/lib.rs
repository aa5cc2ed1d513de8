//! Shared type definitions for device hook events.
//!
//! Everything that crosses a crate boundary or the server/client boundary
//! lives here: identifiers, coordinates, opaque data blobs, and the access
//! notice payload. Serializable types also derive `ts-rs` bindings so a
//! browser-side viewer can consume the same shapes.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for worlds, nodes, agents, containers
//! - [`geometry`] -- Block coordinates, continuous positions, block faces
//! - [`blob`] -- Opaque key-value documents carried alongside events
//! - [`texture`] -- Texture sprite references
//! - [`notice`] -- Server-to-client file system access payload

pub mod blob;
pub mod geometry;
pub mod ids;
pub mod notice;
pub mod texture;

// Re-export all public types at crate root for convenience.
pub use blob::DataBlob;
pub use geometry::{BLOCK_CENTER_OFFSET, BlockPos, Direction, Vec3};
pub use ids::{AgentId, ContainerId, NodeId, WorldId};
pub use notice::AccessNotice;
pub use texture::TextureId;

//! Server-to-client synchronization payloads.
//!
//! The authoritative side decides that a file system access happened and
//! whether its feedback should be shown. The presentation side only needs
//! enough to replay that feedback: which sound, where, and the resource's
//! data blob. [`AccessNotice`] is that payload. Shipping it across the
//! network is the transport's concern; this type only fixes its shape.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::blob::DataBlob;
use crate::geometry::{BlockPos, Vec3};
use crate::ids::WorldId;

/// Everything the presentation side needs to replay one file system access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AccessNotice {
    /// Sound effect name.
    pub sound: String,
    /// World the access happened in.
    pub world: WorldId,
    /// Resolved feedback position.
    pub position: Vec3,
    /// Block position of the hosting container, when the file system lives in
    /// a fixed block. `None` for entity- or item-hosted file systems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<BlockPos>,
    /// Resource-specific data.
    #[serde(default)]
    pub data: DataBlob,
}

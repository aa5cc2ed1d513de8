//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Every collaborator an event refers to by identity (worlds, network nodes,
//! agents, containers) gets a strongly-typed ID so that a node address can
//! never be passed where a container is expected. New IDs use UUID v7
//! (time-ordered), which keeps log lines for a session roughly sortable.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Identifies a world (dimension) that devices and agents live in.
    WorldId
}

define_id! {
    /// Network address of a component node, e.g. the file system that signalled activity.
    NodeId
}

define_id! {
    /// Identifies an autonomous agent such as a robot.
    AgentId
}

define_id! {
    /// Identifies a fixed in-world container: a disk drive, a computer case, a rack.
    ContainerId
}

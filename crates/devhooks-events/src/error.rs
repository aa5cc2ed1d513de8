//! Error types for the `devhooks-events` crate.
//!
//! Only construction can fail. A constructor that returns an error has not
//! produced an event, so there is never a half-initialized one to dispatch.

use devhooks_types::ContainerId;

/// Construction precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// A container-hosted event was built for a container that is not
    /// placed in any world.
    #[error("container {container} is not attached to a world")]
    Detached {
        /// The detached container.
        container: ContainerId,
    },

    /// A render event was built for a slot the rack does not have.
    #[error("slot {slot} is out of range for rack {rack} with {slot_count} slots")]
    SlotOutOfRange {
        /// The rack.
        rack: ContainerId,
        /// The requested slot.
        slot: u8,
        /// Number of slots the rack has.
        slot_count: u8,
    },
}

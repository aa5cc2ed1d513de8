//! Seams to the host simulation.
//!
//! Events borrow their collaborators instead of owning them. The traits here
//! describe the little an event, or a handler reading it, needs to know
//! about a container, a rack, or an agent. The host's own block-entity and
//! robot types implement them.

use devhooks_types::{AgentId, BlockPos, ContainerId, DataBlob, Direction, WorldId};

/// A fixed in-world block that hosts a resource, e.g. a disk drive.
pub trait BlockHost: core::fmt::Debug {
    /// Identity of the container.
    fn container_id(&self) -> ContainerId;

    /// The world the container is placed in, or `None` if it is not
    /// currently placed in any world (still being loaded, or already removed).
    fn world(&self) -> Option<WorldId>;

    /// Block coordinates of the container.
    fn block_pos(&self) -> BlockPos;
}

/// A container with a fixed number of slots for mountable modules.
pub trait Rack: BlockHost {
    /// Number of mount slots, occupied or not.
    fn slot_count(&self) -> u8;

    /// The side of the block the mountables face.
    fn facing(&self) -> Direction;

    /// Whether a module is mounted in `slot`.
    fn is_occupied(&self, slot: u8) -> bool;

    /// Data the module in `slot` makes available for rendering, if any.
    fn mountable_data(&self, slot: u8) -> Option<&DataBlob>;
}

/// An autonomous entity that performs world-mutating actions.
pub trait Agent: core::fmt::Debug {
    /// Identity of the agent.
    fn agent_id(&self) -> AgentId;

    /// Display name.
    fn name(&self) -> &str;

    /// The world the agent is in.
    fn world(&self) -> WorldId;

    /// The block the agent occupies.
    fn position(&self) -> BlockPos;
}

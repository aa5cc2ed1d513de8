//! In-memory host collaborators for unit tests.

use devhooks_types::{AgentId, BlockPos, ContainerId, DataBlob, Direction, WorldId};

use crate::host::{Agent, BlockHost, Rack};

/// A single-block container, optionally placed in a world.
#[derive(Debug)]
pub struct TestHost {
    pub id: ContainerId,
    pub world: Option<WorldId>,
    pub pos: BlockPos,
}

impl TestHost {
    pub fn placed(world: WorldId, pos: BlockPos) -> Self {
        Self {
            id: ContainerId::new(),
            world: Some(world),
            pos,
        }
    }

    pub fn detached(pos: BlockPos) -> Self {
        Self {
            id: ContainerId::new(),
            world: None,
            pos,
        }
    }
}

impl BlockHost for TestHost {
    fn container_id(&self) -> ContainerId {
        self.id
    }

    fn world(&self) -> Option<WorldId> {
        self.world
    }

    fn block_pos(&self) -> BlockPos {
        self.pos
    }
}

/// A rack with every slot occupied and no module data.
#[derive(Debug)]
pub struct TestRack {
    pub host: TestHost,
    pub slots: u8,
}

impl TestRack {
    pub fn placed(world: WorldId, slots: u8) -> Self {
        Self {
            host: TestHost::placed(world, BlockPos::new(0, 64, 0)),
            slots,
        }
    }
}

impl BlockHost for TestRack {
    fn container_id(&self) -> ContainerId {
        self.host.id
    }

    fn world(&self) -> Option<WorldId> {
        self.host.world
    }

    fn block_pos(&self) -> BlockPos {
        self.host.pos
    }
}

impl Rack for TestRack {
    fn slot_count(&self) -> u8 {
        self.slots
    }

    fn facing(&self) -> Direction {
        Direction::North
    }

    fn is_occupied(&self, slot: u8) -> bool {
        slot < self.slots
    }

    fn mountable_data(&self, _slot: u8) -> Option<&DataBlob> {
        None
    }
}

/// A robot standing at the origin of its own world.
#[derive(Debug)]
pub struct TestAgent {
    pub id: AgentId,
    pub name: String,
    pub world: WorldId,
}

impl TestAgent {
    pub fn new(name: &str) -> Self {
        Self {
            id: AgentId::new(),
            name: name.to_owned(),
            world: WorldId::new(),
        }
    }
}

impl Agent for TestAgent {
    fn agent_id(&self) -> AgentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn world(&self) -> WorldId {
        self.world
    }

    fn position(&self) -> BlockPos {
        BlockPos::new(0, 64, 0)
    }
}

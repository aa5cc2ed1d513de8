//! In-memory host world for the demo: a couple of drives, a server rack,
//! a mining robot, and some terrain for it to dig through.

use std::collections::BTreeMap;

use devhooks_core::BlockWorld;
use devhooks_events::{Agent, BlockHost, Rack};
use devhooks_types::{AgentId, BlockPos, ContainerId, DataBlob, Direction, NodeId, WorldId};

/// A standalone disk drive block.
#[derive(Debug)]
pub struct Drive {
    /// Container identity.
    pub id: ContainerId,
    /// Network address of the file system in the drive.
    pub node: NodeId,
    /// World the drive is placed in, if placed.
    pub world: Option<WorldId>,
    /// Block position.
    pub pos: BlockPos,
}

impl BlockHost for Drive {
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

/// A server rack with mountable modules.
#[derive(Debug)]
pub struct ServerRack {
    /// Container identity.
    pub id: ContainerId,
    /// World the rack is placed in.
    pub world: WorldId,
    /// Block position.
    pub pos: BlockPos,
    /// Side the module fronts face.
    pub facing: Direction,
    /// Module render data per slot; `None` for an empty slot.
    pub mounts: Vec<Option<DataBlob>>,
}

impl BlockHost for ServerRack {
    fn container_id(&self) -> ContainerId {
        self.id
    }

    fn world(&self) -> Option<WorldId> {
        Some(self.world)
    }

    fn block_pos(&self) -> BlockPos {
        self.pos
    }
}

impl Rack for ServerRack {
    fn slot_count(&self) -> u8 {
        u8::try_from(self.mounts.len()).unwrap_or(u8::MAX)
    }

    fn facing(&self) -> Direction {
        self.facing
    }

    fn is_occupied(&self, slot: u8) -> bool {
        self.mounts
            .get(usize::from(slot))
            .is_some_and(Option::is_some)
    }

    fn mountable_data(&self, slot: u8) -> Option<&DataBlob> {
        self.mounts.get(usize::from(slot)).and_then(Option::as_ref)
    }
}

/// A robot.
#[derive(Debug)]
pub struct Robot {
    /// Agent identity.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// World the robot is in.
    pub world: WorldId,
    /// Block the robot stands on.
    pub pos: BlockPos,
}

impl Agent for Robot {
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
        self.pos
    }
}

/// A breakable block.
#[derive(Debug, Clone, Copy)]
pub struct Block {
    /// Block name, for logs.
    pub name: &'static str,
    /// Hardness; scales the break time.
    pub hardness: f64,
    /// Experience dropped when broken.
    pub experience: f64,
}

/// Blocks by position.
#[derive(Debug)]
pub struct Terrain {
    id: WorldId,
    blocks: BTreeMap<BlockPos, Block>,
}

impl Terrain {
    /// Name of the block at `pos`, or `"air"`.
    pub fn block_name(&self, pos: BlockPos) -> &'static str {
        self.blocks.get(&pos).map_or("air", |block| block.name)
    }
}

impl BlockWorld for Terrain {
    fn world_id(&self) -> WorldId {
        self.id
    }

    fn hardness(&self, pos: BlockPos) -> Option<f64> {
        self.blocks.get(&pos).map(|block| block.hardness)
    }

    fn break_block(&mut self, pos: BlockPos) -> Option<f64> {
        self.blocks.remove(&pos).map(|block| block.experience)
    }
}

/// Everything the demo host owns.
#[derive(Debug)]
pub struct DemoWorld {
    /// The one world everything lives in.
    pub id: WorldId,
    /// Standalone drives.
    pub drives: Vec<Drive>,
    /// The server rack.
    pub rack: ServerRack,
    /// The mining robot.
    pub robot: Robot,
    /// Terrain around the robot.
    pub terrain: Terrain,
    /// File system address of the robot's floppy.
    pub robot_floppy: NodeId,
}

impl DemoWorld {
    /// Build the demo scene.
    pub fn build() -> Self {
        let id = WorldId::new();

        let drives = vec![
            Drive {
                id: ContainerId::new(),
                node: NodeId::new(),
                world: Some(id),
                pos: BlockPos::new(10, 64, 20),
            },
            Drive {
                id: ContainerId::new(),
                node: NodeId::new(),
                world: Some(id),
                pos: BlockPos::new(11, 64, 20),
            },
        ];

        let rack = ServerRack {
            id: ContainerId::new(),
            world: id,
            pos: BlockPos::new(12, 64, 20),
            facing: Direction::South,
            mounts: vec![
                Some(DataBlob::new().with("kind", "server").with("state", "running")),
                None,
                Some(DataBlob::new().with("kind", "disk_drive").with("state", "error")),
                Some(DataBlob::new().with("kind", "terminal").with("state", "hidden")),
            ],
        };

        let robot = Robot {
            id: AgentId::new(),
            name: "digger".to_owned(),
            world: id,
            pos: BlockPos::new(0, 64, 0),
        };

        let terrain = Terrain {
            id,
            blocks: BTreeMap::from([
                (
                    BlockPos::new(1, 64, 0),
                    Block {
                        name: "dirt",
                        hardness: 0.5,
                        experience: 0.0,
                    },
                ),
                (
                    BlockPos::new(2, 64, 0),
                    Block {
                        name: "stone",
                        hardness: 1.5,
                        experience: 0.0,
                    },
                ),
                (
                    BlockPos::new(3, 64, 0),
                    Block {
                        name: "coal_ore",
                        hardness: 3.0,
                        experience: 1.0,
                    },
                ),
                (
                    BlockPos::new(4, 64, 0),
                    Block {
                        name: "bedrock",
                        hardness: 50.0,
                        experience: 0.0,
                    },
                ),
            ]),
        };

        Self {
            id,
            drives,
            rack,
            robot,
            terrain,
            robot_floppy: NodeId::new(),
        }
    }

    /// Resolve a block in this world to the container placed there, the way
    /// a presentation side would look up a received notice's host.
    pub fn host_at(&self, world: WorldId, pos: BlockPos) -> Option<&dyn BlockHost> {
        if world != self.id {
            return None;
        }
        if self.rack.pos == pos {
            return Some(&self.rack);
        }
        self.drives
            .iter()
            .find(|drive| drive.pos == pos)
            .map(|drive| drive as &dyn BlockHost)
    }
}

//! Robot block-break execution with pre/post hooks.
//!
//! [`BreakExecutor::break_block`] is the owning side of the robot break
//! events. For every break it:
//!
//! 1. Looks up the target block. Air (nothing to break) posts no event.
//! 2. Posts [`BreakBlockPre`] with an estimate of `hardness * harvest_ratio`.
//! 3. Stops if a handler canceled it. The block stays and no post event fires.
//! 4. Breaks the block in the world.
//! 5. Posts [`BreakBlockPost`] with the experience the block yielded.
//!
//! The returned [`BreakOutcome`] carries the pause the handlers settled on.
//! [`Pacer`] turns that pause into per-agent "ready at" bookkeeping.

use std::collections::BTreeMap;
use std::time::Duration;

use devhooks_events::{Agent, BreakBlockPost, BreakBlockPre, Cancelable, Dispatch, post};
use devhooks_types::{AgentId, BlockPos, WorldId};
use tracing::{debug, trace};

use crate::config::RobotConfig;

/// The world a robot breaks blocks in.
pub trait BlockWorld {
    /// Identity of this world.
    fn world_id(&self) -> WorldId;

    /// Hardness of the block at `pos`, or `None` if there is nothing there
    /// to break.
    fn hardness(&self, pos: BlockPos) -> Option<f64>;

    /// Remove the block at `pos` and return the experience it yields.
    ///
    /// Returns `None` if there was no block to remove after all.
    fn break_block(&mut self, pos: BlockPos) -> Option<f64>;
}

/// What happened to one break attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakOutcome {
    /// A hook canceled the break. The block is untouched.
    Canceled,
    /// There was no block at the target.
    NothingToBreak,
    /// The block was broken.
    Broken {
        /// Experience the block yielded.
        experience: f64,
        /// How long the robot is suspended for the break.
        pause: Duration,
    },
}

impl BreakOutcome {
    /// Pause the robot owes for this outcome. Zero unless a block broke.
    pub const fn pause(&self) -> Duration {
        match self {
            Self::Broken { pause, .. } => *pause,
            Self::Canceled | Self::NothingToBreak => Duration::ZERO,
        }
    }
}

/// Runs robot block breaks through the break hooks.
#[derive(Debug, Clone)]
pub struct BreakExecutor {
    harvest_ratio: f64,
}

impl BreakExecutor {
    /// Create an executor with the given seconds-per-hardness ratio.
    pub const fn new(harvest_ratio: f64) -> Self {
        Self { harvest_ratio }
    }

    /// Create an executor from the robot section of the configuration.
    pub const fn from_config(config: &RobotConfig) -> Self {
        Self::new(config.harvest_ratio)
    }

    /// Default break time estimate for a block of the given hardness.
    pub const fn estimate(&self, hardness: f64) -> f64 {
        hardness * self.harvest_ratio
    }

    /// Have `agent` break the block at `pos` in `world`.
    pub fn break_block<B, W>(
        &self,
        bus: &mut B,
        world: &mut W,
        agent: &dyn Agent,
        pos: BlockPos,
    ) -> BreakOutcome
    where
        B: for<'a> Dispatch<BreakBlockPre<'a>> + for<'a> Dispatch<BreakBlockPost<'a>> + ?Sized,
        W: BlockWorld + ?Sized,
    {
        let Some(hardness) = world.hardness(pos) else {
            trace!(agent = agent.name(), %pos, "Nothing to break");
            return BreakOutcome::NothingToBreak;
        };

        let pre = post(
            bus,
            BreakBlockPre::new(agent, world.world_id(), pos, self.estimate(hardness)),
        );
        if pre.is_canceled() {
            debug!(agent = agent.name(), %pos, "Block break canceled by hook");
            return BreakOutcome::Canceled;
        }
        let pause = pre.pause();

        let Some(experience) = world.break_block(pos) else {
            debug!(agent = agent.name(), %pos, "Block vanished before it could be broken");
            return BreakOutcome::NothingToBreak;
        };

        let _ = post(bus, BreakBlockPost::new(agent, experience));
        debug!(
            agent = agent.name(),
            %pos,
            experience,
            pause_secs = pause.as_secs_f64(),
            "Block broken"
        );

        BreakOutcome::Broken { experience, pause }
    }
}

impl Default for BreakExecutor {
    fn default() -> Self {
        Self::from_config(&RobotConfig::default())
    }
}

/// Per-agent "ready at" bookkeeping on a monotonic clock.
///
/// Times are offsets from an arbitrary epoch chosen by the caller, e.g. the
/// start of the simulation.
#[derive(Debug, Clone, Default)]
pub struct Pacer {
    ready_at: BTreeMap<AgentId, Duration>,
}

impl Pacer {
    /// Create a pacer with every agent ready.
    pub const fn new() -> Self {
        Self {
            ready_at: BTreeMap::new(),
        }
    }

    /// Whether `agent` may act at `now`.
    pub fn is_ready(&self, agent: AgentId, now: Duration) -> bool {
        self.ready_at.get(&agent).is_none_or(|ready| *ready <= now)
    }

    /// When `agent` may next act, if it is suspended at all.
    pub fn ready_at(&self, agent: AgentId) -> Option<Duration> {
        self.ready_at.get(&agent).copied()
    }

    /// Suspend `agent` for `pause` starting at `now`, and return when it will
    /// be ready again. Saturates at [`Duration::MAX`].
    pub fn delay(&mut self, agent: AgentId, now: Duration, pause: Duration) -> Duration {
        let ready = now.saturating_add(pause);
        self.ready_at.insert(agent, ready);
        ready
    }

    /// Apply the pause a break outcome owes.
    pub fn record(&mut self, agent: AgentId, now: Duration, outcome: &BreakOutcome) -> Duration {
        self.delay(agent, now, outcome.pause())
    }

    /// Drop the bookkeeping for an agent that left the simulation.
    pub fn forget(&mut self, agent: AgentId) {
        self.ready_at.remove(&agent);
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use devhooks_events::{MIN_BREAK_TIME, Pending};

    use super::*;

    #[derive(Debug)]
    struct Robot {
        id: AgentId,
        world: WorldId,
    }

    impl Agent for Robot {
        fn agent_id(&self) -> AgentId {
            self.id
        }

        fn name(&self) -> &str {
            "miner"
        }

        fn world(&self) -> WorldId {
            self.world
        }

        fn position(&self) -> BlockPos {
            BlockPos::new(0, 64, 0)
        }
    }

    /// Blocks by position: `(hardness, experience)`.
    #[derive(Debug)]
    struct Quarry {
        id: WorldId,
        blocks: BTreeMap<BlockPos, (f64, f64)>,
    }

    impl BlockWorld for Quarry {
        fn world_id(&self) -> WorldId {
            self.id
        }

        fn hardness(&self, pos: BlockPos) -> Option<f64> {
            self.blocks.get(&pos).map(|(hardness, _)| *hardness)
        }

        fn break_block(&mut self, pos: BlockPos) -> Option<f64> {
            self.blocks.remove(&pos).map(|(_, experience)| experience)
        }
    }

    /// A bus whose pre handler optionally cancels or rescales, and which
    /// records what it saw.
    #[derive(Debug, Default)]
    struct Hooks {
        cancel: bool,
        scale: Option<f64>,
        seen: Vec<&'static str>,
        estimates: Vec<f64>,
        experience: Vec<f64>,
    }

    impl Dispatch<BreakBlockPre<'_>> for Hooks {
        fn dispatch(&mut self, event: &mut Pending<BreakBlockPre<'_>>) {
            self.seen.push("pre");
            self.estimates.push(event.break_time());
            if let Some(scale) = self.scale {
                let scaled = event.break_time() * scale;
                event.set_break_time(scaled);
            }
            if self.cancel {
                event.cancel();
            }
        }
    }

    impl Dispatch<BreakBlockPost<'_>> for Hooks {
        fn dispatch(&mut self, event: &mut Pending<BreakBlockPost<'_>>) {
            self.seen.push("post");
            self.experience.push(event.experience());
        }
    }

    const ORE: BlockPos = BlockPos::new(1, 60, 1);

    fn setup() -> (Robot, Quarry) {
        let world = WorldId::new();
        let robot = Robot {
            id: AgentId::new(),
            world,
        };
        let quarry = Quarry {
            id: world,
            blocks: BTreeMap::from([(ORE, (3.0, 0.7))]),
        };
        (robot, quarry)
    }

    #[test]
    fn untouched_break_runs_pre_then_post() {
        let (robot, mut quarry) = setup();
        let mut hooks = Hooks::default();
        let executor = BreakExecutor::new(0.5);

        let outcome = executor.break_block(&mut hooks, &mut quarry, &robot, ORE);

        assert_eq!(
            outcome,
            BreakOutcome::Broken {
                experience: 0.7,
                pause: Duration::from_millis(1500),
            }
        );
        assert_eq!(hooks.seen, ["pre", "post"]);
        assert_eq!(hooks.estimates[0].to_bits(), 1.5_f64.to_bits());
        assert_eq!(hooks.experience[0].to_bits(), 0.7_f64.to_bits());
        assert!(quarry.blocks.is_empty());
    }

    #[test]
    fn canceled_break_leaves_block_and_skips_post() {
        let (robot, mut quarry) = setup();
        let mut hooks = Hooks {
            cancel: true,
            ..Hooks::default()
        };

        let outcome = BreakExecutor::default().break_block(&mut hooks, &mut quarry, &robot, ORE);

        assert_eq!(outcome, BreakOutcome::Canceled);
        assert_eq!(outcome.pause(), Duration::ZERO);
        assert_eq!(hooks.seen, ["pre"]);
        assert!(quarry.blocks.contains_key(&ORE));
    }

    #[test]
    fn handler_rescaled_pause_is_used_and_floored() {
        let (robot, mut quarry) = setup();
        let mut hooks = Hooks {
            scale: Some(0.0),
            ..Hooks::default()
        };

        let outcome = BreakExecutor::default().break_block(&mut hooks, &mut quarry, &robot, ORE);
        let expected = Duration::from_secs_f64(MIN_BREAK_TIME);
        assert_eq!(outcome.pause(), expected);
    }

    #[test]
    fn air_posts_nothing() {
        let (robot, mut quarry) = setup();
        let mut hooks = Hooks::default();

        let air = BlockPos::new(9, 9, 9);
        let outcome = BreakExecutor::default().break_block(&mut hooks, &mut quarry, &robot, air);

        assert_eq!(outcome, BreakOutcome::NothingToBreak);
        assert!(hooks.seen.is_empty());
    }

    #[test]
    fn zero_hardness_is_floored_in_the_estimate() {
        let (robot, mut quarry) = setup();
        let dirt = BlockPos::new(2, 60, 2);
        quarry.blocks.insert(dirt, (0.0, 0.0));
        let mut hooks = Hooks::default();

        let outcome = BreakExecutor::default().break_block(&mut hooks, &mut quarry, &robot, dirt);

        assert_eq!(hooks.estimates[0].to_bits(), MIN_BREAK_TIME.to_bits());
        assert!(matches!(outcome, BreakOutcome::Broken { .. }));
    }

    #[test]
    fn pacer_tracks_ready_time_per_agent() {
        let busy = AgentId::new();
        let idle = AgentId::new();
        let mut pacer = Pacer::new();
        let start = Duration::from_secs(10);

        assert!(pacer.is_ready(busy, start));
        let outcome = BreakOutcome::Broken {
            experience: 0.0,
            pause: Duration::from_millis(1500),
        };
        let ready = pacer.record(busy, start, &outcome);

        assert_eq!(ready, Duration::from_millis(11_500));
        assert_eq!(pacer.ready_at(busy), Some(ready));
        assert!(!pacer.is_ready(busy, Duration::from_secs(11)));
        assert!(pacer.is_ready(busy, ready));
        assert!(pacer.is_ready(idle, start));

        pacer.forget(busy);
        assert_eq!(pacer.ready_at(busy), None);
    }

    #[test]
    fn pacer_saturates_on_unbounded_pause() {
        let agent = AgentId::new();
        let mut pacer = Pacer::new();
        let ready = pacer.delay(agent, Duration::from_secs(5), Duration::MAX);
        assert_eq!(ready, Duration::MAX);
        assert!(!pacer.is_ready(agent, Duration::from_secs(1_000_000)));
    }
}

//! Robot action interception: breaking a block.
//!
//! [`BreakBlockPre`] is posted right before a robot breaks a block.
//! Canceling it prevents the break; handlers may also change how long the
//! robot pauses for it. [`BreakBlockPost`] is posted only after a block was
//! actually broken and is purely informational.
//!
//! The block itself always breaks instantly in the world model. The break
//! time is how long the robot's execution is suspended afterwards.

use core::time::Duration;

use devhooks_types::{BlockPos, WorldId};

use crate::event::{Cancelable, Cancellation, Event};
use crate::host::Agent;

/// Shortest pause a block break can cost, in seconds.
pub const MIN_BREAK_TIME: f64 = 0.05;

/// Fields shared by every robot action event.
#[derive(Debug, Clone, Copy)]
pub struct RobotAction<'a> {
    agent: &'a dyn Agent,
}

impl<'a> RobotAction<'a> {
    /// Wrap the acting agent.
    pub const fn new(agent: &'a dyn Agent) -> Self {
        Self { agent }
    }

    /// The robot performing the action.
    pub const fn agent(&self) -> &'a dyn Agent {
        self.agent
    }
}

/// Posted when a robot is about to break a block.
#[derive(Debug)]
pub struct BreakBlockPre<'a> {
    action: RobotAction<'a>,
    world: WorldId,
    pos: BlockPos,
    break_time: f64,
    canceled: Cancellation,
}

impl<'a> BreakBlockPre<'a> {
    /// Build the event with the caller's best estimate of the break time.
    ///
    /// The estimate is floored at [`MIN_BREAK_TIME`] like any later update.
    pub const fn new(
        agent: &'a dyn Agent,
        world: WorldId,
        pos: BlockPos,
        break_time: f64,
    ) -> Self {
        Self {
            action: RobotAction::new(agent),
            world,
            pos,
            break_time: clamp_break_time(break_time),
            canceled: Cancellation::new(),
        }
    }

    /// The robot about to break the block.
    pub const fn agent(&self) -> &'a dyn Agent {
        self.action.agent()
    }

    /// World in which the block will be broken.
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// Coordinates of the block that will be broken.
    pub const fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Seconds the robot pauses for this break.
    pub const fn break_time(&self) -> f64 {
        self.break_time
    }

    /// Set how long the robot pauses for this break.
    ///
    /// Values below [`MIN_BREAK_TIME`], including negative values, NaN and
    /// negative infinity, are raised to it.
    pub const fn set_break_time(&mut self, break_time: f64) {
        self.break_time = clamp_break_time(break_time);
    }

    /// The break time as a pause duration. Saturates for infinite values.
    pub fn pause(&self) -> Duration {
        Duration::try_from_secs_f64(self.break_time).unwrap_or(Duration::MAX)
    }
}

impl Event for BreakBlockPre<'_> {
    const NAME: &'static str = "robot.break_block.pre";
    const CANCELABLE: bool = true;
}

impl Cancelable for BreakBlockPre<'_> {
    fn cancellation(&self) -> Cancellation {
        self.canceled
    }

    fn cancellation_mut(&mut self) -> &mut Cancellation {
        &mut self.canceled
    }
}

/// Posted after a robot broke a block.
#[derive(Debug)]
pub struct BreakBlockPost<'a> {
    action: RobotAction<'a>,
    experience: f64,
}

impl<'a> BreakBlockPost<'a> {
    /// Build the event for a completed break.
    pub const fn new(agent: &'a dyn Agent, experience: f64) -> Self {
        Self {
            action: RobotAction::new(agent),
            experience,
        }
    }

    /// The robot that broke the block.
    pub const fn agent(&self) -> &'a dyn Agent {
        self.action.agent()
    }

    /// Experience the broken block yielded (e.g. certain ores).
    pub const fn experience(&self) -> f64 {
        self.experience
    }
}

impl Event for BreakBlockPost<'_> {
    const NAME: &'static str = "robot.break_block.post";
}

/// `f64::max` returns the non-NaN operand, so NaN lands on the floor too.
const fn clamp_break_time(break_time: f64) -> f64 {
    break_time.max(MIN_BREAK_TIME)
}

#[cfg(test)]
mod tests {
    use devhooks_types::AgentId;

    use super::*;
    use crate::event::{NullBus, post};
    use crate::testing::TestAgent;

    fn pre(agent: &TestAgent, break_time: f64) -> BreakBlockPre<'_> {
        BreakBlockPre::new(agent, agent.world, BlockPos::new(1, 2, 3), break_time)
    }

    #[test]
    fn set_break_time_floors_at_minimum() {
        let agent = TestAgent::new("digger");
        let mut event = pre(&agent, 1.0);

        for (input, expected) in [
            (2.0, 2.0),
            (0.05, MIN_BREAK_TIME),
            (0.051, 0.051),
            (0.049, MIN_BREAK_TIME),
            (0.0, MIN_BREAK_TIME),
            (-0.0, MIN_BREAK_TIME),
            (-3.5, MIN_BREAK_TIME),
            (f64::MIN, MIN_BREAK_TIME),
            (f64::NEG_INFINITY, MIN_BREAK_TIME),
            (f64::NAN, MIN_BREAK_TIME),
            (1e9, 1e9),
        ] {
            event.set_break_time(input);
            assert_eq!(
                event.break_time().to_bits(),
                expected.to_bits(),
                "input {input}"
            );
        }
    }

    #[test]
    fn construction_estimate_is_floored() {
        let agent = TestAgent::new("digger");
        assert_eq!(pre(&agent, 0.0).break_time().to_bits(), MIN_BREAK_TIME.to_bits());
        assert_eq!(pre(&agent, 0.75).break_time().to_bits(), 0.75_f64.to_bits());
    }

    #[test]
    fn untouched_event_keeps_caller_default() {
        let agent = TestAgent::new("digger");
        let dispatched = post(&mut NullBus::new(), pre(&agent, 1.25));
        assert!(!dispatched.is_canceled());
        assert_eq!(dispatched.break_time().to_bits(), 1.25_f64.to_bits());
        assert_eq!(dispatched.pause(), Duration::from_millis(1250));
    }

    #[test]
    fn cancel_leaves_break_time_and_target() {
        let agent = TestAgent::new("digger");
        let mut bus = |event: &mut BreakBlockPre<'_>| event.cancel();
        let dispatched = post(&mut bus, pre(&agent, 2.0));

        assert!(dispatched.is_canceled());
        assert_eq!(dispatched.break_time().to_bits(), 2.0_f64.to_bits());
        assert_eq!(dispatched.pos(), BlockPos::new(1, 2, 3));
        assert_eq!(dispatched.world(), agent.world);
        assert_eq!(dispatched.agent().agent_id(), agent.id);
    }

    #[test]
    fn handler_adjusts_break_time() {
        let agent = TestAgent::new("digger");
        let mut bus = |event: &mut BreakBlockPre<'_>| {
            let doubled = event.break_time() * 2.0;
            event.set_break_time(doubled);
        };
        let dispatched = post(&mut bus, pre(&agent, 0.4));
        assert_eq!(dispatched.break_time().to_bits(), 0.8_f64.to_bits());
    }

    #[test]
    fn infinite_pause_saturates() {
        let agent = TestAgent::new("digger");
        let mut event = pre(&agent, 1.0);
        event.set_break_time(f64::INFINITY);
        assert_eq!(event.pause(), Duration::MAX);
    }

    #[test]
    fn post_is_read_only_and_not_cancelable() {
        assert!(BreakBlockPre::CANCELABLE);
        assert!(!BreakBlockPost::CANCELABLE);

        let agent = TestAgent::new("digger");
        let dispatched = post(&mut NullBus::new(), BreakBlockPost::new(&agent, 3.5));
        assert_eq!(dispatched.experience().to_bits(), 3.5_f64.to_bits());
        assert_eq!(dispatched.agent().name(), "digger");
        assert_ne!(dispatched.agent().agent_id(), AgentId::new());
    }
}

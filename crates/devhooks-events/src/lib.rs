//! Typed, cancelable event contracts for device hooks.
//!
//! Observers hook into in-world device activity through three event
//! families, each posted by the subsystem that owns the activity:
//!
//! - [`filesystem`] -- a file system was accessed; drives sound and disk
//!   activity indicators on both the authoritative and presentation side.
//! - [`robot`] -- a robot is about to break, or has broken, a block.
//! - [`rack`] -- a rack-mounted module is being baked into the static model
//!   or drawn for a frame.
//!
//! Events are plain data carriers. The owning subsystem builds one, hands it
//! to the host bus through [`Dispatch`] via [`post`], and reads back whatever
//! handlers changed. Which kinds may be canceled is fixed at compile time by
//! the [`Cancelable`] trait.
//!
//! # Modules
//!
//! - [`event`] -- [`Event`], [`Cancelable`], the [`Dispatch`] seam, [`post`]
//! - [`host`] -- Traits for borrowed host collaborators (containers, racks, agents)
//! - [`error`] -- Construction precondition failures
//!
//! [`Dispatch`]: event::Dispatch
//! [`Cancelable`]: event::Cancelable
//! [`Event`]: event::Event
//! [`post`]: event::post

pub mod error;
pub mod event;
pub mod filesystem;
pub mod host;
pub mod rack;
pub mod robot;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root.
pub use error::EventError;
pub use event::{Cancelable, Cancellation, Dispatch, Dispatched, Event, NullBus, Pending, post};
pub use filesystem::{AccessSite, ClientFsAccess, FileSystemAccess, Positioned, ServerFsAccess};
pub use host::{Agent, BlockHost, Rack};
pub use rack::{
    FrameLight, MountableRender, RackBakeEvent, RackFrameEvent, SLOT_V_HEIGHT, SLOT_V_ORIGIN,
    slot_v_bounds,
};
pub use robot::{BreakBlockPost, BreakBlockPre, MIN_BREAK_TIME, RobotAction};

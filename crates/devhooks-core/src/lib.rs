//! Configuration and the owning-side callers of device hook events.
//!
//! The event contracts themselves live in `devhooks-events`. This crate holds
//! the code that constructs those events, posts them, and acts on what the
//! handlers decided.
//!
//! # Modules
//!
//! - [`activity`] -- [`ActivityRelay`]: file system access notices and
//!   client-side feedback.
//! - [`config`] -- Configuration loading from `devhooks-config.yaml` into
//!   strongly-typed structs.
//! - [`executor`] -- [`BreakExecutor`] and [`Pacer`]: robot block breaks
//!   with pre/post hooks.
//! - [`rack_render`] -- [`RackRenderer`]: bake then per-frame render events
//!   for rack-mounted modules.
//!
//! [`ActivityRelay`]: activity::ActivityRelay
//! [`BreakExecutor`]: executor::BreakExecutor
//! [`Pacer`]: executor::Pacer
//! [`RackRenderer`]: rack_render::RackRenderer

pub mod activity;
pub mod config;
pub mod executor;
pub mod rack_render;

pub use activity::{AccessFeedback, ActivityRelay, IndicatorBlink, SLOT_KEY};
pub use config::{ActivityConfig, ConfigError, HooksConfig, LogFormat, LoggingConfig, RobotConfig};
pub use executor::{BlockWorld, BreakExecutor, BreakOutcome, Pacer};
pub use rack_render::{MountAppearance, RackRenderer, RenderError};

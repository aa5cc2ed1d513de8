//! File system activity relay: the caller side of file system access events.
//!
//! On the authoritative side, [`ActivityRelay::signal`] posts a
//! [`ServerFsAccess`] for each access. Unless a handler cancels it, the relay
//! returns the [`AccessNotice`] the transport should forward to clients.
//!
//! On the presentation side, [`ActivityRelay::replay`] rebuilds a
//! [`ClientFsAccess`] from a received notice and posts it. Unless a handler
//! cancels it (or feedback is switched off), the relay returns the
//! [`AccessFeedback`] to perform: which sound to play where, and which disk
//! indicator to blink.

use devhooks_events::{
    BlockHost, Cancelable, ClientFsAccess, Dispatch, EventError, Positioned, ServerFsAccess, post,
};
use devhooks_types::{AccessNotice, BlockPos, ContainerId, DataBlob, NodeId, Vec3, WorldId};
use tracing::debug;

use crate::config::ActivityConfig;

/// Data blob key a multi-slot container uses to say which slot was accessed.
pub const SLOT_KEY: &str = "slot";

/// Feedback the presentation side should perform for one access.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessFeedback {
    /// Sound effect to play.
    pub sound: String,
    /// Where to play it.
    pub position: Vec3,
    /// Playback volume (0.0-1.0).
    pub volume: f32,
    /// Disk indicator to blink, when the file system lives in a container.
    pub indicator: Option<IndicatorBlink>,
}

/// A disk activity indicator to blink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorBlink {
    /// The container whose indicator blinks.
    pub container: ContainerId,
    /// Slot within the container, for containers with several drives.
    pub slot: Option<u8>,
}

/// Posts file system access events and turns their outcome into notices and
/// feedback.
#[derive(Debug, Clone)]
pub struct ActivityRelay {
    config: ActivityConfig,
}

impl ActivityRelay {
    /// Create a relay with the given feedback settings.
    pub const fn new(config: ActivityConfig) -> Self {
        Self { config }
    }

    /// Authoritative side: report an access by the file system at `node`.
    ///
    /// Returns `None` when a handler canceled the event, in which case no
    /// client should hear about this access.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Detached`] if `source` is a container that is
    /// not placed in a world.
    pub fn signal<B>(
        &self,
        bus: &mut B,
        sound: &str,
        source: Positioned<'_>,
        node: NodeId,
        data: DataBlob,
    ) -> Result<Option<AccessNotice>, EventError>
    where
        B: for<'a> Dispatch<ServerFsAccess<'a>> + ?Sized,
    {
        let event = ServerFsAccess::new(sound, source, node)?.with_data(data);
        let event = post(bus, event);

        if event.is_canceled() {
            debug!(sound, node = %node, "File system access canceled by hook");
            return Ok(None);
        }
        Ok(Some(event.to_notice()))
    }

    /// Presentation side: replay an access received from the server.
    ///
    /// `lookup` resolves the notice's host block to a local container.
    /// Returns `None` when a handler canceled the event or feedback is
    /// disabled.
    pub fn replay<'h, B, F>(
        &self,
        bus: &mut B,
        notice: &AccessNotice,
        lookup: F,
    ) -> Option<AccessFeedback>
    where
        B: for<'a> Dispatch<ClientFsAccess<'a>> + ?Sized,
        F: FnOnce(WorldId, BlockPos) -> Option<&'h dyn BlockHost>,
    {
        let event = post(bus, ClientFsAccess::from_notice(notice, lookup));

        if event.is_canceled() {
            debug!(sound = %notice.sound, "File system access feedback canceled by hook");
            return None;
        }
        if !self.config.feedback_enabled {
            return None;
        }

        let access = event.access();
        let indicator = access.host().map(|host| IndicatorBlink {
            container: host.container_id(),
            slot: access.data().get_u8(SLOT_KEY),
        });

        Some(AccessFeedback {
            sound: access.sound().to_owned(),
            position: access.position(),
            volume: self.config.sound_volume,
            indicator,
        })
    }
}

impl Default for ActivityRelay {
    fn default() -> Self {
        Self::new(ActivityConfig::default())
    }
}

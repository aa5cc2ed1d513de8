//! File system access events.
//!
//! Fired whenever a file system is read from or written to, so observers can
//! play an access sound or blink a disk activity indicator without tracking
//! the file system themselves. The authoritative side fires
//! [`ServerFsAccess`], which knows the file system's network node. The
//! presentation side fires [`ClientFsAccess`], rebuilt from an
//! [`AccessNotice`] and carrying the resource's data blob instead.
//!
//! Both are cancelable. Canceling tells the caller to skip its default
//! feedback for that access, which lets a higher-priority handler replace
//! the sound or the indicator with its own.
//!
//! A file system either lives in a fixed block ([`Positioned::Container`])
//! or rides along with an entity or item ([`Positioned::Freeform`]). The
//! position is resolved once, at construction, and never re-queried.

use devhooks_types::{AccessNotice, BlockPos, DataBlob, NodeId, Vec3, WorldId};
use tracing::debug;

use crate::error::EventError;
use crate::event::{Cancelable, Cancellation, Event};
use crate::host::BlockHost;

/// Where a file system access happened, before resolution.
#[derive(Debug, Clone, Copy)]
pub enum Positioned<'a> {
    /// Hosted by a fixed block. Feedback plays at the block's center.
    Container(&'a dyn BlockHost),
    /// Hosted by an entity or item. Feedback plays exactly at `position`.
    Freeform {
        /// World the host is in.
        world: WorldId,
        /// Position of the host.
        position: Vec3,
    },
}

/// A resolved access location: a world, concrete coordinates, and the
/// hosting container if there is one.
#[derive(Debug, Clone, Copy)]
pub struct AccessSite<'a> {
    world: WorldId,
    position: Vec3,
    host: Option<&'a dyn BlockHost>,
}

impl<'a> AccessSite<'a> {
    /// Resolve a position source into concrete coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Detached`] if a container source is not placed
    /// in a world.
    pub fn resolve(source: Positioned<'a>) -> Result<Self, EventError> {
        match source {
            Positioned::Container(host) => {
                let world = host.world().ok_or_else(|| EventError::Detached {
                    container: host.container_id(),
                })?;
                Ok(Self {
                    world,
                    position: host.block_pos().center(),
                    host: Some(host),
                })
            }
            Positioned::Freeform { world, position } => Ok(Self {
                world,
                position,
                host: None,
            }),
        }
    }

    /// The world the access happened in.
    pub const fn world(&self) -> WorldId {
        self.world
    }

    /// The resolved feedback position.
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// The hosting container, if the file system lives in a fixed block.
    pub const fn host(&self) -> Option<&'a dyn BlockHost> {
        self.host
    }
}

/// Fields shared by both sides of a file system access event.
#[derive(Debug)]
pub struct FileSystemAccess<'a> {
    sound: String,
    site: AccessSite<'a>,
    data: DataBlob,
}

impl<'a> FileSystemAccess<'a> {
    fn new(sound: String, source: Positioned<'a>, data: DataBlob) -> Result<Self, EventError> {
        Ok(Self {
            sound,
            site: AccessSite::resolve(source)?,
            data,
        })
    }

    /// Name of the sound effect to play for the access.
    pub fn sound(&self) -> &str {
        &self.sound
    }

    /// The world the file system lives in.
    pub const fn world(&self) -> WorldId {
        self.site.world
    }

    /// Feedback position.
    pub const fn position(&self) -> Vec3 {
        self.site.position
    }

    /// X coordinate of the feedback position.
    pub const fn x(&self) -> f64 {
        self.site.position.x
    }

    /// Y coordinate of the feedback position.
    pub const fn y(&self) -> f64 {
        self.site.position.y
    }

    /// Z coordinate of the feedback position.
    pub const fn z(&self) -> f64 {
        self.site.position.z
    }

    /// The container hosting the file system.
    ///
    /// `None` when the file system lives in an entity or item.
    pub const fn host(&self) -> Option<&'a dyn BlockHost> {
        self.site.host
    }

    /// Whether the file system lives in a fixed block.
    pub const fn is_hosted(&self) -> bool {
        self.site.host.is_some()
    }

    /// Resource-specific data, e.g. which server in a rack the file system
    /// belongs to.
    pub const fn data(&self) -> &DataBlob {
        &self.data
    }
}

/// File system access, as seen by the authoritative side.
#[derive(Debug)]
pub struct ServerFsAccess<'a> {
    access: FileSystemAccess<'a>,
    node: NodeId,
    canceled: Cancellation,
}

impl<'a> ServerFsAccess<'a> {
    /// Build the event for an access by the file system at `node`.
    ///
    /// The data blob starts empty; see [`with_data`](Self::with_data).
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Detached`] if `source` is a container that is
    /// not placed in a world.
    pub fn new(
        sound: impl Into<String>,
        source: Positioned<'a>,
        node: NodeId,
    ) -> Result<Self, EventError> {
        Ok(Self {
            access: FileSystemAccess::new(sound.into(), source, DataBlob::new())?,
            node,
            canceled: Cancellation::new(),
        })
    }

    /// Attach resource-specific data before the event is posted.
    #[must_use]
    pub fn with_data(mut self, data: DataBlob) -> Self {
        self.access.data = data;
        self
    }

    /// The shared access fields.
    pub const fn access(&self) -> &FileSystemAccess<'a> {
        &self.access
    }

    /// The node of the file system that signalled activity.
    pub const fn node(&self) -> NodeId {
        self.node
    }

    /// The payload the presentation side needs to replay this access.
    pub fn to_notice(&self) -> AccessNotice {
        AccessNotice {
            sound: self.access.sound.clone(),
            world: self.access.world(),
            position: self.access.position(),
            host: self.access.host().map(BlockHost::block_pos),
            data: self.access.data.clone(),
        }
    }
}

impl Event for ServerFsAccess<'_> {
    const NAME: &'static str = "filesystem.access.server";
    const CANCELABLE: bool = true;
}

impl Cancelable for ServerFsAccess<'_> {
    fn cancellation(&self) -> Cancellation {
        self.canceled
    }

    fn cancellation_mut(&mut self) -> &mut Cancellation {
        &mut self.canceled
    }
}

/// File system access, as replayed on the presentation side.
#[derive(Debug)]
pub struct ClientFsAccess<'a> {
    access: FileSystemAccess<'a>,
    canceled: Cancellation,
}

impl<'a> ClientFsAccess<'a> {
    /// Build the event from already-resolved data.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::Detached`] if `source` is a container that is
    /// not placed in a world.
    pub fn new(
        sound: impl Into<String>,
        source: Positioned<'a>,
        data: DataBlob,
    ) -> Result<Self, EventError> {
        Ok(Self {
            access: FileSystemAccess::new(sound.into(), source, data)?,
            canceled: Cancellation::new(),
        })
    }

    /// Rebuild the event from a server notice.
    ///
    /// `lookup` resolves the notice's host block to the local container. If
    /// the notice has no host, the lookup finds nothing, or the container it
    /// finds is not attached to the notice's world, the event is positioned
    /// freely at the notice's position instead.
    pub fn from_notice<F>(notice: &AccessNotice, lookup: F) -> Self
    where
        F: FnOnce(WorldId, BlockPos) -> Option<&'a dyn BlockHost>,
    {
        let host = notice
            .host
            .and_then(|pos| lookup(notice.world, pos))
            .filter(|host| host.world() == Some(notice.world));

        let site = host.map_or(
            AccessSite {
                world: notice.world,
                position: notice.position,
                host: None,
            },
            |host| AccessSite {
                world: notice.world,
                position: host.block_pos().center(),
                host: Some(host),
            },
        );

        if notice.host.is_some() && site.host.is_none() {
            debug!(
                sound = notice.sound,
                world = %notice.world,
                "Access host not resolvable locally, replaying free-floating"
            );
        }

        Self {
            access: FileSystemAccess {
                sound: notice.sound.clone(),
                site,
                data: notice.data.clone(),
            },
            canceled: Cancellation::new(),
        }
    }

    /// The shared access fields.
    pub const fn access(&self) -> &FileSystemAccess<'a> {
        &self.access
    }
}

impl Event for ClientFsAccess<'_> {
    const NAME: &'static str = "filesystem.access.client";
    const CANCELABLE: bool = true;
}

impl Cancelable for ClientFsAccess<'_> {
    fn cancellation(&self) -> Cancellation {
        self.canceled
    }

    fn cancellation_mut(&mut self) -> &mut Cancellation {
        &mut self.canceled
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::event::{NullBus, post};
    use crate::testing::TestHost;

    #[test]
    fn container_source_resolves_to_block_center() {
        let world = WorldId::new();
        let drive = TestHost::placed(world, BlockPos::new(10, 64, 20));
        let event =
            ServerFsAccess::new("disk.seek", Positioned::Container(&drive), NodeId::new()).unwrap();

        let access = event.access();
        assert_eq!(access.position(), Vec3::new(10.5, 64.5, 20.5));
        assert_eq!(access.x().to_bits(), 10.5_f64.to_bits());
        assert_eq!(access.y().to_bits(), 64.5_f64.to_bits());
        assert_eq!(access.z().to_bits(), 20.5_f64.to_bits());
        assert_eq!(access.world(), world);
        assert!(access.is_hosted());
        assert_eq!(
            access.host().map(BlockHost::container_id),
            Some(drive.container_id())
        );
    }

    #[test]
    fn client_container_source_resolves_to_block_center() {
        let world = WorldId::new();
        let drive = TestHost::placed(world, BlockPos::new(-4, 12, 7));
        let data = DataBlob::new().with("slot", 3);
        let event =
            ClientFsAccess::new("floppy.access", Positioned::Container(&drive), data.clone())
                .unwrap();

        let access = event.access();
        assert_eq!(access.sound(), "floppy.access");
        assert_eq!(access.world(), world);
        assert_eq!(access.position(), Vec3::new(-3.5, 12.5, 7.5));
        assert_eq!(access.x().to_bits(), (-3.5_f64).to_bits());
        assert_eq!(access.y().to_bits(), 12.5_f64.to_bits());
        assert_eq!(access.z().to_bits(), 7.5_f64.to_bits());
        assert!(access.is_hosted());
        assert_eq!(
            access.host().map(BlockHost::container_id),
            Some(drive.container_id())
        );
        assert_eq!(access.data(), &data);
        assert!(!event.is_canceled());
    }

    #[test]
    fn detached_container_is_rejected() {
        let drive = TestHost::detached(BlockPos::new(0, 0, 0));
        let err = ServerFsAccess::new("disk.seek", Positioned::Container(&drive), NodeId::new())
            .unwrap_err();
        assert_eq!(
            err,
            EventError::Detached {
                container: drive.container_id()
            }
        );

        let err = ClientFsAccess::new("disk.seek", Positioned::Container(&drive), DataBlob::new())
            .unwrap_err();
        assert!(matches!(err, EventError::Detached { .. }));
    }

    #[test]
    fn server_event_roundtrips_supplied_values() {
        let world = WorldId::new();
        let node = NodeId::new();
        let position = Vec3::new(-12.25, 70.0, 3.75);
        let event = ServerFsAccess::new(
            "disk.seek",
            Positioned::Freeform { world, position },
            node,
        )
        .unwrap();

        assert_eq!(event.access().sound(), "disk.seek");
        assert_eq!(event.access().world(), world);
        assert_eq!(event.access().position(), position);
        assert_eq!(event.node(), node);
        assert!(event.access().host().is_none());
        assert!(event.access().data().is_empty());
    }

    #[test]
    fn cancel_touches_nothing_else() {
        let world = WorldId::new();
        let data = DataBlob::new().with("slot", 1);
        let mut event = ClientFsAccess::new(
            "hdd.access",
            Positioned::Freeform {
                world,
                position: Vec3::new(1.0, 2.0, 3.0),
            },
            data.clone(),
        )
        .unwrap();

        assert!(!event.is_canceled());
        event.cancel();
        assert!(event.is_canceled());
        assert_eq!(event.access().sound(), "hdd.access");
        assert_eq!(event.access().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(event.access().data(), &data);
    }

    #[test]
    fn notice_carries_host_block_and_data() {
        let world = WorldId::new();
        let rack = TestHost::placed(world, BlockPos::new(4, 5, 6));
        let data = DataBlob::new().with("slot", 2);
        let event = ServerFsAccess::new("hdd.access", Positioned::Container(&rack), NodeId::new())
            .unwrap()
            .with_data(data.clone());

        let notice = event.to_notice();
        assert_eq!(notice.sound, "hdd.access");
        assert_eq!(notice.world, world);
        assert_eq!(notice.position, Vec3::new(4.5, 5.5, 6.5));
        assert_eq!(notice.host, Some(BlockPos::new(4, 5, 6)));
        assert_eq!(notice.data, data);
    }

    #[test]
    fn client_rebuild_resolves_local_host() {
        let world = WorldId::new();
        let server_side = TestHost::placed(world, BlockPos::new(4, 5, 6));
        let client_side = TestHost::placed(world, BlockPos::new(4, 5, 6));
        let notice = ServerFsAccess::new(
            "hdd.access",
            Positioned::Container(&server_side),
            NodeId::new(),
        )
        .unwrap()
        .to_notice();

        let event = ClientFsAccess::from_notice(&notice, |w, pos| {
            assert_eq!(w, world);
            assert_eq!(pos, BlockPos::new(4, 5, 6));
            Some(&client_side as &dyn BlockHost)
        });
        let dispatched = post(&mut NullBus::new(), event);
        assert_eq!(
            dispatched.access().host().map(BlockHost::container_id),
            Some(client_side.container_id())
        );
        assert_eq!(dispatched.access().position(), notice.position);
    }

    #[test]
    fn client_rebuild_falls_back_to_freeform() {
        let world = WorldId::new();
        let notice = AccessNotice {
            sound: "hdd.access".to_owned(),
            world,
            position: Vec3::new(4.5, 5.5, 6.5),
            host: Some(BlockPos::new(4, 5, 6)),
            data: DataBlob::new(),
        };

        let unloaded = ClientFsAccess::from_notice(&notice, |_, _| None);
        assert!(!unloaded.access().is_hosted());
        assert_eq!(unloaded.access().position(), notice.position);

        let elsewhere = TestHost::placed(WorldId::new(), BlockPos::new(4, 5, 6));
        let wrong_world =
            ClientFsAccess::from_notice(&notice, |_, _| Some(&elsewhere as &dyn BlockHost));
        assert!(!wrong_world.access().is_hosted());
    }

    #[test]
    fn notice_survives_json_transport() {
        let world = WorldId::new();
        let event = ServerFsAccess::new(
            "floppy.access",
            Positioned::Freeform {
                world,
                position: Vec3::new(0.25, 65.0, -8.5),
            },
            NodeId::new(),
        )
        .unwrap()
        .with_data(DataBlob::new().with("label", "boot"));

        let json = serde_json::to_string(&event.to_notice()).unwrap();
        let notice: AccessNotice = serde_json::from_str(&json).unwrap();
        let mut looked_up = false;
        let replay = ClientFsAccess::from_notice(&notice, |_, _| {
            looked_up = true;
            None
        });
        assert!(!looked_up);
        assert_eq!(replay.access().sound(), "floppy.access");
        assert_eq!(replay.access().world(), world);
        assert_eq!(replay.access().data().get_str("label"), Some("boot"));
    }
}

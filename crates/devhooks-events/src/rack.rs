//! Render hooks for rack-mounted modules.
//!
//! A rack is rendered in two passes and each pass gets its own event:
//!
//! - [`RackBakeEvent`] runs while the static rack model is (re)baked. It is
//!   meant for swapping the texture of a module's front face. Canceling it
//!   suppresses the default baked appearance of that module entirely.
//! - [`RackFrameEvent`] runs once per module per rendered frame, with the
//!   pose stack already positioned so the origin is the top-left corner of
//!   the module's face and a unit quad covers the whole rack front. It is
//!   meant for overlays such as LEDs and cannot be canceled.
//!
//! Render state types (pose stack, buffer source, texture sprites) are the
//! host renderer's; the events carry them as type parameters and never look
//! inside.

use devhooks_types::{DataBlob, Direction, TextureId};

use crate::error::EventError;
use crate::event::{Cancelable, Cancellation, Event};
use crate::host::Rack;

/// Texture-space `v` of the top edge of slot 0, in a 16-unit texture.
pub const SLOT_V_ORIGIN: f32 = 2.0 / 16.0;

/// Texture-space height of one slot, in a 16-unit texture.
pub const SLOT_V_HEIGHT: f32 = 3.0 / 16.0;

/// Vertical texture coordinates `(v0, v1)` of a slot on the rack front.
///
/// `v0 = 2/16 + slot * 3/16` and `v1 = v0 + 3/16`. The static model uses the
/// same mapping, so overlays line up with the baked faces only if this stays
/// bit-for-bit identical.
#[allow(clippy::suboptimal_flops)]
pub fn slot_v_bounds(slot: u8) -> (f32, f32) {
    let v0 = SLOT_V_ORIGIN + f32::from(slot) * SLOT_V_HEIGHT;
    (v0, v0 + SLOT_V_HEIGHT)
}

/// Fields shared by both render passes.
#[derive(Debug, Clone, Copy)]
pub struct MountableRender<'a> {
    rack: &'a dyn Rack,
    slot: u8,
    data: Option<&'a DataBlob>,
}

impl<'a> MountableRender<'a> {
    /// Describe the module in `slot` of `rack`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SlotOutOfRange`] if the rack has no such slot.
    pub fn new(rack: &'a dyn Rack, slot: u8, data: Option<&'a DataBlob>) -> Result<Self, EventError> {
        let slot_count = rack.slot_count();
        if slot >= slot_count {
            return Err(EventError::SlotOutOfRange {
                rack: rack.container_id(),
                slot,
                slot_count,
            });
        }
        Ok(Self { rack, slot, data })
    }

    /// The rack housing the module.
    pub const fn rack(&self) -> &'a dyn Rack {
        self.rack
    }

    /// Index of the module's slot in the rack.
    pub const fn slot(&self) -> u8 {
        self.slot
    }

    /// Data the module made available for rendering, if any.
    pub const fn data(&self) -> Option<&'a DataBlob> {
        self.data
    }
}

/// Posted for each mounted module while the static rack model is baked.
#[derive(Debug)]
pub struct RackBakeEvent<'a, T = TextureId> {
    mount: MountableRender<'a>,
    side: Direction,
    front_override: Option<T>,
    canceled: Cancellation,
}

impl<'a, T> RackBakeEvent<'a, T> {
    /// Build the bake event for the module in `slot`, whose front faces `side`.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SlotOutOfRange`] if the rack has no such slot.
    pub fn new(
        rack: &'a dyn Rack,
        slot: u8,
        data: Option<&'a DataBlob>,
        side: Direction,
    ) -> Result<Self, EventError> {
        Ok(Self {
            mount: MountableRender::new(rack, slot, data)?,
            side,
            front_override: None,
            canceled: Cancellation::new(),
        })
    }

    /// The module being baked.
    pub const fn mount(&self) -> &MountableRender<'a> {
        &self.mount
    }

    /// The side of the rack the module is visible on.
    pub const fn side(&self) -> Direction {
        self.side
    }

    /// Texture to use for the module's front, or `None` for the module's own.
    pub const fn front_texture_override(&self) -> Option<&T> {
        self.front_override.as_ref()
    }

    /// Set, or with `None` clear, the texture for the module's front.
    pub fn set_front_texture_override(&mut self, texture: Option<T>) {
        self.front_override = texture;
    }
}

impl<T> Event for RackBakeEvent<'_, T> {
    const NAME: &'static str = "rack.render.bake";
    const CANCELABLE: bool = true;
}

impl<T> Cancelable for RackBakeEvent<'_, T> {
    fn cancellation(&self) -> Cancellation {
        self.canceled
    }

    fn cancellation_mut(&mut self) -> &mut Cancellation {
        &mut self.canceled
    }
}

/// Packed light values for one frame of a rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLight {
    /// Packed block and sky light.
    pub light: u32,
    /// Packed overlay texture coordinates.
    pub overlay: u32,
}

/// Posted for each mounted module on every frame the rack is visible.
pub struct RackFrameEvent<'a, P, B> {
    mount: MountableRender<'a>,
    pose: &'a mut P,
    buffers: &'a mut B,
    light: FrameLight,
    v0: f32,
    v1: f32,
}

impl<'a, P, B> RackFrameEvent<'a, P, B> {
    /// Build the frame event for the module in `slot`.
    ///
    /// `pose` must already be positioned on the rack front; the `v` bounds
    /// are derived from `slot` with [`slot_v_bounds`].
    ///
    /// # Errors
    ///
    /// Returns [`EventError::SlotOutOfRange`] if the rack has no such slot.
    pub fn new(
        rack: &'a dyn Rack,
        slot: u8,
        data: Option<&'a DataBlob>,
        pose: &'a mut P,
        buffers: &'a mut B,
        light: FrameLight,
    ) -> Result<Self, EventError> {
        let mount = MountableRender::new(rack, slot, data)?;
        let (v0, v1) = slot_v_bounds(slot);
        Ok(Self {
            mount,
            pose,
            buffers,
            light,
            v0,
            v1,
        })
    }

    /// The module being rendered.
    pub const fn mount(&self) -> &MountableRender<'a> {
        &self.mount
    }

    /// The renderer's transform stack.
    pub const fn pose(&mut self) -> &mut P {
        &mut *self.pose
    }

    /// The renderer's buffer source.
    pub const fn buffers(&mut self) -> &mut B {
        &mut *self.buffers
    }

    /// Both render targets at once, for handlers that transform and draw.
    pub const fn targets(&mut self) -> (&mut P, &mut B) {
        (&mut *self.pose, &mut *self.buffers)
    }

    /// Packed block light.
    pub const fn light(&self) -> u32 {
        self.light.light
    }

    /// Packed overlay coordinates.
    pub const fn overlay(&self) -> u32 {
        self.light.overlay
    }

    /// Low `v` texture coordinate of the module's slot.
    pub const fn v0(&self) -> f32 {
        self.v0
    }

    /// High `v` texture coordinate of the module's slot.
    pub const fn v1(&self) -> f32 {
        self.v1
    }
}

impl<P, B> core::fmt::Debug for RackFrameEvent<'_, P, B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RackFrameEvent")
            .field("mount", &self.mount)
            .field("light", &self.light)
            .field("v0", &self.v0)
            .field("v1", &self.v1)
            .finish_non_exhaustive()
    }
}

impl<P, B> Event for RackFrameEvent<'_, P, B> {
    const NAME: &'static str = "rack.render.frame";
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::suboptimal_flops
)]
mod tests {
    use devhooks_types::WorldId;

    use super::*;
    use crate::event::{NullBus, post};
    use crate::host::BlockHost;
    use crate::testing::TestRack;

    /// Minimal stand-ins for the host's render state.
    #[derive(Debug, Default)]
    struct Pose {
        depth: u32,
    }

    #[derive(Debug, Default)]
    struct Quads {
        drawn: Vec<(u8, f32, f32)>,
    }

    const LIGHT: FrameLight = FrameLight {
        light: 0x00F0_00F0,
        overlay: 0x000A_0000,
    };

    #[test]
    fn v_bounds_follow_fixed_slot_mapping() {
        for slot in 0..=u8::MAX {
            let (v0, v1) = slot_v_bounds(slot);
            let expected = 2.0_f32 / 16.0 + f32::from(slot) * (3.0_f32 / 16.0);
            assert_eq!(v0.to_bits(), expected.to_bits(), "slot {slot}");
            assert_eq!(v1.to_bits(), (expected + 3.0_f32 / 16.0).to_bits(), "slot {slot}");
        }
    }

    #[test]
    fn v_bounds_for_a_four_slot_rack() {
        let expected = [(0.125, 0.3125), (0.3125, 0.5), (0.5, 0.6875), (0.6875, 0.875)];
        for (slot, (v0, v1)) in (0_u8..).zip(expected) {
            let bounds = slot_v_bounds(slot);
            assert_eq!(bounds.0.to_bits(), f32::to_bits(v0));
            assert_eq!(bounds.1.to_bits(), f32::to_bits(v1));
        }
    }

    #[test]
    fn frame_event_derives_bounds_from_slot() {
        let rack = TestRack::placed(WorldId::new(), 4);
        let mut pose = Pose::default();
        let mut quads = Quads::default();
        for slot in 0..4 {
            let event =
                RackFrameEvent::new(&rack, slot, None, &mut pose, &mut quads, LIGHT).unwrap();
            let (v0, v1) = slot_v_bounds(slot);
            assert_eq!(event.v0().to_bits(), v0.to_bits());
            assert_eq!(event.v1().to_bits(), v1.to_bits());
            assert_eq!(event.mount().slot(), slot);
            assert_eq!(event.light(), LIGHT.light);
            assert_eq!(event.overlay(), LIGHT.overlay);
        }
    }

    #[test]
    fn frame_handlers_draw_into_shared_buffers() {
        let rack = TestRack::placed(WorldId::new(), 4);
        let mut pose = Pose::default();
        let mut quads = Quads::default();

        let mut bus = |event: &mut RackFrameEvent<'_, Pose, Quads>| {
            let slot = event.mount().slot();
            let (v0, v1) = (event.v0(), event.v1());
            let (pose, buffers) = event.targets();
            pose.depth += 1;
            buffers.drawn.push((slot, v0, v1));
        };

        for slot in [1, 3] {
            let event =
                RackFrameEvent::new(&rack, slot, None, &mut pose, &mut quads, LIGHT).unwrap();
            let _ = post(&mut bus, event);
        }

        assert_eq!(pose.depth, 2);
        assert_eq!(quads.drawn.len(), 2);
        assert_eq!(quads.drawn[0].0, 1);
        assert_eq!(quads.drawn[1].0, 3);
        assert_eq!(quads.drawn[1].1.to_bits(), slot_v_bounds(3).0.to_bits());
    }

    #[test]
    fn frame_event_is_not_cancelable() {
        assert!(!<RackFrameEvent<'_, Pose, Quads> as Event>::CANCELABLE);
        assert!(<RackBakeEvent<'_> as Event>::CANCELABLE);
    }

    #[test]
    fn out_of_range_slot_is_rejected() {
        let rack = TestRack::placed(WorldId::new(), 4);
        let err = RackBakeEvent::<TextureId>::new(&rack, 4, None, Direction::North).unwrap_err();
        assert_eq!(
            err,
            EventError::SlotOutOfRange {
                rack: rack.container_id(),
                slot: 4,
                slot_count: 4,
            }
        );

        let mut pose = Pose::default();
        let mut quads = Quads::default();
        let err = RackFrameEvent::new(&rack, 9, None, &mut pose, &mut quads, LIGHT).unwrap_err();
        assert!(matches!(err, EventError::SlotOutOfRange { slot: 9, .. }));
    }

    #[test]
    fn bake_override_defaults_to_none_and_is_settable() {
        let rack = TestRack::placed(WorldId::new(), 4);
        let data = DataBlob::new().with("state", "running");
        let mut bus = |event: &mut RackBakeEvent<'_>| {
            if event.mount().data().and_then(|d| d.get_str("state")) == Some("running") {
                event.set_front_texture_override(Some(TextureId::from("devhooks:rack/busy")));
            }
        };

        let idle = post(
            &mut bus,
            RackBakeEvent::<TextureId>::new(&rack, 0, None, Direction::South).unwrap(),
        );
        assert!(idle.front_texture_override().is_none());

        let busy = post(
            &mut bus,
            RackBakeEvent::<TextureId>::new(&rack, 1, Some(&data), Direction::South).unwrap(),
        );
        assert_eq!(
            busy.front_texture_override(),
            Some(&TextureId::from("devhooks:rack/busy"))
        );
        assert_eq!(busy.side(), Direction::South);
        assert!(!busy.is_canceled());
    }

    #[test]
    fn bake_cancel_keeps_override_and_side() {
        let rack = TestRack::placed(WorldId::new(), 2);
        let mut event = RackBakeEvent::<TextureId>::new(&rack, 1, None, Direction::East).unwrap();
        event.set_front_texture_override(Some(TextureId::from("devhooks:blank")));
        event.cancel();

        assert!(event.is_canceled());
        assert_eq!(event.side(), Direction::East);
        assert_eq!(event.mount().slot(), 1);
        assert_eq!(
            event.front_texture_override(),
            Some(&TextureId::from("devhooks:blank"))
        );

        let dispatched = post(&mut NullBus::new(), event);
        assert!(dispatched.is_canceled());
    }
}

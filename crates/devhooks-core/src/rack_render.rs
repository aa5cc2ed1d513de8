//! Rack render driver: posts the bake and frame events for mounted modules.
//!
//! [`RackRenderer::bake`] runs once whenever the rack's static model is
//! rebuilt and records how every occupied slot should look.
//! [`RackRenderer::render_frame`] runs every frame afterwards and gives
//! handlers a chance to draw dynamic overlays. A frame before the first bake
//! (or after [`RackRenderer::invalidate`]) is an error, since bake must
//! strictly precede frame rendering.

use std::collections::BTreeMap;

use devhooks_events::{
    Cancelable, Dispatch, EventError, FrameLight, Rack, RackBakeEvent, RackFrameEvent, post,
};
use devhooks_types::{ContainerId, TextureId};
use tracing::{debug, trace};

/// Errors from driving rack render events.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A frame was requested for a rack whose model has not been baked.
    #[error("rack {rack} has not been baked")]
    NotBaked {
        /// The rack.
        rack: ContainerId,
    },

    /// An event could not be constructed.
    #[error(transparent)]
    Event(#[from] EventError),
}

/// How a mounted module's front face was baked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountAppearance<T = TextureId> {
    /// The module's own front texture.
    Default,
    /// A texture a bake handler substituted.
    Override(T),
    /// A bake handler canceled the default appearance; nothing is baked.
    Suppressed,
}

#[derive(Debug, Clone)]
struct Bake<T> {
    rack: ContainerId,
    slots: BTreeMap<u8, MountAppearance<T>>,
}

/// Drives the render events of one rack.
#[derive(Debug, Clone)]
pub struct RackRenderer<T = TextureId> {
    bake: Option<Bake<T>>,
}

impl<T: Clone + core::fmt::Debug> RackRenderer<T> {
    /// Create a renderer with nothing baked yet.
    pub const fn new() -> Self {
        Self { bake: None }
    }

    /// Bake the static model of `rack`, posting one bake event per occupied
    /// slot. Returns the number of events posted.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Event`] if a bake event cannot be built for an
    /// occupied slot. The previous bake is kept in that case.
    pub fn bake<B>(&mut self, bus: &mut B, rack: &dyn Rack) -> Result<usize, RenderError>
    where
        B: for<'a> Dispatch<RackBakeEvent<'a, T>> + ?Sized,
    {
        let side = rack.facing();
        let mut slots = BTreeMap::new();

        for slot in occupied_slots(rack) {
            let event = RackBakeEvent::<T>::new(rack, slot, rack.mountable_data(slot), side)?;
            let event = post(bus, event);

            let appearance = if event.is_canceled() {
                MountAppearance::Suppressed
            } else {
                event
                    .front_texture_override()
                    .cloned()
                    .map_or(MountAppearance::Default, MountAppearance::Override)
            };
            trace!(slot, ?appearance, "Mount baked");
            slots.insert(slot, appearance);
        }

        let posted = slots.len();
        debug!(rack = %rack.container_id(), mounts = posted, "Rack model baked");
        self.bake = Some(Bake {
            rack: rack.container_id(),
            slots,
        });
        Ok(posted)
    }

    /// Render one frame of `rack`, posting one frame event per occupied slot.
    /// Returns the number of events posted.
    ///
    /// `pose` must already be positioned on the rack front.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NotBaked`] if this rack has not been baked
    /// since the last invalidation, or [`RenderError::Event`] if a frame
    /// event cannot be built for an occupied slot.
    pub fn render_frame<B, P, Q>(
        &self,
        bus: &mut B,
        rack: &dyn Rack,
        pose: &mut P,
        buffers: &mut Q,
        light: FrameLight,
    ) -> Result<usize, RenderError>
    where
        B: for<'a> Dispatch<RackFrameEvent<'a, P, Q>> + ?Sized,
    {
        if !self.is_baked(rack.container_id()) {
            return Err(RenderError::NotBaked {
                rack: rack.container_id(),
            });
        }

        let mut posted = 0_usize;
        for slot in occupied_slots(rack) {
            let event = RackFrameEvent::new(
                rack,
                slot,
                rack.mountable_data(slot),
                &mut *pose,
                &mut *buffers,
                light,
            )?;
            let _ = post(bus, event);
            posted = posted.saturating_add(1);
        }
        Ok(posted)
    }

    /// Drop the current bake. The next frame fails until the rack is baked
    /// again.
    pub fn invalidate(&mut self) {
        self.bake = None;
    }

    /// Whether `rack` is the rack currently baked.
    pub fn is_baked(&self, rack: ContainerId) -> bool {
        self.bake.as_ref().is_some_and(|bake| bake.rack == rack)
    }

    /// How the module in `slot` was baked, if the slot was occupied at the
    /// last bake.
    pub fn appearance(&self, slot: u8) -> Option<&MountAppearance<T>> {
        self.bake.as_ref().and_then(|bake| bake.slots.get(&slot))
    }
}

impl<T: Clone + core::fmt::Debug> Default for RackRenderer<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn occupied_slots(rack: &dyn Rack) -> impl Iterator<Item = u8> + '_ {
    (0..rack.slot_count()).filter(|slot| rack.is_occupied(*slot))
}

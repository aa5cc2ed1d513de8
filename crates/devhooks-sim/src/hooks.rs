//! The demo add-on: one handler set subscribed to every device hook.
//!
//! Stands in for the host event bus. Each `Dispatch` impl is the single
//! handler registered for that event kind.

use std::collections::{BTreeMap, BTreeSet};

use devhooks_events::{
    BreakBlockPost, BreakBlockPre, Cancelable, ClientFsAccess, Dispatch, Pending, RackBakeEvent,
    RackFrameEvent, ServerFsAccess,
};
use devhooks_types::{BlockPos, NodeId, TextureId};
use tracing::{debug, info};

/// Module state that gets the error front texture.
const ERROR_STATE: &str = "error";

/// Module state whose baked front is suppressed.
const HIDDEN_STATE: &str = "hidden";

/// Minimal transform stack standing in for the host renderer's.
#[derive(Debug, Default)]
pub struct PoseStack {
    /// Number of pushes performed.
    pub pushes: u32,
}

/// An LED quad drawn on a module front.
#[derive(Debug, Clone, Copy)]
pub struct LedQuad {
    /// Slot the LED belongs to.
    pub slot: u8,
    /// Low `v` bound.
    pub v0: f32,
    /// High `v` bound.
    pub v1: f32,
    /// Packed light it was drawn with.
    pub light: u32,
}

/// Buffer source standing in for the host renderer's.
#[derive(Debug, Default)]
pub struct LedBuffer {
    /// Quads drawn so far.
    pub quads: Vec<LedQuad>,
}

/// Handler state of the demo add-on.
#[derive(Debug, Default)]
pub struct DemoHooks {
    /// File systems whose activity is never announced.
    pub quiet_nodes: BTreeSet<NodeId>,
    /// Blocks robots may not break.
    pub protected: BTreeSet<BlockPos>,
    /// Break time multiplier; `1.0` leaves the estimate alone.
    pub overclock: f64,
    /// Accesses announced per file system.
    pub accesses: BTreeMap<NodeId, u32>,
    /// Total experience robots collected.
    pub experience: f64,
}

impl DemoHooks {
    /// Create the add-on with the given break time multiplier.
    pub fn new(overclock: f64) -> Self {
        Self {
            overclock,
            ..Self::default()
        }
    }
}

impl Dispatch<ServerFsAccess<'_>> for DemoHooks {
    fn dispatch(&mut self, event: &mut Pending<ServerFsAccess<'_>>) {
        let node = event.node();
        if self.quiet_nodes.contains(&node) {
            debug!(%node, "Quiet file system, suppressing access");
            event.cancel();
            return;
        }
        let count = self.accesses.entry(node).or_default();
        *count = count.saturating_add(1);
    }
}

impl Dispatch<ClientFsAccess<'_>> for DemoHooks {
    fn dispatch(&mut self, event: &mut Pending<ClientFsAccess<'_>>) {
        let access = event.access();
        debug!(
            sound = access.sound(),
            x = access.x(),
            y = access.y(),
            z = access.z(),
            hosted = access.is_hosted(),
            "Client heard file system access"
        );
    }
}

impl Dispatch<BreakBlockPre<'_>> for DemoHooks {
    fn dispatch(&mut self, event: &mut Pending<BreakBlockPre<'_>>) {
        if self.protected.contains(&event.pos()) {
            info!(
                agent = event.agent().name(),
                pos = %event.pos(),
                "Protected block, canceling break"
            );
            event.cancel();
            return;
        }
        let adjusted = event.break_time() * self.overclock;
        event.set_break_time(adjusted);
    }
}

impl Dispatch<BreakBlockPost<'_>> for DemoHooks {
    fn dispatch(&mut self, event: &mut Pending<BreakBlockPost<'_>>) {
        self.experience += event.experience();
    }
}

impl Dispatch<RackBakeEvent<'_>> for DemoHooks {
    fn dispatch(&mut self, event: &mut Pending<RackBakeEvent<'_>>) {
        let state = event.mount().data().and_then(|data| data.get_str("state"));
        match state {
            Some(ERROR_STATE) => {
                event.set_front_texture_override(Some(TextureId::from("devhooks:rack/error")));
            }
            Some(HIDDEN_STATE) => event.cancel(),
            _ => {}
        }
    }
}

impl Dispatch<RackFrameEvent<'_, PoseStack, LedBuffer>> for DemoHooks {
    fn dispatch(&mut self, event: &mut Pending<RackFrameEvent<'_, PoseStack, LedBuffer>>) {
        let quad = LedQuad {
            slot: event.mount().slot(),
            v0: event.v0(),
            v1: event.v1(),
            light: event.light(),
        };
        let (pose, buffers) = event.targets();
        pose.pushes = pose.pushes.saturating_add(1);
        buffers.quads.push(quad);
    }
}

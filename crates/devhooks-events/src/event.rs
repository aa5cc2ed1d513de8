//! The event capability model and the dispatch seam.
//!
//! Every event kind implements [`Event`]. Kinds whose default behavior can be
//! suppressed also implement [`Cancelable`]; the others do not, so a handler
//! holding a non-cancelable event has no way to even ask about cancellation.
//!
//! Handler registration, priority ordering, and the invocation loop belong to
//! the host's event bus. This crate only needs one operation from it,
//! expressed by [`Dispatch`]: run every interested handler against a mutable
//! event. Handlers only ever see the event wrapped in [`Pending`], which only
//! [`post`] can build, and `post` hands the event back as a read-only
//! [`Dispatched`] view. An instance therefore goes through exactly one
//! dispatch.

use core::ops::{Deref, DerefMut};

use tracing::trace;

/// A dispatchable event kind.
pub trait Event {
    /// Stable name of the event kind, used in logs.
    const NAME: &'static str;

    /// Whether this kind supports cancellation.
    ///
    /// `true` exactly when the kind implements [`Cancelable`].
    const CANCELABLE: bool = false;
}

/// Latching cancellation flag embedded in every cancelable event.
///
/// Starts cleared. Once set it stays set for the rest of the dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cancellation {
    canceled: bool,
}

impl Cancellation {
    /// A cleared flag.
    pub const fn new() -> Self {
        Self { canceled: false }
    }

    /// Whether the flag has been set.
    pub const fn is_set(self) -> bool {
        self.canceled
    }

    /// Set the flag.
    pub const fn set(&mut self) {
        self.canceled = true;
    }
}

/// Capability of events whose default behavior a handler may suppress.
///
/// After dispatch the caller checks [`is_canceled`] before running the
/// behavior the event stands for.
///
/// [`is_canceled`]: Cancelable::is_canceled
pub trait Cancelable: Event {
    /// The event's cancellation flag.
    fn cancellation(&self) -> Cancellation;

    /// Mutable access to the event's cancellation flag.
    fn cancellation_mut(&mut self) -> &mut Cancellation;

    /// Whether a handler has canceled this event.
    fn is_canceled(&self) -> bool {
        self.cancellation().is_set()
    }

    /// Cancel this event. Has no effect on any other field.
    fn cancel(&mut self) {
        self.cancellation_mut().set();
    }
}

/// An event in the middle of its one dispatch.
///
/// Dereferences mutably to the event. There is no public constructor; the
/// only way to get one is through [`post`]. A bare event cannot be handed to
/// a bus:
///
/// ```compile_fail
/// use devhooks_events::{Dispatch, Event, NullBus};
///
/// struct Ping;
///
/// impl Event for Ping {
///     const NAME: &'static str = "doc.ping";
/// }
///
/// let mut ping = Ping;
/// NullBus::new().dispatch(&mut ping);
/// ```
#[derive(Debug)]
pub struct Pending<E> {
    event: E,
}

impl<E> Deref for Pending<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.event
    }
}

impl<E> DerefMut for Pending<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.event
    }
}

/// The host event bus, seen from one event kind.
///
/// An implementation runs its handlers, in whatever order the host defines,
/// against `event`. Handlers may mutate the fields the event exposes as
/// mutable and may cancel it if it is [`Cancelable`].
pub trait Dispatch<E: Event> {
    /// Run all handlers registered for `E`.
    fn dispatch(&mut self, event: &mut Pending<E>);
}

/// Any closure over a mutable event is a bus with exactly one handler.
impl<E, F> Dispatch<E> for F
where
    E: Event,
    F: FnMut(&mut E),
{
    fn dispatch(&mut self, event: &mut Pending<E>) {
        self(&mut **event);
    }
}

/// A bus with no handlers. Every event comes back untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBus;

impl NullBus {
    /// Create a bus with no handlers.
    pub const fn new() -> Self {
        Self
    }
}

impl<E: Event> Dispatch<E> for NullBus {
    fn dispatch(&mut self, _event: &mut Pending<E>) {}
}

/// An event that has been through its one dispatch.
///
/// Dereferences to the event for reading. There is no way back
/// to an owned, mutable event, so a dispatched instance cannot be posted
/// again or modified after handlers have seen it.
#[derive(Debug)]
pub struct Dispatched<E> {
    event: E,
}

impl<E> Deref for Dispatched<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.event
    }
}

/// Dispatch `event` through `bus` and return the resulting read-only view.
///
/// Consumes the event: an instance is dispatched exactly once.
pub fn post<E, D>(bus: &mut D, event: E) -> Dispatched<E>
where
    E: Event,
    D: Dispatch<E> + ?Sized,
{
    trace!(event = E::NAME, cancelable = E::CANCELABLE, "Posting event");
    let mut pending = Pending { event };
    bus.dispatch(&mut pending);
    Dispatched {
        event: pending.event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Ping {
        hits: u32,
        canceled: Cancellation,
    }

    impl Event for Ping {
        const NAME: &'static str = "test.ping";
        const CANCELABLE: bool = true;
    }

    impl Cancelable for Ping {
        fn cancellation(&self) -> Cancellation {
            self.canceled
        }

        fn cancellation_mut(&mut self) -> &mut Cancellation {
            &mut self.canceled
        }
    }

    #[derive(Debug)]
    struct Notice;

    impl Event for Notice {
        const NAME: &'static str = "test.notice";
    }

    #[test]
    fn cancellation_latches() {
        let mut flag = Cancellation::new();
        assert!(!flag.is_set());
        flag.set();
        flag.set();
        assert!(flag.is_set());
    }

    #[test]
    fn null_bus_returns_event_untouched() {
        let dispatched = post(&mut NullBus::new(), Ping::default());
        assert_eq!(dispatched.hits, 0);
        assert!(!dispatched.is_canceled());
    }

    #[test]
    fn closure_bus_mutates_and_cancels() {
        let mut bus = |ping: &mut Ping| {
            ping.hits += 1;
            ping.cancel();
        };
        let dispatched = post(&mut bus, Ping::default());
        assert_eq!(dispatched.hits, 1);
        assert!(dispatched.is_canceled());
    }

    /// Counts how many times the bus ran, across every event it saw.
    #[derive(Debug, Default)]
    struct CountingBus {
        runs: u32,
    }

    impl Dispatch<Ping> for CountingBus {
        fn dispatch(&mut self, event: &mut Pending<Ping>) {
            self.runs = self.runs.saturating_add(1);
            event.hits = event.hits.saturating_add(1);
        }
    }

    #[test]
    fn each_post_runs_handlers_exactly_once() {
        let mut bus = CountingBus::default();
        let first = post(&mut bus, Ping::default());
        let second = post(&mut bus, Ping::default());

        // A dispatched view only reads; a fresh post needs a fresh event.
        assert_eq!(first.hits, 1);
        assert_eq!(second.hits, 1);
        assert_eq!(bus.runs, 2);
    }

    #[test]
    fn capability_is_static() {
        assert!(Ping::CANCELABLE);
        assert!(!Notice::CANCELABLE);
        let _ = post(&mut NullBus::new(), Notice);
    }
}

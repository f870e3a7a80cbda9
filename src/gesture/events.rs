use smallvec::SmallVec;

use crate::foundation::core::Point;
use crate::transform::TransformDelta;

/// Discrete and continuous outputs of the gesture engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent {
    /// A pointer session or a wheel burst began.
    TransformStart,
    /// Incremental change to apply to the photo transform.
    TransformUpdate(TransformDelta),
    /// All pointers lifted, or the wheel went quiet.
    TransformEnd,
    /// Second quick tap within the double-tap window, in client coordinates.
    DoubleTap(Point),
    /// Two-finger long press engaged low-sensitivity pinch/rotate.
    PrecisionModeEnter,
    /// Precision mode ended.
    PrecisionModeExit,
}

impl GestureEvent {
    pub fn kind(&self) -> GestureEventKind {
        match self {
            GestureEvent::TransformStart => GestureEventKind::TransformStart,
            GestureEvent::TransformUpdate(_) => GestureEventKind::TransformUpdate,
            GestureEvent::TransformEnd => GestureEventKind::TransformEnd,
            GestureEvent::DoubleTap(_) => GestureEventKind::DoubleTap,
            GestureEvent::PrecisionModeEnter => GestureEventKind::PrecisionModeEnter,
            GestureEvent::PrecisionModeExit => GestureEventKind::PrecisionModeExit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureEventKind {
    TransformStart,
    TransformUpdate,
    TransformEnd,
    DoubleTap,
    PrecisionModeEnter,
    PrecisionModeExit,
}

/// Events emitted by a single engine call, in emission order.
pub type EmittedEvents = SmallVec<[GestureEvent; 4]>;

/// Handle returned by [`GestureListeners::on`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Box<dyn FnMut(&GestureEvent)>;

struct Listener {
    id: ListenerId,
    kind: Option<GestureEventKind>,
    handler: Handler,
}

/// Typed listener registry.
///
/// Handlers run synchronously, in registration order, for every matching event.
#[derive(Default)]
pub struct GestureListeners {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl std::fmt::Debug for GestureListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureListeners")
            .field("listeners", &format!("<{} handlers>", self.listeners.len()))
            .finish()
    }
}

impl GestureListeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of `kind`.
    pub fn on(
        &mut self,
        kind: GestureEventKind,
        handler: impl FnMut(&GestureEvent) + 'static,
    ) -> ListenerId {
        self.push(Some(kind), Box::new(handler))
    }

    /// Subscribe `handler` to every event.
    pub fn on_any(&mut self, handler: impl FnMut(&GestureEvent) + 'static) -> ListenerId {
        self.push(None, Box::new(handler))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn emit(&mut self, event: &GestureEvent) {
        let kind = event.kind();
        for l in &mut self.listeners {
            if l.kind.is_none_or(|k| k == kind) {
                (l.handler)(event);
            }
        }
    }

    fn push(&mut self, kind: Option<GestureEventKind>, handler: Handler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener { id, kind, handler });
        id
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gesture/events.rs"]
mod tests;

use dashmap::DashMap;
use pairlink_core::{ServerSignal, SignalKind};
use std::sync::Arc;

pub type SignalHandler = Arc<dyn Fn(ServerSignal) + Send + Sync>;

pub type LostHandler = Arc<dyn Fn() + Send + Sync>;

/// One handler per inbound kind.
///
/// Handlers run while the table entry is read-locked, so `clear` waits for
/// calls in flight. A handler must not register or clear handlers itself.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: Arc<DashMap<SignalKind, SignalHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, kind: SignalKind, handler: SignalHandler) {
        self.handlers.insert(kind, handler);
    }

    /// Returns `false` when nobody listens for the signal's kind.
    pub fn dispatch(&self, signal: ServerSignal) -> bool {
        let Some(handler) = self.handlers.get(&signal.kind()) else {
            return false;
        };
        (handler.value())(signal);
        true
    }

    pub fn clear(&self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

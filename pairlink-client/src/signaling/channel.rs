use crate::signaling::{LostHandler, SignalHandler};
use async_trait::async_trait;
use pairlink_core::{ClientSignal, RoomId, SignalKind};

/// Transport to the rendezvous server.
///
/// Delivery is best-effort: `send` never reports failure to the caller, and
/// errors are logged where they happen. Messages of one kind from one sender
/// arrive in order; nothing is promised across kinds.
#[async_trait]
pub trait SignalingChannel: Send + Sync {
    /// Announces the intent to join `room`. The membership snapshot that
    /// follows is the only acknowledgment.
    async fn join(&self, room: &RoomId) {
        self.send(ClientSignal::JoinRoom { room: room.clone() })
            .await;
    }

    /// Registers the handler for one inbound kind, replacing any previous one.
    fn on(&self, kind: SignalKind, handler: SignalHandler);

    /// Called once if the transport drops without `disconnect` being called.
    fn on_transport_lost(&self, _handler: LostHandler) {}

    async fn send(&self, signal: ClientSignal);

    /// Closes the transport. No handler runs after this returns. Calling it
    /// again is a no-op.
    async fn disconnect(&self);
}

use crate::SignalingService;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use pairlink_core::{ClientSignal, ParticipantId, ServerSignal};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let participant = ParticipantId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, participant, service))
}

async fn handle_socket(socket: WebSocket, participant: ParticipantId, service: SignalingService) {
    info!("New WebSocket connection: {}", participant);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerSignal>();

    service.add_peer(participant, tx);

    let mut send_task = tokio::spawn(async move {
        while let Some(signal) = rx.recv().await {
            let json = match signal.to_json() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize signal: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientSignal::from_json(text.as_str()) {
                        Ok(signal) => service.handle(participant, signal),
                        Err(e) => warn!("Invalid signal from {}: {}", participant, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.remove_peer(&participant);
    info!("WebSocket disconnected: {}", participant);
}

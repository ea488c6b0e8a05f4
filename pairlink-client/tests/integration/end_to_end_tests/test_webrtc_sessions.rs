use pairlink_client::{
    ConnectionSession, MediaBinding, SignalingChannel, WebRtcConnector, WsSignalingChannel,
};
use pairlink_core::Role;
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{
    RecordingTarget, room, spawn_server, synthetic_devices, test_config, wait_status,
};

async fn join_with_webrtc(url: &str, room_name: &str) -> ConnectionSession {
    let signaling: Arc<dyn SignalingChannel> =
        Arc::new(WsSignalingChannel::connect(url).await.unwrap());
    ConnectionSession::join(
        room(room_name),
        signaling,
        &WebRtcConnector,
        MediaBinding::new(synthetic_devices(), Arc::new(RecordingTarget::default())),
        test_config(),
    )
    .await
    .expect("Failed to start session")
}

#[tokio::test]
async fn test_real_peer_connections_negotiate() {
    init_tracing();

    let (url, _stop) = spawn_server().await;

    let first = join_with_webrtc(&url, "webrtc").await;
    wait_status(&first, |s| s.role.is_some()).await;
    let second = join_with_webrtc(&url, "webrtc").await;

    let status_second = wait_status(&second, |s| s.is_connected()).await;
    let status_first = wait_status(&first, |s| s.is_connected()).await;

    assert_eq!(status_first.role, Some(Role::Responder));
    assert_eq!(status_second.role, Some(Role::Initiator));
    assert!(status_first.failure.is_none());
    assert!(status_second.failure.is_none());

    second.leave().await;
    first.leave().await;
}

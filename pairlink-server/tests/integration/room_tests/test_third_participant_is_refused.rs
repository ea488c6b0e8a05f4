use pairlink_core::ServerSignal;
use pairlink_server::SignalingService;

use crate::integration::init_tracing;
use crate::utils::{TestPeer, join, offer, room};

#[tokio::test]
async fn test_third_participant_is_refused() {
    init_tracing();

    let service = SignalingService::new();
    let alpha = room("alpha");
    let mut first = TestPeer::attach(&service);
    let mut second = TestPeer::attach(&service);
    let mut third = TestPeer::attach(&service);

    service.handle(first.id, join(&alpha));
    service.handle(second.id, join(&alpha));
    first.recv().await.unwrap();
    second.recv().await.unwrap();

    service.handle(third.id, join(&alpha));
    assert_eq!(
        third.recv().await.unwrap(),
        ServerSignal::RoomFull {
            room: alpha.clone()
        }
    );

    // the refused participant cannot reach the members
    service.handle(third.id, offer(&alpha, 1));
    first.assert_idle();
    second.assert_idle();
}

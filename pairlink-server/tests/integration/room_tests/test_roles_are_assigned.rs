use pairlink_core::{Participant, Role, ServerSignal};
use pairlink_server::SignalingService;

use crate::integration::init_tracing;
use crate::utils::{TestPeer, join, room};

#[tokio::test]
async fn test_first_joiner_is_responder_second_is_initiator() {
    init_tracing();

    let service = SignalingService::new();
    let alpha = room("alpha");
    let mut first = TestPeer::attach(&service);
    let mut second = TestPeer::attach(&service);

    service.handle(first.id, join(&alpha));
    assert_eq!(
        first.recv().await.unwrap(),
        ServerSignal::AllUsers {
            users: vec![],
            role: Some(Role::Responder)
        }
    );

    service.handle(second.id, join(&alpha));
    assert_eq!(
        second.recv().await.unwrap(),
        ServerSignal::AllUsers {
            users: vec![Participant::from(first.id)],
            role: Some(Role::Initiator)
        }
    );

    first.assert_idle();
    assert_eq!(service.rooms().member_count(&alpha), 2);
}

#[tokio::test]
async fn test_disconnect_frees_the_room() {
    init_tracing();

    let service = SignalingService::new();
    let alpha = room("alpha");
    let first = TestPeer::attach(&service);
    let mut second = TestPeer::attach(&service);

    service.handle(first.id, join(&alpha));
    service.remove_peer(&first.id);
    assert_eq!(service.rooms().member_count(&alpha), 0);

    service.handle(second.id, join(&alpha));
    assert_eq!(
        second.recv().await.unwrap(),
        ServerSignal::AllUsers {
            users: vec![],
            role: Some(Role::Responder)
        }
    );
}

#[tokio::test]
async fn test_joining_another_room_leaves_the_first() {
    init_tracing();

    let service = SignalingService::new();
    let mut peer = TestPeer::attach(&service);

    service.handle(peer.id, join(&room("alpha")));
    peer.recv().await.unwrap();
    service.handle(peer.id, join(&room("beta")));
    peer.recv().await.unwrap();

    assert_eq!(service.rooms().member_count(&room("alpha")), 0);
    assert!(service.rooms().is_member(&room("beta"), &peer.id));
}

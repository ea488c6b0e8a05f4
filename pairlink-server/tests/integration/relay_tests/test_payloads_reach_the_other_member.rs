use pairlink_core::{ServerSignal, SdpKind};
use pairlink_server::SignalingService;

use crate::integration::init_tracing;
use crate::utils::{TestPeer, answer, candidate, join, offer, room};

async fn joined_pair(service: &SignalingService) -> (TestPeer, TestPeer) {
    let alpha = room("alpha");
    let mut responder = TestPeer::attach(service);
    let mut initiator = TestPeer::attach(service);

    service.handle(responder.id, join(&alpha));
    service.handle(initiator.id, join(&alpha));
    responder.recv().await.unwrap();
    initiator.recv().await.unwrap();

    (responder, initiator)
}

#[tokio::test]
async fn test_offer_answer_and_candidates_are_relayed() {
    init_tracing();

    let service = SignalingService::new();
    let alpha = room("alpha");
    let (mut responder, mut initiator) = joined_pair(&service).await;

    service.handle(initiator.id, offer(&alpha, 1));
    match responder.recv().await.unwrap() {
        ServerSignal::GetOffer { sdp, round } => {
            assert_eq!(sdp.kind(), SdpKind::Offer);
            assert_eq!(sdp.sdp(), "v=0 offer-1");
            assert_eq!(round, 1);
        }
        other => panic!("Expected getOffer, got {:?}", other),
    }
    initiator.assert_idle();

    service.handle(responder.id, answer(&alpha, 1));
    assert!(matches!(
        initiator.recv().await.unwrap(),
        ServerSignal::GetAnswer { round: 1, .. }
    ));

    service.handle(initiator.id, candidate(&alpha, 1));
    service.handle(initiator.id, candidate(&alpha, 2));
    for n in 1..=2 {
        match responder.recv().await.unwrap() {
            ServerSignal::GetCandidate { candidate } => {
                assert!(candidate.candidate.starts_with(&format!("candidate:{n} ")));
            }
            other => panic!("Expected getCandidate, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_payload_for_foreign_room_is_dropped() {
    init_tracing();

    let service = SignalingService::new();
    let (mut responder, initiator) = joined_pair(&service).await;

    service.handle(initiator.id, offer(&room("beta"), 1));
    responder.assert_idle();
}

use crate::config::TransportConfig;
use crate::media::{LocalTrack, RemoteTrack};
use crate::transport::{Connector, PeerConnection, TransportEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use pairlink_core::{IceCandidate, IceServerConfig, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_remote::TrackRemote;

/// `PeerConnection` backed by a `webrtc` crate `RTCPeerConnection`.
pub struct WebRtcConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcConnection {
    /// Builds the connection and wires its callbacks into `event_tx`.
    pub async fn new(config: &TransportConfig, event_tx: mpsc::Sender<TransportEvent>) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.ice_servers.iter().map(to_rtc_ice_server).collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create RTCPeerConnection")?,
        );

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();

                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let _ = tx.send(TransportEvent::StateChanged(s)).await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();

            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx
                    .send(TransportEvent::CandidateGenerated(from_rtc_candidate(init)))
                    .await;
            })
        }));

        let track_tx = event_tx;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();

                Box::pin(async move {
                    let remote = RemoteTrack::from_remote(&track);
                    debug!(
                        "Remote track {} ({:?}) on stream {}",
                        remote.id, remote.kind, remote.stream_id
                    );
                    let _ = tx.send(TransportEvent::RemoteTrack(remote)).await;
                })
            },
        ));

        Ok(Self { peer_connection })
    }
}

#[async_trait]
impl PeerConnection for WebRtcConnection {
    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()> {
        let desc = to_rtc_description(description)?;
        self.peer_connection.set_local_description(desc).await?;
        Ok(())
    }

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()> {
        let desc = to_rtc_description(description)?;
        self.peer_connection.set_remote_description(desc).await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate.clone(),
            sdp_mid: candidate.sdp_mid.clone(),
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment.clone(),
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn add_track(&self, track: LocalTrack) -> Result<()> {
        let track_id = track.id().to_owned();
        let rtp_sender = self
            .peer_connection
            .add_track(track)
            .await
            .with_context(|| format!("Failed to add track {track_id}"))?;

        // RTCP has to be drained for interceptors to keep working.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while rtp_sender.read(&mut rtcp_buf).await.is_ok() {}
            debug!("RTCP reader for track {} stopped", track_id);
        });
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

/// Default connector: one `WebRtcConnection` per session.
#[derive(Clone, Default)]
pub struct WebRtcConnector;

#[async_trait]
impl Connector for WebRtcConnector {
    async fn connect(
        &self,
        config: &TransportConfig,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Arc<dyn PeerConnection>> {
        let connection = WebRtcConnection::new(config, events).await?;
        Ok(Arc::new(connection))
    }
}

fn to_rtc_ice_server(server: &IceServerConfig) -> RTCIceServer {
    RTCIceServer {
        urls: server.urls.clone(),
        username: server.username.clone().unwrap_or_default(),
        credential: server.credential.clone().unwrap_or_default(),
    }
}

fn to_rtc_description(description: &SessionDescription) -> Result<RTCSessionDescription> {
    let sdp = description.sdp().to_owned();
    let desc = match description.kind() {
        SdpKind::Offer => RTCSessionDescription::offer(sdp),
        SdpKind::Answer => RTCSessionDescription::answer(sdp),
    };
    desc.with_context(|| format!("Malformed {} SDP", description.kind()))
}

fn from_rtc_candidate(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate {
        candidate: init.candidate,
        sdp_mid: init.sdp_mid,
        sdp_m_line_index: init.sdp_mline_index,
        username_fragment: init.username_fragment,
    }
}

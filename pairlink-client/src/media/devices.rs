use crate::error::MediaError;
use crate::media::{LocalStream, LocalTrack, MediaConstraints};
use async_trait::async_trait;
use std::sync::Arc;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Capture device access (camera and microphone).
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn acquire(&self, constraints: &MediaConstraints) -> Result<LocalStream, MediaError>;
}

/// Sample tracks with the codecs a camera and microphone would use, but no
/// capture behind them. Lets a call negotiate on headless machines.
#[derive(Debug, Clone)]
pub struct SyntheticDevices {
    stream_id: String,
}

impl SyntheticDevices {
    pub fn new(stream_id: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
        }
    }
}

impl Default for SyntheticDevices {
    fn default() -> Self {
        Self::new("pairlink-local")
    }
}

#[async_trait]
impl MediaDevices for SyntheticDevices {
    async fn acquire(&self, constraints: &MediaConstraints) -> Result<LocalStream, MediaError> {
        let mut tracks: Vec<LocalTrack> = Vec::new();

        if constraints.audio {
            tracks.push(Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_OPUS.to_owned(),
                    clock_rate: 48000,
                    channels: 2,
                    sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                    rtcp_feedback: vec![],
                },
                "audio".to_owned(),
                self.stream_id.clone(),
            )));
        }

        if constraints.video {
            tracks.push(Arc::new(TrackLocalStaticSample::new(
                RTCRtpCodecCapability {
                    mime_type: MIME_TYPE_VP8.to_owned(),
                    clock_rate: 90000,
                    channels: 0,
                    sdp_fmtp_line: String::new(),
                    rtcp_feedback: vec![],
                },
                "video".to_owned(),
                self.stream_id.clone(),
            )));
        }

        if tracks.is_empty() {
            return Err(MediaError::DeviceUnavailable(
                "neither audio nor video requested".to_owned(),
            ));
        }

        Ok(LocalStream::new(self.stream_id.clone(), tracks))
    }
}

/// Machine without capture hardware.
#[derive(Debug, Default, Clone)]
pub struct NoDevices;

#[async_trait]
impl MediaDevices for NoDevices {
    async fn acquire(&self, _constraints: &MediaConstraints) -> Result<LocalStream, MediaError> {
        Err(MediaError::DeviceUnavailable("no capture devices".to_owned()))
    }
}

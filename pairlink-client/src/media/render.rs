use crate::media::{LocalStream, RemoteStream};
use tracing::info;

/// The two rendering surfaces of a call. Implemented by the UI.
pub trait RenderTarget: Send + Sync {
    /// Local preview. Expected to be muted.
    fn attach_local(&self, stream: &LocalStream);

    fn attach_remote(&self, stream: &RemoteStream);
}

/// Headless target that only reports what it would display.
#[derive(Debug, Default, Clone)]
pub struct LogRenderTarget;

impl RenderTarget for LogRenderTarget {
    fn attach_local(&self, stream: &LocalStream) {
        info!(
            "Local preview attached: stream {} with {} track(s)",
            stream.id,
            stream.tracks.len()
        );
    }

    fn attach_remote(&self, stream: &RemoteStream) {
        info!(
            "Remote view attached: stream {} with {} track(s)",
            stream.id,
            stream.len()
        );
    }
}

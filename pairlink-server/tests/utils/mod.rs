pub mod service_helpers;

pub use service_helpers::*;
pub use ws_client::*;

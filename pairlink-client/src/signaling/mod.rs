mod channel;
mod handlers;
mod ws_channel;

pub use channel::*;
pub use handlers::*;
pub use ws_channel::*;

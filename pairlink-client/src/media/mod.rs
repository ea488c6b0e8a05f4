mod binding;
mod devices;
mod render;
mod stream;

pub use binding::*;
pub use devices::*;
pub use render::*;
pub use stream::*;

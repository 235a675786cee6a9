pub mod channel;
pub mod span;

pub use channel::*;
pub use span::*;

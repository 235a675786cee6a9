pub mod client;
pub mod device;
pub mod dist;
pub mod error;
pub mod module;
pub mod parameter;
pub mod sets;
pub mod snapshot;

pub use client::*;
pub use device::*;
pub use dist::*;
pub use error::*;
pub use module::*;
pub use parameter::*;
pub use sets::*;
pub use snapshot::*;

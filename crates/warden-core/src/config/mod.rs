//! Configuration loading

mod traits;

pub use traits::{WardenConfig, ENV_PREFIX};

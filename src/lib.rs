pub mod client;
pub mod errors;
pub mod types;
pub mod utils;

pub use client::Mixpanel;
pub use errors::MixpanelError;
pub use types::{Config, ConfigOverrides};

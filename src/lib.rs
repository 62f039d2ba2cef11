pub mod diagnostics;
pub mod error;
pub mod platform;

pub use platform::{Platform, default_matcher, default_spec};

//! Request handlers.

pub mod generate;
pub mod health;
pub mod presets;

pub use generate::*;
pub use health::*;
pub use presets::*;

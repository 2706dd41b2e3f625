pub mod api;
pub mod constants;
pub mod error;
mod message;
pub mod types;

pub use error::LensError;

// re-export for convenient use with `message`
pub use colored::Colorize;

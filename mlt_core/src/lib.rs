pub mod config;
pub mod error;
pub mod marker;
pub mod timecode;
pub mod warning;

pub use config::*;
pub use error::*;
pub use marker::*;
pub use timecode::*;
pub use warning::*;

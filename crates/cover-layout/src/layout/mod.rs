//! Cover layout geometry
//!
//! This module turns a cover specification into a placement plan:
//! - Document frame (scale, centred origin, fold lines, safe zones)
//! - Text block measurement
//! - Spine, back and per-variant front placements
//! - The engine tying them together in paint order

mod cover;
mod engine;
mod frame;
mod text;
mod types;

pub use cover::*;
pub use engine::*;
pub use frame::*;
pub use text::*;
pub use types::*;

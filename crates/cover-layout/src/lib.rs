pub mod catalog;
pub mod constants;
mod controller;
pub mod crop;
mod export;
pub mod layout;
mod options;
pub mod render;
mod types;
pub mod units;

pub use catalog::{Catalog, DEFAULT_FORMAT};
pub use controller::{CoverController, CoverEdit, SpinePart};
pub use crop::{CropPlacement, CropRequest, CropSession, CropState, CropTool, CropTransform, ImageSlot};
pub use export::*;
pub use layout::{CoverLayoutEngine, LayoutStyle, PlacementPlan, layout_cover};
pub use options::*;
pub use render::{RasterRenderer, RenderReport, Renderer, export_plan, render_plan};
pub use types::*;

use std::path::PathBuf;
use thiserror::Error;

mod handlers;
mod worker;

pub use worker::{CoverWorker, worker_task};

// Re-export types from library crates
pub use cover_layout::layout::{Rect, Size};
pub use cover_layout::{
    CoverEdit, CoverSpec, CropPlacement, CropTransform, ExportFormat, PlacementPlan, PrintTarget,
};
pub use cover_order::{OrderClient, OrderDetails};

/// Commands sent from UI to worker
#[derive(Debug)]
pub enum CoverCommand {
    /// The workspace was resized; only the latest queued one is laid out
    Relayout {
        workspace: Size,
    },
    Edit(CoverEdit),
    ApplyPalette {
        palette: String,
        index: usize,
    },
    LoadSpec {
        path: PathBuf,
    },
    CropStart {
        path: PathBuf,
    },
    CropZoom {
        factor: f32,
    },
    CropPan {
        dx: f32,
        dy: f32,
    },
    CropRotate,
    CropCommit,
    CropCancel,
    Export {
        output_path: PathBuf,
        target: PrintTarget,
        format: ExportFormat,
    },
    /// Render at print resolution and submit the order once
    Submit {
        details: OrderDetails,
    },
}

/// Updates sent from worker to UI
#[derive(Debug, Clone)]
pub enum CoverUpdate {
    PlanReady {
        plan: PlacementPlan,
    },
    SpecLoaded {
        spec: CoverSpec,
    },
    CropUpdated {
        view: CropView,
    },
    CropCommitted {
        placement: CropPlacement,
    },
    CropCancelled,
    Exported {
        path: PathBuf,
        width: u32,
        height: u32,
        skipped: Vec<String>,
    },
    SubmitStarted {
        order_id: String,
    },
    Submitted {
        order_id: String,
    },
    Error {
        message: String,
    },
}

/// Snapshot of an active crop for drawing the crop preview
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropView {
    pub canvas_size: f32,
    pub mask_rect: Rect,
    pub image_rect: Rect,
    pub scale: f32,
    pub zoom: f32,
    pub rotation_degrees: f32,
}

impl From<&CropTransform> for CropView {
    fn from(transform: &CropTransform) -> Self {
        Self {
            canvas_size: transform.canvas_size(),
            mask_rect: transform.mask_rect(),
            image_rect: transform.image_rect(),
            scale: transform.scale(),
            zoom: transform.zoom_factor(),
            rotation_degrees: transform.rotation_degrees(),
        }
    }
}

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error(transparent)]
    Cover(#[from] cover_layout::CoverError),
    #[error(transparent)]
    Order(#[from] cover_order::OrderError),
    #[error("No crop session is active")]
    NoCropSession,
    #[error("No submission endpoint is configured")]
    NoEndpoint,
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

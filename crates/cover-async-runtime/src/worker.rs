use crate::handlers;
use crate::{CoverCommand, CoverUpdate};
use cover_layout::{CoverController, CoverLayoutEngine, CropTool, PrintTarget};
use cover_order::OrderClient;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// State owned by the worker task
///
/// The controller holds the only mutable copy of the cover specification;
/// every plan sent to the UI is derived from it in full.
pub struct CoverWorker<C> {
    pub(crate) controller: CoverController,
    pub(crate) crop: CropTool,
    /// File being cropped, stored as the image source on commit
    pub(crate) crop_source: Option<PathBuf>,
    /// Directory that relative image sources resolve against
    pub(crate) asset_dir: PathBuf,
    pub(crate) client: Option<C>,
    pub(crate) print: PrintTarget,
}

impl<C: OrderClient> CoverWorker<C> {
    /// # Arguments
    /// * `engine` - Layout engine with its catalog and style
    /// * `asset_dir` - Base directory for relative image sources
    /// * `client` - Submission endpoint, if orders can be sent
    pub fn new(engine: CoverLayoutEngine, asset_dir: impl Into<PathBuf>, client: Option<C>) -> Self {
        Self {
            controller: CoverController::new(engine),
            crop: CropTool::new(),
            crop_source: None,
            asset_dir: asset_dir.into(),
            client,
            print: PrintTarget::default(),
        }
    }

    pub fn with_print_target(mut self, print: PrintTarget) -> Self {
        self.print = print;
        self
    }

    pub fn with_controller(mut self, controller: CoverController) -> Self {
        self.controller = controller;
        self
    }

    pub fn controller(&self) -> &CoverController {
        &self.controller
    }
}

/// Async worker task that processes cover commands and sends updates
pub async fn worker_task<C: OrderClient>(
    mut worker: CoverWorker<C>,
    mut command_rx: mpsc::UnboundedReceiver<CoverCommand>,
    update_tx: mpsc::UnboundedSender<CoverUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut worker, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command<C: OrderClient>(
    cmd: CoverCommand,
    worker: &mut CoverWorker<C>,
    command_rx: &mut mpsc::UnboundedReceiver<CoverCommand>,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    match cmd {
        CoverCommand::Relayout { mut workspace } => {
            // Drain any queued relayouts, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let CoverCommand::Relayout {
                    workspace: new_workspace,
                } = next_cmd
                {
                    log::debug!("Discarding queued relayout, using newer viewport");
                    workspace = new_workspace;
                } else {
                    // Can't put it back, so handle it before the relayout
                    Box::pin(process_command(next_cmd, worker, command_rx, update_tx)).await;
                }
            }
            handlers::handle_relayout(worker, workspace, update_tx);
        }
        CoverCommand::Edit(edit) => handlers::handle_edit(worker, edit, update_tx),
        CoverCommand::ApplyPalette { palette, index } => {
            handlers::handle_palette(worker, &palette, index, update_tx)
        }
        CoverCommand::LoadSpec { path } => handlers::handle_load_spec(worker, path, update_tx).await,
        CoverCommand::CropStart { path } => handlers::handle_crop_start(worker, path, update_tx).await,
        CoverCommand::CropZoom { factor } => {
            handlers::handle_crop_adjust(worker, update_tx, |session| session.zoom(factor))
        }
        CoverCommand::CropPan { dx, dy } => {
            handlers::handle_crop_adjust(worker, update_tx, |session| session.pan(dx, dy))
        }
        CoverCommand::CropRotate => handlers::handle_crop_adjust(worker, update_tx, |session| session.rotate()),
        CoverCommand::CropCommit => handlers::handle_crop_commit(worker, update_tx),
        CoverCommand::CropCancel => handlers::handle_crop_cancel(worker, update_tx),
        CoverCommand::Export {
            output_path,
            target,
            format,
        } => handlers::handle_export(worker, output_path, target, format, update_tx).await,
        CoverCommand::Submit { details } => handlers::handle_submit(worker, details, update_tx).await,
    }
}

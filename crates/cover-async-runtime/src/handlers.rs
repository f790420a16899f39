use crate::worker::CoverWorker;
use crate::{CoverUpdate, CropView, Result, RuntimeError, Size};
use cover_layout::{
    CoverEdit, CoverError, CoverSpec, CropSession, ExportFormat, ExportSettings, PrintTarget,
    export_plan,
};
use cover_order::{OrderClient, OrderDetails, OrderPayload};
use std::path::PathBuf;
use tokio::sync::mpsc;

fn send_error(update_tx: &mpsc::UnboundedSender<CoverUpdate>, message: String) {
    log::warn!("{}", message);
    let _ = update_tx.send(CoverUpdate::Error { message });
}

fn send_plan<C>(worker: &CoverWorker<C>, update_tx: &mpsc::UnboundedSender<CoverUpdate>) {
    let plan = worker.controller.layout();
    let _ = update_tx.send(CoverUpdate::PlanReady { plan });
}

pub fn handle_relayout<C>(
    worker: &mut CoverWorker<C>,
    workspace: Size,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    worker.controller.resize_workspace(workspace);
    send_plan(worker, update_tx);
}

pub fn handle_edit<C>(
    worker: &mut CoverWorker<C>,
    edit: CoverEdit,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    match worker.controller.apply(edit) {
        Ok(()) => {
            cancel_stale_crop(worker, update_tx);
            send_plan(worker, update_tx);
        }
        Err(e) => send_error(update_tx, format!("Edit rejected: {e}")),
    }
}

pub fn handle_palette<C>(
    worker: &mut CoverWorker<C>,
    palette: &str,
    index: usize,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    match worker.controller.apply_palette(palette, index) {
        Ok(()) => {
            cancel_stale_crop(worker, update_tx);
            send_plan(worker, update_tx);
        }
        Err(e) => send_error(update_tx, format!("Palette not applied: {e}")),
    }
}

pub async fn handle_load_spec<C>(
    worker: &mut CoverWorker<C>,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    let loaded = match CoverSpec::load(&path).await {
        Ok(spec) => spec.validate().map(|()| spec),
        Err(e) => Err(e),
    };
    match loaded {
        Ok(spec) => {
            log::info!("Loaded cover spec from {}", path.display());
            worker.controller.set_spec(spec);
            let spec = worker.controller.spec().clone();
            let _ = update_tx.send(CoverUpdate::SpecLoaded { spec });
            cancel_stale_crop(worker, update_tx);
            send_plan(worker, update_tx);
        }
        Err(e) => send_error(update_tx, format!("Failed to load {}: {e}", path.display())),
    }
}

// =============================================================================
// Crop
// =============================================================================

pub async fn handle_crop_start<C>(
    worker: &mut CoverWorker<C>,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    let Some(request) = worker.controller.crop_request() else {
        send_error(
            update_tx,
            format!(
                "The {} layout has no photo to crop",
                worker.controller.spec().layout.name()
            ),
        );
        return;
    };

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            send_error(update_tx, format!("Failed to read {}: {e}", path.display()));
            return;
        }
    };

    // Decoding is CPU-bound
    let session = tokio::task::spawn_blocking(move || CropSession::from_bytes(&bytes, request)).await;
    let started = match session {
        Ok(session) => worker.crop.start_session(session),
        Err(e) => {
            send_error(update_tx, format!("Crop decode task failed: {e}"));
            return;
        }
    };

    if started {
        worker.crop_source = Some(path);
        send_crop_view(worker, update_tx);
    } else {
        worker.crop_source = None;
        send_error(
            update_tx,
            format!("{} is not a supported image", path.display()),
        );
    }
}

fn send_crop_view<C>(worker: &CoverWorker<C>, update_tx: &mpsc::UnboundedSender<CoverUpdate>) {
    if let Some(session) = worker.crop.session() {
        let view = CropView::from(session.transform());
        let _ = update_tx.send(CoverUpdate::CropUpdated { view });
    }
}

pub fn handle_crop_adjust<C>(
    worker: &mut CoverWorker<C>,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
    adjust: impl FnOnce(&mut CropSession),
) {
    match worker.crop.session_mut() {
        Some(session) => {
            adjust(session);
            send_crop_view(worker, update_tx);
        }
        None => send_error(update_tx, RuntimeError::NoCropSession.to_string()),
    }
}

pub fn handle_crop_commit<C>(worker: &mut CoverWorker<C>, update_tx: &mpsc::UnboundedSender<CoverUpdate>) {
    let cropped_for = worker.crop.session().map(|session| *session.request());
    let (Some(request), Some(placement), Some(source)) =
        (cropped_for, worker.crop.commit(), worker.crop_source.take())
    else {
        send_error(update_tx, RuntimeError::NoCropSession.to_string());
        return;
    };

    let source = source.to_string_lossy().into_owned();
    match worker.controller.commit_crop(source, &request, placement) {
        Ok(()) => {
            let _ = update_tx.send(CoverUpdate::CropCommitted { placement });
            send_plan(worker, update_tx);
        }
        Err(e) => send_error(update_tx, format!("Crop not stored: {e}")),
    }
}

/// Cancel an active crop session whose slot shape no longer matches the
/// current layout, mask or format
fn cancel_stale_crop<C>(worker: &mut CoverWorker<C>, update_tx: &mpsc::UnboundedSender<CoverUpdate>) {
    let Some(session) = worker.crop.session() else {
        return;
    };
    let still_fits = worker
        .controller
        .crop_request()
        .is_some_and(|request| request.same_slot(session.request()));
    if !still_fits {
        log::info!("Photo slot changed shape, cancelling the crop session");
        handle_crop_cancel(worker, update_tx);
    }
}

pub fn handle_crop_cancel<C>(worker: &mut CoverWorker<C>, update_tx: &mpsc::UnboundedSender<CoverUpdate>) {
    if worker.crop.is_active() {
        worker.crop.cancel();
        worker.crop_source = None;
        let _ = update_tx.send(CoverUpdate::CropCancelled);
    }
}

// =============================================================================
// Export and submission
// =============================================================================

/// Encoded print file of the current plan
struct PrintRender {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
    skipped: Vec<String>,
}

async fn render_for_print<C>(
    worker: &CoverWorker<C>,
    target: PrintTarget,
    format: ExportFormat,
) -> Result<PrintRender> {
    let plan = worker.controller.layout();
    let settings = ExportSettings::for_print(&plan, target, format);
    let (bytes, report) = export_plan(&plan, &worker.asset_dir, settings).await?;
    let (width, height) = settings.output_size(plan.canvas);
    Ok(PrintRender {
        bytes,
        width,
        height,
        skipped: report.skipped,
    })
}

pub async fn handle_export<C>(
    worker: &CoverWorker<C>,
    output_path: PathBuf,
    target: PrintTarget,
    format: ExportFormat,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    let result: Result<PrintRender> = async {
        let render = render_for_print(worker, target, format).await?;
        tokio::fs::write(&output_path, &render.bytes)
            .await
            .map_err(CoverError::from)?;
        Ok(render)
    }
    .await;

    match result {
        Ok(render) => {
            let _ = update_tx.send(CoverUpdate::Exported {
                path: output_path,
                width: render.width,
                height: render.height,
                skipped: render.skipped,
            });
        }
        Err(e) => send_error(update_tx, format!("Failed to export cover: {e}")),
    }
}

/// Render the current cover as a print JPEG and submit it once.
///
/// Always ends with either `Submitted` or `Error`, so the UI can re-enable
/// its submit control.
pub async fn handle_submit<C: OrderClient>(
    worker: &CoverWorker<C>,
    details: OrderDetails,
    update_tx: &mpsc::UnboundedSender<CoverUpdate>,
) {
    let order_id = details.order_id.clone();
    let _ = update_tx.send(CoverUpdate::SubmitStarted {
        order_id: order_id.clone(),
    });

    let result: Result<()> = async {
        let client = worker.client.as_ref().ok_or(RuntimeError::NoEndpoint)?;
        let render = render_for_print(worker, worker.print, ExportFormat::Jpeg).await?;
        if !render.skipped.is_empty() {
            log::warn!(
                "Submitting order {} with {} missing images",
                order_id,
                render.skipped.len()
            );
        }
        let payload = OrderPayload::new(&render.bytes, &details);
        client.submit(&payload).await?;
        Ok(())
    }
    .await;

    match result {
        Ok(()) => {
            let _ = update_tx.send(CoverUpdate::Submitted { order_id });
        }
        Err(e) => send_error(update_tx, format!("Order {order_id} was not sent: {e}")),
    }
}

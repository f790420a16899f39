use cover_async_runtime::*;
use cover_layout::{CoverController, CoverLayoutEngine, ImagePosition, LayoutVariant, MaskSettings};
use cover_order::{OrderError, OrderPayload};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Records payloads and answers with a fixed outcome
#[derive(Clone, Default)]
struct FakeClient {
    sent: Arc<Mutex<Vec<OrderPayload>>>,
    reject: Option<String>,
}

impl OrderClient for FakeClient {
    fn submit(&self, payload: &OrderPayload) -> impl Future<Output = cover_order::Result<()>> + Send {
        self.sent.lock().unwrap().push(payload.clone());
        let outcome = match &self.reject {
            Some(message) => Err(OrderError::Rejected(message.clone())),
            None => Ok(()),
        };
        std::future::ready(outcome)
    }
}

/// Worker without a canvas; nothing can be rendered until a relayout
fn bare_worker(client: Option<FakeClient>) -> CoverWorker<FakeClient> {
    CoverWorker::new(CoverLayoutEngine::default(), std::env::temp_dir(), client)
        .with_print_target(PrintTarget::new(25.4))
}

/// Worker with an 800x600 canvas already in place
fn worker(client: Option<FakeClient>) -> CoverWorker<FakeClient> {
    let mut controller = CoverController::new(CoverLayoutEngine::default());
    controller.set_canvas(Size::new(800.0, 600.0));
    bare_worker(client).with_controller(controller)
}

/// Queue `commands`, run `worker` over them to completion, collect updates.
///
/// Everything is queued up front, so a relayout drains the commands behind it.
async fn run(worker: CoverWorker<FakeClient>, commands: Vec<CoverCommand>) -> Vec<CoverUpdate> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    for command in commands {
        command_tx.send(command).unwrap();
    }
    drop(command_tx);

    tokio::spawn(worker_task(worker, command_rx, update_tx))
        .await
        .unwrap();

    let mut updates = Vec::new();
    while let Ok(update) = update_rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn relayout(width: f32, height: f32) -> CoverCommand {
    CoverCommand::Relayout {
        workspace: Size::new(width, height),
    }
}

fn plans(updates: &[CoverUpdate]) -> Vec<&PlacementPlan> {
    updates
        .iter()
        .filter_map(|update| match update {
            CoverUpdate::PlanReady { plan } => Some(plan),
            _ => None,
        })
        .collect()
}

fn errors(updates: &[CoverUpdate]) -> Vec<&str> {
    updates
        .iter()
        .filter_map(|update| match update {
            CoverUpdate::Error { message } => Some(message.as_str()),
            _ => None,
        })
        .collect()
}

fn write_photo(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("photo.png");
    image::RgbaImage::from_pixel(200, 100, image::Rgba([30, 60, 90, 255]))
        .save(&path)
        .unwrap();
    path
}

#[tokio::test]
async fn test_queued_relayouts_keep_latest() {
    let updates = run(
        worker(None),
        vec![relayout(800.0, 600.0), relayout(1024.0, 800.0), relayout(1600.0, 1000.0)],
    )
    .await;

    let plans = plans(&updates);
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].canvas, Size::new(1600.0, 900.0));
}

#[tokio::test]
async fn test_other_commands_survive_relayout_drain() {
    let updates = run(
        worker(None),
        vec![
            relayout(800.0, 600.0),
            CoverCommand::Edit(CoverEdit::SetCoverColor(cover_layout::Color::rgb(0, 128, 0))),
            relayout(1200.0, 800.0),
        ],
    )
    .await;

    let plans = plans(&updates);
    assert_eq!(plans.len(), 2);
    assert_eq!(plans.last().unwrap().canvas, Size::new(1200.0, 700.0));
    assert!(errors(&updates).is_empty());
}

#[tokio::test]
async fn test_rejected_edit_reports_error() {
    let updates = run(
        worker(None),
        vec![
            relayout(800.0, 600.0),
            CoverCommand::Edit(CoverEdit::SetTextScale(3.0)),
        ],
    )
    .await;
    assert_eq!(plans(&updates).len(), 1);
    assert_eq!(errors(&updates).len(), 1);
}

#[tokio::test]
async fn test_crop_flow_stores_photo() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(dir.path());

    let updates = run(
        worker(None),
        vec![
            relayout(1200.0, 900.0),
            CoverCommand::Edit(CoverEdit::SetLayout(LayoutVariant::Magazine)),
            CoverCommand::CropStart { path: photo.clone() },
            CoverCommand::CropZoom { factor: 2.0 },
            CoverCommand::CropPan { dx: 1000.0, dy: 0.0 },
            CoverCommand::CropCommit,
        ],
    )
    .await;
    assert!(errors(&updates).is_empty(), "{:?}", errors(&updates));

    let views: Vec<&CropView> = updates
        .iter()
        .filter_map(|update| match update {
            CoverUpdate::CropUpdated { view } => Some(view),
            _ => None,
        })
        .collect();
    assert_eq!(views.len(), 3);
    assert!((views[1].zoom - 2.0).abs() < 1e-6);
    assert!(views[2].image_rect.contains_rect(&views[2].mask_rect, 1e-3));

    assert!(updates.iter().any(|u| matches!(u, CoverUpdate::CropCommitted { .. })));
    let plan = *plans(&updates).last().unwrap();
    let photo_element = plan.photos().next().unwrap();
    assert_eq!(photo_element.source, photo.to_string_lossy());
    assert!(photo_element.transform.is_some());
}

#[tokio::test]
async fn test_crop_requires_photo_layout_and_session() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(dir.path());

    let updates = run(
        worker(None),
        vec![
            CoverCommand::CropStart { path: photo },
            CoverCommand::CropZoom { factor: 2.0 },
            CoverCommand::CropCommit,
        ],
    )
    .await;
    assert_eq!(errors(&updates).len(), 3);
}

#[tokio::test]
async fn test_undecodable_crop_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.png");
    std::fs::write(&path, b"plain text").unwrap();

    let updates = run(
        worker(None),
        vec![
            CoverCommand::Edit(CoverEdit::SetLayout(LayoutVariant::PhotoText)),
            CoverCommand::CropStart { path },
            CoverCommand::CropCancel,
        ],
    )
    .await;
    assert_eq!(errors(&updates).len(), 1);
    assert!(!updates.iter().any(|u| matches!(u, CoverUpdate::CropCancelled)));
}

#[tokio::test]
async fn test_cancel_drops_session() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(dir.path());

    let updates = run(
        worker(None),
        vec![
            CoverCommand::Edit(CoverEdit::SetLayout(LayoutVariant::PhotoText)),
            CoverCommand::CropStart { path: photo },
            CoverCommand::CropCancel,
            CoverCommand::CropCommit,
        ],
    )
    .await;
    assert!(updates.iter().any(|u| matches!(u, CoverUpdate::CropCancelled)));
    // Committing after a cancel has nothing to commit
    assert_eq!(errors(&updates).len(), 1);
}

#[tokio::test]
async fn test_layout_edit_cancels_open_crop() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(dir.path());

    let updates = run(
        worker(None),
        vec![
            CoverCommand::Edit(CoverEdit::SetLayout(LayoutVariant::PhotoText)),
            CoverCommand::Edit(CoverEdit::SetMask(MaskSettings::rect(2.0))),
            CoverCommand::CropStart { path: photo },
            CoverCommand::Edit(CoverEdit::SetLayout(LayoutVariant::Magazine)),
            CoverCommand::CropCommit,
        ],
    )
    .await;
    assert!(updates.iter().any(|u| matches!(u, CoverUpdate::CropCancelled)));
    assert!(!updates.iter().any(|u| matches!(u, CoverUpdate::CropCommitted { .. })));
    // The commit finds no session left
    assert_eq!(errors(&updates).len(), 1);
    let plan = *plans(&updates).last().unwrap();
    assert_eq!(plan.photos().count(), 0);
}

#[tokio::test]
async fn test_unrelated_edit_keeps_open_crop() {
    let dir = tempfile::tempdir().unwrap();
    let photo = write_photo(dir.path());

    let updates = run(
        worker(None),
        vec![
            CoverCommand::Edit(CoverEdit::SetLayout(LayoutVariant::PhotoText)),
            CoverCommand::CropStart { path: photo },
            CoverCommand::Edit(CoverEdit::SetImagePosition(ImagePosition::Top)),
            CoverCommand::CropCommit,
        ],
    )
    .await;
    assert!(errors(&updates).is_empty(), "{:?}", errors(&updates));
    assert!(!updates.iter().any(|u| matches!(u, CoverUpdate::CropCancelled)));
    assert!(updates.iter().any(|u| matches!(u, CoverUpdate::CropCommitted { .. })));
    let plan = *plans(&updates).last().unwrap();
    assert_eq!(plan.photos().count(), 1);
}

#[tokio::test]
async fn test_submit_sends_print_jpeg_once() {
    let client = FakeClient::default();
    let details = OrderDetails::from_parts(Some("B-2".to_string()), None, None);

    let updates = run(
        worker(Some(client.clone())),
        vec![CoverCommand::Submit { details }],
    )
    .await;

    assert!(updates.iter().any(|u| matches!(u, CoverUpdate::SubmitStarted { order_id } if order_id == "B-2")));
    assert!(matches!(updates.last(), Some(CoverUpdate::Submitted { order_id }) if order_id == "B-2"));

    let sent = client.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].image_base64.starts_with("/9j/"));
    assert_eq!(sent[0].client_name, "not specified");
}

#[tokio::test]
async fn test_failed_submit_is_reported_and_worker_continues() {
    let client = FakeClient {
        reject: Some("bot offline".to_string()),
        ..FakeClient::default()
    };

    let updates = run(
        worker(Some(client.clone())),
        vec![
            CoverCommand::Submit {
                details: OrderDetails::default(),
            },
            relayout(900.0, 700.0),
        ],
    )
    .await;

    let errors = errors(&updates);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("bot offline"));
    assert!(matches!(updates.last(), Some(CoverUpdate::PlanReady { .. })));
    // Single attempt
    assert_eq!(client.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_without_canvas_never_calls_endpoint() {
    let client = FakeClient::default();
    let updates = run(
        bare_worker(Some(client.clone())),
        vec![CoverCommand::Submit {
            details: OrderDetails::default(),
        }],
    )
    .await;
    assert_eq!(errors(&updates).len(), 1);
    assert!(client.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_without_endpoint() {
    let updates = run(
        worker(None),
        vec![CoverCommand::Submit {
            details: OrderDetails::default(),
        }],
    )
    .await;
    assert_eq!(errors(&updates).len(), 1);
}

#[tokio::test]
async fn test_export_writes_print_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("cover.png");

    let updates = run(
        worker(None),
        vec![CoverCommand::Export {
            output_path: output.clone(),
            target: PrintTarget::new(25.4),
            format: ExportFormat::Png,
        }],
    )
    .await;

    let Some(CoverUpdate::Exported { width, height, .. }) = updates.last() else {
        panic!("no export: {:?}", updates);
    };
    assert_eq!((*width, *height), (656, 333));
    let written = image::open(&output).unwrap();
    assert_eq!((written.width(), written.height()), (656, 333));
}

#[tokio::test]
async fn test_load_spec_replaces_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cover.json");
    std::fs::write(&path, r##"{"layout": "magazine", "cover_color": "#112233"}"##).unwrap();

    let updates = run(
        worker(None),
        vec![relayout(800.0, 700.0), CoverCommand::LoadSpec { path }],
    )
    .await;
    let loaded = updates.iter().find_map(|update| match update {
        CoverUpdate::SpecLoaded { spec } => Some(spec),
        _ => None,
    });
    assert_eq!(loaded.unwrap().layout, LayoutVariant::Magazine);
    assert_eq!(plans(&updates).len(), 2);
}

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cover_layout::layout::{Element, Size};
use cover_layout::{
    Catalog, CoverLayoutEngine, CoverSpec, CropRequest, CropSession, ExportFormat, ExportSettings,
    LayoutStyle, LayoutVariant, MaskShape, PlacementPlan, PrintTarget, export_plan,
};
use cover_order::{HttpOrderClient, OrderClient, OrderDetails, OrderPayload};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "covert", about = "Photo book cover tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List trim formats with their bleed-inclusive document sizes
    Formats {
        /// Catalog JSON file (built-in formats if omitted)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Lay out a cover for a viewport
    Layout {
        #[command(flatten)]
        scene: SceneArgs,

        /// Print the whole placement plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Crop an image for a mask and print the committed placement as JSON
    Crop {
        /// Image to crop
        #[arg(short, long)]
        image: PathBuf,

        /// Mask aspect ratio (width / height)
        #[arg(long, default_value = "1.0")]
        aspect: f32,

        /// Use a circular mask
        #[arg(long)]
        circle: bool,

        /// Zoom factor relative to the fit scale (1 to 3)
        #[arg(long, default_value = "1.0")]
        zoom: f32,

        /// Horizontal drag in preview pixels
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        pan_x: f32,

        /// Vertical drag in preview pixels
        #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
        pan_y: f32,

        /// Quarter turns clockwise, applied before zoom and pan
        #[arg(long, default_value = "0")]
        rotate: u32,
    },

    /// Render a cover to a print file
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output image file
        #[arg(short, long)]
        output: PathBuf,

        /// Print resolution
        #[arg(long, default_value = "300")]
        dpi: f32,

        /// Output format (taken from the output extension if omitted)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Render at print resolution and submit the order once
    Submit {
        #[command(flatten)]
        scene: SceneArgs,

        /// Submission endpoint URL
        #[arg(long)]
        endpoint: String,

        #[arg(long)]
        order_id: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// Print resolution
        #[arg(long, default_value = "300")]
        dpi: f32,

        /// Request timeout in seconds
        #[arg(long, default_value = "60")]
        timeout: u64,
    },
}

/// Inputs shared by every command that lays out a cover
#[derive(Args)]
struct SceneArgs {
    /// Cover spec JSON file (defaults if omitted)
    #[arg(short, long)]
    spec: Option<PathBuf>,

    /// Catalog JSON file (built-in formats if omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Override the spec's layout variant
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Viewport width in pixels
    #[arg(long, default_value = "1280")]
    width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value = "800")]
    height: f32,

    /// Directory for relative image sources (defaults to the spec's directory)
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Icon,
    Text,
    TextIcon,
    Graphic,
    PhotoText,
    Magazine,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

impl From<LayoutArg> for LayoutVariant {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Icon => Self::Icon,
            LayoutArg::Text => Self::Text,
            LayoutArg::TextIcon => Self::TextIcon,
            LayoutArg::Graphic => Self::Graphic,
            LayoutArg::PhotoText => Self::PhotoText,
            LayoutArg::Magazine => Self::Magazine,
        }
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => Self::Png,
            FormatArg::Jpeg => Self::Jpeg,
        }
    }
}

/// Laid-out cover plus where its images live
struct Scene {
    plan: PlacementPlan,
    asset_dir: PathBuf,
}

impl SceneArgs {
    async fn build(&self) -> Result<Scene> {
        let catalog = load_catalog(self.catalog.as_deref()).await?;

        let mut spec = match &self.spec {
            Some(path) => CoverSpec::load(path)
                .await
                .with_context(|| format!("Failed to load cover spec {}", path.display()))?,
            None => CoverSpec::default(),
        };
        if let Some(layout) = self.layout {
            spec.layout = layout.into();
        }
        spec.validate()?;

        let asset_dir = match (&self.assets, &self.spec) {
            (Some(dir), _) => dir.clone(),
            (None, Some(path)) => path.parent().map(Path::to_path_buf).unwrap_or_default(),
            (None, None) => PathBuf::from("."),
        };

        let engine = CoverLayoutEngine::new(catalog, LayoutStyle::default());
        let plan = engine.layout(&spec, Size::new(self.width, self.height));
        if plan.is_empty() {
            bail!("Viewport {}x{} has no room for the cover", self.width, self.height);
        }
        Ok(Scene { plan, asset_dir })
    }
}

async fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .await
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Ok(Catalog::default()),
    }
}

fn format_for(output: &Path, format: Option<FormatArg>) -> ExportFormat {
    if let Some(format) = format {
        return format.into();
    }
    match output.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            ExportFormat::Jpeg
        }
        _ => ExportFormat::Png,
    }
}

fn print_summary(plan: &PlacementPlan) {
    let Some(frame) = &plan.frame else {
        return;
    };
    println!("Cover layout:");
    println!("  Canvas: {} x {} px", plan.canvas.width, plan.canvas.height);
    println!("  Scale: {:.3} px/mm", frame.scale);
    println!(
        "  Document: {} x {} mm ({:.1} x {:.1} px)",
        frame.document_mm.width, frame.document_mm.height, frame.document.width, frame.document.height
    );
    println!("  Guides: {}", plan.guides().count());
    for element in &plan.elements {
        match element {
            Element::Photo(photo) => println!("  Photo: {}", photo.source),
            Element::Graphic(graphic) => println!("  Graphic: {}", graphic.source),
            Element::Icon(icon) => println!("  Icon: {}", icon.source),
            Element::Placeholder(_) => println!("  Placeholder"),
            Element::Text(text) => println!("  Text ({:?}): {}", text.role, text.text.replace('\n', " / ")),
            Element::QrCode(qr) => println!("  QR code: {}", qr.payload),
            Element::Background { .. } | Element::Guide { .. } => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Formats { catalog } => {
            let catalog = load_catalog(catalog.as_deref()).await?;
            println!("Formats:");
            for (name, format) in &catalog.formats {
                println!(
                    "  {:<8} panel {} x {} mm, spine {} mm, bleed {} mm -> document {} x {} mm",
                    name,
                    format.width_mm,
                    format.height_mm,
                    format.spine_mm,
                    format.bleed_mm,
                    format.document_width_mm(),
                    format.document_height_mm()
                );
            }
        }

        Commands::Layout { scene, json } => {
            let scene = scene.build().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&scene.plan)?);
            } else {
                print_summary(&scene.plan);
            }
        }

        Commands::Crop {
            image,
            aspect,
            circle,
            zoom,
            pan_x,
            pan_y,
            rotate,
        } => {
            let mask = if circle { MaskShape::Circle } else { MaskShape::Rect };
            let request = CropRequest::new(aspect, mask);
            let bytes = tokio::fs::read(&image)
                .await
                .with_context(|| format!("Failed to read {}", image.display()))?;
            let session = tokio::task::spawn_blocking(move || CropSession::from_bytes(&bytes, request)).await?;
            let Some(mut session) = session else {
                bail!("{} is not a supported image", image.display());
            };

            for _ in 0..rotate % 4 {
                session.rotate();
            }
            session.zoom(zoom);
            session.pan(pan_x, pan_y);
            log::info!(
                "Crop at scale {:.4} (zoom {:.2}), visible source {:?}",
                session.transform().scale(),
                session.transform().zoom_factor(),
                session.transform().visible_source_rect()
            );
            println!("{}", serde_json::to_string_pretty(&session.commit())?);
        }

        Commands::Render {
            scene,
            output,
            dpi,
            format,
        } => {
            let scene = scene.build().await?;
            let format = format_for(&output, format);
            let settings = ExportSettings::for_print(&scene.plan, PrintTarget::new(dpi), format);
            let (bytes, report) = export_plan(&scene.plan, &scene.asset_dir, settings).await?;
            tokio::fs::write(&output, &bytes)
                .await
                .with_context(|| format!("Failed to write {}", output.display()))?;

            let (width, height) = settings.output_size(scene.plan.canvas);
            println!("Rendered {} x {} px at {} dpi → {}", width, height, dpi, output.display());
            for source in &report.skipped {
                println!("  Missing image: {}", source);
            }
        }

        Commands::Submit {
            scene,
            endpoint,
            order_id,
            name,
            phone,
            dpi,
            timeout,
        } => {
            let scene = scene.build().await?;
            let details = OrderDetails::from_parts(order_id, name, phone);
            let settings = ExportSettings::for_print(&scene.plan, PrintTarget::new(dpi), ExportFormat::Jpeg);
            let (bytes, report) = export_plan(&scene.plan, &scene.asset_dir, settings).await?;
            if !report.skipped.is_empty() {
                log::warn!("{} images could not be loaded", report.skipped.len());
            }

            let client = HttpOrderClient::new(endpoint, Duration::from_secs(timeout))?;
            client
                .submit(&OrderPayload::new(&bytes, &details))
                .await
                .with_context(|| format!("Order {} was not sent", details.order_id))?;
            println!("Order {} submitted to {}", details.order_id, client.endpoint());
        }
    }

    Ok(())
}

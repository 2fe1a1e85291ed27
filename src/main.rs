use clap::{Parser, Subcommand};
use kurbo::Vec2;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inklay::models::{RenderJob, Session};
use inklay::services::CanvasManager;

#[derive(Parser)]
#[command(name = "inklay")]
#[command(about = "SVG canvas compositor - compose a document over an optional background and export a PNG")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose one SVG document (plus optional background) to a PNG file
    Render {
        /// Path to the SVG document
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,

        /// Surface width in pixels
        #[arg(long, default_value_t = 800)]
        width: u32,

        /// Surface height in pixels
        #[arg(long, default_value_t = 480)]
        height: u32,

        /// Background image (PNG or JPEG)
        #[arg(short, long)]
        background: Option<PathBuf>,

        /// Background zoom percentage (100 = exactly covering)
        #[arg(long, default_value_t = 100.0)]
        zoom: f32,

        /// Background pan offset X, surface pixels
        #[arg(long, default_value_t = 0.0)]
        pan_x: f64,

        /// Background pan offset Y, surface pixels
        #[arg(long, default_value_t = 0.0)]
        pan_y: f64,
    },
    /// Run a render job described by a JSON file
    Job {
        /// Path to the job file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inklay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let cli = Cli::parse();
    let job = match cli.command {
        Commands::Render {
            input,
            output,
            width,
            height,
            background,
            zoom,
            pan_x,
            pan_y,
        } => RenderJob {
            input,
            output,
            width,
            height,
            background,
            zoom,
            pan_x,
            pan_y,
        },
        Commands::Job { file } => RenderJob::load(&file)?,
    };
    run_job(job).await
}

async fn run_job(job: RenderJob) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(&job.input)?;

    let mut session = Session::new();
    session.set_document(source);
    if let Some(path) = &job.background {
        let bytes = std::fs::read(path)?;
        session.load_background(bytes).await?;
        session.set_zoom_percent(job.zoom);
        session.pan_by(Vec2::new(job.pan_x, job.pan_y));
    }

    let manager = CanvasManager::new(job.width as f32, job.height as f32)?;
    let outcome = manager.render_everything(&session).await;
    tracing::info!(?outcome, "composed surface");

    let png = manager.export_png().await?;
    std::fs::write(&job.output, &png)?;
    tracing::info!(path = %job.output.display(), bytes = png.len(), "wrote PNG");
    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use filigree::api;
use filigree::models::AppConfig;
use filigree::server;
use filigree::services::{ComputeBackend, IdentityCompute, RemoteCompute, WatermarkPipeline};

#[derive(Parser)]
#[command(name = "filigree")]
#[command(about = "Invisible image watermarking with privacy-preserving evaluation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP compute server
    Serve,
    /// Watermark an image, evaluate robustness and write the full report
    Run {
        /// Source image (any decodable format)
        input: PathBuf,

        /// Directory for watermarked images and the results record
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Remote compute endpoint; runs the identity capability
        /// in-process when omitted
        #[arg(long)]
        compute_url: Option<String>,

        /// Skip the secure-compute evaluation pass
        #[arg(long)]
        no_compute: bool,
    },
    /// Embed the watermark only and write the marked PNG
    Embed {
        /// Source image (any decodable format)
        input: PathBuf,

        /// Output PNG file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filigree API",
        description = "Privacy-preserving compute endpoint for watermarked frequency vectors",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_compute),
    components(schemas(
        filigree::services::compute::ComputeRequest,
        filigree::services::compute::ComputeResponse,
    )),
    tags(
        (name = "Compute", description = "Opaque linear transform over coefficient vectors")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Run {
            input,
            output_dir,
            compute_url,
            no_compute,
        }) => {
            // Pipeline work is CPU-bound and uses the blocking HTTP client
            tokio::task::spawn_blocking(move || {
                run_pipeline_command(&input, output_dir, compute_url, no_compute)
            })
            .await?
        }
        Some(Commands::Embed { input, output }) => {
            tokio::task::spawn_blocking(move || run_embed_command(&input, &output)).await?
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Initialize minimal logging for CLI commands.
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filigree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Run the full watermarking + evaluation pipeline on one image.
fn run_pipeline_command(
    input: &PathBuf,
    output_dir: Option<PathBuf>,
    compute_url: Option<String>,
    no_compute: bool,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let mut config = AppConfig::load()?;
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }
    if compute_url.is_some() {
        config.compute_url = compute_url;
    }

    let pipeline = WatermarkPipeline::new(&config)?;

    let area = config.watermark.canvas * config.watermark.canvas;
    let backend: Option<Box<dyn ComputeBackend>> = if no_compute {
        None
    } else if let Some(url) = &config.compute_url {
        Some(Box::new(RemoteCompute::new(url.clone(), area)?))
    } else {
        Some(Box::new(IdentityCompute::new(area)))
    };

    let outcome = pipeline.process_file(input, backend.as_deref())?;

    println!("\nClear Domain Quality Metrics (Four-Quadrant QIM Robust Evaluation):");
    print_metrics(&outcome.clear_metrics);

    println!("\nJPEG Compressed Quality Metrics (quality {}):", config.jpeg_quality);
    print_metrics(&outcome.jpeg_metrics);

    if let Some(metrics) = &outcome.secure_metrics {
        println!("\nSecure Compute Quality Metrics (Original vs Processed):");
        print_metrics(metrics);
    }

    println!(
        "\nWatermarked image: {}\nResults record:    {}",
        outcome.watermarked_path.display(),
        outcome.record_path.display()
    );

    Ok(())
}

fn print_metrics(metrics: &qim_mark::MetricsReport) {
    println!("  psnr: {:.4}", metrics.psnr);
    println!("  ssim: {:.4}", metrics.ssim);
    println!("  watermark_accuracy: {:.4}", metrics.watermark_accuracy);
}

/// Embed the watermark into one image without evaluation.
fn run_embed_command(input: &PathBuf, output: &PathBuf) -> anyhow::Result<()> {
    init_cli_tracing();

    let config = AppConfig::load()?;
    let pipeline = WatermarkPipeline::new(&config)?;
    pipeline.embed_file(input, output)?;

    println!("Watermarked {} -> {}", input.display(), output.display());
    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("Filigree v{VERSION}");
    println!("Invisible image watermarking with privacy-preserving evaluation\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set, built-in defaults)")
    );

    let config = AppConfig::default();
    println!("\nDefault Watermark Parameters:");
    println!("  canvas       = {}x{}", config.watermark.canvas, config.watermark.canvas);
    println!("  delta        = {}", config.watermark.delta);
    println!("  offset       = {}", config.watermark.offset());
    println!("  bands        = {}", config.watermark.bands.len());
    println!("  jpeg_quality = {}", config.jpeg_quality);

    println!("\nCommands:");
    println!("  filigree serve    Start the HTTP compute server");
    println!("  filigree run      Watermark an image and evaluate robustness");
    println!("  filigree embed    Embed the watermark only");
    println!("\nRun 'filigree --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filigree=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    // Bad embedding parameters must fail at startup, not mid-request
    config.watermark.validate()?;
    let config = Arc::new(config);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    tracing::info!(
        canvas = config.watermark.canvas,
        delta = config.watermark.delta,
        "Compute capability configured"
    );

    // Create application state using shared server module
    let state = server::create_app_state(config);

    // Build router: shared API routes plus OpenAPI documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Filigree server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

use clap::Parser;
use skillmatch_api::RestApi;
use skillmatch_core::HashEmbedder;
use skillmatch_storage::{FileCatalog, ServiceConfig, SkillService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// A hybrid skill suggestion service
#[derive(Parser, Debug)]
#[command(name = "skillmatch")]
#[command(about = "Suggest skills for job roles via curated mappings and vector search", long_about = None)]
struct Args {
    /// Path to the data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Path to the active-skill catalog file (tab-delimited id and name),
    /// defaults to <data-dir>/skills.tsv
    #[arg(long)]
    skills_file: Option<PathBuf>,

    /// Path to the role mapping file, defaults to <data-dir>/role_skills.csv
    #[arg(long)]
    mapping_file: Option<PathBuf>,

    /// Embedding dimension
    #[arg(long, default_value_t = 384)]
    dimension: usize,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting skillmatch v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API port: {}", args.http_port);

    let skills_file = args
        .skills_file
        .unwrap_or_else(|| args.data_dir.join("skills.tsv"));
    let mut config = ServiceConfig::new(&args.data_dir);
    if let Some(mapping_file) = args.mapping_file {
        config.mapping_file = mapping_file;
    }
    config.dimension = args.dimension;

    let catalog = Arc::new(FileCatalog::new(&skills_file));
    let embedder = Arc::new(HashEmbedder::new(args.dimension));
    let service = Arc::new(SkillService::new(config, catalog, embedder)?);

    let ready = service.load_from_disk()?;
    if !ready {
        info!("No usable durable snapshot; building the index from the catalog");
        match service.refresh(true) {
            Ok(outcome) => info!(
                "Indexed {} skills in {:?}",
                outcome.skills_indexed, outcome.duration
            ),
            Err(err) => warn!(
                "Initial refresh failed ({err}); serving not-ready until a refresh succeeds"
            ),
        }
    }

    let service_http = service.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(service_http, http_port).await {
                eprintln!("HTTP server error: {}", e);
            }
        })
    });

    info!("skillmatch started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            service.shutdown();
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use mesh_batch::config;
use mesh_batch::images;
use mesh_batch::pipeline::job_runner::JobDescriptor;
use mesh_batch::pipeline::orchestrator::run_batch;
use mesh_batch::remote::client::CsmClient;
use mesh_batch::report;
use mesh_batch::staging::StagingDirs;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: mesh_batch <batch_dir>");
        eprintln!("  Convert the concept images under <batch_dir> into 3D mesh artifacts.");
        eprintln!("  Reads <batch_dir>/settings.yaml when present; CSM_API_KEY must be set.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("mesh_batch {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let batch_dir = Path::new(&args[0]);

    let settings = match config::load_settings(batch_dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("ERROR: Failed to load settings for {}: {e}", batch_dir.display());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = settings.validate() {
        eprintln!("ERROR: {e}");
        return ExitCode::FAILURE;
    }

    // Credentials stay out of settings.yaml; .env / environment only.
    let api_key = match std::env::var("CSM_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("ERROR: CSM_API_KEY is not set");
            return ExitCode::FAILURE;
        }
    };

    let concepts_dir = resolve_path(batch_dir, &settings.concepts_dir);
    let dirs = StagingDirs {
        result_dir: resolve_path(batch_dir, &settings.result_dir),
        processed_dir: resolve_path(batch_dir, &settings.processed_dir),
    };

    let image_files = match images::list_image_files(&concepts_dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("ERROR: Failed to list {}: {e}", concepts_dir.display());
            return ExitCode::FAILURE;
        }
    };
    println!("Found {} images to process.", image_files.len());

    let descriptors: Vec<JobDescriptor> = image_files
        .iter()
        .map(|name| JobDescriptor {
            image_id: name.clone(),
            source_path: concepts_dir.join(name),
            image_url: images::remote_image_url(&settings.image_base_url, name),
            params: settings.generation.clone(),
        })
        .collect();

    let client = match CsmClient::new(&settings.api_base, &api_key) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    let outcomes = match run_batch(
        &client,
        descriptors,
        &dirs,
        &settings.poll_config(),
        settings.workers,
    ) {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Partial failure is conveyed by the summary body; the batch itself
    // completed, so the exit code stays zero.
    println!("\nSummary:");
    print!("{}", report::render(&outcomes));
    ExitCode::SUCCESS
}

/// Resolve a potentially relative path against the batch directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

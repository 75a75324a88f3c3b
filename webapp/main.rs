/// Alzheimer's MRI classifier web UI.
///
/// A single server-rendered page: upload a scan, get the predicted stage and
/// confidence, and read about each stage. Served by a synchronous tiny_http
/// server; no JavaScript required.
///
/// Run with:
///   cargo run --bin webapp --release -- --model-path models/alzheimer_mri.json
/// Then open http://127.0.0.1:8501
mod state;
mod render;
mod routes;
mod handlers;
mod util;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tiny_http::Server;
use tracing::{error, info};

use mri_classifier::logging::init_tracing;
use mri_classifier::{ConfigArgs, ModelLoader};

use state::{AppState, SharedState};

#[derive(Parser)]
#[command(name = "webapp")]
#[command(about = "Browser UI for Alzheimer's stage classification of brain MRI scans")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    /// Address to bind, overrides server.addr from the config file
    #[arg(long)]
    addr: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let mut config = match args.config.resolve() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(addr) = args.addr {
        config.server.addr = addr;
    }

    // The model is loaded exactly once; without it no request can be served.
    let pipeline = match ModelLoader::new(&config).load() {
        Ok(p) => p,
        Err(e) => {
            error!("could not load model: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::http(config.server.addr.as_str()) {
        Ok(s) => s,
        Err(e) => {
            error!(addr = %config.server.addr, "failed to bind HTTP server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let state: SharedState = Arc::new(AppState::new(pipeline, config.server.max_upload_bytes));
    info!("open http://{} in your browser", config.server.addr);

    // One thread per request; the state is read-only so no lock is taken.
    for request in server.incoming_requests() {
        let state = Arc::clone(&state);
        std::thread::spawn(move || {
            routes::dispatch(request, &state);
        });
    }
    ExitCode::SUCCESS
}

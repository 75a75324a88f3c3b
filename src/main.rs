/// Command-line companion to the web UI.
///
///   mri-classifier predict scan1.png scan2.jpg
///   mri-classifier fetch
///   mri-classifier scaffold --out models/alzheimer_mri.json
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use mri_classifier::logging::init_tracing;
use mri_classifier::{scaffold_network, ConfigArgs, LabelSet, ModelLoader};

#[derive(Parser)]
#[command(name = "mri-classifier")]
#[command(about = "Classify brain MRI scans into Alzheimer's disease stages")]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the predicted stage and confidence for each image
    Predict {
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Download the model artifact if it is not present locally
    Fetch,
    /// Write an untrained, seeded model artifact for smoke testing
    Scaffold {
        #[arg(short, long)]
        out: PathBuf,

        #[arg(long, default_value = "32")]
        hidden: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match cli.config.resolve() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Predict { images } => {
            let pipeline = match ModelLoader::new(&config).load() {
                Ok(p) => p,
                Err(e) => {
                    error!("could not load model: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            let mut failures = 0;
            for path in &images {
                let result = std::fs::read(path)
                    .map_err(|e| e.to_string())
                    .and_then(|bytes| pipeline.classify(&bytes).map_err(|e| e.to_string()));
                match result {
                    Ok(c) => println!(
                        "{}\t{}\t{}",
                        path.display(), c.prediction.label, c.prediction.confidence_display()
                    ),
                    Err(e) => {
                        failures += 1;
                        error!(path = %path.display(), "{}", e);
                    }
                }
            }
            if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Command::Fetch => match ModelLoader::new(&config).fetch() {
            Ok(path) => {
                info!(path = %path.display(), "model artifact present");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        },
        Command::Scaffold { out, hidden, seed } => {
            let labels = match config.model.labels.clone().map(LabelSet::new).transpose() {
                Ok(l) => l.unwrap_or_default(),
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };
            let network = scaffold_network(
                config.preprocess.width, config.preprocess.height, hidden, &labels, seed,
            );
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
            match network.save_json(&out) {
                Ok(()) => {
                    info!(path = %out.display(), hidden, seed, "wrote scaffold model");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}

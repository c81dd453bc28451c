pub mod commands;

use std::path::PathBuf;

use clap::Parser;
use commands::{render::RenderCommand, Commands};
use coordinator::{sink::FileSink, Coordinator};
use log::{error, info};
use shared::{
    env,
    errors::{RenderError, RenderResult},
    kernel::mandelbrot::MandelbrotKernel,
    logger,
    models::render_config::RenderConfig,
};
use uuid::Uuid;

const DEFAULT_WORKERS: usize = 4;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    env::init();
    logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => {
            let render_id = format!("render-{}", Uuid::new_v4());
            if let Err(e) = run_render(&render_id, args).await {
                error!("{}: {}", render_id, e);
                std::process::exit(1);
            }
        }
    }
}

async fn run_render(render_id: &str, args: RenderCommand) -> RenderResult<()> {
    let total_workers = args.workers.unwrap_or(DEFAULT_WORKERS);
    let config = build_config(&args)?;
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from("mandelbrot.bin"));
    let sink = FileSink::new(output, args.png);

    info!(
        "{}: {}x{} grid, {} iterations, {} worker(s)",
        render_id,
        config.resolution.nx,
        config.resolution.ny,
        config.max_iteration,
        total_workers
    );

    let coordinator = Coordinator::new(MandelbrotKernel::default());
    let frame = coordinator.render(config, total_workers).await?;
    coordinator.deliver(&frame, &sink)?;

    info!("{}: finished, {} bytes delivered", render_id, frame.len());
    Ok(())
}

fn build_config(args: &RenderCommand) -> RenderResult<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).map_err(|e| {
                RenderError::Config(format!("failed to read {}: {}", path.display(), e))
            })?;
            RenderConfig::from_json(&raw)?
        }
        None => RenderConfig::default(),
    };

    if let Some(x) = args.center_x {
        config.center.x = x;
    }
    if let Some(y) = args.center_y {
        config.center.y = y;
    }
    if let Some(step) = args.step {
        config.step = step;
    }
    if let Some(max_iteration) = args.max_iteration {
        config.max_iteration = max_iteration;
    }
    if let Some(width) = args.width {
        config.resolution.nx = width;
    }
    if let Some(height) = args.height {
        config.resolution.ny = height;
    }

    config.validate()?;
    Ok(config)
}

use std::path::PathBuf;

use cityscape_common::GridCoord;
use cityscape_input::{ActiveInputs, MoveInput};
use cityscape_kernel::{Cityscape, CityscapeConfig};
use cityscape_procgen::{AttributeGenerator, hash_noise};
use cityscape_render::{DebugTextRenderer, RenderView, Renderer, SceneMirror};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cityscape-cli", about = "Headless cityscape driver")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML or JSON config file; defaults apply when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the generated attributes of one cell
    Sample {
        #[arg(long, allow_hyphen_values = true)]
        x: i32,
        #[arg(long, allow_hyphen_values = true)]
        z: i32,
    },
    /// Simulate a walk and print each synchronization pass
    Run {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "300")]
        ticks: u64,
        /// Milliseconds per tick
        #[arg(long, default_value = "16")]
        dt: f32,
        /// Held directions, comma separated (up, down, left, right)
        #[arg(short, long, value_delimiter = ',')]
        input: Vec<MoveInput>,
    },
    /// Print the effective config as YAML
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => CityscapeConfig::load(path)?,
        None => CityscapeConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("cityscape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", cityscape_common::crate_info());
            println!("procgen: {}", cityscape_procgen::crate_info());
            println!("stream: {}", cityscape_stream::crate_info());
            println!("input: {}", cityscape_input::crate_info());
            println!("render: {}", cityscape_render::crate_info());
            println!("kernel: {}", cityscape_kernel::crate_info());
        }
        Commands::Sample { x, z } => {
            let generator = AttributeGenerator::new(config.palette.clone())?;
            let coord = GridCoord::new(x, z);
            let attributes = generator.attributes_for(coord);
            let palette = generator.palette();
            println!("cell {coord}");
            println!("  height:    {:.4}", attributes.height);
            println!("  primary:   #{:06x}", attributes.primary.to_hex());
            println!("  secondary: #{:06x}", attributes.secondary.to_hex());
            println!(
                "  jitter:    {:.4}",
                hash_noise(coord.x, coord.z, palette.color_seed)
            );
        }
        Commands::Run { ticks, dt, input } => {
            tracing::info!(ticks, dt, inputs = ?input, "starting headless run");
            let mut city = Cityscape::new(config)?;
            let mut mirror = SceneMirror::new();
            let active = ActiveInputs::from_inputs(input);

            for _ in 0..ticks {
                let report = city.tick(dt, &active, &mut mirror)?;
                if report.created + report.updated + report.removed > 0 {
                    println!(
                        "tick {:>5}: pos=({:.2}, {:.2}) +{} ~{} -{} total={}",
                        report.tick,
                        report.position.x,
                        report.position.z,
                        report.created,
                        report.updated,
                        report.removed,
                        report.total_cells
                    );
                }
            }

            let view = RenderView::following(city.viewpoint().position);
            print!("{}", DebugTextRenderer::new().render(&mirror, &view));
            let released = city.shutdown(&mut mirror);
            tracing::info!(released, ticks = city.ticks(), "run finished");
        }
        Commands::Config => {
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

use clap::Parser;
use std::path::PathBuf;
use std::process;

use vdp_geom_pc::RunOptions;

#[derive(Parser)]
#[command(name = "vdp-geom-pc")]
#[command(about = "Render the demo cube grid through the geometry pipeline (debug host)", long_about = None)]
#[command(version)]
struct Cli {
    /// Horizontal field of view in degrees, clamped to 20-120
    #[arg(long, default_value_t = 90.0, allow_negative_numbers = true)]
    fov: f32,

    /// Near plane level; the near plane sits at view_distance >> (level + 1)
    #[arg(long, default_value_t = 7)]
    near_level: u32,

    /// Far plane distance, clamped to near..=2048
    #[arg(long, default_value_t = 1024, allow_negative_numbers = true)]
    far: i16,

    /// Number of frames to render
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Cubes per row
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..=32))]
    columns: u16,

    /// Rows of cubes
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..=32))]
    rows: u16,

    /// Write the last frame's command table as little-endian 16-bit words
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Suppress progress output (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let options = RunOptions {
        fov_degrees: cli.fov,
        near_level: cli.near_level,
        far: cli.far,
        frames: cli.frames,
        columns: cli.columns,
        rows: cli.rows,
        dump: cli.dump,
    };

    match vdp_geom_pc::run(&options) {
        Ok(summary) => {
            if !cli.quiet {
                eprintln!(
                    "Success: {} frames, {} records in the last frame ({} culled)",
                    summary.frames,
                    summary.last_frame.emitted,
                    summary.last_frame.polygons - summary.last_frame.emitted
                );
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

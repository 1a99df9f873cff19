use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use blockscape_io::{StdFileSystem, load_map, save_map};
use blockscape_lighting::LightingMode;
use blockscape_tiles::TileMeshCollection;
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

mod scene;
mod terrain;

use scene::DemoConfig;

#[derive(Parser)]
#[command(name = "blockscape", about = "Build, light, mesh and inspect voxel tile maps")]
struct Cli {
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info", global = true)]
    log_level: LevelFilter,
    /// Tile mesh definitions (TOML)
    #[arg(long, default_value = "assets/tiles.toml", global = true)]
    tiles: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a terrain map with huts, light and mesh it, and save it
    Demo {
        /// Demo map parameters (TOML)
        #[arg(long, default_value = "assets/demo.toml")]
        config: PathBuf,
        #[arg(long, default_value_t = 1337)]
        seed: i32,
        /// Output map document path
        #[arg(long, short, default_value = "demo_map.json")]
        output: String,
    },
    /// Load a map document, relight and remesh it, and print a summary
    Inspect {
        /// Map document path
        map: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let log_config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_time_level(LevelFilter::Off)
        .build();
    TermLogger::init(cli.log_level, log_config, TerminalMode::Mixed, ColorChoice::Auto)?;

    let meshes = Arc::new(TileMeshCollection::from_path(&cli.tiles)?);
    log::info!(
        target: "tilemap",
        "loaded {} tile meshes from {}",
        meshes.len() - 1,
        cli.tiles.display()
    );
    let fs = StdFileSystem::default();

    match cli.command {
        Command::Demo {
            config,
            seed,
            output,
        } => {
            let cfg = DemoConfig::from_toml_str(&std::fs::read_to_string(&config)?)?;
            let (map, mode) = scene::build_demo(&cfg, meshes, seed)?;
            save_map(&fs, &output, &map, mode)?;
            print!("{}", scene::report(&map, mode));
            println!("saved {}", output);
        }
        Command::Inspect { map } => {
            let (mut loaded, mode) = load_map(&fs, &map, meshes)?;
            loaded.set_generator(Some(scene::generator_for(mode)));
            if mode == LightingMode::None {
                // Stored light values are shown as saved.
                loaded.update_all_meshes();
            } else {
                loaded.update_dirty();
            }
            print!("{}", scene::report(&loaded, mode));
        }
    }
    Ok(())
}

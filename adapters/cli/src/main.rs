#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays scripted placement sessions against an
//! ASCII map and prints what a screen reader would speak.

mod console;
mod layout_transfer;
mod scenario;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use cellwise_core::{Cell, MapView, Priority, Settings, TerrainKind};
use cellwise_system_placement::PlacementSession;
use cellwise_world::{query, ThingSeed, World};
use clap::{Parser, Subcommand};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    console::ConsoleAnnouncer,
    layout_transfer::{LayoutSnapshot, SNAPSHOT_HEADER},
    scenario::Scenario,
};

/// Share of open soil cells that receive a tree when scattering.
const TREE_DENSITY: f64 = 0.08;

#[derive(Debug, Parser)]
#[command(name = "cellwise", version, about = "Keyboard placement overlay, driven from scripts")]
struct Cli {
    /// Log placement decisions to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replays the key script of a scenario file.
    Run {
        /// Scenario TOML file.
        scenario: PathBuf,
        /// Settings TOML file overriding the defaults.
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Scatters trees over open soil using the seed before replaying.
        #[arg(long)]
        scatter: Option<u64>,
        /// Also speaks low priority lines such as live dimensions.
        #[arg(long)]
        chatty: bool,
        /// Prints a transfer string of the final layout.
        #[arg(long)]
        export: bool,
    },
    /// Encodes an ASCII layout file as a transfer string.
    Encode {
        /// Layout text file.
        layout: PathBuf,
    },
    /// Decodes a transfer string back into ASCII rows.
    Decode {
        /// Transfer string produced by `encode`.
        value: String,
    },
}

/// Entry point for the Cellwise command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            scenario,
            settings,
            scatter,
            chatty,
            export,
        } => run(&scenario, settings.as_deref(), scatter, chatty, export),
        Command::Encode { layout } => {
            let text = fs::read_to_string(&layout)
                .with_context(|| format!("failed to read layout {}", layout.display()))?;
            let world = World::from_layout(&text).context("layout is not valid")?;
            println!("{}", LayoutSnapshot::capture(&world)?.encode()?);
            Ok(())
        }
        Command::Decode { value } => {
            let snapshot = LayoutSnapshot::decode(&value)?;
            let _ = snapshot.to_world()?;
            println!("{SNAPSHOT_HEADER} {}", snapshot.size);
            for row in &snapshot.glyphs {
                println!("{row}");
            }
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(
    path: &Path,
    settings: Option<&Path>,
    scatter: Option<u64>,
    chatty: bool,
    export: bool,
) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let scenario = Scenario::parse(&text)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    let settings = load_settings(settings)?;
    let presses = scenario.key_presses()?;

    let mut world =
        World::from_layout(&scenario.layout).context("scenario layout is not valid")?;
    if let Some(seed) = scatter {
        let planted = scatter_trees(&mut world, seed, scenario.cursor());
        info!(seed, planted, "scattered trees");
    }

    let minimum = if chatty { Priority::Low } else { Priority::Normal };
    let mut announcer = ConsoleAnnouncer::stdout(minimum);
    let cursor = scenario.cursor();
    let mut session = PlacementSession::new(
        &world,
        scenario.target.into_target(),
        scenario.shape,
        settings,
        cursor,
        &mut announcer,
    );

    for press in presses {
        if !session.is_open() {
            warn!(key = %press, "session closed before the script ended");
            break;
        }
        if !session.handle_key(&mut world, &mut announcer, press) {
            debug!(key = %press, "key ignored");
        }
    }
    debug!(
        spoken = announcer.spoken(),
        segments = session.segment_count(),
        "script finished"
    );

    println!();
    for row in query::render_layout(&world) {
        println!("{row}");
    }
    if export {
        println!("{}", LayoutSnapshot::capture(&world)?.encode()?);
    }
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("settings {} are not valid", path.display()))
}

/// Plants trees on empty soil, leaving the starting cursor clear.
fn scatter_trees(world: &mut World, seed: u64, keep_clear: Cell) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let bounds = world.bounds();
    let width = i32::try_from(bounds.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(bounds.height()).unwrap_or(i32::MAX);

    let mut planted = 0;
    for z in 0..height {
        for x in 0..width {
            let cell = Cell::new(x, z);
            let open = cell != keep_clear
                && world.terrain(cell) == Some(TerrainKind::Soil)
                && world.things_at(cell).is_empty()
                && world.zone_at(cell).is_none();
            if open
                && rng.gen_bool(TREE_DENSITY)
                && world
                    .spawn_thing(ThingSeed::tree("oak tree"), cell)
                    .is_some()
            {
                planted += 1;
            }
        }
    }
    planted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scatter_is_deterministic_per_seed() {
        let mut first = World::new(12, 12);
        let mut second = World::new(12, 12);
        let planted = scatter_trees(&mut first, 7, Cell::new(0, 0));
        assert_eq!(scatter_trees(&mut second, 7, Cell::new(0, 0)), planted);
        assert_eq!(query::render_layout(&first), query::render_layout(&second));
        assert!(first.things_at(Cell::new(0, 0)).is_empty());
    }

    #[test]
    fn scatter_skips_occupied_and_zoned_cells() {
        let mut world = World::from_layout("##SS\n##SS\n~~hh\n").expect("layout");
        assert_eq!(scatter_trees(&mut world, 3, Cell::new(0, 0)), 0);
    }

    #[test]
    fn cli_parses_run_flags() {
        let cli = Cli::try_parse_from([
            "cellwise",
            "-v",
            "run",
            "demos/wall_ring.toml",
            "--scatter",
            "9",
            "--export",
        ])
        .expect("arguments parse");
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Run {
                scatter: Some(9),
                export: true,
                chatty: false,
                ..
            }
        ));
    }

    #[test]
    fn demo_scenarios_load() {
        for text in [
            include_str!("../../../demos/wall_ring.toml"),
            include_str!("../../../demos/growing_zone.toml"),
            include_str!("../../../demos/mine_ridge.toml"),
        ] {
            let scenario = Scenario::parse(text).expect("demo parses");
            let _ = World::from_layout(&scenario.layout).expect("demo layout");
            assert!(!scenario.key_presses().expect("demo keys").is_empty());
        }
    }
}

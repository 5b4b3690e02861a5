mod scene;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use tessera_collision::{CollisionEvent, CollisionEventKind};
use tessera_spatial::{SpatialConfig, SpatialManager};
use tessera_tools::{SpatialInspector, occupancy};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tessera-cli", about = "Spatial hash grid and collision tooling")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and default configuration
    Info,
    /// Walk a player through a generated scene and report collisions
    Simulate {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Seed for scene generation and movement
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Scattered props besides tiles
        #[arg(short, long, default_value = "300")]
        props: usize,
        /// YAML config file; defaults apply to missing fields
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Half-extent of the camera viewport around the player
        #[arg(long, default_value = "240")]
        view: f32,
        /// Print the final counters as JSON
        #[arg(long)]
        json: bool,
    },
    /// Dump per-cell occupancy of a generated scene
    Grid {
        #[arg(short, long, default_value = "42")]
        seed: u64,
        #[arg(short, long, default_value = "300")]
        props: usize,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SpatialConfig> {
    let Some(path) = path else {
        return Ok(SpatialConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    SpatialConfig::from_yaml(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tessera-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("grid: {}", tessera_grid::crate_info());
            print!("{}", serde_yaml::to_string(&SpatialConfig::default())?);
        }
        Commands::Simulate {
            frames,
            seed,
            props,
            config,
            view,
            json,
        } => simulate(load_config(config.as_deref())?, frames, seed, props, view, json)?,
        Commands::Grid {
            seed,
            props,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let scene = scene::generate(seed, &config, props);
            let mut manager = SpatialManager::new(config)?;
            let tracked = scene::populate(&mut manager, &scene);
            let map = occupancy(manager.grid());
            println!(
                "{}x{} cells, {} occupied, busiest={} tracked={}",
                map.width,
                map.height,
                map.occupied(),
                map.busiest(),
                tracked
            );
            print!("{map}");
        }
    }

    Ok(())
}

fn simulate(
    config: SpatialConfig,
    frames: u64,
    seed: u64,
    props: usize,
    view: f32,
    json: bool,
) -> anyhow::Result<()> {
    let mut scene = scene::generate(seed, &config, props);
    let mut manager = SpatialManager::new(config)?;
    let tracked = scene::populate(&mut manager, &scene);
    tracing::debug!(entities = scene.entities.len(), tracked, "scene populated");
    println!("Simulate: seed={seed} frames={frames} tracked={tracked}");

    let events: Rc<RefCell<Vec<CollisionEvent>>> = Rc::default();
    {
        let events = Rc::clone(&events);
        manager.subscribe(move |event| events.borrow_mut().push(*event));
    }

    let player = scene.player;
    let mut walker = scene::Walker::new(3.0, 30, seed);
    let mut blocked = 0u64;
    let mut updated = 0usize;

    for _ in 0..frames {
        let wanted = walker.step(&scene.world);
        let moved = manager.move_with_collisions(&mut scene.world, player, wanted);
        if moved != wanted {
            blocked += 1;
        }

        manager.update(&scene.world);

        let Some(center) = scene.world.get(player).map(|d| d.position()) else {
            break;
        };
        let half = Vec2::splat(view);
        updated += manager
            .visible_or_always(&scene.world, center - half, center + half, &[player])
            .len();

        for event in events.borrow_mut().drain(..) {
            let verb = match event.kind {
                CollisionEventKind::Enter => "enter",
                CollisionEventKind::Exit => "exit",
            };
            println!("  tick {:>4}: {verb} {} {}", scene.world.tick(), event.a, event.b);
        }
        scene.world.step();
    }

    println!("{}", SpatialInspector::summary(&manager));
    if let Some(info) = SpatialInspector::inspect_entity(&scene.world, &manager, player) {
        println!("player: {info}");
    }
    println!("blocked frames={blocked} entity updates={updated}");
    if json {
        println!("{}", serde_json::to_string_pretty(&manager.performance())?);
    }
    Ok(())
}

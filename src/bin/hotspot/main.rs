//! Hotspot CLI - capture hotspot libraries and map UV scenes onto them.
//!
//! Usage: hotspot <COMMAND> [OPTIONS] <SCENE> <LIBRARY> [OUTPUT]
//!
//! Run `hotspot --help` for available commands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};

use hotspot_uv::algo::{
    map_faces_with_progress, map_to_hotspot_with_progress, map_to_trim_with_progress,
    FailurePolicy, MapOptions, MappingReport, Progress,
};
use hotspot_uv::io::{library, scene};
use hotspot_uv::library::capture_hotspots;

#[derive(Parser)]
#[command(name = "hotspot")]
#[command(author, version, about = "UV hotspot mapping CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display hotspot library information
    Info {
        /// Hotspot library file
        library: PathBuf,
    },

    /// Capture rectangular faces of a scene as a hotspot library
    Capture {
        /// Input scene file
        scene: PathBuf,

        /// Output hotspot library file
        library: PathBuf,

        /// Only capture faces of this mesh
        #[arg(short, long)]
        mesh: Option<String>,

        /// Texture the hotspots were authored on
        #[arg(short, long)]
        texture: Option<String>,
    },

    /// Map UV shells (or faces) onto the best-fit hotspots
    Map {
        #[command(flatten)]
        common: MapArgs,

        /// Map each face on its own with bounding-box alignment
        #[arg(long)]
        per_face: bool,

        /// Reject faces that are not axis-aligned rectangles
        #[arg(long, requires = "per_face")]
        strict: bool,
    },

    /// Map UV shells onto a trim sheet by vertical placement
    Trim {
        #[command(flatten)]
        common: MapArgs,
    },
}

#[derive(Args)]
struct MapArgs {
    /// Input scene file
    scene: PathBuf,

    /// Hotspot library file
    library: PathBuf,

    /// Output scene file
    output: PathBuf,

    /// Only map this mesh
    #[arg(short, long)]
    mesh: Option<String>,

    /// Use single-threaded execution (for benchmarking)
    #[arg(long)]
    sequential: bool,

    /// Stop at the first shell or face with no components or no matching hotspot
    #[arg(long)]
    abort_on_failure: bool,
}

impl MapArgs {
    fn options(&self) -> MapOptions {
        let policy = if self.abort_on_failure {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        };
        MapOptions::default()
            .with_parallel(!self.sequential)
            .with_failure_policy(policy)
    }

    fn mode(&self) -> &'static str {
        if self.sequential {
            "sequential"
        } else {
            "parallel"
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum MapMode {
    Shells,
    Faces,
    Trim,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { library } => {
            cmd_info(&library)?;
        }

        Commands::Capture {
            scene,
            library,
            mesh,
            texture,
        } => {
            cmd_capture(&scene, &library, mesh.as_deref(), texture)?;
        }

        Commands::Map {
            common,
            per_face,
            strict,
        } => {
            let mode = if per_face { MapMode::Faces } else { MapMode::Shells };
            let options = common.options().with_require_rectangles(strict);
            cmd_map(&common, mode, &options)?;
        }

        Commands::Trim { common } => {
            let options = common.options();
            cmd_map(&common, MapMode::Trim, &options)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0)); // Track highest percent seen (monotonic)

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Parallel workers can report out of order; only move forward
        let (percent, increased) = loop {
            let old_max = max_percent.load(Ordering::Relaxed);
            let new_max = old_max.max(raw_percent);
            if new_max == old_max {
                break (old_max, false);
            }
            match max_percent.compare_exchange_weak(
                old_max,
                new_max,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break (new_max, true),
                Err(_) => continue,
            }
        };

        if !increased {
            return;
        }

        let bar_width = 30;
        let filled = (percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {}", bar, space, percent, message);
        let _ = std::io::stderr().flush();

        if percent == 100 {
            eprintln!();
        }
    })
}

fn cmd_info(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let loaded = library::load(path)?;
    let library = &loaded.library;

    println!("File: {}", path.display());
    match library.texture_path() {
        Some(texture) => println!("Texture: {}", texture),
        None => println!("Texture: (none)"),
    }
    println!("Hotspots: {}", library.len());

    for hotspot in library.iter() {
        let bounds = hotspot.bounds();
        println!(
            "  {}: ({:.4}, {:.4}) to ({:.4}, {:.4}), {:.4} x {:.4}{}",
            hotspot.id(),
            bounds.min.x,
            bounds.min.y,
            bounds.max.x,
            bounds.max.y,
            bounds.width(),
            bounds.height(),
            hotspot
                .face()
                .map(|f| format!(" [{}]", f))
                .unwrap_or_default()
        );
    }

    if !loaded.unknown.is_empty() {
        println!("Ignored keys: {}", loaded.unknown.join(", "));
    }
    if !loaded.skipped.is_empty() {
        println!("Skipped entries: {}", loaded.skipped.len());
        for err in &loaded.skipped {
            println!("  {}", err);
        }
    }

    Ok(())
}

fn cmd_capture(
    scene_path: &Path,
    library_path: &Path,
    mesh: Option<&str>,
    texture: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let uv_scene = scene::load(scene_path)?;
    let faces = uv_scene.face_points(mesh)?;

    println!("Loaded: {} meshes, {} faces", uv_scene.meshes.len(), faces.len());

    let start = Instant::now();
    let captured = capture_hotspots(faces, texture)?;
    let elapsed = start.elapsed();

    library::save(&captured, library_path)?;

    println!("Captured {} hotspots in {:.2?}", captured.len(), elapsed);
    println!("Saved: {}", library_path.display());

    Ok(())
}

fn cmd_map(
    args: &MapArgs,
    mode: MapMode,
    options: &MapOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut uv_scene = scene::load(&args.scene)?;
    let loaded = library::load(&args.library)?;

    println!(
        "Loaded: {} meshes, {} hotspots",
        uv_scene.meshes.len(),
        loaded.library.len()
    );
    if !loaded.skipped.is_empty() {
        println!("Skipped {} malformed library entries", loaded.skipped.len());
    }

    let progress = create_progress();
    let host = uv_scene.host();

    let start = Instant::now();
    let report: MappingReport<_> = match mode {
        MapMode::Shells => {
            println!("Mapping shells to hotspots ({})...", args.mode());
            let selection = uv_scene.components(args.mesh.as_deref())?;
            map_to_hotspot_with_progress(&host, &selection, &loaded.library, options, &progress)?
        }
        MapMode::Faces => {
            println!("Mapping faces to hotspots ({})...", args.mode());
            let faces = uv_scene.face_selections(args.mesh.as_deref())?;
            map_faces_with_progress(&host, &faces, &loaded.library, options, &progress)?
        }
        MapMode::Trim => {
            println!("Mapping shells to trim ({})...", args.mode());
            let selection = uv_scene.components(args.mesh.as_deref())?;
            map_to_trim_with_progress(&host, &selection, &loaded.library, options, &progress)?
        }
    };
    let elapsed = start.elapsed();
    drop(host);

    println!("{}", report);
    for m in &report.matches {
        println!("  {} -> {}", m.item, m.hotspot);
    }

    let applied = uv_scene.apply(&report.result);
    scene::save(&uv_scene, &args.output)?;

    println!("Updated {} UVs in {:.2?}", applied, elapsed);
    println!("Saved: {}", args.output.display());

    Ok(())
}

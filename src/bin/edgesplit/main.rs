//! Edgesplit CLI - hard-edge splitting command-line tool.
//!
//! Usage: edgesplit <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `edgesplit --help` for available commands. Set `RUST_LOG=debug` for
//! per-phase diagnostics.

use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use edgesplit::algo::normals::{count_degenerate, face_normals};
use edgesplit::algo::split::{split_hard_edges_with_progress, SplitOptions};
use edgesplit::algo::Progress;
use edgesplit::io;
use edgesplit::mesh::{VertexMerger, VertexWelder};

#[derive(Parser)]
#[command(name = "edgesplit")]
#[command(author, version, about = "Split mesh vertices across hard edges", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Split vertices shared across hard edges
    Split {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file
        output: PathBuf,

        /// Cutoff angle between face normals (degrees unless --radians)
        #[arg(short, long, default_value = "30")]
        angle: f64,

        /// Interpret --angle in radians
        #[arg(long)]
        radians: bool,

        /// Recompute every normal instead of keeping normals of unsplit vertices
        #[arg(long)]
        recompute_all_normals: bool,

        /// Position tolerance for welding non-indexed input
        #[arg(short = 'w', long, default_value = "0.0001")]
        weld_tolerance: f64,

        /// Use single-threaded execution (for benchmarking)
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Split {
            input,
            output,
            angle,
            radians,
            recompute_all_normals,
            weld_tolerance,
            sequential,
        } => {
            let cutoff = if radians { angle } else { angle.to_radians() };
            let options = SplitOptions::with_cutoff_angle(cutoff)
                .with_preserve_unaffected_normals(!recompute_all_normals)
                .with_parallel(!sequential);
            cmd_split(&input, &output, &options, weld_tolerance)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that displays a progress bar on the terminal.
fn create_progress() -> Progress {
    let max_percent = Arc::new(AtomicUsize::new(0));

    Progress::new(move |current, total, message| {
        if total == 0 {
            return;
        }

        let raw_percent = if current >= total {
            100
        } else {
            ((current * 100) + (total / 2)) / total
        };

        // Never move backwards.
        let previous = max_percent.fetch_max(raw_percent, Ordering::Relaxed);
        if raw_percent <= previous && raw_percent != 100 {
            return;
        }

        let bar_width = 30;
        let filled = (raw_percent * bar_width) / 100;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        eprint!("\r[{}{}] {:3}% {:<24}", bar, space, raw_percent, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.vertex_count());
    println!("Triangles: {}", mesh.triangle_count());
    println!(
        "Layout: {}",
        if mesh.is_indexed() {
            "indexed"
        } else {
            "non-indexed (triangle soup)"
        }
    );

    println!("Attributes:");
    for (name, attribute) in mesh.attributes() {
        println!("  {:<10} item size {}", name, attribute.item_size());
    }

    if let Some((min, max)) = mesh.bounding_box() {
        println!(
            "Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z
        );
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    let degenerate = count_degenerate(&face_normals(&mesh, true));
    println!("Degenerate triangles: {}", degenerate);

    Ok(())
}

fn cmd_split(
    input: &PathBuf,
    output: &PathBuf,
    options: &SplitOptions,
    weld_tolerance: f64,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!(
        "Loaded: {} vertices, {} triangles{}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        if mesh.is_indexed() { "" } else { " (non-indexed)" }
    );

    let welder = VertexWelder::new().with_tolerance(weld_tolerance);
    let mode = if options.parallel { "parallel" } else { "sequential" };
    println!(
        "Splitting edges sharper than {:.2}° ({})...",
        options.cutoff_angle.to_degrees(),
        mode
    );

    let progress = create_progress();
    let start = Instant::now();
    let merger: &dyn VertexMerger = &welder;
    let result = split_hard_edges_with_progress(&mesh, options, Some(merger), &progress)?;
    let elapsed = start.elapsed();

    println!("{}", result);
    if result.merged {
        println!("Welded input to {} vertices", result.original_vertices);
    }
    if result.degenerate_triangles > 0 {
        println!("Degenerate triangles: {}", result.degenerate_triangles);
    }

    io::save(&result.mesh, output)?;
    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

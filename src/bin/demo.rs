//! userfs Demo Binary
//!
//! Runs the reference scenario: two descriptors on one file, a write through
//! the first and a read through the second.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};
use userfs::{Config, Engine, OpenMode};

/// userfs demonstration harness
#[derive(Parser, Debug)]
#[command(name = "userfs-demo")]
#[command(about = "Exercise the in-memory file system")]
#[command(version)]
struct Args {
    /// Name of the file to create
    #[arg(short, long, default_value = "file")]
    name: String,

    /// Bytes to write through the first descriptor
    #[arg(short, long, default_value = "123")]
    payload: String,

    /// Maximum bytes to read through the second descriptor
    #[arg(short, long, default_value = "2048")]
    read_size: usize,

    /// Block capacity in bytes
    #[arg(short, long, default_value = "512")]
    block_size: usize,

    /// Maximum file size in MB
    #[arg(short = 'm', long, default_value = "100")]
    max_file_mb: usize,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,userfs=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    tracing::info!("userfs demo v{}", userfs::VERSION);

    let config = Config::builder()
        .block_size(args.block_size)
        .max_file_size(args.max_file_mb * 1024 * 1024)
        .build();

    let mut engine = match Engine::new(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to create engine: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut engine, &args) {
        tracing::error!("Demo failed: {} (last error: {:?})", e, engine.last_error());
        engine.destroy_all();
        std::process::exit(1);
    }

    engine.destroy_all();
    tracing::info!("Engine destroyed");
}

fn run(engine: &mut Engine, args: &Args) -> userfs::Result<()> {
    let fd1 = engine.open(&args.name, OpenMode::Create)?;
    let fd2 = engine.open(&args.name, OpenMode::Existing)?;
    println!("fd1: {}; fd2: {}", fd1, fd2);

    let written = engine.write(fd1, args.payload.as_bytes())?;
    let data = engine.read(fd2, args.read_size)?;
    tracing::info!(written, read = data.len(), "Round trip complete");
    println!("data: {}", String::from_utf8_lossy(&data));

    engine.close(fd1)?;
    engine.close(fd2)?;
    Ok(())
}

mod cli;

use clipforge::{
    build, config,
    jobs::{self, JobContext, JobReport},
    payload,
    storage::LocalStore,
};
use clipforge_av::{EncodingParameters, PlaylistItem, StreamKind};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, JobKind};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipforge=trace,clipforge_av=trace".to_string()
        } else {
            "clipforge=debug,clipforge_av=debug".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Normalize {
            input,
            fps,
            height,
            width,
        } => normalize_file(&input, cli.config.as_deref(), fps, height, width),
        Commands::Playlist {
            inputs,
            output,
            fps,
            height,
            width,
            full,
        } => build_playlist(&inputs, &output, cli.config.as_deref(), fps, height, width, full),
        Commands::Probe { file, json } => probe_file(&file, cli.config.as_deref(), json),
        Commands::Job { kind, payload } => run_job(kind, &payload, cli.config.as_deref()),
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("clipforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn normalize_file(
    input: &Path,
    config_path: Option<&Path>,
    fps: Option<u32>,
    height: Option<u32>,
    width: Option<u32>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let toolchain = config::toolchain(&config)?;
    let params = EncodingParameters {
        width: width.or(config.normalize.width),
        height: height.unwrap_or(config.normalize.height),
        fps: fps.unwrap_or(config.normalize.fps),
    };

    tracing::info!("Normalizing file: {:?}", input);
    let outcome = build::normalize_preview(&toolchain, input, &params)?;
    if !outcome.result.success {
        anyhow::bail!("Normalization failed: {}", outcome.result.message);
    }

    println!("High def: {}", outcome.files.high_def_path.display());
    println!("Low def: {}", outcome.files.low_def_path.display());
    Ok(())
}

fn build_playlist(
    inputs: &[PathBuf],
    output: &Path,
    config_path: Option<&Path>,
    fps: Option<u32>,
    height: Option<u32>,
    width: Option<u32>,
    full: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    for input in inputs {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {:?}", input);
        }
    }

    let toolchain = config::toolchain(&config)?;
    let items: Vec<PlaylistItem> = inputs.iter().map(PlaylistItem::new).collect();

    let outcome = build::build_playlist_with_fallback(
        &toolchain,
        &items,
        output,
        width,
        height.unwrap_or(config.normalize.height),
        fps.unwrap_or(config.normalize.fps),
        full || config.playlist.full,
    )?;
    if !outcome.result.success {
        anyhow::bail!("Playlist creation failed: {}", outcome.result.message.trim());
    }

    println!("Playlist: {} ({})", output.display(), outcome.strategy);
    Ok(())
}

fn probe_file(file: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {:?}", file);
    }

    let config = config::load_config_or_default(config_path)?;
    let toolchain = config::toolchain(&config)?;
    let report = clipforge_av::probe_streams(&toolchain, file)?;

    if json {
        let json_str = serde_json::to_string_pretty(&report)?;
        println!("{}", json_str);
    } else {
        println!("File: {}", report.path.display());
        println!("Streams: {}", report.streams.len());
        for stream in &report.streams {
            print!(
                "  [{}] {} {}",
                stream.index,
                stream.kind,
                stream.codec_name.as_deref().unwrap_or("unknown")
            );
            if stream.kind == StreamKind::Video {
                if let (Some(w), Some(h)) = (stream.width, stream.height) {
                    print!(" {}x{}", w, h);
                }
            }
            println!();
        }
        println!("Audio: {}", if report.has_audio() { "yes" } else { "no" });
    }

    Ok(())
}

enum Job {
    Normalize(payload::NormalizeJob),
    Playlist(payload::PlaylistJob),
}

fn run_job(kind: JobKind, payload_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let job = match kind {
        JobKind::Normalize => Job::Normalize(payload::load_payload(payload_path)?),
        JobKind::Playlist => Job::Playlist(payload::load_payload(payload_path)?),
    };

    let toolchain = config::toolchain(&config)?;
    let ctx = JobContext::new(toolchain, LocalStore::new(&config.storage.root));

    // Keep the temp dir alive until the job is done.
    let (_tmp, workdir) = match config.workdir.path {
        Some(ref dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create workdir: {:?}", dir))?;
            (None, dir.clone())
        }
        None => {
            let tmp = tempfile::tempdir().context("Failed to create temp workdir")?;
            let dir = tmp.path().to_path_buf();
            (Some(tmp), dir)
        }
    };

    let report: JobReport = match job {
        Job::Normalize(job) => jobs::run_normalize_job(&ctx, &job, &workdir)?,
        Job::Playlist(job) => jobs::run_playlist_job(&ctx, &job, &workdir)?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    if !report.success {
        anyhow::bail!("Processing failed");
    }
    Ok(())
}

fn check_tools(config_path: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let config = config::load_config_or_default(config_path)?;
    let toolchain = clipforge_av::Toolchain::new(
        config
            .tools
            .ffmpeg_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffmpeg")),
        config
            .tools
            .ffprobe_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("ffprobe")),
    );

    let tools = clipforge_av::check_tools(&toolchain);
    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version.lines().next().unwrap_or(""));
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Install ffmpeg to enable processing.");
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            print_config_summary(&config);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            print_config_summary(&config);
        }
    }

    Ok(())
}

fn print_config_summary(config: &config::Config) {
    let width = config
        .normalize
        .width
        .map_or_else(|| "auto".to_string(), |w| w.to_string());
    println!(
        "  Normalize: {}x{} @ {} fps",
        width, config.normalize.height, config.normalize.fps
    );
    println!("  Playlist full re-encode: {}", config.playlist.full);
    println!("  Storage root: {}", config.storage.root.display());
    println!("  Bucket prefix: {:?}", config.storage.bucket_prefix);
}

// orbit-sim: Desktop driver for the orbit scene engine
//
// Replays a surface lifecycle with a scripted drag and tilt against the
// headless engine, then prints (and optionally saves) the resulting scene.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use orbit_scene::HeadlessSurface;
use orbit_session::{InitOptions, SceneDocument};
use std::path::PathBuf;

use orbit_sim::{Script, parse_pair, replay};

#[derive(Parser)]
#[command(name = "orbit-sim", about = "Replay scene sessions against the headless engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one session: create, drag, draw N frames, destroy
    Run {
        /// Scene document to start from (missing file = empty scene)
        #[arg(short, long)]
        scene: Option<PathBuf>,

        /// Init options JSON (colours, move strength)
        #[arg(short, long)]
        options: Option<PathBuf>,

        /// Number of frames to draw
        #[arg(short, long, default_value = "60")]
        frames: u32,

        /// Drag gesture "dx,dy" in pixels, applied before the first frame
        #[arg(short, long, value_parser = parse_drag, allow_hyphen_values = true)]
        drag: Option<[f32; 2]>,

        /// Gravity x component held during the run
        #[arg(short, long, allow_hyphen_values = true)]
        tilt: Option<f32>,

        /// Surface size "WIDTHxHEIGHT"
        #[arg(long, default_value = "1080x2340")]
        size: String,

        /// Write the resulting scene document here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Validate an init options file and/or a scene document
    Check {
        #[arg(short, long)]
        scene: Option<PathBuf>,

        #[arg(short, long)]
        options: Option<PathBuf>,
    },
}

fn parse_drag(text: &str) -> Result<[f32; 2], String> {
    parse_pair(text).map_err(|e| format!("{:#}", e))
}

fn parse_size(text: &str) -> Result<HeadlessSurface> {
    let Some((w, h)) = text.split_once('x') else {
        anyhow::bail!("surface size must look like 1080x2340, got {:?}", text);
    };
    Ok(HeadlessSurface {
        width: w.trim().parse()?,
        height: h.trim().parse()?,
    })
}

fn load_options(options: Option<&PathBuf>, scene: Option<&PathBuf>) -> Result<InitOptions> {
    let mut opts = match options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            InitOptions::from_json(&text)?
        }
        None => InitOptions::default(),
    };
    if let Some(path) = scene {
        opts.scene = SceneDocument::load_from(path)?;
    }
    opts.validate()?;
    Ok(opts)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            scene,
            options,
            frames,
            drag,
            tilt,
            size,
            save,
        } => {
            let opts = load_options(options.as_ref(), scene.as_ref())?;
            let script = Script {
                surface: parse_size(&size)?,
                frames,
                drag,
                tilt,
                ..Script::default()
            };
            let outcome = replay(&opts, &script)?;

            println!("frames:  {}", outcome.frames);
            println!("redraws: {}", outcome.redraws);
            println!(
                "camera:  ({:.3}, {:.3}, {:.3})",
                outcome.eye[0], outcome.eye[1], outcome.eye[2]
            );
            println!("objects: {}", outcome.document.objects.len());

            if let Some(path) = save {
                outcome.document.save_to(&path)?;
                tracing::info!("scene saved to {}", path.display());
            }
        }
        Commands::Check { scene, options } => {
            let opts = load_options(options.as_ref(), scene.as_ref())?;
            println!("{}", serde_json::to_string_pretty(&opts)?);
            println!("ok");
        }
    }

    Ok(())
}

use anyhow::{bail, Context, Result};
use clap::Parser;
use futurecity::{
    app::{self, LaunchOptions},
    city::CityConfig,
    export::{render_frame, write_png},
    presets::{self, PRESETS},
    score::{compare, compute_scores, Metric},
    settings::{load_settings, settings_path, Settings},
    share::parse_query,
};
use std::{fs::File, path::PathBuf, sync::Mutex};
use tracing::{info, warn};

#[derive(Parser, Debug, Clone)]
#[command(name = "futurecity")]
#[command(about = "Design a city of the future and watch its skyline")]
struct Cli {
    /// Start from a share link query, e.g. "env=coastal&pop=40&nrg=tidal"
    #[arg(long, conflicts_with = "preset")]
    share: Option<String>,

    /// Start from a named scenario (see --list-presets)
    #[arg(long)]
    preset: Option<String>,

    /// Render one frame to this PNG file and exit
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export width in pixels
    #[arg(long, default_value_t = 960)]
    width: u32,

    /// Export height in pixels
    #[arg(long, default_value_t = 540)]
    height: u32,

    /// Animation timestamp for the exported frame (milliseconds)
    #[arg(long, default_value_t = 0.0)]
    time_ms: f64,

    /// Print the five scores and exit
    #[arg(long, default_value_t = false)]
    scores: bool,

    /// Print a score comparison against another share link and exit
    #[arg(long)]
    compare: Option<String>,

    /// Frame rate cap for the interactive view
    #[arg(long)]
    fps: Option<u32>,

    /// Force monochrome (no colors)
    #[arg(long, default_value_t = false)]
    mono: bool,

    /// Freeze the animated overlay
    #[arg(long, default_value_t = false)]
    reduce_motion: bool,

    /// Write logs to this file during the interactive view
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// List the scenario cards and exit
    #[arg(long, default_value_t = false)]
    list_presets: bool,
}

impl Cli {
    fn headless(&self) -> bool {
        self.list_presets || self.scores || self.compare.is_some() || self.export.is_some()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let (config, name) = resolve_city(&cli)?;
    info!(?config, name = name.as_deref().unwrap_or(""), "city resolved");

    if cli.list_presets {
        for (i, p) in PRESETS.iter().enumerate() {
            println!("{}. {:<18} {:<20} {}", i + 1, p.slug, p.title, p.tagline);
        }
        return Ok(());
    }

    if cli.scores {
        let s = compute_scores(&config);
        for m in Metric::ALL {
            println!("{:<15} {:>3}", m.label(), s.get(m));
        }
        return Ok(());
    }

    if let Some(query) = &cli.compare {
        let other = parse_query(query).config;
        println!("{:<15} {:>7} {:>7} {:>6}", "", "current", "other", "delta");
        for row in compare(&compute_scores(&config), &compute_scores(&other)) {
            println!(
                "{:<15} {:>7} {:>7} {:>+6}",
                row.metric.label(),
                row.left,
                row.right,
                row.delta
            );
        }
        return Ok(());
    }

    if let Some(path) = &cli.export {
        if cli.width == 0 || cli.height == 0 {
            bail!("export size must be non-zero, got {}x{}", cli.width, cli.height);
        }
        let frame = render_frame(&config, cli.width, cli.height, cli.time_ms);
        write_png(&frame, path).with_context(|| format!("exporting {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let (settings, settings_path) = session_settings(&cli);
    app::run(LaunchOptions {
        config,
        name,
        settings,
        settings_path,
    })
}

fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.headless() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    } else if let Some(path) = &cli.log_file {
        // the interactive view owns stdout/stderr
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
    Ok(())
}

fn resolve_city(cli: &Cli) -> Result<(CityConfig, Option<String>)> {
    if let Some(query) = &cli.share {
        let shared = parse_query(query);
        return Ok((shared.config, shared.name));
    }
    if let Some(slug) = &cli.preset {
        let Some(p) = presets::find(slug) else {
            let known: Vec<_> = PRESETS.iter().map(|p| p.slug).collect();
            bail!("unknown preset {slug:?}; try one of: {}", known.join(", "));
        };
        return Ok((p.config(), Some(p.title.to_string())));
    }
    Ok((CityConfig::default(), None))
}

fn session_settings(cli: &Cli) -> (Settings, Option<PathBuf>) {
    let path = match settings_path() {
        Ok(p) => Some(p),
        Err(err) => {
            warn!(%err, "settings will not be persisted");
            None
        }
    };
    let mut settings = path.as_deref().map(load_settings).unwrap_or_default();
    if let Some(fps) = cli.fps {
        settings.fps_cap = fps;
    }
    if cli.mono {
        settings.enable_color = false;
    }
    if cli.reduce_motion {
        settings.reduce_motion = true;
    }
    (settings, path)
}

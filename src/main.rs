use anyhow::Result;
use clap::{Parser, ValueEnum};
use neon_snake::game::{GridConfig, MapPreset, SpeedPreset};
use neon_snake::logging::init_tracing;
use neon_snake::modes::{PlayMode, PlaySettings};
use neon_snake::storage::JsonScoreStore;
use neon_snake::variant::Variant;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "neon_snake")]
#[command(version, about = "Grid snake game for the terminal")]
struct Cli {
    /// Game variant
    #[arg(long, value_enum, default_value = "neon")]
    variant: VariantArg,

    /// Board size preset
    #[arg(long, value_enum, default_value = "small")]
    map: MapArg,

    /// Speed preset
    #[arg(long, value_enum, default_value = "normal")]
    speed: SpeedArg,

    /// Override the preset column count
    #[arg(long)]
    cols: Option<usize>,

    /// Override the preset row count
    #[arg(long)]
    rows: Option<usize>,

    /// Override the preset tick interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seed for food placement (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for saved scores
    #[arg(long, default_value = ".neon_snake")]
    data_dir: PathBuf,

    /// Log file, used when RUST_LOG is set (defaults to <data-dir>/neon_snake.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Frame-gated ticks with a rainbow body
    Pro,
    /// Fixed-rate ticks with a cyan body
    Neon,
    /// Fixed-rate ticks with a color-cycling body
    NeonRgb,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Pro => Variant::Pro,
            VariantArg::Neon => Variant::Neon,
            VariantArg::NeonRgb => Variant::NeonRgb,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum MapArg {
    Small,
    Medium,
    Large,
}

impl From<MapArg> for MapPreset {
    fn from(arg: MapArg) -> Self {
        match arg {
            MapArg::Small => MapPreset::Small,
            MapArg::Medium => MapPreset::Medium,
            MapArg::Large => MapPreset::Large,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SpeedArg {
    Slow,
    Normal,
    Fast,
    Insane,
}

impl From<SpeedArg> for SpeedPreset {
    fn from(arg: SpeedArg) -> Self {
        match arg {
            SpeedArg::Slow => SpeedPreset::Slow,
            SpeedArg::Normal => SpeedPreset::Normal,
            SpeedArg::Fast => SpeedPreset::Fast,
            SpeedArg::Insane => SpeedPreset::Insane,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("neon_snake.log"));
    init_tracing(&log_file)?;

    let variant = Variant::from(cli.variant);
    let map = MapPreset::from(cli.map);
    let speed = SpeedPreset::from(cli.speed);

    // Presets first, explicit overrides on top
    let mut config = GridConfig::from_presets(map, speed);
    if let Some(cols) = cli.cols {
        config.cols = cols;
    }
    if let Some(rows) = cli.rows {
        config.rows = rows;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.tick_interval_ms = tick_ms;
    }
    config.validate()?;

    let board_label = if (config.cols, config.rows) == map.dimensions() {
        format!("{} ({}x{})", map.as_str(), config.cols, config.rows)
    } else {
        format!("Custom ({}x{})", config.cols, config.rows)
    };
    let speed_label = if config.tick_interval_ms == speed.tick_interval_ms() {
        format!("{} ({} ms)", speed.as_str(), config.tick_interval_ms)
    } else {
        format!("Custom ({} ms)", config.tick_interval_ms)
    };

    info!(
        variant = variant.title(),
        cols = config.cols,
        rows = config.rows,
        tick_ms = config.tick_interval_ms,
        "starting"
    );

    let store = JsonScoreStore::new(&cli.data_dir, variant.namespace());
    let settings = PlaySettings {
        variant,
        config,
        board_label,
        speed_label,
        seed: cli.seed,
    };

    let mut play_mode = PlayMode::new(settings, Box::new(store))?;
    play_mode.run().await?;

    Ok(())
}

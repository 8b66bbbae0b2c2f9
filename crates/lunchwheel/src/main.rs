use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lunchwheel_core::catalog::Catalog;
use lunchwheel_tui::app::App;
use lunchwheel_tui::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "lunchwheel", version, about = "A terminal spin-the-wheel food picker")]
struct Cli {
    /// Path to config file (default: ~/.config/lunchwheel/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Theme name or custom theme file stem (overrides config)
    #[arg(short, long)]
    theme: Option<String>,

    /// Seed for reproducible spins
    #[arg(long)]
    seed: Option<u64>,

    /// Options to preselect, comma separated (e.g. "Pizza,Sushi")
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<String>,

    /// Disable quick stop while the wheel is spinning
    #[arg(long)]
    no_quick_stop: bool,

    /// City shown on the result screen (overrides detection)
    #[arg(long)]
    city: Option<String>,

    /// Print the available options and exit
    #[arg(long)]
    list: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref());

    // Initialize logging to file
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lunchwheel");
    std::fs::create_dir_all(&log_dir)?;
    let log_file = std::fs::File::create(log_dir.join("lunchwheel.log"))?;

    let directive = format!("lunchwheel={}", config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(log_file)
        .with_ansi(false)
        .init();

    info!("Lunchwheel starting");

    // Apply CLI overrides
    if let Some(theme) = cli.theme {
        config.general.theme = theme;
    }
    if let Some(city) = cli.city {
        config.general.city = Some(city);
    }
    if cli.no_quick_stop {
        config.spin.quick_stop = false;
    }

    if cli.list {
        let builtin_count = Catalog::builtin().len();
        let catalog = Catalog::with_custom(config.custom_options(builtin_count)?)?;
        for option in catalog.options() {
            println!("{}", option.display_name());
        }
        return Ok(());
    }

    let mut app = App::new(config, cli.seed, cli.select)?;
    app.run().await?;

    info!(
        "Lunchwheel exiting after {} spins",
        app.session().history().len()
    );
    Ok(())
}

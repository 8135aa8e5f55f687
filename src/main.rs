use clap::Parser;
use lectern::core::{config, settings};
use log::warn;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lectern", version, about = "Read the Bible in your terminal")]
struct Args {
    /// Translation code to open, e.g. KJV
    #[arg(short, long)]
    translation: Option<String>,

    /// Colour theme name, e.g. "Dracula"
    #[arg(long)]
    theme: Option<String>,

    /// Log level for ~/.lectern/lectern.log
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn log_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".lectern"))
        .filter(|dir| fs::create_dir_all(dir).is_ok())
        .map(|dir| dir.join("lectern.log"))
        .unwrap_or_else(|| PathBuf::from("lectern.log"))
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The terminal belongs to the UI, so logs only go to a file
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(log_path()) {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("Lectern {} starting up", env!("CARGO_PKG_VERSION"));

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Using default config: {}", e);
        eprintln!("lectern: {e}; using defaults");
        config::LecternConfig::default()
    });
    let cli = config::CliOverrides {
        translation: args.translation,
        theme: args.theme,
    };
    let resolved = config::resolve(&file_config, &settings::load(), &cli);

    lectern::tui::run(resolved)
}

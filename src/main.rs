use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use medchat::core::config::{self, MedchatConfig};
use medchat::tui;

#[derive(Parser)]
#[command(name = "medchat", about = "Terminal client for the MedChat assistant")]
struct Args {
    /// Chat server URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Log verbosity
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (the terminal belongs to the UI)
    #[arg(long, default_value = "medchat.log")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    match File::create(&args.log_file) {
        Ok(log_file) => {
            let _ = WriteLogger::init(args.log_level, log_config, log_file);
        }
        Err(e) => eprintln!("Cannot open log file {}: {}", args.log_file.display(), e),
    }

    info!("MedChat starting up");

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        MedchatConfig::default()
    });
    let resolved = config::resolve(&file_config, args.base_url.as_deref());
    info!("Resolved config: {:?}", resolved);

    tui::run(resolved)
}

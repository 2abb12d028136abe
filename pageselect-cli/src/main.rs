mod app;
mod command;
mod paths;
mod render;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::info;
use pageselect_lib::error::Error;
use pageselect_lib::model::DEFAULT_PAGE_SIZE;
use pageselect_lib::source::HttpPageSource;
use pageselect_lib::source::InMemoryPageSource;
use pageselect_lib::{ControllerConfig, TableController};
use simplelog::{Config, LevelFilter, WriteLogger};

use app::App;
use app::SharedSource;

const DEFAULT_URL: &str = "https://api.artic.edu/api/v1/artworks";
const DEFAULT_COLUMNS: &str = "title,place_of_origin,artist_display,inscriptions,date_start,date_end";

/// pageselect - select rows across pages of a remote dataset
#[derive(Debug, Parser)]
#[command(name = "pageselect")]
#[command(version, long_about = None)]
struct Cli {
    /// Collection endpoint returning `data` and `pagination.total`
    #[arg(long, env = "PAGESELECT_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Rows per page (sent as `limit`)
    #[arg(long, env = "PAGESELECT_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    /// Fields to show, in order; also requested from the endpoint
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_COLUMNS)]
    columns: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Serve N generated rows instead of calling the endpoint
    #[arg(long, value_name = "N")]
    demo: Option<usize>,

    /// Log file (defaults to pageselect.log in the cache directory)
    #[arg(long, env = "PAGESELECT_LOG")]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,
}

fn parse_level(text: &str) -> Result<LevelFilter, String> {
    text.parse()
        .map_err(|_| format!("unknown log level '{}'", text))
}

fn init_logging(cli: &Cli) {
    let Some(path) = cli.log_file.clone().or_else(paths::default_log_file) else {
        eprintln!("warning: no log directory available, logging disabled");
        return;
    };

    if let Err(e) = paths::prepare_log_file(&path) {
        eprintln!("warning: cannot rotate log file {}: {}", path.display(), e);
    }

    match File::create(&path) {
        Ok(file) => {
            if WriteLogger::init(cli.log_level, Config::default(), file).is_err() {
                eprintln!("warning: logger already initialized");
            }
        }
        Err(e) => eprintln!("warning: cannot create log file {}: {}", path.display(), e),
    }
}

fn build_source(cli: &Cli) -> Result<SharedSource, Error> {
    if let Some(total) = cli.demo {
        info!("serving {} generated rows", total);
        let source = InMemoryPageSource::sample(total, cli.page_size)
            .with_latency(Duration::from_millis(300));
        return Ok(Arc::new(source));
    }

    let source = HttpPageSource::builder()
        .url(&cli.url)
        .limit(cli.page_size)
        .fields(&cli.columns)
        .timeout(Duration::from_secs(cli.timeout))
        .build()?;
    info!("paging through {}", source.base_url());
    Ok(Arc::new(source))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let source = match build_source(&cli) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = ControllerConfig::default().with_page_size(cli.page_size);
    let table = TableController::new(source, config);

    if let Err(e) = App::run(table, cli.columns).await {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

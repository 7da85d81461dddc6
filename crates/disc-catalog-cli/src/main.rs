use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use disc_catalog::output::write_csv_file;
use disc_catalog::pipeline::DEFAULT_WORKERS;
use disc_catalog::timestamp::update_html_file;
use disc_catalog::types::ProductRef;
use disc_catalog::{Pipeline, PipelineConfig, WebScraper};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "disc-catalog")]
#[command(about = "An infinitediscs.com disc catalog scraper", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[arg(
        long,
        default_value = disc_catalog::BASE_URL,
        global = true,
        help = "Base URL of the store to scrape"
    )]
    base_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every manufacturer and disc, write the CSV and stamp the webpage
    Run {
        #[arg(
            short = 'o',
            long = "output",
            default_value = "docs/discs.csv",
            help = "Path of the CSV file to write"
        )]
        output: PathBuf,

        #[arg(
            long,
            default_value = "docs/index.html",
            help = "Webpage whose last-update span is patched"
        )]
        html: PathBuf,

        #[arg(long, help = "Do not patch the webpage timestamp")]
        skip_timestamp: bool,

        #[arg(
            short = 'w',
            long,
            default_value_t = DEFAULT_WORKERS as u8,
            help = "Number of pages fetched concurrently",
            value_parser = clap::value_parser!(u8).range(1..=64)
        )]
        workers: u8,
    },
    /// List manufacturers found in the store's navigation menu
    Manufacturers {
        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Fetch a single disc page and show every extracted attribute
    Detail {
        #[arg(help = "URL or path of the disc detail page")]
        url: String,

        #[arg(long, default_value = "unknown", help = "Manufacturer to tag the disc with")]
        manufacturer: String,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    let scraper = WebScraper::with_base_url(&cli.base_url).unwrap_or_else(|e| {
        log::error!("Error creating scraper: {}", e);
        process::exit(1);
    });

    match cli.command {
        Commands::Run {
            output,
            html,
            skip_timestamp,
            workers,
        } => {
            let start = Instant::now();
            let pipeline = Pipeline::new(
                scraper,
                PipelineConfig {
                    workers: usize::from(workers),
                },
            );

            let records = pipeline.run().await.unwrap_or_else(|e| {
                log::error!("Error scraping disc catalog: {}", e);
                process::exit(1);
            });

            write_csv_file(&records, &output).unwrap_or_else(|e| {
                log::error!("Error writing {}: {}", output.display(), e);
                process::exit(1);
            });

            log::info!(
                "Data load complete. Took {} minute(s)",
                start.elapsed().as_secs() / 60
            );

            if skip_timestamp {
                log::info!("Timestamp update skipped");
            } else {
                log::info!("Updating last-updated timestamp on webpage...");
                let today = chrono::Local::now().date_naive();
                update_html_file(&html, today).unwrap_or_else(|e| {
                    log::error!("Error updating {}: {}", html.display(), e);
                    process::exit(1);
                });
            }
        }

        Commands::Manufacturers { format } => {
            let manufacturers = scraper.fetch_manufacturers().await.unwrap_or_else(|e| {
                log::error!("Error fetching manufacturers: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&manufacturers),
                OutputFormat::Text => {
                    if manufacturers.is_empty() {
                        println!("No manufacturers found.");
                    } else {
                        for (i, manufacturer) in manufacturers.iter().enumerate() {
                            println!("{:>3}. {}", i + 1, manufacturer);
                        }
                    }
                }
            }
        }

        Commands::Detail {
            url,
            manufacturer,
            format,
        } => {
            let product = ProductRef {
                manufacturer,
                link: scraper.absolute_url(&url),
            };
            log::info!("Fetching disc detail from {}...", product.link);

            let mut record = scraper.fetch_product(&product).await.unwrap_or_else(|e| {
                log::error!("Error fetching disc detail: {}", e);
                process::exit(1);
            });
            record.derive_stability();

            match format {
                OutputFormat::Json => serialize_json(&record),
                OutputFormat::Text => println!("{}", record),
            }
        }
    }
}

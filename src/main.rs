use catalog_harvest::results::to_pretty_json;
use catalog_harvest::utils::output_file_name;
use catalog_harvest::{Harvest, HarvestConfig, Progress, ProgressEvent};
use clap::Parser;
use std::path::PathBuf;

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match HarvestConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => HarvestConfig::default(),
    };

    if args.list {
        for source in &config.sources {
            println!("{:<32} {}", source.name, source.entry_url);
        }
        return;
    }

    let wanted = args.site.as_deref().unwrap_or_default();
    let Some(source) = config.source(wanted).cloned() else {
        ::log::error!("No catalog source named {:?} (see --list)", wanted);
        std::process::exit(2);
    };

    println!("Note: catalog discovery requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default {}",
        config.webdriver_url
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(output_file_name(&source.name)));

    let (progress, mut rx) = Progress::channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                ProgressEvent::Status(message) => eprintln!("{}", message),
                ProgressEvent::Fetched { completed, total } => {
                    eprint!("\r[{}/{}] product pages", completed, total);
                    if completed == total {
                        eprintln!();
                    }
                }
            }
        }
    });

    let mut harvest = Harvest::from_config(&config, source).with_progress(progress);
    if let Some(concurrency) = args.concurrency {
        harvest = harvest.with_max_concurrency(concurrency);
    }
    if let Some(url) = &args.webdriver_url {
        harvest = harvest.with_webdriver_url(url);
    }
    if args.headed {
        harvest = harvest.with_headless(false);
    }

    ::log::info!(
        "Harvesting {} using {}",
        harvest.source().name,
        harvest.source().strategy.label()
    );
    let start_time = std::time::Instant::now();
    let result = harvest.run().await;
    // The harvest owned the last sender, so the printer drains and exits
    let _ = printer.await;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Harvest failed: {}", e);
            std::process::exit(1);
        }
    };

    if report.records.is_empty() {
        ::log::warn!("Finished without any product records");
        if let Some(e) = &report.discovery_error {
            eprintln!("Discovery error: {}", e);
        }
        std::process::exit(1);
    }

    let json = match to_pretty_json(&report.records) {
        Ok(json) => json,
        Err(e) => {
            ::log::error!("Failed to serialize records: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&output, json) {
        ::log::error!("Failed to write {}: {}", output.display(), e);
        std::process::exit(1);
    }

    ::log::info!(
        "Harvest complete - {} links, {} records in {:.2} seconds",
        report.urls.len(),
        report.records.len(),
        start_time.elapsed().as_secs_f64()
    );
    println!(
        "Wrote {} records to {}",
        report.records.len(),
        output.display()
    );
}

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(about = "Collects product data from JavaScript-rendered catalogs")]
#[command(version)]
pub struct Args {
    /// Catalog source to harvest (name or name prefix, see --list)
    #[arg(short, long, required_unless_present = "list")]
    pub site: Option<String>,

    /// JSON configuration file (built-in sources when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List the configured sources and exit
    #[arg(long)]
    pub list: bool,

    /// Output file (defaults to data_<source>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of concurrent detail requests
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// URL of the WebDriver server
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Show the browser window
    #[arg(long)]
    pub headed: bool,
}

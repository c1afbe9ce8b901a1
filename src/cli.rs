use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Submit a URL to a scraping backend and render the results")]
pub struct Cli {
    /// Page to scrape. May be omitted with --list-sites.
    pub url: Option<String>,

    /// Backend scraping mode, e.g. news or google_maps
    #[arg(short = 't', long)]
    pub scraper_type: Option<String>,

    /// Show the raw JSON payload instead of result cards
    #[arg(long)]
    pub raw: bool,

    /// Export format to download after a successful scrape (repeatable)
    #[arg(short, long = "export")]
    pub exports: Vec<String>,

    /// Where to write the rendered HTML page
    #[arg(short, long, default_value = "results.html")]
    pub out: PathBuf,

    /// Directory for downloaded exports (overrides EXPORT_DIR)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Backend base URL (overrides SCRAPE_BASE_URL)
    #[arg(long)]
    pub base_url: Option<String>,

    /// List the sites the backend supports and exit
    #[arg(long)]
    pub list_sites: bool,
}

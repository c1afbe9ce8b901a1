use std::process::ExitCode;

use clap::Parser;
use scrape_presenter::{
    api::models::{ScrapeForm, ScraperType},
    config::{parse_base_url, Config, RenderMode},
    dispatcher::SubmitOutcome,
    view::HtmlView,
    Presenter,
};
use tracing::{error, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();

    // Load configuration, then let flags win
    let mut config = Config::load()?;
    if let Some(base) = &args.base_url {
        config.base_url = parse_base_url(base)?;
    }
    if let Some(dir) = &args.export_dir {
        config.export_dir = dir.clone();
    }
    if args.raw {
        config.render_mode = RenderMode::RawJson;
    }
    info!(base_url = %config.base_url, export_dir = %config.export_dir.display(), "Presenter configured");

    let presenter = Presenter::from_config(&config)?;

    if args.list_sites {
        for site in presenter.supported_sites().await? {
            println!("{}\t{}", site.name, site.url);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut form = ScrapeForm::new(args.url.clone().unwrap_or_default());
    if let Some(raw_type) = &args.scraper_type {
        form = form.with_scraper_type(raw_type.parse::<ScraperType>()?);
    }

    let mut view = HtmlView::new(config.export_dir.clone());
    let outcome = presenter.submit(&mut view, &form).await;

    let mut failed = matches!(outcome, SubmitOutcome::Failed(_));
    if view.export_controls_visible {
        for format in &args.exports {
            if presenter.export(&mut view, format).await.is_err() {
                failed = true;
            }
        }
    }

    let heading = format!("Results for {}", form.url.trim());
    tokio::fs::write(&args.out, view.to_page(&heading)).await?;
    info!(path = %args.out.display(), ?outcome, "Wrote results page");

    if let Some(message) = &view.error {
        error!("{}", message);
    }
    for path in &view.downloads {
        println!("{}", path.display());
    }

    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

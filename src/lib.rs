pub mod api;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod export;
pub mod render;
pub mod view;

use std::path::PathBuf;

use api::client::BackendClient;
use api::models::{ScrapeForm, SupportedSite};
use config::Config;
use dispatcher::{Dispatcher, SubmitOutcome};
use error::Result;
use export::Exporter;
use render::Renderer;
use view::View;

/// Submits scrape requests, renders their results and fetches exports, all
/// against one backend.
#[derive(Debug)]
pub struct Presenter {
    client: BackendClient,
    dispatcher: Dispatcher,
    exporter: Exporter,
}

impl Presenter {
    pub fn new(client: BackendClient, renderer: Renderer, config: &Config) -> Self {
        Presenter {
            dispatcher: Dispatcher::new(client.clone(), renderer, config.render_mode),
            exporter: Exporter::new(client.clone()),
            client,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = BackendClient::from_config(config)?;
        Ok(Self::new(client, Renderer::default(), config))
    }

    pub async fn submit<V: View + ?Sized>(&self, view: &mut V, form: &ScrapeForm) -> SubmitOutcome {
        self.dispatcher.submit(view, form).await
    }

    pub async fn export<V: View + ?Sized>(&self, view: &mut V, format: &str) -> Result<PathBuf> {
        self.exporter.export(view, format).await
    }

    pub async fn supported_sites(&self) -> Result<Vec<SupportedSite>> {
        self.client.supported_sites().await
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

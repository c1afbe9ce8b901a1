use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{error, info};

use crate::api::client::BackendClient;
use crate::error::{PresenterError, Result};
use crate::view::{Download, View};

const EXPORT_FILE_STEM: &str = "news_data";

/// Formats the backend can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Txt,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Json, ExportFormat::Txt];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Txt => "txt",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
            ExportFormat::Txt => "text/plain",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", EXPORT_FILE_STEM, self.as_str())
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PresenterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "txt" | "text" => Ok(ExportFormat::Txt),
            other => Err(PresenterError::Validation(format!(
                "Unsupported export format: {}",
                other
            ))),
        }
    }
}

/// Fetches exports and hands them to the view as downloads.
#[derive(Clone, Debug)]
pub struct Exporter {
    client: BackendClient,
}

impl Exporter {
    pub fn new(client: BackendClient) -> Self {
        Exporter { client }
    }

    /// Parses `format`, fetches the export and offers it as a download.
    /// Failures are shown on the view and returned; nothing is downloaded.
    pub async fn export<V: View + ?Sized>(&self, view: &mut V, format: &str) -> Result<PathBuf> {
        let result = match format.parse::<ExportFormat>() {
            Ok(format) => self.fetch_and_offer(view, format).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            error!(requested = %format, error = %e, "Export failed");
            view.show_error(&e.user_message());
        }
        result
    }

    async fn fetch_and_offer<V: View + ?Sized>(
        &self,
        view: &mut V,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        let bytes = self.client.export(format).await?;
        info!(%format, bytes = bytes.len(), "Export fetched");

        view.offer_download(Download {
            file_name: format.file_name(),
            content_type: format.content_type(),
            bytes,
        })
    }
}

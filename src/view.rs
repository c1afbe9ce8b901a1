//! The surface results are presented on.
//!
//! Every component receives the view explicitly instead of looking up global
//! elements. [`HtmlView`] is the stock implementation: it keeps the visible
//! state in memory, assembles a standalone HTML page from it, and writes
//! downloads into an export directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::export::ExportFormat;
use crate::render::html_escape;

/// A file handed to the user. The bytes are opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait View {
    fn set_submit_enabled(&mut self, enabled: bool);
    fn set_loading(&mut self, loading: bool);

    /// Removes rendered cards, raw output and any empty-state message, and
    /// hides the results container.
    fn clear_results(&mut self);
    fn clear_error(&mut self);
    fn show_error(&mut self, message: &str);

    fn append_card(&mut self, html: String);
    fn show_raw(&mut self, text: String);
    fn set_results_visible(&mut self, visible: bool);
    fn set_export_controls_visible(&mut self, visible: bool);
    fn show_empty_state(&mut self, message: &str);

    /// Offers a file to the user without leaving the current page. Returns
    /// where the file ended up.
    fn offer_download(&mut self, download: Download) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct HtmlView {
    pub submit_enabled: bool,
    pub loading: bool,
    pub cards: Vec<String>,
    pub raw: Option<String>,
    pub error: Option<String>,
    pub empty_state: Option<String>,
    pub results_visible: bool,
    pub export_controls_visible: bool,
    pub downloads: Vec<PathBuf>,
    export_dir: PathBuf,
}

impl HtmlView {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        HtmlView {
            submit_enabled: true,
            loading: false,
            cards: Vec::new(),
            raw: None,
            error: None,
            empty_state: None,
            results_visible: false,
            export_controls_visible: false,
            downloads: Vec::new(),
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Renders the current state as a complete HTML document. Hidden sections
    /// are left out.
    pub fn to_page(&self, heading: &str) -> String {
        let mut body = String::new();

        if let Some(error) = &self.error {
            body.push_str(&format!(
                r#"<div id="error" class="error">{}</div>"#,
                html_escape(error)
            ));
            body.push('\n');
        }

        if let Some(empty) = &self.empty_state {
            body.push_str(&format!(
                r#"<div id="empty" class="empty-state">{}</div>"#,
                html_escape(empty)
            ));
            body.push('\n');
        }

        if self.results_visible {
            body.push_str(r#"<section id="results">"#);
            body.push('\n');
            if let Some(raw) = &self.raw {
                body.push_str(&format!("<pre>{}</pre>\n", html_escape(raw)));
            }
            body.push_str(r#"<div id="articlesList" class="articles">"#);
            body.push('\n');
            for card in &self.cards {
                body.push_str(card);
                body.push('\n');
            }
            body.push_str("</div>\n</section>\n");
        }

        if self.export_controls_visible {
            let formats: Vec<String> = ExportFormat::ALL
                .iter()
                .map(|f| format!(r#"<li class="format">{}</li>"#, f.file_name()))
                .collect();
            let links: Vec<String> = self
                .downloads
                .iter()
                .filter_map(|p| p.file_name().map(|name| (p, name)))
                .map(|(path, name)| {
                    format!(
                        r#"<li><a href="{}" download>{}</a></li>"#,
                        html_escape(&path.display().to_string()),
                        html_escape(&name.to_string_lossy())
                    )
                })
                .collect();

            body.push_str(r#"<section id="exportButtons"><h2>Exports</h2>"#);
            body.push_str(&format!(r#"<ul class="formats">{}</ul>"#, formats.join("")));
            if !links.is_empty() {
                body.push_str(&format!(r#"<ul class="downloads">{}</ul>"#, links.join("")));
            }
            body.push_str("</section>\n");
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<h1>{title}</h1>
{body}<footer>Rendered {rendered_at}</footer>
</body>
</html>
"#,
            title = html_escape(heading),
            css = CSS,
            body = body,
            rendered_at = Utc::now().to_rfc3339(),
        )
    }
}

impl View for HtmlView {
    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn clear_results(&mut self) {
        self.cards.clear();
        self.raw = None;
        self.empty_state = None;
        self.results_visible = false;
    }

    fn clear_error(&mut self) {
        self.error = None;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn append_card(&mut self, html: String) {
        self.cards.push(html);
    }

    fn show_raw(&mut self, text: String) {
        self.raw = Some(text);
    }

    fn set_results_visible(&mut self, visible: bool) {
        self.results_visible = visible;
    }

    fn set_export_controls_visible(&mut self, visible: bool) {
        self.export_controls_visible = visible;
    }

    fn show_empty_state(&mut self, message: &str) {
        self.empty_state = Some(message.to_string());
    }

    fn offer_download(&mut self, download: Download) -> Result<PathBuf> {
        let path = write_download(&self.export_dir, &download)?;
        self.downloads.push(path.clone());
        Ok(path)
    }
}

/// Writes the bytes next to their final name and renames into place, so a
/// failed write never leaves a partial file under the real name.
pub fn write_download(dir: &Path, download: &Download) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let final_path = dir.join(&download.file_name);
    let part_path = dir.join(format!("{}.part", download.file_name));
    debug!(path = %part_path.display(), bytes = download.bytes.len(), "Writing download");

    let written = fs::write(&part_path, &download.bytes)
        .and_then(|_| fs::rename(&part_path, &final_path));

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(&part_path) {
            warn!(path = %part_path.display(), error = %cleanup, "Failed to remove partial download");
        }
        return Err(e.into());
    }

    info!(path = %final_path.display(), content_type = download.content_type, "Download saved");
    Ok(final_path)
}

const CSS: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 860px; margin: 2rem auto; color: #222; }
.error { background: #fdecea; color: #b3261e; padding: .75rem 1rem; border-radius: 6px; }
.empty-state { color: #666; font-style: italic; }
.articles { display: grid; gap: 1rem; }
.card { background: #fff; padding: 1.5rem; border-radius: 8px; box-shadow: 0 1px 4px rgba(0,0,0,.12); }
.card h3 { margin: 0 0 .5rem; }
.card a { color: #2563eb; text-decoration: none; }
.card img { max-width: 100%; border-radius: 4px; margin-bottom: .75rem; }
.card .description { color: #4b5563; }
.card .meta { display: flex; justify-content: space-between; font-size: .85rem; color: #6b7280; }
pre { background: #f5f5f5; padding: 1rem; overflow-x: auto; }
footer { margin-top: 2rem; font-size: .8rem; color: #999; }
"#;

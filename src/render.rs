use once_cell::sync::Lazy;
use serde_json::Value;
use tracing::{debug, info};

use crate::api::models::{Field, ResultRecord};
use crate::view::View;

pub const NO_RESULTS_MESSAGE: &str = "No results found";
const UNTITLED: &str = "Untitled";

/// How a single field is turned into markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayRule {
    /// `<h3>` holding the value, linked to the record's `link` when present.
    Heading,
    /// `<p>` with the given class.
    Paragraph(&'static str),
    /// `<span>` with the given class, collected into the card's meta row.
    Meta(&'static str),
    /// `<img>` using the value as source and the title as alt text.
    Image,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub field: Field,
    pub rule: DisplayRule,
}

impl FieldRule {
    pub const fn new(field: Field, rule: DisplayRule) -> Self {
        FieldRule { field, rule }
    }
}

/// Ordered field rules describing one card layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTemplate {
    pub card_class: &'static str,
    pub rules: Vec<FieldRule>,
}

// Image, title, description, then source and date in the footer row.
static DEFAULT_TEMPLATE: Lazy<CardTemplate> = Lazy::new(|| CardTemplate {
    card_class: "card",
    rules: vec![
        FieldRule::new(Field::ImageUrl, DisplayRule::Image),
        FieldRule::new(Field::Title, DisplayRule::Heading),
        FieldRule::new(Field::Description, DisplayRule::Paragraph("description")),
        FieldRule::new(Field::Source, DisplayRule::Meta("source")),
        FieldRule::new(Field::Date, DisplayRule::Meta("date")),
    ],
});

impl Default for CardTemplate {
    fn default() -> Self {
        DEFAULT_TEMPLATE.clone()
    }
}

impl CardTemplate {
    /// Builds the markup for one record. Absent fields drop their fragment;
    /// a missing title falls back to a placeholder so the card stays usable.
    pub fn render_card(&self, record: &ResultRecord) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(self.rules.len());
        let mut meta: Vec<String> = Vec::new();

        for FieldRule { field, rule } in &self.rules {
            let value = record.field(*field);
            match rule {
                DisplayRule::Heading => {
                    let text = html_escape(value.unwrap_or(UNTITLED));
                    let heading = match record.link.as_deref().and_then(safe_href) {
                        Some(href) => format!(
                            r#"<h3><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></h3>"#,
                            html_escape(href),
                            text
                        ),
                        None => format!("<h3>{}</h3>", text),
                    };
                    parts.push(heading);
                }
                DisplayRule::Paragraph(class) => {
                    if let Some(v) = value {
                        parts.push(format!(r#"<p class="{}">{}</p>"#, class, html_escape(v)));
                    }
                }
                DisplayRule::Meta(class) => {
                    if let Some(v) = value {
                        meta.push(format!(r#"<span class="{}">{}</span>"#, class, html_escape(v)));
                    }
                }
                DisplayRule::Image => {
                    if let Some(src) = value.and_then(safe_href) {
                        let alt = record.title.as_deref().unwrap_or("");
                        parts.push(format!(
                            r#"<img src="{}" alt="{}" loading="lazy">"#,
                            html_escape(src),
                            html_escape(alt)
                        ));
                    }
                }
            }
        }

        if !meta.is_empty() {
            parts.push(format!(r#"<div class="meta">{}</div>"#, meta.join("")));
        }

        format!(r#"<div class="{}">{}</div>"#, self.card_class, parts.join(""))
    }
}

/// Turns result records into cards on a view.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    template: CardTemplate,
}

impl Renderer {
    pub fn new(template: CardTemplate) -> Self {
        Renderer { template }
    }

    pub fn template(&self) -> &CardTemplate {
        &self.template
    }

    /// Replaces whatever the view showed with one card per record and returns
    /// the number of cards. An empty slice shows the empty state and keeps the
    /// export controls hidden.
    pub fn render<V: View + ?Sized>(&self, view: &mut V, records: &[ResultRecord]) -> usize {
        view.clear_results();

        if records.is_empty() {
            debug!("No records to render");
            view.show_empty_state(NO_RESULTS_MESSAGE);
            view.set_export_controls_visible(false);
            return 0;
        }

        for record in records {
            view.append_card(self.template.render_card(record));
        }
        view.set_results_visible(true);
        view.set_export_controls_visible(true);

        info!(count = records.len(), "Rendered result cards");
        records.len()
    }

    /// Shows a payload as pretty-printed JSON instead of cards.
    pub fn render_raw<V: View + ?Sized>(&self, view: &mut V, payload: &Value) {
        view.clear_results();
        let text = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
        view.show_raw(text);
        view.set_results_visible(true);
        view.set_export_controls_visible(true);
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Accepts http(s) and relative references; any other scheme (`javascript:`,
/// `data:`) is dropped. A prefix before `:` only counts as a scheme when it
/// has scheme syntax, so `story?at=10:30` stays a relative reference.
fn safe_href(href: &str) -> Option<&str> {
    let Some((prefix, _)) = href.trim_start().split_once(':') else {
        return Some(href);
    };

    let mut chars = prefix.chars();
    let is_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if !is_scheme || prefix.eq_ignore_ascii_case("http") || prefix.eq_ignore_ascii_case("https") {
        Some(href)
    } else {
        None
    }
}

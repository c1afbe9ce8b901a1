use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PresenterError;

/// One scraped item as returned by the backend.
///
/// Field names are canonical; the backend variants disagree on naming, so
/// deserialization accepts these aliases:
///
/// | canonical     | aliases                          |
/// |---------------|----------------------------------|
/// | `description` | `summary`, `excerpt`, `content`  |
/// | `date`        | `published_date`, `timestamp`    |
/// | `image_url`   | `image`                          |
///
/// When several aliases are present the canonical name wins, then the
/// aliases in table order. Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRecord")]
pub struct ResultRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ResultRecord {
    pub fn titled(title: impl Into<String>) -> Self {
        ResultRecord {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Looks up a canonical field by name.
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => self.title.as_deref(),
            Field::Link => self.link.as_deref(),
            Field::Description => self.description.as_deref(),
            Field::Date => self.date.as_deref(),
            Field::Source => self.source.as_deref(),
            Field::ImageUrl => self.image_url.as_deref(),
        }
    }
}

/// Canonical record fields, used by card templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Link,
    Description,
    Date,
    Source,
    ImageUrl,
}

// Every alias is its own slot so records carrying two spellings of the same
// field still deserialize.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    link: Option<Value>,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    summary: Option<Value>,
    #[serde(default)]
    excerpt: Option<Value>,
    #[serde(default)]
    content: Option<Value>,
    #[serde(default)]
    date: Option<Value>,
    #[serde(default)]
    published_date: Option<Value>,
    #[serde(default)]
    timestamp: Option<Value>,
    #[serde(default)]
    source: Option<Value>,
    #[serde(default)]
    image_url: Option<Value>,
    #[serde(default)]
    image: Option<Value>,
}

impl From<RawRecord> for ResultRecord {
    fn from(raw: RawRecord) -> Self {
        ResultRecord {
            title: text(raw.title),
            link: text(raw.link),
            description: text(raw.description)
                .or_else(|| text(raw.summary))
                .or_else(|| text(raw.excerpt))
                .or_else(|| text(raw.content)),
            date: text(raw.date)
                .or_else(|| text(raw.published_date))
                .or_else(|| text(raw.timestamp)),
            source: text(raw.source),
            image_url: text(raw.image_url).or_else(|| text(raw.image)),
        }
    }
}

/// Scalars become display text; null, blank, arrays and objects are absent.
fn text(value: Option<Value>) -> Option<String> {
    let s = match value? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `deserialize_with` helper: any JSON value, read through [`text`].
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(text(Option::<Value>::deserialize(deserializer)?))
}

/// Backend-side scraping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScraperType {
    News,
    GoogleMaps,
    ECommerce,
    SocialMedia,
    JobBoard,
    Custom,
}

impl ScraperType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScraperType::News => "news",
            ScraperType::GoogleMaps => "google_maps",
            ScraperType::ECommerce => "e_commerce",
            ScraperType::SocialMedia => "social_media",
            ScraperType::JobBoard => "job_board",
            ScraperType::Custom => "custom",
        }
    }
}

impl fmt::Display for ScraperType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScraperType {
    type Err = PresenterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "news" => Ok(ScraperType::News),
            "google_maps" => Ok(ScraperType::GoogleMaps),
            "e_commerce" => Ok(ScraperType::ECommerce),
            "social_media" => Ok(ScraperType::SocialMedia),
            "job_board" => Ok(ScraperType::JobBoard),
            "custom" => Ok(ScraperType::Custom),
            other => Err(PresenterError::Validation(format!(
                "Unknown scraper type: {}",
                other
            ))),
        }
    }
}

/// Fields submitted to `POST /scrape`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeForm {
    pub url: String,
    pub scraper_type: Option<ScraperType>,
}

impl ScrapeForm {
    pub fn new(url: impl Into<String>) -> Self {
        ScrapeForm {
            url: url.into(),
            scraper_type: None,
        }
    }

    pub fn with_scraper_type(mut self, scraper_type: ScraperType) -> Self {
        self.scraper_type = Some(scraper_type);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedSite {
    pub name: String,
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn aliases_collapse_to_canonical_fields() {
        let record: ResultRecord = serde_json::from_value(json!({
            "title": "Budget approved",
            "summary": "Council votes 7-2",
            "published_date": "2024-03-01",
            "image": "https://img.example.com/a.png"
        }))
        .unwrap();

        assert_eq!(record.description.as_deref(), Some("Council votes 7-2"));
        assert_eq!(record.date.as_deref(), Some("2024-03-01"));
        assert_eq!(record.image_url.as_deref(), Some("https://img.example.com/a.png"));
        assert_eq!(record.link, None);
    }

    #[test]
    fn canonical_name_wins_over_alias() {
        let record: ResultRecord = serde_json::from_value(json!({
            "title": "t",
            "description": "canonical",
            "summary": "alias",
            "excerpt": "another alias"
        }))
        .unwrap();
        assert_eq!(record.description.as_deref(), Some("canonical"));
    }

    #[test]
    fn blank_and_non_scalar_values_are_absent() {
        let record: ResultRecord = serde_json::from_value(json!({
            "title": "   ",
            "description": "",
            "date": 1709251200,
            "source": null,
            "link": ["https://a", "https://b"],
            "extra_field": {"ignored": true}
        }))
        .unwrap();

        assert_eq!(record.title, None);
        assert_eq!(record.description, None);
        assert_eq!(record.date.as_deref(), Some("1709251200"));
        assert_eq!(record.source, None);
        assert_eq!(record.link, None);
    }

    #[test]
    fn scraper_type_parses_wire_names() {
        assert_eq!("news".parse::<ScraperType>().unwrap(), ScraperType::News);
        assert_eq!("Google-Maps".parse::<ScraperType>().unwrap(), ScraperType::GoogleMaps);
        assert_eq!(ScraperType::JobBoard.to_string(), "job_board");
        assert!(matches!(
            "weather".parse::<ScraperType>(),
            Err(PresenterError::Validation(_))
        ));
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::models::{lenient_text, ResultRecord, SupportedSite};
use crate::error::{Result, SCRAPE_FALLBACK_MESSAGE};

pub const STATUS_SUCCESS: &str = "success";

/// Envelope returned by `POST /scrape`.
///
/// Decoding never fails on an object body: `status` and `message` may be
/// missing or of any JSON type, and `data` stays untyped until records are
/// asked for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub scraped_data: Vec<ResultRecord>,
}

impl ScrapeResponse {
    pub fn success(records: Vec<ResultRecord>) -> Self {
        ScrapeResponse {
            status: Some(STATUS_SUCCESS.to_string()),
            message: None,
            data: Some(json!({ "scraped_data": records })),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ScrapeResponse {
            status: Some("error".to_string()),
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// Message to surface for a non-success payload.
    pub fn failure_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| SCRAPE_FALLBACK_MESSAGE.to_string())
    }

    /// Decodes `data.scraped_data` into records. Missing data means no
    /// records; a shape that is not a list of records is a transport error.
    pub fn records(&self) -> Result<Vec<ResultRecord>> {
        match &self.data {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(data) => Ok(ScrapeData::deserialize(data)?.scraped_data),
        }
    }

    /// True when `data.scraped_data` is absent, null or an empty array,
    /// whatever the items would look like.
    pub fn has_no_raw_records(&self) -> bool {
        match self.data.as_ref().and_then(|d| d.get("scraped_data")) {
            None | Some(Value::Null) => true,
            Some(Value::Array(items)) => items.is_empty(),
            Some(_) => false,
        }
    }
}

/// Envelope returned by `GET /supported-sites`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesResponse {
    pub status: String,
    #[serde(default)]
    pub data: Vec<SupportedSite>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_payload_without_data_parses() {
        let resp: ScrapeResponse =
            serde_json::from_value(json!({"status": "error", "message": "boom"})).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.failure_message(), "boom");
        assert!(resp.records().unwrap().is_empty());
    }

    #[test]
    fn missing_or_blank_message_uses_fallback() {
        let resp: ScrapeResponse = serde_json::from_value(json!({"status": "error"})).unwrap();
        assert_eq!(resp.failure_message(), SCRAPE_FALLBACK_MESSAGE);

        let blank: ScrapeResponse =
            serde_json::from_value(json!({"status": "error", "message": "  "})).unwrap();
        assert_eq!(blank.failure_message(), SCRAPE_FALLBACK_MESSAGE);
    }

    #[test]
    fn loose_envelopes_still_decode() {
        let no_status: ScrapeResponse =
            serde_json::from_value(json!({"message": "Rate limited"})).unwrap();
        assert!(!no_status.is_success());
        assert_eq!(no_status.failure_message(), "Rate limited");

        let framework_error: ScrapeResponse =
            serde_json::from_value(json!({"detail": "Unsupported site"})).unwrap();
        assert_eq!(framework_error.failure_message(), SCRAPE_FALLBACK_MESSAGE);

        let odd_types: ScrapeResponse =
            serde_json::from_value(json!({"status": 500, "message": {"code": 7}})).unwrap();
        assert!(!odd_types.is_success());
        assert_eq!(odd_types.failure_message(), SCRAPE_FALLBACK_MESSAGE);
    }

    #[test]
    fn success_payload_yields_records() {
        let resp: ScrapeResponse = serde_json::from_value(json!({
            "status": "success",
            "data": {
                "url": "https://news.example.com",
                "scraped_data": [{"title": "a"}, {"title": "b", "excerpt": "x"}]
            }
        }))
        .unwrap();

        assert!(resp.is_success());
        let records = resp.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].description.as_deref(), Some("x"));
        assert!(!resp.has_no_raw_records());
    }

    #[test]
    fn raw_emptiness_ignores_item_shape() {
        let scalars: ScrapeResponse = serde_json::from_value(json!({
            "status": "success",
            "data": { "scraped_data": ["a", 1] }
        }))
        .unwrap();
        assert!(!scalars.has_no_raw_records());
        assert!(scalars.records().is_err());

        let empty = ScrapeResponse::success(Vec::new());
        assert!(empty.has_no_raw_records());
        assert!(ScrapeResponse::error("x").has_no_raw_records());
    }
}

//! Aladin open-API client.
//!
//! Synchronous ureq client for the three lookup endpoints
//! (`ItemSearch.aspx`, `ItemList.aspx`, `ItemLookUp.aspx`). The API takes a
//! TTB key on every call, speaks JSON with `output=js`, and reports
//! application-level failures inside a 200 response body — those are
//! surfaced as [`CatalogError::Api`], distinct from transport failures.

use std::time::Duration;

use serde_json::Value;

use crate::error::CatalogError;

use super::{BookItem, Catalog, DESCRIPTION_OPT_RESULT, ListParams, LookupParams, SearchParams};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "http://www.aladin.co.kr/ttb/api/";
/// Pinned API version; response schemas changed across versions.
const API_VERSION: &str = "20131101";
/// Request timeout for catalog calls.
const TIMEOUT_SECS: u64 = 25;

/// Client for the Aladin TTB API.
pub struct AladinClient {
    ttb_key: String,
    base_url: String,
    timeout: Duration,
}

impl AladinClient {
    /// Create a client.
    ///
    /// A missing key fails fast here — the point of use — rather than on
    /// the first network call.
    pub fn new(ttb_key: Option<String>) -> Result<Self, CatalogError> {
        let ttb_key = ttb_key.filter(|k| !k.is_empty()).ok_or(CatalogError::MissingKey)?;
        Ok(Self {
            ttb_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(TIMEOUT_SECS),
        })
    }

    /// Override the API root (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = url;
        self
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Vec<BookItem>, CatalogError> {
        let url = format!("{}{endpoint}", self.base_url);
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();

        let mut request = agent
            .get(&url)
            .query("ttbkey", &self.ttb_key)
            .query("output", "js")
            .query("Version", API_VERSION);
        for (key, value) in params {
            request = request.query(key, value);
        }

        tracing::debug!(endpoint, "catalog request");

        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(status, _) => CatalogError::Http {
                status,
                endpoint: endpoint.to_string(),
            },
            ureq::Error::Transport(t) => CatalogError::Transport {
                message: t.to_string(),
            },
        })?;

        let body: Value = response
            .into_json()
            .map_err(|e| CatalogError::Decode {
                message: e.to_string(),
            })?;

        if let Some(message) = api_error_message(&body) {
            return Err(CatalogError::Api { message });
        }

        match body.get("item") {
            Some(items) => serde_json::from_value(items.clone()).map_err(|e| {
                CatalogError::Decode {
                    message: e.to_string(),
                }
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Application-level error reported inside a success response body.
fn api_error_message(body: &Value) -> Option<String> {
    if let Some(message) = body.get("errorMessage").and_then(Value::as_str) {
        let code = body.get("errorCode").map(Value::to_string).unwrap_or_default();
        return Some(if code.is_empty() {
            message.to_string()
        } else {
            format!("{message} (code {code})")
        });
    }
    body.get("error").map(Value::to_string)
}

impl Catalog for AladinClient {
    fn search(&self, params: &SearchParams) -> Result<Vec<BookItem>, CatalogError> {
        let mut query = vec![
            ("Query", params.query.clone()),
            ("SearchTarget", "Book".to_string()),
            ("start", params.start.max(1).to_string()),
            ("MaxResults", params.max_results.min(50).to_string()),
            ("Sort", "Accuracy".to_string()),
            ("Cover", "Big".to_string()),
            ("OptResult", DESCRIPTION_OPT_RESULT.to_string()),
        ];
        if let Some(id) = params.category_id {
            query.push(("CategoryId", id.to_string()));
        }
        if let Some(author) = &params.author {
            query.push(("Author", author.clone()));
        }
        if let Some(publisher) = &params.publisher {
            query.push(("Publisher", publisher.clone()));
        }
        self.get("ItemSearch.aspx", &query)
    }

    fn list(&self, params: &ListParams) -> Result<Vec<BookItem>, CatalogError> {
        let mut query = vec![
            ("QueryType", params.kind.as_param().to_string()),
            ("SearchTarget", "Book".to_string()),
            ("start", params.start.max(1).to_string()),
            ("MaxResults", params.max_results.min(100).to_string()),
            ("Cover", "Big".to_string()),
            ("OptResult", DESCRIPTION_OPT_RESULT.to_string()),
        ];
        if let Some(id) = params.category_id {
            query.push(("CategoryId", id.to_string()));
        }
        if let Some(year) = params.year {
            query.push(("Year", year.to_string()));
        }
        if let Some(month) = params.month {
            query.push(("Month", month.to_string()));
        }
        if let Some(week) = params.week {
            query.push(("Week", week.to_string()));
        }
        self.get("ItemList.aspx", &query)
    }

    fn lookup(&self, params: &LookupParams) -> Result<Vec<BookItem>, CatalogError> {
        let query = vec![
            ("ItemId", params.item_id.clone()),
            ("ItemIdType", params.id_type.as_param().to_string()),
            ("SearchTarget", "Book".to_string()),
            ("Cover", "Big".to_string()),
            ("OptResult", DESCRIPTION_OPT_RESULT.to_string()),
        ];
        self.get("ItemLookUp.aspx", &query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_at_construction() {
        assert!(matches!(
            AladinClient::new(None),
            Err(CatalogError::MissingKey)
        ));
        assert!(matches!(
            AladinClient::new(Some(String::new())),
            Err(CatalogError::MissingKey)
        ));
        assert!(AladinClient::new(Some("ttb-key".into())).is_ok());
    }

    #[test]
    fn base_url_always_ends_with_slash() {
        let client = AladinClient::new(Some("k".into()))
            .unwrap()
            .with_base_url("http://localhost:9999/api");
        assert_eq!(client.base_url, "http://localhost:9999/api/");
    }

    #[test]
    fn api_error_body_is_detected() {
        let body: Value = serde_json::from_str(
            r#"{"errorCode": 100, "errorMessage": "잘못된 TTBKey 입니다."}"#,
        )
        .unwrap();
        let message = api_error_message(&body).unwrap();
        assert!(message.contains("잘못된 TTBKey"));
        assert!(message.contains("100"));

        let ok: Value = serde_json::from_str(r#"{"item": []}"#).unwrap();
        assert!(api_error_message(&ok).is_none());
    }
}

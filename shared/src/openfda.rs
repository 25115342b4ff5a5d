//! OpenFDA drug label lookup.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::info;

use crate::intents::DrugIntent;
use crate::{Error, Result};

/// Key of the vendor-supplied sub-record inside a label result.
const VENDOR_KEY: &str = "openfda";

/// A single label field: OpenFDA returns most sections as string arrays.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Convert a JSON value, ignoring anything that is not text.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Array(items) => Some(FieldValue::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(String::from))
                    .collect(),
            )),
            _ => None,
        }
    }

    /// Spoken form of the value, `None` when there is nothing to say.
    pub fn render(&self) -> Option<String> {
        let text = match self {
            FieldValue::Text(s) => s.trim().to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        };
        (!text.is_empty()).then_some(text)
    }

    fn is_empty(&self) -> bool {
        self.render().is_none()
    }
}

/// A label result with the vendor sub-record merged into the top level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl LabelRecord {
    /// Flatten a raw label result.
    ///
    /// Vendor fields fill names that are missing or empty at the top level;
    /// a top-level value that already has content is kept.
    pub fn from_result(result: &Map<String, Value>) -> Self {
        let mut fields: BTreeMap<String, FieldValue> = result
            .iter()
            .filter(|(key, _)| key.as_str() != VENDOR_KEY)
            .filter_map(|(key, value)| FieldValue::from_json(value).map(|v| (key.clone(), v)))
            .collect();

        if let Some(Value::Object(vendor)) = result.get(VENDOR_KEY) {
            for (key, value) in vendor {
                let Some(value) = FieldValue::from_json(value) else {
                    continue;
                };
                let keep_existing = fields.get(key).is_some_and(|existing| !existing.is_empty());
                if !keep_existing {
                    fields.insert(key.clone(), value);
                }
            }
        }

        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Rendered values of the given fields, skipping absent and empty ones.
    pub fn values_for<'a>(&'a self, keys: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
        keys.iter()
            .filter_map(|key| self.fields.get(*key))
            .filter_map(FieldValue::render)
    }

    /// Sentence answering `intent` for `drug_name`, or `None` if the label
    /// has none of the intent's fields.
    pub fn describe(&self, drug_name: &str, intent: DrugIntent) -> Option<String> {
        let mut values = self.values_for(intent.fields()).peekable();
        values.peek()?;

        let mut sentence = format!("{}: ", drug_name);
        for value in values {
            sentence.push_str(&value);
            sentence.push_str(". ");
        }
        Some(sentence)
    }
}

/// Raw body of a label search.
#[derive(Debug, Deserialize)]
struct LabelResponse {
    #[serde(default)]
    results: Vec<Map<String, Value>>,
    #[serde(default)]
    error: Option<Value>,
}

/// Parse a label search body into the first result.
pub fn parse_label_body(body: &str) -> Result<LabelRecord> {
    let response: LabelResponse = serde_json::from_str(body)?;

    if let Some(error) = response.error {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(String::from)
            .unwrap_or_else(|| error.to_string());
        return Err(Error::Lookup(message));
    }

    response
        .results
        .first()
        .map(LabelRecord::from_result)
        .ok_or_else(|| Error::Lookup("No label results".to_string()))
}

/// Source of drug label records.
pub trait LabelLookup {
    fn fetch_label(&self, drug_name: &str) -> impl Future<Output = Result<LabelRecord>> + Send;
}

/// HTTP client for the OpenFDA label endpoint.
#[derive(Debug, Clone)]
pub struct OpenFdaClient {
    http_client: reqwest::Client,
    label_endpoint: String,
}

impl OpenFdaClient {
    pub fn new(http_client: reqwest::Client, label_endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            label_endpoint: label_endpoint.into(),
        }
    }

    fn search_url(&self, drug_name: &str) -> String {
        format!(
            "{}?search={}",
            self.label_endpoint,
            urlencoding::encode(drug_name)
        )
    }
}

impl LabelLookup for OpenFdaClient {
    async fn fetch_label(&self, drug_name: &str) -> Result<LabelRecord> {
        let url = self.search_url(drug_name);
        info!(drug = %drug_name, "Fetching drug label");

        // Not-found answers come back as 404 with an `error` body, so the
        // status is not checked before parsing.
        let body = self.http_client.get(&url).send().await?.text().await?;

        parse_label_body(&body)
    }
}

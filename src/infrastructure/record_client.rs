//! HTTP client for the remote character record service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::application::ports::outbound::{CharacterRecordPort, RecordStoreError};
use crate::domain::value_objects::CharacterRecord;

/// Client for `GET`/`POST {base}/api/{identity}/character`
pub struct HttpRecordClient {
    client: Client,
    base_url: String,
}

impl HttpRecordClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RecordClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn record_url(&self, identity: &str) -> String {
        format!("{}/api/{}/character", self.base_url, identity)
    }

    /// Fetch the raw record payload
    pub async fn get_record(&self, identity: &str) -> Result<Option<Value>, RecordClientError> {
        let response = self.client.get(self.record_url(identity)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(RecordClientError::ApiError { status, message: error_text });
        }

        let payload: Value = response.json().await?;
        Ok(unwrap_envelope(payload))
    }

    /// Overwrite the stored record
    pub async fn post_record(&self, identity: &str, record: &CharacterRecord) -> Result<(), RecordClientError> {
        let response = self
            .client
            .post(self.record_url(identity))
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await?;
            return Err(RecordClientError::ApiError { status, message: error_text });
        }

        Ok(())
    }
}

/// Some deployments wrap the record as `{ "statusCode": .., "body": {..} }`
fn unwrap_envelope(payload: Value) -> Option<Value> {
    match payload {
        Value::Null => None,
        Value::Object(mut object) if object.get("body").is_some_and(Value::is_object) => {
            object.remove("body")
        }
        Value::Object(object) if object.get("body").is_some_and(Value::is_null) => None,
        other => Some(other),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RecordClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
}

impl From<RecordClientError> for RecordStoreError {
    fn from(error: RecordClientError) -> Self {
        match error {
            RecordClientError::HttpError(e) if e.is_decode() => Self::Serialization(e.to_string()),
            RecordClientError::HttpError(e) => Self::Transport(e.to_string()),
            RecordClientError::ApiError { status, message } => Self::Api { status, message },
        }
    }
}

// =============================================================================
// CharacterRecordPort Implementation
// =============================================================================

#[async_trait]
impl CharacterRecordPort for HttpRecordClient {
    async fn fetch(&self, identity: &str) -> Result<Option<Value>, RecordStoreError> {
        Ok(self.get_record(identity).await?)
    }

    async fn store(&self, identity: &str, record: &CharacterRecord) -> Result<(), RecordStoreError> {
        Ok(self.post_record(identity, record).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_url_trims_trailing_slash() {
        let client = HttpRecordClient::new("http://records.local/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.record_url("ada"), "http://records.local/api/ada/character");
    }

    #[test]
    fn test_unwrap_envelope() {
        let bare = json!({ "attributes": {}, "num": 0 });
        assert_eq!(unwrap_envelope(bare.clone()), Some(bare.clone()));

        let wrapped = json!({ "statusCode": 200, "body": bare });
        assert_eq!(unwrap_envelope(wrapped), Some(json!({ "attributes": {}, "num": 0 })));

        assert_eq!(unwrap_envelope(json!({ "statusCode": 200, "body": null })), None);
        assert_eq!(unwrap_envelope(Value::Null), None);
    }
}

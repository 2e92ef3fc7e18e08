//! [`FirestoreDirectory`]: user documents read through the Firestore REST API.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::{LookupError, UserDirectory, UserRecord};

/// Reads `users/{username}` documents and extracts the push token field.
#[derive(Clone)]
pub struct FirestoreDirectory {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    collection: String,
    token_field: String,
    access_token: String,
}

/// Subset of a Firestore document relevant to the relay.
#[derive(Debug, Deserialize)]
struct Document {
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

/// Firestore typed value; only string values are meaningful for tokens.
#[derive(Debug, Deserialize)]
struct FieldValue {
    #[serde(rename = "stringValue")]
    string_value: Option<String>,
}

impl FirestoreDirectory {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        collection: impl Into<String>,
        token_field: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            project_id: project_id.into(),
            collection: collection.into(),
            token_field: token_field.into(),
            access_token: access_token.into(),
        }
    }

    /// Build the document URL, inserting `username` as one encoded path segment.
    fn document_url(&self, username: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.base_url).map_err(|_| LookupError::InvalidUrl)?;
        url.path_segments_mut()
            .map_err(|_| LookupError::InvalidUrl)?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                self.collection.as_str(),
                username,
            ]);
        Ok(url)
    }

    fn record_from(&self, doc: Document) -> UserRecord {
        let push_token = doc
            .fields
            .get(&self.token_field)
            .and_then(|v| v.string_value.clone())
            .filter(|t| !t.is_empty());
        UserRecord { push_token }
    }
}

#[async_trait]
impl UserDirectory for FirestoreDirectory {
    async fn lookup(&self, username: &str) -> Result<Option<UserRecord>, LookupError> {
        let url = self.document_url(username)?;

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.without_url()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                debug!("recipient document not found");
                Ok(None)
            }
            s if s.is_success() => {
                let doc: Document = resp
                    .json()
                    .await
                    .map_err(|e| LookupError::InvalidResponse(e.without_url().to_string()))?;
                Ok(Some(self.record_from(doc)))
            }
            s => Err(LookupError::Status(s.as_u16())),
        }
    }
}

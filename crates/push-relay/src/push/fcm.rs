//! [`FcmDispatcher`]: data-only messages sent through FCM HTTP v1.
//!
//! Messages are data-only so that the client app decides how to display them
//! (it has to open the envelopes first). They are sent with high Android
//! priority and `content-available` on APNs so that backgrounded apps wake up.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{PushDispatcher, PushError, PushMessage};

/// Sends [`PushMessage`]s to `projects/{project}/messages:send`.
#[derive(Clone)]
pub struct FcmDispatcher {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    access_token: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Debug, Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    data: BTreeMap<&'a str, &'a str>,
    android: AndroidConfig,
    apns: ApnsConfig,
}

#[derive(Debug, Serialize)]
struct AndroidConfig {
    priority: &'static str,
}

#[derive(Debug, Serialize)]
struct ApnsConfig {
    payload: ApnsPayload,
}

#[derive(Debug, Serialize)]
struct ApnsPayload {
    aps: Aps,
}

#[derive(Debug, Serialize)]
struct Aps {
    #[serde(rename = "content-available")]
    content_available: u8,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

impl FcmDispatcher {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    fn send_url(&self) -> Result<Url, PushError> {
        let mut url = Url::parse(&self.base_url).map_err(|_| PushError::InvalidUrl)?;
        url.path_segments_mut()
            .map_err(|_| PushError::InvalidUrl)?
            .pop_if_empty()
            .extend(["v1", "projects", self.project_id.as_str(), "messages:send"]);
        Ok(url)
    }
}

/// Lay out the FCM request body. `title` and `body` travel inside `data`.
fn request_body(message: &PushMessage) -> SendRequest<'_> {
    let mut data: BTreeMap<&str, &str> = message
        .data
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    data.insert("title", &message.title);
    data.insert("body", &message.body);

    SendRequest {
        message: FcmMessage {
            token: &message.token,
            data,
            android: AndroidConfig { priority: "high" },
            apns: ApnsConfig {
                payload: ApnsPayload {
                    aps: Aps {
                        content_available: 1,
                    },
                },
            },
        },
    }
}

#[async_trait]
impl PushDispatcher for FcmDispatcher {
    async fn send(&self, message: PushMessage) -> Result<String, PushError> {
        let url = self.send_url()?;

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&request_body(&message))
            .send()
            .await
            .map_err(|e| PushError::Transport(e.without_url()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PushError::Status(status.as_u16()));
        }

        let body: SendResponse = resp
            .json()
            .await
            .map_err(|e| PushError::InvalidResponse(e.without_url().to_string()))?;
        debug!("push accepted");
        Ok(body.name)
    }
}

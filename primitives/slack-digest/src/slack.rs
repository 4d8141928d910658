//! Minimal Slack Web API client: one listing call and one posting call.

use std::fmt;

use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::{
    channel::{ListResponse, Page},
    config::DigestConfig,
    error::{ConfigError, SlackError},
};

const LIST_METHOD: &str = "conversations.list";
const POST_METHOD: &str = "chat.postMessage";

/// Response envelope shared by every Web API method.
#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

/// Slack Web API client bound to one token.
///
/// With `strict` set, a non-success HTTP status or an `"ok": false` envelope
/// is an error. Otherwise every response is treated as success.
pub struct SlackClient {
    http: Client,
    api_base: String,
    token: Secret<String>,
    strict: bool,
}

impl fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlackClient")
            .field("api_base", &self.api_base)
            .field("token", &"[REDACTED]")
            .field("strict", &self.strict)
            .finish()
    }
}

impl SlackClient {
    /// Builds a client from the run configuration.
    pub fn new(config: &DigestConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ConfigError::Client)?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            strict: !config.lenient,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    /// Requests one page of `conversations.list`.
    pub async fn list_channels(
        &self,
        limit: u32,
        cursor: Option<&str>,
    ) -> Result<Page, SlackError> {
        let limit = limit.to_string();
        let mut query = vec![
            ("limit", limit.as_str()),
            ("token", self.token.expose_secret().as_str()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor));
        }

        let response = self
            .http
            .get(self.endpoint(LIST_METHOD))
            .query(&query)
            .send()
            .await
            .map_err(|source| SlackError::Transport {
                method: LIST_METHOD,
                source,
            })?;
        let body = self.read_body(LIST_METHOD, response).await?;

        let decoded: ListResponse =
            serde_json::from_str(&body).map_err(|source| SlackError::Decode {
                method: LIST_METHOD,
                source,
            })?;
        self.check_envelope(LIST_METHOD, decoded.ok, decoded.error.as_deref())?;

        Ok(Page::from(decoded))
    }

    /// Posts `text` to `channel` with `chat.postMessage`.
    pub async fn post_message(&self, channel: &str, text: &str) -> Result<(), SlackError> {
        let response = self
            .http
            .post(self.endpoint(POST_METHOD))
            .form(&[
                ("token", self.token.expose_secret().as_str()),
                ("channel", channel),
                ("text", text),
            ])
            .send()
            .await
            .map_err(|source| SlackError::Transport {
                method: POST_METHOD,
                source,
            })?;
        let body = self.read_body(POST_METHOD, response).await?;

        if self.strict {
            let envelope: Envelope =
                serde_json::from_str(&body).map_err(|source| SlackError::Decode {
                    method: POST_METHOD,
                    source,
                })?;
            self.check_envelope(POST_METHOD, envelope.ok, envelope.error.as_deref())?;
        }

        Ok(())
    }

    /// Checks the HTTP status (strict only) and reads the whole body.
    async fn read_body(
        &self,
        method: &'static str,
        response: Response,
    ) -> Result<String, SlackError> {
        let status = response.status();
        if self.strict && !status.is_success() {
            return Err(SlackError::Status { method, status });
        }

        response
            .text()
            .await
            .map_err(|source| SlackError::Transport { method, source })
    }

    fn check_envelope(
        &self,
        method: &'static str,
        ok: Option<bool>,
        error: Option<&str>,
    ) -> Result<(), SlackError> {
        if self.strict && ok == Some(false) {
            return Err(SlackError::Api {
                method,
                error: error.unwrap_or("unknown_error").to_string(),
            });
        }
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_config;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn lenient_client(server: &MockServer) -> SlackClient {
        let config = DigestConfig {
            lenient: true,
            ..test_config(server.uri())
        };
        SlackClient::new(&config).unwrap()
    }

    #[test]
    fn debug_redacts_token() {
        let client = SlackClient::new(&test_config("https://slack.test/api/".into())).unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("xoxb-test"));
        assert_eq!(client.endpoint(LIST_METHOD), "https://slack.test/api/conversations.list");
    }

    #[tokio::test]
    async fn strict_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations.list"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = SlackClient::new(&test_config(server.uri())).unwrap();
        let err = client.list_channels(10, None).await.unwrap_err();
        assert!(matches!(
            err,
            SlackError::Status { status, .. } if status == reqwest::StatusCode::TOO_MANY_REQUESTS
        ));
    }

    #[tokio::test]
    async fn lenient_decodes_error_status_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conversations.list"))
            .and(query_param("token", "xoxb-test"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string(r#"{"ok": false, "error": "internal_error"}"#),
            )
            .mount(&server)
            .await;

        let page = lenient_client(&server).list_channels(10, None).await.unwrap();
        assert!(page.channels().is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error_in_both_modes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let err = lenient_client(&server).list_channels(10, None).await.unwrap_err();
        assert!(matches!(err, SlackError::Decode { method: LIST_METHOD, .. }));

        let client = SlackClient::new(&test_config(server.uri())).unwrap();
        let err = client.list_channels(10, Some("abc")).await.unwrap_err();
        assert!(matches!(err, SlackError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = SlackClient::new(&test_config(format!("http://{addr}"))).unwrap();
        let err = client.post_message("CDIGEST", "hello").await.unwrap_err();
        assert!(matches!(err, SlackError::Transport { method: POST_METHOD, .. }));
    }
}

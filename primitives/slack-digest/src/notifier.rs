//! Notifier: delivers the digest with a single `chat.postMessage` call.

use tracing::info;

use crate::{digest::Digest, error::SlackError, slack::SlackClient};

/// Posts `digest` to `destination`. Not retried.
pub async fn notify(
    client: &SlackClient,
    destination: &str,
    digest: Digest,
) -> Result<(), SlackError> {
    let entries = digest.entries();
    client.post_message(destination, &digest.into_text()).await?;
    info!(channel = %destination, entries, "posted channel digest");
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DigestConfig;
    use crate::test_support::test_config;
    use chrono::NaiveDate;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn empty_digest() -> Digest {
        Digest::build(&[], NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), "https://x/archives")
    }

    fn lenient(config: DigestConfig) -> DigestConfig {
        DigestConfig {
            lenient: true,
            ..config
        }
    }

    #[tokio::test]
    async fn posts_form_encoded_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("token=xoxb-test"))
            .and(body_string_contains("channel=CDIGEST"))
            .and(body_string_contains("text=2024%2F01%2F15"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok": true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(&test_config(server.uri())).unwrap();
        notify(&client, "CDIGEST", empty_digest()).await.unwrap();
    }

    #[tokio::test]
    async fn api_error_is_reported_when_strict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat.postMessage"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"ok": false, "error": "channel_not_found"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(&test_config(server.uri())).unwrap();
        let err = notify(&client, "CMISSING", empty_digest()).await.unwrap_err();
        assert!(matches!(err, SlackError::Api { ref error, .. } if error == "channel_not_found"));
    }

    #[tokio::test]
    async fn http_status_is_reported_when_strict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SlackClient::new(&test_config(server.uri())).unwrap();
        let err = notify(&client, "CDIGEST", empty_digest()).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn lenient_discards_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = SlackClient::new(&lenient(test_config(server.uri()))).unwrap();
        notify(&client, "CDIGEST", empty_digest()).await.unwrap();
    }
}

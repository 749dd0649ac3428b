use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BotError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Keys the API uses to signal a failure inside a 200 answer.
const SOFT_FAILURE_KEYS: [&str; 2] = ["error", "code"];

#[derive(Debug, Clone)]
pub struct PracticumClient {
    http: Client,
    token: String,
    endpoint: String,
}

impl PracticumClient {
    pub fn new(token: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| BotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            token: token.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Fetch homework statuses updated since `from_date`. No retry here; the
    /// watch loop's fixed sleep is the only retry mechanism.
    pub async fn get_homework_statuses(&self, from_date: i64) -> Result<Value> {
        info!(from_date, "requesting homework statuses");

        let response = self
            .http
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|source| BotError::Connectivity { from_date, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::ApiAnswer {
                from_date,
                reason: format!("HTTP status {status}"),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            BotError::ResponseShape(format!("answer body is not valid JSON: {e}"))
        })?;

        if let Some(object) = body.as_object() {
            for key in SOFT_FAILURE_KEYS {
                if let Some(value) = object.get(key) {
                    return Err(BotError::ApiAnswer {
                        from_date,
                        reason: format!("server signaled failure, key {key:?} = {value}"),
                    });
                }
            }
        }

        debug!("homework API answer received");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STATUSES_PATH: &str = "/api/user_api/homework_statuses/";

    fn client_for(server: &MockServer) -> PracticumClient {
        PracticumClient::new("secret", format!("{}{STATUSES_PATH}", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn fetches_and_parses_the_answer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(STATUSES_PATH))
            .and(query_param("from_date", "0"))
            .and(header("Authorization", "OAuth secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "homeworks": [],
                "current_date": 1000,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server).get_homework_statuses(0).await.unwrap();
        assert_eq!(body["current_date"], 1000);
    }

    #[tokio::test]
    async fn non_success_status_is_an_api_answer_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).get_homework_statuses(5).await.unwrap_err();
        match err {
            BotError::ApiAnswer { from_date, reason } => {
                assert_eq!(from_date, 5);
                assert!(reason.contains("404"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn soft_failure_key_is_an_api_answer_error() {
        for key in ["error", "code"] {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({key: "UnknownError"})),
                )
                .mount(&server)
                .await;

            let err = client_for(&server).get_homework_statuses(0).await.unwrap_err();
            match err {
                BotError::ApiAnswer { reason, .. } => {
                    assert!(reason.contains(key), "reason should name {key}: {reason}");
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connectivity_error() {
        let server = MockServer::start().await;
        let endpoint = format!("{}{STATUSES_PATH}", server.uri());
        drop(server);

        let client = PracticumClient::new("secret", endpoint).unwrap();
        let err = client.get_homework_statuses(7).await.unwrap_err();
        match err {
            BotError::Connectivity { from_date, .. } => assert_eq!(from_date, 7),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_a_shape_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).get_homework_statuses(0).await.unwrap_err();
        assert!(matches!(err, BotError::ResponseShape(_)));
    }
}

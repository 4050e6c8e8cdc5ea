use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, error};
use url::Url;

use crate::logic::error::AuthenticationError;

/// Source of raw user claims for an access token.
#[async_trait]
pub trait UserInfoGateway: Send + Sync {
    async fn get_claims(
        &self,
        access_token: &str,
    ) -> Result<Map<String, Value>, AuthenticationError>;
}

/// Fetches claims from an OIDC user-info endpoint.
///
/// Timeouts are whatever the supplied `reqwest::Client` is configured with.
#[derive(Debug, Clone)]
pub struct HttpUserInfoGateway {
    client: reqwest::Client,
    user_info_uri: Url,
}

impl HttpUserInfoGateway {
    pub fn new(client: reqwest::Client, user_info_uri: Url) -> Self {
        Self {
            client,
            user_info_uri,
        }
    }

    pub fn user_info_uri(&self) -> &Url {
        &self.user_info_uri
    }
}

#[async_trait]
impl UserInfoGateway for HttpUserInfoGateway {
    async fn get_claims(
        &self,
        access_token: &str,
    ) -> Result<Map<String, Value>, AuthenticationError> {
        debug!("Requesting user info from {}", self.user_info_uri);

        let response = self
            .client
            .get(self.user_info_uri.clone())
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                error!("User info request failed: {e}");
                AuthenticationError::remote_fetch("request failed", Some(e.into()))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("User info request failed: HTTP {status}");
            return Err(AuthenticationError::remote_fetch(format!("HTTP {status}"), None));
        }

        let body: Value = response.json().await.map_err(|e| {
            error!("Failed to parse user info: {e}");
            AuthenticationError::remote_fetch("invalid JSON body", Some(e.into()))
        })?;

        match body {
            Value::Object(claims) => Ok(claims),
            _ => {
                error!("User info response is not a JSON object");
                Err(AuthenticationError::remote_fetch(
                    "response is not a JSON object",
                    None,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path},
    };

    use super::*;

    async fn gateway(server: &MockServer) -> HttpUserInfoGateway {
        let uri = Url::parse(&format!("{}/oauth2/userInfo", server.uri())).unwrap();
        HttpUserInfoGateway::new(reqwest::Client::new(), uri)
    }

    #[tokio::test]
    async fn test_get_claims_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/userInfo"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sub": "user-51423",
                "email": "jw@x"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let claims = gateway(&server).await.get_claims("token-123").await.unwrap();

        assert_eq!(claims.get("sub"), Some(&json!("user-51423")));
        assert_eq!(claims.get("email"), Some(&json!("jw@x")));
    }

    #[tokio::test]
    async fn test_error_status_is_remote_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/userInfo"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = gateway(&server).await.get_claims("expired").await.unwrap_err();

        assert!(matches!(err, AuthenticationError::RemoteFetch { .. }));
    }

    #[tokio::test]
    async fn test_non_object_body_is_remote_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/userInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["sub"])))
            .mount(&server)
            .await;

        let err = gateway(&server).await.get_claims("token-123").await.unwrap_err();

        assert!(matches!(err, AuthenticationError::RemoteFetch { .. }));
    }

    #[tokio::test]
    async fn test_invalid_json_is_remote_fetch_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oauth2/userInfo"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = gateway(&server).await.get_claims("token-123").await.unwrap_err();

        assert!(matches!(err, AuthenticationError::RemoteFetch { .. }));
    }
}

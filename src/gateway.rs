use std::sync::Arc;

use reqwest::{multipart::Form, Method, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    auth::session::SessionStore,
    config::Config,
    errors::{AppError, AppResult, ErrorBody},
    navigation::Navigator,
};

/// The one HTTP client every service talks through.
///
/// Requests carry the stored bearer token when there is one. A 401 on any
/// response ends the session and sends the host to the login screen before
/// the error reaches the caller.
pub struct ApiGateway {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl ApiGateway {
    pub fn new(
        config: &Config,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            session,
            navigator,
            login_path: config.login_path.clone(),
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            log::error!("Request failed before a response arrived: {}", e);
            AppError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            log::warn!(
                "{} answered 401; ending session",
                response.url().path()
            );
            self.session.clear();
            self.navigator.navigate(&self.login_path);
            return Err(AppError::AuthenticationFailure(
                "session is no longer valid".to_string(),
            ));
        }

        if !status.is_success() {
            let path = response.url().path().to_string();
            let body = response.text().await.unwrap_or_default();
            let message = upstream_message(status, body);
            log::warn!("{} answered {}: {}", path, status, message);
            return Err(AppError::UpstreamFailure {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::Transport(format!("Failed to parse response body: {}", e)))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        Self::parse(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .execute(self.request(Method::POST, path).json(body))
            .await?;
        Self::parse(response).await
    }

    /// Sends a JSON body and ignores whatever the backend answers with.
    pub async fn send_json<B>(&self, method: Method, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.execute(self.request(method, path).json(body)).await?;
        Ok(())
    }

    pub async fn put_json<B>(&self, path: &str, body: &B) -> AppResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.send_json(Method::PUT, path, body).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<()> {
        self.execute(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> AppResult<T> {
        let response = self
            .execute(self.request(Method::POST, path).multipart(form))
            .await?;
        Self::parse(response).await
    }
}

fn upstream_message(status: StatusCode, body: String) -> String {
    if let Some(message) = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        return message;
    }
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::user::{AuthUser, Role},
        navigation::MockNavigator,
        test_utils::tokens,
    };
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;
    use serde_json::json;
    use wiremock::{
        matchers::{header, header_exists, method, path},
        Mock, MockServer, Request, ResponseTemplate,
    };

    fn config_for(server: &MockServer) -> Config {
        let mut config = Config::test_config();
        config.api_base_url = server.uri();
        config
    }

    fn signed_in_session() -> (Arc<SessionStore>, String) {
        let session = Arc::new(SessionStore::in_memory());
        let token = tokens::signed(Role::Student, "42", Utc::now() + Duration::hours(1));
        session
            .save(&token, &AuthUser::new("42", "ana", Role::Student))
            .unwrap();
        (session, token)
    }

    #[tokio::test]
    async fn test_bearer_token_attached_when_signed_in() {
        let server = MockServer::start().await;
        let (session, token) = signed_in_session();

        Mock::given(method("GET"))
            .and(path("/api/Course"))
            .and(header("authorization", format!("Bearer {}", token).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let gateway =
            ApiGateway::new(&config_for(&server), session, Arc::new(MockNavigator::new())).unwrap();
        let courses: Vec<serde_json::Value> = gateway.get_json("/api/Course").await.unwrap();
        assert!(courses.is_empty());
    }

    #[tokio::test]
    async fn test_no_token_sends_unauthenticated_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/Course"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/Course"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let gateway = ApiGateway::new(
            &config_for(&server),
            Arc::new(SessionStore::in_memory()),
            Arc::new(MockNavigator::new()),
        )
        .unwrap();

        let courses: Vec<serde_json::Value> = gateway.get_json("/api/Course").await.unwrap();
        assert!(courses.is_empty());

        let requests: Vec<Request> = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_unauthorized_tears_down_session_and_redirects() {
        let server = MockServer::start().await;
        let (session, _) = signed_in_session();

        Mock::given(method("DELETE"))
            .and(path("/api/Course/5"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .with(eq("/login"))
            .times(1)
            .return_const(());

        let gateway =
            ApiGateway::new(&config_for(&server), session.clone(), Arc::new(navigator)).unwrap();

        let err = gateway.delete("/api/Course/5").await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailure(_)));
        assert_eq!(session.current_role(), None);
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_other_errors_pass_through_with_message() {
        let server = MockServer::start().await;
        let (session, _) = signed_in_session();

        Mock::given(method("POST"))
            .and(path("/api/Course"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "message": "Title already used" })),
            )
            .mount(&server)
            .await;

        let gateway =
            ApiGateway::new(&config_for(&server), session.clone(), Arc::new(MockNavigator::new()))
                .unwrap();

        let err = gateway
            .send_json(Method::POST, "/api/Course", &json!({ "title": "x" }))
            .await
            .unwrap_err();
        match err {
            AppError::UpstreamFailure { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Title already used");
            }
            other => panic!("expected upstream failure, got {:?}", other),
        }
        // Non-401 failures leave the session alone.
        assert_eq!(session.current_role(), Some(Role::Student));
    }

    #[test]
    fn test_upstream_message_fallbacks() {
        assert_eq!(
            upstream_message(StatusCode::NOT_FOUND, String::new()),
            "Not Found"
        );
        assert_eq!(
            upstream_message(StatusCode::BAD_GATEWAY, "upstream down".to_string()),
            "upstream down"
        );
        assert_eq!(
            upstream_message(StatusCode::BAD_REQUEST, r#"{"error":"Invalid file"}"#.to_string()),
            "Invalid file"
        );
    }
}

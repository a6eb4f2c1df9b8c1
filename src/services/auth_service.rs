use std::sync::Arc;

use secrecy::SecretString;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    gateway::ApiGateway,
    models::{
        domain::user::Role,
        dto::{
            request::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
            response::{ForgotPasswordResponse, LoginResponse, MessageResponse},
        },
    },
    navigation::Navigator,
    services::endpoints,
};

pub struct AuthService {
    gateway: Arc<ApiGateway>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl AuthService {
    pub fn new(gateway: Arc<ApiGateway>, navigator: Arc<dyn Navigator>, login_path: &str) -> Self {
        Self {
            gateway,
            navigator,
            login_path: login_path.to_string(),
        }
    }

    /// Signs in and stores the session. Returns the resolved role so the
    /// host can route to the matching dashboard.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<Role> {
        let request = LoginRequest::new(email, password);
        request.validate()?;

        let response: LoginResponse = self
            .gateway
            .post_json(endpoints::AUTH_LOGIN, &request)
            .await?;

        self.gateway.session().save(&response.token, &response.user)?;

        let role = self.gateway.session().current_role().ok_or_else(|| {
            AppError::AuthenticationFailure("login returned no usable session".to_string())
        })?;
        log::info!("Logged in as {}", role);
        Ok(role)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str, role: Role) -> AppResult<()> {
        let request = RegisterRequest {
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: SecretString::from(password.to_string()),
            role,
        };
        request.validate()?;

        self.gateway
            .send_json(reqwest::Method::POST, endpoints::AUTH_REGISTER, &request)
            .await?;
        log::info!("Registered new {} account", role);
        Ok(())
    }

    /// First step of the reset flow; the backend hands back the reset token.
    pub async fn forgot_password(&self, email: &str) -> AppResult<ForgotPasswordResponse> {
        let request = ForgotPasswordRequest {
            email: email.trim().to_string(),
        };
        request.validate()?;

        self.gateway
            .post_json(endpoints::AUTH_FORGOT_PASSWORD, &request)
            .await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<Option<String>> {
        let request = ResetPasswordRequest {
            token: SecretString::from(token.to_string()),
            new_password: SecretString::from(new_password.to_string()),
        };
        request.validate()?;

        let response: MessageResponse = self
            .gateway
            .post_json(endpoints::AUTH_RESET_PASSWORD, &request)
            .await?;
        Ok(response.message)
    }

    pub fn logout(&self) {
        self.gateway.session().clear();
        log::info!("Logged out");
        self.navigator.navigate(&self.login_path);
    }
}

use std::sync::Arc;

use crate::{
    auth::{guard::RouteGuard, session::SessionStore},
    config::Config,
    errors::AppResult,
    gateway::ApiGateway,
    navigation::Navigator,
    services::{
        assessment_service::AssessmentService, auth_service::AuthService,
        course_service::CourseService, file_service::FileService, result_service::ResultService,
    },
};

/// Everything a host needs, wired around one session and one gateway.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    pub gateway: Arc<ApiGateway>,
    pub guard: Arc<RouteGuard>,
    pub auth_service: Arc<AuthService>,
    pub course_service: Arc<CourseService>,
    pub assessment_service: Arc<AssessmentService>,
    pub result_service: Arc<ResultService>,
    pub file_service: Arc<FileService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        let session = Arc::new(SessionStore::from_config(&config)?);
        Self::with_session(config, session, navigator)
    }

    pub fn with_session(
        config: Config,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> AppResult<Self> {
        let gateway = Arc::new(ApiGateway::new(&config, session.clone(), navigator.clone())?);
        let guard = Arc::new(RouteGuard::new(session.clone(), &config.login_path));

        let auth_service = Arc::new(AuthService::new(
            gateway.clone(),
            navigator,
            &config.login_path,
        ));
        let file_service = Arc::new(FileService::new(gateway.clone()));
        let course_service = Arc::new(CourseService::new(gateway.clone(), file_service.clone()));
        let assessment_service = Arc::new(AssessmentService::new(gateway.clone()));
        let result_service = Arc::new(ResultService::new(gateway.clone()));

        log::info!("Client ready for {}", config.base_url());

        Ok(Self {
            session,
            gateway,
            guard,
            auth_service,
            course_service,
            assessment_service,
            result_service,
            file_service,
            config: Arc::new(config),
        })
    }
}

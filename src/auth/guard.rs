//! Navigation gate for the role-specific screens.
//!
//! This only decides what the client offers to show. The API rejects
//! unauthorized requests on its own; nothing here is a security control.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{auth::session::SessionStore, models::domain::user::Role};

pub const PUBLIC_PATHS: [&str; 4] = ["/", "/login", "/register", "/forgot-password"];
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    RedirectTo(String),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Access::Allow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any signed-in user.
    Authenticated,
    AnyOf(Vec<Role>),
}

impl RoleRequirement {
    pub fn role(role: Role) -> Self {
        RoleRequirement::AnyOf(vec![role])
    }

    fn admits(&self, role: Role) -> bool {
        match self {
            RoleRequirement::Authenticated => true,
            RoleRequirement::AnyOf(roles) => roles.contains(&role),
        }
    }
}

struct RouteRule {
    pattern: Regex,
    role: Role,
}

fn rule(pattern: &str, role: Role) -> Option<RouteRule> {
    match Regex::new(pattern) {
        Ok(pattern) => Some(RouteRule { pattern, role }),
        Err(e) => {
            log::error!("Invalid route pattern {}: {}", pattern, e);
            None
        }
    }
}

static ROUTES: Lazy<Vec<RouteRule>> = Lazy::new(|| {
    [
        rule(r"^/instructor/?$", Role::Instructor),
        rule(r"^/instructor/upload-course/?$", Role::Instructor),
        rule(r"^/instructor/upload-assessment/?$", Role::Instructor),
        rule(r"^/instructor/instructor-assessment-list/?$", Role::Instructor),
        rule(r"^/instructor/courses-list/?$", Role::Instructor),
        rule(r"^/instructor/view-results/?$", Role::Instructor),
        rule(r"^/student/?$", Role::Student),
        rule(r"^/student/assessments-list/?$", Role::Student),
        rule(r"^/student/results/?$", Role::Student),
        rule(r"^/student/take-assessment/[^/]+/?$", Role::Student),
        rule(r"^/student/courses-list/?$", Role::Student),
    ]
    .into_iter()
    .flatten()
    .collect()
});

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Role required by a known application route; `None` for public and
/// unknown paths.
pub fn route_requirement(path: &str) -> Option<Role> {
    ROUTES
        .iter()
        .find(|route| route.pattern.is_match(path))
        .map(|route| route.role)
}

/// Pure decision over an already-resolved role.
pub fn decide(
    current: Option<Role>,
    path: &str,
    requirement: &RoleRequirement,
    login_path: &str,
) -> Access {
    if is_public(path) {
        return Access::Allow;
    }
    match current {
        Some(role) if requirement.admits(role) => Access::Allow,
        _ => Access::RedirectTo(login_path.to_string()),
    }
}

pub struct RouteGuard {
    session: Arc<SessionStore>,
    login_path: String,
}

impl RouteGuard {
    pub fn new(session: Arc<SessionStore>, login_path: &str) -> Self {
        Self {
            session,
            login_path: login_path.to_string(),
        }
    }

    pub fn authorize(&self, path: &str, requirement: &RoleRequirement) -> Access {
        let access = decide(self.session.current_role(), path, requirement, &self.login_path);
        if let Access::RedirectTo(target) = &access {
            log::debug!("Navigation to {} redirected to {}", path, target);
        }
        access
    }

    /// Resolves `path` against the application's route table.
    pub fn authorize_path(&self, path: &str) -> Access {
        let current = self.session.current_role();

        if path == self.login_path {
            return match current {
                Some(role) => Access::RedirectTo(role.home_path().to_string()),
                None => Access::Allow,
            };
        }
        if is_public(path) {
            return Access::Allow;
        }
        match route_requirement(path) {
            Some(role) => decide(current, path, &RoleRequirement::role(role), &self.login_path),
            None => Access::RedirectTo(HOME_PATH.to_string()),
        }
    }
}

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Role {
    Student,
    Instructor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
        }
    }

    /// Landing route for a signed-in user of this role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Student => "/student",
            Role::Instructor => "/instructor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Role::Student),
            "Instructor" => Ok(Role::Instructor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// User block of the login response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthUser {
    #[serde(default, deserialize_with = "crate::models::string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl AuthUser {
    pub fn new(id: &str, name: &str, role: Role) -> Self {
        AuthUser {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            role: Some(role.to_string()),
        }
    }

    /// Role parsed into the closed set; unknown strings yield `None`.
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// Name with its first letter upper-cased, the rest untouched.
    pub fn display_name(&self) -> Option<String> {
        self.name.as_deref().map(capitalize_first)
    }
}

pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

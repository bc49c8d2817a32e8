use serde::{Deserialize, Serialize};

/// Authenticated session against the backend.
///
/// Created on login or registration and destroyed on logout. The API client
/// receives it explicitly instead of reading a global token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub scheme: String,
}

impl Session {
    pub fn new(token: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            scheme: scheme.into(),
        }
    }

    pub fn authorization(&self) -> String {
        format!("{} {}", self.scheme, self.token)
    }
}

//! User profile model.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROFILE_NAME: &str = "Admin";

/// Single-user display profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default = "default_name")]
    pub name: String,
}

fn default_name() -> String {
    DEFAULT_PROFILE_NAME.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

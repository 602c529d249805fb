use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to search the case library for a condition
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "disease_type", rename = "disease")]
    pub disease: String,
    /// Sort order: recommend | leverage | coverage | company
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_limit")]
    pub limit: u16,
}

fn default_sort() -> String {
    "recommend".to_string()
}

fn default_limit() -> u16 {
    20
}

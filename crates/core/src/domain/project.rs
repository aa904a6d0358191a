// Project Domain Model

use super::Datetime;
use serde::{Deserialize, Serialize};

/// Top-level namespace owning transports, groups and templates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub created_at: Datetime,
}

/// Insert parameters for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProject {
    pub project_id: String,
    pub name: String,
    pub description: String,
}

impl NewProject {
    pub fn new(
        project_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

// Group Domain Model

use super::Datetime;
use serde::{Deserialize, Serialize};

/// A named collection of templates within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: String,
    pub project_id: String,
    pub name: String,
    pub created_at: Datetime,
    pub modified_at: Datetime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub group_id: String,
    pub project_id: String,
    pub name: String,
}

impl NewGroup {
    pub fn new(
        group_id: impl Into<String>,
        project_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            project_id: project_id.into(),
            name: name.into(),
        }
    }
}

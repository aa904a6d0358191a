// Template Domain Model

use super::{ContentDigest, Datetime};
use serde::{Deserialize, Serialize};

/// Text/HTML body pair, unique by `template_id` within a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub template_id: String,
    pub group_id: String,
    pub project_id: String,
    pub text: String,
    pub text_digest: ContentDigest,
    pub html: String,
    pub html_digest: ContentDigest,
    pub created_at: Datetime,
    pub modified_at: Datetime,
}

/// Template content as supplied by a caller, digests computed beforehand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
    pub template_id: String,
    pub group_id: String,
    pub project_id: String,
    pub text: String,
    pub text_digest: ContentDigest,
    pub html: String,
    pub html_digest: ContentDigest,
}

impl NewTemplate {
    /// Build with digests computed from the bodies
    pub fn from_bodies(
        project_id: impl Into<String>,
        group_id: impl Into<String>,
        template_id: impl Into<String>,
        text: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let html = html.into();
        Self {
            template_id: template_id.into(),
            group_id: group_id.into(),
            project_id: project_id.into(),
            text_digest: ContentDigest::of(&text),
            html_digest: ContentDigest::of(&html),
            text,
            html,
        }
    }

    /// Materialise as a Template carrying the given timestamps
    pub fn into_template(self, created_at: Datetime, modified_at: Datetime) -> Template {
        Template {
            template_id: self.template_id,
            group_id: self.group_id,
            project_id: self.project_id,
            text: self.text,
            text_digest: self.text_digest,
            html: self.html,
            html_digest: self.html_digest,
            created_at,
            modified_at,
        }
    }
}

/// Result of the single probe query run before a template upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateProbe {
    ProjectMissing,
    Resolved {
        group_exists: bool,
        stored: Option<StoredVersion>,
    },
}

/// What the store already holds for a (project, template) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVersion {
    pub group_id: String,
    pub text_digest_matches: bool,
    pub html_digest_matches: bool,
    pub created_at: Datetime,
    pub modified_at: Datetime,
}

impl StoredVersion {
    pub fn digests_match(&self) -> bool {
        self.text_digest_matches && self.html_digest_matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bodies_computes_digests() {
        let t = NewTemplate::from_bodies("p1", "g1", "t1", "A", "<a>");
        assert_eq!(t.text_digest, ContentDigest::of("A"));
        assert_eq!(t.html_digest, ContentDigest::of("<a>"));
    }

    #[test]
    fn test_into_template_keeps_timestamps() {
        let created = Datetime::epoch();
        let modified = created.next_tick();
        let t = NewTemplate::from_bodies("p1", "g1", "t1", "A", "<a>").into_template(created, modified);
        assert_eq!(t.created_at, created);
        assert_eq!(t.modified_at, modified);
        assert_eq!(t.project_id, "p1");
    }
}

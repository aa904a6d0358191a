// Template bodies assembled from files on disk

use crate::error::{Result, StoreError};
use std::path::Path;

/// Read every file in order and concatenate the contents
pub(super) async fn read_joined<P>(kind: &str, paths: &[P]) -> Result<String>
where
    P: AsRef<Path> + Sync,
{
    if paths.is_empty() {
        return Err(StoreError::TemplateSourceUnreadable {
            message: format!("no {kind} template files given"),
            source: None,
        });
    }

    let mut body = String::new();
    for path in paths {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            StoreError::TemplateSourceUnreadable {
                message: format!("failed to read {kind} template {}", path.display()),
                source: Some(e.into()),
            }
        })?;
        body.push_str(&contents);
    }

    Ok(body)
}

//! Loading moderation policies from disk

use moderation::ModerationPolicy;
use std::path::Path;
use tokio::fs;

use crate::Result;

/// Read and validate a JSON moderation policy
pub async fn load_policy(path: impl AsRef<Path>) -> Result<ModerationPolicy> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).await?;
    let policy = ModerationPolicy::from_json(&contents)?;

    tracing::info!(
        path = %path.display(),
        exact_terms = policy.blocklist.exact.len(),
        substring_terms = policy.blocklist.substring.len(),
        "loaded moderation policy"
    );

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HandleStateError;
    use moderation::PolicyError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_policy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("policy.json");
        tokio::fs::write(
            &path,
            r#"{ "blocklist": { "exact": ["darn"], "substring": ["heck"] } }"#,
        )
        .await
        .unwrap();

        let policy = load_policy(&path).await.unwrap();
        assert_eq!(policy.blocklist.exact, vec!["darn".to_string()]);
        assert_eq!(policy.enforcement.max_warnings, 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load_policy(temp_dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(HandleStateError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_policy() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("policy.json");
        tokio::fs::write(&path, r#"{ "blocklist": { "exact": ["Darn"] } }"#)
            .await
            .unwrap();

        let result = load_policy(&path).await;
        assert!(matches!(
            result,
            Err(HandleStateError::Policy(PolicyError::NotLowercase(_)))
        ));
    }
}

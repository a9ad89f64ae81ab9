//! Username Allocation
//!
//! Derives a collision-free local username from the configured pattern and
//! the remote profile fields. The probe is a plain linear scan; the
//! directory's uniqueness constraint remains the authoritative guard (see
//! the resolver's duplicate-create policy).

use crate::identity::directory::UserDirectory;
use crate::shared::error::Result;

/// Substitute `[email]` / `[name]` in `pattern` and append `_1`, `_2`, ...
/// until the candidate is unused. An empty pattern means `[email]`.
pub async fn allocate_username(
    directory: &dyn UserDirectory,
    pattern: &str,
    email: &str,
    display_name: &str,
) -> Result<String> {
    let pattern = if pattern.is_empty() { "[email]" } else { pattern };

    let base = pattern
        .replace("[email]", email)
        .replace("[name]", display_name);

    let mut candidate = base.clone();
    let mut suffix = 1u32;

    while directory.find_by_username(&candidate).await?.is_some() {
        candidate = format!("{base}_{suffix}");
        suffix += 1;
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::entity::NewIdentity;
    use crate::identity::memory::InMemoryDirectory;

    #[tokio::test]
    async fn email_pattern_without_collision() {
        let directory = InMemoryDirectory::new();
        let name = allocate_username(&directory, "[email]", "a@x.com", "A")
            .await
            .unwrap();
        assert_eq!(name, "a@x.com");
    }

    #[tokio::test]
    async fn collisions_probe_numeric_suffixes() {
        let directory = InMemoryDirectory::new();
        directory
            .create(NewIdentity::enabled("a@x.com", "a@x.com"))
            .await
            .unwrap();

        let name = allocate_username(&directory, "[email]", "a@x.com", "A")
            .await
            .unwrap();
        assert_eq!(name, "a@x.com_1");

        directory
            .create(NewIdentity::enabled("a@x.com_1", "other@x.com"))
            .await
            .unwrap();

        let name = allocate_username(&directory, "[email]", "a@x.com", "A")
            .await
            .unwrap();
        assert_eq!(name, "a@x.com_2");
    }

    #[tokio::test]
    async fn name_token_substitution() {
        let directory = InMemoryDirectory::new();
        let name = allocate_username(&directory, "[name]-widget", "a@x.com", "alice")
            .await
            .unwrap();
        assert_eq!(name, "alice-widget");
    }

    #[tokio::test]
    async fn empty_pattern_falls_back_to_email() {
        let directory = InMemoryDirectory::new();
        let name = allocate_username(&directory, "", "a@x.com", "A").await.unwrap();
        assert_eq!(name, "a@x.com");
    }
}

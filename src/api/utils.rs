/// Shared utility functions for API handlers

const MAX_IDENTITY_LEN: usize = 39;
const MAX_GROUP_NAME_LEN: usize = 100;

/// Validate a GitHub-style user name: ASCII letters, digits and inner hyphens, at most 39 chars
pub fn is_valid_identity(identity: &str) -> bool {
    !identity.is_empty()
        && identity.len() <= MAX_IDENTITY_LEN
        && !identity.starts_with('-')
        && !identity.ends_with('-')
        && identity.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

pub fn is_valid_group_name(group_name: &str) -> bool {
    !group_name.trim().is_empty()
        && group_name.chars().count() <= MAX_GROUP_NAME_LEN
        && !group_name.chars().any(char::is_control)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("MK8-31", true)]
    #[case("octocat", true)]
    #[case("a", true)]
    #[case("", false)]
    #[case("-octocat", false)]
    #[case("octocat-", false)]
    #[case("octo/cat", false)]
    #[case("octo cat", false)]
    #[case("octocat.json", false)]
    #[case("a234567890123456789012345678901234567890", false)]
    fn test_identity_validation(#[case] identity: &str, #[case] valid: bool) {
        assert_eq!(is_valid_identity(identity), valid);
    }

    #[rstest]
    #[case("vitaminD", true)]
    #[case("チームA", true)]
    #[case("   ", false)]
    #[case("", false)]
    #[case("tab\there", false)]
    fn test_group_name_validation(#[case] group_name: &str, #[case] valid: bool) {
        assert_eq!(is_valid_group_name(group_name), valid);
    }
}

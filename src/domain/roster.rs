use tracing::info;

use super::DomainError;
use crate::db::{StoreError, UserStore};
use crate::models::{Member, UserRecord};

/// How the caller names the group to rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterKey<'a> {
    /// The group a registered user belongs to
    Identity(&'a str),
    Group(&'a str),
}

/// Resolve a group's members in store order
#[tracing::instrument(skip(store))]
pub async fn resolve_group_members(
    store: &dyn UserStore,
    key: RosterKey<'_>,
) -> Result<Vec<Member>, DomainError> {
    let group_name = match key {
        RosterKey::Group(group_name) => group_name.to_string(),
        RosterKey::Identity(user_name) => {
            let record = store
                .get_user(user_name)
                .await?
                .ok_or_else(|| DomainError::MemberNotFound(user_name.to_string()))?;
            info!(group_name = %record.group_name, "Resolved group from user");
            record.group_name
        }
    };

    store
        .list_group(&group_name)
        .await?
        .iter()
        .map(record_to_member)
        .collect()
}

fn record_to_member(record: &UserRecord) -> Result<Member, DomainError> {
    record.to_member().map_err(|e| {
        StoreError::InvalidData(format!(
            "registerDate `{}` of {}: {}",
            record.register_date, record.user_name, e
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryUserStore;

    fn record(user_name: &str, group_name: &str) -> UserRecord {
        UserRecord {
            user_name: user_name.to_string(),
            group_name: group_name.to_string(),
            register_date: "2023-06-01T19:52:21+09:00".to_string(),
        }
    }

    fn store() -> InMemoryUserStore {
        InMemoryUserStore::with_records(vec![
            record("alice", "vitaminD"),
            record("bob", "other"),
            record("carol", "vitaminD"),
        ])
    }

    fn identities(members: &[Member]) -> Vec<&str> {
        members.iter().map(|m| m.identity.as_str()).collect()
    }

    #[tokio::test]
    async fn test_resolve_by_identity_lists_whole_group() {
        let store = store();

        let members = resolve_group_members(&store, RosterKey::Identity("carol"))
            .await
            .unwrap();

        assert_eq!(identities(&members), vec!["alice", "carol"]);
        assert!(members.iter().all(|m| m.group == "vitaminD"));
    }

    #[tokio::test]
    async fn test_resolve_by_group() {
        let store = store();

        let members = resolve_group_members(&store, RosterKey::Group("other"))
            .await
            .unwrap();

        assert_eq!(identities(&members), vec!["bob"]);
    }

    #[tokio::test]
    async fn test_unknown_identity_is_member_not_found() {
        let store = store();

        let err = resolve_group_members(&store, RosterKey::Identity("mallory"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::MemberNotFound(name) if name == "mallory"));
    }

    #[tokio::test]
    async fn test_unknown_group_is_empty() {
        let members = resolve_group_members(&store(), RosterKey::Group("nobody"))
            .await
            .unwrap();

        assert!(members.is_empty());
    }

    #[tokio::test]
    async fn test_bad_register_date_is_store_error() {
        let mut broken = record("dave", "vitaminD");
        broken.register_date = "2023-06-01".to_string();
        let store = InMemoryUserStore::with_records(vec![record("alice", "vitaminD"), broken]);

        let err = resolve_group_members(&store, RosterKey::Group("vitaminD"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Store(msg) if msg.contains("dave")));
    }
}

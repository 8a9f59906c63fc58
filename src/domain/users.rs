use chrono::{DateTime, FixedOffset};
use tracing::info;

use super::DomainError;
use crate::activity::{ActivityClient, ActivityError};
use crate::db::UserStore;
use crate::models::UserRecord;

/// Register `user_name` in `group_name`, stamped with `registered_at`.
///
/// The identity must be known to the contributions service. The store write is
/// guarded, so an existing user is reported instead of overwritten.
#[tracing::instrument(skip(store, client))]
pub async fn register_user(
    user_name: &str,
    group_name: &str,
    registered_at: DateTime<FixedOffset>,
    store: &dyn UserStore,
    client: &dyn ActivityClient,
) -> Result<UserRecord, DomainError> {
    client.check_identity(user_name).await.map_err(|e| match e {
        ActivityError::NotFound(identity) => DomainError::UnknownIdentity(identity),
        ActivityError::LookupFailed(msg) | ActivityError::Malformed(msg) => {
            DomainError::ActivityService(msg)
        }
    })?;

    let record = UserRecord::new(user_name, group_name, registered_at);
    store.put_new_user(&record).await?;

    info!(register_date = %record.register_date, "Registered user");
    Ok(record)
}

#[tracing::instrument(skip(store))]
pub async fn get_user_group(user_name: &str, store: &dyn UserStore) -> Result<UserRecord, DomainError> {
    store
        .get_user(user_name)
        .await?
        .ok_or_else(|| DomainError::MemberNotFound(user_name.to_string()))
}

#[tracing::instrument(skip(store))]
pub async fn list_group_users(group_name: &str, store: &dyn UserStore) -> Result<Vec<UserRecord>, DomainError> {
    Ok(store.list_group(group_name).await?)
}

#[tracing::instrument(skip(store))]
pub async fn delete_user(user_name: &str, store: &dyn UserStore) -> Result<(), DomainError> {
    store.delete_user(user_name).await?;
    info!("Deleted user");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::MockActivityClient;
    use crate::db::InMemoryUserStore;
    use chrono::TimeZone;

    fn registered_at() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(2023, 6, 1, 19, 52, 21)
            .unwrap()
    }

    fn client_answering(result: Result<(), ActivityError>) -> MockActivityClient {
        let mut client = MockActivityClient::new();
        client
            .expect_check_identity()
            .returning(move |_| result.clone());
        client
    }

    #[tokio::test]
    async fn test_register_then_lookup() {
        let store = InMemoryUserStore::new();
        let client = client_answering(Ok(()));

        let record = register_user("MK8-31", "vitaminD", registered_at(), &store, &client)
            .await
            .unwrap();

        assert_eq!(record.register_date, "2023-06-01T19:52:21+09:00");
        assert_eq!(get_user_group("MK8-31", &store).await.unwrap(), record);
        assert_eq!(list_group_users("vitaminD", &store).await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_register_twice_conflicts() {
        let store = InMemoryUserStore::new();
        let client = client_answering(Ok(()));

        register_user("octocat", "vitaminD", registered_at(), &store, &client)
            .await
            .unwrap();
        let err = register_user("octocat", "other", registered_at(), &store, &client)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UserAlreadyExists(name) if name == "octocat"));
        assert_eq!(get_user_group("octocat", &store).await.unwrap().group_name, "vitaminD");
    }

    #[tokio::test]
    async fn test_register_unknown_identity_writes_nothing() {
        let store = InMemoryUserStore::new();
        let client = client_answering(Err(ActivityError::NotFound("ghost".to_string())));

        let err = register_user("ghost", "vitaminD", registered_at(), &store, &client)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::UnknownIdentity(name) if name == "ghost"));
        assert!(list_group_users("vitaminD", &store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_when_service_unreachable() {
        let store = InMemoryUserStore::new();
        let client = client_answering(Err(ActivityError::LookupFailed("timed out".to_string())));

        let err = register_user("octocat", "vitaminD", registered_at(), &store, &client)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::ActivityService(_)));
    }

    #[tokio::test]
    async fn test_missing_user() {
        let store = InMemoryUserStore::new();

        assert!(matches!(
            get_user_group("nobody", &store).await,
            Err(DomainError::MemberNotFound(_))
        ));
        assert!(matches!(
            delete_user("nobody", &store).await,
            Err(DomainError::MemberNotFound(_))
        ));
    }
}

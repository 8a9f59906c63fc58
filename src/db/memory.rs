use async_trait::async_trait;
use std::sync::RwLock;

use super::errors::{Result, StoreError};
use super::store::UserStore;
use crate::models::UserRecord;

/// Process-local [UserStore]. Group listings come back in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    records: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().collect()),
        }
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user(&self, user_name: &str) -> Result<Option<UserRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.iter().find(|r| r.user_name == user_name).cloned())
    }

    async fn put_new_user(&self, record: &UserRecord) -> Result<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if records.iter().any(|r| r.user_name == record.user_name) {
            return Err(StoreError::AlreadyExists(record.user_name.clone()));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn delete_user(&self, user_name: &str) -> Result<()> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let before = records.len();
        records.retain(|r| r.user_name != user_name);
        if records.len() == before {
            return Err(StoreError::NotFound(user_name.to_string()));
        }
        Ok(())
    }

    async fn list_group(&self, group_name: &str) -> Result<Vec<UserRecord>> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records
            .iter()
            .filter(|r| r.group_name == group_name)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_name: &str, group_name: &str) -> UserRecord {
        UserRecord {
            user_name: user_name.to_string(),
            group_name: group_name.to_string(),
            register_date: "2023-06-01T19:52:21+09:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_put_is_guarded() {
        let store = InMemoryUserStore::new();

        store.put_new_user(&record("octocat", "vitaminD")).await.unwrap();
        let err = store.put_new_user(&record("octocat", "other")).await.unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists(name) if name == "octocat"));
        assert_eq!(
            store.get_user("octocat").await.unwrap().map(|r| r.group_name),
            Some("vitaminD".to_string())
        );
    }

    #[tokio::test]
    async fn test_delete_is_guarded() {
        let store = InMemoryUserStore::with_records(vec![record("octocat", "vitaminD")]);

        store.delete_user("octocat").await.unwrap();

        assert_eq!(store.get_user("octocat").await.unwrap(), None);
        assert!(matches!(store.delete_user("octocat").await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_group_keeps_insertion_order() {
        let store = InMemoryUserStore::with_records(vec![
            record("carol", "vitaminD"),
            record("alice", "other"),
            record("bob", "vitaminD"),
        ]);

        let names: Vec<String> = store
            .list_group("vitaminD")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.user_name)
            .collect();

        assert_eq!(names, vec!["carol".to_string(), "bob".to_string()]);
        assert!(store.list_group("empty").await.unwrap().is_empty());
    }
}

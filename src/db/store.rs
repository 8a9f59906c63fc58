use async_trait::async_trait;

use super::errors::Result;
use crate::models::UserRecord;

/// Key-value access to the user table
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Point lookup by user name
    async fn get_user(&self, user_name: &str) -> Result<Option<UserRecord>>;

    /// Insert a user, failing with `AlreadyExists` if the user name is taken
    async fn put_new_user(&self, record: &UserRecord) -> Result<()>;

    /// Delete a user, failing with `NotFound` if there is nothing to delete
    async fn delete_user(&self, user_name: &str) -> Result<()>;

    /// Every user in `group_name`, in index order. Not paginated.
    async fn list_group(&self, group_name: &str) -> Result<Vec<UserRecord>>;
}

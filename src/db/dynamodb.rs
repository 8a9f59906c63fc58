use async_trait::async_trait;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion};
use aws_sdk_dynamodb::{
    config::Region,
    error::{DisplayErrorContext, SdkError},
    operation::{delete_item::DeleteItemError, put_item::PutItemError},
    types::AttributeValue,
    Client,
};
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_item};
use tracing::{error, info};

use super::errors::{Result, StoreError};
use super::store::UserStore;
use crate::config::StoreConfig;
use crate::models::UserRecord;

const USER_NAME_KEY: &str = "userName";

/// Build a DynamoDB client for the configured region, honouring an endpoint override
pub async fn create_client(config: &StoreConfig) -> Client {
    let region_provider = RegionProviderChain::first_try(Some(Region::new(config.region.clone())))
        .or_default_provider();

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
    if let Some(endpoint) = &config.endpoint {
        info!(endpoint = %endpoint, "Using DynamoDB endpoint override");
        loader = loader.endpoint_url(endpoint.as_str());
    }

    Client::new(&loader.load().await)
}

fn backend_error<E>(operation: &'static str, err: E) -> StoreError
where
    E: std::error::Error + 'static,
{
    let message = format!("{} failed: {}", operation, DisplayErrorContext(&err));
    error!("{}", message);
    StoreError::Backend(message)
}

/// [UserStore] backed by a single DynamoDB table keyed on `userName`, with a
/// global secondary index on `groupName`
#[derive(Debug, Clone)]
pub struct DynamoUserStore {
    client: Client,
    table_name: String,
    group_index_name: String,
}

impl DynamoUserStore {
    pub fn new(client: Client, table_name: impl Into<String>, group_index_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            group_index_name: group_index_name.into(),
        }
    }

    pub async fn from_config(config: &StoreConfig) -> Self {
        let client = create_client(config).await;
        Self::new(client, config.table_name.clone(), config.group_index_name.clone())
    }
}

#[async_trait]
impl UserStore for DynamoUserStore {
    #[tracing::instrument(skip(self))]
    async fn get_user(&self, user_name: &str) -> Result<Option<UserRecord>> {
        self.client
            .get_item()
            .table_name(&self.table_name)
            .key(USER_NAME_KEY, AttributeValue::S(user_name.to_string()))
            .send()
            .await
            .map_err(|e| backend_error("GetItem", e))?
            .item
            .map(from_item)
            .transpose()
            .map_err(StoreError::from)
    }

    #[tracing::instrument(skip(self, record), fields(user_name = %record.user_name, group_name = %record.group_name))]
    async fn put_new_user(&self, record: &UserRecord) -> Result<()> {
        let item = to_item(record)?;

        match self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(userName)")
            .send()
            .await
        {
            Ok(_) => Ok(()),
            // A failed existence guard means the user name is already taken
            Err(SdkError::ServiceError(inner))
                if matches!(inner.err(), PutItemError::ConditionalCheckFailedException(_)) =>
            {
                Err(StoreError::AlreadyExists(record.user_name.clone()))
            }
            Err(err) => Err(backend_error("PutItem", err)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, user_name: &str) -> Result<()> {
        match self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key(USER_NAME_KEY, AttributeValue::S(user_name.to_string()))
            .condition_expression("attribute_exists(userName)")
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(SdkError::ServiceError(inner))
                if matches!(inner.err(), DeleteItemError::ConditionalCheckFailedException(_)) =>
            {
                Err(StoreError::NotFound(user_name.to_string()))
            }
            Err(err) => Err(backend_error("DeleteItem", err)),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_group(&self, group_name: &str) -> Result<Vec<UserRecord>> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .index_name(&self.group_index_name)
            .key_condition_expression("groupName = :groupName")
            .expression_attribute_values(":groupName", AttributeValue::S(group_name.to_string()))
            .send()
            .await
            .map_err(|e| backend_error("Query", e))?;

        Ok(from_items(output.items.unwrap_or_default())?)
    }
}

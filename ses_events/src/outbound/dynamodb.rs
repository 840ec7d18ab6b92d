//! [RecordStore] backed by a DynamoDB table

use std::collections::HashMap;

use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::ProvideErrorMetadata;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::domain::{
    models::{StoreRecord, StoreValue},
    ports::{RecordStore, StoreError},
};


/// Writes [StoreRecord]s to a single table.
/// The key schema is owned by the table, the expected schema is `MessageId` / `EventKey` with
/// TTL enabled on `ExpiresAt`.
#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    client: Client,
    table: String,
}

impl DynamoRecordStore {
    #[allow(missing_docs)]
    pub fn new(client: Client, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }
}

/// Convert a record into its DynamoDB item
pub fn to_item(record: &StoreRecord) -> HashMap<String, AttributeValue> {
    record
        .iter()
        .map(|(name, value)| {
            let value = match value {
                StoreValue::S(s) => AttributeValue::S(s.clone()),
                StoreValue::Ss(set) => AttributeValue::Ss(set.clone()),
                StoreValue::N(n) => AttributeValue::N(n.to_string()),
            };
            (name.to_string(), value)
        })
        .collect()
}

fn map_put_error(err: PutItemError) -> StoreError {
    match err {
        PutItemError::ResourceNotFoundException(e) => StoreError::NotFound(e.to_string()),
        e if e.code() == Some("AccessDeniedException") => StoreError::AccessDenied(e.to_string()),
        e => StoreError::Other(anyhow::Error::from(e).context("could not put item, dynamodb")),
    }
}

impl RecordStore for DynamoRecordStore {
    #[tracing::instrument(err, skip(self, record), fields(table = %self.table))]
    async fn put_record(&self, record: StoreRecord) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(&record)))
            .send()
            .await
            .map_err(|err| map_put_error(err.into_service_error()))?;

        Ok(())
    }
}

// ABOUTME: DynamoDB implementation of the table store capability
// ABOUTME: Builds the SDK client from AwsConfig and maps SDK errors to StoreError

use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::types::KeyType;
use aws_sdk_dynamodb::Client;

use super::{KeySchema, RawItem, ScanPage, StoreError, TableStore};
use crate::config::AwsConfig;
use crate::error::{MigratorError, Result};

/// Table store backed by a live DynamoDB endpoint
#[derive(Debug, Clone)]
pub struct DynamoDbStore {
    client: Client,
}

impl DynamoDbStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Connect using the default AWS credential chain plus any overrides
    ///
    /// Region, profile and endpoint from `config` take precedence over the
    /// environment and shared config files.
    ///
    /// # Errors
    ///
    /// Returns [`MigratorError::Config`] when no region can be resolved.
    pub async fn connect(config: &AwsConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        if sdk_config.region().is_none() {
            return Err(MigratorError::Config(
                "no AWS region configured (use --region or set AWS_REGION)".to_string(),
            ));
        }

        tracing::debug!("Using {}", config.target_display());

        Ok(Self::new(Client::new(&sdk_config)))
    }
}

#[async_trait]
impl TableStore for DynamoDbStore {
    async fn describe_key_schema(&self, table: &str) -> std::result::Result<KeySchema, StoreError> {
        let output = self
            .client
            .describe_table()
            .table_name(table)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, table))?;

        let description = output.table().ok_or_else(|| StoreError::Service {
            operation: "DescribeTable",
            message: "response did not include a table description".to_string(),
        })?;

        let mut schema = KeySchema {
            table_name: description.table_name().unwrap_or(table).to_string(),
            hash_key: String::new(),
            range_key: None,
        };

        for element in description.key_schema() {
            match element.key_type() {
                KeyType::Hash => schema.hash_key = element.attribute_name().to_string(),
                KeyType::Range => schema.range_key = Some(element.attribute_name().to_string()),
                other => {
                    tracing::warn!("Ignoring unknown key type {:?} on table '{}'", other, table)
                }
            }
        }

        Ok(schema)
    }

    async fn scan_page(
        &self,
        table: &str,
        exclusive_start_key: Option<RawItem>,
    ) -> std::result::Result<ScanPage, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(table)
            .set_exclusive_start_key(exclusive_start_key)
            .send()
            .await
            .map_err(|e| map_scan_error(e, table))?;

        Ok(ScanPage {
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key.filter(|key| !key.is_empty()),
        })
    }

    async fn put_item(&self, table: &str, item: RawItem) -> std::result::Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table))?;

        Ok(())
    }
}

fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            StoreError::TableNotFound(table.to_string())
        }
        err => StoreError::Service {
            operation: "DescribeTable",
            message: DisplayErrorContext(&err).to_string(),
        },
    }
}

fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        ScanError::ProvisionedThroughputExceededException(_) => StoreError::Service {
            operation: "Scan",
            message: "throughput exceeded".to_string(),
        },
        err => StoreError::Service {
            operation: "Scan",
            message: DisplayErrorContext(&err).to_string(),
        },
    }
}

fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
) -> StoreError {
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => StoreError::TableNotFound(table.to_string()),
        PutItemError::ProvisionedThroughputExceededException(_) => StoreError::Service {
            operation: "PutItem",
            message: "throughput exceeded".to_string(),
        },
        PutItemError::ItemCollectionSizeLimitExceededException(_) => StoreError::Service {
            operation: "PutItem",
            message: "item collection size limit exceeded".to_string(),
        },
        err => StoreError::Service {
            operation: "PutItem",
            message: DisplayErrorContext(&err).to_string(),
        },
    }
}

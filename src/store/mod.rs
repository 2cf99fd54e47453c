// ABOUTME: Backing store capability used by export and import
// ABOUTME: Describes key schema, scans pages, and writes single items

pub mod dynamodb;
pub mod memory;

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;

pub use dynamodb::DynamoDbStore;
pub use memory::InMemoryStore;

/// A record as the store represents it: attribute name to typed value
pub type RawItem = HashMap<String, AttributeValue>;

/// Errors reported by a [`TableStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },

    /// The store refused the request itself, e.g. an item missing its key
    #[error("Request rejected: {reason}")]
    Rejected { reason: String },
}

/// Key attribute names declared by a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub table_name: String,
    pub hash_key: String,
    pub range_key: Option<String>,
}

/// One page of a paginated scan
///
/// A page without `last_evaluated_key` is the final page.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<RawItem>,
    pub last_evaluated_key: Option<RawItem>,
}

/// The three operations the migrator needs from a wide-column store
///
/// Any store offering these can stand in for DynamoDB. Callers issue one
/// request at a time and await it before sending the next.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Look up the table's hash and range key names
    async fn describe_key_schema(&self, table: &str) -> Result<KeySchema, StoreError>;

    /// Read one page of items, continuing after `exclusive_start_key`
    async fn scan_page(
        &self,
        table: &str,
        exclusive_start_key: Option<RawItem>,
    ) -> Result<ScanPage, StoreError>;

    /// Unconditionally create or overwrite an item
    async fn put_item(&self, table: &str, item: RawItem) -> Result<(), StoreError>;
}

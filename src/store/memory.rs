// ABOUTME: In-memory implementation of the table store capability
// ABOUTME: Keeps tables in HashMaps behind an async RwLock; used by tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use tokio::sync::RwLock;

use super::{KeySchema, RawItem, ScanPage, StoreError, TableStore};

const DEFAULT_PAGE_SIZE: usize = 100;

fn is_key_type(value: &AttributeValue) -> bool {
    matches!(
        value,
        AttributeValue::S(_) | AttributeValue::N(_) | AttributeValue::B(_)
    )
}

#[derive(Debug)]
struct MemoryTable {
    schema: KeySchema,
    items: Vec<RawItem>,
}

impl MemoryTable {
    fn key_of(&self, item: &RawItem) -> Result<RawItem, StoreError> {
        let mut key = RawItem::new();
        let names = std::iter::once(&self.schema.hash_key).chain(self.schema.range_key.as_ref());

        for name in names {
            match item.get(name) {
                Some(value) if is_key_type(value) => {
                    key.insert(name.clone(), value.clone());
                }
                Some(_) => {
                    return Err(StoreError::Rejected {
                        reason: format!("key attribute '{}' must be of type S, N or B", name),
                    })
                }
                None => {
                    return Err(StoreError::Rejected {
                        reason: format!("missing key attribute '{}'", name),
                    })
                }
            }
        }

        Ok(key)
    }

    fn position_of(&self, key: &RawItem) -> Option<usize> {
        self.items
            .iter()
            .position(|item| key.iter().all(|(name, value)| item.get(name) == Some(value)))
    }
}

/// Table store holding everything in memory
///
/// Items keep insertion order, and a put with an existing key replaces the
/// stored item in place, mirroring DynamoDB's overwrite semantics. Scans are
/// split into pages of `page_size` items.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<HashMap<String, MemoryTable>>>,
    page_size: usize,
    scan_pages_served: Arc<AtomicUsize>,
    fail_scan_at_page: Option<usize>,
    writes: Arc<AtomicUsize>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(HashMap::new())),
            page_size: DEFAULT_PAGE_SIZE,
            scan_pages_served: Arc::new(AtomicUsize::new(0)),
            fail_scan_at_page: None,
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Serve scans in pages of at most `page_size` items
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Make the `page`-th scan request (1-based, counted per scan) fail
    pub fn with_scan_failure_at_page(mut self, page: usize) -> Self {
        self.fail_scan_at_page = Some(page);
        self
    }

    /// Create an empty table, replacing any table with the same name
    pub async fn create_table(&self, name: &str, hash_key: &str, range_key: Option<&str>) {
        let schema = KeySchema {
            table_name: name.to_string(),
            hash_key: hash_key.to_string(),
            range_key: range_key.map(str::to_string),
        };
        self.tables.write().await.insert(
            name.to_string(),
            MemoryTable {
                schema,
                items: Vec::new(),
            },
        );
    }

    /// Snapshot of a table's items in storage order
    pub async fn items(&self, table: &str) -> Vec<RawItem> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }

    pub async fn item_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, |t| t.items.len())
    }

    /// Number of successful puts across all tables
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableStore for InMemoryStore {
    async fn describe_key_schema(&self, table: &str) -> Result<KeySchema, StoreError> {
        self.tables
            .read()
            .await
            .get(table)
            .map(|t| t.schema.clone())
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    async fn scan_page(
        &self,
        table: &str,
        exclusive_start_key: Option<RawItem>,
    ) -> Result<ScanPage, StoreError> {
        let page_number = if exclusive_start_key.is_none() {
            self.scan_pages_served.store(1, Ordering::SeqCst);
            1
        } else {
            self.scan_pages_served.fetch_add(1, Ordering::SeqCst) + 1
        };

        if self.fail_scan_at_page == Some(page_number) {
            return Err(StoreError::Service {
                operation: "Scan",
                message: format!("injected failure on page {}", page_number),
            });
        }

        let tables = self.tables.read().await;
        let memory_table = tables
            .get(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let start = match &exclusive_start_key {
            None => 0,
            Some(key) => memory_table
                .position_of(key)
                .map(|idx| idx + 1)
                .ok_or_else(|| StoreError::Rejected {
                    reason: "exclusive start key does not match any item".to_string(),
                })?,
        };

        let end = (start + self.page_size).min(memory_table.items.len());
        let items = memory_table.items[start..end].to_vec();

        let last_evaluated_key = if end < memory_table.items.len() {
            items.last().map(|item| memory_table.key_of(item)).transpose()?
        } else {
            None
        };

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }

    async fn put_item(&self, table: &str, item: RawItem) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let memory_table = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;

        let key = memory_table.key_of(&item)?;
        match memory_table.position_of(&key) {
            Some(idx) => memory_table.items[idx] = item,
            None => memory_table.items.push(item),
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

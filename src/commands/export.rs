// ABOUTME: Export command: key schema plus a full paginated scan as one document
// ABOUTME: Any failing page aborts the export; partial documents are never produced

use crate::convert;
use crate::document::ExportDocument;
use crate::error::{MigratorError, Result};
use crate::store::{RawItem, TableStore};

/// Export a table as a JSON string
///
/// Runs [`export_table`] and serializes the document. The caller decides
/// where the output goes; nothing is written to disk here.
///
/// # Examples
///
/// ```no_run
/// # use dynamodb_migrator::commands::export;
/// # use dynamodb_migrator::config::AwsConfig;
/// # use dynamodb_migrator::store::DynamoDbStore;
/// # async fn example() -> dynamodb_migrator::error::Result<()> {
/// let store = DynamoDbStore::connect(&AwsConfig::default()).await?;
/// let json = export(&store, "foo").await?;
/// println!("{}", json);
/// # Ok(())
/// # }
/// ```
pub async fn export<S>(store: &S, table: &str) -> Result<String>
where
    S: TableStore + ?Sized,
{
    let document = export_table(store, table).await?;
    render_document(&document)
}

/// Build the export document for a table
///
/// Steps:
/// 1. Describe the table to find its hash and range key names
/// 2. Scan every page, accumulating all raw items in scan order
/// 3. Decode each item into a JSON object
///
/// # Errors
///
/// - [`MigratorError::SchemaLookup`] if the table cannot be described
/// - [`MigratorError::Scan`] if any scan page fails (earlier pages are discarded)
/// - [`MigratorError::Decode`] if an item holds a value with no JSON form
pub async fn export_table<S>(store: &S, table: &str) -> Result<ExportDocument>
where
    S: TableStore + ?Sized,
{
    tracing::info!("Describing table '{}'...", table);
    let schema = store
        .describe_key_schema(table)
        .await
        .map_err(|source| MigratorError::SchemaLookup {
            table: table.to_string(),
            source,
        })?;

    if schema.hash_key.is_empty() {
        tracing::warn!("⚠ Table '{}' reports no hash key", table);
    }
    tracing::debug!(
        "Key schema: hash='{}' range='{}'",
        schema.hash_key,
        schema.range_key.as_deref().unwrap_or("")
    );

    let raw_items = scan_all(store, table).await?;

    let mut items = Vec::with_capacity(raw_items.len());
    for (index, raw) in raw_items.iter().enumerate() {
        let item = convert::item_to_json(raw).map_err(|(attribute, e)| MigratorError::Decode {
            index: index + 1,
            attribute,
            reason: e.reason,
        })?;
        items.push(item);
    }

    tracing::info!("✓ Exported {} item(s) from '{}'", items.len(), table);

    Ok(ExportDocument {
        table_name: schema.table_name,
        primary_key: schema.hash_key,
        range_key: schema.range_key.unwrap_or_default(),
        items,
    })
}

/// Serialize a document as compact JSON
pub fn render_document(document: &ExportDocument) -> Result<String> {
    document.to_json().map_err(MigratorError::Encode)
}

async fn scan_all<S>(store: &S, table: &str) -> Result<Vec<RawItem>>
where
    S: TableStore + ?Sized,
{
    let mut items = Vec::new();
    let mut start_key = None;
    let mut page = 0;

    loop {
        page += 1;
        let output = store
            .scan_page(table, start_key)
            .await
            .map_err(|source| MigratorError::Scan {
                table: table.to_string(),
                page,
                source,
            })?;

        tracing::debug!("Scan page {}: {} item(s)", page, output.items.len());
        items.extend(output.items);

        match output.last_evaluated_key {
            Some(key) => start_key = Some(key),
            None => break,
        }
    }

    tracing::info!("Scanned {} page(s) from '{}'", page, table);
    Ok(items)
}

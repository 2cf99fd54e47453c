// ABOUTME: Import command: replays an exported document into a table
// ABOUTME: Confirms first, then writes items one at a time, stopping at the first failure

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};

use crate::convert;
use crate::document::ExportDocument;
use crate::error::{MigratorError, Result};
use crate::interactive::{import_prompt, Confirmer};
use crate::store::TableStore;

/// How an import run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The user answered no; nothing was written
    Declined,
    /// Every item in the document was written
    Completed { written: usize },
}

/// Import a previously exported JSON file into `table`
///
/// The document's own `TableName` is ignored; items always go to `table`.
///
/// # Errors
///
/// - [`MigratorError::FileRead`] if the file cannot be read
/// - [`MigratorError::Parse`] if it is not a valid export document
/// - [`MigratorError::Write`] if a write fails; earlier writes are kept
///
/// # Examples
///
/// ```no_run
/// # use dynamodb_migrator::commands::import;
/// # use dynamodb_migrator::config::AwsConfig;
/// # use dynamodb_migrator::interactive::TerminalConfirmer;
/// # use dynamodb_migrator::store::DynamoDbStore;
/// # use std::path::Path;
/// # async fn example() -> dynamodb_migrator::error::Result<()> {
/// let store = DynamoDbStore::connect(&AwsConfig::default()).await?;
/// import(&store, &TerminalConfirmer, "foo", Path::new("foo.json")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn import<S, C>(
    store: &S,
    confirmer: &C,
    table: &str,
    path: &Path,
) -> Result<ImportOutcome>
where
    S: TableStore + ?Sized,
    C: Confirmer + ?Sized,
{
    tracing::info!("Reading import file '{}'...", path.display());
    let raw = tokio::fs::read(path).await.map_err(|source| MigratorError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let document = ExportDocument::from_slice(&raw).map_err(|source| MigratorError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(
        "Loaded {} item(s) exported from '{}'",
        document.items.len(),
        document.table_name
    );

    import_document(store, confirmer, table, document).await
}

/// Write every item of `document` into `table` after confirmation
///
/// Items are written in document order with unconditional puts, one request
/// at a time. Declining the prompt is not an error.
pub async fn import_document<S, C>(
    store: &S,
    confirmer: &C,
    table: &str,
    document: ExportDocument,
) -> Result<ImportOutcome>
where
    S: TableStore + ?Sized,
    C: Confirmer + ?Sized,
{
    if !confirmer.confirm(&import_prompt(table)) {
        tracing::info!("Import into '{}' cancelled, no items written", table);
        return Ok(ImportOutcome::Declined);
    }

    let total = document.items.len();
    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    for (idx, item) in document.items.iter().enumerate() {
        let raw = convert::json_to_item(item);

        if let Err(source) = store.put_item(table, raw).await {
            progress.abandon_with_message("Import aborted");
            tracing::error!(
                "Write {}/{} into '{}' failed; {} item(s) already written",
                idx + 1,
                total,
                table,
                idx
            );
            return Err(MigratorError::Write {
                table: table.to_string(),
                position: idx + 1,
                total,
                source,
            });
        }

        progress.inc(1);
    }

    progress.finish_with_message("Import complete");
    tracing::info!("✓ Imported {} item(s) into '{}'", total, table);

    Ok(ImportOutcome::Completed { written: total })
}

// ABOUTME: Command implementations for export and import
// ABOUTME: run() dispatches on the configured mode and returns what happened

pub mod export;
pub mod import;

pub use export::{export, export_table, render_document};
pub use import::{import, import_document, ImportOutcome};

use crate::config::{MigratorConfig, Mode};
use crate::error::Result;
use crate::interactive::Confirmer;
use crate::store::TableStore;

/// Result of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Export succeeded; holds the JSON to print
    Exported(String),
    Imported(ImportOutcome),
}

/// Run exactly one of export or import as configured
pub async fn run<S, C>(config: &MigratorConfig, store: &S, confirmer: &C) -> Result<RunOutcome>
where
    S: TableStore + ?Sized,
    C: Confirmer + ?Sized,
{
    match config.mode() {
        Mode::Export => export(store, &config.table_name)
            .await
            .map(RunOutcome::Exported),
        Mode::Import(path) => import(store, confirmer, &config.table_name, path)
            .await
            .map(RunOutcome::Imported),
    }
}

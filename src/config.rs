// ABOUTME: Immutable run configuration built once from parsed arguments
// ABOUTME: Selects export or import mode and carries AWS client overrides

use std::path::{Path, PathBuf};

/// AWS client overrides; unset fields fall back to the default provider chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsConfig {
    /// AWS region, e.g. `us-east-1`
    pub region: Option<String>,
    /// Custom endpoint URL (for DynamoDB Local)
    pub endpoint_url: Option<String>,
    /// Named profile from the shared AWS config files
    pub profile: Option<String>,
}

impl AwsConfig {
    /// Returns a display string for the target environment.
    pub fn target_display(&self) -> String {
        let region = self.region.as_deref().unwrap_or("default region");
        match &self.endpoint_url {
            Some(url) => format!("DynamoDB at {} ({})", url, region),
            None => format!("AWS DynamoDB ({})", region),
        }
    }
}

/// What a run does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode<'a> {
    Export,
    Import(&'a Path),
}

/// Settings for one run, fixed at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratorConfig {
    pub table_name: String,
    pub import_path: Option<PathBuf>,
    /// Skip the confirmation prompt before importing
    pub assume_yes: bool,
    pub aws: AwsConfig,
}

impl MigratorConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            import_path: None,
            assume_yes: false,
            aws: AwsConfig::default(),
        }
    }

    pub fn with_import_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_path = Some(path.into());
        self
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub fn with_aws(mut self, aws: AwsConfig) -> Self {
        self.aws = aws;
        self
    }

    /// Import when a path was given, export otherwise
    pub fn mode(&self) -> Mode<'_> {
        match &self.import_path {
            Some(path) => Mode::Import(path),
            None => Mode::Export,
        }
    }
}

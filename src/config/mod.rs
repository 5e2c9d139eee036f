pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::commission::CommissionPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
pub const DEFAULT_ARCHIVE_NAME: &str = "commission_report.zip";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "sales-commission-etl")]
#[command(about = "Computes sales commissions for a table of sales records")]
pub struct CliConfig {
    /// CSV or TSV file with sales records; the built-in sample is used when omitted
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv")]
    pub output_formats: Vec<String>,

    #[arg(long, help = "Bundle all reports into a single ZIP archive")]
    pub compress: bool,

    #[arg(long, help = "Discard invalid records instead of aborting")]
    pub skip_invalid: bool,

    #[arg(long, help = "Evaluate records on all CPU cores")]
    pub parallel: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(skip)]
    #[serde(default)]
    pub policy: CommissionPolicy,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn policy(&self) -> &CommissionPolicy {
        &self.policy
    }

    fn skip_invalid_records(&self) -> bool {
        self.skip_invalid
    }

    fn parallel(&self) -> bool {
        self.parallel
    }

    fn archive_name(&self) -> Option<&str> {
        self.compress.then_some(DEFAULT_ARCHIVE_NAME)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validation::validate_path("input", input)?;
            validation::validate_file_extensions(
                "input",
                &[input.as_str()],
                &validation::SUPPORTED_INPUT_EXTENSIONS,
            )?;
        }
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        self.policy.validate()
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["sales-commission-etl"]);

        assert_eq!(config.input_path(), None);
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_formats(), ["csv".to_string()]);
        assert_eq!(config.archive_name(), None);
        assert_eq!(*config.policy(), CommissionPolicy::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags() {
        let config = CliConfig::parse_from([
            "sales-commission-etl",
            "--input",
            "sales.tsv",
            "--output-formats",
            "csv,json",
            "--compress",
            "--skip-invalid",
            "--parallel",
        ]);

        assert_eq!(config.input_path(), Some("sales.tsv"));
        assert_eq!(config.output_formats().len(), 2);
        assert_eq!(config.archive_name(), Some(DEFAULT_ARCHIVE_NAME));
        assert!(config.skip_invalid_records());
        assert!(config.parallel());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_validation_rejects_bad_values() {
        let config = CliConfig::parse_from(["sales-commission-etl", "--input", "sales.xlsx"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from(["sales-commission-etl", "--output-formats", "pdf"]);
        assert!(config.validate().is_err());

        let config = CliConfig::parse_from([
            "sales-commission-etl",
            "--output-formats",
            "csv,csv",
            "--compress",
        ]);
        assert!(config.validate().is_err());
    }
}

pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use self::core::{
    etl::{EtlEngine, EtlReport},
    pipeline::CommissionPipeline,
};
pub use domain::commission::{compute_commission, CommissionBreakdown, CommissionPolicy};
pub use domain::model::{
    CommissionedRecord, ProductCategory, RejectedRow, SalesRecord, SalesRow, SalesSummary,
    Seniority,
};
pub use utils::error::{EtlError, Result};

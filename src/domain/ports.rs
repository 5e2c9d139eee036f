use crate::domain::commission::CommissionPolicy;
use crate::domain::model::{RawBatch, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    /// `None` runs against the built-in sample table.
    fn input_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn policy(&self) -> &CommissionPolicy;
    fn skip_invalid_records(&self) -> bool;
    fn parallel(&self) -> bool;
    /// Archive name when output should be zipped.
    fn archive_name(&self) -> Option<&str>;

    fn report_filename(&self, format: &str) -> String {
        format!("commission_report.{}", format)
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<RawBatch>;
    async fn transform(&self, batch: RawBatch) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}

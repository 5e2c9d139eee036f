use crate::core::Pipeline;
use crate::domain::model::SalesSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct EtlReport {
    pub output_path: String,
    pub summary: SalesSummary,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<EtlReport> {
        tracing::info!("Starting commission ETL process...");
        self.monitor.log_stats("Start");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} records ({} rejected while reading)",
            raw_data.rows.len(),
            raw_data.rejected.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "Transformed {} records ({} rejected)",
            transformed.records.len(),
            transformed.rejected.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(&transformed).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(EtlReport {
            output_path,
            summary: transformed.summary,
        })
    }

    /// Runs extract and transform only; nothing is written.
    pub async fn preview(&self) -> Result<SalesSummary> {
        let raw_data = self.pipeline.extract().await?;
        let transformed = self.pipeline.transform(raw_data).await?;
        Ok(transformed.summary)
    }
}

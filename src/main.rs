use clap::Parser;
use sales_commission_etl::utils::error::{EtlError, ErrorSeverity};
use sales_commission_etl::utils::{logger, validation::Validate};
use sales_commission_etl::{CliConfig, CommissionPipeline, EtlEngine, LocalStorage, SalesSummary};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting sales-commission-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = CommissionPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Commission report completed successfully!");
            println!("✅ Commission report completed successfully!");
            print_summary(&report.summary);
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn print_summary(summary: &SalesSummary) {
    println!("📊 Records processed: {}", summary.record_count);
    if summary.rejected_count > 0 {
        println!("⚠️  Records rejected: {}", summary.rejected_count);
    }
    println!("💵 Total sales: {:.2}", summary.total_sales);
    println!("💰 Total commission: {:.2}", summary.total_commission);
    println!("🎯 Met target: {:.0}%", summary.met_target_percent);
}

fn exit_with(e: EtlError) {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

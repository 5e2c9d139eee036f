use anyhow::Context;
use clap::Parser;
use sales_commission_etl::config::toml_config::{InvalidRecordPolicy, LogFormat, TomlConfig};
use sales_commission_etl::core::ConfigProvider;
use sales_commission_etl::utils::error::ErrorSeverity;
use sales_commission_etl::utils::{logger, validation::Validate};
use sales_commission_etl::{CommissionPipeline, EtlEngine, LocalStorage, SalesSummary};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Commission report driven by a TOML pipeline file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "commission-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override invalid-record handling from config (true = skip)
    #[arg(long)]
    skip_invalid: Option<bool>,

    /// Dry run - compute commissions and print the summary without writing reports
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    match config.log_format() {
        LogFormat::Json => logger::init_json_logger(args.verbose),
        LogFormat::Compact => logger::init_cli_logger(args.verbose),
    }

    tracing::info!("🚀 Starting TOML-based commission ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(skip) = args.skip_invalid {
        config.transform.on_invalid_record = if skip {
            InvalidRecordPolicy::Skip
        } else {
            InvalidRecordPolicy::Fail
        };
        tracing::info!("🔧 Invalid-record skipping overridden to: {}", skip);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = CommissionPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No reports will be written");
        let summary = engine.preview().await?;
        println!("🔍 Dry Run Result:");
        print_summary(&summary);
        return Ok(());
    }

    match engine.run().await {
        Ok(report) => {
            tracing::info!("✅ Commission report completed successfully!");
            println!("✅ Commission report completed successfully!");
            print_summary(&report.summary);
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

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
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!(
        "  Source: {}",
        config.input_path().unwrap_or("built-in sample data")
    );
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }

    let policy = config.policy();
    println!(
        "  Policy: {:.0}%/{:.0}% base (exceed at {}x target), +{:.0}% senior bonus, {}x premium",
        policy.met_rate * 100.0,
        policy.exceed_rate * 100.0,
        policy.exceed_factor,
        policy.senior_bonus * 100.0,
        policy.premium_multiplier
    );
    println!(
        "  Invalid records: {}",
        if config.skip_invalid_records() { "skip" } else { "fail" }
    );
    println!("  Parallel: {}", config.parallel());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn print_summary(summary: &SalesSummary) {
    println!("📊 Records processed: {}", summary.record_count);
    if summary.rejected_count > 0 {
        println!("⚠️  Records rejected: {}", summary.rejected_count);
    }
    if summary.zero_target_count > 0 {
        println!(
            "⚠️  Records with a zero target (treated as met): {}",
            summary.zero_target_count
        );
    }
    println!("💵 Total sales: {:.2}", summary.total_sales);
    println!("💰 Total commission: {:.2}", summary.total_commission);
    println!("🎯 Met target: {:.0}%", summary.met_target_percent);
}

use clap::Parser;
use list_migrate::core::inputs;
use list_migrate::utils::{logger, validation::Validate};
use list_migrate::{
    FileJournal, ListCopier, LocalStorage, MigrationConfig, MigrationEngine, WorkflowCopier,
};

#[derive(Parser)]
#[command(name = "run-migration")]
#[command(about = "Guarded bulk-copy of lists between campaign platform accounts")]
struct Args {
    /// Path to migration configuration file
    #[arg(short, long, default_value = "configs/migration.toml")]
    config: String,

    /// Perform real writes against the target account (default is simulate)
    #[arg(long)]
    execute: bool,

    /// Also copy automation workflows (overrides config)
    #[arg(long)]
    include_workflows: bool,

    /// Override the run name recorded in the journal
    #[arg(long)]
    run_name: Option<String>,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting list-migrate");
    tracing::info!("📁 Loading migration configuration from: {}", args.config);

    // 載入配置
    let config = match MigrationConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let simulate = if args.execute { false } else { config.simulate() };
    if simulate {
        tracing::info!("🔍 SIMULATE MODE - no changes will be made to the target account");
    } else {
        tracing::warn!("⚠️ LIVE RUN - lists will be created in the target account");
    }

    let run_name = args
        .run_name
        .clone()
        .unwrap_or_else(|| config.run_name(simulate));
    let include_workflows = args.include_workflows || config.include_workflows();
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    // 載入輸入檔
    let inputs_storage = LocalStorage::new(config.inputs.path.clone());
    let mappings = match inputs::load_id_mappings(&inputs_storage, config.id_mappings_file()).await
    {
        Ok(mappings) => mappings,
        Err(e) => {
            tracing::error!("❌ Failed to load id mappings: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Run create-inputs first to generate the input files");
            std::process::exit(1);
        }
    };
    let active_ids =
        match inputs::load_active_list_ids(&inputs_storage, config.active_list_ids_file()).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!("❌ Failed to load active list ids: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 Run create-inputs first to generate the input files");
                std::process::exit(1);
            }
        };
    tracing::info!(
        "📥 Loaded {} active list ids, {} user / {} group / {} list mappings",
        active_ids.len(),
        mappings.users.len(),
        mappings.groups.len(),
        mappings.lists.len()
    );

    // 建立 journal、copy steps 與 engine
    let report_storage = LocalStorage::new(config.output_path().to_string());
    let journal = FileJournal::new(config.log_file(), config.todo_file());

    let mut engine =
        MigrationEngine::new(journal, run_name, simulate).with_monitoring(monitor_enabled);
    engine.add_step(Box::new(ListCopier::new(
        report_storage.clone(),
        config.clone(),
        mappings.clone(),
        active_ids,
    )));
    engine.add_step(Box::new(WorkflowCopier::new(
        report_storage,
        config.clone(),
        mappings,
        include_workflows,
    )));

    match engine.run().await {
        Ok(summaries) => {
            let total: usize = summaries.iter().map(|s| s.attempted).sum();
            tracing::info!("✅ Migration run completed successfully!");
            println!(
                "✅ Migration run '{}' completed ({} entities processed)",
                engine.run_name(),
                total
            );
            println!("📁 Reports saved to: {}", config.output_path());
        }
        Err(e) => {
            tracing::error!(
                "❌ Migration run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                list_migrate::utils::error::ErrorSeverity::Low => 0,
                list_migrate::utils::error::ErrorSeverity::Medium => 2,
                list_migrate::utils::error::ErrorSeverity::High => 1,
                list_migrate::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

use anyhow::Context;
use clap::Parser;
use list_migrate::core::client::AccountClient;
use list_migrate::core::inputs;
use list_migrate::domain::ports::{ConfigProvider, Storage};
use list_migrate::utils::{logger, validation::Validate};
use list_migrate::{LocalStorage, MigrationConfig};
use std::path::Path;

#[derive(Parser)]
#[command(name = "create-inputs")]
#[command(about = "Build id_mappings.json and active_list_ids.json for a migration run")]
struct Args {
    /// Path to migration configuration file
    #[arg(short, long, default_value = "configs/migration.toml")]
    config: String,

    /// Overwrite existing input files
    #[arg(long)]
    force: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Preparing migration input files");
    let config = MigrationConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;
    config
        .validate()
        .context("configuration validation failed")?;

    // 防止覆蓋既有輸入檔
    let mappings_path = Path::new(&config.inputs.path).join(config.id_mappings_file());
    let active_path = Path::new(&config.inputs.path).join(config.active_list_ids_file());
    if !args.force && (mappings_path.exists() || active_path.exists()) {
        eprintln!(
            "❌ Input files already exist under '{}'",
            config.inputs.path
        );
        eprintln!("💡 Re-run with --force to regenerate them");
        std::process::exit(1);
    }

    let source = AccountClient::new(
        config.source_api_url(),
        config.source_api_token(),
        config.page_size(),
    );
    let target = AccountClient::new(
        config.target_api_url(),
        config.target_api_token(),
        config.page_size(),
    );

    tracing::info!("🔗 Matching entities between source and target accounts");
    let mappings = inputs::build_id_mappings(&source, &target).await?;
    let active_ids = inputs::build_active_list_ids(&source).await?;

    let storage = LocalStorage::new(config.inputs.path.clone());
    storage
        .write_file(
            config.id_mappings_file(),
            &serde_json::to_vec_pretty(&mappings)?,
        )
        .await?;
    storage
        .write_file(
            config.active_list_ids_file(),
            &serde_json::to_vec_pretty(&active_ids)?,
        )
        .await?;

    tracing::info!(
        "✅ Wrote {} user / {} group / {} list mappings and {} active list ids",
        mappings.users.len(),
        mappings.groups.len(),
        mappings.lists.len(),
        active_ids.len()
    );
    println!("✅ Input files written to: {}", config.inputs.path);

    Ok(())
}

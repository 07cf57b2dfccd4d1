use crate::core::client::AccountClient;
use crate::core::{ConfigProvider, CopyStep, Storage};
use crate::domain::model::{CopyAction, CopyOutcome, CopySummary, IdMappings, NewWorkflow};
use crate::utils::error::{MigrateError, Result};
use std::time::Instant;

/// copy_all_workflows：複製 automation workflows。
/// 此階段需人工確認後以設定開啟，預設停用。
pub struct WorkflowCopier<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source: AccountClient,
    target: AccountClient,
    mappings: IdMappings,
    enabled: bool,
}

impl<S: Storage, C: ConfigProvider> WorkflowCopier<S, C> {
    pub fn new(storage: S, config: C, mappings: IdMappings, enabled: bool) -> Self {
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

        Self {
            storage,
            config,
            source,
            target,
            mappings,
            enabled,
        }
    }

    /// workflow 引用的 list id 全部換成 target 端 id；有缺就整個 workflow 跳過
    fn remap_lists(&self, list_ids: &[String]) -> Option<Vec<String>> {
        list_ids
            .iter()
            .map(|id| self.mappings.list(id).map(str::to_string))
            .collect()
    }

    async fn write_report(&self, summary: &CopySummary) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["source_id", "name", "action", "target_id"])?;

        for action in &summary.actions {
            writer.write_record([
                action.source_id.as_str(),
                action.name.as_str(),
                action.outcome.label(),
                action.outcome.target_id().unwrap_or(""),
            ])?;
        }

        let data = writer
            .into_inner()
            .map_err(|e| MigrateError::ReportError {
                message: e.to_string(),
            })?;

        self.storage
            .write_file("workflow_copy_report.csv", &data)
            .await
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> CopyStep for WorkflowCopier<S, C> {
    fn name(&self) -> &str {
        "workflows"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    async fn copy_all(&self, simulate: bool) -> Result<CopySummary> {
        let start = Instant::now();
        tracing::info!(
            "🔁 Copying workflows from source account{}",
            if simulate { " (simulate mode)" } else { "" }
        );

        let workflows = self.source.fetch_workflows().await?;
        let mut summary = CopySummary::new("workflows");

        for workflow in workflows.iter().filter(|w| w.is_active()) {
            let remapped_lists = match self.remap_lists(&workflow.lists) {
                Some(lists) => lists,
                None => {
                    tracing::warn!(
                        "⚠️ Workflow '{}' references unmapped lists, skipping",
                        workflow.name
                    );
                    summary.record(CopyAction {
                        source_id: workflow.id.clone(),
                        name: workflow.name.clone(),
                        outcome: CopyOutcome::SkippedUnmapped,
                    });
                    continue;
                }
            };

            if simulate {
                tracing::info!("🔍 [simulate] would create workflow '{}'", workflow.name);
                summary.record(CopyAction {
                    source_id: workflow.id.clone(),
                    name: workflow.name.clone(),
                    outcome: CopyOutcome::Simulated,
                });
                continue;
            }

            let created = self
                .target
                .create_workflow(&NewWorkflow {
                    name: workflow.name.clone(),
                    status: "active".to_string(),
                    lists: remapped_lists,
                })
                .await?;
            tracing::info!(
                "✅ Created workflow '{}' in target (id {})",
                created.name,
                created.id
            );
            summary.record(CopyAction {
                source_id: workflow.id.clone(),
                name: workflow.name.clone(),
                outcome: CopyOutcome::Created {
                    target_id: created.id,
                },
            });
        }
        summary.duration = start.elapsed();

        if self.config.write_csv() {
            self.write_report(&summary).await?;
        }

        tracing::info!(
            "📦 workflows step done: {} attempted, {} created, {} simulated, {} skipped",
            summary.attempted,
            summary.created,
            summary.simulated,
            summary.skipped
        );

        Ok(summary)
    }
}

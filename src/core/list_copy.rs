use crate::core::client::AccountClient;
use crate::core::{ConfigProvider, CopyStep, Storage};
use crate::domain::model::{CopyAction, CopyOutcome, CopySummary, IdMappings, List, NewList};
use crate::utils::error::{MigrateError, Result};
use std::collections::HashMap;
use std::time::Instant;

/// copy_all_lists：把 source 帳號的 active lists 複製到 target 帳號
pub struct ListCopier<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    source: AccountClient,
    target: AccountClient,
    mappings: IdMappings,
    active_list_ids: Vec<String>,
}

impl<S: Storage, C: ConfigProvider> ListCopier<S, C> {
    pub fn new(storage: S, config: C, mappings: IdMappings, active_list_ids: Vec<String>) -> Self {
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
            active_list_ids,
        }
    }

    /// owner/group 換成 target 端 id，缺對照直接報錯
    fn remap(&self, list: &List) -> Result<NewList> {
        let owner = match &list.owner {
            Some(id) => Some(
                self.mappings
                    .user(id)
                    .ok_or_else(|| MigrateError::MappingError {
                        entity: "user".to_string(),
                        id: id.clone(),
                    })?
                    .to_string(),
            ),
            None => None,
        };

        let group = match &list.group {
            Some(id) => Some(
                self.mappings
                    .group(id)
                    .ok_or_else(|| MigrateError::MappingError {
                        entity: "group".to_string(),
                        id: id.clone(),
                    })?
                    .to_string(),
            ),
            None => None,
        };

        Ok(NewList {
            name: list.name.clone(),
            stringid: list.stringid.clone(),
            owner,
            group,
            sender_url: list.sender_url.clone(),
            sender_reminder: list.sender_reminder.clone(),
        })
    }

    async fn copy_one(&self, list: &List, simulate: bool) -> Result<CopyAction> {
        let payload = self.remap(list)?;

        if self.config.skip_existing() {
            if let Some(existing) = self.target.find_list_by_stringid(&list.stringid).await? {
                tracing::info!(
                    "⏭️ List '{}' already exists in target (id {}), skipping",
                    list.name,
                    existing.id
                );
                return Ok(CopyAction {
                    source_id: list.id.clone(),
                    name: list.name.clone(),
                    outcome: CopyOutcome::SkippedExisting {
                        target_id: existing.id,
                    },
                });
            }
        }

        if simulate {
            tracing::info!(
                "🔍 [simulate] would create list '{}' ({})",
                list.name,
                list.stringid
            );
            return Ok(CopyAction {
                source_id: list.id.clone(),
                name: list.name.clone(),
                outcome: CopyOutcome::Simulated,
            });
        }

        let created = self.target.create_list(&payload).await?;
        tracing::info!(
            "✅ Created list '{}' in target (id {})",
            created.name,
            created.id
        );

        Ok(CopyAction {
            source_id: list.id.clone(),
            name: list.name.clone(),
            outcome: CopyOutcome::Created {
                target_id: created.id,
            },
        })
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

        self.storage.write_file("list_copy_report.csv", &data).await
    }

    /// 真正建立過的 lists 留下 source → target id 對照，供 workflow 階段使用
    async fn write_created_mappings(&self, summary: &CopySummary) -> Result<()> {
        let created: HashMap<&str, &str> = summary
            .actions
            .iter()
            .filter_map(|a| match &a.outcome {
                CopyOutcome::Created { target_id } => {
                    Some((a.source_id.as_str(), target_id.as_str()))
                }
                _ => None,
            })
            .collect();

        if created.is_empty() {
            return Ok(());
        }

        let data = serde_json::to_vec_pretty(&created)?;
        self.storage
            .write_file("created_list_ids.json", &data)
            .await
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> CopyStep for ListCopier<S, C> {
    fn name(&self) -> &str {
        "lists"
    }

    async fn copy_all(&self, simulate: bool) -> Result<CopySummary> {
        let start = Instant::now();
        tracing::info!(
            "📋 Copying {} lists from source account{}",
            self.active_list_ids.len(),
            if simulate { " (simulate mode)" } else { "" }
        );

        let source_lists = self.source.fetch_lists().await?;
        let by_id: HashMap<&str, &List> =
            source_lists.iter().map(|l| (l.id.as_str(), l)).collect();

        let mut summary = CopySummary::new("lists");
        for id in &self.active_list_ids {
            let list = by_id.get(id.as_str()).copied().ok_or_else(|| {
                MigrateError::InputDataError {
                    message: format!(
                        "active list id {} not found in source account, regenerate inputs",
                        id
                    ),
                }
            })?;

            let action = self.copy_one(list, simulate).await?;
            summary.record(action);
        }
        summary.duration = start.elapsed();

        if self.config.write_csv() {
            self.write_report(&summary).await?;
        }
        if !simulate {
            self.write_created_mappings(&summary).await?;
        }

        tracing::info!(
            "📦 lists step done: {} attempted, {} created, {} simulated, {} skipped",
            summary.attempted,
            summary.created,
            summary.simulated,
            summary.skipped
        );

        Ok(summary)
    }
}

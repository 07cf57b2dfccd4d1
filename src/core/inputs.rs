use crate::core::client::AccountClient;
use crate::domain::model::IdMappings;
use crate::domain::ports::Storage;
use crate::utils::error::{MigrateError, Result};
use std::collections::HashMap;

pub async fn load_id_mappings<S: Storage>(storage: &S, file: &str) -> Result<IdMappings> {
    let data = storage.read_file(file).await?;
    Ok(serde_json::from_slice(&data)?)
}

pub async fn load_active_list_ids<S: Storage>(storage: &S, file: &str) -> Result<Vec<String>> {
    let data = storage.read_file(file).await?;
    let ids: Vec<String> = serde_json::from_slice(&data)?;

    if ids.is_empty() {
        return Err(MigrateError::InputDataError {
            message: format!("{} contains no list ids, regenerate inputs", file),
        });
    }

    Ok(ids)
}

/// 比對兩個帳號的 users/groups/lists，產生 source id → target id 對照表。
/// users 用 username 比對（退而求其次用 email），groups 用 title，lists 用 stringid。
pub async fn build_id_mappings(
    source: &AccountClient,
    target: &AccountClient,
) -> Result<IdMappings> {
    let mut mappings = IdMappings::default();

    let source_users = source.fetch_users().await?;
    let target_users = target.fetch_users().await?;

    let by_username: HashMap<&str, &str> = target_users
        .iter()
        .map(|u| (u.username.as_str(), u.id.as_str()))
        .collect();
    let by_email: HashMap<&str, &str> = target_users
        .iter()
        .filter_map(|u| u.email.as_deref().map(|e| (e, u.id.as_str())))
        .collect();

    for user in &source_users {
        let matched = by_username
            .get(user.username.as_str())
            .or_else(|| user.email.as_deref().and_then(|e| by_email.get(e)));

        match matched {
            Some(target_id) => {
                mappings
                    .users
                    .insert(user.id.clone(), (*target_id).to_string());
            }
            None => tracing::warn!(
                "⚠️ No target account user matches '{}', mapping omitted",
                user.username
            ),
        }
    }

    let source_groups = source.fetch_groups().await?;
    let target_groups = target.fetch_groups().await?;
    let by_title: HashMap<&str, &str> = target_groups
        .iter()
        .map(|g| (g.title.as_str(), g.id.as_str()))
        .collect();

    for group in &source_groups {
        match by_title.get(group.title.as_str()) {
            Some(target_id) => {
                mappings
                    .groups
                    .insert(group.id.clone(), (*target_id).to_string());
            }
            None => tracing::warn!(
                "⚠️ No target account group matches '{}', mapping omitted",
                group.title
            ),
        }
    }

    let source_lists = source.fetch_lists().await?;
    let target_lists = target.fetch_lists().await?;
    let by_stringid: HashMap<&str, &str> = target_lists
        .iter()
        .map(|l| (l.stringid.as_str(), l.id.as_str()))
        .collect();

    for list in &source_lists {
        if let Some(target_id) = by_stringid.get(list.stringid.as_str()) {
            mappings
                .lists
                .insert(list.id.clone(), (*target_id).to_string());
        }
    }

    Ok(mappings)
}

pub async fn build_active_list_ids(source: &AccountClient) -> Result<Vec<String>> {
    let lists = source.fetch_lists().await?;
    let ids: Vec<String> = lists
        .iter()
        .filter(|l| l.is_active())
        .map(|l| l.id.clone())
        .collect();

    if ids.is_empty() {
        tracing::warn!("⚠️ Source account has no active lists");
    }

    Ok(ids)
}

use httpmock::prelude::*;
use list_migrate::{
    FileJournal, ListCopier, LocalStorage, MigrationConfig, MigrationEngine, WorkflowCopier,
};
use std::fs;
use tempfile::TempDir;

fn write_inputs(dir: &TempDir) {
    let inputs_dir = dir.path().join("inputs");
    fs::create_dir_all(&inputs_dir).unwrap();
    fs::write(
        inputs_dir.join("id_mappings.json"),
        r#"{"users": {"7": "70"}, "groups": {}, "lists": {}}"#,
    )
    .unwrap();
    fs::write(inputs_dir.join("active_list_ids.json"), r#"["1", "2"]"#).unwrap();
}

fn test_config(dir: &TempDir, source_url: &str, target_url: &str, simulate: bool) -> MigrationConfig {
    let toml = format!(
        r#"
[migration]
name = "list-copy"
description = "integration test run"
version = "v1"

[source]
api_url = "{source_url}"
api_token = "source-token"

[target]
api_url = "{target_url}"
api_token = "target-token"

[inputs]
path = "{inputs}"

[copy]
simulate = {simulate}
page_size = 100

[report]
output_path = "{output}"
"#,
        source_url = source_url,
        target_url = target_url,
        simulate = simulate,
        inputs = dir.path().join("inputs").display(),
        output = dir.path().join("output").display(),
    );
    MigrationConfig::from_toml_str(&toml).unwrap()
}

fn mock_source_lists(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/3/lists");
        then.status(200).json_body(serde_json::json!({
            "lists": [
                {"id": "1", "name": "Newsletter", "stringid": "newsletter",
                 "status": "active", "owner": "7"},
                {"id": "2", "name": "Promotions", "stringid": "promotions", "status": "active"}
            ]
        }));
    });
}

fn mock_empty_target_lists(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/api/3/lists");
        then.status(200).json_body(serde_json::json!({"lists": []}));
    });
}

async fn build_and_run(
    dir: &TempDir,
    config: MigrationConfig,
    simulate: bool,
    include_workflows: bool,
) -> list_migrate::Result<Vec<list_migrate::core::CopySummary>> {
    let inputs_storage = LocalStorage::new(dir.path().join("inputs"));
    let mappings =
        list_migrate::core::inputs::load_id_mappings(&inputs_storage, "id_mappings.json")
            .await
            .unwrap();
    let active_ids =
        list_migrate::core::inputs::load_active_list_ids(&inputs_storage, "active_list_ids.json")
            .await
            .unwrap();

    let report_storage = LocalStorage::new(dir.path().join("output"));
    let journal = FileJournal::new(
        dir.path().join("logs/migration.log"),
        dir.path().join("logs/todo.md"),
    );

    let run_name = config.run_name(simulate);
    let mut engine = MigrationEngine::new(journal, run_name, simulate);
    engine.add_step(Box::new(ListCopier::new(
        report_storage.clone(),
        config.clone(),
        mappings.clone(),
        active_ids,
    )));
    engine.add_step(Box::new(WorkflowCopier::new(
        report_storage,
        config,
        mappings,
        include_workflows,
    )));

    engine.run().await
}

#[tokio::test]
async fn test_simulated_run_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_inputs(&dir);

    let source_server = MockServer::start();
    let target_server = MockServer::start();
    mock_source_lists(&source_server);
    mock_empty_target_lists(&target_server);

    let create_mock = target_server.mock(|when, then| {
        when.method(POST).path("/api/3/lists");
        then.status(201)
            .json_body(serde_json::json!({"list": {"id": "9", "name": "x", "stringid": "x"}}));
    });
    let automations_mock = source_server.mock(|when, then| {
        when.method(GET).path("/api/3/automations");
        then.status(200)
            .json_body(serde_json::json!({"automations": []}));
    });

    let config = test_config(&dir, &source_server.base_url(), &target_server.base_url(), true);
    let summaries = build_and_run(&dir, config, true, false).await.unwrap();

    // simulate 模式：target 完全沒有寫入，workflow 階段沒執行
    assert_eq!(create_mock.hits(), 0);
    assert_eq!(automations_mock.hits(), 0);

    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].simulated, 2);

    // run 紀錄與報表
    let log = fs::read_to_string(dir.path().join("logs/migration.log")).unwrap();
    assert!(log.contains("simulated_list_copy_v1"));
    assert_eq!(log.lines().count(), 1);

    let todo = fs::read_to_string(dir.path().join("logs/todo.md")).unwrap();
    assert!(todo.contains("- [ ]"));
    assert!(todo.contains("simulated_list_copy_v1"));

    let report =
        fs::read_to_string(dir.path().join("output/list_copy_report.csv")).unwrap();
    assert!(report.contains("1,Newsletter,simulated,"));
    assert!(report.contains("2,Promotions,simulated,"));
}

#[tokio::test]
async fn test_live_run_creates_lists_in_target() {
    let dir = TempDir::new().unwrap();
    write_inputs(&dir);

    let source_server = MockServer::start();
    let target_server = MockServer::start();
    mock_source_lists(&source_server);
    mock_empty_target_lists(&target_server);

    let create_mock = target_server.mock(|when, then| {
        when.method(POST).path("/api/3/lists");
        then.status(201).json_body(serde_json::json!({
            "list": {"id": "9", "name": "Created", "stringid": "created"}
        }));
    });

    let config = test_config(&dir, &source_server.base_url(), &target_server.base_url(), false);
    let summaries = build_and_run(&dir, config, false, false).await.unwrap();

    assert_eq!(create_mock.hits(), 2);
    assert_eq!(summaries[0].created, 2);

    let log = fs::read_to_string(dir.path().join("logs/migration.log")).unwrap();
    assert!(log.contains("list_copy_v1"));

    // 建立過的 id 對照有寫出
    let created =
        fs::read_to_string(dir.path().join("output/created_list_ids.json")).unwrap();
    assert!(created.contains("\"9\""));
}

#[tokio::test]
async fn test_failing_source_writes_no_run_record() {
    let dir = TempDir::new().unwrap();
    write_inputs(&dir);

    let source_server = MockServer::start();
    let target_server = MockServer::start();

    source_server.mock(|when, then| {
        when.method(GET).path("/api/3/lists");
        then.status(500);
    });

    let config = test_config(&dir, &source_server.base_url(), &target_server.base_url(), true);
    let result = build_and_run(&dir, config, true, false).await;

    assert!(result.is_err());
    assert!(!dir.path().join("logs/migration.log").exists());
    assert!(!dir.path().join("logs/todo.md").exists());
}

#[tokio::test]
async fn test_workflow_step_runs_only_when_enabled() {
    let dir = TempDir::new().unwrap();
    write_inputs(&dir);

    let source_server = MockServer::start();
    let target_server = MockServer::start();
    mock_source_lists(&source_server);
    mock_empty_target_lists(&target_server);

    let automations_mock = source_server.mock(|when, then| {
        when.method(GET).path("/api/3/automations");
        then.status(200).json_body(serde_json::json!({
            "automations": [
                {"id": "1", "name": "Welcome", "status": "active", "lists": ["1"]}
            ]
        }));
    });

    let config = test_config(&dir, &source_server.base_url(), &target_server.base_url(), true);
    let summaries = build_and_run(&dir, config, true, true).await.unwrap();

    assert_eq!(automations_mock.hits(), 1);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[1].step, "workflows");
    // list "1" 沒有 target 對照，workflow 被跳過
    assert_eq!(summaries[1].skipped, 1);
}

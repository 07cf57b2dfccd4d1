use crate::core::ConfigProvider;
use crate::utils::error::{MigrateError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    pub migration: MigrationInfo,
    pub source: AccountConfig,
    pub target: AccountConfig,
    pub inputs: InputsConfig,
    pub copy: Option<CopyConfig>,
    pub report: Option<ReportConfig>,
    pub logging: Option<LoggingConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub run_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountConfig {
    pub api_url: String,
    pub api_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    pub path: String,
    pub id_mappings_file: Option<String>,
    pub active_list_ids_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyConfig {
    pub simulate: Option<bool>,
    pub include_workflows: Option<bool>,
    pub page_size: Option<usize>,
    pub skip_existing: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub output_path: String,
    pub write_csv: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_file: Option<String>,
    pub todo_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl MigrationConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MigrateError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| MigrateError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SOURCE_API_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        crate::utils::validation::validate_url("source.api_url", &self.source.api_url)?;
        crate::utils::validation::validate_url("target.api_url", &self.target.api_url)?;

        // token 不能是空的，也不能留著未解析的 ${VAR}
        crate::utils::validation::validate_resolved_secret(
            "source.api_token",
            &self.source.api_token,
        )?;
        crate::utils::validation::validate_resolved_secret(
            "target.api_token",
            &self.target.api_token,
        )?;

        crate::utils::validation::validate_path("inputs.path", &self.inputs.path)?;
        crate::utils::validation::validate_path("report.output_path", self.output_path())?;
        crate::utils::validation::validate_path("logging.log_file", self.log_file())?;
        crate::utils::validation::validate_path("logging.todo_file", self.todo_file())?;

        crate::utils::validation::validate_positive_number(
            "copy.page_size",
            self.page_size(),
            1,
        )?;

        let input_files = vec![
            self.id_mappings_file().to_string(),
            self.active_list_ids_file().to_string(),
        ];
        crate::utils::validation::validate_file_extensions(
            "inputs",
            &input_files,
            &["json"],
        )?;

        Ok(())
    }

    /// 是否為模擬模式（預設 true，真正寫入需明確關閉）
    pub fn simulate(&self) -> bool {
        self.copy
            .as_ref()
            .and_then(|c| c.simulate)
            .unwrap_or(true)
    }

    /// workflow 階段預設停用，需人工確認後再開
    pub fn include_workflows(&self) -> bool {
        self.copy
            .as_ref()
            .and_then(|c| c.include_workflows)
            .unwrap_or(false)
    }

    pub fn page_size(&self) -> usize {
        self.copy
            .as_ref()
            .and_then(|c| c.page_size)
            .unwrap_or(100)
    }

    pub fn skip_existing(&self) -> bool {
        self.copy
            .as_ref()
            .and_then(|c| c.skip_existing)
            .unwrap_or(true)
    }

    pub fn id_mappings_file(&self) -> &str {
        self.inputs
            .id_mappings_file
            .as_deref()
            .unwrap_or("id_mappings.json")
    }

    pub fn active_list_ids_file(&self) -> &str {
        self.inputs
            .active_list_ids_file
            .as_deref()
            .unwrap_or("active_list_ids.json")
    }

    pub fn output_path(&self) -> &str {
        self.report
            .as_ref()
            .map(|r| r.output_path.as_str())
            .unwrap_or("./output")
    }

    pub fn write_csv(&self) -> bool {
        self.report
            .as_ref()
            .and_then(|r| r.write_csv)
            .unwrap_or(true)
    }

    pub fn log_file(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.log_file.as_deref())
            .unwrap_or("logs/migration.log")
    }

    pub fn todo_file(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.todo_file.as_deref())
            .unwrap_or("logs/todo.md")
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// journal 用的 run 名稱，例如 simulated_list_copy_v1
    pub fn run_name(&self, simulate: bool) -> String {
        if let Some(name) = &self.migration.run_name {
            return name.clone();
        }
        if simulate {
            format!("simulated_list_copy_{}", self.migration.version)
        } else {
            format!("list_copy_{}", self.migration.version)
        }
    }
}

impl ConfigProvider for MigrationConfig {
    fn source_api_url(&self) -> &str {
        &self.source.api_url
    }

    fn source_api_token(&self) -> &str {
        &self.source.api_token
    }

    fn target_api_url(&self) -> &str {
        &self.target.api_url
    }

    fn target_api_token(&self) -> &str {
        &self.target.api_token
    }

    fn output_path(&self) -> &str {
        self.output_path()
    }

    fn page_size(&self) -> usize {
        self.page_size()
    }

    fn skip_existing(&self) -> bool {
        self.skip_existing()
    }

    fn write_csv(&self) -> bool {
        self.write_csv()
    }
}

impl Validate for MigrationConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

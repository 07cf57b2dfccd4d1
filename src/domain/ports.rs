use crate::domain::model::CopySummary;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn source_api_url(&self) -> &str;
    fn source_api_token(&self) -> &str;
    fn target_api_url(&self) -> &str;
    fn target_api_token(&self) -> &str;
    fn output_path(&self) -> &str;
    fn page_size(&self) -> usize;
    fn skip_existing(&self) -> bool;
    fn write_csv(&self) -> bool;
}

#[async_trait]
pub trait CopyStep: Send + Sync {
    fn name(&self) -> &str;

    fn enabled(&self) -> bool {
        true
    }

    async fn copy_all(&self, simulate: bool) -> Result<CopySummary>;
}

pub trait Journal: Send + Sync {
    fn write_log(&self, name: &str) -> Result<()>;
    fn write_todo(&self, name: &str) -> Result<()>;
}

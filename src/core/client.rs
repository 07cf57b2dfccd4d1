use crate::domain::model::{Group, List, NewList, NewWorkflow, UserAccount, Workflow};
use crate::utils::error::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// 單一帳號的 platform API 封裝，Api-Token 驗證
#[derive(Debug, Clone)]
pub struct AccountClient {
    base_url: String,
    api_token: String,
    page_size: usize,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ListsPage {
    lists: Vec<List>,
}

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    list: List,
}

#[derive(Debug, Deserialize)]
struct WorkflowsPage {
    automations: Vec<Workflow>,
}

#[derive(Debug, Deserialize)]
struct WorkflowEnvelope {
    automation: Workflow,
}

#[derive(Debug, Deserialize)]
struct UsersPage {
    users: Vec<UserAccount>,
}

#[derive(Debug, Deserialize)]
struct GroupsPage {
    groups: Vec<Group>,
}

impl AccountClient {
    pub fn new(base_url: &str, api_token: &str, page_size: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            page_size,
            client: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path_and_query);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Api-Token", &self.api_token)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("Api-Token", &self.api_token)
            .json(body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<T>().await?)
    }

    /// 分頁抓回帳號內全部 lists
    pub async fn fetch_lists(&self) -> Result<Vec<List>> {
        let mut lists = Vec::new();
        let mut offset = 0usize;

        loop {
            let page: ListsPage = self
                .get_json(&format!(
                    "api/3/lists?limit={}&offset={}",
                    self.page_size, offset
                ))
                .await?;

            let fetched = page.lists.len();
            lists.extend(page.lists);

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }

        tracing::debug!("Fetched {} lists from {}", lists.len(), self.base_url);
        Ok(lists)
    }

    pub async fn find_list_by_stringid(&self, stringid: &str) -> Result<Option<List>> {
        let page: ListsPage = self
            .get_json(&format!("api/3/lists?filters[stringid]={}", stringid))
            .await?;

        Ok(page.lists.into_iter().find(|l| l.stringid == stringid))
    }

    pub async fn create_list(&self, list: &NewList) -> Result<List> {
        #[derive(Serialize)]
        struct Body<'a> {
            list: &'a NewList,
        }

        let envelope: ListEnvelope = self.post_json("api/3/lists", &Body { list }).await?;
        Ok(envelope.list)
    }

    pub async fn fetch_workflows(&self) -> Result<Vec<Workflow>> {
        let mut workflows = Vec::new();
        let mut offset = 0usize;

        loop {
            let page: WorkflowsPage = self
                .get_json(&format!(
                    "api/3/automations?limit={}&offset={}",
                    self.page_size, offset
                ))
                .await?;

            let fetched = page.automations.len();
            workflows.extend(page.automations);

            if fetched < self.page_size {
                break;
            }
            offset += fetched;
        }

        Ok(workflows)
    }

    pub async fn create_workflow(&self, workflow: &NewWorkflow) -> Result<Workflow> {
        #[derive(Serialize)]
        struct Body<'a> {
            automation: &'a NewWorkflow,
        }

        let envelope: WorkflowEnvelope = self
            .post_json("api/3/automations", &Body { automation: workflow })
            .await?;
        Ok(envelope.automation)
    }

    pub async fn fetch_users(&self) -> Result<Vec<UserAccount>> {
        let page: UsersPage = self.get_json("api/3/users").await?;
        Ok(page.users)
    }

    pub async fn fetch_groups(&self) -> Result<Vec<Group>> {
        let page: GroupsPage = self.get_json("api/3/groups").await?;
        Ok(page.groups)
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: String,
    pub name: String,
    pub stringid: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub sender_url: Option<String>,
    #[serde(default)]
    pub sender_reminder: Option<String>,
    #[serde(default)]
    pub subscriber_count: Option<u64>,
}

impl List {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

/// 建立 target list 的 payload，owner/group 已換成 target 端 id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewList {
    pub name: String,
    pub stringid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_reminder: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lists: Vec<String>,
}

impl Workflow {
    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkflow {
    pub name: String,
    pub status: String,
    pub lists: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
}

/// source id → target id 對照表，由 create-inputs 產生
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdMappings {
    #[serde(default)]
    pub users: HashMap<String, String>,
    #[serde(default)]
    pub groups: HashMap<String, String>,
    #[serde(default)]
    pub lists: HashMap<String, String>,
}

impl IdMappings {
    pub fn user(&self, source_id: &str) -> Option<&str> {
        self.users.get(source_id).map(String::as_str)
    }

    pub fn group(&self, source_id: &str) -> Option<&str> {
        self.groups.get(source_id).map(String::as_str)
    }

    pub fn list(&self, source_id: &str) -> Option<&str> {
        self.lists.get(source_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Created { target_id: String },
    Simulated,
    SkippedExisting { target_id: String },
    SkippedUnmapped,
}

impl CopyOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CopyOutcome::Created { .. } => "created",
            CopyOutcome::Simulated => "simulated",
            CopyOutcome::SkippedExisting { .. } => "skipped_existing",
            CopyOutcome::SkippedUnmapped => "skipped_unmapped",
        }
    }

    pub fn target_id(&self) -> Option<&str> {
        match self {
            CopyOutcome::Created { target_id } | CopyOutcome::SkippedExisting { target_id } => {
                Some(target_id)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CopyAction {
    pub source_id: String,
    pub name: String,
    pub outcome: CopyOutcome,
}

#[derive(Debug, Clone)]
pub struct CopySummary {
    pub step: String,
    pub attempted: usize,
    pub created: usize,
    pub simulated: usize,
    pub skipped: usize,
    pub actions: Vec<CopyAction>,
    pub duration: Duration,
}

impl CopySummary {
    pub fn new(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            attempted: 0,
            created: 0,
            simulated: 0,
            skipped: 0,
            actions: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn record(&mut self, action: CopyAction) {
        self.attempted += 1;
        match &action.outcome {
            CopyOutcome::Created { .. } => self.created += 1,
            CopyOutcome::Simulated => self.simulated += 1,
            CopyOutcome::SkippedExisting { .. } | CopyOutcome::SkippedUnmapped => {
                self.skipped += 1
            }
        }
        self.actions.push(action);
    }
}

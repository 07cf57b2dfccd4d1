use crate::domain::ports::Journal;
use crate::utils::error::Result;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 把每次 migration run 記到本地檔案：一行 log、一條待辦
#[derive(Debug, Clone)]
pub struct FileJournal {
    log_path: PathBuf,
    todo_path: PathBuf,
}

impl FileJournal {
    pub fn new(log_path: impl Into<PathBuf>, todo_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            todo_path: todo_path.into(),
        }
    }

    fn append(path: &Path, line: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

impl Journal for FileJournal {
    fn write_log(&self, name: &str) -> Result<()> {
        let line = format!("{}\t{}", Utc::now().to_rfc3339(), name);
        Self::append(&self.log_path, &line)
    }

    fn write_todo(&self, name: &str) -> Result<()> {
        let line = format!(
            "- [ ] verify the output of run '{}' ({})",
            name,
            Utc::now().format("%Y-%m-%d")
        );
        Self::append(&self.todo_path, &line)
    }
}

use crate::domain::model::CopySummary;
use crate::domain::ports::{CopyStep, Journal};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

/// Migration driver：依序執行 copy steps，全部成功後才寫 run 紀錄
pub struct MigrationEngine<J: Journal> {
    steps: Vec<Box<dyn CopyStep>>,
    journal: J,
    run_name: String,
    simulate: bool,
    monitor: RunMonitor,
}

impl<J: Journal> MigrationEngine<J> {
    pub fn new(journal: J, run_name: impl Into<String>, simulate: bool) -> Self {
        Self {
            steps: Vec::new(),
            journal,
            run_name: run_name.into(),
            simulate,
            monitor: RunMonitor::new(false),
        }
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = RunMonitor::new(enabled);
        self
    }

    pub fn add_step(&mut self, step: Box<dyn CopyStep>) {
        self.steps.push(step);
    }

    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    pub async fn run(&self) -> Result<Vec<CopySummary>> {
        tracing::info!(
            "🚀 Starting migration run '{}'{}",
            self.run_name,
            if self.simulate {
                " in simulate mode"
            } else {
                ""
            }
        );

        let mut summaries = Vec::new();
        for step in &self.steps {
            if !step.enabled() {
                tracing::info!("⏭️ Skipping step: {} (disabled)", step.name());
                continue;
            }

            tracing::info!("▶️ Running copy step: {}", step.name());
            let summary = step.copy_all(self.simulate).await?;
            self.monitor.log_phase(step.name());

            tracing::info!(
                "✅ Step '{}' finished: {} attempted, {} created, {} simulated, {} skipped ({:?})",
                summary.step,
                summary.attempted,
                summary.created,
                summary.simulated,
                summary.skipped,
                summary.duration
            );
            summaries.push(summary);
        }

        // 任一步驟失敗時上面已經 return，run 紀錄只在全部成功後寫入
        self.journal.write_log(&self.run_name)?;
        self.journal.write_todo(&self.run_name)?;
        self.monitor.log_final();

        tracing::info!("📝 Run '{}' recorded in journal", self.run_name);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::MigrateError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    type EventLog = Arc<Mutex<Vec<String>>>;

    struct RecordingStep {
        name: String,
        enabled: bool,
        fail: bool,
        events: EventLog,
    }

    impl RecordingStep {
        fn new(name: &str, events: EventLog) -> Self {
            Self {
                name: name.to_string(),
                enabled: true,
                fail: false,
                events,
            }
        }

        fn disabled(mut self) -> Self {
            self.enabled = false;
            self
        }

        fn failing(mut self) -> Self {
            self.fail = true;
            self
        }
    }

    #[async_trait]
    impl CopyStep for RecordingStep {
        fn name(&self) -> &str {
            &self.name
        }

        fn enabled(&self) -> bool {
            self.enabled
        }

        async fn copy_all(&self, simulate: bool) -> Result<CopySummary> {
            self.events
                .lock()
                .unwrap()
                .push(format!("copy:{}:simulate={}", self.name, simulate));

            if self.fail {
                return Err(MigrateError::CopyError {
                    step: self.name.clone(),
                    details: "boom".to_string(),
                });
            }
            Ok(CopySummary::new(self.name.clone()))
        }
    }

    struct RecordingJournal {
        events: EventLog,
    }

    impl Journal for RecordingJournal {
        fn write_log(&self, name: &str) -> Result<()> {
            self.events.lock().unwrap().push(format!("log:{}", name));
            Ok(())
        }

        fn write_todo(&self, name: &str) -> Result<()> {
            self.events.lock().unwrap().push(format!("todo:{}", name));
            Ok(())
        }
    }

    fn event_log() -> EventLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_simulate_run_calls_lists_once_then_log_then_todo() {
        let events = event_log();
        let journal = RecordingJournal {
            events: events.clone(),
        };

        let mut engine = MigrationEngine::new(journal, "simulated_list_copy_v1", true);
        engine.add_step(Box::new(RecordingStep::new("lists", events.clone())));
        engine.add_step(Box::new(RecordingStep::new("workflows", events.clone()).disabled()));

        engine.run().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "copy:lists:simulate=true".to_string(),
                "log:simulated_list_copy_v1".to_string(),
                "todo:simulated_list_copy_v1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_disabled_step_is_never_invoked() {
        let events = event_log();
        let journal = RecordingJournal {
            events: events.clone(),
        };

        let mut engine = MigrationEngine::new(journal, "run", true);
        engine.add_step(Box::new(RecordingStep::new("lists", events.clone())));
        engine.add_step(Box::new(RecordingStep::new("workflows", events.clone()).disabled()));

        engine.run().await.unwrap();

        let events = events.lock().unwrap();
        assert!(!events.iter().any(|e| e.starts_with("copy:workflows")));
    }

    #[tokio::test]
    async fn test_failing_step_leaves_journal_untouched() {
        let events = event_log();
        let journal = RecordingJournal {
            events: events.clone(),
        };

        let mut engine = MigrationEngine::new(journal, "run", true);
        engine.add_step(Box::new(RecordingStep::new("lists", events.clone()).failing()));

        let result = engine.run().await;
        assert!(result.is_err());

        let events = events.lock().unwrap();
        assert_eq!(*events, vec!["copy:lists:simulate=true".to_string()]);
    }

    #[tokio::test]
    async fn test_live_run_passes_simulate_false() {
        let events = event_log();
        let journal = RecordingJournal {
            events: events.clone(),
        };

        let mut engine = MigrationEngine::new(journal, "list_copy_v1", false);
        engine.add_step(Box::new(RecordingStep::new("lists", events.clone())));

        engine.run().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(events[0], "copy:lists:simulate=false");
    }

    #[tokio::test]
    async fn test_journal_written_once_after_all_steps() {
        let events = event_log();
        let journal = RecordingJournal {
            events: events.clone(),
        };

        let mut engine = MigrationEngine::new(journal, "run", true);
        engine.add_step(Box::new(RecordingStep::new("lists", events.clone())));
        engine.add_step(Box::new(RecordingStep::new("workflows", events.clone())));

        engine.run().await.unwrap();

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "copy:lists:simulate=true".to_string(),
                "copy:workflows:simulate=true".to_string(),
                "log:run".to_string(),
                "todo:run".to_string(),
            ]
        );
    }
}

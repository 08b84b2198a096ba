//! The `darkroom stage` command: one review session over a set of files.

use clap::Args;
use darkroom_core::review::BulkReport;
use darkroom_core::upload::{discover, load, total_size};
use darkroom_core::{
    BulkEdit, Config, Notifier, NotifyKind, OutputWriter, PhotoStore, PreviewRegistry,
    ReviewController, TracingNotifier,
};
use std::path::PathBuf;
use std::sync::Arc;

use super::types::{open_output, resolve_format, OutputFormat};

/// Arguments for the `stage` command.
#[derive(Args, Debug)]
pub struct StageArgs {
    /// Image files or directories to stage
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Title applied to every staged photo
    #[arg(long)]
    pub title: Option<String>,

    /// Description applied to every staged photo
    #[arg(long)]
    pub description: Option<String>,

    /// Category applied to every staged photo
    #[arg(long)]
    pub category: Option<String>,

    /// Tag added to every staged photo (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Confirm every photo whose title and category are complete
    #[arg(long)]
    pub confirm: bool,
}

impl StageArgs {
    /// The bulk edits requested on the command line, in application order.
    pub fn bulk_edits(&self) -> Vec<BulkEdit> {
        let mut edits = Vec::new();
        if let Some(title) = &self.title {
            edits.push(BulkEdit::Title(title.clone()));
        }
        if let Some(description) = &self.description {
            edits.push(BulkEdit::Description(description.clone()));
        }
        if let Some(category) = &self.category {
            edits.push(BulkEdit::Category(category.clone()));
        }
        edits.extend(self.tags.iter().cloned().map(BulkEdit::AddTag));
        edits
    }
}

/// Execute the stage command.
pub async fn execute(args: StageArgs, config: Config) -> anyhow::Result<()> {
    let discovered = discover(&args.inputs);
    if discovered.is_empty() {
        anyhow::bail!(
            "No files found at {:?}\n\n  Hint: Check the paths and try again.",
            args.inputs
        );
    }
    tracing::info!(
        "Found {} file(s) to stage ({} bytes)",
        discovered.len(),
        total_size(&discovered)
    );

    let notifier = TracingNotifier;
    let previews = PreviewRegistry::new();
    let mut store = PhotoStore::new(&config, Arc::new(previews.clone()));
    let mut review = ReviewController::new(config.review.clone());

    let batch = load(store.validator(), discovered).await;
    let outcome = store.stage_read(batch).await;
    outcome.notify(&notifier);
    if outcome.created.is_empty() {
        return Ok(());
    }

    review.select_all(&store);
    for edit in args.bulk_edits() {
        let report = review.bulk_apply(&mut store, edit.clone());
        report_bulk(&notifier, &edit, &report);
    }

    if args.confirm {
        let confirmed = review.confirm_complete(&mut store);
        if !confirmed.is_empty() {
            notifier.notify(
                NotifyKind::Success,
                &format!("Confirmed {} photo(s)", confirmed.len()),
            );
        }
        let pending = store.staged().len();
        if pending > 0 {
            notifier.notify(
                NotifyKind::Info,
                &format!("{pending} photo(s) still need a title and category"),
            );
        }
    }

    let format = resolve_format(args.format, &config);
    let pretty = args.pretty || config.output.pretty;
    let mut writer = OutputWriter::new(open_output(args.output.as_deref())?, format, pretty);
    writer.write_all(&store.summaries())?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Output written to {:?}", path);
    }
    tracing::debug!("{} preview(s) live at exit", previews.live_count());
    Ok(())
}

/// Warn about the records a bulk edit could not update.
fn report_bulk(notifier: &dyn Notifier, edit: &BulkEdit, report: &BulkReport) {
    tracing::debug!(
        "{:?}: {} updated, {} failed",
        edit,
        report.succeeded.len(),
        report.failed.len()
    );
    if let Some(first) = report.failed.first() {
        notifier.notify(
            NotifyKind::Warning,
            &format!(
                "{} photo(s) not updated: {}",
                report.failed.len(),
                first.reason
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use darkroom_core::review::BulkFailure;
    use darkroom_core::{PhotoId, StoreError};
    use std::sync::Mutex;

    fn args() -> StageArgs {
        StageArgs {
            inputs: vec![PathBuf::from("shoot")],
            output: None,
            format: None,
            pretty: false,
            title: None,
            description: None,
            category: None,
            tags: vec![],
            confirm: false,
        }
    }

    #[test]
    fn test_no_edits_by_default() {
        assert!(args().bulk_edits().is_empty());
    }

    #[test]
    fn test_bulk_edits_in_order() {
        let mut args = args();
        args.category = Some("landscape".to_string());
        args.title = Some("Coastline".to_string());
        args.tags = vec!["sea".to_string(), "sky".to_string()];

        assert_eq!(
            args.bulk_edits(),
            vec![
                BulkEdit::Title("Coastline".to_string()),
                BulkEdit::Category("landscape".to_string()),
                BulkEdit::AddTag("sea".to_string()),
                BulkEdit::AddTag("sky".to_string()),
            ]
        );
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<(NotifyKind, String)>>);

    impl Notifier for Collect {
        fn notify(&self, kind: NotifyKind, message: &str) {
            self.0.lock().unwrap().push((kind, message.to_string()));
        }
    }

    #[test]
    fn test_report_bulk_warns_on_failures() {
        let id = PhotoId::new();
        let report = BulkReport {
            succeeded: vec![PhotoId::new()],
            failed: vec![BulkFailure {
                id,
                reason: StoreError::NotFound(id),
            }],
        };
        let notifier = Collect::default();
        report_bulk(&notifier, &BulkEdit::Category("event".to_string()), &report);

        let messages = notifier.0.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, NotifyKind::Warning);
        assert!(messages[0].1.starts_with("1 photo(s) not updated: Photo not found"));
    }

    #[test]
    fn test_report_bulk_quiet_when_clean() {
        let notifier = Collect::default();
        report_bulk(
            &notifier,
            &BulkEdit::Title("Coast".to_string()),
            &BulkReport::default(),
        );
        assert!(notifier.0.lock().unwrap().is_empty());
    }
}

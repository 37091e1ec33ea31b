//! Filesystem watcher for the HTML template.

use crate::error::{Result, ResultExt, ServerError};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Watches the template file and signals on every relevant change.
///
/// Editors rarely write a file in place (most save to a temp file and
/// rename over the target), so the watcher observes the parent directory
/// and filters events down to the one file it cares about. Bursts within
/// the debounce window collapse into a single signal.
pub struct TemplateWatcher {
    // Dropping the watcher stops event delivery.
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl TemplateWatcher {
    /// Watch `template`, collapsing change bursts within `debounce_ms`.
    pub fn new(template: &Path, debounce_ms: u64) -> Result<(Self, mpsc::Receiver<()>)> {
        let path = template
            .canonicalize()
            .map_err(|e| ServerError::Artifact {
                path: template.to_path_buf(),
                source: e,
            })
            .with_hint("the template file must exist before the server starts")?;
        let parent = path
            .parent()
            .ok_or_else(|| ServerError::FileNotFound(path.clone()))?
            .to_path_buf();

        let (tx, rx) = mpsc::channel(16);

        let target = path.clone();
        let debounce = Duration::from_millis(debounce_ms);
        let mut last_signal: Option<Instant> = None;
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            let event = match result {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("template watch error: {}", e);
                    return;
                }
            };
            if !is_relevant(&event, &target) {
                return;
            }
            let now = Instant::now();
            if let Some(previous) = last_signal {
                if now.duration_since(previous) < debounce {
                    return;
                }
            }
            last_signal = Some(now);
            let _ = tx.blocking_send(());
        })?;

        watcher.watch(&parent, RecursiveMode::NonRecursive)?;

        Ok((Self { _watcher: watcher, path }, rx))
    }

    /// The canonicalized path of the watched template.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// True when `event` touches `target` in a way that changes its content.
fn is_relevant(event: &Event, target: &Path) -> bool {
    let changes_content = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    changes_content && event.paths.iter().any(|p| p == target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use std::time::Duration;
    use tokio::time::timeout;

    #[test]
    fn test_is_relevant_filters_by_path() {
        let target = PathBuf::from("/srv/templates/main.html");
        let event = Event::new(EventKind::Modify(ModifyKind::Any)).add_path(target.clone());
        assert!(is_relevant(&event, &target));

        let other =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/srv/other"));
        assert!(!is_relevant(&other, &target));
    }

    #[test]
    fn test_is_relevant_filters_by_kind() {
        let target = PathBuf::from("/srv/templates/main.html");

        let create = Event::new(EventKind::Create(CreateKind::Any)).add_path(target.clone());
        assert!(is_relevant(&create, &target));

        let remove = Event::new(EventKind::Remove(RemoveKind::Any)).add_path(target.clone());
        assert!(!is_relevant(&remove, &target));

        let access = Event::new(EventKind::Access(notify::event::AccessKind::Any))
            .add_path(target.clone());
        assert!(!is_relevant(&access, &target));
    }

    #[test]
    fn test_new_requires_an_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("main.html");
        assert!(TemplateWatcher::new(&missing, 100).is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_write_to_watched_file_signals() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("main.html");
        std::fs::write(&template, "<html></html>").unwrap();

        let (watcher, mut rx) = TemplateWatcher::new(&template, 50).unwrap();

        // Give the backend a moment to arm before the write.
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(watcher.path(), "<html><body></body></html>").unwrap();

        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no change signal before timeout")
            .expect("watcher channel closed");
    }
}

//! Re-prettify files as they change on disk.

use anyhow::{Context, Result};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebounceEventResult, DebouncedEventKind};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;
use webprettify_lib::files::{self, FileOptions, ProcessedFile};

const DEBOUNCE: Duration = Duration::from_millis(500);

/// Text this process last wrote, per output path.
///
/// Writing a prettified file in place fires another change event for it; that
/// event is recognized here and dropped.
#[derive(Debug, Default)]
pub struct WrittenFiles {
    texts: HashMap<PathBuf, String>,
}

impl WrittenFiles {
    pub fn record(&mut self, processed: &ProcessedFile) {
        let output = canonical(&processed.output);
        self.texts.insert(output, processed.text.clone());
    }

    /// True when `path` still holds exactly what was last written to it.
    pub fn is_own_write(&self, path: &Path) -> bool {
        match self.texts.get(&canonical(path)) {
            Some(text) => fs::read_to_string(path).is_ok_and(|current| current == *text),
            None => false,
        }
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Block forever, prettifying every changed file under `root`.
pub fn watch(root: &Path, options: &FileOptions, mut written: WrittenFiles) -> Result<()> {
    let (tx, rx) = mpsc::channel::<DebounceEventResult>();
    let mut debouncer = new_debouncer(DEBOUNCE, tx).context("failed to start file watcher")?;

    let mode = if root.is_dir() {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    debouncer
        .watcher()
        .watch(root, mode)
        .with_context(|| format!("failed to watch {}", root.display()))?;
    log::info!("Watching {} for changes (Ctrl+C to stop)", root.display());

    for result in rx {
        let events = match result {
            Ok(events) => events,
            Err(e) => {
                log::warn!("File watcher error: {}", e);
                continue;
            }
        };

        let mut changed: Vec<PathBuf> = events
            .into_iter()
            .filter(|event| event.kind == DebouncedEventKind::Any)
            .map(|event| event.path)
            .filter(|path| path.is_file() && files::should_process(path))
            .collect();
        changed.sort();
        changed.dedup();

        for path in changed {
            if written.is_own_write(&path) {
                log::debug!("Skipping own write: {}", path.display());
                continue;
            }
            match files::process_file(&path, options) {
                Ok(processed) => written.record(&processed),
                Err(e) => log::error!("Failed to prettify {}: {}", path.display(), e),
            }
        }
    }

    log::error!("File watcher disconnected");
    Ok(())
}

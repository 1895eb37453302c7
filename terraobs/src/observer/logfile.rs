//! Log-file observer: subject snapshots as JSONL.
//!
//! Writes one JSON line per updated subject (the root of the decoded
//! message and, recursively, its nested subjects) to any `Write`
//! destination — a file, stdout, or a pipe.
//!
//! ```json
//! {"update":4,"id":7,"kind":"cell","x":2.5,"y":-4.0,"attributes":{"temp":{"type":"number","value":36.6}}}
//! ```

use super::{ObserverError, StateObserver, SubjectSnapshot};
use crate::blackboard::BlackBoard;
use crate::subject::SubjectId;
use serde::Serialize;
use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

/// One output line: the snapshot plus the update sequence number.
#[derive(Serialize)]
struct LogLine {
    update: u64,
    #[serde(flatten)]
    snapshot: SubjectSnapshot,
}

/// Observer that appends subject snapshots to a JSONL sink.
pub struct LogFileObserver {
    /// Destination for JSONL output.
    writer: Mutex<Box<dyn Write + Send>>,
    /// Updates sunk so far, stamped into each line.
    updates: Mutex<u64>,
}

impl LogFileObserver {
    /// Create an observer writing to stdout.
    ///
    /// Useful for piping to tools like `jq`. Buffered to reduce syscall
    /// overhead during high-frequency updates.
    pub fn stdout() -> Self {
        Self::new(Box::new(BufWriter::new(std::io::stdout())))
    }

    /// Create an observer writing to a file.
    pub fn file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    /// Create an observer with a custom writer (pipe, socket, capture).
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            updates: Mutex::new(0),
        }
    }

    /// Walk `root` and its nested subjects depth-first, deduplicating ids
    /// so a subject registered under two parents is emitted once.
    fn collect_subtree(board: &BlackBoard, root: SubjectId) -> Vec<SubjectSnapshot> {
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        let mut snapshots = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            if let Some(record) = board.subject(id) {
                snapshots.push(SubjectSnapshot::of(record));
                stack.extend(record.nested().iter().rev());
            }
        }
        snapshots
    }
}

impl StateObserver for LogFileObserver {
    fn on_update(&self, board: &BlackBoard, root: SubjectId) -> Result<(), ObserverError> {
        let update = {
            let mut updates = self.updates.lock().expect("log writer poisoned");
            *updates += 1;
            *updates
        };

        let mut writer = self.writer.lock().expect("log writer poisoned");
        for snapshot in Self::collect_subtree(board, root) {
            serde_json::to_writer(&mut *writer, &LogLine { update, snapshot })?;
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "LogFileObserver"
    }

    fn on_shutdown(&self) {
        // Final flush; errors have nowhere to go at teardown.
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

//! Observer sinks for decoded subject state.
//!
//! Consumers of the cache that are not widgets — log files, diagnostic
//! dumps, sockets — implement [`StateObserver`] and register with an
//! [`ObserverRegistry`]. After each decoded message the session notifies
//! the registry with the cache and the root subject that changed.
//!
//! Observers read the cache; they never mutate records (only the
//! [`Decoder`](crate::Decoder) does that). Errors returned from
//! `on_update` are logged and do not block the session.

pub mod logfile;

use crate::blackboard::BlackBoard;
use crate::subject::{SubjectId, SubjectState};
use crate::AttrValue;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while sinking an update.
#[derive(Error, Debug)]
pub enum ObserverError {
    /// I/O error (e.g., writing the log file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error (e.g., JSONL output).
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Observer sink disconnected (e.g., a closed socket).
    #[error("observer disconnected")]
    Disconnected,
}

/// Serializable view of one subject record.
///
/// Attributes are re-keyed into a `BTreeMap` so sink output is stable
/// across runs regardless of hash order.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectSnapshot {
    pub id: SubjectId,
    pub kind: terrawire::SubjectKind,
    pub x: f64,
    pub y: f64,
    pub attributes: BTreeMap<String, AttrValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<SubjectId>,
}

impl SubjectSnapshot {
    pub fn of(record: &SubjectState) -> Self {
        Self {
            id: record.id,
            kind: record.kind(),
            x: record.x,
            y: record.y,
            attributes: record
                .attributes()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            nested: record.nested().to_vec(),
        }
    }
}

/// A sink for decoded state updates.
pub trait StateObserver: Send + Sync {
    /// Called after a message for `root` has been applied to `board`.
    fn on_update(&self, board: &BlackBoard, root: SubjectId) -> Result<(), ObserverError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Called when the session ends or the observer is unregistered.
    ///
    /// Default implementation is a no-op.
    fn on_shutdown(&self) {}
}

/// Registry for managing multiple observers.
pub struct ObserverRegistry {
    observers: Vec<Box<dyn StateObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self { observers: vec![] }
    }

    pub fn register(&mut self, observer: Box<dyn StateObserver>) {
        log::info!("Registered observer: {}", observer.name());
        self.observers.push(observer);
    }

    /// Notify all observers of an applied update.
    ///
    /// Errors are logged but do not propagate (non-blocking).
    pub fn notify(&self, board: &BlackBoard, root: SubjectId) {
        for observer in &self.observers {
            if let Err(e) = observer.on_update(board, root) {
                log::warn!("Observer '{}' error: {}", observer.name(), e);
            }
        }
    }

    /// Notify all observers of shutdown.
    pub fn shutdown(&self) {
        for observer in &self.observers {
            observer.on_shutdown();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ObserverRegistry {
    fn drop(&mut self) {
        // Observers flush buffers and close files on shutdown.
        self.shutdown();
    }
}

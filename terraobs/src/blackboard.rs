//! The subject-state cache.
//!
//! One [`BlackBoard`] per running simulation session: constructed
//! explicitly, owned by the session, and destroyed at teardown. It is the
//! single authoritative store of every subject record, keyed by id, with a
//! per-subject dirty bit so repeated draws of unchanged state cost a map
//! lookup instead of a re-serialization.
//!
//! # Concurrency
//!
//! All operations are synchronous, in-memory, and CPU-bound. The board
//! itself is not internally locked; callers that iterate records while a
//! decode runs on another thread wrap the board in the exposed
//! [`SharedBlackBoard`] handle and serialize access themselves. Within one
//! decode pass a composite's nested list is cleared before its children
//! are re-registered, so an unsynchronized reader could observe a
//! transiently empty list.

use crate::subject::{ObserverId, SubjectId, SubjectState};
use rustc_hash::FxHashMap;
use std::sync::{Arc, RwLock};
use terrawire::SubjectKind;
use thiserror::Error;

/// Errors surfaced while obtaining serialized subject state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// The simulation-side subject failed to serialize itself.
    #[error("subject {id} failed to serialize its state: {reason}")]
    Source { id: SubjectId, reason: String },
}

/// A simulation-side entity the cache can pull state from on a miss.
///
/// Implemented outside this crate by whatever drives the simulation; the
/// cache only ever calls it when the subject's dirty bit is set.
pub trait Subject {
    fn subject_id(&self) -> SubjectId;

    fn subject_kind(&self) -> SubjectKind;

    /// Serialize current state for `observer`, restricted to `attribs`
    /// (empty slice = all attributes).
    fn serialize_state(
        &self,
        observer: ObserverId,
        attribs: &[String],
    ) -> Result<Vec<u8>, StateError>;
}

/// Lock handle for callers that must read while a decode is in flight.
pub type SharedBlackBoard = Arc<RwLock<BlackBoard>>;

/// Cache of all subject state visible to observers.
#[derive(Debug, Default)]
pub struct BlackBoard {
    entries: FxHashMap<SubjectId, SubjectState>,
    /// Serialized-state streams cached per subject, shared zero-copy with
    /// consumers.
    streams: FxHashMap<SubjectId, Arc<[u8]>>,
    /// Nested subjects touched since the consumer last reset the counter.
    changed: usize,
    /// Monotonic stamp source for record update ordering. Survives
    /// `clear()` so stamps never move backwards within a session.
    clock: u64,
}

impl BlackBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap the board in the shared read/write lock handle.
    pub fn into_shared(self) -> SharedBlackBoard {
        Arc::new(RwLock::new(self))
    }

    /// Insert a record for `id` if absent. Re-adding an existing subject
    /// is a no-op apart from marking it dirty. Always succeeds.
    pub fn add_subject(&mut self, id: SubjectId) {
        self.entries
            .entry(id)
            .and_modify(|record| record.dirty = true)
            .or_insert_with(|| SubjectState::new(id));
    }

    /// Read-only lookup; `None` for ids never seen.
    pub fn subject(&self, id: SubjectId) -> Option<&SubjectState> {
        self.entries.get(&id)
    }

    /// Upsert lookup. A freshly created record reads as "unknown kind,
    /// zero position, no attributes" until a decode populates it.
    pub fn subject_mut(&mut self, id: SubjectId) -> &mut SubjectState {
        self.entries
            .entry(id)
            .or_insert_with(|| SubjectState::new(id))
    }

    /// Dirty bit for `id`; ids never seen report dirty, matching the
    /// fresh-record default that forces an initial draw.
    pub fn is_dirty(&self, id: SubjectId) -> bool {
        self.entries.get(&id).map(|r| r.dirty).unwrap_or(true)
    }

    /// Force a redraw of `id` regardless of prior state.
    pub fn set_dirty(&mut self, id: SubjectId) {
        self.subject_mut(id).dirty = true;
    }

    /// Serialized state of `subject`, served from cache when clean.
    ///
    /// On a dirty entry (or a missing stream) the subject is asked to
    /// serialize itself, the bytes are cached, and the dirty bit clears.
    /// A clean entry returns the previously cached stream without touching
    /// the subject at all — the core optimization of this cache.
    pub fn state_of(
        &mut self,
        subject: &dyn Subject,
        observer: ObserverId,
        attribs: &[String],
    ) -> Result<Arc<[u8]>, StateError> {
        let id = subject.subject_id();
        let clean = !self.is_dirty(id);
        if clean {
            if let Some(stream) = self.streams.get(&id) {
                return Ok(Arc::clone(stream));
            }
        }

        let bytes = subject.serialize_state(observer, attribs)?;
        let stream: Arc<[u8]> = bytes.into();
        self.streams.insert(id, Arc::clone(&stream));
        self.subject_mut(id).dirty = false;
        Ok(stream)
    }

    /// Reset the changed-subject counter. Consumers call this at the start
    /// of a draw cycle; [`Decoder`](crate::Decoder) only ever increments.
    pub fn reset_changed_subjects(&mut self) {
        self.changed = 0;
    }

    pub fn note_changed_subject(&mut self) {
        self.changed += 1;
    }

    /// Nested subjects registered since the last reset. A consumer compares
    /// this against its visible set to choose between repainting only
    /// changes and a full repaint; nothing here enforces either.
    pub fn changed_subjects(&self) -> usize {
        self.changed
    }

    /// Next logical update stamp.
    pub fn touch(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Drop every record and cached stream; used on simulation reset.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.streams.clear();
        self.changed = 0;
    }

    /// Remove one subject and its cached stream.
    pub fn remove_subject(&mut self, id: SubjectId) -> Option<SubjectState> {
        self.streams.remove(&id);
        self.entries.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate all records in unspecified order.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectState> {
        self.entries.values()
    }
}

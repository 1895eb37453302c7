//! Decoder: applies serialized subject-state messages to the cache.
//!
//! A decode walks one message — a recursive tree of subject frames — and
//! mutates [`BlackBoard`] records as it goes. The token grammar, consumed
//! strictly in order per frame:
//!
//! ```text
//! frame := id kind attrCount elemCount attribute{attrCount} frame{elemCount}
//! attribute := key dataKind value
//! ```
//!
//! Attributes named exactly `x`/`y` with a numeric kind set the subject's
//! position and never land in the generic attribute map. A composite
//! frame's nested-id list is cleared before its child frames decode, so
//! membership is fully replaced each update cycle.
//!
//! # Failure semantics
//!
//! A malformed frame aborts the decode with the failing token position.
//! There is no transactional rollback: siblings decoded before the failure
//! keep their applied mutations. (Buffering per-frame mutations and
//! committing on success would close that window, at the cost of an
//! allocation per frame; consumers so far tolerate the partial state by
//! skipping the draw cycle.)

use crate::attributes::AttrValue;
use crate::blackboard::BlackBoard;
use crate::subject::SubjectId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use terrawire::{DataKind, SubjectKind, TokenCursor, WireError, DEFAULT_SEPARATOR};

#[cfg(feature = "proto")]
mod proto;

/// Decode options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecodeOptions {
    /// Token separator the producer was configured with.
    pub separator: char,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
        }
    }
}

/// Per-neighbor `[x, y, weight]` values keyed by neighbor id.
pub type NeighborWeights = FxHashMap<SubjectId, [f64; 3]>;

/// Stateless protocol interpreter over a borrowed cache.
///
/// Holds no state between calls beyond the borrow itself; every `decode`
/// is one complete pass over one message.
pub struct Decoder<'a> {
    board: &'a mut BlackBoard,
    options: DecodeOptions,
}

impl<'a> Decoder<'a> {
    pub fn new(board: &'a mut BlackBoard) -> Self {
        Self {
            board,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(board: &'a mut BlackBoard, options: DecodeOptions) -> Self {
        Self { board, options }
    }

    /// Decode one token-stream message and return the root subject id.
    ///
    /// Does not reset the changed-subject counter; the consumer owns the
    /// draw cycle and resets it there.
    pub fn decode(&mut self, message: &str) -> Result<SubjectId, WireError> {
        let mut cursor = TokenCursor::new(message, self.options.separator)?;
        let stamp = self.board.touch();
        let root = self.consume_frame(&mut cursor, None, stamp)?;
        if !cursor.is_exhausted() {
            log::debug!(
                "message for subject {} left {} trailing tokens unconsumed",
                root,
                cursor.remaining()
            );
        }
        Ok(root)
    }

    /// One subject frame, recursively including its children.
    fn consume_frame(
        &mut self,
        cursor: &mut TokenCursor<'_>,
        parent: Option<SubjectId>,
        stamp: u64,
    ) -> Result<SubjectId, WireError> {
        let id = self.consume_id(cursor)?;
        if let Some(parent_id) = parent {
            self.board.subject_mut(parent_id).add_nested(id);
            self.board.note_changed_subject();
        }

        let kind = self.consume_kind(cursor)?;
        let attr_count = cursor.next_count()?;
        let elem_count = cursor.next_count()?;
        if !kind.supports_nesting() && elem_count > 0 {
            return Err(WireError::LeafWithChildren { id });
        }

        let record = self.board.subject_mut(id);
        record.set_kind(kind);
        record.dirty = false;
        record.clear_nested(stamp);

        for _ in 0..attr_count {
            self.consume_attribute(cursor, id)?;
        }
        for _ in 0..elem_count {
            self.consume_frame(cursor, Some(id), stamp)?;
        }
        Ok(id)
    }

    /// Frame header: subject id. Upserts the cache entry on sight.
    fn consume_id(&mut self, cursor: &mut TokenCursor<'_>) -> Result<SubjectId, WireError> {
        let id = cursor.next_i32()?;
        self.board.add_subject(id);
        Ok(id)
    }

    fn consume_kind(&mut self, cursor: &mut TokenCursor<'_>) -> Result<SubjectKind, WireError> {
        Ok(SubjectKind::from_code(cursor.next_i32()?))
    }

    /// One `(key, dataKind, value)` triple.
    ///
    /// Numeric `x`/`y` route to the subject position. Unrecognized data
    /// codes consume their value token (keeping the stream in sync) but
    /// store nothing.
    fn consume_attribute(
        &mut self,
        cursor: &mut TokenCursor<'_>,
        id: SubjectId,
    ) -> Result<(), WireError> {
        let key = cursor.next_token()?;
        let data_kind = DataKind::from_code(cursor.next_i32()?);
        match data_kind {
            DataKind::Number => {
                let value = cursor.next_f64()?;
                let record = self.board.subject_mut(id);
                match key {
                    "x" => record.x = value,
                    "y" => record.y = value,
                    _ => record.put_number(key, value),
                }
            }
            DataKind::Text => {
                let value = cursor.next_token()?;
                self.board.subject_mut(id).put_text(key, value);
            }
            DataKind::Bool => {
                let value = cursor.next_bool()?;
                self.board.subject_mut(id).put(key, value);
            }
            DataKind::DateTime => {
                let value = cursor.next_token()?;
                self.board
                    .subject_mut(id)
                    .put(key, AttrValue::DateTime(value.to_string()));
            }
            DataKind::Unknown => {
                let value = cursor.next_token()?;
                log::debug!(
                    "subject {}: dropping attribute '{}' with unrecognized data code (value '{}')",
                    id,
                    key,
                    value
                );
            }
        }
        Ok(())
    }

    /// Decode a neighborhood message into per-neighbor weight triples.
    ///
    /// Each neighbor frame carries `x`, `y` and `@getWeight` attributes;
    /// the result maps neighbor id to `[x, y, weight]`. Neighbor records
    /// are upserted in the cache with their positions as a side effect.
    ///
    /// Not reachable from [`decode`](Self::decode): no current token-stream
    /// producer has been confirmed to emit this sub-grammar (the upstream
    /// call site is disabled), so it stays a separate entry point.
    pub fn decode_neighborhood(&mut self, message: &str) -> Result<NeighborWeights, WireError> {
        let mut cursor = TokenCursor::new(message, self.options.separator)?;
        let stamp = self.board.touch();

        let id = self.consume_id(&mut cursor)?;
        let kind = self.consume_kind(&mut cursor)?;
        let attr_count = cursor.next_count()?;
        let neighbor_count = cursor.next_count()?;
        if !kind.supports_nesting() && neighbor_count > 0 {
            return Err(WireError::LeafWithChildren { id });
        }

        let record = self.board.subject_mut(id);
        record.set_kind(kind);
        record.dirty = false;
        record.clear_nested(stamp);

        for _ in 0..attr_count {
            self.consume_attribute(&mut cursor, id)?;
        }

        let mut weights = NeighborWeights::default();
        for _ in 0..neighbor_count {
            let (neighbor_id, triple) = self.consume_neighbor(&mut cursor, stamp)?;
            self.board.subject_mut(id).add_nested(neighbor_id);
            self.board.note_changed_subject();
            weights.insert(neighbor_id, triple);
        }
        Ok(weights)
    }

    /// One neighbor frame within a neighborhood message.
    fn consume_neighbor(
        &mut self,
        cursor: &mut TokenCursor<'_>,
        stamp: u64,
    ) -> Result<(SubjectId, [f64; 3]), WireError> {
        let id = self.consume_id(cursor)?;
        let kind = self.consume_kind(cursor)?;
        let attr_count = cursor.next_count()?;
        let elem_count = cursor.next_count()?;
        if elem_count > 0 {
            return Err(WireError::LeafWithChildren { id });
        }

        let (mut x, mut y) = {
            let record = self.board.subject_mut(id);
            record.set_kind(kind);
            record.dirty = false;
            record.updated_at = stamp;
            (record.x, record.y)
        };

        let mut weight = 0.0;
        for _ in 0..attr_count {
            let key = cursor.next_token()?;
            let data_kind = DataKind::from_code(cursor.next_i32()?);
            match (key, data_kind) {
                ("@getWeight", DataKind::Number) => weight = cursor.next_f64()?,
                ("x", DataKind::Number) => {
                    x = cursor.next_f64()?;
                    self.board.subject_mut(id).x = x;
                }
                ("y", DataKind::Number) => {
                    y = cursor.next_f64()?;
                    self.board.subject_mut(id).y = y;
                }
                (_, DataKind::Number) => {
                    let value = cursor.next_f64()?;
                    self.board.subject_mut(id).put_number(key, value);
                }
                (_, DataKind::Text) => {
                    let value = cursor.next_token()?;
                    self.board.subject_mut(id).put_text(key, value);
                }
                _ => {
                    // Bool/datetime/unknown carry no weight information.
                    cursor.next_token()?;
                }
            }
        }

        Ok((id, [x, y, weight]))
    }
}

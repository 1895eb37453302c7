//! Per-subject state records.

use crate::attributes::AttrValue;
use rustc_hash::FxHashMap;
use terrawire::SubjectKind;

/// Externally assigned subject identifier, stable for a subject's lifetime.
pub type SubjectId = i32;

/// Observer identifier, assigned by the consumer that requested the state.
pub type ObserverId = i32;

/// Last-known state of one subject: identity, kind, position, attribute
/// values, and (for composite kinds) the ids of its nested subjects.
///
/// Records are owned exclusively by the [`BlackBoard`](crate::BlackBoard);
/// nested subjects are referenced by id only and resolved through the
/// board, never through pointers.
#[derive(Debug, Clone)]
pub struct SubjectState {
    /// Subject id this record belongs to.
    pub id: SubjectId,
    /// Spatial position. Zero until an `x`/`y` attribute arrives.
    pub x: f64,
    pub y: f64,
    /// Stale-cache flag. Starts true so a new subject is always drawn once.
    pub dirty: bool,
    /// Logical stamp of the last decode that touched this record.
    pub updated_at: u64,
    kind: SubjectKind,
    attrs: FxHashMap<String, AttrValue>,
    /// Allocated once the kind is known to support nesting; a leaf `Cell`
    /// never carries this list.
    nested: Option<Vec<SubjectId>>,
}

impl SubjectState {
    /// Fresh record: unknown kind, zero position, no attributes, dirty.
    pub fn new(id: SubjectId) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            dirty: true,
            updated_at: 0,
            kind: SubjectKind::Unknown,
            attrs: FxHashMap::default(),
            nested: None,
        }
    }

    pub fn kind(&self) -> SubjectKind {
        self.kind
    }

    /// Set the subject kind, allocating the nested-id list for any kind
    /// that can hold children.
    pub fn set_kind(&mut self, kind: SubjectKind) {
        self.kind = kind;
        if kind.supports_nesting() && self.nested.is_none() {
            self.nested = Some(Vec::new());
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    /// Upsert an attribute: overwrite in place if the name exists.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn put_number(&mut self, name: impl Into<String>, value: f64) {
        self.put(name, AttrValue::Number(value));
    }

    pub fn put_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.put(name, AttrValue::Text(value.into()));
    }

    /// Numeric value of an attribute. `None` when the name is absent or the
    /// value is not numeric — a routine miss (e.g. an attribute the subject
    /// did not produce this tick), not an error.
    pub fn number(&self, name: &str) -> Option<f64> {
        self.attrs.get(name).and_then(AttrValue::as_number)
    }

    /// Textual value of an attribute; `None` on miss, as for [`number`](Self::number).
    pub fn text(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(AttrValue::as_text)
    }

    pub fn value(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn attribute_count(&self) -> usize {
        self.attrs.len()
    }

    /// Iterate attributes in unspecified order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Register a nested subject by id.
    ///
    /// # Panics
    ///
    /// Calling this on a leaf kind is a programmer error, not a wire
    /// condition, and panics.
    pub fn add_nested(&mut self, id: SubjectId) {
        assert!(
            self.kind.supports_nesting(),
            "subject {} has leaf kind {:?} and cannot hold nested subjects",
            self.id,
            self.kind
        );
        self.nested.get_or_insert_with(Vec::new).push(id);
    }

    /// Empty the nested-id list and stamp the record.
    ///
    /// Membership is fully replaced on every decode of a composite subject;
    /// the decoder calls this before repopulating.
    pub fn clear_nested(&mut self, stamp: u64) {
        if let Some(nested) = self.nested.as_mut() {
            nested.clear();
        }
        self.updated_at = stamp;
    }

    pub fn has_nested(&self) -> bool {
        self.nested.as_ref().is_some_and(|n| !n.is_empty())
    }

    /// Nested subject ids in registration order; empty for leaf kinds.
    pub fn nested(&self) -> &[SubjectId] {
        self.nested.as_deref().unwrap_or(&[])
    }
}

// Records order by last-update stamp (id as tie-break), supporting
// least/most-recently-updated staleness policies in consumers. Two records
// compare equal iff they carry the same stamp and id.
impl PartialEq for SubjectState {
    fn eq(&self, other: &Self) -> bool {
        self.updated_at == other.updated_at && self.id == other.id
    }
}

impl Eq for SubjectState {}

impl PartialOrd for SubjectState {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SubjectState {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.updated_at
            .cmp(&other.updated_at)
            .then(self.id.cmp(&other.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_record_defaults() {
        let record = SubjectState::new(7);
        assert_eq!(record.kind(), SubjectKind::Unknown);
        assert_eq!((record.x, record.y), (0.0, 0.0));
        assert!(record.dirty);
        assert_eq!(record.attribute_count(), 0);
        assert!(record.nested().is_empty());
    }

    #[test]
    fn test_set_kind_allocates_nested_for_composites() {
        let mut cell = SubjectState::new(1);
        cell.set_kind(SubjectKind::Cell);
        assert!(cell.nested.is_none());

        let mut space = SubjectState::new(2);
        space.set_kind(SubjectKind::CellularSpace);
        assert!(space.nested.is_some());
        assert!(!space.has_nested());
    }

    #[test]
    fn test_attribute_overwrite_keeps_single_entry() {
        let mut record = SubjectState::new(1);
        record.put_number("hp", 10.0);
        record.put_number("hp", 7.0);
        assert_eq!(record.attribute_count(), 1);
        assert_eq!(record.number("hp"), Some(7.0));
    }

    #[test]
    fn test_attribute_miss_is_none() {
        let record = SubjectState::new(1);
        assert_eq!(record.number("missing"), None);
        assert_eq!(record.text("missing"), None);
    }

    #[test]
    fn test_typed_miss_on_wrong_kind() {
        let mut record = SubjectState::new(1);
        record.put_text("label", "wet");
        assert_eq!(record.number("label"), None);
        assert_eq!(record.text("label"), Some("wet"));
    }

    #[test]
    #[should_panic(expected = "leaf kind")]
    fn test_add_nested_on_cell_panics() {
        let mut record = SubjectState::new(1);
        record.set_kind(SubjectKind::Cell);
        record.add_nested(2);
    }

    #[test]
    fn test_nested_replacement() {
        let mut record = SubjectState::new(1);
        record.set_kind(SubjectKind::Society);
        record.add_nested(10);
        record.add_nested(11);
        record.clear_nested(5);
        record.add_nested(11);
        record.add_nested(12);
        assert_eq!(record.nested(), &[11, 12]);
        assert_eq!(record.updated_at, 5);
    }

    #[test]
    fn test_ordering_by_update_stamp() {
        let mut older = SubjectState::new(1);
        older.clear_nested(1);
        let mut newer = SubjectState::new(2);
        newer.clear_nested(9);
        assert!(older < newer);
    }
}

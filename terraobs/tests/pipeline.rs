//! End-to-end pipeline tests: wire message → decoder → cache → sinks.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use terraobs::testing::FrameBuilder;
use terraobs::{
    BlackBoard, Decoder, ObserverError, ObserverRegistry, StateObserver, Subject, SubjectId,
    SubjectKind, SubjectSnapshot,
};

/// Observer that snapshots the root subject on every update.
struct RootCapture {
    updates: Arc<AtomicUsize>,
}

impl StateObserver for RootCapture {
    fn on_update(&self, board: &BlackBoard, root: SubjectId) -> Result<(), ObserverError> {
        let record = board.subject(root).expect("root was just decoded");
        let _ = SubjectSnapshot::of(record);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "RootCapture"
    }
}

#[test]
fn decode_feeds_registered_observers() {
    let message = FrameBuilder::new(1, SubjectKind::CellularSpace)
        .number("resolution", 100.0)
        .child(FrameBuilder::new(2, SubjectKind::Cell).position(0.0, 1.0))
        .child(FrameBuilder::new(3, SubjectKind::Cell).position(1.0, 0.0))
        .render();

    let mut board = BlackBoard::new();
    let updates = Arc::new(AtomicUsize::new(0));
    let mut registry = ObserverRegistry::new();
    registry.register(Box::new(RootCapture {
        updates: Arc::clone(&updates),
    }));

    board.reset_changed_subjects();
    let root = Decoder::new(&mut board).decode(&message).unwrap();
    registry.notify(&board, root);

    assert_eq!(updates.load(Ordering::SeqCst), 1);
    assert_eq!(board.changed_subjects(), 2);
    assert_eq!(board.subject(1).unwrap().nested(), &[2, 3]);
}

#[test]
fn shared_board_serializes_decode_against_reads() {
    let shared = BlackBoard::new().into_shared();

    let writer = Arc::clone(&shared);
    let handle = std::thread::spawn(move || {
        for tick in 0..50 {
            let message = FrameBuilder::new(1, SubjectKind::Society)
                .number("wealth", tick as f64)
                .child(FrameBuilder::new(2 + tick, SubjectKind::Agent))
                .render();
            let mut board = writer.write().unwrap();
            Decoder::new(&mut board).decode(&message).unwrap();
        }
    });

    handle.join().unwrap();

    let board = shared.read().unwrap();
    let society = board.subject(1).unwrap();
    // Membership is replaced per update: only the last tick's agent remains.
    assert_eq!(society.nested(), &[51]);
    assert_eq!(society.number("wealth"), Some(49.0));
}

/// Simulation-side stub whose serialization is the rendered token frame.
struct FireCell {
    id: SubjectId,
    state: String,
}

impl Subject for FireCell {
    fn subject_id(&self) -> SubjectId {
        self.id
    }

    fn subject_kind(&self) -> SubjectKind {
        SubjectKind::Cell
    }

    fn serialize_state(
        &self,
        _observer: terraobs::ObserverId,
        _attribs: &[String],
    ) -> Result<Vec<u8>, terraobs::StateError> {
        Ok(FrameBuilder::new(self.id, SubjectKind::Cell)
            .text("state", &self.state)
            .render()
            .into_bytes())
    }
}

#[test]
fn cached_stream_survives_until_invalidated() {
    let mut board = BlackBoard::new();
    let cell = FireCell {
        id: 7,
        state: "burning".to_string(),
    };

    let first = board.state_of(&cell, 1, &[]).unwrap();
    let second = board.state_of(&cell, 1, &[]).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    // The cached stream decodes like any producer message.
    let message = String::from_utf8(first.to_vec()).unwrap();
    Decoder::new(&mut board).decode(&message).unwrap();
    assert_eq!(board.subject(7).unwrap().text("state"), Some("burning"));

    // Invalidation forces a fresh serialization.
    board.set_dirty(7);
    let third = board.state_of(&cell, 1, &[]).unwrap();
    assert!(!Arc::ptr_eq(&second, &third));
}

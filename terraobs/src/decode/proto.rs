//! Protobuf decode path (wire format A).
//!
//! Applies the same cache mutations as the token path: upsert, set kind,
//! clear dirty, replace nested membership, route `x`/`y` to position.

use super::Decoder;
use crate::subject::SubjectId;
use terrawire::proto::SubjectAttribute;
use terrawire::{SubjectKind, WireError};

impl Decoder<'_> {
    /// Decode one protobuf-serialized message and return the root subject id.
    pub fn decode_proto(&mut self, bytes: &[u8]) -> Result<SubjectId, WireError> {
        let message = terrawire::proto::parse(bytes)?;
        let stamp = self.board.touch();
        self.apply_message(&message, None, stamp)?;
        Ok(message.id)
    }

    fn apply_message(
        &mut self,
        message: &SubjectAttribute,
        parent: Option<SubjectId>,
        stamp: u64,
    ) -> Result<(), WireError> {
        let id = message.id;
        self.board.add_subject(id);
        if let Some(parent_id) = parent {
            self.board.subject_mut(parent_id).add_nested(id);
            self.board.note_changed_subject();
        }

        let kind = SubjectKind::from_code(message.type_code);
        if !kind.supports_nesting() && !message.internal_subject.is_empty() {
            return Err(WireError::LeafWithChildren { id });
        }
        if message.attribs_number as usize != message.raw_attributes.len() {
            log::debug!(
                "subject {}: declared {} attributes, message carries {}",
                id,
                message.attribs_number,
                message.raw_attributes.len()
            );
        }

        let record = self.board.subject_mut(id);
        record.set_kind(kind);
        record.dirty = false;
        record.clear_nested(stamp);

        for attribute in &message.raw_attributes {
            let record = self.board.subject_mut(id);
            match (&attribute.text, attribute.number) {
                (Some(text), _) => record.put_text(attribute.key.as_str(), text.clone()),
                (None, Some(number)) => match attribute.key.as_str() {
                    "x" => record.x = number,
                    "y" => record.y = number,
                    _ => record.put_number(attribute.key.as_str(), number),
                },
                (None, None) => {
                    log::debug!(
                        "subject {}: attribute '{}' carries neither number nor text",
                        id,
                        attribute.key
                    );
                }
            }
        }

        for child in &message.internal_subject {
            self.apply_message(child, Some(id), stamp)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blackboard::BlackBoard;
    use terrawire::proto::encode;
    use terrawire::proto::RawAttribute;

    fn space_with_two_cells() -> SubjectAttribute {
        SubjectAttribute {
            id: 1,
            type_code: SubjectKind::CellularSpace.code(),
            attribs_number: 1,
            raw_attributes: vec![RawAttribute::number("resolution", 100.0)],
            items_number: 2,
            internal_subject: vec![
                SubjectAttribute {
                    id: 2,
                    type_code: SubjectKind::Cell.code(),
                    attribs_number: 3,
                    raw_attributes: vec![
                        RawAttribute::number("x", 2.0),
                        RawAttribute::number("y", 5.0),
                        RawAttribute::text("cover", "forest"),
                    ],
                    items_number: 0,
                    internal_subject: vec![],
                },
                SubjectAttribute {
                    id: 3,
                    type_code: SubjectKind::Cell.code(),
                    attribs_number: 1,
                    raw_attributes: vec![RawAttribute::number("temp", 22.0)],
                    items_number: 0,
                    internal_subject: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_proto_round_trip() {
        let bytes = encode(&space_with_two_cells());
        let mut board = BlackBoard::new();
        let root = Decoder::new(&mut board).decode_proto(&bytes).unwrap();

        assert_eq!(root, 1);
        assert_eq!(board.subject(1).unwrap().nested(), &[2, 3]);
        assert_eq!(board.subject(1).unwrap().number("resolution"), Some(100.0));
        assert_eq!(board.subject(3).unwrap().number("temp"), Some(22.0));
        assert_eq!(board.changed_subjects(), 2);
    }

    #[test]
    fn test_proto_position_routing() {
        let bytes = encode(&space_with_two_cells());
        let mut board = BlackBoard::new();
        Decoder::new(&mut board).decode_proto(&bytes).unwrap();

        let cell = board.subject(2).unwrap();
        assert_eq!((cell.x, cell.y), (2.0, 5.0));
        assert_eq!(cell.value("x"), None);
        assert_eq!(cell.value("y"), None);
        assert_eq!(cell.text("cover"), Some("forest"));
    }

    #[test]
    fn test_proto_nested_membership_replaced() {
        let mut board = BlackBoard::new();
        let mut message = space_with_two_cells();
        Decoder::new(&mut board)
            .decode_proto(&encode(&message))
            .unwrap();

        message.internal_subject.remove(0);
        message.items_number = 1;
        Decoder::new(&mut board)
            .decode_proto(&encode(&message))
            .unwrap();

        assert_eq!(board.subject(1).unwrap().nested(), &[3]);
    }

    #[test]
    fn test_proto_parse_failure() {
        let mut board = BlackBoard::new();
        let err = Decoder::new(&mut board).decode_proto(&[0x22, 0xff, 0x01]).unwrap_err();
        assert!(matches!(err, WireError::Proto(_)));
        assert!(board.is_empty());
    }

    #[test]
    fn test_proto_leaf_with_children_rejected() {
        let mut cell = space_with_two_cells().internal_subject.remove(0);
        cell.items_number = 1;
        cell.internal_subject = vec![SubjectAttribute {
            id: 9,
            type_code: SubjectKind::Cell.code(),
            attribs_number: 0,
            raw_attributes: vec![],
            items_number: 0,
            internal_subject: vec![],
        }];

        let mut board = BlackBoard::new();
        let err = Decoder::new(&mut board)
            .decode_proto(&encode(&cell))
            .unwrap_err();
        assert_eq!(err, WireError::LeafWithChildren { id: 2 });
    }
}

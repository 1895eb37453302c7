//! Protobuf wire format (format A).
//!
//! Hand-written prost messages matching the producer's `SubjectAttribute`
//! schema. The message is recursive: a composite subject carries its
//! children inline in `internal_subject`, to arbitrary depth.
//!
//! A `RawAttribute` is a key plus exactly one of `number`/`text`; the
//! producer sets whichever field matches the attribute's kind and leaves
//! the other unset.

/// One serialized subject frame and, recursively, its children.
#[derive(Clone, PartialEq, prost::Message)]
pub struct SubjectAttribute {
    /// Externally assigned subject id, stable for the subject's lifetime.
    #[prost(int32, tag = "1")]
    pub id: i32,
    /// Subject kind code (see [`crate::SubjectKind`]).
    #[prost(int32, tag = "2")]
    pub type_code: i32,
    /// Declared number of entries in `raw_attributes`.
    #[prost(int32, tag = "3")]
    pub attribs_number: i32,
    #[prost(message, repeated, tag = "4")]
    pub raw_attributes: Vec<RawAttribute>,
    /// Declared number of entries in `internal_subject`.
    #[prost(int32, tag = "5")]
    pub items_number: i32,
    #[prost(message, repeated, tag = "6")]
    pub internal_subject: Vec<SubjectAttribute>,
}

/// One key/value pair of subject state.
#[derive(Clone, PartialEq, prost::Message)]
pub struct RawAttribute {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(double, optional, tag = "2")]
    pub number: Option<f64>,
    #[prost(string, optional, tag = "3")]
    pub text: Option<String>,
}

/// Parse a serialized [`SubjectAttribute`] message.
pub fn parse(bytes: &[u8]) -> Result<SubjectAttribute, prost::DecodeError> {
    <SubjectAttribute as prost::Message>::decode(bytes)
}

/// Serialize a [`SubjectAttribute`] message to bytes.
pub fn encode(message: &SubjectAttribute) -> Vec<u8> {
    prost::Message::encode_to_vec(message)
}

impl RawAttribute {
    /// A numeric attribute.
    pub fn number(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            number: Some(value),
            text: None,
        }
    }

    /// A textual attribute.
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            number: None,
            text: Some(value.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_message_round_trip() {
        let msg = SubjectAttribute {
            id: 3,
            type_code: 2,
            attribs_number: 1,
            raw_attributes: vec![RawAttribute::number("soilWater", 0.25)],
            items_number: 1,
            internal_subject: vec![SubjectAttribute {
                id: 4,
                type_code: 1,
                attribs_number: 1,
                raw_attributes: vec![RawAttribute::text("cover", "forest")],
                items_number: 0,
                internal_subject: vec![],
            }],
        };

        let bytes = msg.encode_to_vec();
        let back = SubjectAttribute::decode(bytes.as_slice()).unwrap();
        assert_eq!(back, msg);
        assert_eq!(back.internal_subject[0].raw_attributes[0].text.as_deref(), Some("forest"));
    }

    #[test]
    fn test_garbage_bytes_fail_to_parse() {
        // A truncated length-delimited field: parse error, not a panic.
        let garbage = [0x22, 0xff, 0x01];
        assert!(SubjectAttribute::decode(&garbage[..]).is_err());
    }
}

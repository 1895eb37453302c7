//! Error types for the observer wire formats.

use thiserror::Error;

/// Errors that can occur while scanning a serialized state message.
///
/// Positions are token indices into the split message, so a failure can be
/// reported against the exact token that broke the grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WireError {
    /// Message contained no tokens at all.
    #[error("cannot decode an empty message")]
    EmptyMessage,

    /// The token stream ended while the grammar still expected tokens.
    #[error("unexpected end of message at token {position}")]
    UnexpectedEnd {
        /// Index of the first missing token.
        position: usize,
    },

    /// A token could not be interpreted as the type the grammar requires.
    #[error("invalid token '{token}' at position {position}, expected {expected}")]
    InvalidToken {
        /// Index of the offending token.
        position: usize,
        /// The token as received.
        token: String,
        /// What the grammar expected instead.
        expected: &'static str,
    },

    /// A leaf subject (a bare cell) declared nested subjects.
    #[error("leaf subject {id} declares nested subjects")]
    LeafWithChildren {
        /// Id of the offending subject.
        id: i32,
    },

    /// Protobuf message failed to parse (wire format A only).
    #[cfg(feature = "proto")]
    #[error("protobuf decode failed: {0}")]
    Proto(#[from] prost::DecodeError),
}

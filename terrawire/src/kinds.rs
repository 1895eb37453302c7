//! Typed subject and attribute kind codes.
//!
//! Both wire formats tag subjects and attributes with small integer codes.
//! These enums replace raw-integer switching: an unrecognized code maps to
//! the explicit `Unknown` variant, never to a silent no-op.

use serde::{Deserialize, Serialize};

/// Kind of an observable simulation entity.
///
/// Wire codes are stable across producers; `Cell` is the only leaf kind
/// and the only one that never holds nested subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Unknown,
    Cell,
    CellularSpace,
    Neighborhood,
    Timer,
    Event,
    Trajectory,
    Automaton,
    Agent,
    Environment,
    Society,
}

impl SubjectKind {
    /// Map a wire code to a kind. Total: unrecognized codes yield `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => SubjectKind::Cell,
            2 => SubjectKind::CellularSpace,
            3 => SubjectKind::Neighborhood,
            4 => SubjectKind::Timer,
            5 => SubjectKind::Event,
            6 => SubjectKind::Trajectory,
            7 => SubjectKind::Automaton,
            8 => SubjectKind::Agent,
            9 => SubjectKind::Environment,
            10 => SubjectKind::Society,
            _ => SubjectKind::Unknown,
        }
    }

    /// The wire code this kind serializes as.
    pub fn code(self) -> i32 {
        match self {
            SubjectKind::Unknown => 0,
            SubjectKind::Cell => 1,
            SubjectKind::CellularSpace => 2,
            SubjectKind::Neighborhood => 3,
            SubjectKind::Timer => 4,
            SubjectKind::Event => 5,
            SubjectKind::Trajectory => 6,
            SubjectKind::Automaton => 7,
            SubjectKind::Agent => 8,
            SubjectKind::Environment => 9,
            SubjectKind::Society => 10,
        }
    }

    /// Whether subjects of this kind may contain nested subjects.
    ///
    /// Only a bare `Cell` is a leaf; everything else (including `Unknown`,
    /// which may later resolve to a composite kind) carries a nested list.
    pub fn supports_nesting(self) -> bool {
        self != SubjectKind::Cell
    }
}

/// Kind of a single decoded attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    Bool,
    Number,
    DateTime,
    Text,
    Unknown,
}

impl DataKind {
    /// Map a wire code to a kind. Total: unrecognized codes yield `Unknown`.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => DataKind::Bool,
            1 => DataKind::Number,
            2 => DataKind::DateTime,
            3 => DataKind::Text,
            _ => DataKind::Unknown,
        }
    }

    /// The wire code this kind serializes as.
    pub fn code(self) -> i32 {
        match self {
            DataKind::Bool => 0,
            DataKind::Number => 1,
            DataKind::DateTime => 2,
            DataKind::Text => 3,
            DataKind::Unknown => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_kind_round_trip() {
        for code in 0..=10 {
            let kind = SubjectKind::from_code(code);
            if kind != SubjectKind::Unknown {
                assert_eq!(kind.code(), code);
            }
        }
    }

    #[test]
    fn test_unrecognized_subject_code_is_unknown() {
        assert_eq!(SubjectKind::from_code(-1), SubjectKind::Unknown);
        assert_eq!(SubjectKind::from_code(99), SubjectKind::Unknown);
    }

    #[test]
    fn test_only_cell_is_leaf() {
        assert!(!SubjectKind::Cell.supports_nesting());
        assert!(SubjectKind::CellularSpace.supports_nesting());
        assert!(SubjectKind::Society.supports_nesting());
        assert!(SubjectKind::Unknown.supports_nesting());
    }

    #[test]
    fn test_data_kind_round_trip() {
        for code in 0..=3 {
            assert_eq!(DataKind::from_code(code).code(), code);
        }
        assert_eq!(DataKind::from_code(42), DataKind::Unknown);
    }
}

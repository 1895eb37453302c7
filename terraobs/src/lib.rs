//! # TerraME observer core
//!
//! State cache and decode pipeline for observing a running simulation.
//! Simulation-side subjects (cells, agents, cellular spaces, societies)
//! serialize their state into wire messages; this crate decodes those
//! messages into a per-session cache that observer sinks and widgets
//! query to render the current picture.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │  Subjects   │────▶│ wire message │────▶│   Decoder   │
//! │ (simulate)  │     │ (terrawire)  │     │ (interpret) │
//! └─────────────┘     └──────────────┘     └──────┬──────┘
//!                                                 │
//!                     ┌──────────────┐     ┌──────▼──────┐
//!                     │  Observers   │◀────│  BlackBoard │
//!                     │  (sinks)     │     │  (cache)    │
//!                     └──────────────┘     └─────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`BlackBoard`] | Per-session cache of all subject records, dirty-bit gated |
//! | [`SubjectState`] | One subject's last-known attributes, position, nesting |
//! | [`AttrValue`] | Typed attribute value (bool, number, datetime, text) |
//! | [`Decoder`] | Applies one wire message as cache mutations |
//! | [`StateObserver`] | Trait for non-widget sinks (log files, dumps) |
//!
//! ## Caching
//!
//! Every record carries a dirty bit, true at birth so a new subject is
//! always drawn once. [`BlackBoard::state_of`] serves clean subjects from
//! the cached serialized stream without touching the simulation; decodes
//! and explicit [`BlackBoard::set_dirty`] calls invalidate.

pub mod attributes;
pub mod blackboard;
pub mod decode;
pub mod observer;
pub mod subject;
pub mod testing;

pub use attributes::AttrValue;
pub use blackboard::{BlackBoard, SharedBlackBoard, StateError, Subject};
pub use decode::{DecodeOptions, Decoder, NeighborWeights};
pub use observer::logfile::LogFileObserver;
pub use observer::{ObserverError, ObserverRegistry, StateObserver, SubjectSnapshot};
pub use subject::{ObserverId, SubjectId, SubjectState};

// Wire-level types consumers match on.
pub use terrawire::{DataKind, SubjectKind, WireError};

//! The grade aggregation engine: Term -> Course -> SyllabusItem, with
//! the incremental bookkeeping that keeps each course's running
//! aggregates consistent as items are added, removed, reweighted or
//! (re)graded, and the target-grade derivation built on top of them.

mod course;
mod error;
mod syllabus;
mod term;

pub use course::{Course, CourseSummary, ItemSnapshot};
pub use error::{EngineError, ValidationError};
pub use syllabus::SyllabusItem;
pub use term::{DateWindow, Term};

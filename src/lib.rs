//! Reconciliation and staffing-statistics engine for a regional
//! welfare-institution program.
//!
//! Three upstream systems describe the same people — the employee
//! roster, the training-participant list, and the per-course completion
//! exports — with free-text institution names, shifted spreadsheet
//! columns, and redundant status fields. This crate cleans those
//! records, decides which ones refer to the same institution and the
//! same person, resolves who is still employed as of a reference date,
//! and aggregates per-institution staffing and education-completion
//! statistics for the dashboard.
//!
//! The core is synchronous and total: given well-typed records it
//! always produces a value. Only the dataset loader returns errors.

pub mod analysis;
pub mod column_shift;
pub mod dates;
pub mod dedupe;
pub mod error;
pub mod loader;
pub mod matcher;
pub mod normalize;
pub mod status;
pub mod types;

pub use analysis::{analyze, classify_job_type, summarize, JobTypeBucket};
pub use column_shift::{correct_employee_row, correct_employee_row_as_of, ShiftKind};
pub use dedupe::{dedupe_people, DedupeResult, PersonLike};
pub use error::DataError;
pub use loader::load_datasets;
pub use matcher::{
    institutions_match, is_institution_name_match, normalize_institution_code, HasInstitution,
    InstitutionRef,
};
pub use normalize::{normalize_institution_name, normalize_person_name};
pub use status::{employee_is_active, resolve_active_status};
pub use types::{
    AnalysisOptions, AnalysisRow, AnalysisSummary, Datasets, EducationRecord, Employee,
    Institution, Participant,
};

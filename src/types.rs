//! Record types shared across the reconciliation engine.
//!
//! Field names mirror the camelCase JSON the dashboard server writes, so
//! every struct derives serde with `rename_all = "camelCase"`. Upstream
//! spreadsheets omit fields freely; everything optional is `Option` or
//! carries `#[serde(default)]` so a sparse row still deserializes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of the employee roster (전담인력 현황).
///
/// Created wholesale per upload; individual records are never mutated.
/// The trailing free-text fields (`notes` through `main_duty`) exist
/// because misaligned conversions sometimes leave a resignation date in
/// one of them — see the column-shift corrector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub career_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hire_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resign_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_duty: Option<String>,
}

/// One welfare institution, with the two independent allocation sources
/// (internal manual registration vs. government budget) kept separate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Institution {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default)]
    pub allocated_social_workers: u32,
    #[serde(default)]
    pub allocated_life_support: u32,
    #[serde(default)]
    pub allocated_social_workers_gov: u32,
    #[serde(default)]
    pub allocated_life_support_gov: u32,
    #[serde(default)]
    pub hired_social_workers: u32,
    #[serde(default)]
    pub hired_life_support: u32,
}

/// A basic- or advanced-course completion row from the learning system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
}

/// A person enrolled in the training system.
///
/// Carries redundant copies of completion status and job type; the third
/// independent source of truth reconciled against employees and raw
/// education rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub institution_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resign_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Redundant copy of basic-course completion status (e.g. "수료").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_training: Option<String>,
    /// Redundant copy of advanced-course completion status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced_education: Option<String>,
}

/// The five collections the aggregator consumes, as loaded from one
/// upload cycle. Treated as read-only during analysis.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub employees: Vec<Employee>,
    pub institutions: Vec<Institution>,
    pub education_basic: Vec<EducationRecord>,
    pub education_advanced: Vec<EducationRecord>,
    pub participants: Vec<Participant>,
}

/// Options for an analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// As-of date for tenure and active-status computation.
    /// `None` means today.
    pub snapshot_date: Option<NaiveDate>,
    /// Restrict to institutions whose region or district equals this
    /// value (trimmed). `None` means all institutions.
    pub region: Option<String>,
}

/// Per-institution derived metrics. Computed fresh every run, never
/// persisted as source of truth.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRow {
    pub institution_code: String,
    pub institution_name: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    pub total_employees: u32,
    pub active_total: u32,
    pub active_social_workers: u32,
    pub active_life_support: u32,

    pub allocated_social_workers: u32,
    pub allocated_life_support: u32,
    pub allocated_social_workers_gov: u32,
    pub allocated_life_support_gov: u32,
    pub hired_social_workers: u32,
    pub hired_life_support: u32,

    /// hired / allocated × 100, one decimal, 0 when allocation is 0.
    pub employment_rate_social: f64,
    pub employment_rate_life: f64,

    /// Mean days since hire over active employees with a parseable hire
    /// date, whole days.
    pub avg_tenure_days_social: i64,
    pub avg_tenure_days_life: i64,

    pub participant_count: u32,
    pub final_completers_total: u32,
    pub final_completers_social: u32,
    pub final_completers_life: u32,

    /// final completers / active headcount × 100, one decimal, 0 when
    /// the bucket headcount is 0.
    pub education_rate_social: f64,
    pub education_rate_life: f64,
}

/// Program-wide totals across all analysis rows (the dashboard cards).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub institution_count: u32,
    pub total_employees: u32,
    pub active_total: u32,
    pub active_social_workers: u32,
    pub active_life_support: u32,
    pub allocated_social_workers: u32,
    pub allocated_life_support: u32,
    pub hired_social_workers: u32,
    pub hired_life_support: u32,
    pub employment_rate_social: f64,
    pub employment_rate_life: f64,
    pub final_completers_total: u32,
    pub education_rate_overall: f64,
}

//! Per-institution staffing and education statistics.
//!
//! One pass over the in-memory datasets: for every institution, gather
//! its employees and participants through the institution matcher,
//! resolve who is still active, classify job types, and derive staffing
//! and completion metrics. Recomputation is idempotent and side-effect
//! free; nothing here is persisted.
//!
//! Numeric policy: every rate guards its denominator — an institution
//! with zero allocation reports a rate of 0, never NaN — and rates are
//! rounded to one decimal, tenure to whole days.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::dedupe::dedupe_people;
use crate::matcher::{institutions_match, HasInstitution};
use crate::normalize::normalize_person_name;
use crate::status::{employee_is_active, resolve_active_status};
use crate::types::{
    AnalysisOptions, AnalysisRow, AnalysisSummary, Datasets, EducationRecord, Employee,
    Institution, Participant,
};

/// Course statuses that count as completed.
const COMPLETED_STATUSES: [&str; 2] = ["수료", "완료"];

/// Job-type tokens that mark a (senior or regular) social worker.
const SOCIAL_WORKER_TOKENS: [&str; 2] = ["사회복지사", "전담"];

/// Worker classification buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTypeBucket {
    SocialWorker,
    LifeSupport,
    /// Blank job type; counted in headcounts but neither bucket.
    Unclassified,
}

/// Classify a free-text job type.
///
/// Social-worker tokens win; any other non-blank job type falls into
/// the life-support bucket (the roster uses a long tail of care-worker
/// titles), and blank stays unclassified.
pub fn classify_job_type(job_type: Option<&str>) -> JobTypeBucket {
    let value = job_type.unwrap_or("").trim();
    if value.is_empty() {
        return JobTypeBucket::Unclassified;
    }
    if SOCIAL_WORKER_TOKENS.iter().any(|t| value.contains(t)) {
        return JobTypeBucket::SocialWorker;
    }
    JobTypeBucket::LifeSupport
}

fn is_completed_status(status: &str) -> bool {
    COMPLETED_STATUSES.contains(&status.trim())
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// numerator / denominator × 100, one decimal, 0 for an empty
/// denominator. Never NaN, never infinite.
fn rate(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    round1(numerator as f64 / denominator as f64 * 100.0)
}

#[derive(Debug, Default, Clone, Copy)]
struct CompleterCounts {
    total: u32,
    social: u32,
    life: u32,
}

impl CompleterCounts {
    fn add(&mut self, bucket: JobTypeBucket) {
        self.total += 1;
        match bucket {
            JobTypeBucket::SocialWorker => self.social += 1,
            JobTypeBucket::LifeSupport => self.life += 1,
            JobTypeBucket::Unclassified => {}
        }
    }
}

/// Compute one [`AnalysisRow`] per institution.
///
/// `options.snapshot_date` fixes the as-of date for tenure and active
/// status (default: today); `options.region` restricts the institution
/// set. Inputs are read-only; running twice on the same data yields the
/// same rows.
pub fn analyze(datasets: &Datasets, options: &AnalysisOptions) -> Vec<AnalysisRow> {
    let reference = options
        .snapshot_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    // Collapse duplicate rows once, up front. Re-uploads and per-course
    // rows mean the same person appears several times in both lists.
    let employees = dedupe_people(datasets.employees.clone());
    let participants = dedupe_people(datasets.participants.clone());
    if employees.skipped_missing_name + participants.skipped_missing_name > 0 {
        log::debug!(
            "analysis input dropped {} employee / {} participant rows without names",
            employees.skipped_missing_name,
            participants.skipped_missing_name
        );
    }

    datasets
        .institutions
        .iter()
        .filter(|inst| region_matches(inst, options.region.as_deref()))
        .map(|inst| {
            analyze_institution(
                inst,
                &employees.records,
                &participants.records,
                &datasets.education_basic,
                &datasets.education_advanced,
                reference,
            )
        })
        .collect()
}

fn region_matches(institution: &Institution, filter: Option<&str>) -> bool {
    let Some(filter) = filter.map(str::trim).filter(|f| !f.is_empty()) else {
        return true;
    };
    institution.region.trim() == filter
        || institution.district.as_deref().map(str::trim) == Some(filter)
}

fn analyze_institution(
    institution: &Institution,
    employees: &[Employee],
    participants: &[Participant],
    education_basic: &[EducationRecord],
    education_advanced: &[EducationRecord],
    reference: NaiveDate,
) -> AnalysisRow {
    let inst_ref = institution.institution_ref();

    let inst_employees: Vec<&Employee> = employees
        .iter()
        .filter(|e| institutions_match(&e.institution_ref(), &inst_ref))
        .collect();

    let active: Vec<&Employee> = inst_employees
        .iter()
        .copied()
        .filter(|e| employee_is_active(e, reference))
        .collect();

    let active_social: Vec<&Employee> = active
        .iter()
        .copied()
        .filter(|e| classify_job_type(e.job_type.as_deref()) == JobTypeBucket::SocialWorker)
        .collect();
    let active_life: Vec<&Employee> = active
        .iter()
        .copied()
        .filter(|e| classify_job_type(e.job_type.as_deref()) == JobTypeBucket::LifeSupport)
        .collect();

    let matched_participants: Vec<&Participant> = participants
        .iter()
        .filter(|p| institutions_match(&p.institution_ref(), &inst_ref))
        .collect();

    // Of those, the ones still active per the roster-first resolution.
    let inst_participants: Vec<&Participant> = matched_participants
        .iter()
        .copied()
        .filter(|p| resolve_active_status(p, employees, reference))
        .collect();

    // The participant list owns this institution as soon as any row
    // matches it, even if every matched row is inactive. The course
    // lists are a fallback for institutions absent from it entirely.
    let completers = if !matched_participants.is_empty() {
        completers_from_participants(&inst_participants)
    } else if !education_basic.is_empty() || !education_advanced.is_empty() {
        let basic = education_for_institution(education_basic, &inst_ref, &inst_employees);
        let advanced = education_for_institution(education_advanced, &inst_ref, &inst_employees);
        completers_from_education(&basic, &advanced, &inst_employees)
    } else {
        CompleterCounts::default()
    };

    AnalysisRow {
        institution_code: institution.code.clone(),
        institution_name: institution.name.clone(),
        region: institution.region.clone(),
        district: institution.district.clone(),

        total_employees: inst_employees.len() as u32,
        active_total: active.len() as u32,
        active_social_workers: active_social.len() as u32,
        active_life_support: active_life.len() as u32,

        allocated_social_workers: institution.allocated_social_workers,
        allocated_life_support: institution.allocated_life_support,
        allocated_social_workers_gov: institution.allocated_social_workers_gov,
        allocated_life_support_gov: institution.allocated_life_support_gov,
        hired_social_workers: institution.hired_social_workers,
        hired_life_support: institution.hired_life_support,

        employment_rate_social: rate(
            institution.hired_social_workers,
            institution.allocated_social_workers,
        ),
        employment_rate_life: rate(
            institution.hired_life_support,
            institution.allocated_life_support,
        ),

        avg_tenure_days_social: average_tenure_days(&active_social, reference),
        avg_tenure_days_life: average_tenure_days(&active_life, reference),

        participant_count: inst_participants.len() as u32,
        final_completers_total: completers.total,
        final_completers_social: completers.social,
        final_completers_life: completers.life,

        education_rate_social: rate(completers.social, active_social.len() as u32),
        education_rate_life: rate(completers.life, active_life.len() as u32),
    }
}

/// Mean days between hire date and the reference date over employees
/// with a parseable hire date. Unparseable dates drop out of both
/// numerator and denominator.
fn average_tenure_days(employees: &[&Employee], reference: NaiveDate) -> i64 {
    let tenures: Vec<i64> = employees
        .iter()
        .filter_map(|e| e.hire_date.as_deref())
        .filter_map(crate::dates::parse_flexible_date)
        .map(|hired| (reference - hired).num_days())
        .collect();

    if tenures.is_empty() {
        return 0;
    }
    (tenures.iter().sum::<i64>() as f64 / tenures.len() as f64).round() as i64
}

/// Final completers from participant rows: both redundant status copies
/// must say completed.
fn completers_from_participants(participants: &[&Participant]) -> CompleterCounts {
    let mut counts = CompleterCounts::default();
    for p in participants {
        let basic_done = p.basic_training.as_deref().is_some_and(is_completed_status);
        let advanced_done = p
            .advanced_education
            .as_deref()
            .is_some_and(is_completed_status);
        if basic_done && advanced_done {
            counts.add(classify_job_type(p.job_type.as_deref()));
        }
    }
    counts
}

/// Course rows belonging to an institution: matched by institution
/// first; when that yields nothing, by person name against the
/// institution's own employee list.
fn education_for_institution<'a>(
    records: &'a [EducationRecord],
    inst_ref: &crate::matcher::InstitutionRef<'_>,
    inst_employees: &[&Employee],
) -> Vec<&'a EducationRecord> {
    let matched: Vec<&EducationRecord> = records
        .iter()
        .filter(|r| institutions_match(&r.institution_ref(), inst_ref))
        .collect();
    if !matched.is_empty() {
        return matched;
    }

    let employee_names: HashSet<String> = inst_employees
        .iter()
        .map(|e| normalize_person_name(&e.name))
        .filter(|n| !n.is_empty())
        .collect();

    records
        .iter()
        .filter(|r| employee_names.contains(&normalize_person_name(&r.name)))
        .collect()
}

/// Final completers from the raw course lists: a person must appear
/// with a completed status in both the basic and the advanced list.
/// Cross-list identity prefers (name, residentId); a record without a
/// resident id falls back to the normalized name alone. Job types come
/// from the institution's employees.
fn completers_from_education(
    basic: &[&EducationRecord],
    advanced: &[&EducationRecord],
    inst_employees: &[&Employee],
) -> CompleterCounts {
    let advanced_done: Vec<&EducationRecord> = advanced
        .iter()
        .copied()
        .filter(|r| is_completed_status(&r.status))
        .collect();

    let mut counts = CompleterCounts::default();
    let mut seen: HashSet<String> = HashSet::new();

    for record in basic.iter().filter(|r| is_completed_status(&r.status)) {
        let name = normalize_person_name(&record.name);
        if name.is_empty() {
            continue;
        }

        let resident = record.resident_id.as_deref().map(str::trim).filter(|r| !r.is_empty());
        let matched = advanced_done.iter().find_map(|a| {
            if normalize_person_name(&a.name) != name {
                return None;
            }
            match (resident, a.resident_id.as_deref().map(str::trim).filter(|r| !r.is_empty())) {
                (Some(rb), Some(ra)) => (rb == ra).then_some(false),
                // Resident id missing on either side → name match is
                // enough, but flag it.
                _ => Some(true),
            }
        });
        let name_only = match matched {
            Some(name_only) => name_only,
            None => continue,
        };
        if name_only {
            log::warn!(
                "name-only cross-list match for {:?}; resident id missing on one side",
                record.name.trim()
            );
        }

        let key = match resident {
            Some(r) => format!("{}_{}", name, r),
            None => name.clone(),
        };
        if !seen.insert(key) {
            continue;
        }

        let bucket = inst_employees
            .iter()
            .find(|e| normalize_person_name(&e.name) == name)
            .map(|e| classify_job_type(e.job_type.as_deref()))
            .unwrap_or(JobTypeBucket::Unclassified);
        counts.add(bucket);
    }

    counts
}

/// Program-wide totals across analysis rows (the dashboard cards).
pub fn summarize(rows: &[AnalysisRow]) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        institution_count: rows.len() as u32,
        ..AnalysisSummary::default()
    };

    for row in rows {
        summary.total_employees += row.total_employees;
        summary.active_total += row.active_total;
        summary.active_social_workers += row.active_social_workers;
        summary.active_life_support += row.active_life_support;
        summary.allocated_social_workers += row.allocated_social_workers;
        summary.allocated_life_support += row.allocated_life_support;
        summary.hired_social_workers += row.hired_social_workers;
        summary.hired_life_support += row.hired_life_support;
        summary.final_completers_total += row.final_completers_total;
    }

    summary.employment_rate_social = rate(
        summary.hired_social_workers,
        summary.allocated_social_workers,
    );
    summary.employment_rate_life =
        rate(summary.hired_life_support, summary.allocated_life_support);
    summary.education_rate_overall = rate(summary.final_completers_total, summary.active_total);

    summary
}

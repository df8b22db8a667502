//! Detection and repair of column-shifted roster rows.
//!
//! Some spreadsheet-to-JSON conversions dropped the blank leading
//! "specialization" column, sliding every later value one or two slots
//! to the right: the name field holds the literal 특화 marker, the
//! career-type field holds the person's name, and so on. This module
//! sniffs those shapes and slides the values back.
//!
//! Known limitation: the detection is shape-based. A legitimate
//! career-type value that happens to look like a 2–4 character Hangul
//! name can trigger a spurious repair; every repair is logged at `warn`
//! so audits can catch it.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::dates::{extract_iso_date, parse_flexible_date};
use crate::types::Employee;

/// Literal value the blank specialization column collapses into.
const SPECIALIZATION_SENTINEL: &str = "특화";

/// How far a row's columns were displaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftKind {
    /// Row was already aligned; returned unchanged.
    None,
    /// Sentinel in the name field, values one slot right.
    One,
    /// No sentinel, but a Hangul name in the career-type field and a
    /// tenure label in the birth-date field.
    Two,
}

fn re_korean_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[가-힣]{2,4}$").unwrap())
}

/// A plausible Korean personal name: 2–4 Hangul syllables, nothing else.
fn looks_like_korean_name(value: &str) -> bool {
    re_korean_name().is_match(value.trim())
}

/// A tenure-category label ("4년이상", "1년 이상", or the literal "기타").
fn looks_like_tenure_label(value: &str) -> bool {
    let v = value.trim();
    v.contains("년이상") || v.contains("년 이상") || v == "기타"
}

/// Detect whether a row's columns were displaced, and by how much.
pub fn detect_shift(row: &Employee) -> ShiftKind {
    let career_is_name = row
        .career_type
        .as_deref()
        .map(looks_like_korean_name)
        .unwrap_or(false);

    if row.name.trim() == SPECIALIZATION_SENTINEL && career_is_name {
        return ShiftKind::One;
    }

    let career = row.career_type.as_deref().unwrap_or("").trim();
    let birth_is_tenure = row
        .birth_date
        .as_deref()
        .map(looks_like_tenure_label)
        .unwrap_or(false);
    if career_is_name && career != "기타" && birth_is_tenure {
        return ShiftKind::Two;
    }

    ShiftKind::None
}

/// Detect and repair a shifted row, using today as the reference date
/// for the recomputed active flag.
pub fn correct_employee_row(row: Employee) -> (Employee, ShiftKind) {
    correct_employee_row_as_of(row, chrono::Local::now().date_naive())
}

/// Detect and repair a shifted row against an explicit reference date.
///
/// Unshifted rows pass through untouched. For shifted rows the values
/// slide back one slot (name ← careerType, careerType ← birthDate,
/// birthDate ← gender, gender ← hireDate, hireDate ← resignDate with the
/// status slot as fallback), the resignation date is recovered from the
/// trailing free-text fields, and the active flag is recomputed.
pub fn correct_employee_row_as_of(row: Employee, reference: NaiveDate) -> (Employee, ShiftKind) {
    let kind = detect_shift(&row);
    if kind == ShiftKind::None {
        return (row, kind);
    }

    let mut fixed = row.clone();

    fixed.name = row.career_type.clone().unwrap_or_default().trim().to_string();
    fixed.career_type = row.birth_date.clone();
    fixed.birth_date = row.gender.clone();
    fixed.gender = row.hire_date.clone();
    fixed.hire_date = row
        .resign_date
        .clone()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| row.status.clone().filter(|v| !v.trim().is_empty()));
    fixed.resign_date = recover_resign_date(&row);

    fixed.is_active = Some(match fixed.resign_date.as_deref().and_then(|d| {
        // Recovered dates are ISO; anything unparseable is ignored.
        parse_flexible_date(d)
    }) {
        Some(resigned) => resigned > reference,
        None => true,
    });

    log::warn!(
        "column-shift repair ({:?}): {:?} → {:?} ({})",
        kind,
        row.name,
        fixed.name,
        row.institution
    );

    (fixed, kind)
}

/// Scan the trailing free-text fields, in fixed order, for the first
/// `YYYY-MM-DD` substring: that is the displaced resignation date.
fn recover_resign_date(row: &Employee) -> Option<String> {
    [
        row.notes.as_deref(),
        row.remarks.as_deref(),
        row.modified_date.as_deref(),
        row.learning_id.as_deref(),
        row.update_date.as_deref(),
        row.main_duty.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(extract_iso_date)
}

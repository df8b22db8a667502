//! Active-status resolution across the three person sources.
//!
//! Whether someone is "currently employed" is answered differently by
//! the employee roster, the participant list, and the education rows.
//! The roster is authoritative: when a matching employee record exists,
//! its signals decide and the participant's own fields are not
//! consulted. Only without a roster match do the person's own status
//! fields, resignation date, and active flag apply.
//!
//! Total function: malformed dates degrade to "signal absent", never an
//! error.

use chrono::NaiveDate;

use crate::dates::{normalize_birth_date, parse_flexible_date};
use crate::normalize::normalize_person_name;
use crate::types::{Employee, Participant};

/// Substring-matched, case-insensitive markers of a terminated or
/// dormant person. Korean first, English variants after.
const INACTIVE_KEYWORDS: [&str; 17] = [
    "퇴사",
    "퇴직",
    "사직",
    "해촉",
    "종결",
    "중단",
    "중지",
    "휴면",
    "탈퇴",
    "만료",
    "resign",
    "retire",
    "terminat",
    "inactive",
    "dormant",
    "suspend",
    "withdraw",
];

/// The status-bearing fields of one record, viewed uniformly.
#[derive(Debug, Default)]
pub struct StatusSignals<'a> {
    pub statuses: Vec<&'a str>,
    pub resign_date: Option<&'a str>,
    pub is_active: Option<bool>,
}

impl<'a> StatusSignals<'a> {
    pub fn from_employee(employee: &'a Employee) -> Self {
        StatusSignals {
            statuses: employee.status.as_deref().into_iter().collect(),
            resign_date: employee.resign_date.as_deref(),
            is_active: employee.is_active,
        }
    }

    pub fn from_participant(person: &'a Participant) -> Self {
        StatusSignals {
            statuses: [
                person.status.as_deref(),
                person.employment_status.as_deref(),
                person.work_status.as_deref(),
                person.member_status.as_deref(),
            ]
            .into_iter()
            .flatten()
            .collect(),
            resign_date: person.resign_date.as_deref(),
            is_active: person.is_active,
        }
    }
}

fn contains_inactive_keyword(value: &str) -> bool {
    let lowered = value.to_lowercase();
    INACTIVE_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Evaluate one record's signals against the reference date.
///
/// Inactive when: any status field carries an inactive keyword, the
/// resignation date is on or before the reference date (strictly-after
/// means still active), or the explicit active flag is `false`.
/// Otherwise active.
pub fn signals_active(signals: &StatusSignals<'_>, reference: NaiveDate) -> bool {
    if signals.statuses.iter().any(|s| contains_inactive_keyword(s)) {
        return false;
    }

    if let Some(raw) = signals.resign_date {
        if !raw.trim().is_empty() {
            match parse_flexible_date(raw) {
                Some(resigned) if resigned <= reference => return false,
                Some(_) => {}
                None => {
                    // Unparseable dates don't force inactivity.
                    log::warn!("ignoring unparseable resignation date {:?}", raw);
                }
            }
        }
    }

    if signals.is_active == Some(false) {
        return false;
    }

    true
}

/// Is this roster employee active as of the reference date?
pub fn employee_is_active(employee: &Employee, reference: NaiveDate) -> bool {
    signals_active(&StatusSignals::from_employee(employee), reference)
}

/// Find the roster record for a person: exact (name, birth date) match,
/// falling back to (name, id) when either side lacks a birth date.
pub fn find_roster_match<'a>(person: &Participant, roster: &'a [Employee]) -> Option<&'a Employee> {
    let name = normalize_person_name(&person.name);
    if name.is_empty() {
        return None;
    }

    let birth = person.birth_date.as_deref().and_then(normalize_birth_date);
    let id = person.id.as_deref().map(str::trim).filter(|id| !id.is_empty());

    roster.iter().find(|employee| {
        if normalize_person_name(&employee.name) != name {
            return false;
        }
        let employee_birth = employee.birth_date.as_deref().and_then(normalize_birth_date);
        match (&birth, &employee_birth) {
            (Some(a), Some(b)) => a == b,
            // Birth date absent on either side → fall back to id.
            _ => match (id, employee.id.as_deref().map(str::trim)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    })
}

/// Resolve a person's active status against the employee roster.
///
/// A matching roster record is authoritative; without one the person's
/// own fields decide. Never fails — missing data just means fewer
/// signals.
pub fn resolve_active_status(
    person: &Participant,
    roster: &[Employee],
    reference: NaiveDate,
) -> bool {
    match find_roster_match(person, roster) {
        Some(employee) => employee_is_active(employee, reference),
        None => signals_active(&StatusSignals::from_participant(person), reference),
    }
}

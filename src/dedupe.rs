//! Person de-duplication across redundant upload rows.
//!
//! The same person shows up repeatedly: once per course, once per
//! roster upload, sometimes with and sometimes without a birth date.
//! Records collapse under the strongest identity key available —
//! (name, birth date) over (name, id) over name alone — and the more
//! complete record wins each collision. Name-only merges are a real
//! collision risk (two people can share a name), so they are logged
//! and counted rather than silently absorbed.

use std::collections::HashMap;

use crate::dates::normalize_birth_date;
use crate::normalize::normalize_person_name;
use crate::types::{Employee, Participant};

/// A record that names a person. Implemented by every record type the
/// de-duplicator and status resolver reconcile.
pub trait PersonLike {
    fn person_name(&self) -> &str;
    fn person_birth_date(&self) -> Option<&str>;
    fn person_record_id(&self) -> Option<&str>;

    /// Count of populated identity-bearing fields; the richer record
    /// survives a collision.
    fn completeness_score(&self) -> u32;
}

fn score_str(value: &str) -> u32 {
    u32::from(!value.trim().is_empty())
}

fn score_opt(value: Option<&str>) -> u32 {
    value.map(score_str).unwrap_or(0)
}

impl PersonLike for Employee {
    fn person_name(&self) -> &str {
        &self.name
    }

    fn person_birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }

    fn person_record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn completeness_score(&self) -> u32 {
        score_str(&self.name)
            + score_opt(self.birth_date.as_deref())
            + score_opt(self.id.as_deref())
            + score_str(&self.institution)
            + score_opt(self.job_type.as_deref())
            + u32::from(self.is_active.is_some())
            + score_opt(self.resign_date.as_deref())
    }
}

impl PersonLike for Participant {
    fn person_name(&self) -> &str {
        &self.name
    }

    fn person_birth_date(&self) -> Option<&str> {
        self.birth_date.as_deref()
    }

    fn person_record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn completeness_score(&self) -> u32 {
        score_str(&self.name)
            + score_opt(self.birth_date.as_deref())
            + score_opt(self.id.as_deref())
            + score_str(&self.institution)
            + score_opt(self.job_type.as_deref())
            + u32::from(self.is_active.is_some())
            + score_opt(self.resign_date.as_deref())
            + score_opt(self.basic_training.as_deref())
            + score_opt(self.advanced_education.as_deref())
    }
}

/// Outcome of a de-duplication pass. `records` keeps first-occurrence
/// order; the counters surface the audit signals.
#[derive(Debug)]
pub struct DedupeResult<T> {
    pub records: Vec<T>,
    /// Rows with an empty name, dropped up front.
    pub skipped_missing_name: u32,
    /// Merges that happened on name alone — possible distinct people.
    pub name_only_merges: u32,
}

/// Identity keys for one record, strongest first.
fn candidate_keys<T: PersonLike>(record: &T) -> Vec<String> {
    let name = normalize_person_name(record.person_name());
    let mut keys = Vec::with_capacity(3);

    if let Some(birth) = record.person_birth_date().and_then(normalize_birth_date) {
        keys.push(format!("{}_{}", name, birth));
    }
    if let Some(id) = record.person_record_id().filter(|id| !id.trim().is_empty()) {
        keys.push(format!("{}_ID_{}", name, id.trim()));
    }
    keys.push(format!("{}_NAME_ONLY", name));

    keys
}

/// Register a record's identity keys against a kept slot.
///
/// Every birth-date and id key aliases the slot, so a later row carrying
/// any of them finds the same entry. The name-only key is a genuine last
/// resort: only a record with no stronger key registers it — otherwise
/// two people sharing a name but carrying different birth dates would
/// collapse into one.
fn register_keys(by_key: &mut HashMap<String, usize>, keys: Vec<String>, idx: usize) {
    let name_only_is_sole_key = keys.len() == 1;
    for key in keys {
        if key.ends_with("_NAME_ONLY") && !name_only_is_sole_key {
            continue;
        }
        by_key.entry(key).or_insert(idx);
    }
}

/// Collapse duplicate person records.
///
/// Each record is matched against earlier ones by walking its candidate
/// keys strongest-first; the first key already seen marks it a duplicate
/// of that entry, and the record with the higher completeness score
/// survives (ties keep the first-seen one). All of a record's identity
/// keys alias its entry — whether it was inserted or merged — so a chain
/// of partial rows (id-only, then id+birth, then birth-only) lands on
/// one entry no matter the order. Output preserves the insertion order
/// of first occurrences.
pub fn dedupe_people<T: PersonLike>(records: Vec<T>) -> DedupeResult<T> {
    let mut kept: Vec<T> = Vec::with_capacity(records.len());
    let mut by_key: HashMap<String, usize> = HashMap::new();
    let mut skipped_missing_name = 0u32;
    let mut name_only_merges = 0u32;

    for record in records {
        if record.person_name().trim().is_empty() {
            skipped_missing_name += 1;
            log::debug!("dropping person record with empty name");
            continue;
        }

        let keys = candidate_keys(&record);
        let hit = keys
            .iter()
            .find_map(|key| by_key.get(key).map(|&idx| (key.clone(), idx)));

        match hit {
            Some((key, idx)) => {
                if key.ends_with("_NAME_ONLY") {
                    name_only_merges += 1;
                    log::warn!(
                        "name-only merge for {:?}; may be two different people",
                        record.person_name().trim()
                    );
                }
                if record.completeness_score() > kept[idx].completeness_score() {
                    kept[idx] = record;
                }
                register_keys(&mut by_key, keys, idx);
            }
            None => {
                register_keys(&mut by_key, keys, kept.len());
                kept.push(record);
            }
        }
    }

    DedupeResult {
        records: kept,
        skipped_missing_name,
        name_only_merges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_participant(name: &str, birth: Option<&str>, id: Option<&str>) -> Participant {
        Participant {
            name: name.into(),
            birth_date: birth.map(Into::into),
            id: id.map(Into::into),
            ..Participant::default()
        }
    }

    #[test]
    fn test_birth_date_key_merges() {
        let result = dedupe_people(vec![
            make_participant("김철수", Some("1990-01-01"), None),
            make_participant("김철수", Some("19900101"), None),
        ]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.name_only_merges, 0);
    }

    #[test]
    fn test_richer_record_wins() {
        let sparse = make_participant("김철수", Some("19900101"), None);
        let mut rich = make_participant("김철수", Some("19900101"), None);
        rich.institution = "목포사회복지관".into();
        rich.basic_training = Some("수료".into());

        let result = dedupe_people(vec![sparse, rich]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].institution, "목포사회복지관");
    }

    #[test]
    fn test_tie_keeps_first_seen() {
        let mut first = make_participant("김철수", Some("19900101"), None);
        first.institution = "목포사회복지관".into();
        let mut second = make_participant("김철수", Some("19900101"), None);
        second.institution = "여수사회복지관".into();

        let result = dedupe_people(vec![first, second]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].institution, "목포사회복지관");
    }

    #[test]
    fn test_name_only_merge_is_counted() {
        let _ = env_logger::builder().is_test(true).try_init();
        let result = dedupe_people(vec![
            make_participant("박영희", None, None),
            make_participant("박영희", None, None),
        ]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.name_only_merges, 1);
    }

    #[test]
    fn test_distinct_birth_dates_stay_separate() {
        let result = dedupe_people(vec![
            make_participant("박영희", Some("19900101"), None),
            make_participant("박영희", Some("19850505"), None),
        ]);
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_id_key_merges_without_birth_date() {
        let result = dedupe_people(vec![
            make_participant("이민정", None, Some("P-100")),
            make_participant("이민정", None, Some("P-100")),
        ]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.name_only_merges, 0);
    }

    #[test]
    fn test_partial_key_chain_merges_in_one_pass() {
        let mut middle = make_participant("김철수", Some("19900101"), Some("P-1"));
        middle.institution = "해남군종합사회복지관".into();
        let rows = vec![
            make_participant("김철수", None, Some("P-1")),
            middle,
            make_participant("김철수", Some("19900101"), None),
        ];
        let result = dedupe_people(rows);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].institution, "해남군종합사회복지관");

        let again = dedupe_people(result.records);
        assert_eq!(again.records.len(), 1);
    }

    #[test]
    fn test_empty_names_skipped() {
        let result = dedupe_people(vec![
            make_participant("  ", None, None),
            make_participant("김철수", None, None),
        ]);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.skipped_missing_name, 1);
    }

    #[test]
    fn test_spaced_name_matches_unspaced() {
        let result = dedupe_people(vec![
            make_participant("김 철수", Some("19900101"), None),
            make_participant("김철수", Some("19900101"), None),
        ]);
        assert_eq!(result.records.len(), 1);
    }

    #[test]
    fn test_idempotent_and_count_invariant() {
        let input = vec![
            make_participant("김철수", Some("19900101"), None),
            make_participant("김철수", Some("1990-01-01"), None),
            make_participant("박영희", None, Some("P-1")),
            make_participant("박영희", None, Some("P-2")),
            make_participant("이민정", None, None),
        ];
        let len_in = input.len();

        let once = dedupe_people(input);
        assert!(once.records.len() <= len_in);

        let once_len = once.records.len();
        let twice = dedupe_people(once.records);
        assert_eq!(twice.records.len(), once_len);
        assert_eq!(twice.skipped_missing_name, 0);
    }
}

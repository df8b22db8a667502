//! Institution identity matching.
//!
//! Two institution references are the same entity when their codes say
//! so; names are only consulted when at least one side has no code. Name
//! matching is a tiered heuristic (exact → containment → keyword overlap
//! → place + facility type), first hit wins. Every path returns a plain
//! bool — missing input is "no match", never an error.

use crate::normalize::normalize_institution_name;
use crate::types::{EducationRecord, Employee, Institution, Participant};

/// A code/name pair naming an institution, borrowed from any record type.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstitutionRef<'a> {
    pub code: Option<&'a str>,
    pub name: Option<&'a str>,
}

impl<'a> InstitutionRef<'a> {
    pub fn new(code: Option<&'a str>, name: Option<&'a str>) -> Self {
        InstitutionRef { code, name }
    }
}

/// Borrow an institution reference out of a record.
pub trait HasInstitution {
    fn institution_ref(&self) -> InstitutionRef<'_>;
}

impl HasInstitution for Employee {
    fn institution_ref(&self) -> InstitutionRef<'_> {
        InstitutionRef::new(self.institution_code.as_deref(), Some(&self.institution))
    }
}

impl HasInstitution for Institution {
    fn institution_ref(&self) -> InstitutionRef<'_> {
        let code = if self.code.trim().is_empty() {
            None
        } else {
            Some(self.code.as_str())
        };
        InstitutionRef::new(code, Some(&self.name))
    }
}

impl HasInstitution for EducationRecord {
    fn institution_ref(&self) -> InstitutionRef<'_> {
        InstitutionRef::new(self.institution_code.as_deref(), Some(&self.institution))
    }
}

impl HasInstitution for Participant {
    fn institution_ref(&self) -> InstitutionRef<'_> {
        InstitutionRef::new(self.institution_code.as_deref(), Some(&self.institution))
    }
}

/// Normalize an institution code for exact comparison: uppercase, keep
/// only alphanumerics.
pub fn normalize_institution_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Decide whether two institution references name the same entity.
///
/// Code equality is authoritative: when both sides carry a non-empty
/// code, the (normalized) codes decide and names are not consulted.
/// Otherwise fall back to [`is_institution_name_match`].
pub fn institutions_match(a: &InstitutionRef<'_>, b: &InstitutionRef<'_>) -> bool {
    let code_a = a.code.map(normalize_institution_code).unwrap_or_default();
    let code_b = b.code.map(normalize_institution_code).unwrap_or_default();

    if !code_a.is_empty() && !code_b.is_empty() {
        return code_a == code_b;
    }

    match (a.name, b.name) {
        (Some(na), Some(nb)) => is_institution_name_match(na, nb),
        _ => false,
    }
}

/// Administrative-unit tokens that say nothing about which institution
/// a name refers to.
const KEYWORD_STOPWORDS: [&str; 6] = ["특별시", "광역시", "특별자치시", "특별자치도", "시청", "군청"];

/// Municipalities of the program region, checked by the place+facility
/// heuristic.
const PLACE_NAMES: [&str; 22] = [
    "목포", "여수", "순천", "나주", "광양", "담양", "곡성", "구례", "고흥", "보성", "화순",
    "장흥", "강진", "해남", "영암", "무안", "함평", "영광", "장성", "완도", "진도", "신안",
];

/// Facility-type tokens in their post-normalization canonical spelling,
/// most specific first.
const FACILITY_TYPES: [&str; 9] = [
    "장애인복지관",
    "노인복지관",
    "사회복지관",
    "사회서비스원",
    "시니어클럽",
    "지원센터",
    "복지센터",
    "복지재단",
    "노인회",
];

/// Fuzzy name equality over normalized, lowercased institution names.
///
/// Tiers, first hit wins:
/// 1. exact equality
/// 2. substring containment either direction
/// 3. ≥2 overlapping keywords when both names yield ≥2 keywords
/// 4. same place name + same facility type on both sides
pub fn is_institution_name_match(a: &str, b: &str) -> bool {
    let na = normalize_institution_name(a).to_lowercase();
    let nb = normalize_institution_name(b).to_lowercase();

    if na.is_empty() || nb.is_empty() {
        return false;
    }

    if na == nb {
        return true;
    }

    if na.contains(&nb) || nb.contains(&na) {
        log::debug!("institution containment match: {:?} ~ {:?}", a, b);
        return true;
    }

    let keywords_a = extract_keywords(&na);
    let keywords_b = extract_keywords(&nb);
    if keywords_a.len() >= 2 && keywords_b.len() >= 2 {
        // Count from both sides: two short tokens can each hit the same
        // long compound token, so a one-directional count is asymmetric.
        let overlap = keyword_overlap(&keywords_a, &keywords_b)
            .min(keyword_overlap(&keywords_b, &keywords_a));
        if overlap >= 2 {
            log::debug!("institution keyword match ({}): {:?} ~ {:?}", overlap, a, b);
            return true;
        }
    }

    if let (Some((place_a, kind_a)), Some((place_b, kind_b))) =
        (extract_place_and_facility(&na), extract_place_and_facility(&nb))
    {
        if place_a == place_b && kind_a == kind_b {
            log::debug!("institution place+facility match: {:?} ~ {:?}", a, b);
            return true;
        }
    }

    false
}

/// How many of `from`'s keywords match some keyword of `to` (exact or
/// substring either way).
fn keyword_overlap(from: &[String], to: &[String]) -> usize {
    from.iter()
        .filter(|ka| {
            to.iter()
                .any(|kb| ka == &kb || ka.contains(kb.as_str()) || kb.contains(ka.as_str()))
        })
        .count()
}

/// Tokenize a normalized name into matching keywords: split on
/// whitespace/hyphen/underscore, drop single-character tokens and
/// administrative stopwords.
fn extract_keywords(name: &str) -> Vec<String> {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .map(str::trim)
        .filter(|token| token.chars().count() > 1)
        .filter(|token| !KEYWORD_STOPWORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Find a known place name and facility type in a normalized name.
/// Both must be present for the heuristic to apply.
fn extract_place_and_facility(name: &str) -> Option<(&'static str, &'static str)> {
    let place = PLACE_NAMES.iter().copied().find(|p| name.contains(p))?;
    let facility = FACILITY_TYPES.iter().copied().find(|f| name.contains(f))?;
    Some((place, facility))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r<'a>(code: Option<&'a str>, name: Option<&'a str>) -> InstitutionRef<'a> {
        InstitutionRef::new(code, name)
    }

    #[test]
    fn test_code_match_is_authoritative() {
        // Unrelated names, equal codes → match.
        let a = r(Some("A-101"), Some("목포사회복지관"));
        let b = r(Some("a101"), Some("전혀다른기관"));
        assert!(institutions_match(&a, &b));

        // Equal names, different codes → no match.
        let a = r(Some("A-101"), Some("목포사회복지관"));
        let b = r(Some("B-202"), Some("목포사회복지관"));
        assert!(!institutions_match(&a, &b));
    }

    #[test]
    fn test_code_normalization() {
        assert_eq!(normalize_institution_code(" a-10 1 "), "A101");
        assert_eq!(normalize_institution_code("A101"), "A101");
        assert_eq!(normalize_institution_code("--"), "");
    }

    #[test]
    fn test_name_fallback_when_code_missing() {
        let a = r(None, Some("목포종합사회복지관"));
        let b = r(Some("A-101"), Some("목포사회복지관"));
        assert!(institutions_match(&a, &b));
    }

    #[test]
    fn test_missing_inputs_never_match() {
        assert!(!institutions_match(&r(None, None), &r(None, Some("목포사회복지관"))));
        assert!(!institutions_match(&r(None, Some("")), &r(None, Some("목포사회복지관"))));
        assert!(!institutions_match(&r(None, None), &r(None, None)));
    }

    #[test]
    fn test_exact_and_containment() {
        assert!(is_institution_name_match("목포사회복지관", "(재)목포종합사회복지관"));
        assert!(is_institution_name_match("여수노인복지관", "여수노인복지관 본관"));
        assert!(!is_institution_name_match("여수노인복지관", "순천시니어클럽"));
    }

    #[test]
    fn test_keyword_overlap() {
        assert!(is_institution_name_match(
            "해남군 행복 지원센터",
            "행복 지원센터 해남분소"
        ));
        // Only one shared keyword → no match.
        assert!(!is_institution_name_match("해남군 지원센터", "완도군 지원센터"));
    }

    #[test]
    fn test_keyword_overlap_counts_both_directions() {
        // Both short tokens of the first name hit the single compound
        // token of the second; the reverse direction only counts one.
        // A one-sided count would accept this pair from one direction
        // and reject it from the other.
        assert!(!is_institution_name_match("해남 사랑", "해남사랑 재가"));
        assert!(!is_institution_name_match("해남사랑 재가", "해남 사랑"));
    }

    #[test]
    fn test_place_and_facility_heuristic() {
        // One side yields a single keyword, so only the place+facility
        // tier can connect these.
        assert!(is_institution_name_match(
            "완도 은빛 노인복지관",
            "완도노인복지관"
        ));
        // Same facility type, different place → no match.
        assert!(!is_institution_name_match(
            "완도 은빛 노인복지관",
            "진도노인복지관"
        ));
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("목포사회복지관", "(재)목포종합사회복지관"),
            ("완도 은빛 노인복지관", "완도군립 노인복지관"),
            ("해남군 행복 지원센터", "행복 지원센터 해남분소"),
            ("해남 사랑", "해남사랑 재가"),
            ("여수노인복지관", "순천시니어클럽"),
            ("", "목포사회복지관"),
        ];
        for (a, b) in pairs {
            assert_eq!(
                is_institution_name_match(a, b),
                is_institution_name_match(b, a),
                "asymmetric for {:?} / {:?}",
                a,
                b
            );
        }
    }
}

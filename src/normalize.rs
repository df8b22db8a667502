//! Institution-name canonicalization.
//!
//! Free-text institution names arrive differently from every upstream
//! system: with legal-entity prefixes, regional-office markers, long or
//! short province names, and "종합" facility variants. `normalize_institution_name`
//! folds all of that away so two spellings of the same institution
//! compare equal. Pure string work — no I/O, no locale lookups.

use unicode_normalization::UnicodeNormalization;

/// Leading regional-office markers, stripped repeatedly until none match.
const REGIONAL_PREFIXES: [&str; 4] = ["(광역)", "*광역지원기관", "광역지원기관", "광역"];

/// Legal-entity markers, removed wherever they appear.
const LEGAL_MARKERS: [&str; 7] = [
    "(재)",
    "(사)",
    "(주)",
    "사회복지법인",
    "재단법인",
    "사단법인",
    "주식회사",
];

/// Facility-type synonym folds (variant → canonical). Longest first so a
/// longer variant never leaves a shorter one behind.
const FACILITY_SYNONYMS: [(&str, &str); 7] = [
    ("종합사회복지관", "사회복지관"),
    ("노인종합복지관", "노인복지관"),
    ("종합노인복지관", "노인복지관"),
    ("장애인종합복지관", "장애인복지관"),
    ("종합장애인복지관", "장애인복지관"),
    ("종합지원센터", "지원센터"),
    ("통합지원센터", "지원센터"),
];

/// Province long form → abbreviated form.
const REGION_SHORT_FORMS: [(&str, &str); 20] = [
    ("서울특별시", "서울"),
    ("부산광역시", "부산"),
    ("대구광역시", "대구"),
    ("인천광역시", "인천"),
    ("광주광역시", "광주"),
    ("대전광역시", "대전"),
    ("울산광역시", "울산"),
    ("세종특별자치시", "세종"),
    ("경기도", "경기"),
    ("강원특별자치도", "강원"),
    ("강원도", "강원"),
    ("충청북도", "충북"),
    ("충청남도", "충남"),
    ("전북특별자치도", "전북"),
    ("전라북도", "전북"),
    ("전라남도", "전남"),
    ("경상북도", "경북"),
    ("경상남도", "경남"),
    ("제주특별자치도", "제주"),
    ("제주도", "제주"),
];

/// Canonicalize a free-text institution name for fuzzy equality.
///
/// Pipeline (order matters, every step idempotent):
/// 1. NFC fold (macOS spreadsheet exports ship decomposed Hangul)
/// 2. strip leading regional-office markers
/// 3. remove legal-entity markers
/// 4. fold facility-type synonyms
/// 5. fold province long forms to their short forms
/// 6. drop parentheses, periods, commas; collapse whitespace; trim
pub fn normalize_institution_name(name: &str) -> String {
    let mut out: String = name.nfc().collect::<String>().trim().to_string();

    // Removing punctuation can expose a fresh leading marker, so run the
    // whole pipeline to a fixpoint rather than trusting a single pass.
    loop {
        let next = normalize_pass(&out);
        if next == out {
            return out;
        }
        out = next;
    }
}

fn normalize_pass(input: &str) -> String {
    let mut out = input.to_string();

    // Leading markers can stack ("(광역) 광역지원기관 ...").
    loop {
        let before = out.len();
        for prefix in REGIONAL_PREFIXES {
            if let Some(rest) = out.strip_prefix(prefix) {
                out = rest.trim_start().to_string();
            }
        }
        if out.len() == before {
            break;
        }
    }

    for marker in LEGAL_MARKERS {
        if out.contains(marker) {
            out = out.replace(marker, "");
        }
    }

    for (variant, canonical) in FACILITY_SYNONYMS {
        if out.contains(variant) {
            out = out.replace(variant, canonical);
        }
    }

    for (long, short) in REGION_SHORT_FORMS {
        if out.contains(long) {
            out = out.replace(long, short);
        }
    }

    out.chars()
        .filter(|c| !matches!(c, '(' | ')' | '.' | ','))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonicalize a person name for matching: NFC fold and drop all
/// whitespace ("김 철수" and "김철수" are the same person).
pub fn normalize_person_name(name: &str) -> String {
    name.nfc().filter(|c| !c.is_whitespace()).collect()
}

//! JSON dataset loader.
//!
//! The dashboard server persists each upload as a JSON array under a
//! data directory (`employees.json`, `institutions.json`,
//! `education_basic.json`, `education_advanced.json`,
//! `participants.json`). A missing file just means that dataset hasn't
//! been uploaded yet; an unreadable or malformed file is an error.
//! Employee rows run through the column-shift corrector on the way in,
//! the same place the upload pipeline repaired them.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::column_shift::{correct_employee_row, ShiftKind};
use crate::error::DataError;
use crate::types::Datasets;

const EMPLOYEES_FILE: &str = "employees.json";
const INSTITUTIONS_FILE: &str = "institutions.json";
const EDUCATION_BASIC_FILE: &str = "education_basic.json";
const EDUCATION_ADVANCED_FILE: &str = "education_advanced.json";
const PARTICIPANTS_FILE: &str = "participants.json";

/// Load one dataset file, or an empty list when it doesn't exist.
fn load_file<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>, DataError> {
    let path = dir.join(file);
    if !path.exists() {
        log::debug!("dataset file {} not present, treating as empty", path.display());
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).map_err(|e| DataError::io(&path, e))?;
    serde_json::from_str(&content).map_err(|e| DataError::parse(&path, e))
}

/// Load all five datasets from a data directory.
///
/// Employee rows are shift-corrected at load time; repairs are counted
/// and logged.
pub fn load_datasets(dir: &Path) -> Result<Datasets, DataError> {
    let raw_employees = load_file(dir, EMPLOYEES_FILE)?;

    let mut repaired = 0u32;
    let employees = raw_employees
        .into_iter()
        .map(|row| {
            let (fixed, kind) = correct_employee_row(row);
            if kind != ShiftKind::None {
                repaired += 1;
            }
            fixed
        })
        .collect();
    if repaired > 0 {
        log::info!("repaired {} column-shifted employee rows", repaired);
    }

    Ok(Datasets {
        employees,
        institutions: load_file(dir, INSTITUTIONS_FILE)?,
        education_basic: load_file(dir, EDUCATION_BASIC_FILE)?,
        education_advanced: load_file(dir, EDUCATION_ADVANCED_FILE)?,
        participants: load_file(dir, PARTICIPANTS_FILE)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_missing_files_mean_empty_datasets() {
        let dir = tempfile::tempdir().unwrap();
        let datasets = load_datasets(dir.path()).unwrap();
        assert!(datasets.employees.is_empty());
        assert!(datasets.institutions.is_empty());
    }

    #[test]
    fn test_loads_and_repairs_employees() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            EMPLOYEES_FILE,
            r#"[
                {"name": "이민정", "institution": "강진노인복지관", "jobType": "전담사회복지사"},
                {"name": "특화", "institution": "목포사회복지관", "careerType": "김철수",
                 "birthDate": "4년이상", "gender": "1990-01-01", "hireDate": "남",
                 "notes": "2024-03-31"}
            ]"#,
        );

        let datasets = load_datasets(dir.path()).unwrap();
        assert_eq!(datasets.employees.len(), 2);
        assert_eq!(datasets.employees[0].name, "이민정");
        assert_eq!(datasets.employees[1].name, "김철수");
        assert_eq!(datasets.employees[1].resign_date.as_deref(), Some("2024-03-31"));
    }

    #[test]
    fn test_loads_institutions() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            INSTITUTIONS_FILE,
            r#"[{"code": "I1", "name": "목포사회복지관", "region": "전남",
                 "allocatedSocialWorkers": 2, "hiredSocialWorkers": 1}]"#,
        );

        let datasets = load_datasets(dir.path()).unwrap();
        assert_eq!(datasets.institutions.len(), 1);
        assert_eq!(datasets.institutions[0].allocated_social_workers, 2);
        // Fields the file omits fall back to defaults.
        assert_eq!(datasets.institutions[0].allocated_life_support, 0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), PARTICIPANTS_FILE, "{not json");

        let err = load_datasets(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("participants.json"));
    }
}

//! crates/study_os_core/src/syllabus.rs
//!
//! The fixed syllabus and subject catalogues, and the coverage summary derived
//! from a user's per-unit percentages.

use std::collections::BTreeMap;

/// A fixed top-level topic area tracked as a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyllabusUnit {
    pub id: &'static str,
    pub name: &'static str,
    pub weight: u32,
}

pub const SYLLABUS: [SyllabusUnit; 10] = [
    SyllabusUnit { id: "u1", name: "General Science", weight: 15 },
    SyllabusUnit { id: "u2", name: "Current Events", weight: 20 },
    SyllabusUnit { id: "u3", name: "Geography", weight: 10 },
    SyllabusUnit { id: "u4", name: "History & Culture", weight: 15 },
    SyllabusUnit { id: "u5", name: "Indian Polity", weight: 25 },
    SyllabusUnit { id: "u6", name: "Indian Economy", weight: 15 },
    SyllabusUnit { id: "u7", name: "National Movement", weight: 15 },
    SyllabusUnit { id: "u8", name: "Tamil Heritage", weight: 40 },
    SyllabusUnit { id: "u9", name: "TN Admin", weight: 30 },
    SyllabusUnit { id: "u10", name: "Aptitude & Mental Ability", weight: 25 },
];

/// Subjects offered by the check-in form. "Others" takes a free-form name.
pub const SUBJECTS: [&str; 10] = [
    "Indian Polity (Laxmikanth)",
    "History (NCERT + TN)",
    "Geography",
    "Economy",
    "Science & Environment",
    "Current Affairs",
    "Aptitude (Unit X)",
    "Tamil Society",
    "Unit 8/9 (TN Admin)",
    "Others",
];

pub fn unit(id: &str) -> Option<&'static SyllabusUnit> {
    SYLLABUS.iter().find(|unit| unit.id == id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitCoverage {
    pub unit: SyllabusUnit,
    pub percentage: u8,
}

/// Per-unit coverage plus two overall figures.
#[derive(Debug, Clone, PartialEq)]
pub struct SyllabusOverview {
    pub units: Vec<UnitCoverage>,
    /// Rounded mean of the unit percentages.
    pub overall: u8,
    /// Rounded mean weighted by each unit's exam weight.
    pub weighted: u8,
}

/// Summarizes coverage across the catalogue. Units absent from `progress`
/// count as 0%; ids outside the catalogue are ignored.
pub fn overview(progress: &BTreeMap<String, u8>) -> SyllabusOverview {
    let units: Vec<UnitCoverage> = SYLLABUS
        .iter()
        .map(|unit| UnitCoverage {
            unit: *unit,
            percentage: progress.get(unit.id).copied().unwrap_or(0),
        })
        .collect();

    let total: u32 = units.iter().map(|u| u32::from(u.percentage)).sum();
    let overall = (f64::from(total) / SYLLABUS.len() as f64).round() as u8;

    let total_weight: u32 = SYLLABUS.iter().map(|u| u.weight).sum();
    let weighted_sum: u32 = units
        .iter()
        .map(|u| u32::from(u.percentage) * u.unit.weight)
        .sum();
    let weighted = (f64::from(weighted_sum) / f64::from(total_weight)).round() as u8;

    SyllabusOverview {
        units,
        overall,
        weighted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_of_empty_progress_is_zero() {
        let summary = overview(&BTreeMap::new());
        assert_eq!(summary.units.len(), 10);
        assert_eq!(summary.overall, 0);
        assert_eq!(summary.weighted, 0);
    }

    #[test]
    fn test_overview_means() {
        let mut progress = BTreeMap::new();
        progress.insert("u5".to_string(), 100);
        progress.insert("u8".to_string(), 50);
        progress.insert("unknown".to_string(), 100);

        let summary = overview(&progress);
        // (100 + 50) / 10
        assert_eq!(summary.overall, 15);
        // (100 * 25 + 50 * 40) / 210 = 21.4
        assert_eq!(summary.weighted, 21);
    }

    #[test]
    fn test_unit_lookup() {
        assert_eq!(unit("u9").map(|u| u.name), Some("TN Admin"));
        assert!(unit("u11").is_none());
    }
}

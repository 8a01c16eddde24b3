use crate::core::catalog::{SubjectPool, pool_for};
use crate::core::grade::{Grade, grade_for_points, serialize_grade_or_dash};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const MIN_SUBJECTS_FOR_MEAN: usize = 7;

/// Fewest subjects a saved profile must list. Deliberately distinct from
/// `MIN_SUBJECTS_FOR_MEAN`: one gates computation, the other gates validation.
pub const MIN_SUBJECTS_FOR_VALIDATION: usize = 8;

pub const BEST_OTHER_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectGrade {
    pub subject: String,
    pub grade: Grade,
}

impl SubjectGrade {
    pub fn new(subject: impl Into<String>, grade: Grade) -> Self {
        Self {
            subject: subject.into(),
            grade,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeanGradeResult {
    #[serde(serialize_with = "serialize_grade_or_dash")]
    pub mean_grade: Option<Grade>,
    pub total_points: u32,
}

impl MeanGradeResult {
    pub fn unknown() -> Self {
        Self {
            mean_grade: None,
            total_points: 0,
        }
    }
}

pub fn calculate_mean_grade(subjects: &[SubjectGrade]) -> MeanGradeResult {
    if subjects.len() < MIN_SUBJECTS_FOR_MEAN {
        return MeanGradeResult::unknown();
    }

    let (Some(language), Some(mathematics)) = (
        best_in_pool(subjects, SubjectPool::Language),
        best_in_pool(subjects, SubjectPool::Mathematics),
    ) else {
        return MeanGradeResult::unknown();
    };

    let mut remaining: Vec<u32> = subjects
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != language && *idx != mathematics)
        .map(|(_, entry)| entry.grade.points())
        .collect();
    remaining.sort_unstable_by(|a, b| b.cmp(a));
    let best_others: u32 = remaining.iter().take(BEST_OTHER_COUNT).sum();

    let total_points =
        subjects[language].grade.points() + subjects[mathematics].grade.points() + best_others;
    debug!(
        language = %subjects[language].subject,
        mathematics = %subjects[mathematics].subject,
        best_others,
        total_points,
        "computed mean grade"
    );

    MeanGradeResult {
        mean_grade: Some(grade_for_points(total_points)),
        total_points,
    }
}

// First maximum wins on ties.
fn best_in_pool(subjects: &[SubjectGrade], pool: SubjectPool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, entry) in subjects.iter().enumerate() {
        if pool_for(&entry.subject) != pool {
            continue;
        }
        match best {
            Some(current) if subjects[current].grade.points() >= entry.grade.points() => {}
            _ => best = Some(idx),
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SubjectValidation {
    fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(error.into()),
        }
    }
}

// Only the first failing rule is reported: count, then language, then mathematics.
pub fn validate_subjects(subjects: &[SubjectGrade]) -> SubjectValidation {
    if subjects.len() < MIN_SUBJECTS_FOR_VALIDATION {
        return SubjectValidation::failed(format!(
            "at least {} subjects are required (found {})",
            MIN_SUBJECTS_FOR_VALIDATION,
            subjects.len()
        ));
    }

    let has_pool =
        |pool: SubjectPool| subjects.iter().any(|entry| pool_for(&entry.subject) == pool);

    if !has_pool(SubjectPool::Language) {
        return SubjectValidation::failed(
            "at least one language subject (English or Kiswahili) is required",
        );
    }

    if !has_pool(SubjectPool::Mathematics) {
        return SubjectValidation::failed(
            "at least one mathematics subject (Mathematics Alternative A or B) is required",
        );
    }

    SubjectValidation::ok()
}

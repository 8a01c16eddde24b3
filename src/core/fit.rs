use crate::core::grade::{Grade, serialize_grade_or_dash};
use crate::core::mean::SubjectGrade;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

pub const EXCEEDS_BONUS: u32 = 5;

pub const MEETS_SCORE: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRequirement {
    pub subject: String,
    pub minimum_grade: Grade,
    /// Substitute subjects. Carried for display; matching does not consult it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
}

impl SubjectRequirement {
    pub fn new(subject: impl Into<String>, minimum_grade: Grade) -> Self {
        Self {
            subject: subject.into(),
            minimum_grade,
            alternatives: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementStatus {
    Exceeds,
    Meets,
    Below,
}

impl RequirementStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exceeds => "exceeds",
            Self::Meets => "meets",
            Self::Below => "below",
        }
    }
}

impl fmt::Display for RequirementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectMatch {
    pub subject: String,
    #[serde(serialize_with = "serialize_grade_or_dash")]
    pub student_grade: Option<Grade>,
    pub required_grade: Grade,
    pub status: RequirementStatus,
    pub contribution: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseFit {
    pub qualifies: bool,
    pub strength_score: u32,
    pub matching_subjects: Vec<SubjectMatch>,
}

/// The strength score keeps accumulating across failed requirements, so a
/// course can carry a positive score and still not qualify.
pub fn score_course_fit(requirements: &[SubjectRequirement], grades: &[SubjectGrade]) -> CourseFit {
    let mut qualifies = true;
    let mut strength_score = 0;
    let mut matching_subjects = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        let entry = match find_matching_grade(requirement, grades) {
            Some(found) => compare(requirement, found.grade),
            None => SubjectMatch {
                subject: requirement.subject.clone(),
                student_grade: None,
                required_grade: requirement.minimum_grade,
                status: RequirementStatus::Below,
                contribution: 0,
            },
        };

        trace!(
            subject = %entry.subject,
            status = %entry.status,
            contribution = entry.contribution,
            "scored requirement"
        );
        if entry.status == RequirementStatus::Below {
            qualifies = false;
        }
        strength_score += entry.contribution;
        matching_subjects.push(entry);
    }

    CourseFit {
        qualifies,
        strength_score,
        matching_subjects,
    }
}

fn compare(requirement: &SubjectRequirement, student_grade: Grade) -> SubjectMatch {
    let student_points = student_grade.points();
    let required_points = requirement.minimum_grade.points();

    let (status, contribution) = if student_points > required_points {
        (
            RequirementStatus::Exceeds,
            student_points - required_points + EXCEEDS_BONUS,
        )
    } else if student_points == required_points {
        (RequirementStatus::Meets, MEETS_SCORE)
    } else {
        (RequirementStatus::Below, 0)
    };

    SubjectMatch {
        subject: requirement.subject.clone(),
        student_grade: Some(student_grade),
        required_grade: requirement.minimum_grade,
        status,
        contribution,
    }
}

/// Finds the first student grade whose subject loosely matches the
/// requirement, case-insensitively: either the requirement label contains
/// the student's subject, or the student's subject contains the first
/// `/`-separated token of the requirement label.
///
/// Only the first token is tried against the student's subject and
/// `alternatives` is ignored. Empty names never match.
pub fn find_matching_grade<'a>(
    requirement: &SubjectRequirement,
    grades: &'a [SubjectGrade],
) -> Option<&'a SubjectGrade> {
    let label = requirement.subject.to_lowercase();
    let first_token = label.split('/').next().unwrap_or_default();

    grades.iter().find(|entry| {
        let subject = entry.subject.to_lowercase();
        if subject.is_empty() {
            return false;
        }
        label.contains(&subject) || (!first_token.is_empty() && subject.contains(first_token))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grades(pairs: &[(&str, Grade)]) -> Vec<SubjectGrade> {
        pairs
            .iter()
            .map(|(subject, grade)| SubjectGrade::new(*subject, *grade))
            .collect()
    }

    #[test]
    fn missing_subject_disqualifies() {
        let student = grades(&[("Chemistry", Grade::A), ("English", Grade::A)]);
        let fit = score_course_fit(&[SubjectRequirement::new("Biology", Grade::B)], &student);

        assert!(!fit.qualifies);
        assert_eq!(fit.strength_score, 0);
        assert_eq!(fit.matching_subjects[0].status, RequirementStatus::Below);
        assert_eq!(fit.matching_subjects[0].student_grade, None);
        assert_eq!(fit.matching_subjects[0].contribution, 0);
    }

    #[test]
    fn mathematics_requirement_matches_alternative_a() {
        let student = grades(&[("Mathematics Alternative A", Grade::A)]);
        let fit = score_course_fit(&[SubjectRequirement::new("Mathematics", Grade::B)], &student);

        assert!(fit.qualifies);
        let entry = &fit.matching_subjects[0];
        assert_eq!(entry.status, RequirementStatus::Exceeds);
        assert_eq!(entry.student_grade, Some(Grade::A));
        assert_eq!(entry.contribution, (12 - 9) + 5);
        assert_eq!(fit.strength_score, 8);
    }

    #[test]
    fn exact_grade_meets_for_three() {
        let student = grades(&[("Chemistry", Grade::CPlus)]);
        let fit = score_course_fit(&[SubjectRequirement::new("Chemistry", Grade::CPlus)], &student);

        assert!(fit.qualifies);
        assert_eq!(fit.matching_subjects[0].status, RequirementStatus::Meets);
        assert_eq!(fit.strength_score, MEETS_SCORE);
    }

    #[test]
    fn below_keeps_partial_strength() {
        let student = grades(&[
            ("English", Grade::A),
            ("Biology", Grade::D),
            ("Chemistry", Grade::B),
        ]);
        let requirements = vec![
            SubjectRequirement::new("English", Grade::B),
            SubjectRequirement::new("Biology", Grade::C),
            SubjectRequirement::new("Chemistry", Grade::B),
        ];
        let fit = score_course_fit(&requirements, &student);

        assert!(!fit.qualifies);
        assert_eq!(fit.strength_score, (12 - 9 + 5) + 3);
        let statuses: Vec<RequirementStatus> =
            fit.matching_subjects.iter().map(|entry| entry.status).collect();
        assert_eq!(
            statuses,
            vec![
                RequirementStatus::Exceeds,
                RequirementStatus::Below,
                RequirementStatus::Meets
            ]
        );
    }

    #[test]
    fn breakdown_follows_requirement_order() {
        let student = grades(&[("Physics", Grade::B), ("English", Grade::B)]);
        let requirements = vec![
            SubjectRequirement::new("English", Grade::C),
            SubjectRequirement::new("Geography", Grade::C),
            SubjectRequirement::new("Physics", Grade::C),
        ];
        let fit = score_course_fit(&requirements, &student);
        let subjects: Vec<&str> = fit
            .matching_subjects
            .iter()
            .map(|entry| entry.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["English", "Geography", "Physics"]);
    }

    #[test]
    fn no_requirements_qualifies_with_zero_strength() {
        let fit = score_course_fit(&[], &grades(&[("English", Grade::A)]));
        assert!(fit.qualifies);
        assert_eq!(fit.strength_score, 0);
        assert!(fit.matching_subjects.is_empty());
    }

    #[test]
    fn combined_label_matches_on_either_clause() {
        let requirement = SubjectRequirement::new("Mathematics/Physics", Grade::C);

        let maths = grades(&[("Mathematics Alternative B", Grade::B)]);
        let found = find_matching_grade(&requirement, &maths).map(|entry| entry.subject.as_str());
        assert_eq!(found, Some("Mathematics Alternative B"));

        // The whole label contains the student's subject name.
        let physics = grades(&[("Physics", Grade::B)]);
        let found = find_matching_grade(&requirement, &physics).map(|entry| entry.subject.as_str());
        assert_eq!(found, Some("Physics"));
    }

    #[test]
    fn known_limitation_second_token_not_tried_for_longer_names() {
        // "Mathematics Alternative A" is not contained in the label and does
        // not contain "physics", so the second slot never matches it.
        let requirement = SubjectRequirement::new("Physics/Mathematics", Grade::C);
        let student = grades(&[("Mathematics Alternative A", Grade::A)]);
        assert!(find_matching_grade(&requirement, &student).is_none());
    }

    #[test]
    fn known_limitation_alternatives_are_ignored() {
        let requirement = SubjectRequirement {
            alternatives: vec!["Computer Studies".to_string()],
            ..SubjectRequirement::new("Physics", Grade::C)
        };
        let student = grades(&[("Computer Studies", Grade::A)]);
        let fit = score_course_fit(&[requirement], &student);
        assert!(!fit.qualifies);
        assert_eq!(fit.matching_subjects[0].student_grade, None);
    }

    #[test]
    fn first_matching_grade_wins() {
        let requirement = SubjectRequirement::new("Mathematics", Grade::C);
        let student = grades(&[
            ("Mathematics Alternative B", Grade::D),
            ("Mathematics Alternative A", Grade::A),
        ]);
        let fit = score_course_fit(&[requirement], &student);
        assert_eq!(fit.matching_subjects[0].student_grade, Some(Grade::D));
        assert!(!fit.qualifies);
    }

    #[test]
    fn matching_ignores_case_and_empty_names() {
        let requirement = SubjectRequirement::new("BIOLOGY", Grade::C);
        let student = grades(&[("", Grade::A), ("biology", Grade::C)]);
        let found = find_matching_grade(&requirement, &student).map(|entry| entry.subject.as_str());
        assert_eq!(found, Some("biology"));

        let empty = SubjectRequirement::new("", Grade::C);
        assert!(find_matching_grade(&empty, &student).is_none());
    }

    #[test]
    fn missing_grade_serializes_as_dash() {
        let fit = score_course_fit(&[SubjectRequirement::new("Biology", Grade::B)], &[]);
        let json = serde_json::to_value(&fit).unwrap();
        assert_eq!(json["matching_subjects"][0]["student_grade"], "-");
        assert_eq!(json["matching_subjects"][0]["required_grade"], "B");
        assert_eq!(json["matching_subjects"][0]["status"], "below");
        assert_eq!(json["qualifies"], false);
    }
}

pub mod browse;
pub mod catalog;
pub mod fit;
pub mod grade;
pub mod mean;
pub mod report;
pub mod shortlist;

use crate::config::Config;
use crate::core::browse::browse_fit;
use crate::core::fit::{SubjectRequirement, score_course_fit};
use crate::core::mean::{
    SubjectGrade, SubjectValidation, calculate_mean_grade, validate_subjects,
};
use crate::core::report::{
    BrowseReport, Notice, ProfileReport, Severity, ShortlistReport, evaluate_exit,
};
use crate::core::shortlist::{
    CourseLabel, ScoredCourse, partition_by_qualification, rank_by_strength,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub grades: Vec<SubjectGrade>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_points: Option<f64>,
    #[serde(default)]
    pub requirements: Vec<SubjectRequirement>,
}

impl Course {
    pub fn label(&self) -> CourseLabel {
        CourseLabel {
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseList {
    #[serde(default)]
    pub courses: Vec<Course>,
}

/// A profile prepared for scoring: duplicate subjects dropped, hygiene
/// notices collected.
pub struct ProfileContext {
    pub student: Option<String>,
    pub grades: Vec<SubjectGrade>,
    pub notices: Vec<Notice>,
}

impl ProfileContext {
    pub fn build(profile: &StudentProfile, cfg: &Config) -> Self {
        let mut notices = Vec::new();
        let mut seen = HashSet::new();
        let mut grades = Vec::with_capacity(profile.grades.len());

        for entry in &profile.grades {
            if !seen.insert(entry.subject.clone()) {
                notices.push(
                    Notice::new(
                        Severity::Warning,
                        format!("duplicate subject {}", entry.subject),
                        "list each subject once; only the first entry is used",
                    )
                    .with_subject(entry.subject.clone()),
                );
                continue;
            }

            if cfg.notices.unrecognized_subjects && !catalog::is_recognized(&entry.subject) {
                notices.push(
                    Notice::new(
                        Severity::Info,
                        format!("unrecognized subject {}", entry.subject),
                        "use the KCSE subject name (see `kcsefit catalog`) so requirements can match it",
                    )
                    .with_subject(entry.subject.clone()),
                );
            }
            grades.push(entry.clone());
        }

        if grades.len() != profile.grades.len() {
            warn!(
                dropped = profile.grades.len() - grades.len(),
                "dropped duplicate subject entries"
            );
        }

        Self {
            student: profile.name.clone(),
            grades,
            notices,
        }
    }

    fn validate(&mut self) -> SubjectValidation {
        let validation = validate_subjects(&self.grades);
        if let Some(error) = &validation.error {
            self.notices.push(Notice::new(
                Severity::Warning,
                "profile is invalid",
                error.clone(),
            ));
        }
        validation
    }
}

pub fn evaluate_profile(profile: &StudentProfile, cfg: &Config) -> ProfileReport {
    let mut ctx = ProfileContext::build(profile, cfg);
    let mean = calculate_mean_grade(&ctx.grades);
    let validation = ctx.validate();
    let exit = evaluate_exit(cfg, &validation, None);

    ProfileReport {
        student: ctx.student,
        mean,
        validation,
        notices: ctx.notices,
        exit,
    }
}

/// Scores every course's subject requirements and ranks by strength.
pub fn evaluate_shortlist(
    profile: &StudentProfile,
    courses: &[Course],
    cfg: &Config,
    group: bool,
) -> ShortlistReport {
    let mut ctx = ProfileContext::build(profile, cfg);
    let mean = calculate_mean_grade(&ctx.grades);
    let validation = ctx.validate();

    let mut scored: Vec<ScoredCourse<_>> = courses
        .iter()
        .map(|course| ScoredCourse {
            course: course.label(),
            fit: score_course_fit(&course.requirements, &ctx.grades),
        })
        .collect();
    rank_by_strength(&mut scored);

    let any_qualified =
        (!scored.is_empty()).then(|| scored.iter().any(|entry| entry.fit.qualifies));
    debug!(courses = scored.len(), ?any_qualified, "scored shortlist");
    let exit = evaluate_exit(cfg, &validation, any_qualified);
    let groups = group.then(|| partition_by_qualification(scored.clone()));

    ShortlistReport {
        student: ctx.student,
        mean,
        validation,
        courses: scored,
        groups,
        notices: ctx.notices,
        exit,
    }
}

/// Coarse aggregate-points fit for each course carrying a cluster-point
/// threshold. `points_override` replaces the computed total.
pub fn evaluate_browse(
    profile: &StudentProfile,
    courses: &[Course],
    cfg: &Config,
    points_override: Option<f64>,
) -> BrowseReport {
    let mut ctx = ProfileContext::build(profile, cfg);
    let mean = calculate_mean_grade(&ctx.grades);
    let validation = ctx.validate();
    let mut notices = ctx.notices;

    let student_points = match points_override {
        Some(points) => points,
        None => {
            if mean.mean_grade.is_none() {
                notices.push(Notice::new(
                    Severity::Warning,
                    "mean grade unavailable; aggregate points treated as 0",
                    "add at least 7 subjects including a language and a mathematics, or pass --points",
                ));
            }
            f64::from(mean.total_points)
        }
    };

    let mut scored = Vec::new();
    let mut skipped = Vec::new();
    for course in courses {
        match course.cluster_points {
            Some(cluster_points) => scored.push(ScoredCourse {
                course: course.label(),
                fit: browse_fit(student_points, cluster_points),
            }),
            None => skipped.push(course.label()),
        }
    }
    rank_by_strength(&mut scored);

    let any_qualified =
        (!scored.is_empty()).then(|| scored.iter().any(|entry| entry.fit.qualified));
    let exit = evaluate_exit(cfg, &validation, any_qualified);

    BrowseReport {
        student: ctx.student,
        student_points,
        mean,
        courses: scored,
        skipped,
        notices,
        exit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailOn;
    use crate::core::grade::Grade;

    fn profile() -> StudentProfile {
        let grades = [
            ("English", Grade::BPlus),
            ("Kiswahili", Grade::C),
            ("Mathematics Alternative A", Grade::AMinus),
            ("Biology", Grade::A),
            ("Chemistry", Grade::B),
            ("Physics", Grade::BMinus),
            ("Geography", Grade::CPlus),
            ("History and Government", Grade::B),
        ]
        .into_iter()
        .map(|(subject, grade)| SubjectGrade::new(subject, grade))
        .collect();

        StudentProfile {
            name: Some("Otieno".to_string()),
            grades,
        }
    }

    fn course(name: &str, cluster_points: Option<f64>, requirements: &[(&str, Grade)]) -> Course {
        Course {
            code: None,
            name: name.to_string(),
            cluster_points,
            requirements: requirements
                .iter()
                .map(|(subject, grade)| SubjectRequirement::new(*subject, *grade))
                .collect(),
        }
    }

    #[test]
    fn profile_report_has_mean_and_no_notices() {
        let report = evaluate_profile(&profile(), &Config::default());
        assert_eq!(report.mean.total_points, 66);
        assert_eq!(report.mean.mean_grade, Some(Grade::CPlus));
        assert!(report.validation.is_valid);
        assert!(report.notices.is_empty());
        assert!(report.exit.ok);
    }

    #[test]
    fn duplicates_are_dropped_and_flagged() {
        let mut student = profile();
        student.grades.push(SubjectGrade::new("Biology", Grade::E));
        student.grades.push(SubjectGrade::new("Astrology", Grade::A));

        let ctx = ProfileContext::build(&student, &Config::default());
        assert_eq!(ctx.grades.len(), 9);
        assert_eq!(ctx.notices.len(), 2);
        assert_eq!(ctx.notices[0].severity, Severity::Warning);
        assert_eq!(ctx.notices[1].severity, Severity::Info);

        let mut cfg = Config::default();
        cfg.notices.unrecognized_subjects = false;
        let ctx = ProfileContext::build(&student, &cfg);
        assert_eq!(ctx.notices.len(), 1);
    }

    #[test]
    fn shortlist_ranks_and_groups() {
        let courses = vec![
            course("Nursing", None, &[("Biology", Grade::B), ("Chemistry", Grade::B)]),
            course("Medicine", None, &[("Biology", Grade::A), ("Physics", Grade::B)]),
            course(
                "Engineering",
                None,
                &[("Mathematics/Physics", Grade::B), ("Physics", Grade::BMinus)],
            ),
        ];
        let report = evaluate_shortlist(&profile(), &courses, &Config::default(), true);

        // Nursing: 12-9+5 + 3 = 11, qualifies.
        // Medicine: 3 + 0 = 3, Physics B- below B.
        // Engineering: 11-9+5 + 3 = 10, qualifies.
        let ranked: Vec<(&str, u32)> = report
            .courses
            .iter()
            .map(|entry| (entry.course.name.as_str(), entry.fit.strength_score))
            .collect();
        assert_eq!(
            ranked,
            vec![("Nursing", 11), ("Engineering", 10), ("Medicine", 3)]
        );

        let groups = report.groups.as_ref().unwrap();
        assert_eq!(groups.qualified.len(), 2);
        assert_eq!(groups.needs_review[0].course.name, "Medicine");
        assert!(report.exit.ok);
    }

    #[test]
    fn shortlist_fails_when_configured_and_nothing_qualifies() {
        let mut cfg = Config::default();
        cfg.general.fail_on = FailOn::Unqualified;
        let courses = vec![course("Pharmacy", None, &[("Chemistry", Grade::A)])];
        let report = evaluate_shortlist(&profile(), &courses, &cfg, false);
        assert!(report.groups.is_none());
        assert!(!report.exit.ok);
    }

    #[test]
    fn browse_uses_total_points_and_skips_courses_without_threshold() {
        let courses = vec![
            course("Arts", Some(40.0), &[]),
            course("Law", Some(70.0), &[]),
            course("Unlisted", None, &[]),
            course("Commerce", Some(60.0), &[]),
        ];
        let report = evaluate_browse(&profile(), &courses, &Config::default(), None);
        assert_eq!(report.student_points, 66.0);

        let ranked: Vec<(&str, u8)> = report
            .courses
            .iter()
            .map(|entry| (entry.course.name.as_str(), entry.fit.fit_percent))
            .collect();
        assert_eq!(ranked, vec![("Arts", 95), ("Commerce", 85), ("Law", 30)]);
        assert_eq!(report.skipped.len(), 1);
        assert!(report.notices.is_empty());
    }

    #[test]
    fn browse_without_mean_warns() {
        let student = StudentProfile {
            name: None,
            grades: vec![SubjectGrade::new("English", Grade::A)],
        };
        let courses = vec![course("Arts", Some(20.0), &[])];
        let report = evaluate_browse(&student, &courses, &Config::default(), None);
        assert_eq!(report.student_points, 0.0);
        assert!(!report.courses[0].fit.qualified);
        assert!(
            report
                .notices
                .iter()
                .any(|notice| notice.title.contains("mean grade unavailable"))
        );

        let report = evaluate_browse(&student, &courses, &Config::default(), Some(25.0));
        assert!(report.courses[0].fit.qualified);
        let titles: Vec<&str> = report.notices.iter().map(|notice| notice.title.as_str()).collect();
        assert_eq!(titles, vec!["profile is invalid"]);
    }

    #[test]
    fn invalid_profile_is_reported_as_warning_notice() {
        let student = StudentProfile {
            name: None,
            grades: vec![SubjectGrade::new("English", Grade::A)],
        };

        let report = evaluate_profile(&student, &Config::default());
        assert!(!report.validation.is_valid);
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].severity, Severity::Warning);
        assert_eq!(report.notices[0].title, "profile is invalid");
        assert!(report.notices[0].hint.contains("at least 8 subjects"));

        let report = evaluate_shortlist(&student, &[], &Config::default(), false);
        assert!(report.notices.iter().any(|notice| notice.title == "profile is invalid"));
    }

    #[test]
    fn unqualified_gate_passes_when_nothing_was_scored() {
        let mut cfg = Config::default();
        cfg.general.fail_on = FailOn::Unqualified;

        let report = evaluate_shortlist(&profile(), &[], &cfg, true);
        assert!(report.courses.is_empty());
        assert!(report.exit.ok);

        let courses = vec![course("Unlisted", None, &[])];
        let report = evaluate_browse(&profile(), &courses, &cfg, None);
        assert!(report.courses.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert!(report.exit.ok);
    }
}

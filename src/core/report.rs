use crate::config::{Config, FailOn};
use crate::core::browse::BrowseFit;
use crate::core::catalog::KCSE_SUBJECTS;
use crate::core::fit::{CourseFit, RequirementStatus};
use crate::core::grade::{GRADE_SCALE, MEAN_GRADE_BANDS, label_or_dash};
use crate::core::mean::{MeanGradeResult, SubjectValidation};
use crate::core::shortlist::{CourseLabel, Groups, ScoredCourse};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }

    fn colored(self) -> String {
        match self {
            Self::Warning => self.as_str().yellow().bold().to_string(),
            Self::Info => self.as_str().blue().bold().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub hint: String,
}

impl Notice {
    pub fn new(severity: Severity, title: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            subject: None,
            hint: hint.into(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ExitStatus {
    pub ok: bool,
    pub reasons: Vec<String>,
}

impl ExitStatus {
    pub fn reason_line(&self) -> String {
        self.reasons.join("; ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    pub mean: MeanGradeResult,
    pub validation: SubjectValidation,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    pub exit: ExitStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    pub mean: MeanGradeResult,
    pub validation: SubjectValidation,
    pub courses: Vec<ScoredCourse<CourseFit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Groups<ScoredCourse<CourseFit>>>,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    pub exit: ExitStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowseReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    pub student_points: f64,
    pub mean: MeanGradeResult,
    pub courses: Vec<ScoredCourse<BrowseFit>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<CourseLabel>,
    pub notices: Vec<Notice>,
    #[serde(skip)]
    pub exit: ExitStatus,
}

/// `any_qualified` is `None` when no course was scored, which never fails
/// the `unqualified` gate.
pub fn evaluate_exit(
    cfg: &Config,
    validation: &SubjectValidation,
    any_qualified: Option<bool>,
) -> ExitStatus {
    let mut reasons = Vec::new();

    match cfg.general.fail_on {
        FailOn::None => {}
        FailOn::Invalid => {
            if let Some(error) = &validation.error {
                reasons.push(format!(
                    "profile is invalid: {} (fail_on = {})",
                    error, cfg.general.fail_on
                ));
            }
        }
        FailOn::Unqualified => {
            if any_qualified == Some(false) {
                reasons.push(format!(
                    "no course qualifies (fail_on = {})",
                    cfg.general.fail_on
                ));
            }
        }
    }

    ExitStatus {
        ok: reasons.is_empty(),
        reasons,
    }
}

fn print_header(student: Option<&str>, mean: &MeanGradeResult) {
    let who = student.unwrap_or("student");
    println!(
        "{}: mean grade {} ({} points)",
        who,
        label_or_dash(mean.mean_grade).bold(),
        mean.total_points
    );
}

fn print_validation(validation: &SubjectValidation) {
    match &validation.error {
        None => println!("profile: {}", "valid".green().bold()),
        Some(error) => println!("profile: {} ({})", "invalid".red().bold(), error),
    }
}

fn print_notices(notices: &[Notice]) {
    for severity in [Severity::Warning, Severity::Info] {
        let grouped: Vec<&Notice> = notices
            .iter()
            .filter(|notice| notice.severity == severity)
            .collect();

        if grouped.is_empty() {
            continue;
        }

        println!();
        println!("{} ({})", severity.colored(), grouped.len());
        for notice in grouped {
            println!("[{}] {}", notice.severity.as_str(), notice.title);
            println!("-> hint: {}", notice.hint);
        }
    }
}

fn print_exit(exit: &ExitStatus) {
    println!();
    if exit.ok {
        println!("exit: OK");
    } else {
        println!("exit: FAILED ({})", exit.reason_line());
    }
}

pub fn print_profile(report: &ProfileReport) {
    print_header(report.student.as_deref(), &report.mean);
    print_validation(&report.validation);
    print_notices(&report.notices);
    print_exit(&report.exit);
}

fn status_colored(status: RequirementStatus) -> String {
    match status {
        RequirementStatus::Exceeds => status.as_str().green().to_string(),
        RequirementStatus::Meets => status.as_str().cyan().to_string(),
        RequirementStatus::Below => status.as_str().red().to_string(),
    }
}

fn print_course_fit(entry: &ScoredCourse<CourseFit>) {
    let verdict = if entry.fit.qualifies {
        "QUALIFIES".green().bold()
    } else {
        "BELOW".red().bold()
    };
    println!(
        "{} {} (strength {})",
        verdict,
        entry.course.display(),
        entry.fit.strength_score
    );

    for subject in &entry.fit.matching_subjects {
        println!(
            "  {:<28} {:>2} / {:<2} {} (+{})",
            subject.subject,
            label_or_dash(subject.student_grade),
            subject.required_grade,
            status_colored(subject.status),
            subject.contribution
        );
    }
}

pub fn print_shortlist(report: &ShortlistReport) {
    print_header(report.student.as_deref(), &report.mean);
    print_validation(&report.validation);

    match &report.groups {
        Some(groups) => {
            for (title, entries) in [
                ("Qualified", &groups.qualified),
                ("Needs review", &groups.needs_review),
            ] {
                println!();
                println!("{} ({})", title.bold(), entries.len());
                for entry in entries {
                    print_course_fit(entry);
                }
            }
        }
        None => {
            println!();
            if report.courses.is_empty() {
                println!("no courses to score");
            }
            for entry in &report.courses {
                print_course_fit(entry);
            }
        }
    }

    print_notices(&report.notices);
    print_exit(&report.exit);
}

pub fn print_browse(report: &BrowseReport) {
    print_header(report.student.as_deref(), &report.mean);
    println!("aggregate points used: {}", report.student_points);
    println!();

    for entry in &report.courses {
        let percent = format!("{:>3}%", entry.fit.fit_percent);
        let percent = if entry.fit.qualified {
            percent.green().bold()
        } else {
            percent.red().bold()
        };
        println!(
            "{} {} (margin {:+.1})",
            percent,
            entry.course.display(),
            entry.fit.margin
        );
    }

    if !report.skipped.is_empty() {
        println!();
        println!("skipped (no cluster points):");
        for course in &report.skipped {
            println!("  {}", course.display());
        }
    }

    print_notices(&report.notices);
    print_exit(&report.exit);
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogReport {
    pub grades: Vec<(String, u32)>,
    pub mean_grade_bands: Vec<(u32, u32, String)>,
    pub subjects: Vec<&'static str>,
}

impl CatalogReport {
    pub fn build() -> Self {
        Self {
            grades: GRADE_SCALE
                .iter()
                .map(|grade| (grade.to_string(), grade.points()))
                .collect(),
            mean_grade_bands: MEAN_GRADE_BANDS
                .iter()
                .map(|(low, high, grade)| (*low, *high, grade.to_string()))
                .collect(),
            subjects: KCSE_SUBJECTS.to_vec(),
        }
    }
}

pub fn print_catalog(report: &CatalogReport) {
    println!("{}", "Grade points".bold());
    for (grade, points) in &report.grades {
        println!("  {:<2} {:>2}", grade, points);
    }

    println!();
    println!("{}", "Mean grade bands".bold());
    for (low, high, grade) in &report.mean_grade_bands {
        println!("  {:>2}-{:<2} {}", low, high, grade);
    }

    println!();
    println!("{}", "Subjects".bold());
    for subject in &report.subjects {
        println!("  {}", subject);
    }
}

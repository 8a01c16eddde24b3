use crate::core::grade::Grade;
use crate::core::mean::SubjectGrade;
use crate::core::{Course, CourseList, StudentProfile};
use anyhow::{Context, Result, anyhow, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

static SHEET_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<subject>[^:=]+?)\s*[:=]\s*(?P<grade>\S+)$").expect("valid grade sheet regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Toml,
    Json,
    GradeSheet,
}

fn detect_format(path: &Path) -> InputFormat {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("toml") => InputFormat::Toml,
        Some("json") => InputFormat::Json,
        _ => InputFormat::GradeSheet,
    }
}

/// Loads a student profile from TOML, JSON, or a `Subject: Grade` sheet.
pub fn load_profile(path: &Path) -> Result<StudentProfile> {
    let content = read(path)?;
    let profile = match detect_format(path) {
        InputFormat::Toml | InputFormat::Json => {
            parse_structured::<StudentProfile>(path, &content)?
        }
        InputFormat::GradeSheet => StudentProfile {
            name: None,
            grades: parse_grade_sheet(&content)
                .with_context(|| format!("failed parsing grade sheet {}", path.display()))?,
        },
    };

    info!(
        path = %path.display(),
        subjects = profile.grades.len(),
        "loaded student profile"
    );
    Ok(profile)
}

pub fn load_courses(path: &Path) -> Result<Vec<Course>> {
    if detect_format(path) == InputFormat::GradeSheet {
        bail!(
            "course list {} must be a .toml or .json file",
            path.display()
        );
    }

    let content = read(path)?;
    let list = parse_structured::<CourseList>(path, &content)?;
    info!(path = %path.display(), courses = list.courses.len(), "loaded course list");
    Ok(list.courses)
}

fn read(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading input");
    fs::read_to_string(path).with_context(|| format!("failed reading {}", path.display()))
}

fn parse_structured<T: DeserializeOwned>(path: &Path, content: &str) -> Result<T> {
    match detect_format(path) {
        InputFormat::Json => serde_json::from_str(content)
            .with_context(|| format!("failed parsing {}", path.display())),
        _ => toml::from_str(content).with_context(|| format!("failed parsing {}", path.display())),
    }
}

/// Parses a result-slip style listing, one `Subject: Grade` (or
/// `Subject = Grade`) per line. Blank lines and `#` comments are skipped.
pub fn parse_grade_sheet(content: &str) -> Result<Vec<SubjectGrade>> {
    let mut grades = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let captures = SHEET_LINE_RE
            .captures(line)
            .ok_or_else(|| anyhow!("line {}: expected `Subject: Grade`, got {:?}", line_no, line))?;
        let grade = captures["grade"]
            .parse::<Grade>()
            .with_context(|| format!("line {}", line_no))?;

        grades.push(SubjectGrade::new(captures["subject"].trim(), grade));
    }

    Ok(grades)
}

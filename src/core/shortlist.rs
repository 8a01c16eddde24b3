use crate::core::browse::BrowseFit;
use crate::core::fit::CourseFit;
use serde::Serialize;

/// What both fit scorers expose to ranking and grouping.
pub trait FitVerdict {
    fn qualifies(&self) -> bool;
    fn rank_score(&self) -> u32;
}

impl FitVerdict for CourseFit {
    fn qualifies(&self) -> bool {
        self.qualifies
    }

    fn rank_score(&self) -> u32 {
        self.strength_score
    }
}

impl FitVerdict for BrowseFit {
    fn qualifies(&self) -> bool {
        self.qualified
    }

    fn rank_score(&self) -> u32 {
        u32::from(self.fit_percent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseLabel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
}

impl CourseLabel {
    pub fn display(&self) -> String {
        match &self.code {
            Some(code) => format!("{} {}", code, self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredCourse<V> {
    pub course: CourseLabel,
    #[serde(flatten)]
    pub fit: V,
}

impl<V: FitVerdict> FitVerdict for ScoredCourse<V> {
    fn qualifies(&self) -> bool {
        self.fit.qualifies()
    }

    fn rank_score(&self) -> u32 {
        self.fit.rank_score()
    }
}

/// Orders by descending rank score. Equal scores keep their input order.
pub fn rank_by_strength<T: FitVerdict>(entries: &mut [T]) {
    entries.sort_by(|a, b| b.rank_score().cmp(&a.rank_score()));
}

#[derive(Debug, Clone, Serialize)]
pub struct Groups<T> {
    pub qualified: Vec<T>,
    pub needs_review: Vec<T>,
}

/// Splits on the qualification verdict, keeping order within each group.
pub fn partition_by_qualification<T: FitVerdict>(entries: Vec<T>) -> Groups<T> {
    let (qualified, needs_review) = entries.into_iter().partition(|entry| entry.qualifies());
    Groups {
        qualified,
        needs_review,
    }
}

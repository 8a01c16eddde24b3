use once_cell::sync::Lazy;
use std::collections::HashSet;

pub const LANGUAGE_SUBJECTS: [&str; 2] = ["English", "Kiswahili"];

pub const MATHEMATICS_SUBJECTS: [&str; 2] =
    ["Mathematics Alternative A", "Mathematics Alternative B"];

/// Subjects examined at KCSE, in catalog order.
pub const KCSE_SUBJECTS: [&str; 31] = [
    "English",
    "Kiswahili",
    "Mathematics Alternative A",
    "Mathematics Alternative B",
    "Biology",
    "Chemistry",
    "Physics",
    "General Science",
    "Biology for the Blind",
    "History and Government",
    "Geography",
    "Christian Religious Education",
    "Islamic Religious Education",
    "Hindu Religious Education",
    "Home Science",
    "Art and Design",
    "Agriculture",
    "Woodwork",
    "Metalwork",
    "Building Construction",
    "Power Mechanics",
    "Electricity",
    "Drawing and Design",
    "Aviation Technology",
    "Computer Studies",
    "French",
    "German",
    "Arabic",
    "Kenyan Sign Language",
    "Music",
    "Business Studies",
];

static RECOGNIZED: Lazy<HashSet<&'static str>> = Lazy::new(|| KCSE_SUBJECTS.into_iter().collect());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectPool {
    Language,
    Mathematics,
    Other,
}

pub fn pool_for(subject: &str) -> SubjectPool {
    if LANGUAGE_SUBJECTS.contains(&subject) {
        SubjectPool::Language
    } else if MATHEMATICS_SUBJECTS.contains(&subject) {
        SubjectPool::Mathematics
    } else {
        SubjectPool::Other
    }
}

pub fn is_recognized(subject: &str) -> bool {
    RECOGNIZED.contains(subject)
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// KCSE letter grades, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Grade {
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    E,
}

/// The full scale, highest to lowest.
pub const GRADE_SCALE: [Grade; 12] = [
    Grade::A,
    Grade::AMinus,
    Grade::BPlus,
    Grade::B,
    Grade::BMinus,
    Grade::CPlus,
    Grade::C,
    Grade::CMinus,
    Grade::DPlus,
    Grade::D,
    Grade::DMinus,
    Grade::E,
];

/// Mean-grade bands over total points, highest first. Bands are inclusive,
/// non-overlapping and cover `0..=84`.
pub const MEAN_GRADE_BANDS: [(u32, u32, Grade); 12] = [
    (84, 84, Grade::A),
    (80, 83, Grade::AMinus),
    (76, 79, Grade::BPlus),
    (72, 75, Grade::B),
    (68, 71, Grade::BMinus),
    (64, 67, Grade::CPlus),
    (60, 63, Grade::C),
    (56, 59, Grade::CMinus),
    (52, 55, Grade::DPlus),
    (48, 51, Grade::D),
    (44, 47, Grade::DMinus),
    (0, 43, Grade::E),
];

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::E => "E",
        }
    }

    /// Point value used by both the mean-grade calculator and the fit scorer.
    pub fn points(self) -> u32 {
        match self {
            Self::A => 12,
            Self::AMinus => 11,
            Self::BPlus => 10,
            Self::B => 9,
            Self::BMinus => 8,
            Self::CPlus => 7,
            Self::C => 6,
            Self::CMinus => 5,
            Self::DPlus => 4,
            Self::D => 3,
            Self::DMinus => 2,
            Self::E => 1,
        }
    }
}

/// Maps a total point score to its mean grade. Totals above the table
/// (impossible for valid input) fall back to `E`.
pub fn grade_for_points(total: u32) -> Grade {
    MEAN_GRADE_BANDS
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&total))
        .map(|(_, _, grade)| *grade)
        .unwrap_or(Grade::E)
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGrade(pub String);

impl fmt::Display for UnknownGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown grade {:?} (expected one of A, A-, B+, B, B-, C+, C, C-, D+, D, D-, E)",
            self.0
        )
    }
}

impl std::error::Error for UnknownGrade {}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        GRADE_SCALE
            .iter()
            .copied()
            .find(|grade| grade.as_str() == normalized)
            .ok_or_else(|| UnknownGrade(s.to_string()))
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Grade {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Serializes an optional grade, writing `"-"` when absent.
pub fn serialize_grade_or_dash<S: Serializer>(
    grade: &Option<Grade>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match grade {
        Some(grade) => serializer.serialize_str(grade.as_str()),
        None => serializer.serialize_str("-"),
    }
}

pub fn label_or_dash(grade: Option<Grade>) -> &'static str {
    grade.map(Grade::as_str).unwrap_or("-")
}

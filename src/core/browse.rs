use serde::Serialize;

/// Qualifies on a single cluster-point threshold, not per-subject minimums.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrowseFit {
    pub fit_percent: u8,
    pub qualified: bool,
    pub margin: f64,
}

// (minimum margin, fit percent), checked top-down.
pub const FIT_STEPS: [(f64, u8); 4] = [(10.0, 95), (5.0, 85), (0.0, 75), (-3.0, 55)];

pub const FLOOR_FIT_PERCENT: u8 = 30;

pub fn browse_fit(student_points: f64, cluster_points: f64) -> BrowseFit {
    let margin = student_points - cluster_points;
    let fit_percent = FIT_STEPS
        .iter()
        .find(|(min_margin, _)| margin >= *min_margin)
        .map(|(_, percent)| *percent)
        .unwrap_or(FLOOR_FIT_PERCENT);

    BrowseFit {
        fit_percent,
        qualified: student_points >= cluster_points,
        margin,
    }
}

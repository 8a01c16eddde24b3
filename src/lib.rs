//! KCSE grade eligibility and course fit scoring.
//!
//! [`core::mean::calculate_mean_grade`] reduces a student's subject grades to
//! a mean grade and total points. [`core::fit::score_course_fit`] checks those
//! grades against a course's subject requirements, and
//! [`core::browse::browse_fit`] gives a coarse fit from aggregate points alone.

pub mod config;
pub mod core;
pub mod utils;

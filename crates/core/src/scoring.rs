//! Scoring module - line clear points, drop points, level and gravity curve
//!
//! Classic rules: clearing n lines awards `LINE_SCORES[n] * level`, soft drop
//! awards one point per row and hard drop two points per row. Level starts at
//! 1 and goes up every 10 lines; gravity speeds up linearly until it hits a floor.

use serde::{Deserialize, Serialize};

use crate::types::{
    BASE_GRAVITY_MS, GRAVITY_FLOOR_MS, GRAVITY_STEP_MS, HARD_DROP_POINTS, LINES_PER_LEVEL,
    LINE_SCORES, SOFT_DROP_POINTS,
};

/// Calculate line clear score
/// lines: number of lines cleared (1-4)
/// level: current level (1-based)
pub fn line_clear_score(lines: usize, level: u32) -> u32 {
    if lines == 0 || lines >= LINE_SCORES.len() {
        return 0;
    }
    LINE_SCORES[lines].saturating_mul(level)
}

/// Calculate drop score
/// soft drop: +1 per row
/// hard drop: +2 per row
pub fn drop_score(rows: u32, is_hard_drop: bool) -> u32 {
    if is_hard_drop {
        rows * HARD_DROP_POINTS
    } else {
        rows * SOFT_DROP_POINTS
    }
}

/// Level for a cumulative line count: `lines / 10 + 1`
pub fn level_for_lines(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Gravity timing curve
///
/// `period(level) = max(floor, base - (level - 1) * step)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityCurve {
    pub base_ms: u32,
    pub step_ms: u32,
    pub floor_ms: u32,
}

impl Default for GravityCurve {
    fn default() -> Self {
        Self {
            base_ms: BASE_GRAVITY_MS,
            step_ms: GRAVITY_STEP_MS,
            floor_ms: GRAVITY_FLOOR_MS,
        }
    }
}

impl GravityCurve {
    /// Gravity period in milliseconds for a level, clamped at the floor
    pub fn interval_ms(&self, level: u32) -> u32 {
        let reduction = level.saturating_sub(1).saturating_mul(self.step_ms);
        self.base_ms
            .saturating_sub(reduction)
            .max(self.floor_ms)
            .max(1)
    }
}

/// Gravity period for a level using the default curve
pub fn gravity_interval_ms(level: u32) -> u32 {
    GravityCurve::default().interval_ms(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_clear_score_table() {
        assert_eq!(line_clear_score(0, 1), 0);
        assert_eq!(line_clear_score(1, 1), 100);
        assert_eq!(line_clear_score(2, 1), 300);
        assert_eq!(line_clear_score(3, 1), 500);
        assert_eq!(line_clear_score(4, 1), 800);
        assert_eq!(line_clear_score(5, 1), 0);
    }

    #[test]
    fn test_line_clear_score_scales_with_level() {
        for level in 1..=15 {
            assert_eq!(line_clear_score(1, level), 100 * level);
            assert_eq!(line_clear_score(2, level), 300 * level);
            assert_eq!(line_clear_score(3, level), 500 * level);
            assert_eq!(line_clear_score(4, level), 800 * level);
        }
    }

    #[test]
    fn test_drop_score() {
        assert_eq!(drop_score(5, false), 5);
        assert_eq!(drop_score(5, true), 10);
        assert_eq!(drop_score(0, true), 0);
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
        assert_eq!(level_for_lines(100), 11);
    }

    #[test]
    fn test_gravity_interval_defaults() {
        assert_eq!(gravity_interval_ms(1), 1000);
        assert_eq!(gravity_interval_ms(2), 920);
        assert_eq!(gravity_interval_ms(12), 120);
        assert_eq!(gravity_interval_ms(13), 50);
        assert_eq!(gravity_interval_ms(40), 50);
    }

    #[test]
    fn test_gravity_is_non_increasing_and_floored() {
        let curve = GravityCurve::default();
        let mut prev = curve.interval_ms(1);
        for level in 2..100 {
            let cur = curve.interval_ms(level);
            assert!(cur <= prev, "level {} got slower", level);
            assert!(cur >= curve.floor_ms);
            prev = cur;
        }
    }

    #[test]
    fn test_gravity_never_zero() {
        let curve = GravityCurve {
            base_ms: 10,
            step_ms: 10,
            floor_ms: 0,
        };
        assert_eq!(curve.interval_ms(5), 1);
    }
}

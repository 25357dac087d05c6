use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Points earned out of points possible.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Score {
    pub earned: u32,
    pub possible: u32,
}

impl Score {
    pub fn new(earned: u32, possible: u32) -> Self {
        Self { earned, possible }
    }

    /// Every point available was earned.
    pub fn full(points: u32) -> Self {
        Self::new(points, points)
    }

    /// No point available was earned.
    pub fn zero(points: u32) -> Self {
        Self::new(0, points)
    }

    /// `floor(points * passed / total)` out of `points`. A suite with no cases earns
    /// nothing.
    pub fn proportional(points: u32, passed: u32, total: u32) -> Self {
        if total == 0 {
            return Self::zero(points);
        }
        let passed = passed.min(total);
        let earned = u64::from(points) * u64::from(passed) / u64::from(total);
        // earned <= points, so the conversion cannot fail
        Self::new(u32::try_from(earned).unwrap_or(points), points)
    }

    pub fn is_full(&self) -> bool {
        self.earned == self.possible
    }
}

impl AddAssign for Score {
    fn add_assign(&mut self, rhs: Self) {
        self.earned = self.earned.saturating_add(rhs.earned);
        self.possible = self.possible.saturating_add(rhs.possible);
    }
}

impl Add for Score {
    type Output = Score;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

//! Count to heatmap-level quantization.

/// Discrete heatmap level for a day's contribution count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum IntensityLevel {
    /// No contributions
    #[default]
    None,
    /// 1-3 contributions
    Low,
    /// 4-6 contributions
    Medium,
    /// 7-9 contributions
    High,
    /// 10 or more contributions
    Highest,
}

impl IntensityLevel {
    /// All levels from lowest to highest, as drawn in the legend.
    pub const ALL: [IntensityLevel; 5] = [
        IntensityLevel::None,
        IntensityLevel::Low,
        IntensityLevel::Medium,
        IntensityLevel::High,
        IntensityLevel::Highest,
    ];

    pub fn from_count(count: u32) -> Self {
        match count {
            0 => IntensityLevel::None,
            1..=3 => IntensityLevel::Low,
            4..=6 => IntensityLevel::Medium,
            7..=9 => IntensityLevel::High,
            _ => IntensityLevel::Highest,
        }
    }

    /// Numeric level, 0-4.
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        let cases = [
            (0, 0),
            (1, 1),
            (3, 1),
            (4, 2),
            (6, 2),
            (7, 3),
            (9, 3),
            (10, 4),
            (1000, 4),
            (u32::MAX, 4),
        ];
        for (count, expected) in cases {
            assert_eq!(
                IntensityLevel::from_count(count).index(),
                expected,
                "count {}",
                count
            );
        }
    }

    #[test]
    fn test_monotonic() {
        let mut previous = IntensityLevel::from_count(0);
        for count in 1..50 {
            let level = IntensityLevel::from_count(count);
            assert!(level >= previous, "level dropped at count {}", count);
            previous = level;
        }
    }

    #[test]
    fn test_all_is_ordered() {
        for (i, level) in IntensityLevel::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }
}

/// Highest heatmap level ("4 or more" / darkest shade)
pub const MAX_LEVEL: u8 = 4;

/// How a day's raw count maps onto the 0..=4 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPolicy {
    /// `min(count, 4)`: one step per event. Used for development-log charts.
    Clip,
    /// Scaled against the busiest day in range. Used for submission calendars.
    ///
    /// When the busiest day has at most 3 events, levels are proportional:
    /// `ceil(count / max * 4)`. Otherwise fixed breakpoints apply:
    /// 1..=3 → 1, 4..=6 → 2, 7..=9 → 3, 10+ → 4. The two branches do not
    /// line up at `max == 3`; both are kept as they are.
    RelativeQuantile,
}

impl LevelPolicy {
    /// Level of a day with `count` events when the busiest day in the
    /// rendered range has `max_count` events. Zero is always level 0.
    pub fn level(self, count: u32, max_count: u32) -> u8 {
        if count == 0 {
            return 0;
        }

        match self {
            LevelPolicy::Clip => count.min(MAX_LEVEL as u32) as u8,
            LevelPolicy::RelativeQuantile => {
                if max_count <= 3 {
                    // count > 0 implies max_count >= count > 0
                    let max_count = max_count.max(count);
                    let scaled = (count * MAX_LEVEL as u32).div_ceil(max_count);
                    scaled.min(MAX_LEVEL as u32) as u8
                } else if count <= 3 {
                    1
                } else if count <= 6 {
                    2
                } else if count <= 9 {
                    3
                } else {
                    4
                }
            }
        }
    }

    /// Legend text for each level, lowest first
    pub fn legend(self) -> [&'static str; 5] {
        match self {
            LevelPolicy::Clip => ["0", "1", "2", "3", "4+"],
            LevelPolicy::RelativeQuantile => ["none", "low", "medium", "high", "max"],
        }
    }
}

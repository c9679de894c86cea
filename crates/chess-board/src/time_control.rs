//! Time controls offered when starting a game.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Bullet,
    Blitz,
    Rapid,
    Classic,
    Custom,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Bullet => "Bullet",
            Category::Blitz => "Blitz",
            Category::Rapid => "Rapid",
            Category::Classic => "Classic",
            Category::Custom => "Custom",
        };
        f.write_str(name)
    }
}

/// Starting time per side plus the increment added after each move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeControl {
    pub minutes: u32,
    pub increment_secs: u32,
    pub category: Category,
}

const fn control(minutes: u32, increment_secs: u32, category: Category) -> TimeControl {
    TimeControl {
        minutes,
        increment_secs,
        category,
    }
}

impl TimeControl {
    /// The built-in presets, fastest first.
    pub const PRESETS: [TimeControl; 11] = [
        control(1, 0, Category::Bullet),
        control(2, 1, Category::Bullet),
        control(3, 0, Category::Bullet),
        control(3, 2, Category::Blitz),
        control(5, 0, Category::Blitz),
        control(5, 3, Category::Blitz),
        control(10, 0, Category::Rapid),
        control(10, 5, Category::Rapid),
        control(15, 10, Category::Rapid),
        control(30, 0, Category::Classic),
        control(30, 20, Category::Classic),
    ];

    /// A time control outside the presets.
    pub const fn custom(minutes: u32, increment_secs: u32) -> Self {
        control(minutes, increment_secs, Category::Custom)
    }

    /// Looks up a built-in preset by its label, e.g. `"5+3"`.
    pub fn preset(label: &str) -> Option<Self> {
        Self::PRESETS.into_iter().find(|tc| tc.label() == label.trim())
    }

    pub fn label(&self) -> String {
        format!("{}+{}", self.minutes, self.increment_secs)
    }

    pub fn initial_seconds(&self) -> i64 {
        i64::from(self.minutes) * 60
    }
}

impl Default for TimeControl {
    fn default() -> Self {
        control(10, 0, Category::Rapid)
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.category, self.label())
    }
}

/// Parses `"minutes+increment"`. Labels matching a preset take its category;
/// anything else is [`Category::Custom`].
impl FromStr for TimeControl {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(tc) = Self::preset(s) {
            return Ok(tc);
        }
        let (minutes, increment) = s
            .trim()
            .split_once('+')
            .ok_or_else(|| format!("expected minutes+increment, got '{}'", s))?;
        let minutes = minutes
            .parse::<u32>()
            .map_err(|_| format!("invalid minutes '{}'", minutes))?;
        let increment = increment
            .parse::<u32>()
            .map_err(|_| format!("invalid increment '{}'", increment))?;
        if minutes == 0 {
            return Err("a game needs at least one minute".to_string());
        }
        Ok(Self::custom(minutes, increment))
    }
}

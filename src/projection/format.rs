//! Display formatting for cell values.

use crate::settings::DisplayUnits;

const FEET_PER_METER: f64 = 3.280_84;

/// Calendar used to split times into years, days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    /// Hours in a day.
    pub hours_per_day: u64,
    /// Days in a year.
    pub days_per_year: u64,
}

impl Default for Calendar {
    fn default() -> Self {
        // Kerbin: six-hour days, 426-day years.
        Self {
            hours_per_day: 6,
            days_per_year: 426,
        }
    }
}

impl Calendar {
    /// Split `seconds` into `[years, days, hours, minutes, seconds]`.
    ///
    /// Negative times count as zero.
    pub fn split(&self, seconds: f64) -> [u64; 5] {
        let total = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        let minute = 60;
        let hour = 60 * minute;
        let day = self.hours_per_day * hour;
        let year = self.days_per_year * day;

        [
            total / year,
            total % year / day,
            total % day / hour,
            total % hour / minute,
            total % minute,
        ]
    }

    /// Time-until-burn cells; leading zero components are left blank.
    pub fn time_cells(&self, seconds: f64) -> [String; 5] {
        const SUFFIXES: [&str; 5] = ["y", "d", "h", "m", "s"];
        let parts = self.split(seconds);
        let first = parts.iter().position(|&p| p > 0).unwrap_or(4);

        let mut cells: [String; 5] = Default::default();
        for (i, (part, suffix)) in parts.iter().zip(SUFFIXES).enumerate() {
            if i >= first {
                cells[i] = format!("{}{}", part, suffix);
            }
        }
        cells
    }
}

/// Format a number with thousand separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a speed given in m/s in the chosen unit system.
pub fn format_delta_v(meters_per_second: f64, units: DisplayUnits) -> String {
    if !meters_per_second.is_finite() {
        return "?".to_string();
    }
    let (value, unit) = match units {
        DisplayUnits::Metric => (meters_per_second, "m/s"),
        DisplayUnits::UnitedStatesCustomary => (meters_per_second * FEET_PER_METER, "ft/s"),
    };
    let magnitude = format_number(value.abs().round() as u64);
    if value < 0.0 && value.round() != 0.0 {
        format!("-{} {}", magnitude, unit)
    } else {
        format!("{} {}", magnitude, unit)
    }
}

/// Format a burn duration compactly, e.g. `1m 12s`.
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "?".to_string();
    }
    let total = seconds.round() as u64;
    match (total / 3600, total % 3600 / 60, total % 60) {
        (0, 0, s) => format!("{}s", s),
        (0, m, s) => format!("{}m {}s", m, s),
        (h, m, _) => format!("{}h {}m", h, m),
    }
}

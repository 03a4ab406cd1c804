use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::Serialize;

/// Shown by a `to target` countdown once its target has passed.
pub const EXPIRED_TEXT: &str = "Čas vypršel";

static COMMAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*odpočet\s+(slovně\s+)?(do|od)\s+(.+?)\s*$").unwrap()
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\s*\.\s*(\d{1,2})\s*\.\s*(\d{4})(?:\s+(\d{1,2})\s*:\s*(\d{2}))?$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Remaining time until the target, "odpočet do".
    ToTarget,
    /// Elapsed time since the target, "odpočet od".
    SinceTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownStyle {
    /// `D:HH:MM:SS`
    Compact,
    /// `2 dny, 3 hodiny, 5 sekund`
    Verbose,
}

/// A countdown is pure data; its text is derived from "now" on every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Countdown {
    pub target: NaiveDateTime,
    pub direction: Direction,
    pub style: CountdownStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reading {
    Running { seconds: i64 },
    Expired,
}

impl Countdown {
    /// Parses the content of an `(odpočet ...)` bracket.
    pub fn parse_command(content: &str) -> Option<Self> {
        let caps = COMMAND_RE.captures(content)?;
        let style = if caps.get(1).is_some() {
            CountdownStyle::Verbose
        } else {
            CountdownStyle::Compact
        };
        let direction = if caps[2].eq_ignore_ascii_case("do") {
            Direction::ToTarget
        } else {
            Direction::SinceTarget
        };
        let target = parse_czech_date(&caps[3])?;
        Some(Self {
            target,
            direction,
            style,
        })
    }

    pub fn reading(&self, now: NaiveDateTime) -> Reading {
        match self.direction {
            Direction::ToTarget => {
                let seconds = (self.target - now).num_seconds();
                if seconds <= 0 {
                    Reading::Expired
                } else {
                    Reading::Running { seconds }
                }
            }
            Direction::SinceTarget => Reading::Running {
                seconds: (now - self.target).num_seconds().max(0),
            },
        }
    }

    pub fn text_at(&self, now: NaiveDateTime) -> String {
        match self.reading(now) {
            Reading::Expired => EXPIRED_TEXT.to_string(),
            Reading::Running { seconds } => match self.style {
                CountdownStyle::Compact => format_compact(seconds),
                CountdownStyle::Verbose => format_verbose(seconds),
            },
        }
    }
}

/// Parses `D.M.YYYY` or `D.M.YYYY H:MM`, allowing spaces around the dots.
pub fn parse_czech_date(text: &str) -> Option<NaiveDateTime> {
    let caps = DATE_RE.captures(text.trim())?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    let (hour, minute) = match (caps.get(4), caps.get(5)) {
        (Some(hour), Some(minute)) => (hour.as_str().parse().ok()?, minute.as_str().parse().ok()?),
        _ => (0, 0),
    };
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, 0)
}

fn split_units(seconds: i64) -> [i64; 4] {
    let seconds = seconds.max(0);
    [
        seconds / 86_400,
        seconds % 86_400 / 3_600,
        seconds % 3_600 / 60,
        seconds % 60,
    ]
}

pub fn format_compact(seconds: i64) -> String {
    let [days, hours, minutes, seconds] = split_units(seconds);
    format!("{days}:{hours:02}:{minutes:02}:{seconds:02}")
}

const UNIT_FORMS: [[&str; 3]; 4] = [
    ["den", "dny", "dní"],
    ["hodina", "hodiny", "hodin"],
    ["minuta", "minuty", "minut"],
    ["sekunda", "sekundy", "sekund"],
];

pub fn format_verbose(seconds: i64) -> String {
    let units = split_units(seconds);
    let mut parts: Vec<String> = units
        .iter()
        .zip(UNIT_FORMS.iter())
        .filter(|(n, _)| **n != 0)
        .map(|(n, forms)| format!("{n} {}", czech_plural(*n, forms)))
        .collect();
    if parts.is_empty() {
        parts.push(format!("0 {}", UNIT_FORMS[3][2]));
    }
    parts.join(", ")
}

fn czech_plural<'a>(n: i64, forms: &[&'a str; 3]) -> &'a str {
    match n {
        1 => forms[0],
        2..=4 => forms[1],
        _ => forms[2],
    }
}

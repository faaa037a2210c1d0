use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScreenError;

/// Charting timeframe a rating is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Interval {
    pub const ALL: [Interval; 10] = [
        Interval::OneMinute,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::OneHour,
        Interval::TwoHours,
        Interval::FourHours,
        Interval::OneDay,
        Interval::OneWeek,
        Interval::OneMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::OneHour => "1h",
            Interval::TwoHours => "2h",
            Interval::FourHours => "4h",
            Interval::OneDay => "1d",
            Interval::OneWeek => "1w",
            Interval::OneMonth => "1M",
        }
    }

    /// Token for file names. Unlike `as_str`, never differs from another
    /// interval's token by case alone (`1mo` vs `1m`).
    pub fn file_token(&self) -> &'static str {
        match self {
            Interval::OneMonth => "1mo",
            other => other.as_str(),
        }
    }

    /// Suffix appended to scanner column names (`Recommend.All|240`).
    /// The daily timeframe is the scanner default and takes no suffix.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Interval::OneMinute => "|1",
            Interval::FiveMinutes => "|5",
            Interval::FifteenMinutes => "|15",
            Interval::ThirtyMinutes => "|30",
            Interval::OneHour => "|60",
            Interval::TwoHours => "|120",
            Interval::FourHours => "|240",
            Interval::OneDay => "",
            Interval::OneWeek => "|1W",
            Interval::OneMonth => "|1M",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ScreenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        // "1M" is a month, "1m" a minute; everything else is case-insensitive.
        if trimmed == "1M" {
            return Ok(Interval::OneMonth);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "1m" => Ok(Interval::OneMinute),
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "1h" | "60m" => Ok(Interval::OneHour),
            "2h" | "120m" => Ok(Interval::TwoHours),
            "4h" | "240m" => Ok(Interval::FourHours),
            "1d" | "d" => Ok(Interval::OneDay),
            "1w" | "w" => Ok(Interval::OneWeek),
            "1mo" | "mo" => Ok(Interval::OneMonth),
            _ => {
                let choices: Vec<&str> = Interval::ALL.iter().map(|i| i.as_str()).collect();
                Err(ScreenError::invalid_input(format!(
                    "unsupported interval '{}', choices are: {}",
                    trimmed,
                    choices.join(", ")
                )))
            }
        }
    }
}

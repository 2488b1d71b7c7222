use crate::error::{Result, ScraperError};
use crate::types::MeasurementTime;
use chrono::{NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use chrono_tz::Asia::Shanghai;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DIGIT_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})[ T](\d{1,2}):(\d{2})(?::(\d{2}))?").unwrap()
});

/// How a profile turns its time label into a wall-clock reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateAssembly {
    /// The label already carries `YYYY-MM-DD HH:mm[:ss]` somewhere in it.
    Timestamp,
    /// The label is `Y年M月D日H时` style; digit runs are picked by position.
    Fragments(FragmentOrder),
}

/// Positions of each field among the label's digit runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentOrder {
    /// Exact number of digit runs a well-formed label contains.
    pub fragments: usize,
    pub year: usize,
    pub month: usize,
    pub day: usize,
    pub hour: usize,
    #[serde(default)]
    pub minute: Option<usize>,
}

/// Read a source time label as Asia/Shanghai wall-clock time.
pub fn normalize_time(raw: &str, assembly: &DateAssembly) -> Result<MeasurementTime> {
    let naive = match assembly {
        DateAssembly::Timestamp => parse_timestamp(raw)?,
        DateAssembly::Fragments(order) => assemble_fragments(raw, order)?,
    };
    attach_zone(naive, raw)
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let caps = TIMESTAMP
        .captures(raw)
        .ok_or_else(|| ScraperError::Timestamp(format!("no timestamp in '{}'", raw.trim())))?;

    let field = |i: usize| -> Result<u32> {
        match caps.get(i) {
            Some(m) => m
                .as_str()
                .parse()
                .map_err(|_| ScraperError::Timestamp(format!("bad number '{}'", m.as_str()))),
            None => Ok(0),
        }
    };

    build(
        raw,
        field(1)? as i32,
        field(2)?,
        field(3)?,
        field(4)?,
        field(5)?,
        field(6)?,
    )
}

fn assemble_fragments(raw: &str, order: &FragmentOrder) -> Result<NaiveDateTime> {
    let fragments: Vec<&str> = DIGIT_RUNS.find_iter(raw).map(|m| m.as_str()).collect();
    if fragments.len() != order.fragments {
        return Err(ScraperError::Timestamp(format!(
            "expected {} digit groups in '{}', found {}",
            order.fragments,
            raw.trim(),
            fragments.len()
        )));
    }

    let pick = |idx: usize| -> Result<u32> {
        let text = fragments.get(idx).ok_or_else(|| {
            ScraperError::Timestamp(format!("no digit group at position {idx} in '{}'", raw.trim()))
        })?;
        text.parse()
            .map_err(|_| ScraperError::Timestamp(format!("bad number '{text}'")))
    };

    let minute = match order.minute {
        Some(idx) => pick(idx)?,
        None => 0,
    };

    build(
        raw,
        pick(order.year)? as i32,
        pick(order.month)?,
        pick(order.day)?,
        pick(order.hour)?,
        minute,
        0,
    )
}

fn build(raw: &str, y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .ok_or_else(|| ScraperError::Timestamp(format!("out of range date in '{}'", raw.trim())))
}

fn attach_zone(naive: NaiveDateTime, raw: &str) -> Result<MeasurementTime> {
    let local = Shanghai
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| ScraperError::Timestamp(format!("ambiguous local time '{}'", raw.trim())))?;

    Ok(MeasurementTime {
        utc: local.with_timezone(&Utc),
        local: local.to_rfc3339_opts(SecondsFormat::Secs, false),
    })
}

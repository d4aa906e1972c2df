//! Date segments (§4.2 "Date").

use super::common::Common;
use crate::calendar::CivilDateTime;
use crate::distribution::{DEFAULT_MAX, DEFAULT_ZIPF, DEFAULT_ZIPF_THETA};
use crate::error::Result;
use crate::rng::{Uniform, Zipf};
use crate::sink::Sink;
use crate::variables::Variables;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateType {
    Mdy,
    Ymd,
    Ymdh,
    Ymdt,
    Oagi,
}

impl DateType {
    pub fn parse(s: &str) -> Option<DateType> {
        match s.to_ascii_lowercase().as_str() {
            "mdy" => Some(DateType::Mdy),
            "ymd" => Some(DateType::Ymd),
            "ymdh" => Some(DateType::Ymdh),
            "ymdt" => Some(DateType::Ymdt),
            "oagi" => Some(DateType::Oagi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateSeg {
    pub common: Common,
    pub date_type: DateType,
    /// Raw `start=MM/DD/YYYY` spec, resolved lazily so `$VAR` fields can
    /// pick up values set after parse but before the first generate call.
    start_spec: String,
    start: OnceLock<CivilDateTime>,
}

impl DateSeg {
    pub fn new(common: Common, date_type: DateType, start_spec: String) -> Self {
        DateSeg {
            common,
            date_type,
            start_spec,
            start: OnceLock::new(),
        }
    }

    fn resolve_start(&mut self, vars: &Variables) -> CivilDateTime {
        if self.start.get().is_none() {
            let resolved = parse_start(&self.start_spec, vars, self.common.dist.uniform());
            let _ = self.start.set(resolved);
        }
        *self.start.get().expect("just initialized above")
    }

    pub fn generate(
        &mut self,
        context: i64,
        vars: &mut Variables,
        sink: &mut dyn Sink,
    ) -> Result<usize> {
        let start = self.resolve_start(vars);
        let offset_days = self.common.next_value(context);
        let date = start.add_days(offset_days);
        let text = format_date(date, self.date_type);
        if let Some(save) = self.common.save.clone() {
            vars.set(&save, &text);
        }
        sink.write_bytes(text.as_bytes())?;
        Ok(text.len())
    }
}

/// Parse a field that may be `$RANDOM`, `$ZIPF`, `$NAME` (§4.1
/// "Dollar-variable expansion"), or a plain integer literal.
fn parse_field(s: &str, vars: &Variables, rng: &mut Uniform, default: i64) -> i64 {
    let s = s.trim();
    let Some(name) = s.strip_prefix('$') else {
        return s.parse().unwrap_or(default);
    };
    match name.to_ascii_uppercase().as_str() {
        "RANDOM" => rng.next_i64(DEFAULT_MAX),
        "ZIPF" => Zipf::new(DEFAULT_ZIPF, DEFAULT_ZIPF_THETA).next(),
        _ => vars.get(name).trim().parse().unwrap_or(default),
    }
}

/// `MM/DD/YYYY`, any field may be `$VAR` (§4.2 "Start-date parsing").
/// Invalid months/days are coerced modulo the calendar rather than
/// rejected.
fn parse_start(spec: &str, vars: &Variables, rng: &mut Uniform) -> CivilDateTime {
    let parts: Vec<&str> = spec.split('/').collect();
    let month = parts.first().map_or(1, |s| parse_field(s, vars, rng, 1));
    let day = parts.get(1).map_or(1, |s| parse_field(s, vars, rng, 1));
    let year = parts.get(2).map_or(2000, |s| parse_field(s, vars, rng, 2000));
    CivilDateTime::new_coerced(year, month, day, 0, 0, 0)
}

fn format_date(d: CivilDateTime, kind: DateType) -> String {
    match kind {
        DateType::Mdy => format!("{}/{}/{}", d.month, d.day, d.year),
        DateType::Ymd => format!("{:04}{:02}{:02}", d.year, d.month, d.day),
        DateType::Ymdh => format!("{:04}-{:02}-{:02}", d.year, d.month, d.day),
        DateType::Ymdt => format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            d.year, d.month, d.day, d.hour, d.minute, d.second
        ),
        DateType::Oagi => format!(
            "<YEAR>{:04}</YEAR><MONTH>{:02}</MONTH><DAY>{:02}</DAY>\
             <HOUR>{:02}</HOUR><MINUTE>{:02}</MINUTE><SECOND>{:02}</SECOND>\
             <SUBSECOND>{:04}</SUBSECOND><TIMEZONE>{:+05}</TIMEZONE>",
            d.year, d.month, d.day, d.hour, d.minute, d.second, 0, 0
        ),
    }
}

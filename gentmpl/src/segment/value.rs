//! Numeric Value segments (§4.2 "Value").

use super::common::Common;
use crate::error::Result;
use crate::sink::Sink;
use crate::variables::Variables;

#[derive(Debug, Clone)]
pub struct Value {
    pub common: Common,
    /// decimal-format pattern, e.g. `#0`, `#0.00`, `0000`.
    pub format: String,
    /// When set, the transformed integer is multiplied by this ratio and
    /// formatted as a decimal instead of an integer.
    pub ratio: Option<f64>,
}

impl Value {
    pub fn generate(
        &mut self,
        context: i64,
        vars: &mut Variables,
        sink: &mut dyn Sink,
    ) -> Result<usize> {
        let raw = self.common.next_value(context);
        let text = format_number(raw, self.ratio, &self.format);
        if let Some(save) = self.common.save.clone() {
            vars.set(&save, &text);
        }
        sink.write_bytes(text.as_bytes())?;
        Ok(text.len())
    }
}

/// Render `value` according to a `#0` / `#0.00` / `0000`-style pattern
/// (§4.2 "the usual `#0.00` / zero-pad conventions"): the count of `0`
/// characters before the decimal point sets the minimum zero-padded width
/// of the integer part; the count after it sets the decimal precision when
/// `ratio` is set.
fn format_number(value: i64, ratio: Option<f64>, format: &str) -> String {
    let dot = format.find('.');
    let int_pattern = dot.map(|d| &format[..d]).unwrap_or(format);
    let width = int_pattern.chars().filter(|c| *c == '0').count().max(1);
    match ratio {
        Some(r) => {
            let places = dot
                .map(|d| format[d + 1..].chars().filter(|c| *c == '0').count())
                .unwrap_or(2);
            let scaled = value as f64 * r;
            pad_decimal(&format!("{scaled:.places$}"), width)
        }
        None => format!("{value:0width$}"),
    }
}

fn pad_decimal(s: &str, width: usize) -> String {
    match s.split_once('.') {
        Some((int_part, frac_part)) => {
            let negative = int_part.starts_with('-');
            let digits = int_part.trim_start_matches('-');
            let padded = format!("{digits:0width$}");
            format!("{}{padded}.{frac_part}", if negative { "-" } else { "" })
        }
        None => s.to_string(),
    }
}

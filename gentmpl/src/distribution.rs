//! The `order=` distributions shared by the Value, Words, and Date segments
//! (§4.2, §4.3, GLOSSARY "Distribution").

use crate::rng::{LogDecay, Uniform, Zipf};

pub const DEFAULT_MAX: i64 = 1_000_000_000;
pub const DEFAULT_ZIPF_MAX: i64 = 9_999_999;
pub const DEFAULT_ZIPF: i64 = 99;
pub const DEFAULT_ZIPF_THETA: f64 = 0.9;
pub const DEFAULT_LOG_BASE: i64 = 10;

/// Which raw-integer source a segment draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Serial,
    Random,
    Zipf,
    Context,
    Log,
}

impl Order {
    pub fn parse(s: &str) -> Option<Order> {
        match s.to_ascii_lowercase().as_str() {
            "serial" => Some(Order::Serial),
            "random" => Some(Order::Random),
            "zipf" => Some(Order::Zipf),
            "context" => Some(Order::Context),
            "log" => Some(Order::Log),
            _ => None,
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Order::Random
    }
}

/// Per-segment lazily-initialized distribution state: a uniform stream, and
/// (only for `order=zipf`) a Zipf generator built from `min`/`max`.
#[derive(Debug, Clone)]
pub struct Distributions {
    uniform: Uniform,
    zipf: Option<Zipf>,
    log_decay: LogDecay,
    serial: i64,
}

impl Distributions {
    pub fn new(base_seed: u64, name: Option<&str>) -> Self {
        Distributions {
            uniform: Uniform::for_name(base_seed, name),
            zipf: None,
            log_decay: LogDecay::new(DEFAULT_LOG_BASE),
            serial: 0,
        }
    }

    /// Zipf element count per §4.2: `clamp(max-min, 1, DEFAULT_ZIPF_MAX)`,
    /// or `DEFAULT_ZIPF` when the range is empty (`min == max`).
    fn zipf_limit(min: i64, max: i64) -> i64 {
        if min == max {
            DEFAULT_ZIPF
        } else {
            (max - min).clamp(1, DEFAULT_ZIPF_MAX)
        }
    }

    fn zipf_mut(&mut self, min: i64, max: i64) -> &mut Zipf {
        self.zipf.get_or_insert_with(|| {
            Zipf::new(Self::zipf_limit(min, max), DEFAULT_ZIPF_THETA)
        })
    }

    /// Draw the next raw integer for `order`, given the segment's `min`/`max`
    /// bounds and the context passed down from the parent Block.
    pub fn raw(&mut self, order: Order, min: i64, max: i64, context: i64) -> i64 {
        match order {
            Order::Context => context,
            Order::Serial => {
                let v = self.serial;
                self.serial += 1;
                v
            }
            Order::Random => self.uniform.next_i64(max.max(1)),
            Order::Zipf => self.zipf_mut(min, max).next(),
            Order::Log => self.log_decay.next(&mut self.uniform, max),
        }
    }

    pub fn uniform(&mut self) -> &mut Uniform {
        &mut self.uniform
    }

    /// Word-list index selection (§4.2 "Words"): Random/Zipf/Log draw
    /// directly over `list_len`; Serial/Context apply the spec's explicit
    /// modulo so a monotonic counter or an arbitrary context value always
    /// lands inside the list.
    pub fn word_index(&mut self, order: Order, context: i64, list_len: i64) -> i64 {
        let list_len = list_len.max(1);
        match order {
            Order::Serial => {
                let v = self.serial.rem_euclid(list_len);
                self.serial += 1;
                v
            }
            Order::Context => context.rem_euclid(list_len),
            Order::Random => self.uniform.next_i64(list_len),
            Order::Zipf => {
                if self.zipf.as_ref().map(|z| z.limit()) != Some(list_len) {
                    self.zipf = Some(Zipf::new(list_len, DEFAULT_ZIPF_THETA));
                }
                self.zipf.as_mut().unwrap().next()
            }
            Order::Log => self.log_decay.next(&mut self.uniform, list_len).rem_euclid(list_len),
        }
    }
}

/// Apply the Value/Date/Words transform from §4.2:
/// `result = (raw * factor) mod (max - min + 1) + min` when `min < max`,
/// else `min`.
pub fn transform(raw: i64, min: i64, max: i64, factor: i64) -> i64 {
    if min < max {
        let span = max - min + 1;
        let scaled = raw.saturating_mul(factor.max(1));
        let m = scaled.rem_euclid(span);
        m + min
    } else {
        min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_identity_when_equal() {
        assert_eq!(transform(999, 5, 5, 1), 5);
    }

    #[test]
    fn transform_wraps_into_range() {
        for raw in 0..50 {
            let v = transform(raw, 10, 20, 1);
            assert!((10..=20).contains(&v));
        }
    }

    #[test]
    fn zipf_limit_defaults_when_empty_range() {
        assert_eq!(Distributions::zipf_limit(5, 5), DEFAULT_ZIPF);
        assert_eq!(Distributions::zipf_limit(0, 50_000_000), DEFAULT_ZIPF_MAX);
    }
}

//! Fields shared by every segment variant (§3 "Segment (tagged variant)").

use crate::distribution::{Distributions, Order, DEFAULT_MAX};
use crate::params::ParamMap;

/// Common state factored out of the per-variant structs: an auto-assigned
/// id (used to seed the segment's own RNG), an optional user name, the
/// `order=` distribution tag, the `[min, max]` range, the `factor`, an
/// optional `save=` variable name, and the lazily-initialized generators.
#[derive(Debug, Clone)]
pub struct Common {
    pub id: u64,
    pub name: Option<String>,
    pub order: Order,
    pub min: i64,
    pub max: i64,
    pub factor: i64,
    pub save: Option<String>,
    pub dist: Distributions,
}

impl Common {
    /// Decode the shared keys (§4.1 "Argument decoding" step (a)) and
    /// apply the invariants from §3: `min <= max` (coerced upward), `factor
    /// >= 1`, and `count=N` forcing `min = max = N`.
    pub fn decode(id: u64, base_seed: u64, params: &ParamMap) -> Common {
        let name = params.get("name").map(str::to_string);
        let order = params
            .get("order")
            .and_then(Order::parse)
            .unwrap_or_default();
        let (mut min, mut max) = (params.int("min", 0), params.int("max", DEFAULT_MAX));
        if let Some(count) = params.get("count") {
            let n: i64 = count.parse().unwrap_or_else(|_| {
                log::warn!("count={count:?} is not a valid integer, ignoring");
                max.max(1)
            });
            min = n;
            max = n;
        }
        if min > max {
            log::warn!("min ({min}) > max ({max}), coercing max up to min");
            max = min;
        }
        let factor = params.int("factor", 1).max(1);
        let save = params.get("save").map(str::to_string);
        Common {
            id,
            dist: Distributions::new(base_seed, name.as_deref()),
            name,
            order,
            min,
            max,
            factor,
            save,
        }
    }

    /// Draw and transform the next value per §4.2: raw integer from the
    /// distribution, then `(raw * factor) mod (max - min + 1) + min`.
    pub fn next_value(&mut self, context: i64) -> i64 {
        let raw = self.dist.raw(self.order, self.min, self.max, context);
        crate::distribution::transform(raw, self.min, self.max, self.factor)
    }
}

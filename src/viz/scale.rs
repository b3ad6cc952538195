//! Scales mapping data onto pixel positions: linear (values), band (categories and
//! periods inside a category) and ordinal colour.

use super::types::Rgb;

/// Continuous value → pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(range: (f64, f64)) -> Self {
        Self {
            domain: (0.0, 1.0),
            range,
        }
    }

    pub fn set_domain(&mut self, d0: f64, d1: f64) {
        self.domain = (d0, d1);
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// A collapsed domain sends everything to the start of the range.
    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return r0;
        }
        r0 + (v - d0) / span * (r1 - r0)
    }

    /// Round-number ticks covering the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain.0 <= self.domain.1 {
            self.domain
        } else {
            (self.domain.1, self.domain.0)
        };
        let span = hi - lo;
        if span <= 0.0 || count == 0 {
            return vec![lo];
        }
        let step = tick_step(span, count);
        let start = (lo / step - 1e-9).ceil();
        let stop = (hi / step + 1e-9).floor();
        let mut out = Vec::new();
        let mut i = start;
        while i <= stop {
            // multiply instead of accumulate to keep 0.3 from turning into 0.30000000000000004
            out.push(clean(i * step));
            i += 1.0;
        }
        out
    }
}

fn tick_step(span: f64, count: usize) -> f64 {
    let m = count as f64;
    let mut step = 10f64.powf((span / m).log10().floor());
    let err = m / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    step
}

fn clean(v: f64) -> f64 {
    (v * 1e12).round() / 1e12
}

/// Ordinal keys → evenly spaced bands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BandScale {
    domain: Vec<String>,
    offsets: Vec<f64>,
    bandwidth: f64,
}

impl BandScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_domain<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domain = keys.into_iter().map(Into::into).collect();
        self.offsets.clear();
        self.bandwidth = 0.0;
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Spread bands over `start..stop`; the outer padding equals the inner one.
    pub fn range_bands(&mut self, start: f64, stop: f64, padding: f64) {
        let n = self.domain.len() as f64;
        if n == 0.0 {
            self.offsets.clear();
            self.bandwidth = 0.0;
            return;
        }
        let step = (stop - start) / (n - padding + 2.0 * padding);
        let first = start + step * padding;
        self.offsets = (0..self.domain.len())
            .map(|i| first + step * i as f64)
            .collect();
        self.bandwidth = step * (1.0 - padding);
    }

    /// Like [`range_bands`](Self::range_bands) but on whole pixels, with the rounding
    /// remainder split evenly on both sides.
    pub fn range_round_bands(&mut self, start: f64, stop: f64, padding: f64) {
        let n = self.domain.len() as f64;
        if n == 0.0 {
            self.offsets.clear();
            self.bandwidth = 0.0;
            return;
        }
        let step = ((stop - start) / (n - padding + 2.0 * padding)).floor();
        let error = stop - start - (n - padding) * step;
        let first = start + (error / 2.0).round();
        self.offsets = (0..self.domain.len())
            .map(|i| first + step * i as f64)
            .collect();
        self.bandwidth = (step * (1.0 - padding)).round();
    }

    pub fn apply(&self, key: &str) -> Option<f64> {
        let i = self.domain.iter().position(|k| k == key)?;
        self.offsets.get(i).copied()
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

/// Colours handed out to keys in first-seen order, cycling through the range.
/// A key keeps its colour for the lifetime of the scale.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalColorScale {
    range: Vec<Rgb>,
    seen: Vec<String>,
}

impl OrdinalColorScale {
    pub fn new(range: Vec<Rgb>) -> Self {
        Self {
            range,
            seen: Vec::new(),
        }
    }

    pub fn color(&mut self, key: &str) -> Rgb {
        let idx = match self.seen.iter().position(|k| k == key) {
            Some(i) => i,
            None => {
                self.seen.push(key.to_string());
                self.seen.len() - 1
            }
        };
        if self.range.is_empty() {
            return Rgb::BLACK;
        }
        self.range[idx % self.range.len()]
    }
}

use crate::dataset::Dataset;
use crate::error::{ChartError, ChartResult};

/// Affine mapping from a data domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        LinearScale { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a domain value to the range.
    ///
    /// Interpolates as `r0 * (1 - t) + r1 * t` so both domain ends land
    /// exactly on the range ends. A zero-width domain maps everything to the
    /// middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        if span == 0.0 || !span.is_finite() {
            return (r0 + r1) / 2.0;
        }
        let t = (value - d0) / span;
        r0 * (1.0 - t) + r1 * t
    }

    pub fn invert(&self, px: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span == 0.0 || !span.is_finite() {
            return (d0 + d1) / 2.0;
        }
        let t = (px - r0) / span;
        d0 * (1.0 - t) + d1 * t
    }

    /// Distance between neighbouring ticks: 1, 2 or 5 times a power of ten
    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = self.ordered_domain();
        let raw = (hi - lo) / count.max(1) as f64;
        if raw <= 0.0 || !raw.is_finite() {
            return 0.0;
        }
        let mut step = 10f64.powf(raw.log10().floor());
        let error = raw / step;
        if error >= 50f64.sqrt() {
            step *= 10.0;
        } else if error >= 10f64.sqrt() {
            step *= 5.0;
        } else if error >= 2f64.sqrt() {
            step *= 2.0;
        }
        step
    }

    /// Round tick values inside the domain, roughly `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = self.ordered_domain();
        if !lo.is_finite() || !hi.is_finite() {
            return Vec::new();
        }
        let step = self.tick_step(count);
        if step == 0.0 {
            return vec![lo];
        }

        // Fractional steps divide by an integer inverse to avoid 0.30000000000000004
        if step >= 1.0 {
            let first = (lo / step).ceil() as i64;
            let last = (hi / step).floor() as i64;
            (first..=last).map(|i| i as f64 * step).collect()
        } else {
            let inverse = (1.0 / step).round();
            let first = (lo * inverse).ceil() as i64;
            let last = (hi * inverse).floor() as i64;
            (first..=last).map(|i| i as f64 / inverse).collect()
        }
    }

    fn ordered_domain(&self) -> (f64, f64) {
        let (d0, d1) = self.domain;
        if d0 <= d1 {
            (d0, d1)
        } else {
            (d1, d0)
        }
    }
}

/// How the raw data extent becomes a scale domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DomainPadding {
    /// `[min * low, max * high]`
    Multiplicative { low: f64, high: f64 },
    /// `[0, max]`
    ZeroBaseline,
}

impl DomainPadding {
    pub fn apply(&self, min: f64, max: f64) -> (f64, f64) {
        match *self {
            DomainPadding::Multiplicative { low, high } => (min * low, max * high),
            DomainPadding::ZeroBaseline => (0.0, max),
        }
    }
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}

/// Build the scale for one axis from the currently selected field
pub fn compute_scale(
    dataset: &Dataset,
    field: &str,
    range: (f64, f64),
    padding: DomainPadding,
) -> ChartResult<LinearScale> {
    let values = dataset.values(field)?;
    let (min, max) = extent(&values).ok_or(ChartError::EmptyDataset)?;
    Ok(LinearScale::new(padding.apply(min, max), range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{sample_dataset, Record};
    use approx::assert_relative_eq;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    const X_PADDING: DomainPadding = DomainPadding::Multiplicative { low: 0.8, high: 1.2 };

    fn dataset_of(field: &str, values: &[f64]) -> Dataset {
        let records = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let mut fields = IndexMap::new();
                fields.insert(field.to_string(), v);
                Record::new(crate::dataset::RecordId(i), "R", "Region", fields)
            })
            .collect();
        Dataset::from_records(vec![field.to_string()], records)
    }

    #[test]
    fn test_x_domain_padding() {
        let dataset = sample_dataset();
        let scale = compute_scale(&dataset, "poverty", (0.0, 825.0), X_PADDING).unwrap();
        let (low, high) = scale.domain();
        assert_relative_eq!(low, 8.96, epsilon = 1e-9);
        assert_relative_eq!(high, 22.32, epsilon = 1e-9);
        assert_eq!(scale.range(), (0.0, 825.0));
    }

    #[test]
    fn test_y_domain_zero_baseline() {
        let dataset = sample_dataset();
        let scale = compute_scale(&dataset, "healthcare", (370.0, 0.0), DomainPadding::ZeroBaseline).unwrap();
        assert_eq!(scale.domain(), (0.0, 13.2));
        assert_eq!(scale.map(0.0), 370.0);
        assert_eq!(scale.map(13.2), 0.0);
    }

    #[test]
    fn test_empty_dataset_is_an_error() {
        let empty = dataset_of("poverty", &[]);
        let result = compute_scale(&empty, "poverty", (0.0, 1.0), X_PADDING);
        assert!(matches!(result, Err(ChartError::EmptyDataset)));
        let result = compute_scale(&empty, "healthcare", (1.0, 0.0), DomainPadding::ZeroBaseline);
        assert!(matches!(result, Err(ChartError::MissingColumn(_))));
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let dataset = sample_dataset();
        let result = compute_scale(&dataset, "unemployment", (0.0, 1.0), X_PADDING);
        assert!(matches!(result, Err(ChartError::MissingColumn(key)) if key == "unemployment"));
    }

    #[test]
    fn test_map_and_invert() {
        let scale = LinearScale::new((10.0, 20.0), (0.0, 100.0));
        assert_relative_eq!(scale.map(15.0), 50.0);
        assert_relative_eq!(scale.invert(25.0), 12.5);
        assert_relative_eq!(scale.map(25.0), 150.0); // no clamping
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_middle() {
        let scale = LinearScale::new((0.0, 0.0), (370.0, 0.0));
        assert_eq!(scale.map(0.0), 185.0);
        assert!(!scale.map(5.0).is_nan());
    }

    #[test]
    fn test_ticks_for_poverty_domain() {
        let scale = LinearScale::new((8.96, 22.32), (0.0, 825.0));
        assert_eq!(scale.tick_step(10), 1.0);
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 14);
        assert_eq!(ticks.first(), Some(&9.0));
        assert_eq!(ticks.last(), Some(&22.0));
    }

    #[test]
    fn test_fractional_ticks_are_clean() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        let ticks = scale.ticks(10);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[3], 0.3);
        assert_eq!(ticks[7], 0.7);
    }

    #[test]
    fn test_ticks_for_income_domain() {
        let scale = LinearScale::new((43253.0 * 0.8, 61286.0 * 1.2), (0.0, 825.0));
        assert_eq!(scale.tick_step(10), 5000.0);
        let ticks = scale.ticks(10);
        assert_eq!(ticks.first(), Some(&35000.0));
        assert_eq!(ticks.last(), Some(&70000.0));
    }

    #[test]
    fn test_ticks_reversed_domain() {
        let scale = LinearScale::new((10.0, 0.0), (0.0, 100.0));
        assert_eq!(scale.ticks(5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    proptest! {
        #[test]
        fn prop_x_scale_hits_range_ends_exactly(
            values in prop::collection::vec(1.0f64..1.0e5, 2..40),
        ) {
            let dataset = dataset_of("f", &values);
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assume!(min < max);

            let scale = compute_scale(&dataset, "f", (0.0, 825.0), X_PADDING).unwrap();
            let (low, high) = scale.domain();
            prop_assert!(low < high);
            prop_assert_eq!(scale.map(low), 0.0);
            prop_assert_eq!(scale.map(high), 825.0);
        }

        #[test]
        fn prop_y_domain_always_starts_at_zero(
            values in prop::collection::vec(-1.0e3f64..1.0e3, 1..40),
        ) {
            let dataset = dataset_of("f", &values);
            let scale = compute_scale(&dataset, "f", (370.0, 0.0), DomainPadding::ZeroBaseline).unwrap();
            prop_assert_eq!(scale.domain().0, 0.0);
        }

        #[test]
        fn prop_ticks_stay_inside_domain(low in -1.0e4f64..1.0e4, width in 0.01f64..1.0e4) {
            let scale = LinearScale::new((low, low + width), (0.0, 500.0));
            for tick in scale.ticks(10) {
                prop_assert!(tick >= low - 1e-9 && tick <= low + width + 1e-9);
            }
        }
    }
}

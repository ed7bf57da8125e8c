//! Chart Plotter Module
//! Colour maps, palettes and point-size scaling shared by the chart renderers.

use plotters::style::RGBColor;

/// Diverging map used for the heatmaps (blue → grey → red).
pub const COOLWARM: [(f64, RGBColor); 5] = [
    (0.0, RGBColor(59, 76, 192)),
    (0.25, RGBColor(141, 176, 254)),
    (0.5, RGBColor(221, 221, 221)),
    (0.75, RGBColor(244, 154, 123)),
    (1.0, RGBColor(180, 4, 38)),
];

/// Perceptually uniform map used for categorical hues (black → purple → cream).
pub const MAGMA: [(f64, RGBColor); 5] = [
    (0.0, RGBColor(0, 0, 4)),
    (0.25, RGBColor(81, 18, 124)),
    (0.5, RGBColor(183, 55, 121)),
    (0.75, RGBColor(252, 137, 97)),
    (1.0, RGBColor(252, 253, 191)),
];

/// Fill for pivot cells that no row contributed to.
pub const MISSING_CELL: RGBColor = RGBColor(240, 240, 240);

/// Marker areas (in square pixels) for the smallest and largest sized value.
pub const SIZE_RANGE: (f64, f64) = (20.0, 200.0);

/// Sample a colour map at `t` in [0, 1] by linear interpolation.
pub fn sample(map: &[(f64, RGBColor)], t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };

    for pair in map.windows(2) {
        let (t0, RGBColor(r0, g0, b0)) = pair[0];
        let (t1, RGBColor(r1, g1, b1)) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
            return RGBColor(mix(r0, r1), mix(g0, g1), mix(b0, b1));
        }
    }

    map.last().map(|&(_, c)| c).unwrap_or(RGBColor(0, 0, 0))
}

/// `n` distinct colours, skipping both extremes of the map.
pub fn palette(map: &[(f64, RGBColor)], n: usize, reversed: bool) -> Vec<RGBColor> {
    (0..n)
        .map(|i| {
            let t = (i + 1) as f64 / (n + 1) as f64;
            sample(map, if reversed { 1.0 - t } else { t })
        })
        .collect()
}

/// Black text on light backgrounds, white on dark ones.
pub fn annotation_color(background: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = background;
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    let luminance = 0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b);

    if luminance > 0.408 {
        RGBColor(38, 38, 38)
    } else {
        RGBColor(255, 255, 255)
    }
}

/// Linear map from a value domain into the [0, 1] colour range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}

/// Maps a value domain onto marker areas in `SIZE_RANGE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeScale {
    min: f64,
    max: f64,
}

impl SizeScale {
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if min.is_finite() {
            Self { min, max }
        } else {
            Self { min: 0.0, max: 0.0 }
        }
    }

    pub fn area(&self, value: f64) -> f64 {
        let (small, large) = SIZE_RANGE;
        if self.max > self.min {
            let f = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
            small + (large - small) * f
        } else {
            (small + large) / 2.0
        }
    }

    /// Marker radius in pixels for `value`.
    pub fn radius(&self, value: f64) -> i32 {
        (self.area(value) / std::f64::consts::PI).sqrt().round().max(1.0) as i32
    }
}

/// Padded (min, max) of `values`, or (0, 1) when there are none.
pub fn padded_range(values: impl IntoIterator<Item = f64>, pad_fraction: f64) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return (0.0, 1.0);
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * pad_fraction
    } else {
        min.abs().max(1.0) * pad_fraction
    };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_hits_anchor_points() {
        assert_eq!(sample(&COOLWARM, 0.0), RGBColor(59, 76, 192));
        assert_eq!(sample(&COOLWARM, 0.5), RGBColor(221, 221, 221));
        assert_eq!(sample(&COOLWARM, 1.0), RGBColor(180, 4, 38));
        assert_eq!(sample(&COOLWARM, 7.0), RGBColor(180, 4, 38));
        assert_eq!(sample(&COOLWARM, -1.0), RGBColor(59, 76, 192));
    }

    #[test]
    fn sample_interpolates_between_anchors() {
        let RGBColor(r, _, _) = sample(&MAGMA, 0.125);
        assert!(r > 0 && r < 81);
    }

    #[test]
    fn palette_skips_extremes_and_reverses() {
        let forward = palette(&MAGMA, 3, false);
        assert_eq!(forward.len(), 3);
        assert_eq!(forward[0], sample(&MAGMA, 0.25));
        assert_eq!(forward[1], sample(&MAGMA, 0.5));
        assert_eq!(forward[2], sample(&MAGMA, 0.75));

        let reversed = palette(&MAGMA, 3, true);
        assert_eq!(reversed[0], forward[2]);
        assert_eq!(reversed[2], forward[0]);
        assert!(palette(&MAGMA, 0, false).is_empty());
    }

    #[test]
    fn annotation_contrasts_with_background() {
        assert_eq!(annotation_color(RGBColor(255, 255, 255)), RGBColor(38, 38, 38));
        assert_eq!(annotation_color(RGBColor(59, 76, 192)), RGBColor(255, 255, 255));
    }

    #[test]
    fn color_scale_normalizes_and_handles_flat_domain() {
        let scale = ColorScale::new(10.0, 20.0);
        assert_eq!(scale.normalize(15.0), 0.5);
        assert_eq!(scale.normalize(25.0), 1.0);
        assert_eq!(ColorScale::new(3.0, 3.0).normalize(3.0), 0.5);
    }

    #[test]
    fn size_scale_spans_area_range() {
        let scale = SizeScale::from_values([1.0, 5.0, 9.0]);
        assert_eq!(scale.area(1.0), 20.0);
        assert_eq!(scale.area(9.0), 200.0);
        assert_eq!(scale.area(5.0), 110.0);
        assert!(scale.radius(1.0) < scale.radius(9.0));

        let flat = SizeScale::from_values([4.0, 4.0]);
        assert_eq!(flat.area(4.0), 110.0);
        assert_eq!(SizeScale::from_values([]).area(1.0), 110.0);
    }

    #[test]
    fn padded_range_grows_both_ends() {
        assert_eq!(padded_range([0.0, 10.0], 0.1), (-1.0, 11.0));
        assert_eq!(padded_range([5.0], 0.1), (4.5, 5.5));
        assert_eq!(padded_range(Vec::<f64>::new(), 0.1), (0.0, 1.0));
    }
}

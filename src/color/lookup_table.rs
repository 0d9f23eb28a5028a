//! Indexed color tables

use log::debug;

use super::transfer::{ColorSpace, ColorTransferFunction};

/// Table of RGBA entries spread evenly over a scalar range
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    table: Vec<[f64; 4]>,
    range: [f64; 2],
}

impl Default for LookupTable {
    /// 256 entry rainbow from red to blue over `[0, 1]`
    fn default() -> Self {
        Self::rainbow(256)
    }
}

impl LookupTable {
    /// Rainbow table with hue running from 0 to 2/3 at full saturation and value
    pub fn rainbow(n: usize) -> Self {
        let n = n.max(1);
        let step = if n > 1 {
            (2.0 / 3.0) / (n - 1) as f64
        } else {
            0.0
        };
        let table = (0..n)
            .map(|i| {
                let [r, g, b] = hsv_to_rgb(i as f64 * step, 1.0, 1.0);
                [r, g, b, 1.0]
            })
            .collect();
        Self {
            table,
            range: [0.0, 1.0],
        }
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    pub fn set_range(&mut self, range: [f64; 2]) {
        self.range = range;
    }

    /// Overwrites entry `index`; out-of-range indices are ignored
    pub fn set_table_value(&mut self, index: usize, rgba: [f64; 4]) {
        if let Some(entry) = self.table.get_mut(index) {
            *entry = rgba.map(|c| c.clamp(0.0, 1.0));
        }
    }

    pub fn table_value(&self, index: usize) -> Option<[f64; 4]> {
        self.table.get(index).copied()
    }

    /// Table index for `value` when the table spans `range`
    ///
    /// Values outside the range clamp to the first or last entry.
    pub fn index(&self, value: f64, [lo, hi]: [f64; 2]) -> usize {
        let n = self.table.len();
        if n == 0 {
            return 0;
        }
        let span = hi - lo;
        if span.abs() <= f64::EPSILON || value.is_nan() {
            return 0;
        }
        let scaled = (value - lo) * n as f64 / span;
        if scaled <= 0.0 {
            0
        } else {
            (scaled as usize).min(n - 1)
        }
    }

    /// Maps `value` through the table stretched over `range`
    pub fn map_scalar(&self, value: f64, range: [f64; 2]) -> [f64; 4] {
        self.table
            .get(self.index(value, range))
            .copied()
            .unwrap_or([0.0, 0.0, 0.0, 1.0])
    }

    /// RGB for `value` over the table's own range
    pub fn color(&self, value: f64) -> [f64; 3] {
        let [r, g, b, _] = self.map_scalar(value, self.range);
        [r, g, b]
    }

    /// Entry `index` as 8-bit RGB, truncating like an integer cast
    pub fn rgb8(&self, index: usize) -> Option<[u8; 3]> {
        let [r, g, b, _] = self.table_value(index)?;
        Some([to_byte(r), to_byte(g), to_byte(b)])
    }
}

fn to_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0) as u8
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    const SIXTH: f64 = 1.0 / 6.0;
    const THIRD: f64 = 1.0 / 3.0;
    const TWO_THIRDS: f64 = 2.0 / 3.0;
    const FIVE_SIXTHS: f64 = 5.0 / 6.0;

    let [r, g, b] = if h > SIXTH && h <= THIRD {
        [(THIRD - h) / SIXTH, 1.0, 0.0]
    } else if h > THIRD && h <= 0.5 {
        [0.0, 1.0, (h - THIRD) / SIXTH]
    } else if h > 0.5 && h <= TWO_THIRDS {
        [0.0, (TWO_THIRDS - h) / SIXTH, 1.0]
    } else if h > TWO_THIRDS && h <= FIVE_SIXTHS {
        [(h - TWO_THIRDS) / SIXTH, 0.0, 1.0]
    } else if h > FIVE_SIXTHS && h <= 1.0 {
        [1.0, 0.0, (1.0 - h) / SIXTH]
    } else {
        [1.0, h / SIXTH, 0.0]
    };
    [r, g, b].map(|c| (s * c + (1.0 - s)) * v)
}

/// Diverging blue-red-gold table with `num_values` entries
///
/// Entry `i` is the transfer function sampled at `i / num_values`.
pub fn create_color_table(num_values: usize) -> LookupTable {
    let mut ctf = ColorTransferFunction::new(ColorSpace::Diverging);
    ctf.add_rgb_point(0.0, rgb8_to_unit([0, 117, 173]));
    ctf.add_rgb_point(0.5, rgb8_to_unit([173, 0, 32]));
    ctf.add_rgb_point(1.0, rgb8_to_unit([173, 142, 0]));

    let table = (0..num_values)
        .map(|i| {
            let [r, g, b] = ctf.color(i as f64 / num_values as f64);
            [r, g, b, 1.0].map(|c| c.clamp(0.0, 1.0))
        })
        .collect();
    debug!("Built diverging color table with {num_values} entries");
    LookupTable {
        table,
        range: [0.0, 1.0],
    }
}

/// `num_values - 1` byte colors sampled from `lut` at `i / (num_values - 1)`
pub fn make_cell_data(num_values: usize, lut: &LookupTable) -> Vec<[u8; 3]> {
    if num_values < 2 {
        return Vec::new();
    }
    (1..num_values)
        .map(|i| {
            let [r, g, b] = lut.color(i as f64 / (num_values - 1) as f64);
            [to_byte(r), to_byte(g), to_byte(b)]
        })
        .collect()
}

fn rgb8_to_unit(rgb: [u8; 3]) -> [f64; 3] {
    rgb.map(|c| c as f64 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_default_rainbow() {
        let lut = LookupTable::default();
        assert_eq!(lut.len(), 256);
        assert_eq!(lut.table_value(0), Some([1.0, 0.0, 0.0, 1.0]));
        let last = lut.table_value(255).unwrap();
        assert_abs_diff_eq!(last[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(last[2], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_index_clamps_and_scales() {
        let lut = LookupTable::rainbow(10);
        assert_eq!(lut.index(-1.0, [0.0, 1.0]), 0);
        assert_eq!(lut.index(0.0, [0.0, 1.0]), 0);
        assert_eq!(lut.index(0.55, [0.0, 1.0]), 5);
        assert_eq!(lut.index(1.0, [0.0, 1.0]), 9);
        assert_eq!(lut.index(9.0, [0.0, 1.0]), 9);
        assert_eq!(lut.index(3.5, [0.0, 7.0]), 5);
        assert_eq!(lut.index(3.0, [2.0, 2.0]), 0);
    }

    #[test]
    fn test_set_table_value() {
        let mut lut = LookupTable::rainbow(3);
        lut.set_table_value(1, [0.5, 2.0, -1.0, 1.0]);
        assert_eq!(lut.table_value(1), Some([0.5, 1.0, 0.0, 1.0]));
        assert_eq!(lut.rgb8(1), Some([127, 255, 0]));
        lut.set_table_value(5, [0.0; 4]);
        assert_eq!(lut.len(), 3);
        assert_eq!(lut.rgb8(3), None);
    }

    #[test]
    fn test_color_table_entries_are_valid() {
        for n in [0, 1, 2, 7, 16, 256] {
            let lut = create_color_table(n);
            assert_eq!(lut.len(), n);
            for i in 0..n {
                let rgba = lut.table_value(i).unwrap();
                assert!(rgba.iter().all(|c| (0.0..=1.0).contains(c)), "{rgba:?}");
                assert!(lut.rgb8(i).is_some());
            }
        }
    }

    #[test]
    fn test_empty_color_table_maps_to_black() {
        let lut = create_color_table(0);
        assert!(lut.is_empty());
        assert_eq!(lut.table_value(0), None);
        assert_eq!(lut.color(0.5), [0.0, 0.0, 0.0]);
        assert!(make_cell_data(0, &lut).is_empty());
    }

    #[test]
    fn test_color_table_starts_at_first_control_point() {
        let lut = create_color_table(7);
        let first = lut.table_value(0).unwrap();
        assert_abs_diff_eq!(first[0], 0.0);
        assert_abs_diff_eq!(first[1], 117.0 / 255.0, epsilon = 1e-12);
        assert_abs_diff_eq!(first[2], 173.0 / 255.0, epsilon = 1e-12);
    }

    #[test]
    fn test_cell_data() {
        let lut = create_color_table(7);
        let colors = make_cell_data(7, &lut);
        assert_eq!(colors.len(), 6);
        // 1.0 lands on the last table entry
        assert_eq!(Some(colors[5]), lut.rgb8(6));
        assert!(make_cell_data(1, &lut).is_empty());
    }
}

//! Piecewise color transfer functions
//!
//! Diverging interpolation follows Moreland, "Diverging Color Maps for
//! Scientific Visualization" (2009): colors are blended in the polar Msh form
//! of CIELAB and a neutral midpoint is inserted between distinct saturated
//! colors.

use std::f64::consts::PI;

/// Color space used between control points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorSpace {
    #[default]
    Rgb,
    Diverging,
}

/// Maps scalars to RGB through sorted control points
///
/// Values outside the control point range clamp to the end colors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorTransferFunction {
    color_space: ColorSpace,
    points: Vec<(f64, [f64; 3])>,
}

impl ColorTransferFunction {
    pub fn new(color_space: ColorSpace) -> Self {
        Self {
            color_space,
            points: Vec::new(),
        }
    }

    pub fn set_color_space(&mut self, color_space: ColorSpace) {
        self.color_space = color_space;
    }

    /// Adds a control point, replacing any existing one at `x`
    pub fn add_rgb_point(&mut self, x: f64, rgb: [f64; 3]) {
        match self.points.binary_search_by(|(px, _)| px.total_cmp(&x)) {
            Ok(i) => self.points[i].1 = rgb,
            Err(i) => self.points.insert(i, (x, rgb)),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn range(&self) -> Option<[f64; 2]> {
        Some([self.points.first()?.0, self.points.last()?.0])
    }

    /// Color at `x`, black when there are no control points
    pub fn color(&self, x: f64) -> [f64; 3] {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return [0.0; 3];
        };
        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }

        let upper = self.points.partition_point(|(px, _)| *px <= x);
        let (x0, c0) = self.points[upper - 1];
        let (x1, c1) = self.points[upper];
        let s = (x - x0) / (x1 - x0);
        match self.color_space {
            ColorSpace::Rgb => [
                c0[0] + s * (c1[0] - c0[0]),
                c0[1] + s * (c1[1] - c0[1]),
                c0[2] + s * (c1[2] - c0[2]),
            ],
            ColorSpace::Diverging => interpolate_diverging(s, c0, c1),
        }
    }
}

fn interpolate_diverging(mut s: f64, rgb1: [f64; 3], rgb2: [f64; 3]) -> [f64; 3] {
    let mut msh1 = lab_to_msh(rgb_to_lab(rgb1));
    let mut msh2 = lab_to_msh(rgb_to_lab(rgb2));

    // Distinct saturated ends get a white midpoint
    if msh1[1] > 0.05 && msh2[1] > 0.05 && angle_diff(msh1[2], msh2[2]) > 0.33 * PI {
        let mid = msh1[0].max(msh2[0]).max(88.0);
        if s < 0.5 {
            msh2 = [mid, 0.0, 0.0];
            s *= 2.0;
        } else {
            msh1 = [mid, 0.0, 0.0];
            s = 2.0 * s - 1.0;
        }
    }

    // An unsaturated end has no meaningful hue, borrow the other one
    if msh1[1] < 0.05 && msh2[1] > 0.05 {
        msh1[2] = adjust_hue(msh2, msh1[0]);
    } else if msh2[1] < 0.05 && msh1[1] > 0.05 {
        msh2[2] = adjust_hue(msh1, msh2[0]);
    }

    let msh = [
        (1.0 - s) * msh1[0] + s * msh2[0],
        (1.0 - s) * msh1[1] + s * msh2[1],
        (1.0 - s) * msh1[2] + s * msh2[2],
    ];
    lab_to_rgb(msh_to_lab(msh))
}

fn angle_diff(a: f64, b: f64) -> f64 {
    let mut diff = (a - b).abs();
    while diff >= 2.0 * PI {
        diff -= 2.0 * PI;
    }
    if diff > PI {
        diff = 2.0 * PI - diff;
    }
    diff
}

fn adjust_hue(msh: [f64; 3], unsaturated_m: f64) -> f64 {
    if msh[0] >= unsaturated_m - 0.1 {
        return msh[2];
    }
    let spin = msh[1] * (unsaturated_m * unsaturated_m - msh[0] * msh[0]).sqrt()
        / (msh[0] * msh[1].sin());
    if msh[2] > -0.3 * PI {
        msh[2] + spin
    } else {
        msh[2] - spin
    }
}

fn lab_to_msh([l, a, b]: [f64; 3]) -> [f64; 3] {
    let m = (l * l + a * a + b * b).sqrt();
    let s = if m > 0.001 { (l / m).acos() } else { 0.0 };
    let h = if s > 0.001 { b.atan2(a) } else { 0.0 };
    [m, s, h]
}

fn msh_to_lab([m, s, h]: [f64; 3]) -> [f64; 3] {
    [m * s.cos(), m * s.sin() * h.cos(), m * s.sin() * h.sin()]
}

// D65 reference white
const WHITE: [f64; 3] = [0.9505, 1.0, 1.089];

pub(crate) fn rgb_to_lab(rgb: [f64; 3]) -> [f64; 3] {
    let linear = rgb.map(|c| {
        if c > 0.04045 {
            ((c + 0.055) / 1.055).powf(2.4)
        } else {
            c / 12.92
        }
    });
    let [r, g, b] = linear;
    let xyz = [
        r * 0.4124 + g * 0.3576 + b * 0.1805,
        r * 0.2126 + g * 0.7152 + b * 0.0722,
        r * 0.0193 + g * 0.1192 + b * 0.9505,
    ];

    let mut f = [0.0; 3];
    for i in 0..3 {
        let v = xyz[i] / WHITE[i];
        f[i] = if v > 0.008856 {
            v.cbrt()
        } else {
            7.787 * v + 16.0 / 116.0
        };
    }
    [116.0 * f[1] - 16.0, 500.0 * (f[0] - f[1]), 200.0 * (f[1] - f[2])]
}

pub(crate) fn lab_to_rgb([l, a, b]: [f64; 3]) -> [f64; 3] {
    let fy = (l + 16.0) / 116.0;
    let f = [a / 500.0 + fy, fy, fy - b / 200.0];
    let mut xyz = [0.0; 3];
    for i in 0..3 {
        let cube = f[i].powi(3);
        let v = if cube > 0.008856 {
            cube
        } else {
            (f[i] - 16.0 / 116.0) / 7.787
        };
        xyz[i] = v * WHITE[i];
    }

    let [x, y, z] = xyz;
    let linear = [
        x * 3.2406 + y * -1.5372 + z * -0.4986,
        x * -0.9689 + y * 1.8758 + z * 0.0415,
        x * 0.0557 + y * -0.2040 + z * 1.0570,
    ];
    let mut rgb = linear.map(|c| {
        if c > 0.0031308 {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        } else {
            12.92 * c
        }
    });

    // Pull out-of-gamut colors back into the unit cube
    let max = rgb[0].max(rgb[1]).max(rgb[2]);
    if max > 1.0 {
        rgb = rgb.map(|c| c / max);
    }
    rgb.map(|c| c.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_lab_round_trip_of_primaries() {
        for rgb in [[1.0, 0.0, 0.0], [0.2, 0.5, 0.7], [1.0, 1.0, 1.0]] {
            let back = lab_to_rgb(rgb_to_lab(rgb));
            for i in 0..3 {
                assert_abs_diff_eq!(back[i], rgb[i], epsilon = 2e-3);
            }
        }
        let white = rgb_to_lab([1.0, 1.0, 1.0]);
        assert_abs_diff_eq!(white[0], 100.0, epsilon = 0.1);
    }

    #[test]
    fn test_rgb_interpolation_and_clamping() {
        let mut ctf = ColorTransferFunction::new(ColorSpace::Rgb);
        ctf.add_rgb_point(1.0, [1.0, 1.0, 1.0]);
        ctf.add_rgb_point(0.0, [0.0, 0.0, 0.0]);
        assert_eq!(ctf.range(), Some([0.0, 1.0]));
        assert_eq!(ctf.color(0.25), [0.25, 0.25, 0.25]);
        assert_eq!(ctf.color(-3.0), [0.0; 3]);
        assert_eq!(ctf.color(7.0), [1.0; 3]);

        ctf.add_rgb_point(1.0, [1.0, 0.0, 0.0]);
        assert_eq!(ctf.len(), 2);
        assert_eq!(ctf.color(1.0), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_diverging_hits_control_points() {
        let mut ctf = ColorTransferFunction::new(ColorSpace::Diverging);
        let blue = [0.0, 117.0 / 255.0, 173.0 / 255.0];
        let red = [173.0 / 255.0, 0.0, 32.0 / 255.0];
        ctf.add_rgb_point(0.0, blue);
        ctf.add_rgb_point(1.0, red);
        assert_eq!(ctf.color(0.0), blue);
        assert_eq!(ctf.color(1.0), red);

        // Blue and red are far apart in hue, so the middle is near white
        let mid = ctf.color(0.5);
        assert!(mid.iter().all(|&c| c > 0.75), "{mid:?}");
        // Just inside either end stays close to that end
        let near = ctf.color(1e-4);
        for i in 0..3 {
            assert_abs_diff_eq!(near[i], blue[i], epsilon = 1e-2);
        }
    }

    #[test]
    fn test_empty_function_is_black() {
        assert_eq!(ColorTransferFunction::default().color(0.5), [0.0; 3]);
    }
}

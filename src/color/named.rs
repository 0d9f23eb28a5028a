//! Colors by name

use std::collections::HashMap;

use crate::error::{Error, Result};

const BUILTIN: &[(&str, [u8; 3])] = &[
    ("AliceBlue", [240, 248, 255]),
    ("Banana", [227, 207, 87]),
    ("Beige", [245, 245, 220]),
    ("Black", [0, 0, 0]),
    ("Blue", [0, 0, 255]),
    ("Cornsilk", [255, 248, 220]),
    ("Crimson", [220, 20, 60]),
    ("DarkSlateGray", [47, 79, 79]),
    ("DimGray", [105, 105, 105]),
    ("Flesh", [255, 125, 64]),
    ("Gold", [255, 215, 0]),
    ("Gray", [128, 128, 128]),
    ("Green", [0, 128, 0]),
    ("Ivory", [255, 255, 240]),
    ("Khaki", [240, 230, 140]),
    ("Lavender", [230, 230, 250]),
    ("LightGray", [211, 211, 211]),
    ("LightSlateGray", [119, 136, 153]),
    ("MidnightBlue", [25, 25, 112]),
    ("Mint", [189, 252, 201]),
    ("Navy", [0, 0, 128]),
    ("Orange", [255, 165, 0]),
    ("Peacock", [51, 161, 201]),
    ("Red", [255, 0, 0]),
    ("Salmon", [250, 128, 114]),
    ("Silver", [192, 192, 192]),
    ("SlateGray", [112, 128, 144]),
    ("SteelBlue", [70, 130, 180]),
    ("Tan", [210, 180, 140]),
    ("Tomato", [255, 99, 71]),
    ("Wheat", [245, 222, 179]),
    ("White", [255, 255, 255]),
    ("Yellow", [255, 255, 0]),
];

/// Built-in named colors plus user-defined entries
///
/// Lookups ignore ASCII case. User entries shadow built-in ones.
#[derive(Debug, Clone, Default)]
pub struct NamedColors {
    custom: HashMap<String, [u8; 4]>,
}

impl NamedColors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color(&mut self, name: &str, rgba: [u8; 4]) {
        self.custom.insert(name.to_ascii_lowercase(), rgba);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.color4ub(name).is_ok()
    }

    pub fn color4ub(&self, name: &str) -> Result<[u8; 4]> {
        if let Some(rgba) = self.custom.get(&name.to_ascii_lowercase()) {
            return Ok(*rgba);
        }
        BUILTIN
            .iter()
            .find(|(builtin, _)| builtin.eq_ignore_ascii_case(name))
            .map(|(_, [r, g, b])| [*r, *g, *b, 255])
            .ok_or_else(|| Error::UnknownColor(name.to_owned()))
    }

    /// Color as normalised RGB
    pub fn color3d(&self, name: &str) -> Result<[f32; 3]> {
        let [r, g, b, _] = self.color4ub(name)?;
        Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_ignores_case() {
        let colors = NamedColors::new();
        assert_eq!(colors.color4ub("SlateGray").unwrap(), [112, 128, 144, 255]);
        assert_eq!(colors.color4ub("slategray").unwrap(), [112, 128, 144, 255]);
        assert_eq!(colors.color3d("White").unwrap(), [1.0, 1.0, 1.0]);
        assert_eq!(colors.color3d("black").unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_user_colors() {
        let mut colors = NamedColors::new();
        assert!(!colors.contains("SkinColor"));
        colors.set_color("SkinColor", [255, 125, 64, 255]);
        colors.set_color("BkgColor", [51, 77, 102, 255]);
        assert_eq!(colors.color4ub("skincolor").unwrap(), [255, 125, 64, 255]);
        assert_eq!(colors.color3d("BkgColor").unwrap()[2], 102.0 / 255.0);

        colors.set_color("Ivory", [1, 2, 3, 255]);
        assert_eq!(colors.color4ub("Ivory").unwrap(), [1, 2, 3, 255]);
    }

    #[test]
    fn test_unknown_color() {
        let err = NamedColors::new().color3d("NoSuchColor");
        assert!(matches!(err, Err(Error::UnknownColor(name)) if name == "NoSuchColor"));
    }
}

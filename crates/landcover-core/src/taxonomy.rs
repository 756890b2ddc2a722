//! NLCD class taxonomy: fine codes, tens-digit coarse categories, and the
//! label/color mappings handed to the rendering collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tens-digit land-cover category (41 "Deciduous Forest" → 40 "Forest").
///
/// Every fine code maps to exactly one coarse category by construction of the
/// tens-digit rule. The class-of-interest side of a transition is represented
/// by the distinguished [`CoarseClass::INTEREST`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoarseClass(pub u16);

impl CoarseClass {
    /// Distinguished category for the class-of-interest side of a transition.
    pub const INTEREST: CoarseClass = CoarseClass(99);

    /// Coarse bucket of a fine code by the tens-digit convention.
    pub fn of(code: u16) -> CoarseClass {
        CoarseClass(code / 10 * 10)
    }

    /// Display label, or None for a bucket outside the NLCD taxonomy.
    pub fn label(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "Unclassified",
            10 => "Water",
            20 => "Developed",
            30 => "Barren",
            40 => "Forest",
            50 => "Shrubland",
            70 => "Herbaceous",
            80 => "Agriculture",
            90 => "Wetlands",
            99 => "Class of interest",
            _ => return None,
        })
    }

    /// Category → RGB color (NLCD legend shades).
    pub fn color(self) -> [u8; 3] {
        match self.0 {
            10 => [70, 107, 159],  // open water blue
            20 => [171, 0, 0],     // developed red
            30 => [179, 172, 159], // barren tan
            40 => [28, 99, 48],    // forest green
            50 => [204, 184, 121], // shrub
            70 => [223, 223, 194], // herbaceous
            80 => [220, 217, 57],  // planted/cultivated
            90 => [108, 159, 184], // wetland blue-gray
            _ => [0, 0, 0],
        }
    }
}

impl fmt::Display for CoarseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0.to_string())
    }
}

/// Fine NLCD code → cover class name (2019-edition schema, with the split
/// barren classes and the derived successional sub-types).
pub fn cover_label(code: u16) -> Option<&'static str> {
    Some(match code {
        0 => "Unclassified",
        11 => "Open Water",
        21 => "Developed, Open Space",
        22 => "Developed, Low Intensity",
        23 => "Developed, Medium Intensity",
        24 => "Developed, High Intensity",
        31 => "Barren, Natural",
        32 => "Barren, Anthropogenic",
        41 => "Deciduous Forest",
        42 => "Evergreen Forest",
        43 => "Mixed Forest",
        52 => "Shrub/Scrub",
        56 => "Shrub/Scrub successional",
        71 => "Herbaceous",
        75 => "Harvested/Disturbed",
        81 => "Hay/Pasture",
        82 => "Cultivated Crops",
        90 => "Woody Wetlands",
        95 => "Emergent Herbaceous Wetlands",
        _ => return None,
    })
}

/// Generalized schema code → class name.
pub fn general_label(code: u16) -> Option<&'static str> {
    Some(match code {
        0 => "Undefined",
        1 => "Open Water",
        2 => "Developed",
        3 => "Agriculture",
        4 => "Natural",
        5 => "Successional",
        6 => "Harvested/Disturbed",
        _ => return None,
    })
}

/// Generalized schema code → plot color.
pub fn general_color(code: u16) -> [u8; 3] {
    match code {
        1 => [0, 0, 255],    // blue
        2 => [139, 0, 0],    // dark red
        3 => [218, 165, 32], // goldenrod
        4 => [0, 100, 0],    // dark green
        5 => [50, 205, 50],  // lime green
        6 => [205, 133, 63], // peru
        _ => [0, 0, 0],
    }
}

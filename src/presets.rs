//! Named colors: the constants on the `ColorRGBa` companion, the standard
//! white points on the `ColorXYZa` companion and the CSS presets declared as
//! extension properties.

use std::{collections::HashMap, sync::LazyLock};

use crate::{
    color::{Component, Linearity, Rgba},
    library::{COLOR, PRESETS},
    models::{Model, Xyza},
};

/// How a named constant is defined.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PresetValue {
    /// Components of a `ColorRGBa` with an unknown encoding.
    Rgb(Component, Component, Component, Component),
    /// A packed `0xRRGGBB` value.
    Hex(u32),
    /// An XYZ white point.
    WhitePoint(Component, Component, Component),
}

impl PresetValue {
    /// The color a host paints for this constant.
    pub fn to_rgba(self) -> Rgba {
        match self {
            PresetValue::Rgb(r, g, b, alpha) => Rgba::new(r, g, b, alpha, Linearity::Unknown),
            PresetValue::Hex(hex) => {
                let [_, r, g, b] = hex.to_be_bytes();
                Rgba::from_rgba8([r, g, b, 0xff])
            }
            PresetValue::WhitePoint(x, y, z) => Xyza::new(x, y, z, 1.0).to_rgba(),
        }
    }
}

/// A named color constant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Property {
    /// The package that declares it.
    pub package: &'static str,
    /// The class whose companion it is reached through.
    pub receiver: &'static str,
    /// The constant name.
    pub name: &'static str,
    /// Its value.
    pub value: PresetValue,
}

impl Property {
    /// True for properties declared as extensions outside the receiver's
    /// own package.
    pub fn is_extension(&self) -> bool {
        self.package == PRESETS
    }
}

const fn companion(name: &'static str, value: PresetValue) -> Property {
    Property {
        package: COLOR,
        receiver: "ColorRGBa",
        name,
        value,
    }
}

const fn white_point(name: &'static str, x: Component, z: Component) -> Property {
    Property {
        package: COLOR,
        receiver: "ColorXYZa",
        name,
        value: PresetValue::WhitePoint(x, 1.0, z),
    }
}

static COMPANION: &[Property] = &[
    companion("PINK", PresetValue::Hex(0xffc0cb)),
    companion("BLACK", PresetValue::Rgb(0.0, 0.0, 0.0, 1.0)),
    companion("WHITE", PresetValue::Rgb(1.0, 1.0, 1.0, 1.0)),
    companion("RED", PresetValue::Rgb(1.0, 0.0, 0.0, 1.0)),
    companion("BLUE", PresetValue::Hex(0x0000ff)),
    companion("GREEN", PresetValue::Rgb(0.0, 1.0, 0.0, 1.0)),
    companion("YELLOW", PresetValue::Hex(0xffff00)),
    companion("CYAN", PresetValue::Hex(0x00ffff)),
    companion("MAGENTA", PresetValue::Hex(0xff00ff)),
    companion("GRAY", PresetValue::Rgb(0.5, 0.5, 0.5, 1.0)),
    companion("TRANSPARENT", PresetValue::Rgb(0.0, 0.0, 0.0, 0.0)),
];

#[allow(clippy::excessive_precision)]
static WHITE_POINTS: &[Property] = &[
    Property {
        package: COLOR,
        receiver: "ColorXYZa",
        name: "NEUTRAL",
        value: PresetValue::WhitePoint(Xyza::NEUTRAL.x, Xyza::NEUTRAL.y, Xyza::NEUTRAL.z),
    },
    white_point("SO2_A", 1.0985, 0.35585),
    white_point("SO2_C", 0.98074, 1.18232),
    white_point("SO2_F2", 0.99187, 0.67395),
    white_point("SO2_TL4", 1.00966, 0.64370),
    white_point("SO2_UL3000", 1.08046, 0.39228),
    white_point("SO2_D50", 0.96422, 0.82521),
    white_point("SO2_D60", 0.95265, 1.00883),
    white_point("SO2_D65", 0.95047, 1.08883),
    white_point("SO2_D75", 0.94972, 1.22638),
    white_point("SO10_A", 1.11144, 0.35200),
    white_point("SO10_C", 0.97285, 1.16145),
    white_point("SO10_F2", 1.03280, 0.69026),
    white_point("SO10_TL4", 1.03866, 0.65627),
    white_point("SO10_UL3000", 1.11428, 0.40353),
    white_point("SO10_D50", 0.96720, 0.81427),
    white_point("SO10_D60", 0.95198, 0.99552),
    white_point("SO10_D65", 0.94811, 1.07304),
    white_point("SO10_D75", 0.94416, 1.20641),
];

/// The CSS named colors, minus the ones the companion already defines.
static CSS_COLORS: &[(&str, u32)] = &[
    ("ALICE_BLUE", 0xf0f8ff),
    ("ANTIQUE_WHITE", 0xfaebd7),
    ("AQUA", 0x00ffff),
    ("AQUAMARINE", 0x7fffd4),
    ("AZURE", 0xf0ffff),
    ("BEIGE", 0xf5f5dc),
    ("BISQUE", 0xffe4c4),
    ("BLANCHED_ALMOND", 0xffebcd),
    ("BLUE_VIOLET", 0x8a2be2),
    ("BROWN", 0xa52a2a),
    ("BURLY_WOOD", 0xdeb887),
    ("CADET_BLUE", 0x5f9ea0),
    ("CHARTREUSE", 0x7fff00),
    ("CHOCOLATE", 0xd2691e),
    ("CORAL", 0xff7f50),
    ("CORNFLOWER_BLUE", 0x6495ed),
    ("CORNSILK", 0xfff8dc),
    ("CRIMSON", 0xdc143c),
    ("DARK_BLUE", 0x00008b),
    ("DARK_CYAN", 0x008b8b),
    ("DARK_GOLDEN_ROD", 0xb8860b),
    ("DARK_GRAY", 0xa9a9a9),
    ("DARK_GREEN", 0x006400),
    ("DARK_KHAKI", 0xbdb76b),
    ("DARK_MAGENTA", 0x8b008b),
    ("DARK_OLIVE_GREEN", 0x556b2f),
    ("DARK_ORANGE", 0xff8c00),
    ("DARK_ORCHID", 0x9932cc),
    ("DARK_RED", 0x8b0000),
    ("DARK_SALMON", 0xe9967a),
    ("DARK_SEA_GREEN", 0x8fbc8f),
    ("DARK_SLATE_BLUE", 0x483d8b),
    ("DARK_SLATE_GRAY", 0x2f4f4f),
    ("DARK_TURQUOISE", 0x00ced1),
    ("DARK_VIOLET", 0x9400d3),
    ("DEEP_PINK", 0xff1493),
    ("DEEP_SKY_BLUE", 0x00bfff),
    ("DIM_GRAY", 0x696969),
    ("DODGER_BLUE", 0x1e90ff),
    ("FIRE_BRICK", 0xb22222),
    ("FLORAL_WHITE", 0xfffaf0),
    ("FOREST_GREEN", 0x228b22),
    ("FUCHSIA", 0xff00ff),
    ("GAINSBORO", 0xdcdcdc),
    ("GHOST_WHITE", 0xf8f8ff),
    ("GOLD", 0xffd700),
    ("GOLDEN_ROD", 0xdaa520),
    ("GREEN_YELLOW", 0xadff2f),
    ("HONEYDEW", 0xf0fff0),
    ("HOT_PINK", 0xff69b4),
    ("INDIAN_RED", 0xcd5c5c),
    ("INDIGO", 0x4b0082),
    ("IVORY", 0xfffff0),
    ("KHAKI", 0xf0e68c),
    ("LAVENDER", 0xe6e6fa),
    ("LAVENDER_BLUSH", 0xfff0f5),
    ("LAWN_GREEN", 0x7cfc00),
    ("LEMON_CHIFFON", 0xfffacd),
    ("LIGHT_BLUE", 0xadd8e6),
    ("LIGHT_CORAL", 0xf08080),
    ("LIGHT_CYAN", 0xe0ffff),
    ("LIGHT_GOLDEN_ROD_YELLOW", 0xfafad2),
    ("LIGHT_GRAY", 0xd3d3d3),
    ("LIGHT_GREEN", 0x90ee90),
    ("LIGHT_PINK", 0xffb6c1),
    ("LIGHT_SALMON", 0xffa07a),
    ("LIGHT_SEA_GREEN", 0x20b2aa),
    ("LIGHT_SKY_BLUE", 0x87cefa),
    ("LIGHT_SLATE_GRAY", 0x778899),
    ("LIGHT_STEEL_BLUE", 0xb0c4de),
    ("LIGHT_YELLOW", 0xffffe0),
    ("LIME", 0x00ff00),
    ("LIME_GREEN", 0x32cd32),
    ("LINEN", 0xfaf0e6),
    ("MAROON", 0x800000),
    ("MEDIUM_AQUAMARINE", 0x66cdaa),
    ("MEDIUM_BLUE", 0x0000cd),
    ("MEDIUM_ORCHID", 0xba55d3),
    ("MEDIUM_PURPLE", 0x9370db),
    ("MEDIUM_SEA_GREEN", 0x3cb371),
    ("MEDIUM_SLATE_BLUE", 0x7b68ee),
    ("MEDIUM_SPRING_GREEN", 0x00fa9a),
    ("MEDIUM_TURQUOISE", 0x48d1cc),
    ("MEDIUM_VIOLET_RED", 0xc71585),
    ("MIDNIGHT_BLUE", 0x191970),
    ("MINT_CREAM", 0xf5fffa),
    ("MISTY_ROSE", 0xffe4e1),
    ("MOCCASIN", 0xffe4b5),
    ("NAVAJO_WHITE", 0xffdead),
    ("NAVY", 0x000080),
    ("OLD_LACE", 0xfdf5e6),
    ("OLIVE", 0x808000),
    ("OLIVE_DRAB", 0x6b8e23),
    ("ORANGE", 0xffa500),
    ("ORANGE_RED", 0xff4500),
    ("ORCHID", 0xda70d6),
    ("PALE_GOLDEN_ROD", 0xeee8aa),
    ("PALE_GREEN", 0x98fb98),
    ("PALE_TURQUOISE", 0xafeeee),
    ("PALE_VIOLET_RED", 0xdb7093),
    ("PAPAYA_WHIP", 0xffefd5),
    ("PEACH_PUFF", 0xffdab9),
    ("PERU", 0xcd853f),
    ("PLUM", 0xdda0dd),
    ("POWDER_BLUE", 0xb0e0e6),
    ("PURPLE", 0x800080),
    ("REBECCA_PURPLE", 0x663399),
    ("ROSY_BROWN", 0xbc8f8f),
    ("ROYAL_BLUE", 0x4169e1),
    ("SADDLE_BROWN", 0x8b4513),
    ("SALMON", 0xfa8072),
    ("SANDY_BROWN", 0xf4a460),
    ("SEA_GREEN", 0x2e8b57),
    ("SEA_SHELL", 0xfff5ee),
    ("SIENNA", 0xa0522d),
    ("SILVER", 0xc0c0c0),
    ("SKY_BLUE", 0x87ceeb),
    ("SLATE_BLUE", 0x6a5acd),
    ("SLATE_GRAY", 0x708090),
    ("SNOW", 0xfffafa),
    ("SPRING_GREEN", 0x00ff7f),
    ("STEEL_BLUE", 0x4682b4),
    ("TAN", 0xd2b48c),
    ("TEAL", 0x008080),
    ("THISTLE", 0xd8bfd8),
    ("TOMATO", 0xff6347),
    ("TURQUOISE", 0x40e0d0),
    ("VIOLET", 0xee82ee),
    ("WHEAT", 0xf5deb3),
    ("WHITE_SMOKE", 0xf5f5f5),
    ("YELLOW_GREEN", 0x9acd32),
];

/// Every named constant of the library, in every package.
pub fn properties() -> impl Iterator<Item = Property> {
    COMPANION
        .iter()
        .chain(WHITE_POINTS)
        .copied()
        .chain(CSS_COLORS.iter().map(|&(name, hex)| Property {
            package: PRESETS,
            receiver: "ColorRGBa",
            name,
            value: PresetValue::Hex(hex),
        }))
}

/// The decoded value of every named constant, keyed by receiver class and
/// name, along with the declarations keyed the way resolution asks for them.
pub struct StaticColorTable {
    colors: HashMap<(&'static str, &'static str), Rgba>,
    white_points: HashMap<&'static str, Xyza>,
    companions: HashMap<(&'static str, &'static str, &'static str), Property>,
    extensions: HashMap<(&'static str, &'static str), Property>,
}

static TABLE: LazyLock<StaticColorTable> = LazyLock::new(StaticColorTable::build);

/// The shared table, built on first use.
pub fn static_colors() -> &'static StaticColorTable {
    &TABLE
}

impl StaticColorTable {
    fn build() -> Self {
        let mut colors = HashMap::new();
        let mut white_points = HashMap::new();
        let mut companions = HashMap::new();
        let mut extensions = HashMap::new();

        for property in properties() {
            colors.insert((property.receiver, property.name), property.value.to_rgba());
            if let PresetValue::WhitePoint(x, y, z) = property.value {
                white_points.insert(property.name, Xyza::new(x, y, z, 1.0));
            }
            if property.is_extension() {
                extensions.insert((property.package, property.name), property);
            }
            companions.insert((property.package, property.receiver, property.name), property);
        }

        Self {
            colors,
            white_points,
            companions,
            extensions,
        }
    }

    /// The constant `name` reached through the companion of `receiver`,
    /// declared in `package`.
    pub fn companion(&self, package: &str, receiver: &str, name: &str) -> Option<Property> {
        self.companions.get(&(package, receiver, name)).copied()
    }

    /// The extension property `name` declared at the top level of `package`.
    pub fn extension(&self, package: &str, name: &str) -> Option<Property> {
        self.extensions.get(&(package, name)).copied()
    }

    /// The color of `receiver.name`.
    pub fn color(&self, receiver: &str, name: &str) -> Option<Rgba> {
        self.colors.get(&(receiver, name)).copied()
    }

    /// The white point `ColorXYZa.name`.
    pub fn white_point(&self, name: &str) -> Option<Xyza> {
        self.white_points.get(name).copied()
    }

    /// Look a constant up by name alone, preferring colors over white points.
    pub fn by_name(&self, name: &str) -> Option<Rgba> {
        self.color("ColorRGBa", name)
            .or_else(|| self.color("ColorXYZa", name))
    }

    /// The number of named constants.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// True if the table has no constants.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn companion_colors() {
        let table = static_colors();
        assert_eq!(table.color("ColorRGBa", "RED").map(|c| c.to_rgba8()), Some([255, 0, 0, 255]));
        assert_eq!(table.color("ColorRGBa", "BLUE").map(|c| c.to_rgba8()), Some([0, 0, 255, 255]));
        assert_eq!(
            table.color("ColorRGBa", "TRANSPARENT").map(|c| c.to_rgba8()),
            Some([0, 0, 0, 0])
        );
        assert_eq!(table.color("ColorHSLa", "RED"), None);
    }

    #[test]
    fn css_presets() {
        let table = static_colors();
        assert_eq!(table.by_name("HOT_PINK").map(|c| c.to_hex_string()), Some("#ff69b4".into()));
        assert_eq!(table.by_name("REBECCA_PURPLE").map(|c| c.to_hex_int()), Some(0x663399));
        assert_eq!(table.by_name("NOT_A_COLOR"), None);
    }

    #[test]
    fn names_are_unique_per_receiver() {
        let total = properties().count();
        assert_eq!(static_colors().len(), total);
    }

    #[test]
    fn declarations_by_key() {
        let table = static_colors();
        let red = table.companion(COLOR, "ColorRGBa", "RED").unwrap();
        assert_eq!(red.value, PresetValue::Rgb(1.0, 0.0, 0.0, 1.0));
        assert!(table.companion(COLOR, "ColorXYZa", "SO2_D65").is_some());
        assert_eq!(table.companion(PRESETS, "ColorXYZa", "SO2_D65"), None);

        let pink = table.extension(PRESETS, "HOT_PINK").unwrap();
        assert_eq!(pink.value, PresetValue::Hex(0xff69b4));
        assert_eq!(table.extension(COLOR, "RED"), None);
        assert_eq!(table.extension(PRESETS, "RED"), None);

        for property in properties() {
            let keyed = table.companion(property.package, property.receiver, property.name);
            assert_eq!(keyed, Some(property));
        }
    }

    #[test]
    fn white_points() {
        let table = static_colors();
        assert_eq!(table.white_point("NEUTRAL"), Some(Xyza::NEUTRAL));
        let d50 = table.white_point("SO10_D50").unwrap();
        assert_eq!((d50.x, d50.y, d50.z), (0.96720, 1.0, 0.81427));
        assert!(table.white_point("RED").is_none());
        // Neutral white paints as white.
        assert_eq!(table.by_name("NEUTRAL").map(|c| c.to_rgba8()), Some([255, 255, 255, 255]));
    }
}

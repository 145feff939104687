//! sRGB gamma encoding, hex literals and host pixels for [`Rgba`].

use crate::{
    color::{Component, Components, Linearity, Rgba},
    error::HexFormatError,
    models::{Model, Vector},
};

/// Encode linear light components with the sRGB transfer function.
pub fn to_gamma_encoded(from: &Components) -> Components {
    from.map(|value| {
        let abs = value.abs();

        if abs > 0.0031308 {
            value.signum() * (1.055 * abs.powf(1.0 / 2.4) - 0.055)
        } else {
            12.92 * value
        }
    })
}

/// Decode sRGB gamma encoded components to linear light.
pub fn to_linear_light(from: &Components) -> Components {
    from.map(|value| {
        let abs = value.abs();

        if abs < 0.04045 {
            value / 12.92
        } else {
            value.signum() * ((abs + 0.055) / 1.055).powf(2.4)
        }
    })
}

impl Rgba {
    /// Build a gamma encoded color from 8-bit channels.
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        let [r, g, b, a] = rgba.map(|v| v as Component / 255.0);
        Self::new(r, g, b, a, Linearity::Srgb)
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`, the `#` being
    /// optional. Short forms repeat each digit.
    pub fn from_hex_str(hex: &str) -> Result<Self, HexFormatError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        let nibble = |c: char| -> Result<u8, HexFormatError> {
            c.to_digit(16)
                .map(|d| d as u8)
                .ok_or(HexFormatError::InvalidDigit(c))
        };
        let nibbles = digits.chars().map(nibble).collect::<Result<Vec<_>, _>>()?;

        let channels = match nibbles.len() {
            3 | 4 => nibbles.iter().map(|n| n * 17).collect::<Vec<_>>(),
            6 | 8 => nibbles
                .chunks(2)
                .map(|pair| pair[0] << 4 | pair[1])
                .collect::<Vec<_>>(),
            length => return Err(HexFormatError::InvalidLength(length)),
        };

        Ok(Self::from_rgba8([
            channels[0],
            channels[1],
            channels[2],
            channels.get(3).copied().unwrap_or(0xff),
        ]))
    }

    /// Unpack an integer literal. Values up to `0xffffff` are `0xRRGGBB` and
    /// opaque, larger ones are read as `0xRRGGBBAA`.
    pub fn from_hex_int(value: i64) -> Result<Self, HexFormatError> {
        if !(0..=0xffff_ffff).contains(&value) {
            return Err(HexFormatError::OutOfRange(value));
        }

        let packed = if value > 0xff_ffff {
            value as u32
        } else {
            (value as u32) << 8 | 0xff
        };

        Ok(Self::from_rgba8(packed.to_be_bytes()))
    }

    /// The color with its components in linear light.
    pub fn to_linear(&self) -> Self {
        if self.linearity.is_linear() {
            return *self;
        }

        let Components(r, g, b) = to_linear_light(&self.to_components());
        Self::new(r, g, b, self.alpha, Linearity::Linear)
    }

    /// The color with its components gamma encoded.
    pub fn to_srgb(&self) -> Self {
        if !self.linearity.is_linear() {
            return *self;
        }

        let Components(r, g, b) = to_gamma_encoded(&self.to_components());
        Self::new(r, g, b, self.alpha, Linearity::Srgb)
    }

    /// Convert to the given encoding, keeping the tag when the encoding
    /// already matches.
    pub fn to_linearity(&self, linearity: Linearity) -> Self {
        if linearity.is_linear() {
            self.to_linear()
        } else {
            self.to_srgb()
        }
    }

    /// Clamp all components, alpha included, to `[0, 1]`.
    pub fn clamped(&self) -> Self {
        let [r, g, b, alpha] = self
            .to_vector()
            .map(|v| num_traits::clamp(v, 0.0, 1.0));
        Self::new(r, g, b, alpha, self.linearity)
    }

    /// The color as 8-bit gamma encoded channels, the way a host paints it.
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.to_srgb()
            .clamped()
            .to_vector()
            .map(|v| (v * 255.0).round() as u8)
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when the color is not opaque.
    pub fn to_hex_string(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        if a == 0xff {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }

    /// Pack into `0xRRGGBB`, dropping alpha.
    pub fn to_hex_int(&self) -> u32 {
        let [r, g, b, _] = self.to_rgba8();
        u32::from_be_bytes([0, r, g, b])
    }
}

impl Model for Rgba {
    fn from_rgba(color: &Rgba) -> Self {
        *color
    }

    fn to_rgba(&self) -> Rgba {
        *self
    }
}

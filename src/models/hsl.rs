//! Models with the HSL and HSV notations in the sRGB color space, and their
//! XSL and XSV variants that use an artist's color wheel for hue.

use crate::{
    color::{Component, Components, Linearity, Rgba},
    math::{almost_zero, normalize_hue, remap},
    models::Model,
};

/// Pairs of (xue, hue) where the artist's wheel and the RGB wheel meet.
/// Between them both wheels are linear.
const XUE_KNOTS: [(Component, Component); 7] = [
    (0.0, 0.0),
    (35.0, 60.0),
    (60.0, 120.0),
    (135.0, 180.0),
    (225.0, 240.0),
    (275.0, 300.0),
    (360.0, 360.0),
];

fn map_wheel(value: Component, from: impl Fn(usize) -> Component, to: impl Fn(usize) -> Component) -> Component {
    let value = normalize_hue(value);
    (0..XUE_KNOTS.len() - 1)
        .find(|i| value < from(i + 1))
        .map(|i| remap(from(i), from(i + 1), to(i), to(i + 1), value))
        .unwrap_or(value)
}

/// Map a hue on the artist's wheel to a hue on the RGB wheel.
pub(crate) fn xue_to_hue(xue: Component) -> Component {
    map_wheel(xue, |i| XUE_KNOTS[i].0, |i| XUE_KNOTS[i].1)
}

/// Map a hue on the RGB wheel to a hue on the artist's wheel.
pub(crate) fn hue_to_xue(hue: Component) -> Component {
    map_wheel(hue, |i| XUE_KNOTS[i].1, |i| XUE_KNOTS[i].0)
}

/// Calculate the hue from RGB components and return it along with the min
/// and max RGB values. The hue of a gray is 0.
fn rgb_to_hue_with_min_max(from: &Components) -> (Component, Component, Component) {
    let Components(red, green, blue) = *from;

    let max = from.max();
    let min = red.min(green).min(blue);

    let delta = max - min;

    let hue = if delta != 0.0 {
        60.0 * if max == red {
            (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
        } else if max == green {
            (blue - red) / delta + 2.0
        } else {
            (red - green) / delta + 4.0
        }
    } else {
        0.0
    };

    (hue, min, max)
}

/// Convert from RGB notation to HSL notation.
pub fn rgb_to_hsl(from: &Components) -> Components {
    let (hue, min, max) = rgb_to_hue_with_min_max(from);

    let lightness = (min + max) / 2.0;
    let delta = max - min;

    let saturation =
        if almost_zero(delta) || almost_zero(lightness) || almost_zero(1.0 - lightness) {
            0.0
        } else {
            (max - lightness) / lightness.min(1.0 - lightness)
        };

    Components(hue, saturation, lightness)
}

/// Convert from HSL notation to RGB notation.
pub fn hsl_to_rgb(from: &Components) -> Components {
    let Components(hue, saturation, lightness) = *from;

    if saturation <= 0.0 {
        return Components(lightness, lightness, lightness);
    }

    let hue = normalize_hue(hue);

    macro_rules! f {
        ($n:expr) => {{
            let k = ($n + hue / 30.0) % 12.0;
            let a = saturation * lightness.min(1.0 - lightness);
            lightness - a * (k - 3.0).min(9.0 - k).clamp(-1.0, 1.0)
        }};
    }

    Components(f!(0.0), f!(8.0), f!(4.0))
}

/// Convert from RGB notation to HSV notation.
pub fn rgb_to_hsv(from: &Components) -> Components {
    let (hue, min, max) = rgb_to_hue_with_min_max(from);

    let saturation = if almost_zero(max) {
        0.0
    } else {
        (max - min) / max
    };

    Components(hue, saturation, max)
}

/// Convert from HSV notation to RGB notation.
pub fn hsv_to_rgb(from: &Components) -> Components {
    let Components(hue, saturation, value) = *from;
    let hue = normalize_hue(hue);

    macro_rules! f {
        ($n:expr) => {{
            let k = ($n + hue / 60.0) % 6.0;
            value - value * saturation * k.min(4.0 - k).clamp(0.0, 1.0)
        }};
    }

    Components(f!(5.0), f!(3.0), f!(1.0))
}

fn srgb(components: Components, alpha: Component) -> Rgba {
    Rgba::new(components.0, components.1, components.2, alpha, Linearity::Srgb)
}

colorsite_macros::gen_model! {
    /// A color specified with the HSL notation in the sRGB color space.
    pub struct Hsla {
        /// The hue component of the color, in degrees.
        pub h: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The lightness component of the color.
        pub l: Component,
    }
}

impl Model for Hsla {
    fn from_rgba(color: &Rgba) -> Self {
        let Components(h, s, l) = rgb_to_hsl(&color.to_srgb().to_components());
        Hsla::new(h, s, l, color.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        srgb(hsl_to_rgb(&self.to_components()), self.alpha)
    }
}

colorsite_macros::gen_model! {
    /// A color specified with the HSV notation in the sRGB color space.
    pub struct Hsva {
        /// The hue component of the color, in degrees.
        pub h: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The value component of the color.
        pub v: Component,
    }
}

impl Model for Hsva {
    fn from_rgba(color: &Rgba) -> Self {
        let Components(h, s, v) = rgb_to_hsv(&color.to_srgb().to_components());
        Hsva::new(h, s, v, color.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        srgb(hsv_to_rgb(&self.to_components()), self.alpha)
    }
}

colorsite_macros::gen_model! {
    /// HSL with the hue taken from the artist's color wheel.
    pub struct Xsla {
        /// The xue component of the color, in degrees.
        pub x: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The lightness component of the color.
        pub l: Component,
    }
}

impl Model for Xsla {
    fn from_rgba(color: &Rgba) -> Self {
        let hsl = Hsla::from_rgba(color);
        Xsla::new(hue_to_xue(hsl.h), hsl.s, hsl.l, hsl.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        Hsla::new(xue_to_hue(self.x), self.s, self.l, self.alpha).to_rgba()
    }
}

colorsite_macros::gen_model! {
    /// HSV with the hue taken from the artist's color wheel.
    pub struct Xsva {
        /// The xue component of the color, in degrees.
        pub x: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The value component of the color.
        pub v: Component,
    }
}

impl Model for Xsva {
    fn from_rgba(color: &Rgba) -> Self {
        let hsv = Hsva::from_rgba(color);
        Xsva::new(hue_to_xue(hsv.h), hsv.s, hsv.v, hsv.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        Hsva::new(xue_to_hue(self.x), self.s, self.v, self.alpha).to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn rgb_to_hsl() {
        let srgb = Rgba::new(0.46, 0.52, 0.28, 0.5, Linearity::Srgb);
        let hsl = Hsla::from_rgba(&srgb);
        assert_component_eq!(hsl.h, 75.0);
        assert_component_eq!(hsl.s, 0.3);
        assert_component_eq!(hsl.l, 0.4);
        assert_component_eq!(hsl.alpha, 0.5);
    }

    #[test]
    fn hsv_magenta() {
        let c = Hsva::new(300.0, 1.0, 1.0, 1.0).to_rgba();
        assert_eq!(c.to_rgba8(), [255, 0, 255, 255]);
        let back = Hsva::from_rgba(&c);
        assert_component_eq!(back.h, 300.0);
        assert_component_eq!(back.s, 1.0);
        assert_component_eq!(back.v, 1.0);
    }

    #[test]
    fn hsv_round_trip() {
        let c = Rgba::new(0.9, 0.585, 0.8805, 0.4, Linearity::Srgb);
        let hsv = Hsva::from_rgba(&c);
        let back = hsv.to_rgba();
        assert_component_eq!(back.r, c.r);
        assert_component_eq!(back.g, c.g);
        assert_component_eq!(back.b, c.b);
    }

    #[test]
    fn gray_has_no_saturation() {
        let gray = Rgba::new(0.5, 0.5, 0.5, 1.0, Linearity::Srgb);
        let hsl = Hsla::from_rgba(&gray);
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
    }

    #[test]
    fn linear_input_is_encoded_first() {
        let linear = Rgba::new(0.2159, 0.2159, 0.2159, 1.0, Linearity::Linear);
        let hsv = Hsva::from_rgba(&linear);
        assert_component_eq!(hsv.v, 0.502, 1e-3);
    }

    #[test]
    fn xue_wheel() {
        assert_component_eq!(xue_to_hue(35.0), 60.0);
        assert_component_eq!(xue_to_hue(100.0), 120.0 + 60.0 * 40.0 / 75.0);
        assert_component_eq!(hue_to_xue(240.0), 225.0);
        assert_component_eq!(xue_to_hue(-85.0), 300.0);
        for x in [0.0, 10.0, 59.0, 200.0, 300.0, 359.0] {
            assert_component_eq!(hue_to_xue(xue_to_hue(x)), x);
        }
    }

    #[test]
    fn xsl_round_trip() {
        let c = Rgba::new(0.2, 0.7, 0.4, 1.0, Linearity::Srgb);
        for back in [
            Xsla::from_rgba(&c).to_rgba(),
            Xsva::from_rgba(&c).to_rgba(),
        ] {
            assert_component_eq!(back.r, c.r);
            assert_component_eq!(back.g, c.g);
            assert_component_eq!(back.b, c.b);
        }
    }
}

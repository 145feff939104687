//! Models for CIE-Lab in its rectangular, polar and saturation forms. All of
//! them are relative to a reference white point.

use crate::{
    color::{Component, Components, Rgba},
    math::{almost_zero, normalize_hue},
    models::{ReferenceWhitePoint, Xyza},
};

pub(crate) const KAPPA: Component = 24389.0 / 27.0;
pub(crate) const EPSILON: Component = 216.0 / 24389.0;

/// Split rectangular `a` and `b` into chroma and a hue in degrees. The hue of
/// a color without chroma is 0.
pub(crate) fn to_polar(a: Component, b: Component) -> (Component, Component) {
    let chroma = (a * a + b * b).sqrt();
    let hue = if almost_zero(chroma) {
        0.0
    } else {
        normalize_hue(b.atan2(a).to_degrees())
    };
    (chroma, hue)
}

/// Join chroma and a hue in degrees into rectangular `a` and `b`.
pub(crate) fn to_rectangular(chroma: Component, hue: Component) -> (Component, Component) {
    let hue = hue.to_radians();
    (chroma * hue.cos(), chroma * hue.sin())
}

/// Find the largest chroma that still converts into the sRGB gamut. Gamut
/// membership along a chroma ray is an interval starting at 0, so a
/// bisection finds its end.
pub(crate) fn max_chroma(to_linear: impl Fn(Component) -> Rgba) -> Component {
    const LIMIT: Component = 250.0;
    const TOLERANCE: Component = 1e-6;

    let in_gamut = |chroma: Component| {
        let c = to_linear(chroma);
        [c.r, c.g, c.b]
            .iter()
            .all(|v| (-TOLERANCE..=1.0 + TOLERANCE).contains(v))
    };

    if !in_gamut(0.0) {
        return 0.0;
    }

    let (mut low, mut high) = (0.0, LIMIT);
    for _ in 0..32 {
        let mid = (low + high) / 2.0;
        if in_gamut(mid) {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

colorsite_macros::gen_model! {
    /// A color in CIE-Lab, relative to a reference white point.
    pub struct Laba {
        /// The lightness component, 0 to 100.
        pub l: Component,
        /// The green-red component.
        pub a: Component,
        /// The blue-yellow component.
        pub b: Component,
        /// The reference white point.
        pub reference: Xyza,
    }
}

impl Laba {
    /// Convert from XYZ relative to `reference`.
    pub fn from_xyz(xyz: &Xyza, reference: Xyza) -> Self {
        let adapted = Components(
            xyz.x / reference.x,
            xyz.y / reference.y,
            xyz.z / reference.z,
        );

        let Components(f0, f1, f2) = adapted.map(|v| {
            if v > EPSILON {
                v.cbrt()
            } else {
                (KAPPA * v + 16.0) / 116.0
            }
        });

        Laba::new(
            116.0 * f1 - 16.0,
            500.0 * (f0 - f1),
            200.0 * (f1 - f2),
            xyz.alpha,
            reference,
        )
    }

    /// Convert to XYZ.
    pub fn to_xyz(&self) -> Xyza {
        let (lightness, a, b) = (self.l, self.a, self.b);

        let f1 = (lightness + 16.0) / 116.0;
        let f0 = f1 + a / 500.0;
        let f2 = f1 - b / 200.0;

        let f0_cubed = f0 * f0 * f0;
        let x = if f0_cubed > EPSILON {
            f0_cubed
        } else {
            (116.0 * f0 - 16.0) / KAPPA
        };

        let y = if lightness > KAPPA * EPSILON {
            f1 * f1 * f1
        } else {
            lightness / KAPPA
        };

        let f2_cubed = f2 * f2 * f2;
        let z = if f2_cubed > EPSILON {
            f2_cubed
        } else {
            (116.0 * f2 - 16.0) / KAPPA
        };

        Xyza::new(
            x * self.reference.x,
            y * self.reference.y,
            z * self.reference.z,
            self.alpha,
        )
    }

    /// Convert into the polar form.
    pub fn to_lchab(&self) -> Lchaba {
        let (c, h) = to_polar(self.a, self.b);
        Lchaba::new(self.l, c, h, self.alpha, self.reference)
    }
}

impl ReferenceWhitePoint for Laba {
    fn from_vector(v: [Component; 4], reference: Xyza) -> Self {
        Laba::new(v[0], v[1], v[2], v[3], reference)
    }

    fn from_rgba(color: &Rgba, reference: Xyza) -> Self {
        Laba::from_xyz(&Xyza::from_linear(color), reference)
    }

    fn to_rgba(&self) -> Rgba {
        self.to_xyz().to_linear()
    }
}

colorsite_macros::gen_model! {
    /// A color in the polar form of CIE-Lab.
    pub struct Lchaba {
        /// The lightness component, 0 to 100.
        pub l: Component,
        /// The chroma component.
        pub c: Component,
        /// The hue component in degrees.
        pub h: Component,
        /// The reference white point.
        pub reference: Xyza,
    }
}

impl Lchaba {
    /// Convert into the rectangular form.
    pub fn to_laba(&self) -> Laba {
        let (a, b) = to_rectangular(self.c, self.h);
        Laba::new(self.l, a, b, self.alpha, self.reference)
    }

    /// The largest chroma at this lightness and hue that stays in gamut.
    pub fn max_chroma(&self) -> Component {
        max_chroma(|c| Lchaba { c, ..*self }.to_rgba())
    }
}

impl ReferenceWhitePoint for Lchaba {
    fn from_vector(v: [Component; 4], reference: Xyza) -> Self {
        Lchaba::new(v[0], v[1], v[2], v[3], reference)
    }

    fn from_rgba(color: &Rgba, reference: Xyza) -> Self {
        Laba::from_rgba(color, reference).to_lchab()
    }

    fn to_rgba(&self) -> Rgba {
        self.to_laba().to_rgba()
    }
}

colorsite_macros::gen_model! {
    /// CIE-Lab in polar form, with chroma given as a fraction of the largest
    /// chroma in gamut.
    pub struct Lshaba {
        /// The lightness component, 0 to 100.
        pub l: Component,
        /// The saturation component, 0 to 1.
        pub s: Component,
        /// The hue component in degrees.
        pub h: Component,
        /// The reference white point.
        pub reference: Xyza,
    }
}

impl ReferenceWhitePoint for Lshaba {
    fn from_vector(v: [Component; 4], reference: Xyza) -> Self {
        Lshaba::new(v[0], v[1], v[2], v[3], reference)
    }

    fn from_rgba(color: &Rgba, reference: Xyza) -> Self {
        let lch = Lchaba::from_rgba(color, reference);
        let max = lch.max_chroma();
        let s = if almost_zero(max) { 0.0 } else { lch.c / max };
        Lshaba::new(lch.l, s, lch.h, lch.alpha, reference)
    }

    fn to_rgba(&self) -> Rgba {
        let lch = Lchaba::new(self.l, 0.0, self.h, self.alpha, self.reference);
        Lchaba {
            c: self.s * lch.max_chroma(),
            ..lch
        }
        .to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_component_eq, color::Linearity};

    #[test]
    fn white_has_full_lightness() {
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0, Linearity::Srgb);
        let lab = Laba::from_rgba(&white, Xyza::NEUTRAL);
        assert_component_eq!(lab.l, 100.0, 1e-6);
        assert_component_eq!(lab.a, 0.0, 1e-6);
        assert_component_eq!(lab.b, 0.0, 1e-6);
    }

    #[test]
    fn srgb_red_relative_to_d65() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0, Linearity::Srgb);
        let lab = Laba::from_rgba(&red, Xyza::NEUTRAL);
        assert_component_eq!(lab.l, 53.2371, 1e-3);
        assert_component_eq!(lab.a, 80.0901, 1e-3);
        assert_component_eq!(lab.b, 67.2033, 1e-3);
    }

    #[test]
    fn lab_round_trip_with_reference() {
        let reference = Xyza::new(0.9672, 1.0, 0.8143, 1.0);
        let color = Rgba::new(0.2, 0.6, 0.3, 0.7, Linearity::Linear);
        let back = Laba::from_rgba(&color, reference).to_rgba();
        assert_component_eq!(back.r, color.r);
        assert_component_eq!(back.g, color.g);
        assert_component_eq!(back.b, color.b);
        assert_component_eq!(back.alpha, 0.7);
    }

    #[test]
    fn polar_round_trip() {
        let lab = Laba::new(50.0, -20.0, 30.0, 1.0, Xyza::NEUTRAL);
        let lch = lab.to_lchab();
        assert_component_eq!(lch.c, (400.0f64 + 900.0).sqrt());
        let back = lch.to_laba();
        assert_component_eq!(back.a, -20.0);
        assert_component_eq!(back.b, 30.0);
    }

    #[test]
    fn gray_has_no_hue() {
        assert_eq!(to_polar(0.0, 0.0), (0.0, 0.0));
    }

    #[test]
    fn lsh_round_trip() {
        let color = Rgba::new(0.7, 0.2, 0.4, 1.0, Linearity::Srgb);
        let lsh = Lshaba::from_rgba(&color, Xyza::NEUTRAL);
        assert!(lsh.s > 0.0 && lsh.s <= 1.0);
        let back = lsh.to_rgba().to_srgb();
        assert_component_eq!(back.r, color.r, 1e-4);
        assert_component_eq!(back.g, color.g, 1e-4);
        assert_component_eq!(back.b, color.b, 1e-4);
    }
}

//! Models for CIE-Luv in its rectangular, polar and saturation forms.

use crate::{
    color::{Component, Rgba},
    math::almost_zero,
    models::{
        lab::{max_chroma, to_polar, to_rectangular, EPSILON, KAPPA},
        ReferenceWhitePoint, Xyza,
    },
};

/// The u' and v' chromaticity of an XYZ value.
fn chromaticity(xyz: &Xyza) -> Option<(Component, Component)> {
    let denominator = xyz.x + 15.0 * xyz.y + 3.0 * xyz.z;
    if almost_zero(denominator) {
        None
    } else {
        Some((4.0 * xyz.x / denominator, 9.0 * xyz.y / denominator))
    }
}

colorsite_macros::gen_model! {
    /// A color in CIE-Luv, relative to a reference white point.
    pub struct Luva {
        /// The lightness component, 0 to 100.
        pub l: Component,
        /// The u component.
        pub u: Component,
        /// The v component.
        pub v: Component,
        /// The reference white point.
        pub reference: Xyza,
    }
}

impl Luva {
    /// Convert from XYZ relative to `reference`.
    pub fn from_xyz(xyz: &Xyza, reference: Xyza) -> Self {
        let yr = xyz.y / reference.y;
        let l = if yr > EPSILON {
            116.0 * yr.cbrt() - 16.0
        } else {
            KAPPA * yr
        };

        let (u, v) = match (chromaticity(xyz), chromaticity(&reference)) {
            (Some((up, vp)), Some((un, vn))) => (13.0 * l * (up - un), 13.0 * l * (vp - vn)),
            _ => (0.0, 0.0),
        };

        Luva::new(l, u, v, xyz.alpha, reference)
    }

    /// Convert to XYZ.
    pub fn to_xyz(&self) -> Xyza {
        let Some((un, vn)) = chromaticity(&self.reference) else {
            return Xyza::new(0.0, 0.0, 0.0, self.alpha);
        };
        if almost_zero(self.l) {
            return Xyza::new(0.0, 0.0, 0.0, self.alpha);
        }

        let y = if self.l > KAPPA * EPSILON {
            let f = (self.l + 16.0) / 116.0;
            f * f * f
        } else {
            self.l / KAPPA
        } * self.reference.y;

        let up = self.u / (13.0 * self.l) + un;
        let vp = self.v / (13.0 * self.l) + vn;
        if almost_zero(vp) {
            return Xyza::new(0.0, y, 0.0, self.alpha);
        }

        let x = y * 9.0 * up / (4.0 * vp);
        let z = y * (12.0 - 3.0 * up - 20.0 * vp) / (4.0 * vp);
        Xyza::new(x, y, z, self.alpha)
    }

    /// Convert into the polar form.
    pub fn to_lchuv(&self) -> Lchuva {
        let (c, h) = to_polar(self.u, self.v);
        Lchuva::new(self.l, c, h, self.alpha, self.reference)
    }
}

impl ReferenceWhitePoint for Luva {
    fn from_vector(v: [Component; 4], reference: Xyza) -> Self {
        Luva::new(v[0], v[1], v[2], v[3], reference)
    }

    fn from_rgba(color: &Rgba, reference: Xyza) -> Self {
        Luva::from_xyz(&Xyza::from_linear(color), reference)
    }

    fn to_rgba(&self) -> Rgba {
        self.to_xyz().to_linear()
    }
}

colorsite_macros::gen_model! {
    /// A color in the polar form of CIE-Luv.
    pub struct Lchuva {
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

impl Lchuva {
    /// Convert into the rectangular form.
    pub fn to_luva(&self) -> Luva {
        let (u, v) = to_rectangular(self.c, self.h);
        Luva::new(self.l, u, v, self.alpha, self.reference)
    }

    /// The largest chroma at this lightness and hue that stays in gamut.
    pub fn max_chroma(&self) -> Component {
        max_chroma(|c| Lchuva { c, ..*self }.to_rgba())
    }
}

impl ReferenceWhitePoint for Lchuva {
    fn from_vector(v: [Component; 4], reference: Xyza) -> Self {
        Lchuva::new(v[0], v[1], v[2], v[3], reference)
    }

    fn from_rgba(color: &Rgba, reference: Xyza) -> Self {
        Luva::from_rgba(color, reference).to_lchuv()
    }

    fn to_rgba(&self) -> Rgba {
        self.to_luva().to_rgba()
    }
}

colorsite_macros::gen_model! {
    /// CIE-Luv in polar form, with chroma given as a fraction of the largest
    /// chroma in gamut.
    pub struct Lshuva {
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

impl ReferenceWhitePoint for Lshuva {
    fn from_vector(v: [Component; 4], reference: Xyza) -> Self {
        Lshuva::new(v[0], v[1], v[2], v[3], reference)
    }

    fn from_rgba(color: &Rgba, reference: Xyza) -> Self {
        let lch = Lchuva::from_rgba(color, reference);
        let max = lch.max_chroma();
        let s = if almost_zero(max) { 0.0 } else { lch.c / max };
        Lshuva::new(lch.l, s, lch.h, lch.alpha, reference)
    }

    fn to_rgba(&self) -> Rgba {
        let lch = Lchuva::new(self.l, 0.0, self.h, self.alpha, self.reference);
        Lchuva {
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
    fn srgb_blue_relative_to_d65() {
        let blue = Rgba::new(0.0, 0.0, 1.0, 1.0, Linearity::Srgb);
        let luv = Luva::from_rgba(&blue, Xyza::NEUTRAL);
        assert_component_eq!(luv.l, 32.30, 1e-2);
        assert_component_eq!(luv.u, -9.40, 5e-2);
        assert_component_eq!(luv.v, -130.35, 5e-2);
    }

    #[test]
    fn black_is_zero() {
        let black = Rgba::new(0.0, 0.0, 0.0, 1.0, Linearity::Srgb);
        let luv = Luva::from_rgba(&black, Xyza::NEUTRAL);
        assert_component_eq!(luv.l, 0.0);
        assert_component_eq!(luv.u, 0.0);
        assert_component_eq!(luv.v, 0.0);
        assert_eq!(luv.to_rgba().to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn round_trips() {
        let reference = Xyza::new(1.1112, 1.0, 0.3521, 1.0);
        let color = Rgba::new(0.1, 0.5, 0.8, 0.25, Linearity::Linear);

        for back in [
            Luva::from_rgba(&color, reference).to_rgba(),
            Lchuva::from_rgba(&color, reference).to_rgba(),
            Lshuva::from_rgba(&color, reference).to_rgba(),
        ] {
            assert_component_eq!(back.r, color.r, 1e-5);
            assert_component_eq!(back.g, color.g, 1e-5);
            assert_component_eq!(back.b, color.b, 1e-5);
            assert_component_eq!(back.alpha, 0.25);
        }
    }
}

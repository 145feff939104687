//! HSLuv and HPLuv, human friendly alternatives to HSL built on CIE-LCHuv.
//! <https://www.hsluv.org/math/>

use crate::{
    color::{Component, Rgba},
    models::{
        hsl::{hue_to_xue, xue_to_hue},
        lab::{EPSILON, KAPPA},
        Lchuva, Model, ReferenceWhitePoint, Xyza,
    },
};

/// Rows of the XYZ to linear sRGB matrix.
#[allow(clippy::excessive_precision)]
const M: [[Component; 3]; 3] = [
    [3.2409699419045213, -1.5373831775700935, -0.4986107602930033],
    [-0.9692436362808798, 1.8759675015077206, 0.04155505740717561],
    [0.05563007969699361, -0.20397695888897657, 1.0569715142428786],
];

/// The six lines, as (slope, intercept), bounding the sRGB gamut in the
/// chroma plane at lightness `l`.
fn bounds(l: Component) -> impl Iterator<Item = (Component, Component)> {
    let sub1 = (l + 16.0).powi(3) / 1560896.0;
    let sub2 = if sub1 > EPSILON { sub1 } else { l / KAPPA };

    M.into_iter().flat_map(move |[m1, m2, m3]| {
        [0.0, 1.0].into_iter().map(move |t| {
            let top1 = (284517.0 * m1 - 94839.0 * m3) * sub2;
            let top2 = (838422.0 * m3 + 769860.0 * m2 + 731718.0 * m1) * l * sub2
                - 769860.0 * t * l;
            let bottom = (632260.0 * m3 - 126452.0 * m2) * sub2 + 126452.0 * t;
            (top1 / bottom, top2 / bottom)
        })
    })
}

/// The largest chroma in gamut at lightness `l` and hue `h`.
fn max_chroma_for_lh(l: Component, h: Component) -> Component {
    let h = h.to_radians();
    bounds(l)
        .map(|(slope, intercept)| intercept / (h.sin() - slope * h.cos()))
        .filter(|length| *length >= 0.0)
        .fold(Component::MAX, Component::min)
}

/// The largest chroma in gamut at lightness `l` for every hue.
fn max_safe_chroma_for_l(l: Component) -> Component {
    bounds(l)
        .map(|(slope, intercept)| intercept.abs() / (slope * slope + 1.0).sqrt())
        .fold(Component::MAX, Component::min)
}

/// Lightness is 0 to 100 here. At the extremes chroma collapses to 0.
fn chroma_scale(l: Component, max: impl Fn() -> Component) -> Option<Component> {
    if l > 99.9999999 || l < 1e-8 {
        None
    } else {
        Some(max())
    }
}

colorsite_macros::gen_model! {
    /// A color in HSLuv. Saturation and lightness run 0 to 1.
    pub struct Hsluva {
        /// The hue component of the color, in degrees.
        pub h: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The lightness component of the color.
        pub l: Component,
    }
}

impl Hsluva {
    /// Convert to CIE-LCHuv relative to the neutral white point.
    pub fn to_lchuv(&self) -> Lchuva {
        let l = self.l * 100.0;
        let c = chroma_scale(l, || max_chroma_for_lh(l, self.h))
            .map(|max| max * self.s)
            .unwrap_or(0.0);
        Lchuva::new(l.clamp(0.0, 100.0), c, self.h, self.alpha, Xyza::NEUTRAL)
    }

    /// Convert from CIE-LCHuv.
    pub fn from_lchuv(lch: &Lchuva) -> Self {
        let s = chroma_scale(lch.l, || max_chroma_for_lh(lch.l, lch.h))
            .map(|max| lch.c / max)
            .unwrap_or(0.0);
        Hsluva::new(lch.h, s, lch.l / 100.0, lch.alpha)
    }
}

impl Model for Hsluva {
    fn from_rgba(color: &Rgba) -> Self {
        Hsluva::from_lchuv(&Lchuva::from_rgba(color, Xyza::NEUTRAL))
    }

    fn to_rgba(&self) -> Rgba {
        self.to_lchuv().to_rgba()
    }
}

colorsite_macros::gen_model! {
    /// A color in HPLuv, the pastel subset of HSLuv where saturation does not
    /// depend on hue.
    pub struct Hpluva {
        /// The hue component of the color, in degrees.
        pub h: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The lightness component of the color.
        pub l: Component,
    }
}

impl Model for Hpluva {
    fn from_rgba(color: &Rgba) -> Self {
        let lch = Lchuva::from_rgba(color, Xyza::NEUTRAL);
        let s = chroma_scale(lch.l, || max_safe_chroma_for_l(lch.l))
            .map(|max| lch.c / max)
            .unwrap_or(0.0);
        Hpluva::new(lch.h, s, lch.l / 100.0, lch.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        let l = self.l * 100.0;
        let c = chroma_scale(l, || max_safe_chroma_for_l(l))
            .map(|max| max * self.s)
            .unwrap_or(0.0);
        Lchuva::new(l.clamp(0.0, 100.0), c, self.h, self.alpha, Xyza::NEUTRAL).to_rgba()
    }
}

colorsite_macros::gen_model! {
    /// HSLuv with the hue taken from the artist's color wheel.
    pub struct Xsluva {
        /// The xue component of the color, in degrees.
        pub x: Component,
        /// The saturation component of the color.
        pub s: Component,
        /// The lightness component of the color.
        pub l: Component,
    }
}

impl Model for Xsluva {
    fn from_rgba(color: &Rgba) -> Self {
        let hsluv = Hsluva::from_rgba(color);
        Xsluva::new(hue_to_xue(hsluv.h), hsluv.s, hsluv.l, hsluv.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        Hsluva::new(xue_to_hue(self.x), self.s, self.l, self.alpha).to_rgba()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assert_component_eq, color::Linearity};

    #[test]
    fn pure_red() {
        // hsluv.org gives red as (12.177, 100, 53.237).
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0, Linearity::Srgb);
        let hsluv = Hsluva::from_rgba(&red);
        assert_component_eq!(hsluv.h, 12.177, 1e-2);
        assert_component_eq!(hsluv.s, 1.0, 1e-4);
        assert_component_eq!(hsluv.l, 0.53237, 1e-4);
    }

    #[test]
    fn white_and_black_have_no_saturation() {
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0, Linearity::Srgb);
        assert_component_eq!(Hsluva::from_rgba(&white).s, 0.0, 1e-6);
        let black = Hsluva::new(120.0, 0.8, 0.0, 1.0).to_rgba();
        assert_eq!(black.to_rgba8(), [0, 0, 0, 255]);
    }

    #[test]
    fn round_trips() {
        let c = Rgba::new(0.3, 0.6, 0.2, 0.9, Linearity::Srgb);
        for back in [
            Hsluva::from_rgba(&c).to_rgba().to_srgb(),
            Hpluva::from_rgba(&c).to_rgba().to_srgb(),
            Xsluva::from_rgba(&c).to_rgba().to_srgb(),
        ] {
            assert_component_eq!(back.r, c.r, 1e-5);
            assert_component_eq!(back.g, c.g, 1e-5);
            assert_component_eq!(back.b, c.b, 1e-5);
            assert_component_eq!(back.alpha, 0.9);
        }
    }
}

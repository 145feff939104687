//! Oklab and its polar form Oklch.
//! <https://bottosson.github.io/posts/oklab/>

use crate::{
    color::{Component, Components, Linearity, Rgba},
    math::{transform, transform_3x3, Transform},
    models::{
        lab::{to_polar, to_rectangular},
        Model,
    },
};

/// Convert linear light sRGB components to Oklab.
pub(crate) fn linear_srgb_to_oklab(rgb: Components) -> Components {
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const RGB_TO_LMS: Transform = transform_3x3(
        0.4122214708, 0.2119034982, 0.0883024619,
        0.5363325363, 0.6806995451, 0.2817188376,
        0.0514459929, 0.1073969566, 0.6299787005,
    );

    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const LMS_TO_OKLAB: Transform = transform_3x3(
         0.2104542553,  1.9779984951,  0.0259040371,
         0.7936177850, -2.4285922050,  0.7827717662,
        -0.0040720468,  0.4505937099, -0.8086757660,
    );

    let lms = transform(&RGB_TO_LMS, rgb).map(|v| v.cbrt());
    transform(&LMS_TO_OKLAB, lms)
}

/// Convert Oklab components to linear light sRGB.
pub(crate) fn oklab_to_linear_srgb(lab: Components) -> Components {
    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const OKLAB_TO_LMS: Transform = transform_3x3(
        1.0,           1.0,           1.0,
        0.3963377774, -0.1055613458, -0.0894841775,
        0.2158037573, -0.0638541728, -1.2914855480,
    );

    #[rustfmt::skip]
    #[allow(clippy::excessive_precision)]
    const LMS_TO_RGB: Transform = transform_3x3(
         4.0767416621, -1.2684380046, -0.0041960863,
        -3.3077115913,  2.6097574011, -0.7034186147,
         0.2309699292, -0.3413193965,  1.7076147010,
    );

    let lms = transform(&OKLAB_TO_LMS, lab).map(|v| v * v * v);
    transform(&LMS_TO_RGB, lms)
}

colorsite_macros::gen_model! {
    /// A color in Oklab.
    pub struct Oklaba {
        /// The lightness component, 0 to 1.
        pub l: Component,
        /// The green-red component.
        pub a: Component,
        /// The blue-yellow component.
        pub b: Component,
    }
}

impl Oklaba {
    /// Convert into the polar form.
    pub fn to_oklch(&self) -> Oklcha {
        let (c, h) = to_polar(self.a, self.b);
        Oklcha::new(self.l, c, h, self.alpha)
    }
}

impl Model for Oklaba {
    fn from_rgba(color: &Rgba) -> Self {
        let Components(l, a, b) = linear_srgb_to_oklab(color.to_linear().to_components());
        Oklaba::new(l, a, b, color.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        let Components(r, g, b) = oklab_to_linear_srgb(self.to_components());
        Rgba::new(r, g, b, self.alpha, Linearity::Linear)
    }
}

colorsite_macros::gen_model! {
    /// A color in the polar form of Oklab.
    pub struct Oklcha {
        /// The lightness component, 0 to 1.
        pub l: Component,
        /// The chroma component.
        pub c: Component,
        /// The hue component, in degrees.
        pub h: Component,
    }
}

impl Oklcha {
    /// Convert into the rectangular form.
    pub fn to_oklab(&self) -> Oklaba {
        let (a, b) = to_rectangular(self.c, self.h);
        Oklaba::new(self.l, a, b, self.alpha)
    }
}

impl Model for Oklcha {
    fn from_rgba(color: &Rgba) -> Self {
        Oklaba::from_rgba(color).to_oklch()
    }

    fn to_rgba(&self) -> Rgba {
        self.to_oklab().to_rgba()
    }
}

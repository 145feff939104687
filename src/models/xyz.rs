//! Model a color in the CIE-XYZ color space, and its chromaticity form Yxy.

use crate::{
    color::{Component, Components, Linearity, Rgba},
    math::{transform, transform_3x3, Transform},
    models::Model,
};

colorsite_macros::gen_model! {
    /// A model for a color in the CIE-XYZ color space. Also used to describe
    /// reference white points.
    pub struct Xyza {
        /// The X component of the color.
        pub x: Component,
        /// The Y component of the color.
        pub y: Component,
        /// The Z component of the color.
        pub z: Component,
    }
}

impl Xyza {
    /// The XYZ value of linear white. The default reference white point.
    #[allow(clippy::excessive_precision)]
    pub const NEUTRAL: Xyza = Xyza {
        x: 0.9504559270516716,
        y: 1.0,
        z: 1.0890577507598784,
        alpha: 1.0,
    };

    /// Convert linear light sRGB to XYZ. Gamma encoded input is decoded
    /// first.
    pub fn from_linear(color: &Rgba) -> Self {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const TO_XYZ: Transform = transform_3x3(
            0.4123907992659595,  0.21263900587151036, 0.01933081871559185,
            0.35758433938387796, 0.7151686787677559,  0.11919477979462599,
            0.1804807884018343,  0.07219231536073371, 0.9505321522496606,
        );

        let linear = color.to_linear();
        let Components(x, y, z) = transform(&TO_XYZ, linear.to_components());
        Xyza::new(x, y, z, color.alpha)
    }

    /// Convert to linear light sRGB.
    pub fn to_linear(&self) -> Rgba {
        #[rustfmt::skip]
        #[allow(clippy::excessive_precision)]
        const FROM_XYZ: Transform = transform_3x3(
             3.2409699419045213, -0.9692436362808798,  0.05563007969699361,
            -1.5373831775700935,  1.8759675015077206, -0.20397695888897657,
            -0.4986107602930033,  0.04155505740717561, 1.0569715142428786,
        );

        let Components(r, g, b) = transform(&FROM_XYZ, self.to_components());
        Rgba::new(r, g, b, self.alpha, Linearity::Linear)
    }
}

impl Model for Xyza {
    fn from_rgba(color: &Rgba) -> Self {
        Xyza::from_linear(color)
    }

    fn to_rgba(&self) -> Rgba {
        self.to_linear()
    }
}

colorsite_macros::gen_model! {
    /// A color given as luminance and chromaticity coordinates.
    pub struct Yxya {
        /// The luminance, Y of XYZ.
        pub yy: Component,
        /// The x chromaticity coordinate.
        pub x: Component,
        /// The y chromaticity coordinate.
        pub y: Component,
    }
}

impl Yxya {
    /// Chromaticity of D65, used for black where chromaticity is undefined.
    const BLACK_CHROMATICITY: (Component, Component) = (0.3127, 0.3290);

    /// Convert from XYZ.
    pub fn from_xyz(xyz: &Xyza) -> Self {
        let sum = xyz.x + xyz.y + xyz.z;
        if sum.abs() < 1e-12 {
            let (x, y) = Self::BLACK_CHROMATICITY;
            return Yxya::new(0.0, x, y, xyz.alpha);
        }
        Yxya::new(xyz.y, xyz.x / sum, xyz.y / sum, xyz.alpha)
    }

    /// Convert to XYZ.
    pub fn to_xyz(&self) -> Xyza {
        if self.y.abs() < 1e-12 {
            return Xyza::new(0.0, 0.0, 0.0, self.alpha);
        }
        let x = self.x * self.yy / self.y;
        let z = (1.0 - self.x - self.y) * self.yy / self.y;
        Xyza::new(x, self.yy, z, self.alpha)
    }
}

impl Model for Yxya {
    fn from_rgba(color: &Rgba) -> Self {
        Yxya::from_xyz(&Xyza::from_linear(color))
    }

    fn to_rgba(&self) -> Rgba {
        self.to_xyz().to_linear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn white_is_neutral() {
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0, Linearity::Srgb);
        let xyz = Xyza::from_linear(&white);
        assert_component_eq!(xyz.x, Xyza::NEUTRAL.x);
        assert_component_eq!(xyz.y, Xyza::NEUTRAL.y);
        assert_component_eq!(xyz.z, Xyza::NEUTRAL.z);
    }

    #[test]
    fn red_round_trip() {
        let red = Rgba::new(1.0, 0.0, 0.0, 0.5, Linearity::Linear);
        let xyz = Xyza::from_rgba(&red);
        assert_component_eq!(xyz.x, 0.4123908);
        assert_component_eq!(xyz.y, 0.2126390);
        assert_component_eq!(xyz.alpha, 0.5);

        let back = xyz.to_rgba();
        assert_eq!(back.linearity, Linearity::Linear);
        assert_component_eq!(back.r, 1.0);
        assert_component_eq!(back.g, 0.0);
        assert_component_eq!(back.b, 0.0);
    }

    #[test]
    fn yxy_of_white_is_d65() {
        let yxy = Yxya::from_xyz(&Xyza::NEUTRAL);
        assert_component_eq!(yxy.yy, 1.0);
        assert_component_eq!(yxy.x, 0.3127, 1e-4);
        assert_component_eq!(yxy.y, 0.3290, 1e-4);

        let xyz = yxy.to_xyz();
        assert_component_eq!(xyz.x, Xyza::NEUTRAL.x);
        assert_component_eq!(xyz.z, Xyza::NEUTRAL.z);
    }

    #[test]
    fn yxy_of_black() {
        let yxy = Yxya::from_xyz(&Xyza::new(0.0, 0.0, 0.0, 1.0));
        assert_component_eq!(yxy.yy, 0.0);
        let xyz = yxy.to_xyz();
        assert_component_eq!(xyz.x, 0.0);
        assert_component_eq!(xyz.z, 0.0);
    }
}

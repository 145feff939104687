//! One descriptor per color model a call can construct. A descriptor knows
//! how the call's arguments are shaped and how to convert between them and
//! the canonical [`Rgba`].

use bitflags::bitflags;
use tracing::{event, Level};

use crate::{
    color::{Component, Linearity, Rgba},
    constant::{ConstantValue, ParameterBinding},
    library::{Callable, Owner, COLOR, SPACES},
    models::{
        Hpluva, Hsla, Hsluva, Hsva, Laba, Lchaba, Lchuva, Lshaba, Lshuva, Luva, Model, Okhsla,
        Okhsva, Oklaba, Oklcha, ReferenceWhitePoint, Vector, Xsla, Xsluva, Xsva, Xyza, Yxya,
    },
};

bitflags! {
    /// Properties of a color model that change how it is decoded or encoded.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct DescriptorFlags : u8 {
        /// The model takes a `ref` white point.
        const REFERENCE_WHITE_POINT = 1 << 0;
        /// The forward conversion starts from linear light.
        const LINEAR_INTERMEDIATE = 1 << 1;
        /// Alpha is declared with a default and may be left out.
        const IMPLICIT_ALPHA = 1 << 2;
    }
}

/// How the arguments of a call are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// A single packed integer or hex string.
    Hex,
    /// The `rgb` shorthand with its gray, two value, full and string forms.
    RgbShorthand,
    /// The `ColorRGBa` constructor, with its linearity argument.
    Rgba,
    /// Three components and an optional alpha of some other model.
    Components,
}

/// A color model as it appears in source code.
pub struct ColorModelDescriptor {
    /// The name of the callable, for diagnostics.
    pub name: &'static str,
    /// The package of the callable.
    pub package: &'static str,
    /// The declaring scope of the callable.
    pub owner: Owner,
    /// The layout of the arguments.
    pub shape: Shape,
    /// Conversion properties.
    pub flags: DescriptorFlags,
    /// Build the canonical color from 3 components and alpha.
    pub from_components: fn(&[Component; 4], Xyza) -> Rgba,
    /// Split the canonical color into 3 components and alpha.
    pub to_components: fn(&Rgba, Xyza) -> [Component; 4],
}

impl std::fmt::Debug for ColorModelDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorModelDescriptor")
            .field("name", &self.name)
            .field("shape", &self.shape)
            .field("flags", &self.flags)
            .finish()
    }
}

fn from_model<M: Model + From<[Component; 4]>>(vector: &[Component; 4], _: Xyza) -> Rgba {
    M::from(*vector).to_rgba()
}

fn to_model<M: Model>(color: &Rgba, _: Xyza) -> [Component; 4] {
    M::from_rgba(color).to_vector()
}

fn from_referenced<M: ReferenceWhitePoint>(vector: &[Component; 4], reference: Xyza) -> Rgba {
    M::from_vector(*vector, reference).to_rgba()
}

fn to_referenced<M: ReferenceWhitePoint>(color: &Rgba, reference: Xyza) -> [Component; 4] {
    <M as ReferenceWhitePoint>::from_rgba(color, reference).to_vector()
}

fn from_rgb(vector: &[Component; 4], _: Xyza) -> Rgba {
    let [r, g, b, alpha] = *vector;
    Rgba::new(r, g, b, alpha, Linearity::Unknown)
}

fn to_rgb(color: &Rgba, _: Xyza) -> [Component; 4] {
    color.to_vector()
}

const IMPLICIT: DescriptorFlags = DescriptorFlags::IMPLICIT_ALPHA;
const LINEAR: DescriptorFlags = DescriptorFlags::IMPLICIT_ALPHA.union(DescriptorFlags::LINEAR_INTERMEDIATE);
const REFERENCED: DescriptorFlags = LINEAR.union(DescriptorFlags::REFERENCE_WHITE_POINT);

macro_rules! model {
    ($package:expr, $name:literal, $model:ty, $flags:expr) => {
        ColorModelDescriptor {
            name: $name,
            package: $package,
            owner: Owner::Constructor($name),
            shape: Shape::Components,
            flags: $flags,
            from_components: from_model::<$model>,
            to_components: to_model::<$model>,
        }
    };
}

macro_rules! referenced {
    ($name:literal, $model:ty) => {
        ColorModelDescriptor {
            name: $name,
            package: COLOR,
            owner: Owner::Constructor($name),
            shape: Shape::Components,
            flags: REFERENCED,
            from_components: from_referenced::<$model>,
            to_components: to_referenced::<$model>,
        }
    };
}

/// Every supported color model.
pub static DESCRIPTORS: &[ColorModelDescriptor] = &[
    ColorModelDescriptor {
        name: "fromHex",
        package: COLOR,
        owner: Owner::Companion("ColorRGBa"),
        shape: Shape::Hex,
        flags: DescriptorFlags::empty(),
        from_components: from_rgb,
        to_components: to_rgb,
    },
    ColorModelDescriptor {
        name: "rgb",
        package: COLOR,
        owner: Owner::Package,
        shape: Shape::RgbShorthand,
        flags: IMPLICIT,
        from_components: from_rgb,
        to_components: to_rgb,
    },
    ColorModelDescriptor {
        name: "hsl",
        package: COLOR,
        owner: Owner::Package,
        shape: Shape::Components,
        flags: IMPLICIT,
        from_components: from_model::<Hsla>,
        to_components: to_model::<Hsla>,
    },
    ColorModelDescriptor {
        name: "hsv",
        package: COLOR,
        owner: Owner::Package,
        shape: Shape::Components,
        flags: IMPLICIT,
        from_components: from_model::<Hsva>,
        to_components: to_model::<Hsva>,
    },
    ColorModelDescriptor {
        name: "ColorRGBa",
        package: COLOR,
        owner: Owner::Constructor("ColorRGBa"),
        shape: Shape::Rgba,
        flags: IMPLICIT,
        from_components: from_rgb,
        to_components: to_rgb,
    },
    model!(COLOR, "ColorHSLa", Hsla, IMPLICIT),
    model!(COLOR, "ColorHSVa", Hsva, IMPLICIT),
    model!(COLOR, "ColorXSLa", Xsla, IMPLICIT),
    model!(COLOR, "ColorXSVa", Xsva, IMPLICIT),
    model!(COLOR, "ColorXYZa", Xyza, LINEAR),
    model!(COLOR, "ColorYxya", Yxya, LINEAR),
    referenced!("ColorLABa", Laba),
    referenced!("ColorLCHABa", Lchaba),
    referenced!("ColorLSHABa", Lshaba),
    referenced!("ColorLUVa", Luva),
    referenced!("ColorLCHUVa", Lchuva),
    referenced!("ColorLSHUVa", Lshuva),
    model!(SPACES, "ColorOKLABa", Oklaba, LINEAR),
    model!(SPACES, "ColorOKLCHa", Oklcha, LINEAR),
    model!(SPACES, "ColorOKHSLa", Okhsla, LINEAR),
    model!(SPACES, "ColorOKHSVa", Okhsva, LINEAR),
    model!(SPACES, "ColorHSLUVa", Hsluva, IMPLICIT),
    model!(SPACES, "ColorHPLUVa", Hpluva, IMPLICIT),
    model!(SPACES, "ColorXSLUVa", Xsluva, IMPLICIT),
];

/// The descriptor for the model `callable` constructs.
pub fn lookup(callable: &Callable) -> Option<&'static ColorModelDescriptor> {
    let name = match callable.owner {
        Owner::Constructor(class) => class,
        _ => callable.name,
    };
    DESCRIPTORS
        .iter()
        .find(|d| d.package == callable.package && d.owner == callable.owner && d.name == name)
}

/// Decode a hex parameter value.
pub fn decode_hex(value: &ConstantValue) -> Option<Rgba> {
    let decoded = match value {
        ConstantValue::Integer(packed) => Rgba::from_hex_int(*packed),
        ConstantValue::Text(text) => Rgba::from_hex_str(text),
        _ => return None,
    };

    decoded
        .map_err(|err| event!(Level::TRACE, %err, "malformed hex color"))
        .ok()
}

impl ColorModelDescriptor {
    /// Decode the color of a call from its bound parameters.
    pub fn decode(&self, binding: &ParameterBinding) -> Option<Rgba> {
        if !binding.is_resolved() {
            return None;
        }

        let components = binding.color_components();

        match self.shape {
            Shape::Hex => decode_hex(binding.hex()?),
            Shape::RgbShorthand => {
                if let Some(hex) = binding.hex() {
                    return decode_hex(hex);
                }
                let vector = match components[..] {
                    [gray] => [gray, gray, gray, 1.0],
                    [rb, g] => [rb, g, rb, 1.0],
                    [r, g, b] => [r, g, b, 1.0],
                    [r, g, b, alpha] => [r, g, b, alpha],
                    _ => return self.unexpected(components.len()),
                };
                Some((self.from_components)(&vector, Xyza::NEUTRAL))
            }
            Shape::Rgba => match components[..] {
                [r, g, b, alpha] => Some(Rgba::new(
                    r,
                    g,
                    b,
                    alpha,
                    binding.linearity().unwrap_or_default(),
                )),
                _ => self.unexpected(components.len()),
            },
            Shape::Components => {
                let vector = match components[..] {
                    [c0, c1, c2] => [c0, c1, c2, 1.0],
                    [c0, c1, c2, alpha] => [c0, c1, c2, alpha],
                    _ => return self.unexpected(components.len()),
                };
                let reference = binding.reference().unwrap_or(Xyza::NEUTRAL);
                Some((self.from_components)(&vector, reference))
            }
        }
    }

    fn unexpected(&self, count: usize) -> Option<Rgba> {
        event!(
            Level::WARN,
            model = self.name,
            count,
            "unexpected number of color components"
        );
        None
    }
}

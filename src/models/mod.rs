//! The color models a color expression can be written in. Every model
//! converts to and from the canonical [`Rgba`].

use crate::color::{Component, Rgba};

pub mod hsl;
pub mod hsluv;
pub mod lab;
pub mod luv;
pub mod okhsl;
pub mod oklab;
pub mod rgb;
pub mod xyz;

pub use hsl::{Hsla, Hsva, Xsla, Xsva};
pub use hsluv::{Hpluva, Hsluva, Xsluva};
pub use lab::{Lchaba, Laba, Lshaba};
pub use luv::{Lchuva, Luva, Lshuva};
pub use okhsl::{Okhsla, Okhsva};
pub use oklab::{Oklaba, Oklcha};
pub use xyz::{Xyza, Yxya};

/// The components of a model followed by its alpha, in declaration order.
pub trait Vector {
    /// Return the 3 components and alpha.
    fn to_vector(&self) -> [Component; 4];
}

/// A model that converts to and from [`Rgba`] on its own.
pub trait Model: Vector + Sized {
    /// Convert a canonical color to this model.
    fn from_rgba(color: &Rgba) -> Self;

    /// Convert this model to a canonical color.
    fn to_rgba(&self) -> Rgba;
}

/// A model that needs a reference white point for its conversions.
pub trait ReferenceWhitePoint: Vector + Sized {
    /// Build the model from its components and a reference white point.
    fn from_vector(vector: [Component; 4], reference: Xyza) -> Self;

    /// Convert a canonical color to this model relative to `reference`.
    fn from_rgba(color: &Rgba, reference: Xyza) -> Self;

    /// Convert this model to a canonical color.
    fn to_rgba(&self) -> Rgba;
}

//! The canonical [`Rgba`] color every expression decodes to, and the
//! [`Linearity`] tag that travels with it.

/// A 64-bit floating point value that all components are stored as.
pub type Component = f64;

/// Represent the three components that describe any color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Components(pub Component, pub Component, pub Component);

impl Components {
    /// Return new components with each component mapped with the given
    /// function.
    pub fn map(&self, f: impl Fn(Component) -> Component) -> Self {
        Self(f(self.0), f(self.1), f(self.2))
    }

    /// The largest of the three components.
    pub fn max(&self) -> Component {
        self.0.max(self.1).max(self.2)
    }
}

/// Whether the RGB components of a color are linear light or gamma encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Linearity {
    /// Nothing is known, treated as sRGB encoded.
    #[default]
    Unknown,
    /// Linear light.
    Linear,
    /// sRGB gamma encoded.
    Srgb,
    /// Linear light by assumption rather than by construction.
    AssumedLinear,
    /// sRGB gamma encoded by assumption rather than by construction.
    AssumedSrgb,
}

impl Linearity {
    const NAMES: [(&'static str, Linearity); 5] = [
        ("UNKNOWN", Linearity::Unknown),
        ("LINEAR", Linearity::Linear),
        ("SRGB", Linearity::Srgb),
        ("ASSUMED_LINEAR", Linearity::AssumedLinear),
        ("ASSUMED_SRGB", Linearity::AssumedSrgb),
    ];

    /// Look up an entry by the name it has in source code.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, linearity)| *linearity)
    }

    /// The name of the entry in source code.
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, l)| *l == self)
            .map(|(name, _)| *name)
            .unwrap_or("UNKNOWN")
    }

    /// True for both the certain and the assumed linear tags.
    pub fn is_linear(self) -> bool {
        matches!(self, Linearity::Linear | Linearity::AssumedLinear)
    }
}

colorsite_macros::gen_model! {
    /// The canonical color every color expression decodes to. The components
    /// are nominally in `[0, 1]`.
    pub struct Rgba {
        /// The red component of the color.
        pub r: Component,
        /// The green component of the color.
        pub g: Component,
        /// The blue component of the color.
        pub b: Component,
        /// How the red, green and blue components are encoded.
        pub linearity: Linearity,
    }
}

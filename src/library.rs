//! A description of the color library's public surface: its packages, the
//! classes in them, and every constructor and function that produces a
//! color, with their parameters and defaults.

use crate::presets::{self, Property};

/// The core color package.
pub const COLOR: &str = "org.openrndr.color";
/// The package with named color presets.
pub const PRESETS: &str = "org.openrndr.extra.color.presets";
/// The package with additional color spaces.
pub const SPACES: &str = "org.openrndr.extra.color.spaces";

/// The type of value a parameter takes, as far as resolution cares.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterKind {
    /// A `Double`.
    Double,
    /// An `Int`.
    Integer,
    /// A `String`.
    Text,
    /// A `ColorXYZa` used as reference white point.
    WhitePoint,
    /// A `Linearity` entry.
    Linearity,
}

/// The default value the library declares for a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultValue {
    /// `1.0`, fully opaque.
    Opaque,
    /// `ColorXYZa.NEUTRAL`.
    NeutralWhitePoint,
    /// `Linearity.UNKNOWN`.
    UnknownLinearity,
}

/// A formal parameter of a callable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parameter {
    /// The declared name, usable in named arguments.
    pub name: &'static str,
    /// The type of value.
    pub kind: ParameterKind,
    /// The declared default, if any.
    pub default: Option<DefaultValue>,
}

impl Parameter {
    /// True for the alpha parameter of any model.
    pub fn is_alpha(&self) -> bool {
        self.default == Some(DefaultValue::Opaque)
    }
}

const fn component(name: &'static str) -> Parameter {
    Parameter {
        name,
        kind: ParameterKind::Double,
        default: None,
    }
}

const fn alpha(name: &'static str) -> Parameter {
    Parameter {
        name,
        kind: ParameterKind::Double,
        default: Some(DefaultValue::Opaque),
    }
}

const fn hex(kind: ParameterKind) -> Parameter {
    Parameter {
        name: "hex",
        kind,
        default: None,
    }
}

const REFERENCE: Parameter = Parameter {
    name: "ref",
    kind: ParameterKind::WhitePoint,
    default: Some(DefaultValue::NeutralWhitePoint),
};

const LINEARITY: Parameter = Parameter {
    name: "linearity",
    kind: ParameterKind::Linearity,
    default: Some(DefaultValue::UnknownLinearity),
};

/// Where a callable is declared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Owner {
    /// A top level function of its package.
    Package,
    /// The primary constructor of the named class.
    Constructor(&'static str),
    /// A function on the companion object of the named class.
    Companion(&'static str),
}

/// A constructor or function of the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Callable {
    /// The package it is declared in.
    pub package: &'static str,
    /// The declaring scope.
    pub owner: Owner,
    /// The simple name. For constructors this is the class name.
    pub name: &'static str,
    /// The formal parameters in declaration order.
    pub parameters: &'static [Parameter],
}

/// A class of the library.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Class {
    /// The package it is declared in.
    pub package: &'static str,
    /// The simple name.
    pub name: &'static str,
}

/// What a name resolves to in the library.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Symbol {
    /// A class, usable as constructor or as receiver.
    Class(Class),
    /// A set of overloads sharing a name and scope.
    Callables {
        /// The package of the overloads.
        package: &'static str,
        /// The scope of the overloads.
        owner: Owner,
        /// The shared name.
        name: &'static str,
    },
    /// A named constant.
    Property(Property),
}

macro_rules! constructor {
    ($package:expr, $class:literal, [$($parameter:expr),* $(,)?]) => {
        Callable {
            package: $package,
            owner: Owner::Constructor($class),
            name: $class,
            parameters: &[$($parameter),*],
        }
    };
}

static CALLABLES: &[Callable] = &[
    constructor!(COLOR, "ColorRGBa", [component("r"), component("g"), component("b"), alpha("alpha"), LINEARITY]),
    Callable {
        package: COLOR,
        owner: Owner::Companion("ColorRGBa"),
        name: "fromHex",
        parameters: &[hex(ParameterKind::Integer)],
    },
    Callable {
        package: COLOR,
        owner: Owner::Companion("ColorRGBa"),
        name: "fromHex",
        parameters: &[hex(ParameterKind::Text)],
    },
    Callable {
        package: COLOR,
        owner: Owner::Package,
        name: "rgb",
        parameters: &[component("gray")],
    },
    Callable {
        package: COLOR,
        owner: Owner::Package,
        name: "rgb",
        parameters: &[component("rb"), component("g")],
    },
    Callable {
        package: COLOR,
        owner: Owner::Package,
        name: "rgb",
        parameters: &[component("r"), component("g"), component("b"), alpha("a")],
    },
    Callable {
        package: COLOR,
        owner: Owner::Package,
        name: "rgb",
        parameters: &[hex(ParameterKind::Text)],
    },
    Callable {
        package: COLOR,
        owner: Owner::Package,
        name: "hsl",
        parameters: &[component("h"), component("s"), component("l"), alpha("a")],
    },
    Callable {
        package: COLOR,
        owner: Owner::Package,
        name: "hsv",
        parameters: &[component("h"), component("s"), component("v"), alpha("a")],
    },
    constructor!(COLOR, "ColorHSLa", [component("h"), component("s"), component("l"), alpha("alpha")]),
    constructor!(COLOR, "ColorHSVa", [component("h"), component("s"), component("v"), alpha("alpha")]),
    constructor!(COLOR, "ColorXSLa", [component("x"), component("s"), component("l"), alpha("alpha")]),
    constructor!(COLOR, "ColorXSVa", [component("x"), component("s"), component("v"), alpha("alpha")]),
    constructor!(COLOR, "ColorXYZa", [component("x"), component("y"), component("z"), alpha("alpha")]),
    constructor!(COLOR, "ColorYxya", [component("yy"), component("x"), component("y"), alpha("alpha")]),
    constructor!(COLOR, "ColorLABa", [component("l"), component("a"), component("b"), alpha("alpha"), REFERENCE]),
    constructor!(COLOR, "ColorLCHABa", [component("l"), component("c"), component("h"), alpha("alpha"), REFERENCE]),
    constructor!(COLOR, "ColorLCHUVa", [component("l"), component("c"), component("h"), alpha("alpha"), REFERENCE]),
    constructor!(COLOR, "ColorLSHABa", [component("l"), component("s"), component("h"), alpha("alpha"), REFERENCE]),
    constructor!(COLOR, "ColorLSHUVa", [component("l"), component("s"), component("h"), alpha("alpha"), REFERENCE]),
    constructor!(COLOR, "ColorLUVa", [component("l"), component("u"), component("v"), alpha("alpha"), REFERENCE]),
    constructor!(SPACES, "ColorOKLABa", [component("l"), component("a"), component("b"), alpha("alpha")]),
    constructor!(SPACES, "ColorOKLCHa", [component("l"), component("c"), component("h"), alpha("alpha")]),
    constructor!(SPACES, "ColorHSLUVa", [component("h"), component("s"), component("l"), alpha("alpha")]),
    constructor!(SPACES, "ColorHPLUVa", [component("h"), component("s"), component("l"), alpha("alpha")]),
    constructor!(SPACES, "ColorXSLUVa", [component("x"), component("s"), component("l"), alpha("alpha")]),
    constructor!(SPACES, "ColorOKHSLa", [component("h"), component("s"), component("l"), alpha("alpha")]),
    constructor!(SPACES, "ColorOKHSVa", [component("h"), component("s"), component("v"), alpha("alpha")]),
];

/// Classes that are not constructed as colors but still resolve by name.
static PLAIN_CLASSES: &[Class] = &[Class {
    package: COLOR,
    name: "Linearity",
}];

/// The library surface restricted to a set of enabled packages. Declarations
/// in other packages are invisible.
#[derive(Clone, Debug)]
pub struct Library {
    packages: Vec<String>,
}

impl Default for Library {
    fn default() -> Self {
        Self::new([COLOR, PRESETS, SPACES])
    }
}

impl Library {
    /// Create a view of the library with only `packages` enabled.
    pub fn new<S: Into<String>>(packages: impl IntoIterator<Item = S>) -> Self {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }

    /// True if declarations in `package` are visible.
    pub fn is_enabled(&self, package: &str) -> bool {
        self.packages.iter().any(|p| p == package)
    }

    /// Every visible callable.
    pub fn callables(&self) -> impl Iterator<Item = &'static Callable> + '_ {
        CALLABLES.iter().filter(|c| self.is_enabled(c.package))
    }

    /// The overloads named `name` declared in `owner` of `package`.
    pub fn overloads<'a>(
        &'a self,
        package: &'a str,
        owner: Owner,
        name: &'a str,
    ) -> impl Iterator<Item = &'static Callable> + 'a {
        self.callables()
            .filter(move |c| c.package == package && c.owner == owner && c.name == name)
    }

    /// Look up a class by package and name.
    pub fn class(&self, package: &str, name: &str) -> Option<Class> {
        if !self.is_enabled(package) {
            return None;
        }

        CALLABLES
            .iter()
            .filter_map(|c| match c.owner {
                Owner::Constructor(class) => Some(Class {
                    package: c.package,
                    name: class,
                }),
                _ => None,
            })
            .chain(PLAIN_CLASSES.iter().copied())
            .find(|class| class.package == package && class.name == name)
    }

    /// A named constant on the companion of `class`.
    pub fn companion_property(&self, class: &Class, name: &str) -> Option<Property> {
        presets::static_colors().companion(class.package, class.name, name)
    }

    /// An extension property declared at the top level of `package`.
    pub fn extension_property(&self, package: &str, name: &str) -> Option<Property> {
        if !self.is_enabled(package) {
            return None;
        }
        presets::static_colors().extension(package, name)
    }

    /// What `name` refers to when `package` is imported with a wildcard.
    pub fn export(&self, package: &str, name: &str) -> Option<Symbol> {
        if !self.is_enabled(package) {
            return None;
        }

        if let Some(class) = self.class(package, name) {
            return Some(Symbol::Class(class));
        }

        if let Some(callable) = self.overloads(package, Owner::Package, name).next() {
            return Some(Symbol::Callables {
                package: callable.package,
                owner: Owner::Package,
                name: callable.name,
            });
        }

        self.extension_property(package, name).map(Symbol::Property)
    }

    /// Resolve a fully qualified import path, such as
    /// `org.openrndr.color.ColorRGBa.Companion.fromHex`.
    pub fn resolve_path(&self, path: &str) -> Option<Symbol> {
        let (prefix, name) = path.rsplit_once('.')?;

        if let Some(symbol) = self.export(prefix, name) {
            return Some(symbol);
        }

        let class_path = prefix.strip_suffix(".Companion")?;
        let (package, class_name) = class_path.rsplit_once('.')?;
        let class = self.class(package, class_name)?;

        if let Some(callable) = self
            .overloads(class.package, Owner::Companion(class.name), name)
            .next()
        {
            return Some(Symbol::Callables {
                package: class.package,
                owner: Owner::Companion(class.name),
                name: callable.name,
            });
        }

        self.companion_property(&class, name).map(Symbol::Property)
    }
}

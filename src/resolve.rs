//! Name and overload resolution. A color site is resolved to the library
//! callable or named constant it denotes, with every argument mapped to the
//! formal parameter it binds.

use tree_sitter::Node;
use tracing::{event, Level};

use crate::{
    constant::{ConstantValue, Evaluator},
    library::{Callable, Library, Owner, Parameter, ParameterKind, Symbol},
    pattern::{self, Candidate, SiteShape},
    presets::Property,
    syntax::{child_of_kind, SourceFile},
};

/// An argument written at the call site.
#[derive(Clone, Copy, Debug)]
pub struct SuppliedArgument<'t> {
    /// The `value_argument` node.
    pub node: Node<'t>,
    /// The argument's expression, without its name.
    pub expression: Node<'t>,
    /// True if written as `name = expression`.
    pub named: bool,
    /// The index of the argument in the written list.
    pub position: usize,
}

/// How a formal parameter receives its value.
#[derive(Clone, Copy, Debug)]
pub enum Argument<'t> {
    /// From an argument at the call site.
    Supplied(SuppliedArgument<'t>),
    /// From the parameter's declared default.
    Defaulted,
}

/// A call resolved to a single callable.
#[derive(Clone, Debug)]
pub struct ResolvedCall<'t> {
    /// The target.
    pub callable: &'static Callable,
    /// One entry per formal parameter, in declaration order.
    pub arguments: Vec<Argument<'t>>,
    /// The parenthesized `value_arguments` node.
    pub argument_list: Node<'t>,
}

impl<'t> ResolvedCall<'t> {
    /// The formal parameters paired with how they are bound.
    pub fn bindings(&self) -> impl Iterator<Item = (&'static Parameter, &Argument<'t>)> {
        self.callable.parameters.iter().zip(&self.arguments)
    }

    /// The number of arguments written at the call site.
    pub fn supplied_count(&self) -> usize {
        self.arguments
            .iter()
            .filter(|a| matches!(a, Argument::Supplied(_)))
            .count()
    }
}

/// What a color site denotes.
#[derive(Clone, Debug)]
pub enum Target<'t> {
    /// A constructor or function call.
    Call(ResolvedCall<'t>),
    /// A named constant.
    Property(Property),
}

/// A resolved color expression.
#[derive(Clone, Debug)]
pub struct ColorSite<'t> {
    /// The token the site was found from.
    pub leaf: Node<'t>,
    /// The call or navigation expression.
    pub node: Node<'t>,
    /// The resolved target.
    pub target: Target<'t>,
}

/// An argument before it is mapped to a parameter.
struct WrittenArgument<'t> {
    node: Node<'t>,
    expression: Node<'t>,
    name: Option<&'t str>,
}

/// Resolves names in one file against the library.
pub struct Resolver<'a> {
    file: &'a SourceFile,
    library: &'a Library,
}

impl<'a> Resolver<'a> {
    /// Create a resolver for `file`.
    pub fn new(file: &'a SourceFile, library: &'a Library) -> Self {
        Self { file, library }
    }

    /// The file names are resolved in.
    pub fn file(&self) -> &'a SourceFile {
        self.file
    }

    /// The library names are resolved against.
    pub fn library(&self) -> &'a Library {
        self.library
    }

    /// Resolve a simple name through the file's imports. Local declarations
    /// shadow imports, explicit imports shadow wildcards, and a name that
    /// several wildcards export is ambiguous.
    pub fn resolve_name(&self, name: &str) -> Option<Symbol> {
        if self.file.declares(name) {
            event!(Level::TRACE, name, "shadowed by a local declaration");
            return None;
        }

        let imports = self.file.imports();

        let explicit: Vec<_> = imports
            .iter()
            .filter(|i| i.bound_name() == Some(name))
            .collect();
        if !explicit.is_empty() {
            return single(
                explicit
                    .iter()
                    .filter_map(|i| self.library.resolve_path(&i.path)),
            );
        }

        single(
            imports
                .iter()
                .filter(|i| i.wildcard)
                .filter_map(|i| self.library.export(&i.path, name)),
        )
    }

    /// Resolve a token that passed the syntactic test.
    pub fn resolve_candidate(&self, candidate: Candidate<'a>) -> Option<ColorSite<'a>> {
        let target = match candidate.shape {
            SiteShape::Call => Target::Call(self.resolve_call(candidate.site)?),
            SiteShape::Property => Target::Property(self.resolve_property(candidate.site)?),
        };

        Some(ColorSite {
            leaf: candidate.leaf,
            node: candidate.site,
            target,
        })
    }

    /// Resolve the site an edit anchor points at. Besides the tokens the
    /// syntactic test accepts, this accepts the receiver of a qualified
    /// call, which is where the anchor stays after a named constant is
    /// rewritten into a `fromHex` call.
    pub fn resolve_anchor(&self, leaf: Node<'a>) -> Option<ColorSite<'a>> {
        if let Some(candidate) = pattern::candidate(leaf) {
            return self.resolve_candidate(candidate);
        }

        let navigation = leaf
            .parent()
            .filter(|p| p.kind() == "navigation_expression")?;
        if navigation.child(0)?.id() != leaf.id() {
            return None;
        }
        let call = navigation
            .parent()
            .filter(|call| pattern::is_callee(navigation, *call))?;

        Some(ColorSite {
            leaf,
            node: call,
            target: Target::Call(self.resolve_call(call)?),
        })
    }

    /// Resolve `Receiver.NAME` to a named constant, either on the receiver's
    /// companion or as an imported extension property.
    pub fn resolve_property(&self, navigation: Node<'a>) -> Option<Property> {
        let receiver = navigation
            .child(0)
            .filter(|r| r.kind() == "simple_identifier")?;
        let name = self.file.node_text(pattern::selector(navigation)?);

        let Symbol::Class(class) = self.resolve_name(self.file.node_text(receiver))? else {
            return None;
        };

        if let Some(property) = self.library.companion_property(&class, name) {
            return Some(property);
        }

        match self.resolve_name(name) {
            Some(Symbol::Property(property))
                if property.is_extension() && property.receiver == class.name =>
            {
                Some(property)
            }
            _ => None,
        }
    }

    /// Resolve a call expression to exactly one callable.
    pub fn resolve_call(&self, call: Node<'a>) -> Option<ResolvedCall<'a>> {
        let callee = call.child(0)?;

        let candidates: Vec<&'static Callable> = match callee.kind() {
            "simple_identifier" => match self.resolve_name(self.file.node_text(callee))? {
                Symbol::Class(class) => self
                    .library
                    .overloads(class.package, Owner::Constructor(class.name), class.name)
                    .collect(),
                Symbol::Callables {
                    package,
                    owner,
                    name,
                } => self.library.overloads(package, owner, name).collect(),
                Symbol::Property(_) => return None,
            },
            "navigation_expression" => {
                let receiver = callee
                    .child(0)
                    .filter(|r| r.kind() == "simple_identifier")?;
                let selector = self.file.node_text(pattern::selector(callee)?);
                let Symbol::Class(class) = self.resolve_name(self.file.node_text(receiver))? else {
                    return None;
                };
                self.library
                    .overloads(class.package, Owner::Companion(class.name), selector)
                    .collect()
            }
            _ => return None,
        };

        let suffix = call.child(1).filter(|s| s.kind() == "call_suffix")?;
        if child_of_kind(suffix, "annotated_lambda").is_some() {
            return None;
        }
        let argument_list = child_of_kind(suffix, "value_arguments")?;
        let written = self.written_arguments(argument_list)?;

        let evaluator = Evaluator::new(self);
        let hints: Vec<ConstantValue> = written
            .iter()
            .map(|a| evaluator.evaluate(a.expression))
            .collect();

        let mut viable = candidates.into_iter().filter_map(|callable| {
            let arguments = map_arguments(callable, &written)?;
            let compatible = callable
                .parameters
                .iter()
                .zip(&arguments)
                .all(|(parameter, argument)| match argument {
                    Argument::Supplied(s) => accepts(parameter.kind, &hints[s.position]),
                    Argument::Defaulted => true,
                });
            compatible.then_some(ResolvedCall {
                callable,
                arguments,
                argument_list,
            })
        });

        let resolved = viable.next();
        if resolved.is_some() && viable.next().is_some() {
            event!(
                Level::TRACE,
                call = self.file.node_text(call),
                "call matches more than one overload"
            );
            return None;
        }
        resolved
    }

    fn written_arguments(&self, list: Node<'a>) -> Option<Vec<WrittenArgument<'a>>> {
        let mut written = Vec::new();

        for i in 0..list.named_child_count() {
            let node = list.named_child(i)?;
            if node.kind() != "value_argument" {
                continue;
            }

            let mut name = None;
            for j in 0..node.child_count() {
                let child = node.child(j)?;
                match child.kind() {
                    "*" => return None,
                    "=" => {
                        let previous = child.prev_named_sibling()?;
                        name = Some(self.file.node_text(previous));
                    }
                    _ => {}
                }
            }

            let expression = node.named_child(node.named_child_count().checked_sub(1)?)?;
            written.push(WrittenArgument {
                node,
                expression,
                name,
            });
        }

        Some(written)
    }
}

/// The only distinct item of `items`, if there is exactly one.
fn single(items: impl Iterator<Item = Symbol>) -> Option<Symbol> {
    let mut found: Option<Symbol> = None;
    for item in items {
        match found {
            Some(existing) if existing != item => return None,
            _ => found = Some(item),
        }
    }
    found
}

/// Map written arguments to the parameters of `callable`: positional
/// arguments by position, named ones by name. Fails on unknown names,
/// duplicate bindings, surplus arguments and missing parameters without a
/// default.
fn map_arguments<'t>(
    callable: &Callable,
    written: &[WrittenArgument<'t>],
) -> Option<Vec<Argument<'t>>> {
    let parameters = callable.parameters;
    let mut slots: Vec<Option<SuppliedArgument<'t>>> = vec![None; parameters.len()];

    for (position, argument) in written.iter().enumerate() {
        let index = match argument.name {
            Some(name) => parameters.iter().position(|p| p.name == name)?,
            None => position,
        };

        let slot = slots.get_mut(index)?;
        if slot.is_some() {
            return None;
        }
        *slot = Some(SuppliedArgument {
            node: argument.node,
            expression: argument.expression,
            named: argument.name.is_some(),
            position,
        });
    }

    slots
        .into_iter()
        .zip(parameters)
        .map(|(slot, parameter)| match slot {
            Some(supplied) => Some(Argument::Supplied(supplied)),
            None => parameter.default.map(|_| Argument::Defaulted),
        })
        .collect()
}

/// Whether a parameter of `kind` can take an argument whose constant value
/// is `hint`. Arguments of unknown value are accepted by every kind.
fn accepts(kind: ParameterKind, hint: &ConstantValue) -> bool {
    match hint {
        ConstantValue::Unknown => true,
        ConstantValue::Scalar(_) => kind == ParameterKind::Double,
        ConstantValue::Integer(_) => kind == ParameterKind::Integer,
        ConstantValue::Text(_) => kind == ParameterKind::Text,
        ConstantValue::WhitePointRef(_) => kind == ParameterKind::WhitePoint,
        ConstantValue::Linearity(_) => kind == ParameterKind::Linearity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{COLOR, PRESETS};

    const IMPORTS: &str = "import org.openrndr.color.*\nimport org.openrndr.extra.color.presets.*\nimport org.openrndr.extra.color.spaces.*\n";

    fn site<'t>(resolver: &Resolver<'t>, needle: &str) -> Option<ColorSite<'t>> {
        let file = resolver.file();
        let leaf = file.leaf_at(file.text().find(needle)?)?;
        resolver.resolve_candidate(pattern::candidate(leaf)?)
    }

    fn call<'t>(resolver: &Resolver<'t>, needle: &str) -> ResolvedCall<'t> {
        match site(resolver, needle).map(|s| s.target) {
            Some(Target::Call(call)) => call,
            other => panic!("expected a call at {}, got {:?}", needle, other),
        }
    }

    #[test]
    fn names_through_imports() {
        let file = SourceFile::parse(format!(
            "{}import org.openrndr.color.ColorRGBa.Companion.fromHex as hex\n",
            IMPORTS
        ))
        .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);

        assert!(matches!(resolver.resolve_name("ColorRGBa"), Some(Symbol::Class(_))));
        assert!(matches!(resolver.resolve_name("ColorOKLABa"), Some(Symbol::Class(c)) if c.package == crate::library::SPACES));
        assert!(matches!(
            resolver.resolve_name("hex"),
            Some(Symbol::Callables {
                name: "fromHex",
                ..
            })
        ));
        assert!(resolver.resolve_name("fromHex").is_none());
        assert!(matches!(resolver.resolve_name("HOT_PINK"), Some(Symbol::Property(p)) if p.package == PRESETS));
        assert!(resolver.resolve_name("Vector2").is_none());
    }

    #[test]
    fn no_imports_no_names() {
        let file = SourceFile::parse("val c = ColorRGBa.RED").unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);
        assert!(resolver.resolve_name("ColorRGBa").is_none());
        assert!(site(&resolver, "ColorRGBa").is_none());
    }

    #[test]
    fn explicit_imports_shadow_wildcards() {
        let file = SourceFile::parse(format!("{}import com.example.rgb\n\nval c = rgb(0.5)\n", IMPORTS))
            .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);
        assert!(resolver.resolve_name("rgb").is_none());
        assert!(resolver.resolve_name("hsl").is_some());
    }

    #[test]
    fn local_declarations_shadow_imports() {
        let file = SourceFile::parse(format!(
            "{}\nfun rgb(r: Double, g: Double, b: Double) = 0\nval c = rgb(0.1, 0.2, 0.3)\n",
            IMPORTS
        ))
        .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);
        assert!(site(&resolver, "rgb(0.1").is_none());
    }

    #[test]
    fn static_properties() {
        let file = SourceFile::parse(format!(
            "{}\nval a = ColorRGBa.RED\nval b = ColorRGBa.HOT_PINK\nval c = ColorXYZa.SO10_D50\nval d = ColorRGBa.SO10_D50\n",
            IMPORTS
        ))
        .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);

        let property = |needle: &str| match site(&resolver, needle).map(|s| s.target) {
            Some(Target::Property(p)) => Some(p),
            _ => None,
        };
        assert_eq!(property("ColorRGBa.RED").map(|p| p.package), Some(COLOR));
        assert_eq!(property("ColorRGBa.HOT_PINK").map(|p| p.package), Some(PRESETS));
        assert_eq!(property("ColorXYZa.SO10").map(|p| p.receiver), Some("ColorXYZa"));
        assert!(property("ColorRGBa.SO10").is_none());
    }

    #[test]
    fn overloads_by_arity_and_kind() {
        let file = SourceFile::parse(format!(
            "{}\nfun main() {{\n    rgb(0.7)\n    rgb(0.6, 0.1)\n    rgb(0.1, 0.9, 0.3)\n    rgb(\"#0ff\")\n    ColorRGBa.fromHex(0xffff00)\n    ColorRGBa.fromHex(\"#ff00ff\")\n    rgb(1, 0, 0)\n}}\n",
            IMPORTS
        ))
        .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);

        let names = |needle: &str| -> Vec<&str> {
            call(&resolver, needle)
                .callable
                .parameters
                .iter()
                .map(|p| p.name)
                .collect()
        };
        assert_eq!(names("rgb(0.7)"), ["gray"]);
        assert_eq!(names("rgb(0.6"), ["rb", "g"]);
        assert_eq!(names("rgb(0.1"), ["r", "g", "b", "a"]);
        assert_eq!(names("rgb(\""), ["hex"]);

        let kind = |needle: &str| call(&resolver, needle).callable.parameters[0].kind;
        assert_eq!(kind("fromHex(0x"), ParameterKind::Integer);
        assert_eq!(kind("fromHex(\""), ParameterKind::Text);

        assert!(site(&resolver, "rgb(1,").is_none());
    }

    #[test]
    fn named_arguments() {
        let file = SourceFile::parse(format!(
            "{}\nval c = ColorRGBa(0.1, b = 0.8, g = 0.1)\nval d = ColorRGBa(0.1, r = 0.8)\n",
            IMPORTS
        ))
        .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);

        let resolved = call(&resolver, "ColorRGBa(0.1, b");
        let written: Vec<_> = resolved
            .bindings()
            .map(|(p, a)| match a {
                Argument::Supplied(s) => (p.name, Some((s.position, s.named))),
                Argument::Defaulted => (p.name, None),
            })
            .collect();
        assert_eq!(
            written,
            [
                ("r", Some((0, false))),
                ("g", Some((2, true))),
                ("b", Some((1, true))),
                ("alpha", None),
                ("linearity", None),
            ]
        );
        assert_eq!(resolved.supplied_count(), 3);

        // `r` is bound twice.
        assert!(site(&resolver, "ColorRGBa(0.1, r").is_none());
    }

    #[test]
    fn anchors_on_qualified_receivers() {
        let file = SourceFile::parse(format!("{}\nval c = ColorRGBa.fromHex(\"#ff0000\")\n", IMPORTS))
            .unwrap();
        let library = Library::default();
        let resolver = Resolver::new(&file, &library);

        let leaf = file.leaf_at(file.text().find("ColorRGBa.from").unwrap()).unwrap();
        let site = resolver.resolve_anchor(leaf).unwrap();
        assert_eq!(file.node_text(site.node), "ColorRGBa.fromHex(\"#ff0000\")");
        assert!(matches!(site.target, Target::Call(ref c) if c.callable.name == "fromHex"));
    }
}

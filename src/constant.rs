//! Reduce argument expressions to constants: literals, local `val`s,
//! arithmetic over them and library defaults. Anything else is
//! [`ConstantValue::Unknown`].

use tree_sitter::Node;
use tracing::{event, Level};

use crate::{
    color::{Component, Linearity},
    library::{DefaultValue, Parameter, ParameterKind, Symbol, COLOR},
    models::Xyza,
    pattern,
    presets::PresetValue,
    resolve::{Argument, ResolvedCall, Resolver},
};

/// How many local declarations deep a reference is followed.
pub const MAX_DEPTH: usize = 4;

/// The value of a reduced expression.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantValue {
    /// A `Double`.
    Scalar(Component),
    /// An `Int` or `Long`.
    Integer(i64),
    /// A string without templates.
    Text(String),
    /// A white point.
    WhitePointRef(Xyza),
    /// A `Linearity` entry.
    Linearity(Linearity),
    /// Anything that could not be reduced.
    Unknown,
}

impl ConstantValue {
    /// True for [`ConstantValue::Unknown`].
    pub fn is_unknown(&self) -> bool {
        matches!(self, ConstantValue::Unknown)
    }

    fn as_number(&self) -> Option<Component> {
        match *self {
            ConstantValue::Scalar(value) => Some(value),
            ConstantValue::Integer(value) => Some(value as Component),
            _ => None,
        }
    }

    fn from_default(default: Option<DefaultValue>) -> Self {
        match default {
            Some(DefaultValue::Opaque) => ConstantValue::Scalar(1.0),
            Some(DefaultValue::NeutralWhitePoint) => ConstantValue::WhitePointRef(Xyza::NEUTRAL),
            Some(DefaultValue::UnknownLinearity) => ConstantValue::Linearity(Linearity::Unknown),
            None => ConstantValue::Unknown,
        }
    }

    /// Keep the value only if a parameter of `kind` takes it as is. An `Int`
    /// passed for a `Double` does not compile, so it stays unknown.
    fn coerce(self, kind: ParameterKind) -> Self {
        let fits = matches!(
            (&self, kind),
            (ConstantValue::Scalar(_), ParameterKind::Double)
                | (ConstantValue::Integer(_), ParameterKind::Integer)
                | (ConstantValue::Text(_), ParameterKind::Text)
                | (ConstantValue::WhitePointRef(_), ParameterKind::WhitePoint)
                | (ConstantValue::Linearity(_), ParameterKind::Linearity)
        );
        if fits {
            self
        } else {
            ConstantValue::Unknown
        }
    }
}

/// A parameter together with the value it is bound to.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundParameter {
    /// The formal parameter.
    pub parameter: &'static Parameter,
    /// Its index in declaration order.
    pub index: usize,
    /// The bound value.
    pub value: ConstantValue,
}

/// The values of all parameters of a resolved call, in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterBinding {
    entries: Vec<BoundParameter>,
}

impl ParameterBinding {
    /// The bound parameters.
    pub fn entries(&self) -> &[BoundParameter] {
        &self.entries
    }

    /// The value bound to the parameter called `name`.
    pub fn get(&self, name: &str) -> Option<&ConstantValue> {
        self.entries
            .iter()
            .find(|e| e.parameter.name == name)
            .map(|e| &e.value)
    }

    /// True if every parameter has a known value.
    pub fn is_resolved(&self) -> bool {
        !self.entries.iter().any(|e| e.value.is_unknown())
    }

    /// The numeric color components, alpha included, in declaration order.
    pub fn color_components(&self) -> Vec<Component> {
        self.entries
            .iter()
            .filter(|e| e.parameter.kind == ParameterKind::Double)
            .filter_map(|e| match e.value {
                ConstantValue::Scalar(value) => Some(value),
                _ => None,
            })
            .collect()
    }

    /// The bound white point, if the callable takes one.
    pub fn reference(&self) -> Option<Xyza> {
        self.entries.iter().find_map(|e| match e.value {
            ConstantValue::WhitePointRef(xyz) => Some(xyz),
            _ => None,
        })
    }

    /// The bound linearity, if the callable takes one.
    pub fn linearity(&self) -> Option<Linearity> {
        self.entries.iter().find_map(|e| match e.value {
            ConstantValue::Linearity(linearity) => Some(linearity),
            _ => None,
        })
    }

    /// The value of the hex parameter, if the callable takes one.
    pub fn hex(&self) -> Option<&ConstantValue> {
        self.entries
            .iter()
            .find(|e| matches!(e.parameter.kind, ParameterKind::Integer | ParameterKind::Text))
            .map(|e| &e.value)
    }
}

/// Evaluates expressions in the file of a [`Resolver`].
pub struct Evaluator<'r, 'a> {
    resolver: &'r Resolver<'a>,
}

impl<'r, 'a> Evaluator<'r, 'a> {
    /// Create an evaluator that resolves names through `resolver`.
    pub fn new(resolver: &'r Resolver<'a>) -> Self {
        Self { resolver }
    }

    /// Reduce `expression` to a constant.
    pub fn evaluate(&self, expression: Node<'a>) -> ConstantValue {
        self.evaluate_at(expression, 0)
    }

    /// Bind every parameter of `call` to a value, taking library defaults for
    /// parameters without an argument.
    pub fn bind(&self, call: &ResolvedCall<'a>) -> ParameterBinding {
        self.bind_at(call, 0)
    }

    fn bind_at(&self, call: &ResolvedCall<'a>, depth: usize) -> ParameterBinding {
        let entries = call
            .bindings()
            .enumerate()
            .map(|(index, (parameter, argument))| {
                let value = match argument {
                    Argument::Defaulted => ConstantValue::from_default(parameter.default),
                    Argument::Supplied(supplied) if parameter.kind == ParameterKind::WhitePoint => {
                        self.white_point_at(supplied.expression, depth)
                    }
                    Argument::Supplied(supplied) => self
                        .evaluate_at(supplied.expression, depth)
                        .coerce(parameter.kind),
                };
                BoundParameter {
                    parameter,
                    index,
                    value,
                }
            })
            .collect();

        ParameterBinding { entries }
    }

    fn text(&self, node: Node<'a>) -> &'a str {
        self.resolver.file().node_text(node)
    }

    fn evaluate_at(&self, node: Node<'a>, depth: usize) -> ConstantValue {
        match node.kind() {
            "real_literal" => parse_real(self.text(node)),
            "integer_literal" => parse_integer(self.text(node), 10),
            "hex_literal" => parse_integer(&self.text(node)[2..], 16),
            "bin_literal" => parse_integer(&self.text(node)[2..], 2),
            "long_literal" => match node.named_child(0) {
                Some(inner) => self.evaluate_at(inner, depth),
                None => parse_integer(self.text(node).trim_end_matches('L'), 10),
            },
            "line_string_literal" | "multi_line_string_literal" => self.string(node),
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.evaluate_at(inner, depth),
                None => ConstantValue::Unknown,
            },
            "prefix_expression" => self.prefix(node, depth),
            "additive_expression" | "multiplicative_expression" => self.binary(node, depth),
            "simple_identifier" => match self.initializer(node, depth) {
                Some(init) => self.evaluate_at(init, depth + 1),
                None => ConstantValue::Unknown,
            },
            "navigation_expression" => self.enum_entry(node),
            _ => ConstantValue::Unknown,
        }
    }

    /// Text is anonymous in a string literal, so a named child is an
    /// interpolation. Escapes stay in the text and `parse_string` rejects them.
    fn string(&self, node: Node<'a>) -> ConstantValue {
        if node.named_child_count() == 0 {
            parse_string(self.text(node))
        } else {
            ConstantValue::Unknown
        }
    }

    fn initializer(&self, reference: Node<'a>, depth: usize) -> Option<Node<'a>> {
        if depth >= MAX_DEPTH {
            event!(
                Level::TRACE,
                name = self.text(reference),
                "reference nested too deep"
            );
            return None;
        }
        self.resolver
            .file()
            .property_initializer(reference, self.text(reference))
    }

    fn prefix(&self, node: Node<'a>, depth: usize) -> ConstantValue {
        let (Some(operator), Some(operand)) = (node.child(0), node.named_child(0)) else {
            return ConstantValue::Unknown;
        };

        match (operator.kind(), self.evaluate_at(operand, depth)) {
            ("+", value @ (ConstantValue::Scalar(_) | ConstantValue::Integer(_))) => value,
            ("-", ConstantValue::Scalar(value)) => ConstantValue::Scalar(-value),
            ("-", ConstantValue::Integer(value)) => value
                .checked_neg()
                .map(ConstantValue::Integer)
                .unwrap_or(ConstantValue::Unknown),
            _ => ConstantValue::Unknown,
        }
    }

    fn binary(&self, node: Node<'a>, depth: usize) -> ConstantValue {
        let (Some(left), Some(operator), Some(right)) = (node.child(0), node.child(1), node.child(2))
        else {
            return ConstantValue::Unknown;
        };

        arithmetic(
            operator.kind(),
            self.evaluate_at(left, depth),
            self.evaluate_at(right, depth),
        )
    }

    /// `Linearity.NAME`.
    fn enum_entry(&self, node: Node<'a>) -> ConstantValue {
        let entry = node.child(0).zip(pattern::selector(node)).and_then(|(receiver, selector)| {
            match self.resolver.resolve_name(self.text(receiver))? {
                Symbol::Class(class) if class.package == COLOR && class.name == "Linearity" => {
                    Linearity::from_name(self.text(selector))
                }
                _ => None,
            }
        });
        entry
            .map(ConstantValue::Linearity)
            .unwrap_or(ConstantValue::Unknown)
    }

    /// Reduce a white point argument: a named white point, a `ColorXYZa`
    /// call with constant arguments, or a local constant holding either.
    pub fn white_point(&self, expression: Node<'a>) -> ConstantValue {
        self.white_point_at(expression, 0)
    }

    fn white_point_at(&self, node: Node<'a>, depth: usize) -> ConstantValue {
        match node.kind() {
            "navigation_expression" => match self.resolver.resolve_property(node) {
                Some(property) => match property.value {
                    PresetValue::WhitePoint(x, y, z) => {
                        ConstantValue::WhitePointRef(Xyza::new(x, y, z, 1.0))
                    }
                    _ => ConstantValue::Unknown,
                },
                None => ConstantValue::Unknown,
            },
            "call_expression" if depth < MAX_DEPTH => {
                let Some(call) = self.resolver.resolve_call(node) else {
                    return ConstantValue::Unknown;
                };
                if call.callable.name != "ColorXYZa" {
                    return ConstantValue::Unknown;
                }
                let binding = self.bind_at(&call, depth + 1);
                match binding.color_components()[..] {
                    [x, y, z, alpha] if binding.is_resolved() => {
                        ConstantValue::WhitePointRef(Xyza::new(x, y, z, alpha))
                    }
                    _ => ConstantValue::Unknown,
                }
            }
            "simple_identifier" => match self.initializer(node, depth) {
                Some(init) => self.white_point_at(init, depth + 1),
                None => ConstantValue::Unknown,
            },
            "parenthesized_expression" => match node.named_child(0) {
                Some(inner) => self.white_point_at(inner, depth),
                None => ConstantValue::Unknown,
            },
            _ => ConstantValue::Unknown,
        }
    }
}

fn parse_real(text: &str) -> ConstantValue {
    if text.ends_with(['f', 'F']) {
        return ConstantValue::Unknown;
    }
    text.replace('_', "")
        .parse::<Component>()
        .map(ConstantValue::Scalar)
        .unwrap_or(ConstantValue::Unknown)
}

fn parse_integer(digits: &str, radix: u32) -> ConstantValue {
    i64::from_str_radix(&digits.replace('_', ""), radix)
        .map(ConstantValue::Integer)
        .unwrap_or(ConstantValue::Unknown)
}

/// Plain string literals only. Templates and escapes are not reduced.
fn parse_string(text: &str) -> ConstantValue {
    let body = text
        .strip_prefix("\"\"\"")
        .and_then(|t| t.strip_suffix("\"\"\""))
        .or_else(|| text.strip_prefix('"').and_then(|t| t.strip_suffix('"')));

    match body {
        Some(body) if !body.contains(['$', '\\']) => ConstantValue::Text(body.to_string()),
        _ => ConstantValue::Unknown,
    }
}

/// Kotlin arithmetic: `Int` with `Int` stays integral and divides with
/// truncation, anything with a `Double` is a `Double`.
fn arithmetic(operator: &str, left: ConstantValue, right: ConstantValue) -> ConstantValue {
    if let (ConstantValue::Integer(l), ConstantValue::Integer(r)) = (&left, &right) {
        let value = match operator {
            "+" => l.checked_add(*r),
            "-" => l.checked_sub(*r),
            "*" => l.checked_mul(*r),
            "/" => l.checked_div(*r),
            "%" => l.checked_rem(*r),
            _ => None,
        };
        return value
            .map(ConstantValue::Integer)
            .unwrap_or(ConstantValue::Unknown);
    }

    let (Some(l), Some(r)) = (left.as_number(), right.as_number()) else {
        return ConstantValue::Unknown;
    };
    let value = match operator {
        "+" => l + r,
        "-" => l - r,
        "*" => l * r,
        "/" => l / r,
        "%" => l % r,
        _ => return ConstantValue::Unknown,
    };

    if value.is_finite() {
        ConstantValue::Scalar(value)
    } else {
        ConstantValue::Unknown
    }
}

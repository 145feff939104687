//! Turn a picked color back into source text: format the new arguments for
//! the model a call uses and splice them into its argument list.

use std::ops::RangeInclusive;

use tracing::{event, Level};

use crate::{
    color::{Component, Rgba},
    config::ProviderConfig,
    constant::{ConstantValue, ParameterBinding},
    descriptor::{ColorModelDescriptor, DescriptorFlags, Shape},
    models::{Vector, Xyza},
    resolve::{Argument, ResolvedCall},
};

/// Format a component with a number of fraction digits in `digits`. Returns
/// `None` for values that are not finite.
pub fn format_component(value: Component, digits: &RangeInclusive<usize>) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let mut text = format!("{:.*}", *digits.end(), value);
    if let Some(dot) = text.find('.') {
        let shortest = dot + 1 + *digits.start();
        while text.len() > shortest && text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }

    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }

    Some(text)
}

/// The hex argument for `color`: a quoted `#rrggbb[aa]` string, or
/// `0xRRGGBB` when the argument was written as an integer and the color is
/// opaque.
pub fn hex_argument(color: &Rgba, original: Option<&ConstantValue>, config: &ProviderConfig) -> String {
    let opaque = color.to_rgba8()[3] == 0xff;
    if config.integer_hex && opaque && matches!(original, Some(ConstantValue::Integer(_))) {
        format!("0x{:06x}", color.to_hex_int())
    } else {
        format!("\"{}\"", color.to_hex_string())
    }
}

/// The arguments that write `color` in the model of `descriptor`, in
/// parameter order.
pub fn arguments_from_color(
    descriptor: &ColorModelDescriptor,
    color: &Rgba,
    binding: &ParameterBinding,
    config: &ProviderConfig,
) -> Option<Vec<String>> {
    let hex = binding.hex();

    let vector = match descriptor.shape {
        Shape::Hex => return Some(vec![hex_argument(color, hex, config)]),
        Shape::RgbShorthand if matches!(hex, Some(ConstantValue::Text(_))) => {
            return Some(vec![hex_argument(color, hex, config)]);
        }
        Shape::RgbShorthand => color.to_srgb().to_vector(),
        Shape::Rgba => color
            .to_linearity(binding.linearity().unwrap_or_default())
            .to_vector(),
        Shape::Components => {
            let intermediate = if descriptor.flags.contains(DescriptorFlags::LINEAR_INTERMEDIATE) {
                color.to_linear()
            } else {
                color.to_srgb()
            };
            let reference = binding.reference().unwrap_or(Xyza::NEUTRAL);
            let vector = (descriptor.to_components)(&intermediate, reference);
            nearest_written(descriptor, vector, color, reference, *config.fraction_digits.end())
        }
    };

    vector
        .iter()
        .map(|v| format_component(*v, &config.fraction_digits))
        .collect()
}

/// Half of an 8-bit channel step, in sRGB.
const HALF_STEP: Component = 0.5 / 255.0;

/// Round the color components of `vector` to `digits` fraction digits.
///
/// Some models are ill-conditioned at that precision: OKHSL lightness near
/// the bright secondaries, or hues that sit on a cusp. When the plain
/// rounding decodes further than half a channel step from `target`, every
/// component may move one step either way and the closest decode is kept.
fn nearest_written(
    descriptor: &ColorModelDescriptor,
    vector: [Component; 4],
    target: &Rgba,
    reference: Xyza,
    digits: usize,
) -> [Component; 4] {
    let scale = Component::powi(10.0, digits as i32);
    let rounded = vector.map(|v| (v * scale).round() / scale);
    let target = target.to_srgb().clamped();

    let distance = |candidate: &[Component; 4]| {
        let decoded = (descriptor.from_components)(candidate, reference)
            .to_srgb()
            .clamped();
        (decoded.r - target.r)
            .abs()
            .max((decoded.g - target.g).abs())
            .max((decoded.b - target.b).abs())
    };

    let mut best = rounded;
    let mut best_distance = distance(&rounded);
    if best_distance.is_nan() || best_distance <= HALF_STEP {
        return vector;
    }

    for candidate in (0..27).filter_map(|index| nudged(&rounded, index, 1.0 / scale)) {
        let candidate_distance = distance(&candidate);
        if candidate_distance < best_distance {
            best = candidate;
            best_distance = candidate_distance;
        }
    }

    event!(
        Level::TRACE,
        model = descriptor.name,
        distance = best_distance,
        "nudged rounded components"
    );
    best
}

/// One of the 27 ways of moving the three color components by `step`. A
/// component inside `0..=1` is not moved out of it.
fn nudged(rounded: &[Component; 4], index: usize, step: Component) -> Option<[Component; 4]> {
    let unit = 0.0..=1.0;
    let mut candidate = *rounded;
    for (axis, value) in candidate.iter_mut().take(3).enumerate() {
        let offset = (index / 3usize.pow(axis as u32)) % 3;
        let start = *value;
        let moved = start + (offset as Component - 1.0) * step;
        if unit.contains(&start) && !unit.contains(&moved) {
            return None;
        }
        *value = moved;
    }
    Some(candidate)
}

fn is_opaque(value: &str) -> bool {
    value.parse::<Component>().map(|v| v == 1.0).unwrap_or(false)
}

/// Build the new argument list, parentheses included, for `call` from
/// `values` given in parameter order.
///
/// When the call resolved to an overload with too few parameters for the
/// values, the list is written positionally. Otherwise arguments keep their
/// order and their named or positional form, values past the end of
/// `values` keep their original text, and defaulted parameters that get a
/// value other than their default are appended by name.
pub fn construct_replacement(
    source: &str,
    call: &ResolvedCall<'_>,
    values: &[String],
    flags: DescriptorFlags,
) -> String {
    let parameters = call.callable.parameters;

    if parameters.len() + 1 < values.len() {
        let mut values = values;
        if flags.contains(DescriptorFlags::IMPLICIT_ALPHA) && values.len() == 4 && is_opaque(&values[3]) {
            values = &values[..3];
        }
        event!(
            Level::DEBUG,
            callable = call.callable.name,
            "writing arguments positionally"
        );
        return format!("({})", values.join(", "));
    }

    let mut written = Vec::new();
    let mut appended = Vec::new();

    for (index, (parameter, argument)) in call.bindings().enumerate() {
        let value = values.get(index);
        match argument {
            Argument::Supplied(supplied) => {
                let expression = match value {
                    Some(value) => value.as_str(),
                    None => &source[supplied.expression.byte_range()],
                };
                let text = if supplied.named {
                    format!("{} = {}", parameter.name, expression)
                } else {
                    expression.to_string()
                };
                written.push((supplied.position, text));
            }
            Argument::Defaulted => {
                if let Some(value) = value {
                    if !(parameter.is_alpha() && is_opaque(value)) {
                        appended.push(format!("{} = {}", parameter.name, value));
                    }
                }
            }
        }
    }

    written.sort_by_key(|(position, _)| *position);
    let arguments: Vec<String> = written
        .into_iter()
        .map(|(_, text)| text)
        .chain(appended)
        .collect();

    format!("({})", arguments.join(", "))
}

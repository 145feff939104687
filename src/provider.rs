//! The entry points a host calls: read the color of a token, list every color
//! in a file, and write a picked color back.

use std::ops::Range;

use tree_sitter::Node;
use tracing::{event, Level};

use crate::{
    color::Rgba,
    config::ProviderConfig,
    constant::Evaluator,
    descriptor::{self, DescriptorFlags},
    document::{Document, TextEdit},
    encode::{arguments_from_color, construct_replacement, hex_argument},
    library::Library,
    pattern,
    presets::{self, static_colors},
    resolve::{ColorSite, Resolver, Target},
    syntax::{descendants, SourceFile},
};

/// A color found in a file, anchored at the token that heads it.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorSwatch {
    /// The byte range of the anchor token.
    pub range: Range<usize>,
    /// The decoded color.
    pub color: Rgba,
}

/// Finds, decodes and rewrites color expressions.
#[derive(Clone, Debug)]
pub struct ColorProvider {
    config: ProviderConfig,
    library: Library,
}

impl Default for ColorProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

impl ColorProvider {
    /// Create a provider with the given options.
    pub fn new(config: ProviderConfig) -> Self {
        let library = Library::new(config.packages.iter().cloned());
        Self { config, library }
    }

    /// The options of this provider.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// The color of the expression `leaf` heads, if it is a color expression
    /// with constant arguments.
    pub fn try_get_color<'t>(&self, file: &'t SourceFile, leaf: Node<'t>) -> Option<Rgba> {
        let resolver = Resolver::new(file, &self.library);
        if !pattern::matches(&resolver, leaf) {
            return None;
        }

        let site = resolver.resolve_candidate(pattern::candidate(leaf)?)?;
        decode(&resolver, &site)
    }

    /// The color of the expression headed by the token at `offset`.
    pub fn color_at(&self, file: &SourceFile, offset: usize) -> Option<Rgba> {
        self.try_get_color(file, file.leaf_at(offset)?)
    }

    /// Every color expression in `file`, in source order.
    pub fn colors(&self, file: &SourceFile) -> Vec<ColorSwatch> {
        let resolver = Resolver::new(file, &self.library);

        file.identifiers()
            .filter(|leaf| pattern::matches(&resolver, *leaf))
            .filter_map(|leaf| {
                let site = resolver.resolve_candidate(pattern::candidate(leaf)?)?;
                Some(ColorSwatch {
                    range: leaf.byte_range(),
                    color: decode(&resolver, &site)?,
                })
            })
            .collect()
    }

    /// The edit that writes `color` into the expression anchored at
    /// `anchor`.
    ///
    /// A named `ColorRGBa` constant is rewritten into a `fromHex` call by
    /// replacing the constant's name, which keeps the receiver token as the
    /// anchor. Calls get a new argument list in their own model.
    pub fn color_edit(&self, file: &SourceFile, anchor: usize, color: &Rgba) -> Option<TextEdit> {
        let resolver = Resolver::new(file, &self.library);
        let site = resolver.resolve_anchor(file.leaf_at(anchor)?)?;

        match site.target {
            Target::Property(property) => {
                if property.receiver != "ColorRGBa" {
                    event!(
                        Level::TRACE,
                        name = property.name,
                        "named constant is not editable"
                    );
                    return None;
                }

                let selector = pattern::selector(site.node)?;
                event!(
                    Level::DEBUG,
                    name = property.name,
                    "rewriting named color into fromHex"
                );
                Some(TextEdit {
                    range: selector.byte_range(),
                    text: format!("fromHex({})", hex_argument(color, None, &self.config)),
                })
            }
            Target::Call(call) => {
                let descriptor = descriptor::lookup(call.callable)?;
                let binding = Evaluator::new(&resolver).bind(&call);

                if descriptor
                    .flags
                    .contains(DescriptorFlags::REFERENCE_WHITE_POINT)
                    && binding.reference().is_none()
                {
                    event!(
                        Level::DEBUG,
                        model = descriptor.name,
                        "white point is not constant"
                    );
                    return None;
                }

                let values = arguments_from_color(descriptor, color, &binding, &self.config)?;
                Some(TextEdit {
                    range: call.argument_list.byte_range(),
                    text: construct_replacement(file.text(), &call, &values, descriptor.flags),
                })
            }
        }
    }

    /// Write `color` into the expression anchored at `anchor` as a single
    /// undoable edit. The document is parsed again on every call, so the
    /// anchor stays valid across repeated edits of the same expression.
    pub fn apply_color(&self, document: &mut impl Document, anchor: usize, color: &Rgba) -> bool {
        let file = match SourceFile::parse(document.text()) {
            Ok(file) => file,
            Err(err) => {
                event!(Level::ERROR, %err, "could not parse the document");
                return false;
            }
        };

        let Some(edit) = self.color_edit(&file, anchor, color) else {
            return false;
        };

        match document.replace(&self.config.command_label, edit) {
            Ok(()) => true,
            Err(err) => {
                event!(Level::ERROR, %err, "could not apply the color edit");
                false
            }
        }
    }

    /// The color of a named constant, for completion lists. Constants on
    /// `ColorRGBa` win over white points of the same name.
    pub fn preset_color(&self, name: &str) -> Option<Rgba> {
        let visible = || {
            presets::properties()
                .filter(move |p| p.name == name && self.library.is_enabled(p.package))
        };
        let property = visible()
            .find(|p| p.receiver == "ColorRGBa")
            .or_else(|| visible().next())?;
        static_colors().color(property.receiver, property.name)
    }

    /// The color a `val` declared in `file` is initialized with.
    pub fn declaration_color(&self, file: &SourceFile, name: &str) -> Option<Rgba> {
        let initializer = file.find_property(name)?;
        let leaf = descendants(initializer)
            .filter(|n| n.kind() == "simple_identifier")
            .find(|leaf| {
                pattern::candidate(*leaf).map(|c| c.site.id()) == Some(initializer.id())
            })?;
        self.try_get_color(file, leaf)
    }
}

fn decode<'a>(resolver: &Resolver<'a>, site: &ColorSite<'a>) -> Option<Rgba> {
    match &site.target {
        Target::Property(property) => static_colors().color(property.receiver, property.name),
        Target::Call(call) => {
            let descriptor = descriptor::lookup(call.callable)?;
            let binding = Evaluator::new(resolver).bind(call);
            descriptor.decode(&binding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::Linearity,
        descriptor::{ColorModelDescriptor, Shape, DESCRIPTORS},
        document::TextDocument,
        library::COLOR,
        models::{Hsla, Hsva, Laba, Model, Oklaba, ReferenceWhitePoint, Xyza},
    };

    const IMPORTS: &str = "import org.openrndr.color.*\nimport org.openrndr.extra.color.presets.*\nimport org.openrndr.extra.color.spaces.*\n";

    fn template(prelude: &str, expression: &str) -> String {
        format!(
            "{}{}\n\nfun main() {{\n    {}\n}}\n",
            IMPORTS, prelude, expression
        )
    }

    fn gutter_with(provider: &ColorProvider, source: &str) -> Vec<[u8; 4]> {
        let file = SourceFile::parse(source).unwrap();
        provider
            .colors(&file)
            .into_iter()
            .map(|swatch| swatch.color.to_rgba8())
            .collect()
    }

    fn gutter(prelude: &str, expression: &str) -> Vec<[u8; 4]> {
        gutter_with(&ColorProvider::default(), &template(prelude, expression))
    }

    fn single(expression: &str) -> [u8; 4] {
        let colors = gutter("", expression);
        assert_eq!(colors.len(), 1, "{} gave {:?}", expression, colors);
        colors[0]
    }

    fn srgb(r: f64, g: f64, b: f64, alpha: f64) -> [u8; 4] {
        Rgba::new(r, g, b, alpha, Linearity::Unknown).to_rgba8()
    }

    #[test]
    fn static_colors_in_the_gutter() {
        assert_eq!(single("ColorRGBa.RED"), [255, 0, 0, 255]);
        assert_eq!(single("ColorRGBa.BLUE"), [0, 0, 255, 255]);
        assert_eq!(single("ColorRGBa.HOT_PINK"), [255, 105, 180, 255]);
    }

    #[test]
    fn several_colors_on_one_line() {
        assert_eq!(
            gutter(
                "",
                "val c = listOf(ColorRGBa.RED, ColorRGBa.GREEN, ColorRGBa.BLUE, ColorRGBa.YELLOW)"
            ),
            [
                [255, 0, 0, 255],
                [0, 255, 0, 255],
                [0, 0, 255, 255],
                [255, 255, 0, 255]
            ]
        );
    }

    #[test]
    fn rgba_constructor() {
        let linear = Rgba::new(1.0, 0.4, 0.2, 1.0, Linearity::Linear).to_rgba8();
        assert_eq!(single("ColorRGBa(1.0, 0.4, 0.2, 1.0, Linearity.LINEAR)"), linear);
        assert_eq!(single("ColorRGBa(1.0, 0.4, 0.2, 1.0)"), srgb(1.0, 0.4, 0.2, 1.0));
    }

    #[test]
    fn hex_calls() {
        assert_eq!(single("ColorRGBa.fromHex(\"#f0f\")"), [255, 0, 255, 255]);
        assert_eq!(single("ColorRGBa.fromHex(\"#ff00ff\")"), [255, 0, 255, 255]);
        assert_eq!(single("ColorRGBa.fromHex(\"#ff00ff7f\")"), [255, 0, 255, 0x7f]);
        assert_eq!(single("ColorRGBa.fromHex(\"#3037\")"), [0x33, 0, 0x33, 0x77]);
        assert_eq!(single("ColorRGBa.fromHex(0xffff00)"), [255, 255, 0, 255]);
    }

    #[test]
    fn rgb_shorthand() {
        assert_eq!(single("rgb(0.7)"), srgb(0.7, 0.7, 0.7, 1.0));
        assert_eq!(single("rgb(0.6, 0.1)"), srgb(0.6, 0.1, 0.6, 1.0));
        assert_eq!(single("rgb(0.1, 0.9, 0.3)"), srgb(0.1, 0.9, 0.3, 1.0));
        assert_eq!(single("rgb(1.0, 0.1, 0.3, 0.5)"), srgb(1.0, 0.1, 0.3, 0.5));
        assert_eq!(single("rgb(\"#0ff\")"), [0, 255, 255, 255]);
    }

    #[test]
    fn local_constants() {
        let prelude = "const val X = 0.3\nval a = 0.1\nval b = a + X";
        assert_eq!(gutter(prelude, "ColorRGBa(0.7, X, 0.2)"), [srgb(0.7, 0.3, 0.2, 1.0)]);
        assert_eq!(gutter(prelude, "ColorRGBa(0.3, a, 0.2)"), [srgb(0.3, 0.1, 0.2, 1.0)]);
        assert_eq!(gutter(prelude, "ColorRGBa(0.6, b, a)"), [srgb(0.6, 0.4, 0.1, 1.0)]);
    }

    #[test]
    fn unknown_arguments_give_no_color() {
        assert!(gutter("var v = 0.5", "ColorRGBa(0.6, v, 0.1)").is_empty());
        assert!(gutter("", "ColorRGBa(1, 0, 0)").is_empty());
        assert!(gutter("", "ColorRGBa(0.5f, 0.1, 0.1)").is_empty());
    }

    #[test]
    fn hsv_and_hsl() {
        let hsv = |h, s, v, a| Hsva::new(h, s, v, a).to_rgba().to_rgba8();
        let hsl = |h, s, l, a| Hsla::new(h, s, l, a).to_rgba().to_rgba8();
        assert_eq!(single("ColorHSVa(300.0, 0.35, 0.9, 0.4)"), hsv(300.0, 0.35, 0.9, 0.4));
        assert_eq!(single("hsv(303.5, 0.07, 0.8)"), hsv(303.5, 0.07, 0.8, 1.0));
        assert_eq!(single("hsv(89.3, 0.13, 0.9, 0.95)"), hsv(89.3, 0.13, 0.9, 0.95));
        assert_eq!(single("hsl(303.5, 0.07, 0.8)"), hsl(303.5, 0.07, 0.8, 1.0));
        assert_eq!(single("hsl(89.3, 0.13, 0.9, 0.95)"), hsl(89.3, 0.13, 0.9, 0.95));
    }

    #[test]
    fn named_arguments() {
        assert_eq!(single("ColorRGBa(0.1, b = 0.8, g = 0.1)"), srgb(0.1, 0.1, 0.8, 1.0));
        assert_eq!(single("ColorRGBa(0.3, g = 0.7, b = 0.1)"), srgb(0.3, 0.7, 0.1, 1.0));
    }

    #[test]
    fn renamed_import() {
        let prelude = "import org.openrndr.color.ColorRGBa.Companion.fromHex as hex";
        assert_eq!(gutter(prelude, "hex(\"#ff007f\")"), [[255, 0, 0x7f, 255]]);
    }

    #[test]
    fn lab_with_reference_white() {
        let ul3000 = Xyza::new(1.11428, 1.0, 0.40353, 1.0);
        let lab = Laba::new(73.233, 20.105, 67.223, 0.812, ul3000).to_rgba().to_rgba8();
        assert_eq!(
            gutter(
                "",
                "ColorLABa(73.233, 20.105, 67.223, alpha = 0.812, ref = ColorXYZa.SO10_UL3000)"
            ),
            [lab, ul3000.to_rgba().to_rgba8()]
        );

        let neutral = Laba::new(73.233, 20.105, 67.223, 0.812, Xyza::NEUTRAL).to_rgba().to_rgba8();
        assert_eq!(single("ColorLABa(73.233, 20.105, 67.223, alpha = 0.812)"), neutral);
    }

    #[test]
    fn lab_with_arbitrary_reference_white() {
        let reference = Xyza::new(0.16, 0.13, 0.11, 1.0);
        let lab = Laba::new(47.13, 30.07, 7.56, 0.78, reference).to_rgba().to_rgba8();
        assert_eq!(
            gutter(
                "",
                "ColorLABa(47.13, 30.07, 7.56, 0.78, ColorXYZa(0.16, 0.13, 0.11, alpha = 1.0))"
            ),
            [lab, reference.to_rgba().to_rgba8()]
        );
    }

    #[test]
    fn oklab() {
        let expected = Oklaba::new(0.5, 0.6, -0.4, 0.7).to_rgba().to_rgba8();
        assert_eq!(single("ColorOKLABa(0.5, 0.6, -0.4, 0.7)"), expected);
    }

    #[test]
    fn property_of_a_color() {
        assert_eq!(single("ColorRGBa(0.3, 0.7, 0.1).g"), srgb(0.3, 0.7, 0.1, 1.0));
    }

    #[test]
    fn parameters_are_not_constants() {
        let source = format!(
            "{}val x = 0.5\n\nfun draw(x: Double) {{\n    val c = ColorRGBa(x, 0.2, 0.3)\n}}\n\n\
             val f = {{ x: Double -> ColorRGBa(x, 0.2, 0.3) }}\n\nval d = ColorRGBa(x, 0.2, 0.3)\n",
            IMPORTS
        );
        assert_eq!(gutter_with(&ColorProvider::default(), &source), [srgb(0.5, 0.2, 0.3, 1.0)]);
    }

    #[test]
    fn shadowed_shorthand() {
        let prelude = "fun rgb(r: Double, g: Double, b: Double) = r + g + b";
        assert!(gutter(prelude, "rgb(0.1, 0.2, 0.3)").is_empty());
    }

    #[test]
    fn disabled_packages() {
        let provider = ColorProvider::new(ProviderConfig::default().with_packages([COLOR]));
        let source = template("", "val a = ColorRGBa.HOT_PINK\n    val b = ColorRGBa.RED");
        assert_eq!(gutter_with(&provider, &source), [[255, 0, 0, 255]]);
        assert_eq!(provider.preset_color("HOT_PINK"), None);
    }

    #[test]
    fn color_at_offsets() {
        let source = template("", "ColorRGBa.fromHex(\"#ff0000\")");
        let file = SourceFile::parse(source.as_str()).unwrap();
        let provider = ColorProvider::default();

        let from_hex = source.find("fromHex").unwrap();
        assert_eq!(provider.color_at(&file, from_hex).map(|c| c.to_rgba8()), Some([255, 0, 0, 255]));
        // The receiver is not where the gutter anchors a qualified call.
        let receiver = source.find("ColorRGBa.fromHex").unwrap();
        assert_eq!(provider.color_at(&file, receiver), None);
        assert_eq!(provider.color_at(&file, 0), None);
    }

    #[test]
    fn presets_and_declarations() {
        let provider = ColorProvider::default();
        assert_eq!(provider.preset_color("HOT_PINK").map(|c| c.to_rgba8()), Some([255, 105, 180, 255]));
        assert_eq!(provider.preset_color("RED").map(|c| c.to_rgba8()), Some([255, 0, 0, 255]));
        assert_eq!(provider.preset_color("SO2_D65").map(|c| c.to_rgba8()[3]), Some(255));
        assert_eq!(provider.preset_color("NOPE"), None);

        let file = SourceFile::parse(template(
            "val accent = rgb(0.2, 0.4, 0.6)\nval plain = 0.5",
            "",
        ))
        .unwrap();
        assert_eq!(
            provider.declaration_color(&file, "accent").map(|c| c.to_rgba8()),
            Some(srgb(0.2, 0.4, 0.6, 1.0))
        );
        assert_eq!(provider.declaration_color(&file, "plain"), None);
        assert_eq!(provider.declaration_color(&file, "missing"), None);
    }

    #[test]
    fn named_constants_become_hex_calls() {
        let provider = ColorProvider::default();
        let mut document = TextDocument::new(template("", "val c = ColorRGBa.RED"));
        let original = document.text().to_string();
        let anchor = original.find("ColorRGBa.RED").unwrap();

        let magenta = Rgba::from_rgba8([255, 0, 255, 255]);
        assert!(provider.apply_color(&mut document, anchor, &magenta));
        assert!(document.text().contains("val c = ColorRGBa.fromHex(\"#ff00ff\")\n"));

        // The same anchor now resolves to the call, and only its arguments
        // change.
        let green = Rgba::from_rgba8([0, 255, 0, 0x80]);
        assert!(provider.apply_color(&mut document, anchor, &green));
        assert!(document.text().contains("val c = ColorRGBa.fromHex(\"#00ff0080\")\n"));

        assert_eq!(document.undo_depth(), 1);
        assert!(document.undo());
        assert_eq!(document.text(), original);
    }

    #[test]
    fn calls_keep_their_model() {
        let provider = ColorProvider::default();
        let mut document = TextDocument::new(template("", "val c = ColorHSVa(300.0, 0.35, 0.9, 0.4)"));
        let anchor = document.text().find("ColorHSVa").unwrap();

        let magenta = Rgba::new(1.0, 0.0, 1.0, 0.4, Linearity::Srgb);
        assert!(provider.apply_color(&mut document, anchor, &magenta));
        assert!(document.text().contains("ColorHSVa(300.0, 1.0, 1.0, 0.4)"));

        document.finish_command();
        let file = SourceFile::parse(document.text()).unwrap();
        assert_eq!(provider.color_at(&file, anchor).map(|c| c.to_rgba8()), Some([255, 0, 255, 102]));
    }

    /// A call of the model of `descriptor` with arbitrary arguments.
    fn call_of(descriptor: &ColorModelDescriptor) -> String {
        match descriptor.shape {
            Shape::Hex => "ColorRGBa.fromHex(\"#808080\")".to_string(),
            _ if descriptor
                .flags
                .contains(DescriptorFlags::REFERENCE_WHITE_POINT) =>
            {
                format!("{}(50.0, 0.2, 0.1, ref = ColorXYZa.SO10_D50)", descriptor.name)
            }
            _ => format!("{}(0.5, 0.25, 0.125)", descriptor.name),
        }
    }

    #[test]
    fn written_colors_read_back_in_every_model() {
        let provider = ColorProvider::default();
        let picks = [
            [0, 0, 0, 255],
            [255, 255, 255, 255],
            [128, 128, 128, 255],
            [255, 0, 0, 255],
            [0, 255, 0, 255],
            [0, 0, 255, 255],
            [51, 102, 153, 0],
        ];

        for descriptor in DESCRIPTORS {
            let expression = format!("val c = {}", call_of(descriptor));
            let mut document = TextDocument::new(template("", &expression));
            let anchor = document.text().find(&expression).unwrap()
                + expression.find(descriptor.name).unwrap();

            for pick in picks {
                let color = Rgba::from_rgba8(pick);
                assert!(
                    provider.apply_color(&mut document, anchor, &color),
                    "{} {:?}",
                    descriptor.name,
                    pick
                );
                document.finish_command();

                let file = SourceFile::parse(document.text()).unwrap();
                let read = provider.color_at(&file, anchor).map(|c| c.to_rgba8());
                let Some(read) = read else {
                    panic!("{} lost its color:\n{}", descriptor.name, document.text());
                };
                let off = read.iter().zip(pick).any(|(a, b)| a.abs_diff(b) > 1);
                assert!(
                    !off,
                    "{} wrote {:?} as {:?}:\n{}",
                    descriptor.name,
                    pick,
                    read,
                    document.text()
                );
            }
        }
    }

    #[test]
    fn edits_that_cannot_be_made() {
        let provider = ColorProvider::default();
        let white = Rgba::new(1.0, 1.0, 1.0, 1.0, Linearity::Srgb);

        for expression in [
            "val c = ColorXYZa.SO10_D50",
            "val c = ColorLABa(50.0, 0.0, 0.0, ref = someWhite)",
            "val c = listOf(0.5)",
        ] {
            let mut document = TextDocument::new(template("", expression));
            let anchor = document.text().find("= ").unwrap() + 2;
            assert!(!provider.apply_color(&mut document, anchor, &white), "{}", expression);
            assert_eq!(document.undo_depth(), 0);
        }
    }
}

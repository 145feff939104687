//! The syntactic test that picks out identifier tokens that may start a color
//! expression. It looks at a few parents and siblings only, so it can run for
//! every token a host asks about.

use tree_sitter::Node;
use tracing::{event, Level};

use crate::resolve::Resolver;

/// The form of expression a candidate token heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SiteShape {
    /// `Callee(...)` or `Receiver.callee(...)`.
    Call,
    /// `Receiver.NAME`.
    Property,
}

/// A token that passed the syntactic test.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'t> {
    /// The matched identifier token.
    pub leaf: Node<'t>,
    /// The call or navigation expression the token heads.
    pub site: Node<'t>,
    /// The form of `site`.
    pub shape: SiteShape,
    /// The identifier that name resolution starts from: the callee, or the
    /// receiver of a navigation.
    pub head: Node<'t>,
}

/// The navigation suffix selector of `navigation`, if it is `.identifier`.
pub fn selector(navigation: Node<'_>) -> Option<Node<'_>> {
    let suffix = navigation.child(1)?;
    if suffix.kind() != "navigation_suffix" || suffix.child(0)?.kind() != "." {
        return None;
    }
    suffix
        .named_child(0)
        .filter(|n| n.kind() == "simple_identifier")
}

/// True if `node` is the callee of the call expression `parent`.
pub fn is_callee(node: Node<'_>, parent: Node<'_>) -> bool {
    parent.kind() == "call_expression"
        && parent.child(0).map(|c| c.id()) == Some(node.id())
        && parent
            .child(1)
            .map(|s| s.kind() == "call_suffix")
            .unwrap_or(false)
}

/// Apply the syntactic test to a token.
pub fn candidate(leaf: Node<'_>) -> Option<Candidate<'_>> {
    if leaf.kind() != "simple_identifier" {
        return None;
    }
    let parent = leaf.parent()?;

    // `Callee(...)`
    if is_callee(leaf, parent) {
        return Some(Candidate {
            leaf,
            site: parent,
            shape: SiteShape::Call,
            head: leaf,
        });
    }

    // The selector of `Receiver.callee(...)`.
    if parent.kind() == "navigation_suffix" {
        let navigation = parent.parent()?;
        let call = navigation.parent()?;
        let receiver = navigation.child(0)?;
        if receiver.kind() == "simple_identifier"
            && selector(navigation).map(|s| s.id()) == Some(leaf.id())
            && is_callee(navigation, call)
        {
            return Some(Candidate {
                leaf,
                site: call,
                shape: SiteShape::Call,
                head: receiver,
            });
        }
        return None;
    }

    // `Receiver.NAME`, not followed by a call suffix.
    if parent.kind() == "navigation_expression" && parent.child(0)?.id() == leaf.id() {
        selector(parent)?;
        if let Some(grandparent) = parent.parent() {
            if is_callee(parent, grandparent) {
                return None;
            }
        }
        return Some(Candidate {
            leaf,
            site: parent,
            shape: SiteShape::Property,
            head: leaf,
        });
    }

    None
}

/// Decide if `leaf` heads a color expression: the syntactic test followed by
/// a check that the head name belongs to the color library.
pub fn matches(resolver: &Resolver<'_>, leaf: Node<'_>) -> bool {
    let Some(candidate) = candidate(leaf) else {
        return false;
    };

    let name = resolver.file().node_text(candidate.head);
    let known = resolver.resolve_name(name).is_some();
    if !known {
        event!(Level::TRACE, name, "name does not resolve into the color library");
    }
    known
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::SourceFile;

    fn candidate_at<'t>(file: &'t SourceFile, needle: &str) -> Option<Candidate<'t>> {
        let offset = file.text().find(needle).unwrap();
        candidate(file.leaf_at(offset).unwrap())
    }

    #[test]
    fn calls() {
        let file = SourceFile::parse("val c = ColorRGBa(0.1, 0.2, 0.3)").unwrap();
        let c = candidate_at(&file, "ColorRGBa").unwrap();
        assert_eq!(c.shape, SiteShape::Call);
        assert_eq!(file.node_text(c.site), "ColorRGBa(0.1, 0.2, 0.3)");
        assert!(candidate_at(&file, "0.1").is_none());
    }

    #[test]
    fn qualified_calls_match_on_the_selector() {
        let file = SourceFile::parse("val c = ColorRGBa.fromHex(\"#ff0000\")").unwrap();
        assert!(candidate_at(&file, "ColorRGBa").is_none());
        let c = candidate_at(&file, "fromHex").unwrap();
        assert_eq!(c.shape, SiteShape::Call);
        assert_eq!(file.node_text(c.head), "ColorRGBa");
        assert_eq!(file.node_text(c.site), "ColorRGBa.fromHex(\"#ff0000\")");
    }

    #[test]
    fn properties() {
        let file = SourceFile::parse("val c = ColorRGBa.RED").unwrap();
        let c = candidate_at(&file, "ColorRGBa").unwrap();
        assert_eq!(c.shape, SiteShape::Property);
        assert_eq!(file.node_text(c.site), "ColorRGBa.RED");
        assert!(candidate_at(&file, "RED").is_none());
    }

    #[test]
    fn member_of_a_call() {
        let file = SourceFile::parse("val g = ColorRGBa(0.3, 0.7, 0.1).g").unwrap();
        let member = file.leaf_at(file.text().find(").g").unwrap() + 2).unwrap();
        assert_eq!(file.node_text(member), "g");
        assert!(candidate(member).is_none());
        let c = candidate_at(&file, "ColorRGBa").unwrap();
        assert_eq!(file.node_text(c.site), "ColorRGBa(0.3, 0.7, 0.1)");
    }

    #[test]
    fn library_check() {
        let file = SourceFile::parse(
            "import org.openrndr.color.ColorRGBa\n\nval a = ColorRGBa.RED\nval b = Other.RED\n",
        )
        .unwrap();
        let library = crate::library::Library::default();
        let resolver = Resolver::new(&file, &library);
        let at = |needle: &str| file.leaf_at(file.text().find(needle).unwrap()).unwrap();
        assert!(matches(&resolver, at("ColorRGBa.RED")));
        assert!(!matches(&resolver, at("Other")));
    }
}

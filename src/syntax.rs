//! A parsed Kotlin source file and the handful of structural queries the
//! resolver needs: imports, local declarations and local constants.

use std::collections::HashSet;

use tree_sitter::{Node, Parser, Tree};

use crate::error::ParseError;

/// One import header of a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    /// The dotted path, without the trailing `.*` of a wildcard.
    pub path: String,
    /// The name given with `as`, if any.
    pub alias: Option<String>,
    /// True for `import package.*`.
    pub wildcard: bool,
}

impl Import {
    /// Parse the text of an import header.
    pub fn parse(header: &str) -> Option<Self> {
        let body = header.trim().strip_prefix("import")?.trim().trim_end_matches(';');

        let (path, alias) = match body.split_once(" as ") {
            Some((path, alias)) => (path, Some(alias.trim().to_string())),
            None => (body, None),
        };
        let path: String = path.chars().filter(|c| !c.is_whitespace()).collect();

        match path.strip_suffix(".*") {
            Some(package) => Some(Self {
                path: package.to_string(),
                alias: None,
                wildcard: true,
            }),
            None if !path.is_empty() => Some(Self {
                path,
                alias,
                wildcard: false,
            }),
            None => None,
        }
    }

    /// The simple name the import binds, or `None` for wildcards.
    pub fn bound_name(&self) -> Option<&str> {
        if self.wildcard {
            return None;
        }
        self.alias
            .as_deref()
            .or_else(|| self.path.rsplit('.').next())
    }
}

/// A Kotlin source file with its syntax tree.
pub struct SourceFile {
    text: String,
    tree: Tree,
    imports: Vec<Import>,
    declarations: HashSet<String>,
}

impl std::fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceFile")
            .field("length", &self.text.len())
            .field("imports", &self.imports)
            .finish()
    }
}

impl SourceFile {
    /// Parse Kotlin source text.
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();

        let mut parser = Parser::new();
        parser.set_language(tree_sitter_kotlin::language())?;
        let tree = parser.parse(&text, None).ok_or(ParseError::Cancelled)?;

        let mut file = Self {
            text,
            tree,
            imports: Vec::new(),
            declarations: HashSet::new(),
        };
        file.index();
        Ok(file)
    }

    fn index(&mut self) {
        let mut imports = Vec::new();
        let mut declarations = HashSet::new();

        for node in descendants(self.tree.root_node()) {
            match node.kind() {
                "import_header" => imports.extend(Import::parse(&self.text[node.byte_range()])),
                "function_declaration" | "class_declaration" | "object_declaration" => {
                    let name = (0..node.named_child_count())
                        .filter_map(|i| node.named_child(i))
                        .find(|n| matches!(n.kind(), "simple_identifier" | "type_identifier"));
                    if let Some(name) = name {
                        declarations.insert(self.text[name.byte_range()].to_string());
                    }
                }
                _ => {}
            }
        }

        self.imports = imports;
        self.declarations = declarations;
    }

    /// The source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The root node of the syntax tree.
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The source text a node spans.
    pub fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    /// The import headers, in source order.
    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// True if the file declares a function, class or object named `name`.
    pub fn declares(&self, name: &str) -> bool {
        self.declarations.contains(name)
    }

    /// The smallest node covering the byte at `offset`.
    pub fn leaf_at(&self, offset: usize) -> Option<Node<'_>> {
        if offset >= self.text.len() {
            return None;
        }
        self.root().descendant_for_byte_range(offset, offset + 1)
    }

    /// Every identifier token, in source order.
    pub fn identifiers(&self) -> impl Iterator<Item = Node<'_>> {
        descendants(self.root()).filter(|n| n.kind() == "simple_identifier")
    }

    /// Find the initializer of a `val` named `name` visible from `usage`.
    /// Parameters of enclosing functions and lambdas shadow outer
    /// declarations.
    pub fn property_initializer<'t>(&'t self, usage: Node<'t>, name: &str) -> Option<Node<'t>> {
        let mut scope = usage.parent();

        while let Some(node) = scope {
            if self.binds_parameter(node, name) {
                return None;
            }

            let ordered = node.kind() == "statements";
            for i in 0..node.named_child_count() {
                let Some(child) = node.named_child(i) else {
                    continue;
                };
                if child.kind() != "property_declaration" {
                    continue;
                }
                if ordered && child.start_byte() >= usage.start_byte() {
                    break;
                }
                if self.declared_name(child) == Some(name) {
                    return self.initializer(child);
                }
            }

            scope = node.parent();
        }

        None
    }

    /// The initializer of the first `val` named `name` anywhere in the file.
    pub fn find_property(&self, name: &str) -> Option<Node<'_>> {
        descendants(self.root())
            .filter(|n| n.kind() == "property_declaration")
            .find(|n| self.declared_name(*n) == Some(name))
            .and_then(|n| self.initializer(n))
    }

    fn declared_name(&self, declaration: Node<'_>) -> Option<&str> {
        let variable = child_of_kind(declaration, "variable_declaration")?;
        let name = child_of_kind(variable, "simple_identifier")?;
        Some(self.node_text(name))
    }

    /// Only `val` declarations with an `=` initializer are constant.
    fn initializer<'t>(&self, declaration: Node<'t>) -> Option<Node<'t>> {
        let mut is_val = false;
        let mut after_equals = false;

        for i in 0..declaration.child_count() {
            let child = declaration.child(i)?;
            match child.kind() {
                "val" => is_val = true,
                "var" => return None,
                "binding_pattern_kind" => is_val = self.node_text(child) == "val",
                "=" => after_equals = true,
                _ if after_equals && child.is_named() => {
                    return is_val.then_some(child);
                }
                _ => {}
            }
        }

        None
    }

    /// Parameters sit directly under their declaration, except for lambdas
    /// and primary constructors which wrap them in one more node.
    fn binds_parameter(&self, node: Node<'_>, name: &str) -> bool {
        let (list, kind) = match node.kind() {
            "function_declaration" | "secondary_constructor" => (Some(node), "parameter"),
            "class_declaration" => (
                child_of_kind(node, "primary_constructor"),
                "class_parameter",
            ),
            "lambda_literal" => (
                child_of_kind(node, "lambda_parameters"),
                "variable_declaration",
            ),
            "for_statement" => (Some(node), "variable_declaration"),
            "setter" => (Some(node), "parameter_with_optional_type"),
            "catch_block" => {
                return child_of_kind(node, "simple_identifier")
                    .is_some_and(|id| self.node_text(id) == name)
            }
            _ => return false,
        };

        let Some(list) = list else {
            return false;
        };

        (0..list.named_child_count())
            .filter_map(|i| list.named_child(i))
            .filter(|p| p.kind() == kind)
            .filter_map(|p| child_of_kind(p, "simple_identifier"))
            .any(|id| self.node_text(id) == name)
    }
}

/// The first named child of `node` with the given kind.
pub fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    (0..node.named_child_count())
        .filter_map(|i| node.named_child(i))
        .find(|c| c.kind() == kind)
}

/// All nodes below and including `root`, in pre-order.
pub fn descendants(root: Node<'_>) -> impl Iterator<Item = Node<'_>> {
    let mut stack = vec![root];
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
        Some(node)
    })
}

/// The first leaf of `node`.
pub fn first_leaf(node: Node<'_>) -> Node<'_> {
    let mut leaf = node;
    while let Some(child) = leaf.child(0) {
        leaf = child;
    }
    leaf
}

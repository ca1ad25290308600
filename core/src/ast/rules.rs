//! file: core/src/ast/rules.rs
//! description: reader for textual tree dumps.
//!
//! Turns the `Kind(name) { ... }` dump format into `AstNode` trees. The
//! reader does not know anything about the source language: it only checks
//! that the dump is well formed and that every kind is one of
//! `AstNodeKind`. Shape checks (child counts and kinds) belong to lowering.

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use super::err::TreeSyntaxError;
use super::kind::AstNodeKind;
use super::node::AstNode;
use crate::location::Location;

#[derive(Parser)]
#[grammar = "ast/tree.pest"]
pub struct TreeParser;

/// Parse a whole dump. `file` is only used to label locations.
pub fn parse_tree(text: &str, file: &str) -> Result<AstNode, TreeSyntaxError> {
    let mut pairs = TreeParser::parse(Rule::tree, text).map_err(|e| TreeSyntaxError::from_pest(e, file))?;
    let tree = pairs.next().ok_or_else(|| {
        TreeSyntaxError::new("Empty tree dump.", "fuc.ast.rules.parse_tree", None)
    })?;
    let location = get_location_from_pair(&tree, file);
    let root = tree
        .into_inner()
        .find(|p| p.as_rule() == Rule::node)
        .ok_or_else(|| {
            TreeSyntaxError::new("Tree dump has no root node.", "fuc.ast.rules.parse_tree", Some(location))
        })?;
    build_node(root, file)
}

fn build_node(pair: Pair<Rule>, file: &str) -> Result<AstNode, TreeSyntaxError> {
    let location = get_location_from_pair(&pair, file);
    let mut inner = pair.into_inner();

    let kind_pair = fetch_next_pair(&mut inner, &location)?;
    let kind = kind_pair.as_str().parse::<AstNodeKind>().map_err(|msg| {
        TreeSyntaxError::new(
            msg,
            "fuc.ast.rules.build_node",
            Some(get_location_from_pair(&kind_pair, file)),
        )
    })?;

    let name_pair = fetch_next_pair(&mut inner, &location)?;
    let mut node = AstNode::new(kind, name_pair.as_str().trim()).with_location(location);

    if let Some(children) = inner.next() {
        for child in children.into_inner() {
            node.children.push(build_node(child, file)?);
        }
    }

    Ok(node)
}

fn fetch_next_pair<'a>(
    pairs: &mut Pairs<'a, Rule>,
    location: &Location,
) -> Result<Pair<'a, Rule>, TreeSyntaxError> {
    pairs.next().ok_or_else(|| {
        TreeSyntaxError::new(
            "Expected more inner pairs but found none.",
            "fuc.ast.rules.fetch_next_pair",
            Some(location.clone()),
        )
    })
}

fn get_location_from_pair(pair: &Pair<Rule>, file: &str) -> Location {
    let (line, column) = pair.as_span().start_pos().line_col();
    Location::new(file, line, column)
}

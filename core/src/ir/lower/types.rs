use crate::ast::{AstNode, AstNodeKind};
use crate::ir::value::Type;

use super::err::{LoweringError, LoweringErrorKind};

/// Map a source type name to its IR type. Only `int` and `void` exist.
pub fn resolve(name: &str) -> Option<Type> {
    match name {
        "int" => Some(Type::I32),
        "void" => Some(Type::Void),
        _ => None,
    }
}

/// Resolve the type named by an `Identifier` node.
pub fn resolve_node(node: &AstNode) -> Result<Type, LoweringError> {
    if !node.is(AstNodeKind::Identifier) {
        return Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            format!("expected a type name, found {}", node.kind),
        ));
    }
    resolve(&node.name).ok_or_else(|| {
        LoweringError::at(
            LoweringErrorKind::UnsupportedType,
            node,
            format!("unsupported type '{}'", node.name),
        )
    })
}

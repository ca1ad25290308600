use std::fmt;

use crate::ast::{AstNode, AstNodeKind};
use crate::error::{FucErrorExt, Level};
use crate::ir::err::IrError;
use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringErrorKind {
    UndefinedSymbol,
    UndefinedFunction,
    UnsupportedType,
    UnsupportedExpression,
    UnsupportedStatement,
    UnsupportedOperator,
    UnsupportedAssignmentOperator,
    UnsupportedTopLevelConstruct,
    UnsupportedDefineValue,
    InvalidLiteral,
    /// Wrong child count or child kind for a node.
    MalformedNode,
    BreakOutsideLoop,
    ContinueOutsideLoop,
    ArgumentCountMismatch,
    DuplicateFunction,
    AssignmentToConstant,
    /// The IR builder rejected an operation. Always an engine bug.
    InvalidIr,
}

impl fmt::Display for LoweringErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// The single terminal error of a failed lowering run.
#[derive(Debug, Clone)]
pub struct LoweringError {
    kind: LoweringErrorKind,
    message: String,
    node_kind: Option<AstNodeKind>,
    node_name: Option<String>,
    location: Option<Location>,
    issuer: String,
}

impl LoweringError {
    /// Error raised while lowering `node`.
    pub fn at(kind: LoweringErrorKind, node: &AstNode, message: impl Into<String>) -> Self {
        LoweringError {
            kind,
            message: message.into(),
            node_kind: Some(node.kind),
            node_name: Some(node.name.clone()),
            location: node.location.clone(),
            issuer: issuer_for(kind).to_string(),
        }
    }

    pub fn kind(&self) -> LoweringErrorKind {
        self.kind
    }

    pub fn node_kind(&self) -> Option<AstNodeKind> {
        self.node_kind
    }

    pub fn node_name(&self) -> Option<&str> {
        self.node_name.as_deref()
    }
}

fn issuer_for(kind: LoweringErrorKind) -> &'static str {
    use LoweringErrorKind::*;
    match kind {
        UndefinedSymbol | AssignmentToConstant => "fuc.lower.symbols",
        UnsupportedType => "fuc.lower.types",
        UnsupportedExpression | UnsupportedOperator | InvalidLiteral => "fuc.lower.expr",
        UndefinedFunction | ArgumentCountMismatch => "fuc.lower.call",
        UnsupportedStatement | UnsupportedAssignmentOperator | BreakOutsideLoop | ContinueOutsideLoop => {
            "fuc.lower.stmt"
        }
        UnsupportedTopLevelConstruct | UnsupportedDefineValue | DuplicateFunction => "fuc.lower.program",
        MalformedNode => "fuc.lower.shape",
        InvalidIr => "fuc.ir.builder",
    }
}

impl From<IrError> for LoweringError {
    fn from(err: IrError) -> Self {
        LoweringError {
            kind: LoweringErrorKind::InvalidIr,
            message: err.to_string(),
            node_kind: None,
            node_name: None,
            location: None,
            issuer: issuer_for(LoweringErrorKind::InvalidIr).to_string(),
        }
    }
}

impl fmt::Display for LoweringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;
        if let (Some(kind), Some(name)) = (&self.node_kind, &self.node_name) {
            write!(f, " [{}({})]", kind, name)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

impl std::error::Error for LoweringError {}

impl FucErrorExt for LoweringError {
    fn level(&self) -> Level {
        match self.kind {
            LoweringErrorKind::InvalidIr => Level::Critical,
            _ => Level::Error,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

/// Fail with `MalformedNode` unless `node` has between `min` and `max`
/// children.
pub fn expect_arity(node: &AstNode, min: usize, max: usize) -> Result<(), LoweringError> {
    let n = node.arity();
    if n < min || n > max {
        let expected = if min == max { min.to_string() } else { format!("{}..={}", min, max) };
        return Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            format!("{} expects {} children, found {}", node.kind, expected, n),
        ));
    }
    Ok(())
}

/// Child `index` of `node`, which must be of `kind`.
pub fn expect_child(node: &AstNode, index: usize, kind: AstNodeKind) -> Result<&AstNode, LoweringError> {
    match node.child(index) {
        Some(c) if c.is(kind) => Ok(c),
        Some(c) => Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            format!("child {} of {} must be {}, found {}", index, node.kind, kind, c.kind),
        )),
        None => Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            format!("{} is missing child {}", node.kind, index),
        )),
    }
}

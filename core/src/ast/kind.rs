//! file: core/src/ast/kind.rs
//! description: source node kinds.
//!
//! The set of kinds is closed. Every lowering routine matches on
//! `AstNodeKind` exhaustively, so adding a kind here forces each of them to
//! decide how to treat it.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AstNodeKind {
    Program,
    FunctionDeclaration,
    Parameters,
    VariableDeclaration,
    Block,
    Statement,
    Assignment,
    BinaryExpression,
    Identifier,
    Literal,
    FunctionCall,
    ReturnStatement,
    WhileStatement,
    PreprocessorDirective,
}

impl AstNodeKind {
    pub const ALL: [AstNodeKind; 14] = [
        AstNodeKind::Program,
        AstNodeKind::FunctionDeclaration,
        AstNodeKind::Parameters,
        AstNodeKind::VariableDeclaration,
        AstNodeKind::Block,
        AstNodeKind::Statement,
        AstNodeKind::Assignment,
        AstNodeKind::BinaryExpression,
        AstNodeKind::Identifier,
        AstNodeKind::Literal,
        AstNodeKind::FunctionCall,
        AstNodeKind::ReturnStatement,
        AstNodeKind::WhileStatement,
        AstNodeKind::PreprocessorDirective,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AstNodeKind::Program => "Program",
            AstNodeKind::FunctionDeclaration => "FunctionDeclaration",
            AstNodeKind::Parameters => "Parameters",
            AstNodeKind::VariableDeclaration => "VariableDeclaration",
            AstNodeKind::Block => "Block",
            AstNodeKind::Statement => "Statement",
            AstNodeKind::Assignment => "Assignment",
            AstNodeKind::BinaryExpression => "BinaryExpression",
            AstNodeKind::Identifier => "Identifier",
            AstNodeKind::Literal => "Literal",
            AstNodeKind::FunctionCall => "FunctionCall",
            AstNodeKind::ReturnStatement => "ReturnStatement",
            AstNodeKind::WhileStatement => "WhileStatement",
            AstNodeKind::PreprocessorDirective => "PreprocessorDirective",
        }
    }

    /// Kinds that can appear in expression position.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            AstNodeKind::BinaryExpression
                | AstNodeKind::Identifier
                | AstNodeKind::Literal
                | AstNodeKind::FunctionCall
        )
    }
}

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AstNodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AstNodeKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown node kind '{}'", s))
    }
}

//! Source tree model consumed by the lowering engine, plus a reader for
//! the textual dump format produced by the front end.

pub mod err;
pub mod kind;
pub mod node;
pub mod rules;

pub use err::TreeSyntaxError;
pub use kind::AstNodeKind;
pub use node::AstNode;
pub use rules::parse_tree;

use std::fmt;

use crate::location::Location;

use super::kind::AstNodeKind;

/// One node of an already-parsed source tree.
///
/// `name` holds whatever text the kind carries: an identifier, an operator
/// symbol, literal text, or a fixed tag such as `if` or `#define`.
#[derive(Clone)]
pub struct AstNode {
    id: usize,
    pub kind: AstNodeKind,
    pub name: String,
    pub children: Vec<AstNode>,
    pub location: Option<Location>,
}

impl AstNode {
    fn create_id() -> usize {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNTER: AtomicUsize = AtomicUsize::new(1);
        COUNTER.fetch_add(1, Ordering::Relaxed)
    }

    pub fn new(kind: AstNodeKind, name: impl Into<String>) -> Self {
        AstNode {
            id: Self::create_id(),
            kind,
            name: name.into(),
            children: Vec::new(),
            location: None,
        }
    }

    pub fn with_children(mut self, children: Vec<AstNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: AstNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn get_id(&self) -> usize {
        self.id
    }

    pub fn get_kind(&self) -> AstNodeKind {
        self.kind
    }

    pub fn get_location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.children.get(index)
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn is(&self, kind: AstNodeKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for AstNode {
    /// Renders the node in the same dump format the tree reader accepts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: &AstNode, indent: usize) -> fmt::Result {
            for _ in 0..indent {
                write!(f, "    ")?;
            }
            write!(f, "{}({})", node.kind, node.name)?;
            if node.children.is_empty() {
                return writeln!(f);
            }
            writeln!(f, " {{")?;
            for child in &node.children {
                write_node(f, child, indent + 1)?;
            }
            for _ in 0..indent {
                write!(f, "    ")?;
            }
            writeln!(f, "}}")
        }

        write_node(f, self, 0)
    }
}

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

use crate::error::{FucErrorExt, Level};
use crate::location::Location;

/// Raised by the tree reader when a dump does not follow the
/// `Kind(name) { ... }` format or names an unknown kind.
#[derive(Debug, Clone)]
pub struct TreeSyntaxError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl TreeSyntaxError {
    pub fn new(message: impl Into<String>, issuer: impl Into<String>, location: Option<Location>) -> Self {
        TreeSyntaxError {
            level: Level::Error,
            message: message.into(),
            issuer: issuer.into(),
            location,
        }
    }

    pub(crate) fn from_pest(err: pest::error::Error<super::rules::Rule>, file: &str) -> Self {
        let (line, column) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        TreeSyntaxError::new(
            err.variant.message().to_string(),
            "fuc.ast.rules.parse_tree",
            Some(Location::new(file, line, column)),
        )
    }
}

impl std::fmt::Display for TreeSyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} (at {})", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for TreeSyntaxError {}

impl FucErrorExt for TreeSyntaxError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

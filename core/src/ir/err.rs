use std::fmt;

use super::value::{BlockId, FuncId};

/// Misuse of the IR builder. Lowering treats any of these as an internal
/// error: a correct traversal never triggers them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    UnknownBlock(BlockId),
    UnknownFunction(FuncId),
    /// Emitting into, or terminating, a block that already has a terminator.
    BlockTerminated(BlockId),
    /// Stack slots need an entry block to live in.
    NoEntryBlock(String),
    /// An instruction was emitted while no function body was open.
    NoInsertionPoint,
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::UnknownBlock(id) => write!(f, "unknown basic block bb{}", id),
            IrError::UnknownFunction(id) => write!(f, "unknown function #{}", id),
            IrError::BlockTerminated(id) => write!(f, "basic block bb{} is already terminated", id),
            IrError::NoEntryBlock(name) => write!(f, "function '{}' has no entry block", name),
            IrError::NoInsertionPoint => write!(f, "no insertion point: no function body is open"),
        }
    }
}

impl std::error::Error for IrError {}

//! In-memory control-flow-graph IR and the lowering engine that builds it
//! from source trees.

pub mod err;
pub mod function;
pub mod lower;
pub mod module;
pub mod op;
pub mod value;
pub mod verify;

pub use self::err::IrError;
pub use self::function::{BasicBlock, Function, Param};
pub use self::lower::{LoweringError, LoweringErrorKind, lower_program};
pub use self::module::{FunctionSummary, GlobalDef, IrModule, ModuleSummary};
pub use self::op::{BinOp, Instr, IntPredicate, Terminator};
pub use self::value::{BlockId, FuncId, RegId, Type, Value};
pub use self::verify::{VerifyError, VerifyErrorKind, verify_module};

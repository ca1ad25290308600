use super::value::{BlockId, FuncId, RegId, Type, Value};

/// Signed integer arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
    SRem,
}

/// Signed integer comparison predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntPredicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Reserve a stack slot; `dest` holds a pointer to `ty`.
    Alloca { dest: RegId, ty: Type },
    Load { dest: RegId, ty: Type, ptr: Value },
    Store { value: Value, ptr: Value },
    Binary { dest: RegId, op: BinOp, lhs: Value, rhs: Value },
    ICmp { dest: RegId, pred: IntPredicate, lhs: Value, rhs: Value },
    /// `dest` is `None` for calls to functions returning void.
    Call { dest: Option<RegId>, callee: FuncId, args: Vec<Value> },
}

impl Instr {
    pub fn dest(&self) -> Option<RegId> {
        match self {
            Instr::Alloca { dest, .. }
            | Instr::Load { dest, .. }
            | Instr::Binary { dest, .. }
            | Instr::ICmp { dest, .. } => Some(*dest),
            Instr::Call { dest, .. } => *dest,
            Instr::Store { .. } => None,
        }
    }

    pub fn is_alloca(&self) -> bool {
        matches!(self, Instr::Alloca { .. })
    }
}

/// The single control transfer that ends a basic block.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminator {
    Br { target: BlockId },
    CondBr { cond: Value, then_block: BlockId, else_block: BlockId },
    Ret { value: Option<Value> },
}

impl Terminator {
    pub fn successors(&self) -> Vec<BlockId> {
        match self {
            Terminator::Br { target } => vec![*target],
            Terminator::CondBr { then_block, else_block, .. } => vec![*then_block, *else_block],
            Terminator::Ret { .. } => Vec::new(),
        }
    }
}

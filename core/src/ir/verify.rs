//! file: core/src/ir/verify.rs
//! description: structural checks and CFG queries over lowered functions.
//!
//! The verifier checks the invariants the lowering engine promises: every
//! block of a defined function ends in exactly one terminator, branches
//! only target blocks of the same function, calls name functions that exist
//! in the module, and returns agree with the declared return type.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use super::function::Function;
use super::module::IrModule;
use super::op::{Instr, Terminator};
use super::value::BlockId;
use crate::error::{FucErrorExt, Level};
use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyErrorKind {
    MissingTerminator,
    UnknownTarget,
    UnknownCallee,
    ReturnTypeMismatch,
}

#[derive(Debug, Clone)]
pub struct VerifyError {
    kind: VerifyErrorKind,
    function: String,
    block: Option<BlockId>,
    message: String,
}

impl VerifyError {
    fn new(kind: VerifyErrorKind, function: &Function, block: Option<BlockId>, message: String) -> Self {
        VerifyError { kind, function: function.name.clone(), block, message }
    }

    pub fn kind(&self) -> VerifyErrorKind {
        self.kind
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn block(&self) -> Option<BlockId> {
        self.block
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block {
            Some(b) => write!(f, "{} (in '{}', bb{})", self.message, self.function, b),
            None => write!(f, "{} (in '{}')", self.message, self.function),
        }
    }
}

impl std::error::Error for VerifyError {}

impl FucErrorExt for VerifyError {
    fn level(&self) -> Level {
        Level::Critical
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn issuer(&self) -> String {
        "fuc.ir.verify".to_string()
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

pub fn verify_module(module: &IrModule) -> Result<(), VerifyError> {
    for func in module.functions() {
        verify_function(module, func)?;
    }
    Ok(())
}

pub fn verify_function(module: &IrModule, func: &Function) -> Result<(), VerifyError> {
    for bb in func.blocks() {
        let term = bb.term.as_ref().ok_or_else(|| {
            VerifyError::new(
                VerifyErrorKind::MissingTerminator,
                func,
                Some(bb.id),
                format!("block '{}' has no terminator", bb.label),
            )
        })?;

        for target in term.successors() {
            if func.block(target).is_none() {
                return Err(VerifyError::new(
                    VerifyErrorKind::UnknownTarget,
                    func,
                    Some(bb.id),
                    format!("branch to unknown block bb{}", target),
                ));
            }
        }

        if let Terminator::Ret { value } = term {
            let ok = match value {
                None => func.ret.is_void(),
                Some(v) => *v.ty() == func.ret,
            };
            if !ok {
                let got = value.as_ref().map(|v| v.ty().to_string()).unwrap_or_else(|| "void".into());
                return Err(VerifyError::new(
                    VerifyErrorKind::ReturnTypeMismatch,
                    func,
                    Some(bb.id),
                    format!("return of {} from function returning {}", got, func.ret),
                ));
            }
        }

        for instr in &bb.instrs {
            if let Instr::Call { callee, .. } = instr {
                if module.function(*callee).is_none() {
                    return Err(VerifyError::new(
                        VerifyErrorKind::UnknownCallee,
                        func,
                        Some(bb.id),
                        format!("call to unknown function #{}", callee),
                    ));
                }
            }
        }
    }
    Ok(())
}

pub fn successors(func: &Function, block: BlockId) -> Vec<BlockId> {
    func.block(block)
        .and_then(|bb| bb.term.as_ref())
        .map(Terminator::successors)
        .unwrap_or_default()
}

pub fn predecessors(func: &Function, block: BlockId) -> Vec<BlockId> {
    func.blocks()
        .iter()
        .filter(|bb| successors(func, bb.id).contains(&block))
        .map(|bb| bb.id)
        .collect()
}

/// Blocks reachable from the entry, in breadth-first order.
pub fn reachable_blocks(func: &Function) -> Vec<BlockId> {
    let mut order = Vec::new();
    let Some(entry) = func.entry() else {
        return order;
    };
    let mut seen = HashSet::from([entry]);
    let mut queue = VecDeque::from([entry]);
    while let Some(b) = queue.pop_front() {
        order.push(b);
        for s in successors(func, b) {
            if seen.insert(s) {
                queue.push_back(s);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::function::Param;
    use crate::ir::value::{Type, Value};

    #[test]
    fn open_block_is_reported() {
        let mut module = IrModule::new();
        let id = module.new_function("f", Type::Void, vec![], false);
        let f = module.function_mut(id).unwrap();
        let entry = f.new_block("entry");
        let next = f.new_block("next");
        f.build_br(entry, next).unwrap();

        let err = verify_module(&module).unwrap_err();
        assert_eq!(err.kind(), VerifyErrorKind::MissingTerminator);
        assert_eq!(err.block(), Some(next));
    }

    #[test]
    fn return_type_must_match() {
        let mut module = IrModule::new();
        let id = module.new_function("g", Type::I32, vec![Param::new("a", Type::I32)], false);
        let f = module.function_mut(id).unwrap();
        let entry = f.new_block("entry");
        f.build_ret(entry, None).unwrap();

        let err = verify_module(&module).unwrap_err();
        assert_eq!(err.kind(), VerifyErrorKind::ReturnTypeMismatch);

        let f = module.function_mut(id).unwrap();
        let ok = f.new_block("ok");
        f.build_ret(ok, Some(Value::const_i32(0))).unwrap();
        assert_eq!(reachable_blocks(module.function(id).unwrap()), vec![entry]);
    }

    #[test]
    fn loop_has_back_edge() {
        let mut module = IrModule::new();
        let id = module.new_function("h", Type::Void, vec![], false);
        let f = module.function_mut(id).unwrap();
        let entry = f.new_block("entry");
        let cond = f.new_block("while.cond");
        let body = f.new_block("while.body");
        let end = f.new_block("while.end");
        f.build_br(entry, cond).unwrap();
        let c = f.build_icmp(cond, crate::ir::op::IntPredicate::Ne, Value::const_i32(1), Value::const_i32(0)).unwrap();
        f.build_cond_br(cond, c, body, end).unwrap();
        f.build_br(body, cond).unwrap();
        f.build_ret(end, None).unwrap();

        let f = module.function(id).unwrap();
        verify_function(&module, f).unwrap();
        assert_eq!(predecessors(f, cond), vec![entry, body]);
        assert_eq!(predecessors(f, end), vec![cond]);
        assert_eq!(reachable_blocks(f), vec![entry, cond, body, end]);
    }
}

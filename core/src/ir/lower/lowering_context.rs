//! file: core/src/ir/lower/lowering_context.rs
//! description: shared state threaded through AST->IR lowering.
//!
//! `LoweringContext` owns the module being built plus the cursor (current
//! function and current block) that statement and expression lowering
//! advance. All `build_*` helpers emit into the current block.

use std::collections::HashMap;

use crate::ast::AstNode;
use crate::ir::err::IrError;
use crate::ir::function::Function;
use crate::ir::module::IrModule;
use crate::ir::op::{BinOp, IntPredicate};
use crate::ir::value::{BlockId, FuncId, Type, Value};

use super::err::{LoweringError, LoweringErrorKind};
use super::symbol_table::SymbolTable;

/// Deepest statement or expression nesting accepted. Trees nested deeper
/// fail with `MalformedNode` instead of exhausting the thread's stack.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Branch targets of the innermost enclosing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTargets {
    pub continue_block: BlockId,
    pub break_block: BlockId,
}

#[derive(Debug)]
pub struct LoweringContext {
    pub module: IrModule,
    pub symbols: SymbolTable,
    /// Top-level item index of a FunctionDeclaration -> function registered for it.
    pub functions: HashMap<usize, FuncId>,
    current_function: Option<FuncId>,
    current_block: Option<BlockId>,
    loop_stack: Vec<LoopTargets>,
    depth: usize,
}

impl LoweringContext {
    pub fn new() -> Self {
        LoweringContext {
            module: IrModule::new(),
            symbols: SymbolTable::new(),
            functions: HashMap::new(),
            current_function: None,
            current_block: None,
            loop_stack: Vec::new(),
            depth: 0,
        }
    }

    /// Start lowering the body of `func`: locals and loops are reset and the
    /// entry block is created and made current.
    pub fn enter_function(&mut self, func: FuncId) -> Result<BlockId, IrError> {
        self.symbols.clear_locals();
        self.loop_stack.clear();
        self.depth = 0;
        self.current_function = Some(func);
        let entry = self.function_mut()?.new_block("entry");
        self.current_block = Some(entry);
        Ok(entry)
    }

    pub fn leave_function(&mut self) {
        self.current_function = None;
        self.current_block = None;
    }

    pub fn current_function(&self) -> Option<FuncId> {
        self.current_function
    }

    pub fn function(&self) -> Result<&Function, IrError> {
        let id = self.current_function.ok_or(IrError::NoInsertionPoint)?;
        self.module.function(id).ok_or(IrError::UnknownFunction(id))
    }

    pub fn function_mut(&mut self) -> Result<&mut Function, IrError> {
        let id = self.current_function.ok_or(IrError::NoInsertionPoint)?;
        self.module.function_mut(id).ok_or(IrError::UnknownFunction(id))
    }

    pub fn current_block(&self) -> Result<BlockId, IrError> {
        self.current_block.ok_or(IrError::NoInsertionPoint)
    }

    pub fn set_current_block(&mut self, block: BlockId) {
        log::trace!("insertion point -> bb{}", block);
        self.current_block = Some(block);
    }

    pub fn new_block(&mut self, label: &str) -> Result<BlockId, IrError> {
        let id = self.function_mut()?.new_block(label);
        log::trace!("created block {}.{}", label, id);
        Ok(id)
    }

    pub fn is_current_terminated(&self) -> Result<bool, IrError> {
        let block = self.current_block()?;
        self.function()?.is_terminated(block)
    }

    pub fn push_loop(&mut self, continue_block: BlockId, break_block: BlockId) {
        self.loop_stack.push(LoopTargets { continue_block, break_block });
    }

    pub fn pop_loop(&mut self) -> Option<LoopTargets> {
        self.loop_stack.pop()
    }

    pub fn innermost_loop(&self) -> Option<LoopTargets> {
        self.loop_stack.last().copied()
    }

    /// Enter one more level of nesting for `node`. Pair with `ascend`.
    pub fn descend(&mut self, node: &AstNode) -> Result<(), LoweringError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(LoweringError::at(
                LoweringErrorKind::MalformedNode,
                node,
                format!("{} nested deeper than {} levels", node.kind, MAX_NESTING_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn build_alloca(&mut self, ty: Type) -> Result<Value, IrError> {
        self.function_mut()?.build_alloca(ty)
    }

    pub fn build_store_in_entry(&mut self, value: Value, ptr: Value) -> Result<(), IrError> {
        self.function_mut()?.build_store_in_entry(value, ptr)
    }

    pub fn build_load(&mut self, ty: Type, ptr: Value) -> Result<Value, IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_load(block, ty, ptr)
    }

    pub fn build_store(&mut self, value: Value, ptr: Value) -> Result<(), IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_store(block, value, ptr)
    }

    pub fn build_binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> Result<Value, IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_binary(block, op, lhs, rhs)
    }

    pub fn build_icmp(&mut self, pred: IntPredicate, lhs: Value, rhs: Value) -> Result<Value, IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_icmp(block, pred, lhs, rhs)
    }

    pub fn build_call(&mut self, callee: FuncId, args: Vec<Value>) -> Result<Option<Value>, IrError> {
        let ret = self
            .module
            .function(callee)
            .map(|f| f.ret.clone())
            .ok_or(IrError::UnknownFunction(callee))?;
        let block = self.current_block()?;
        self.function_mut()?.build_call(block, callee, &ret, args)
    }

    pub fn build_br(&mut self, target: BlockId) -> Result<(), IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_br(block, target)
    }

    pub fn build_cond_br(&mut self, cond: Value, then_block: BlockId, else_block: BlockId) -> Result<(), IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_cond_br(block, cond, then_block, else_block)
    }

    pub fn build_ret(&mut self, value: Option<Value>) -> Result<(), IrError> {
        let block = self.current_block()?;
        self.function_mut()?.build_ret(block, value)
    }

    pub fn into_module(self) -> IrModule {
        self.module
    }
}

impl Default for LoweringContext {
    fn default() -> Self {
        Self::new()
    }
}

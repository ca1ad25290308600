//! file: core/src/ir/function.rs
//! description: functions, basic blocks and the per-block instruction builder.
//!
//! A `Function` owns its blocks and its register counter. Instructions are
//! appended to an explicit block id rather than to an implicit cursor; the
//! lowering engine keeps track of the current block itself.
//!
//! Stack slots are always placed at the head of the entry block, ahead of
//! any other instruction, so every slot dominates all of its uses no matter
//! where in the body the declaration (or parameter promotion) happened.

use super::err::IrError;
use super::op::{BinOp, Instr, IntPredicate, Terminator};
use super::value::{BlockId, FuncId, RegId, Type, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Param { name: name.into(), ty }
    }
}

#[derive(Debug, Clone)]
pub struct BasicBlock {
    pub id: BlockId,
    pub label: String,
    pub instrs: Vec<Instr>,
    pub term: Option<Terminator>,
}

impl BasicBlock {
    pub fn is_terminated(&self) -> bool {
        self.term.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub id: FuncId,
    pub name: String,
    pub ret: Type,
    pub params: Vec<Param>,
    pub variadic: bool,
    blocks: Vec<BasicBlock>,
    next_reg: RegId,
    /// Number of allocas at the head of the entry block.
    slot_count: usize,
    /// Allocas plus the stores that initialise promoted parameters.
    prologue_len: usize,
}

impl Function {
    pub fn new(id: FuncId, name: impl Into<String>, ret: Type, params: Vec<Param>, variadic: bool) -> Self {
        Function {
            id,
            name: name.into(),
            ret,
            params,
            variadic,
            blocks: Vec::new(),
            next_reg: 0,
            slot_count: 0,
            prologue_len: 0,
        }
    }

    /// A function without blocks is an external declaration (e.g. `printf`).
    pub fn is_declaration(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id)
    }

    /// The first block created for the function.
    pub fn entry(&self) -> Option<BlockId> {
        self.blocks.first().map(|b| b.id)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks
            .iter()
            .map(|b| b.instrs.len() + usize::from(b.term.is_some()))
            .sum()
    }

    /// Number of stack slots allocated in the entry block.
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn param_value(&self, index: usize) -> Option<Value> {
        self.params
            .get(index)
            .map(|p| Value::Param { index, ty: p.ty.clone() })
    }

    pub fn new_block(&mut self, label: &str) -> BlockId {
        let id = self.blocks.len();
        self.blocks.push(BasicBlock {
            id,
            label: format!("{}.{}", label, id),
            instrs: Vec::new(),
            term: None,
        });
        id
    }

    pub fn is_terminated(&self, block: BlockId) -> Result<bool, IrError> {
        self.blocks
            .get(block)
            .map(BasicBlock::is_terminated)
            .ok_or(IrError::UnknownBlock(block))
    }

    fn alloc_reg(&mut self) -> RegId {
        let r = self.next_reg;
        self.next_reg += 1;
        r
    }

    fn open_block(&mut self, block: BlockId) -> Result<&mut BasicBlock, IrError> {
        let bb = self.blocks.get_mut(block).ok_or(IrError::UnknownBlock(block))?;
        if bb.is_terminated() {
            return Err(IrError::BlockTerminated(block));
        }
        Ok(bb)
    }

    fn entry_mut(&mut self) -> Result<&mut BasicBlock, IrError> {
        let name = self.name.clone();
        self.blocks.first_mut().ok_or(IrError::NoEntryBlock(name))
    }

    fn push(&mut self, block: BlockId, instr: Instr) -> Result<(), IrError> {
        self.open_block(block)?.instrs.push(instr);
        Ok(())
    }

    fn set_term(&mut self, block: BlockId, term: Terminator) -> Result<(), IrError> {
        for target in term.successors() {
            if target >= self.blocks.len() {
                return Err(IrError::UnknownBlock(target));
            }
        }
        self.open_block(block)?.term = Some(term);
        Ok(())
    }

    /// Reserve a stack slot for `ty` at the head of the entry block and
    /// return its address.
    pub fn build_alloca(&mut self, ty: Type) -> Result<Value, IrError> {
        let dest = self.alloc_reg();
        let at = self.slot_count;
        self.entry_mut()?.instrs.insert(at, Instr::Alloca { dest, ty: ty.clone() });
        self.slot_count += 1;
        self.prologue_len += 1;
        Ok(Value::Reg { id: dest, ty: ty.ptr_to() })
    }

    /// Store into a slot right after the entry allocas. This runs before any
    /// body code, even when the entry block has already been terminated.
    pub fn build_store_in_entry(&mut self, value: Value, ptr: Value) -> Result<(), IrError> {
        let at = self.prologue_len;
        self.entry_mut()?.instrs.insert(at, Instr::Store { value, ptr });
        self.prologue_len += 1;
        Ok(())
    }

    pub fn build_load(&mut self, block: BlockId, ty: Type, ptr: Value) -> Result<Value, IrError> {
        self.open_block(block)?;
        let dest = self.alloc_reg();
        self.push(block, Instr::Load { dest, ty: ty.clone(), ptr })?;
        Ok(Value::Reg { id: dest, ty })
    }

    pub fn build_store(&mut self, block: BlockId, value: Value, ptr: Value) -> Result<(), IrError> {
        self.push(block, Instr::Store { value, ptr })
    }

    pub fn build_binary(&mut self, block: BlockId, op: BinOp, lhs: Value, rhs: Value) -> Result<Value, IrError> {
        self.open_block(block)?;
        let dest = self.alloc_reg();
        let ty = lhs.ty().clone();
        self.push(block, Instr::Binary { dest, op, lhs, rhs })?;
        Ok(Value::Reg { id: dest, ty })
    }

    pub fn build_icmp(&mut self, block: BlockId, pred: IntPredicate, lhs: Value, rhs: Value) -> Result<Value, IrError> {
        self.open_block(block)?;
        let dest = self.alloc_reg();
        self.push(block, Instr::ICmp { dest, pred, lhs, rhs })?;
        Ok(Value::Reg { id: dest, ty: Type::I1 })
    }

    /// Emit a call. The caller supplies the callee's return type since the
    /// callee lives elsewhere in the module. Void calls produce no value.
    pub fn build_call(
        &mut self,
        block: BlockId,
        callee: FuncId,
        ret: &Type,
        args: Vec<Value>,
    ) -> Result<Option<Value>, IrError> {
        self.open_block(block)?;
        let dest = if ret.is_void() { None } else { Some(self.alloc_reg()) };
        self.push(block, Instr::Call { dest, callee, args })?;
        Ok(dest.map(|id| Value::Reg { id, ty: ret.clone() }))
    }

    pub fn build_br(&mut self, block: BlockId, target: BlockId) -> Result<(), IrError> {
        self.set_term(block, Terminator::Br { target })
    }

    pub fn build_cond_br(
        &mut self,
        block: BlockId,
        cond: Value,
        then_block: BlockId,
        else_block: BlockId,
    ) -> Result<(), IrError> {
        self.set_term(block, Terminator::CondBr { cond, then_block, else_block })
    }

    pub fn build_ret(&mut self, block: BlockId, value: Option<Value>) -> Result<(), IrError> {
        self.set_term(block, Terminator::Ret { value })
    }
}

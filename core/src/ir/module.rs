use serde::Serialize;

use super::function::{Function, Param};
use super::value::{FuncId, GlobalId, Type, Value};
use crate::target::Target;

/// A module-level constant byte array, e.g. a print-format string.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDef {
    pub id: GlobalId,
    pub name: String,
    pub ty: Type,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct IrModule {
    target_triple: Option<String>,
    functions: Vec<Function>,
    globals: Vec<GlobalDef>,
}

impl IrModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_target(&mut self, target: Target) {
        self.target_triple = Some(target.triple().to_string());
    }

    pub fn target_triple(&self) -> Option<&str> {
        self.target_triple.as_deref()
    }

    /// Add a function with the given signature and no body. Names are not
    /// checked for uniqueness here.
    pub fn new_function(&mut self, name: &str, ret: Type, params: Vec<Param>, variadic: bool) -> FuncId {
        let id = self.functions.len();
        self.functions.push(Function::new(id, name, ret, params, variadic));
        id
    }

    pub fn find_function(&self, name: &str) -> Option<FuncId> {
        self.functions.iter().find(|f| f.name == name).map(|f| f.id)
    }

    pub fn function(&self, id: FuncId) -> Option<&Function> {
        self.functions.get(id)
    }

    pub fn function_mut(&mut self, id: FuncId) -> Option<&mut Function> {
        self.functions.get_mut(id)
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn globals(&self) -> &[GlobalDef] {
        &self.globals
    }

    /// Define a private constant byte array and return a pointer to its
    /// first element. `bytes` should already carry its null terminator.
    pub fn new_global_bytes(&mut self, bytes: &[u8]) -> Value {
        let id = self.globals.len();
        self.globals.push(GlobalDef {
            id,
            name: format!(".str.{}", id),
            ty: Type::Array { len: bytes.len(), elem: Box::new(Type::I8) },
            bytes: bytes.to_vec(),
        });
        Value::Global { id, ty: Type::I8.ptr_to() }
    }

    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            target: self.target_triple.clone(),
            functions: self.functions.iter().map(FunctionSummary::from).collect(),
            globals: self.globals.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSummary {
    pub name: String,
    pub params: Vec<String>,
    pub return_type: String,
    pub variadic: bool,
    pub declaration: bool,
    pub blocks: usize,
    pub instructions: usize,
    pub stack_slots: usize,
}

impl From<&Function> for FunctionSummary {
    fn from(f: &Function) -> Self {
        FunctionSummary {
            name: f.name.clone(),
            params: f.params.iter().map(|p| format!("{} {}", p.ty, p.name)).collect(),
            return_type: f.ret.to_string(),
            variadic: f.variadic,
            declaration: f.is_declaration(),
            blocks: f.block_count(),
            instructions: f.instruction_count(),
            stack_slots: f.slot_count(),
        }
    }
}

/// Shape of a lowered module, for reports. Not a serialization of the IR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSummary {
    pub target: Option<String>,
    pub functions: Vec<FunctionSummary>,
    pub globals: usize,
}

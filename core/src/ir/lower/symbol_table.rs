//! file: core/src/ir/lower/symbol_table.rs
//! description: name bindings visible while lowering a function.
//!
//! Two tables: locals of the function being lowered, rebuilt for every
//! function, and `#define` constants that live for the whole unit. Lookups
//! try locals first so a local always shadows a constant of the same name.

use std::collections::HashMap;

use crate::ir::value::{Type, Value};

/// Where a local name lives.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    /// A parameter that has never been assigned; used as-is.
    Register(Value),
    /// A stack slot of type `ty`, accessed with load/store.
    Slot { ptr: Value, ty: Type },
}

/// Result of a full lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Local(Storage),
    Constant(Value),
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    locals: HashMap<String, Storage>,
    globals: HashMap<String, i32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` in the current function. An existing binding is replaced.
    pub fn define_local(&mut self, name: &str, storage: Storage) {
        self.locals.insert(name.to_string(), storage);
    }

    pub fn lookup_local(&self, name: &str) -> Option<&Storage> {
        self.locals.get(name)
    }

    pub fn define_global_constant(&mut self, name: &str, value: i32) {
        if let Some(prev) = self.globals.insert(name.to_string(), value) {
            log::warn!("constant '{}' redefined ({} -> {})", name, prev, value);
        }
    }

    pub fn lookup_global(&self, name: &str) -> Option<Value> {
        self.globals.get(name).map(|v| Value::const_i32(*v))
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        if let Some(storage) = self.lookup_local(name) {
            return Some(Symbol::Local(storage.clone()));
        }
        self.lookup_global(name).map(Symbol::Constant)
    }

    /// Drop every local binding; constants are kept.
    pub fn clear_locals(&mut self) {
        self.locals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_shadows_constant_until_cleared() {
        let mut table = SymbolTable::new();
        table.define_global_constant("N", 8);
        let slot = Storage::Slot { ptr: Value::Reg { id: 0, ty: Type::I32.ptr_to() }, ty: Type::I32 };
        table.define_local("N", slot.clone());

        assert_eq!(table.lookup("N"), Some(Symbol::Local(slot)));
        table.clear_locals();
        assert_eq!(table.lookup("N"), Some(Symbol::Constant(Value::const_i32(8))));
        assert_eq!(table.lookup("M"), None);
    }

    #[test]
    fn last_local_definition_wins() {
        let mut table = SymbolTable::new();
        table.define_local("x", Storage::Register(Value::Param { index: 0, ty: Type::I32 }));
        let slot = Storage::Slot { ptr: Value::Reg { id: 3, ty: Type::I32.ptr_to() }, ty: Type::I32 };
        table.define_local("x", slot.clone());
        assert_eq!(table.lookup_local("x"), Some(&slot));
    }
}

use std::fmt;

pub type RegId = usize;
pub type BlockId = usize;
pub type FuncId = usize;
pub type GlobalId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Void,
    /// Result width of integer comparisons.
    I1,
    I8,
    I32,
    Ptr(Box<Type>),
    /// Only used for the byte arrays backing print-format strings.
    Array { len: usize, elem: Box<Type> },
}

impl Type {
    pub fn ptr_to(self) -> Type {
        Type::Ptr(Box::new(self))
    }

    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Ptr(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::I1 | Type::I8 | Type::I32)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => write!(f, "void"),
            Type::I1 => write!(f, "i1"),
            Type::I8 => write!(f, "i8"),
            Type::I32 => write!(f, "i32"),
            Type::Ptr(inner) => write!(f, "{}*", inner),
            Type::Array { len, elem } => write!(f, "[{} x {}]", len, elem),
        }
    }
}

/// An operand as seen by instructions.
///
/// Parameters are plain register values without an address. Stack slots are
/// `Reg` values of pointer type produced by `Alloca`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    ConstInt { ty: Type, value: i64 },
    Param { index: usize, ty: Type },
    Reg { id: RegId, ty: Type },
    Global { id: GlobalId, ty: Type },
}

impl Value {
    pub fn const_i32(value: i32) -> Value {
        Value::ConstInt { ty: Type::I32, value: value as i64 }
    }

    pub fn ty(&self) -> &Type {
        match self {
            Value::ConstInt { ty, .. }
            | Value::Param { ty, .. }
            | Value::Reg { ty, .. }
            | Value::Global { ty, .. } => ty,
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Value::Param { .. })
    }

    pub fn as_const(&self) -> Option<i64> {
        match self {
            Value::ConstInt { value, .. } => Some(*value),
            _ => None,
        }
    }
}

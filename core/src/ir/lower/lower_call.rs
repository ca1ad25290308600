//! file: core/src/ir/lower/lower_call.rs
//! description: function call lowering and the `printf` intrinsic.

use crate::ast::AstNode;
use crate::ir::err::IrError;
use crate::ir::function::Param;
use crate::ir::value::{FuncId, Type, Value};

use super::err::{LoweringError, LoweringErrorKind};
use super::lower_expr::lower_expression;
use super::lowering_context::LoweringContext;

pub const PRINTF: &str = "printf";
/// Format passed as the first `printf` argument at every call site.
pub const PRINT_FORMAT: &[u8] = b"%d\n\0";

/// Lower a call. Returns `None` when the callee returns void.
pub fn lower_call(ctx: &mut LoweringContext, node: &AstNode) -> Result<Option<Value>, LoweringError> {
    let callee = match ctx.module.find_function(&node.name) {
        Some(id) => id,
        None if node.name == PRINTF => declare_printf(ctx),
        None => {
            return Err(LoweringError::at(
                LoweringErrorKind::UndefinedFunction,
                node,
                format!("function '{}' is not declared", node.name),
            ));
        }
    };

    let (params, variadic) = match ctx.module.function(callee) {
        Some(f) => (f.params.iter().map(|p| p.ty.clone()).collect::<Vec<_>>(), f.variadic),
        None => return Err(IrError::UnknownFunction(callee).into()),
    };
    let intrinsic = variadic && node.name == PRINTF;

    let mut args = Vec::with_capacity(node.arity() + 1);
    if intrinsic {
        args.push(ctx.module.new_global_bytes(PRINT_FORMAT));
    }

    let fixed = params.len().saturating_sub(args.len());
    let given = node.arity();
    if given < fixed || (!variadic && given > fixed) {
        return Err(LoweringError::at(
            LoweringErrorKind::ArgumentCountMismatch,
            node,
            format!("'{}' takes {} argument(s), {} given", node.name, fixed, given),
        ));
    }

    for arg in &node.children {
        let value = lower_expression(ctx, arg)?;
        if let Some(expected) = params.get(args.len()) {
            if value.ty() != expected {
                return Err(LoweringError::at(
                    LoweringErrorKind::UnsupportedExpression,
                    arg,
                    format!("argument {} of '{}' is {}, expected {}", args.len(), node.name, value.ty(), expected),
                ));
            }
        }
        args.push(value);
    }

    Ok(ctx.build_call(callee, args)?)
}

/// `i32 printf(i8* format, ...)`
fn declare_printf(ctx: &mut LoweringContext) -> FuncId {
    log::debug!("declaring intrinsic '{}'", PRINTF);
    ctx.module.new_function(
        PRINTF,
        Type::I32,
        vec![Param::new("format", Type::I8.ptr_to())],
        true,
    )
}

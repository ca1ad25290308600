//! file: core/src/ir/lower/lower_expr.rs
//! description: expression lowering.
//!
//! Expressions lower to a single `Value`: a constant, an untouched
//! parameter, or the register produced by the last emitted instruction.
//! Operands are always lowered left before right.

use crate::ast::{AstNode, AstNodeKind};
use crate::ir::op::{BinOp, IntPredicate};
use crate::ir::value::{Type, Value};

use super::err::{LoweringError, LoweringErrorKind, expect_arity};
use super::lower_call::lower_call;
use super::lowering_context::LoweringContext;
use super::symbol_table::{Storage, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Arith(BinOp),
    Compare(IntPredicate),
}

pub fn operator_from_symbol(sym: &str) -> Option<Operator> {
    let op = match sym {
        "+" => Operator::Arith(BinOp::Add),
        "-" => Operator::Arith(BinOp::Sub),
        "*" => Operator::Arith(BinOp::Mul),
        "/" => Operator::Arith(BinOp::SDiv),
        "%" => Operator::Arith(BinOp::SRem),
        "==" => Operator::Compare(IntPredicate::Eq),
        "!=" => Operator::Compare(IntPredicate::Ne),
        "<" => Operator::Compare(IntPredicate::Slt),
        "<=" => Operator::Compare(IntPredicate::Sle),
        ">" => Operator::Compare(IntPredicate::Sgt),
        ">=" => Operator::Compare(IntPredicate::Sge),
        _ => return None,
    };
    Some(op)
}

/// Parse literal text as a base-10 `int`.
pub fn parse_literal(node: &AstNode) -> Result<i32, LoweringError> {
    node.name.trim().parse::<i32>().map_err(|_| {
        LoweringError::at(
            LoweringErrorKind::InvalidLiteral,
            node,
            format!("'{}' is not a valid int literal", node.name),
        )
    })
}

pub fn lower_expression(ctx: &mut LoweringContext, node: &AstNode) -> Result<Value, LoweringError> {
    ctx.descend(node)?;
    let value = lower_operand(ctx, node);
    ctx.ascend();
    value
}

fn lower_operand(ctx: &mut LoweringContext, node: &AstNode) -> Result<Value, LoweringError> {
    match node.kind {
        AstNodeKind::Literal => {
            expect_arity(node, 0, 0)?;
            Ok(Value::const_i32(parse_literal(node)?))
        }
        AstNodeKind::Identifier => {
            expect_arity(node, 0, 0)?;
            lower_identifier(ctx, node)
        }
        AstNodeKind::BinaryExpression => lower_binary(ctx, node),
        AstNodeKind::FunctionCall => lower_call(ctx, node)?.ok_or_else(|| {
            LoweringError::at(
                LoweringErrorKind::UnsupportedExpression,
                node,
                format!("'{}' returns void and has no value", node.name),
            )
        }),
        other => Err(LoweringError::at(
            LoweringErrorKind::UnsupportedExpression,
            node,
            format!("{} cannot be used as an expression", other),
        )),
    }
}

fn lower_identifier(ctx: &mut LoweringContext, node: &AstNode) -> Result<Value, LoweringError> {
    match ctx.symbols.lookup(&node.name) {
        Some(Symbol::Local(Storage::Register(value))) => Ok(value),
        Some(Symbol::Local(Storage::Slot { ptr, ty })) => Ok(ctx.build_load(ty, ptr)?),
        Some(Symbol::Constant(value)) => Ok(value),
        None => Err(LoweringError::at(
            LoweringErrorKind::UndefinedSymbol,
            node,
            format!("'{}' is not defined", node.name),
        )),
    }
}

fn lower_binary(ctx: &mut LoweringContext, node: &AstNode) -> Result<Value, LoweringError> {
    expect_arity(node, 2, 2)?;
    let op = operator_from_symbol(&node.name).ok_or_else(|| {
        LoweringError::at(
            LoweringErrorKind::UnsupportedOperator,
            node,
            format!("unsupported operator '{}'", node.name),
        )
    })?;

    let lhs = lower_expression(ctx, &node.children[0])?;
    let rhs = lower_expression(ctx, &node.children[1])?;
    if lhs.ty() != rhs.ty() {
        return Err(LoweringError::at(
            LoweringErrorKind::UnsupportedExpression,
            node,
            format!("operands of '{}' have different types ({} and {})", node.name, lhs.ty(), rhs.ty()),
        ));
    }

    let value = match op {
        Operator::Arith(op) => ctx.build_binary(op, lhs, rhs)?,
        Operator::Compare(pred) => ctx.build_icmp(pred, lhs, rhs)?,
    };
    Ok(value)
}

/// Lower a branch condition to an `i1`. `int` values are compared
/// against zero.
pub fn lower_condition(ctx: &mut LoweringContext, node: &AstNode) -> Result<Value, LoweringError> {
    let value = lower_expression(ctx, node)?;
    match value.ty() {
        Type::I1 => Ok(value),
        Type::I32 => Ok(ctx.build_icmp(IntPredicate::Ne, value, Value::const_i32(0))?),
        other => Err(LoweringError::at(
            LoweringErrorKind::UnsupportedExpression,
            node,
            format!("a value of type {} cannot be used as a condition", other),
        )),
    }
}

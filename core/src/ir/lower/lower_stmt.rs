//! Lowering helpers for statement nodes.
//!
//! Statements are lowered into the context's current block. Control-flow
//! statements create their own blocks, wire them together and leave the
//! cursor on the block where execution continues afterwards (the merge
//! block of an `if`, the exit block of a `while`).
//!
//! See also: `ir::lower::lower_expr` for expression lowering helpers.

use crate::ast::{AstNode, AstNodeKind};
use crate::ir::op::BinOp;
use crate::ir::value::{BlockId, Type};

use super::err::{LoweringError, LoweringErrorKind, expect_arity, expect_child};
use super::lower_call::lower_call;
use super::lower_expr::{lower_condition, lower_expression};
use super::lowering_context::LoweringContext;
use super::symbol_table::{Storage, Symbol};
use super::types;

/// Make `target` the current block and lower the statements of `node`
/// (which must be a `Block`) into it.
pub fn lower_block(ctx: &mut LoweringContext, target: BlockId, node: &AstNode) -> Result<(), LoweringError> {
    if !node.is(AstNodeKind::Block) {
        return Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            format!("expected Block, found {}", node.kind),
        ));
    }
    ctx.set_current_block(target);
    lower_statements(ctx, node)
}

fn lower_statements(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    for (i, stmt) in node.children.iter().enumerate() {
        if ctx.is_current_terminated()? {
            log::debug!(
                "skipping {} unreachable statement(s) after a terminator",
                node.arity() - i
            );
            break;
        }
        lower_statement(ctx, stmt)?;
    }
    Ok(())
}

pub fn lower_statement(ctx: &mut LoweringContext, stmt: &AstNode) -> Result<(), LoweringError> {
    ctx.descend(stmt)?;
    let lowered = lower_statement_kind(ctx, stmt);
    ctx.ascend();
    lowered
}

fn lower_statement_kind(ctx: &mut LoweringContext, stmt: &AstNode) -> Result<(), LoweringError> {
    match stmt.kind {
        AstNodeKind::VariableDeclaration => lower_variable_declaration(ctx, stmt),
        AstNodeKind::Assignment => lower_assignment(ctx, stmt),
        AstNodeKind::ReturnStatement => lower_return(ctx, stmt),
        AstNodeKind::WhileStatement => lower_while(ctx, stmt),
        AstNodeKind::Statement => match stmt.name.as_str() {
            "if" => lower_if(ctx, stmt),
            "break" => lower_break(ctx, stmt),
            "continue" => lower_continue(ctx, stmt),
            other => Err(LoweringError::at(
                LoweringErrorKind::UnsupportedStatement,
                stmt,
                format!("unsupported statement '{}'", other),
            )),
        },
        AstNodeKind::FunctionCall => lower_call(ctx, stmt).map(|_| ()),
        AstNodeKind::Block => lower_statements(ctx, stmt),
        other => Err(LoweringError::at(
            LoweringErrorKind::UnsupportedStatement,
            stmt,
            format!("{} is not a statement", other),
        )),
    }
}

fn lower_variable_declaration(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 1, 2)?;
    if node.name.is_empty() {
        return Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            "variable declaration without a name",
        ));
    }
    let ty = types::resolve_node(&node.children[0])?;
    if ty.is_void() {
        return Err(LoweringError::at(
            LoweringErrorKind::UnsupportedType,
            &node.children[0],
            format!("variable '{}' cannot have type void", node.name),
        ));
    }

    let ptr = ctx.build_alloca(ty.clone())?;
    ctx.symbols.define_local(&node.name, Storage::Slot { ptr: ptr.clone(), ty: ty.clone() });

    if let Some(init) = node.child(1) {
        let value = lower_expression(ctx, init)?;
        check_store_type(init, value.ty(), &ty)?;
        ctx.build_store(value, ptr)?;
    }
    Ok(())
}

/// `=` maps to `None`; compound operators map to their arithmetic op.
fn assignment_operator(sym: &str) -> Option<Option<BinOp>> {
    let op = match sym {
        "=" => None,
        "+=" => Some(BinOp::Add),
        "-=" => Some(BinOp::Sub),
        "*=" => Some(BinOp::Mul),
        "/=" => Some(BinOp::SDiv),
        "%=" => Some(BinOp::SRem),
        _ => return None,
    };
    Some(op)
}

fn lower_assignment(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 2, 2)?;
    let op_node = expect_child(node, 0, AstNodeKind::Identifier)?;
    let op = assignment_operator(&op_node.name).ok_or_else(|| {
        LoweringError::at(
            LoweringErrorKind::UnsupportedAssignmentOperator,
            op_node,
            format!("unsupported assignment operator '{}'", op_node.name),
        )
    })?;

    let (ptr, ty) = match ctx.symbols.lookup(&node.name) {
        Some(Symbol::Local(Storage::Slot { ptr, ty })) => (ptr, ty),
        Some(Symbol::Local(Storage::Register(value))) => {
            // First write to a parameter: give it a stack slot seeded with
            // the incoming value.
            let ty = value.ty().clone();
            let ptr = ctx.build_alloca(ty.clone())?;
            ctx.build_store_in_entry(value, ptr.clone())?;
            ctx.symbols.define_local(&node.name, Storage::Slot { ptr: ptr.clone(), ty: ty.clone() });
            log::debug!("promoted parameter '{}' to a stack slot", node.name);
            (ptr, ty)
        }
        Some(Symbol::Constant(_)) => {
            return Err(LoweringError::at(
                LoweringErrorKind::AssignmentToConstant,
                node,
                format!("cannot assign to constant '{}'", node.name),
            ));
        }
        None => {
            return Err(LoweringError::at(
                LoweringErrorKind::UndefinedSymbol,
                node,
                format!("'{}' is not defined", node.name),
            ));
        }
    };

    let current = ctx.build_load(ty.clone(), ptr.clone())?;
    let rhs_node = &node.children[1];
    let rhs = lower_expression(ctx, rhs_node)?;
    check_store_type(rhs_node, rhs.ty(), &ty)?;
    let result = match op {
        None => rhs,
        Some(op) => ctx.build_binary(op, current, rhs)?,
    };
    ctx.build_store(result, ptr.clone())?;
    ctx.symbols.define_local(&node.name, Storage::Slot { ptr, ty });
    Ok(())
}

fn check_store_type(node: &AstNode, got: &Type, slot: &Type) -> Result<(), LoweringError> {
    if got != slot {
        return Err(LoweringError::at(
            LoweringErrorKind::UnsupportedExpression,
            node,
            format!("cannot store a value of type {} into a {} variable", got, slot),
        ));
    }
    Ok(())
}

fn lower_return(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 0, 1)?;
    let value = match node.child(0) {
        Some(expr) => Some(lower_expression(ctx, expr)?),
        None => None,
    };
    ctx.build_ret(value)?;
    Ok(())
}

/// Lower `node` (an else branch: a `Block` or a nested `if`) into the
/// current block.
fn lower_else_branch(ctx: &mut LoweringContext, target: BlockId, node: &AstNode) -> Result<(), LoweringError> {
    match node.kind {
        AstNodeKind::Block => lower_block(ctx, target, node),
        AstNodeKind::Statement if node.name == "if" => {
            ctx.set_current_block(target);
            ctx.descend(node)?;
            let lowered = lower_if(ctx, node);
            ctx.ascend();
            lowered
        }
        other => Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            node,
            format!("else branch must be a Block or an if statement, found {}", other),
        )),
    }
}

fn lower_if(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 2, 3)?;
    let then_node = expect_child(node, 1, AstNodeKind::Block)?;
    let else_node = node.child(2);

    let cond = lower_condition(ctx, &node.children[0])?;
    let then_bb = ctx.new_block("if.then")?;
    let end_bb = ctx.new_block("if.end")?;
    let else_bb = match else_node {
        Some(_) => ctx.new_block("if.else")?,
        None => end_bb,
    };
    ctx.build_cond_br(cond, then_bb, else_bb)?;

    lower_block(ctx, then_bb, then_node)?;
    fall_through(ctx, end_bb)?;

    if let Some(else_node) = else_node {
        lower_else_branch(ctx, else_bb, else_node)?;
        fall_through(ctx, end_bb)?;
    }

    ctx.set_current_block(end_bb);
    Ok(())
}

fn lower_while(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 2, 2)?;
    let body = expect_child(node, 1, AstNodeKind::Block)?;

    let cond_bb = ctx.new_block("while.cond")?;
    let body_bb = ctx.new_block("while.body")?;
    let end_bb = ctx.new_block("while.end")?;
    ctx.build_br(cond_bb)?;

    ctx.set_current_block(cond_bb);
    let cond = lower_condition(ctx, &node.children[0])?;
    ctx.build_cond_br(cond, body_bb, end_bb)?;

    ctx.push_loop(cond_bb, end_bb);
    let lowered = lower_block(ctx, body_bb, body);
    ctx.pop_loop();
    lowered?;
    fall_through(ctx, cond_bb)?;

    ctx.set_current_block(end_bb);
    Ok(())
}

fn lower_break(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 0, 0)?;
    let targets = ctx.innermost_loop().ok_or_else(|| {
        LoweringError::at(LoweringErrorKind::BreakOutsideLoop, node, "'break' outside of a loop")
    })?;
    ctx.build_br(targets.break_block)?;
    Ok(())
}

fn lower_continue(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    expect_arity(node, 0, 0)?;
    let targets = ctx.innermost_loop().ok_or_else(|| {
        LoweringError::at(LoweringErrorKind::ContinueOutsideLoop, node, "'continue' outside of a loop")
    })?;
    ctx.build_br(targets.continue_block)?;
    Ok(())
}

/// Branch to `target` unless the current block already ended.
fn fall_through(ctx: &mut LoweringContext, target: BlockId) -> Result<(), LoweringError> {
    if !ctx.is_current_terminated()? {
        ctx.build_br(target)?;
    }
    Ok(())
}

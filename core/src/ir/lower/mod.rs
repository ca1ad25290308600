//! file: core/src/ir/lower/mod.rs
//! description: AST -> IR lowering entry point.
//!
//! `lower_program` walks the top level of a `Program` tree: `#define`
//! directives become unit-wide constants and each function declaration is
//! lowered into an `IrModule` function. Unless `single_pass` is set, every
//! function signature is registered before any body is lowered so calls
//! may refer to functions declared further down.
//!
//! Lowering stops at the first error; no partial module is returned.

pub mod err;
pub mod lower_call;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;
pub mod symbol_table;
pub mod types;

pub use err::{LoweringError, LoweringErrorKind};
pub use lowering_context::{LoweringContext, MAX_NESTING_DEPTH};

use crate::ast::{AstNode, AstNodeKind};
use crate::config::CompileOptions;
use crate::ir::function::Param;
use crate::ir::module::IrModule;
use crate::ir::value::{FuncId, Value};

use err::{expect_arity, expect_child};
use lower_expr::parse_literal;
use symbol_table::Storage;

pub fn lower_program(root: &AstNode, options: &CompileOptions) -> Result<IrModule, LoweringError> {
    if !root.is(AstNodeKind::Program) {
        return Err(LoweringError::at(
            LoweringErrorKind::MalformedNode,
            root,
            format!("expected Program at the root, found {}", root.kind),
        ));
    }
    log::info!("lowering program '{}' ({} top-level items)", root.name, root.arity());

    let mut ctx = LoweringContext::new();

    if !options.single_pass {
        for (index, item) in root.children.iter().enumerate() {
            if item.is(AstNodeKind::FunctionDeclaration) {
                let id = declare_function(&mut ctx, item)?;
                ctx.functions.insert(index, id);
            }
        }
    }

    for (index, item) in root.children.iter().enumerate() {
        match item.kind {
            AstNodeKind::PreprocessorDirective => lower_directive(&mut ctx, item)?,
            AstNodeKind::FunctionDeclaration => lower_function(&mut ctx, index, item)?,
            other => {
                return Err(LoweringError::at(
                    LoweringErrorKind::UnsupportedTopLevelConstruct,
                    item,
                    format!("{} is not allowed at the top level", other),
                ));
            }
        }
    }

    let module = ctx.into_module();
    log::info!(
        "lowered {} function(s), {} global(s)",
        module.functions().len(),
        module.globals().len()
    );
    Ok(module)
}

/// Register a `#define NAME literal` constant.
fn lower_directive(ctx: &mut LoweringContext, node: &AstNode) -> Result<(), LoweringError> {
    if node.name != "#define" {
        return Err(LoweringError::at(
            LoweringErrorKind::UnsupportedTopLevelConstruct,
            node,
            format!("unsupported directive '{}'", node.name),
        ));
    }
    expect_arity(node, 2, 2)?;
    let name = expect_child(node, 0, AstNodeKind::Identifier)?;
    let value = &node.children[1];
    if !value.is(AstNodeKind::Literal) {
        return Err(LoweringError::at(
            LoweringErrorKind::UnsupportedDefineValue,
            value,
            format!("value of '{}' must be a literal, found {}", name.name, value.kind),
        ));
    }
    let constant = parse_literal(value)?;
    log::debug!("#define {} {}", name.name, constant);
    ctx.symbols.define_global_constant(&name.name, constant);
    Ok(())
}

/// Validate a declaration's shape and add its signature to the module.
fn declare_function(ctx: &mut LoweringContext, node: &AstNode) -> Result<FuncId, LoweringError> {
    expect_arity(node, 3, 3)?;
    let ret = types::resolve_node(expect_child(node, 0, AstNodeKind::Identifier)?)?;
    let params_node = expect_child(node, 1, AstNodeKind::Parameters)?;
    expect_child(node, 2, AstNodeKind::Block)?;

    let mut params = Vec::with_capacity(params_node.arity());
    for p in &params_node.children {
        if !p.is(AstNodeKind::VariableDeclaration) || p.name.is_empty() {
            return Err(LoweringError::at(
                LoweringErrorKind::MalformedNode,
                p,
                "parameters must be named VariableDeclaration nodes",
            ));
        }
        expect_arity(p, 1, 1)?;
        let ty = types::resolve_node(&p.children[0])?;
        if ty.is_void() {
            return Err(LoweringError::at(
                LoweringErrorKind::UnsupportedType,
                p,
                format!("parameter '{}' cannot have type void", p.name),
            ));
        }
        params.push(Param::new(p.name.clone(), ty));
    }

    if ctx.module.find_function(&node.name).is_some() {
        return Err(LoweringError::at(
            LoweringErrorKind::DuplicateFunction,
            node,
            format!("function '{}' is already declared", node.name),
        ));
    }

    let id = ctx.module.new_function(&node.name, ret, params, false);
    log::debug!("declared function '{}'", node.name);
    Ok(id)
}

/// `index` is the declaration's position among the program's top-level items.
fn lower_function(ctx: &mut LoweringContext, index: usize, node: &AstNode) -> Result<(), LoweringError> {
    let id = match ctx.functions.get(&index) {
        Some(id) => *id,
        None => declare_function(ctx, node)?,
    };
    log::debug!("lowering body of '{}'", node.name);

    let entry = ctx.enter_function(id)?;
    let (ret, params) = {
        let f = ctx.function()?;
        let params = (0..f.params.len())
            .filter_map(|i| f.param_value(i).map(|v| (f.params[i].name.clone(), v)))
            .collect::<Vec<_>>();
        (f.ret.clone(), params)
    };
    for (name, value) in params {
        ctx.symbols.define_local(&name, Storage::Register(value));
    }

    lower_stmt::lower_block(ctx, entry, &node.children[2])?;

    if !ctx.is_current_terminated()? {
        let value = if ret.is_void() { None } else { Some(Value::ConstInt { ty: ret, value: 0 }) };
        log::trace!("'{}' falls off its end; adding default return", node.name);
        ctx.build_ret(value)?;
    }
    ctx.leave_function();
    Ok(())
}

pub mod ast;
pub mod config;
pub mod error;
pub mod ir;
pub mod location;
pub mod target;

pub use ast::{AstNode, AstNodeKind, parse_tree};
pub use config::CompileOptions;
pub use error::{FucErrorExt, Level};
pub use ir::{IrModule, LoweringError, LoweringErrorKind, lower_program, verify_module};
pub use location::Location;
pub use target::Target;

pub fn generate_error_report<E: FucErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("FUC | {} | {} | {}", level, location, message)
}

/// Lower an already-parsed tree and check the result.
pub fn compile_ast_to_ir(root: &AstNode, options: &CompileOptions) -> Result<IrModule, Box<dyn FucErrorExt>> {
    let mut module = lower_program(root, options).map_err(|e| Box::new(e) as Box<dyn FucErrorExt>)?;
    verify_module(&module).map_err(|e| Box::new(e) as Box<dyn FucErrorExt>)?;
    if let Some(target) = options.target {
        module.set_target(target);
    }
    Ok(module)
}

/// Read a textual tree dump, lower it and verify the module.
pub fn compile_tree_to_ir(text: &str, file: &str, options: &CompileOptions) -> Result<IrModule, Box<dyn FucErrorExt>> {
    let root = parse_tree(text, file).map_err(|e| Box::new(e) as Box<dyn FucErrorExt>)?;
    compile_ast_to_ir(&root, options)
}

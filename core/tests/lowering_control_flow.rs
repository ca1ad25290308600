use fuc_core::ir::verify::{predecessors, reachable_blocks};
use fuc_core::ir::{Function, Instr, IrModule, Terminator, Type, Value, verify_module};
use fuc_core::{CompileOptions, lower_program, parse_tree};

fn lower_fn(body: &str) -> IrModule {
    let src = format!(
        r#"
Program(p) {{
    FunctionDeclaration(f) {{
        Identifier(int)
        Parameters() {{ VariableDeclaration(x) {{ Identifier(int) }} }}
        Block() {{ {} }}
    }}
}}"#,
        body
    );
    let root = parse_tree(&src, "cf.ast").expect("tree dump should parse");
    let module = lower_program(&root, &CompileOptions::default()).expect("lowering should succeed");
    verify_module(&module).expect("every block must be terminated");
    module
}

fn f(module: &IrModule) -> &Function {
    module.function(module.find_function("f").unwrap()).unwrap()
}

fn term(func: &Function, block: usize) -> &Terminator {
    func.block(block).unwrap().term.as_ref().unwrap()
}

#[test]
fn if_without_else_is_three_blocks() {
    let module = lower_fn(
        r#"
        Statement(if) {
            Identifier(x)
            Block() { Assignment(x) { Identifier(=) Literal(2) } }
        }
        ReturnStatement() { Identifier(x) }
        "#,
    );
    let func = f(&module);
    assert_eq!(func.block_count(), 3);

    // `if (x)` compares the int against zero
    assert!(matches!(
        func.block(0).unwrap().instrs.last(),
        Some(Instr::ICmp { pred: fuc_core::ir::IntPredicate::Ne, rhs: Value::ConstInt { value: 0, .. }, .. })
    ));
    match term(func, 0) {
        Terminator::CondBr { then_block, else_block, .. } => assert_eq!((*then_block, *else_block), (1, 2)),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(term(func, 1), &Terminator::Br { target: 2 });
    assert!(matches!(term(func, 2), Terminator::Ret { value: Some(_) }));
}

#[test]
fn if_else_is_a_diamond() {
    let module = lower_fn(
        r#"
        Statement(if) {
            BinaryExpression(>) { Identifier(x) Literal(0) }
            Block() { Assignment(x) { Identifier(-=) Literal(1) } }
            Block() { Assignment(x) { Identifier(+=) Literal(1) } }
        }
        ReturnStatement() { Identifier(x) }
        "#,
    );
    let func = f(&module);
    assert_eq!(func.block_count(), 4);

    let (then_bb, else_bb) = match term(func, 0) {
        Terminator::CondBr { then_block, else_block, .. } => (*then_block, *else_block),
        other => panic!("unexpected {:?}", other),
    };
    let end_bb = 2;
    assert_ne!(else_bb, end_bb);
    assert_eq!(term(func, then_bb), &Terminator::Br { target: end_bb });
    assert_eq!(term(func, else_bb), &Terminator::Br { target: end_bb });
    assert_eq!(predecessors(func, end_bb), vec![then_bb, else_bb]);
}

#[test]
fn arms_that_return_do_not_branch_to_end() {
    let module = lower_fn(
        r#"
        Statement(if) {
            Identifier(x)
            Block() { ReturnStatement() { Literal(1) } }
            Block() { ReturnStatement() { Literal(2) } }
        }
        "#,
    );
    let func = f(&module);
    assert!(predecessors(func, 2).is_empty());
    assert!(!reachable_blocks(func).contains(&2));
    // The unreachable merge block still gets the default return.
    assert_eq!(term(func, 2), &Terminator::Ret { value: Some(Value::const_i32(0)) });
}

#[test]
fn else_if_chain_joins_through_nested_merge() {
    let module = lower_fn(
        r#"
        Statement(if) {
            BinaryExpression(==) { Identifier(x) Literal(1) }
            Block() { Assignment(x) { Identifier(=) Literal(10) } }
            Statement(if) {
                BinaryExpression(==) { Identifier(x) Literal(2) }
                Block() { Assignment(x) { Identifier(=) Literal(20) } }
            }
        }
        ReturnStatement() { Identifier(x) }
        "#,
    );
    let func = f(&module);
    // entry, outer then/end/else, inner then/end
    assert_eq!(func.block_count(), 6);
    let outer_end = 2;
    let inner_end = 5;
    assert_eq!(term(func, inner_end), &Terminator::Br { target: outer_end });
    assert_eq!(predecessors(func, outer_end), vec![1, inner_end]);
}

#[test]
fn while_has_a_single_back_edge() {
    let module = lower_fn(
        r#"
        VariableDeclaration(i) { Identifier(int) Literal(0) }
        WhileStatement() {
            BinaryExpression(<) { Identifier(i) Identifier(x) }
            Block() { Assignment(i) { Identifier(+=) Literal(1) } }
        }
        ReturnStatement() { Identifier(i) }
        "#,
    );
    let func = f(&module);
    let (cond, body, end) = (1, 2, 3);
    assert_eq!(func.block_count(), 4);
    assert_eq!(term(func, 0), &Terminator::Br { target: cond });
    assert!(matches!(term(func, cond), Terminator::CondBr { then_block, else_block, .. } if *then_block == body && *else_block == end));
    assert_eq!(term(func, body), &Terminator::Br { target: cond });
    assert_eq!(predecessors(func, cond), vec![0, body]);
    assert_eq!(predecessors(func, end), vec![cond]);
}

// `break` used to be accepted and ignored; it now leaves the loop.
#[test]
fn break_jumps_to_loop_exit() {
    let module = lower_fn(
        r#"
        WhileStatement() {
            Literal(1)
            Block() {
                Statement(break)
                Assignment(x) { Identifier(=) Literal(9) }
            }
        }
        ReturnStatement() { Identifier(x) }
        "#,
    );
    let func = f(&module);
    assert_eq!(term(func, 2), &Terminator::Br { target: 3 });
    // no back-edge from the body
    assert_eq!(predecessors(func, 1), vec![0]);
    assert_eq!(predecessors(func, 3), vec![1, 2]);
    // the store after `break` is dead and never emitted
    assert!(func.block(2).unwrap().instrs.is_empty());
}

#[test]
fn continue_jumps_to_condition() {
    let module = lower_fn(
        r#"
        WhileStatement() {
            BinaryExpression(<) { Identifier(x) Literal(3) }
            Block() {
                Assignment(x) { Identifier(+=) Literal(1) }
                Statement(continue)
            }
        }
        ReturnStatement() { Identifier(x) }
        "#,
    );
    let func = f(&module);
    assert_eq!(term(func, 2), &Terminator::Br { target: 1 });
}

#[test]
fn break_targets_innermost_loop() {
    let module = lower_fn(
        r#"
        WhileStatement() {
            Identifier(x)
            Block() {
                WhileStatement() {
                    Identifier(x)
                    Block() { Statement(break) }
                }
                Assignment(x) { Identifier(-=) Literal(1) }
            }
        }
        ReturnStatement() { Literal(0) }
        "#,
    );
    let func = f(&module);
    // outer: cond 1, body 2, end 3; inner: cond 4, body 5, end 6
    assert_eq!(term(func, 5), &Terminator::Br { target: 6 });
    assert_eq!(term(func, 6), &Terminator::Br { target: 1 });
}

#[test]
fn missing_return_gets_typed_default() {
    let src = r#"
Program(p) {
    FunctionDeclaration(i) { Identifier(int) Parameters() Block() }
    FunctionDeclaration(v) { Identifier(void) Parameters() Block() }
}"#;
    let root = parse_tree(src, "d.ast").unwrap();
    let module = lower_program(&root, &CompileOptions::default()).unwrap();
    verify_module(&module).unwrap();

    let i = module.function(module.find_function("i").unwrap()).unwrap();
    assert_eq!(
        i.block(0).unwrap().term,
        Some(Terminator::Ret { value: Some(Value::ConstInt { ty: Type::I32, value: 0 }) })
    );
    let v = module.function(module.find_function("v").unwrap()).unwrap();
    assert_eq!(v.block(0).unwrap().term, Some(Terminator::Ret { value: None }));
}

#[test]
fn statements_after_return_are_skipped() {
    let module = lower_fn(
        r#"
        ReturnStatement() { Literal(1) }
        FunctionCall(printf) { Literal(2) }
        "#,
    );
    assert!(module.find_function("printf").is_none());
    assert!(module.globals().is_empty());
    assert_eq!(f(&module).block_count(), 1);
}

#[test]
fn nested_block_shares_function_scope() {
    let module = lower_fn(
        r#"
        Block() { VariableDeclaration(y) { Identifier(int) Literal(4) } }
        ReturnStatement() { Identifier(y) }
        "#,
    );
    assert_eq!(f(&module).slot_count(), 1);
}

use fuc_core::ir::{
    BinOp, Function, Instr, IntPredicate, IrModule, LoweringError, Terminator, Type, Value, verify_module,
};
use fuc_core::{CompileOptions, lower_program, parse_tree};

fn lower(src: &str) -> Result<IrModule, LoweringError> {
    let root = parse_tree(src, "test.ast").expect("tree dump should parse");
    lower_program(&root, &CompileOptions::default())
}

fn func<'a>(module: &'a IrModule, name: &str) -> &'a Function {
    let id = module.find_function(name).expect("function should exist");
    module.function(id).unwrap()
}

fn all_instrs(f: &Function) -> Vec<&Instr> {
    f.blocks().iter().flat_map(|b| b.instrs.iter()).collect()
}

#[test]
fn unassigned_parameter_is_used_without_a_slot() {
    let module = lower(
        r#"
Program(p) {
    FunctionDeclaration(id) {
        Identifier(int)
        Parameters() { VariableDeclaration(a) { Identifier(int) } }
        Block() { ReturnStatement() { Identifier(a) } }
    }
}"#,
    )
    .unwrap();

    let f = func(&module, "id");
    assert_eq!(f.slot_count(), 0);
    let entry = f.block(0).unwrap();
    assert!(entry.instrs.is_empty());
    assert_eq!(
        entry.term,
        Some(Terminator::Ret { value: Some(Value::Param { index: 0, ty: Type::I32 }) })
    );
}

#[test]
fn parameter_promotion_happens_once() {
    let module = lower(
        r#"
Program(p) {
    FunctionDeclaration(f) {
        Identifier(int)
        Parameters() { VariableDeclaration(x) { Identifier(int) } }
        Block() {
            Assignment(x) { Identifier(+=) Literal(1) }
            Assignment(x) { Identifier(=) Literal(5) }
            ReturnStatement() { Identifier(x) }
        }
    }
}"#,
    )
    .unwrap();
    verify_module(&module).unwrap();

    let f = func(&module, "f");
    let allocas = all_instrs(f).into_iter().filter(|i| i.is_alloca()).count();
    assert_eq!(allocas, 1);
    assert_eq!(f.slot_count(), 1);

    let entry = &f.block(0).unwrap().instrs;
    assert!(entry[0].is_alloca());
    match &entry[1] {
        Instr::Store { value, .. } => assert_eq!(value, &Value::Param { index: 0, ty: Type::I32 }),
        other => panic!("expected the incoming value to be stored, got {:?}", other),
    }

    // After promotion the return reads through the slot.
    match &f.block(0).unwrap().term {
        Some(Terminator::Ret { value: Some(Value::Reg { .. }) }) => {}
        other => panic!("unexpected terminator {:?}", other),
    }
}

#[test]
fn plain_assignment_still_loads_the_old_value() {
    let module = lower(
        r#"
Program(p) {
    FunctionDeclaration(f) {
        Identifier(void) Parameters()
        Block() {
            VariableDeclaration(y) { Identifier(int) }
            Assignment(y) { Identifier(=) Literal(3) }
        }
    }
}"#,
    )
    .unwrap();

    let f = func(&module, "f");
    let instrs = all_instrs(f);
    assert!(matches!(instrs[0], Instr::Alloca { ty: Type::I32, .. }));
    assert!(matches!(instrs[1], Instr::Load { .. }));
    assert!(matches!(instrs[2], Instr::Store { value: Value::ConstInt { value: 3, .. }, .. }));
    assert_eq!(instrs.len(), 3);
}

#[test]
fn local_shadows_define_only_inside_its_function() {
    let module = lower(
        r#"
Program(p) {
    PreprocessorDirective(#define) { Identifier(N) Literal(7) }
    FunctionDeclaration(a) {
        Identifier(int) Parameters()
        Block() {
            VariableDeclaration(N) { Identifier(int) Literal(1) }
            ReturnStatement() { Identifier(N) }
        }
    }
    FunctionDeclaration(b) {
        Identifier(int) Parameters()
        Block() { ReturnStatement() { Identifier(N) } }
    }
}"#,
    )
    .unwrap();

    let a = func(&module, "a");
    assert!(matches!(
        a.block(0).unwrap().term,
        Some(Terminator::Ret { value: Some(Value::Reg { .. }) })
    ));

    let b = func(&module, "b");
    assert!(b.block(0).unwrap().instrs.is_empty());
    assert_eq!(
        b.block(0).unwrap().term,
        Some(Terminator::Ret { value: Some(Value::const_i32(7)) })
    );
}

#[test]
fn binary_operands_lower_left_to_right() {
    let module = lower(
        r#"
Program(p) {
    FunctionDeclaration(one) { Identifier(int) Parameters() Block() { ReturnStatement() { Literal(1) } } }
    FunctionDeclaration(two) { Identifier(int) Parameters() Block() { ReturnStatement() { Literal(2) } } }
    FunctionDeclaration(main) {
        Identifier(int) Parameters()
        Block() {
            ReturnStatement() {
                BinaryExpression(+) { FunctionCall(one) FunctionCall(two) }
            }
        }
    }
}"#,
    )
    .unwrap();

    let one = module.find_function("one").unwrap();
    let two = module.find_function("two").unwrap();
    let callees: Vec<_> = all_instrs(func(&module, "main"))
        .into_iter()
        .filter_map(|i| match i {
            Instr::Call { callee, .. } => Some(*callee),
            _ => None,
        })
        .collect();
    assert_eq!(callees, vec![one, two]);
}

#[test]
fn comparisons_produce_i1() {
    let module = lower(
        r#"
Program(p) {
    FunctionDeclaration(f) {
        Identifier(int)
        Parameters() { VariableDeclaration(a) { Identifier(int) } VariableDeclaration(b) { Identifier(int) } }
        Block() {
            Statement(if) {
                BinaryExpression(<=) { Identifier(a) Identifier(b) }
                Block() { ReturnStatement() { BinaryExpression(%) { Identifier(a) Identifier(b) } } }
            }
        }
    }
}"#,
    )
    .unwrap();
    verify_module(&module).unwrap();

    let entry = &func(&module, "f").block(0).unwrap().instrs;
    assert!(matches!(entry[0], Instr::ICmp { pred: fuc_core::ir::IntPredicate::Sle, .. }));
    match &func(&module, "f").block(0).unwrap().term {
        Some(Terminator::CondBr { cond, .. }) => assert_eq!(cond.ty(), &Type::I1),
        other => panic!("expected a conditional branch, got {:?}", other),
    }
}

/// `int f(int a, int b)` with the given body statements.
fn two_params(body: &str) -> String {
    format!(
        r#"
Program(p) {{
    FunctionDeclaration(f) {{
        Identifier(int)
        Parameters() {{
            VariableDeclaration(a) {{ Identifier(int) }}
            VariableDeclaration(b) {{ Identifier(int) }}
        }}
        Block() {{ {} }}
    }}
}}"#,
        body
    )
}

const A: Value = Value::Param { index: 0, ty: Type::I32 };
const B: Value = Value::Param { index: 1, ty: Type::I32 };

#[test]
fn arithmetic_operators_map_to_binary_ops() {
    let cases = [
        ("+", BinOp::Add),
        ("-", BinOp::Sub),
        ("*", BinOp::Mul),
        ("/", BinOp::SDiv),
        ("%", BinOp::SRem),
    ];
    for (sym, expected) in cases {
        let src = two_params(&format!(
            "ReturnStatement() {{ BinaryExpression({}) {{ Identifier(a) Identifier(b) }} }}",
            sym
        ));
        let module = lower(&src).unwrap();
        verify_module(&module).unwrap();
        match all_instrs(func(&module, "f")).as_slice() {
            [Instr::Binary { op, lhs, rhs, .. }] => {
                assert_eq!(*op, expected, "operator '{}'", sym);
                assert_eq!((lhs, rhs), (&A, &B), "operand order of '{}'", sym);
            }
            other => panic!("'{}' lowered to {:?}", sym, other),
        }
    }
}

#[test]
fn comparison_operators_map_to_predicates() {
    let cases = [
        ("==", IntPredicate::Eq),
        ("!=", IntPredicate::Ne),
        ("<", IntPredicate::Slt),
        ("<=", IntPredicate::Sle),
        (">", IntPredicate::Sgt),
        (">=", IntPredicate::Sge),
    ];
    for (sym, expected) in cases {
        let src = two_params(&format!(
            "Statement(if) {{ BinaryExpression({}) {{ Identifier(a) Identifier(b) }} Block() }}",
            sym
        ));
        let module = lower(&src).unwrap();
        verify_module(&module).unwrap();
        // A comparison is already an i1, so no extra `!= 0` is emitted.
        match all_instrs(func(&module, "f")).as_slice() {
            [Instr::ICmp { pred, lhs, rhs, .. }] => {
                assert_eq!(*pred, expected, "operator '{}'", sym);
                assert_eq!((lhs, rhs), (&A, &B), "operand order of '{}'", sym);
            }
            other => panic!("'{}' lowered to {:?}", sym, other),
        }
    }
}

#[test]
fn compound_assignments_combine_loaded_value_and_rhs() {
    let cases = [
        ("+=", BinOp::Add),
        ("-=", BinOp::Sub),
        ("*=", BinOp::Mul),
        ("/=", BinOp::SDiv),
        ("%=", BinOp::SRem),
    ];
    for (sym, expected) in cases {
        let src = two_params(&format!(
            "VariableDeclaration(v) {{ Identifier(int) Literal(10) }} Assignment(v) {{ Identifier({}) Literal(3) }}",
            sym
        ));
        let module = lower(&src).unwrap();
        verify_module(&module).unwrap();
        let instrs = all_instrs(func(&module, "f"));

        let loaded = instrs
            .iter()
            .find_map(|i| match i {
                Instr::Load { dest, ty, .. } => Some(Value::Reg { id: *dest, ty: ty.clone() }),
                _ => None,
            })
            .expect("the variable should be loaded before the update");
        let (op, lhs, rhs, dest) = instrs
            .iter()
            .find_map(|i| match i {
                Instr::Binary { op, lhs, rhs, dest } => Some((*op, lhs.clone(), rhs.clone(), *dest)),
                _ => None,
            })
            .expect("compound assignment should emit an arithmetic op");
        assert_eq!(op, expected, "operator '{}'", sym);
        assert_eq!(lhs, loaded);
        assert_eq!(rhs, Value::const_i32(3));

        match instrs.last() {
            Some(Instr::Store { value: Value::Reg { id, .. }, .. }) => assert_eq!(*id, dest),
            other => panic!("'{}' should store its result, got {:?}", sym, other),
        }
    }
}

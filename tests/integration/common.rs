//! Sample trees built through the public API.

use irtree::ir::{
    Argument, BinaryOp, DeclKind, Declaration, ExprKind, Expression, FunctionDecl, FunctionKind,
    FunctionModifiers, IrTree, LiteralValue, Mutability, NodeMeta, Parameter, ParamKind,
    ProgramUnit, SourceLocation, Statement, StmtKind, TypeRef, VariableDecl,
};

const FILE: &str = "lib/main.dart";

fn meta(id: &str, line: u32) -> NodeMeta {
    NodeMeta::at(id, SourceLocation::new(FILE, line, 3, line * 20, 8))
}

fn ident(id: &str, name: &str, line: u32) -> Expression {
    Expression::new(
        meta(id, line),
        ExprKind::Identifier {
            name: name.to_string(),
        },
    )
}

/// `int add(int a, int b) { return a + b; }` plus a top-level greeting
pub fn sample_tree() -> IrTree {
    let sum = Expression::new(
        meta("e_sum", 2),
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(ident("e_a", "a", 2)),
            right: Box::new(ident("e_b", "b", 2)),
        },
    )
    .typed(TypeRef::named("int"));

    let param = |id: &str, name: &str| Parameter {
        meta: meta(id, 1),
        name: name.to_string(),
        declared_type: Some(TypeRef::named("int")),
        param_kind: ParamKind::Positional,
        required: true,
        default_value: None,
    };

    let add = Declaration::new(
        meta("d_add", 1),
        DeclKind::Function(FunctionDecl {
            name: "add".to_string(),
            function_kind: FunctionKind::Function,
            type_params: Vec::new(),
            params: vec![param("p_a", "a"), param("p_b", "b")],
            return_type: Some(TypeRef::named("int")),
            body: Some(Box::new(Statement::new(
                meta("s_body", 1),
                StmtKind::Block {
                    statements: vec![Statement::new(
                        meta("s_ret", 2),
                        StmtKind::Return { value: Some(sum) },
                    )],
                },
            ))),
            modifiers: FunctionModifiers::default(),
        }),
    );

    let call = Expression::new(
        NodeMeta::synthetic("e_call"),
        ExprKind::Call {
            callee: Box::new(ident("e_callee", "add", 5)),
            args: vec![
                Argument::positional(int_literal("e_one", 1)),
                Argument::positional(int_literal("e_two", 2)),
            ],
        },
    );

    let greeting = Declaration::new(
        meta("d_total", 5),
        DeclKind::Variable(VariableDecl {
            name: "total".to_string(),
            declared_type: None,
            initializer: Some(call),
            mutability: Mutability::Final,
            is_static: false,
            is_late: false,
        }),
    );

    let unit = Declaration::new(
        NodeMeta::synthetic("u_main"),
        DeclKind::ProgramUnit(ProgramUnit {
            path: FILE.to_string(),
            imports: Vec::new(),
            declarations: vec![add, greeting],
        }),
    );

    let mut tree = IrTree::new();
    tree.set_metadata("producer", "integration-tests");
    tree.add_declaration(unit);
    tree
}

fn int_literal(id: &str, v: i64) -> Expression {
    Expression::new(
        NodeMeta::synthetic(id),
        ExprKind::Literal {
            value: LiteralValue::Int(v),
        },
    )
    .typed(TypeRef::named("int"))
}

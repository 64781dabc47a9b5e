//! Benchmarks for the tree codec.
//!
//! Measures performance of:
//! - Binary write (with and without checksum/debug info)
//! - Binary read (with and without checksum verification)
//! - Header/string-table inspection
//! - JSON mirror conversion

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use irtree::ir::{
    BinaryOp, DeclKind, Declaration, ExprKind, Expression, FunctionDecl, FunctionKind,
    FunctionModifiers, IrTree, LiteralValue, Mutability, NodeMeta, ProgramUnit, SourceLocation,
    Statement, StmtKind, TypeRef, VariableDecl,
};
use irtree::json::{from_json_str, to_json_string};
use irtree::{ReadOptions, TreeReader, TreeWriter, WriteOptions};

// =============================================================================
// Test Data Generation
// =============================================================================

struct Ids(u32);

impl Ids {
    fn meta(&mut self, file: &str) -> NodeMeta {
        self.0 += 1;
        NodeMeta::at(
            format!("n{}", self.0),
            SourceLocation::new(file, self.0, 5, self.0 * 16, 12),
        )
    }
}

/// `local_i = local_{i-1} * i + 1` chains, one function per `functions`
fn generate_tree(files: usize, functions: usize, statements: usize) -> IrTree {
    let mut ids = Ids(0);
    let mut tree = IrTree::new();
    tree.set_metadata("producer", "bench");

    for f in 0..files {
        let path = format!("lib/src/file_{f}.dart");
        let mut decls = Vec::with_capacity(functions);
        for func in 0..functions {
            let mut body = Vec::with_capacity(statements);
            for s in 0..statements {
                let operand = Expression::new(
                    ids.meta(&path),
                    ExprKind::Identifier {
                        name: format!("local_{}", s.saturating_sub(1)),
                    },
                )
                .typed(TypeRef::named("int"));
                let init = Expression::new(
                    ids.meta(&path),
                    ExprKind::Binary {
                        op: BinaryOp::Add,
                        left: Box::new(operand),
                        right: Box::new(Expression::new(
                            ids.meta(&path),
                            ExprKind::Literal {
                                value: LiteralValue::Int(s as i64),
                            },
                        )),
                    },
                )
                .typed(TypeRef::named("int"));
                body.push(Statement::new(
                    ids.meta(&path),
                    StmtKind::LocalVariable(VariableDecl {
                        name: format!("local_{s}"),
                        declared_type: Some(TypeRef::named("int")),
                        initializer: Some(init),
                        mutability: Mutability::Final,
                        is_static: false,
                        is_late: false,
                    }),
                ));
            }
            decls.push(Declaration::new(
                ids.meta(&path),
                DeclKind::Function(FunctionDecl {
                    name: format!("compute_{func}"),
                    function_kind: FunctionKind::Function,
                    type_params: Vec::new(),
                    params: Vec::new(),
                    return_type: Some(TypeRef::named("void")),
                    body: Some(Box::new(Statement::new(
                        ids.meta(&path),
                        StmtKind::Block { statements: body },
                    ))),
                    modifiers: FunctionModifiers::default(),
                }),
            ));
        }
        tree.add_declaration(Declaration::new(
            ids.meta(&path),
            DeclKind::ProgramUnit(ProgramUnit {
                path,
                imports: Vec::new(),
                declarations: decls,
            }),
        ));
    }
    tree
}

const SIZES: [(&str, usize, usize, usize); 3] = [
    ("small", 1, 5, 10),
    ("medium", 10, 20, 20),
    ("large", 50, 40, 25),
];

// =============================================================================
// Write Benchmarks
// =============================================================================

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    for (name, files, functions, statements) in SIZES {
        let tree = generate_tree(files, functions, statements);
        let size = TreeWriter::default().write(&tree).map(|b| b.len()).unwrap_or(0);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("default", name), &tree, |b, tree| {
            let writer = TreeWriter::default();
            b.iter(|| writer.write(black_box(tree)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("compact", name), &tree, |b, tree| {
            let writer = TreeWriter::new(WriteOptions::compact());
            b.iter(|| writer.write(black_box(tree)).unwrap());
        });
    }
    group.finish();
}

// =============================================================================
// Read Benchmarks
// =============================================================================

fn bench_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("read");
    for (name, files, functions, statements) in SIZES {
        let bytes = TreeWriter::default()
            .write(&generate_tree(files, functions, statements))
            .unwrap();
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("verified", name), &bytes, |b, bytes| {
            let reader = TreeReader::default();
            b.iter(|| reader.read(black_box(bytes)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("unverified", name), &bytes, |b, bytes| {
            let reader = TreeReader::new(ReadOptions {
                verify_checksum: false,
                ..ReadOptions::default()
            });
            b.iter(|| reader.read(black_box(bytes)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("inspect", name), &bytes, |b, bytes| {
            let reader = TreeReader::default();
            b.iter(|| reader.inspect(black_box(bytes)).unwrap());
        });
    }
    group.finish();
}

// =============================================================================
// JSON Mirror Benchmarks
// =============================================================================

fn bench_json(c: &mut Criterion) {
    let tree = generate_tree(10, 20, 20);
    let text = to_json_string(&tree, false).unwrap();

    let mut group = c.benchmark_group("json");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("to_json", |b| {
        b.iter(|| to_json_string(black_box(&tree), false).unwrap())
    });
    group.bench_function("from_json", |b| {
        b.iter(|| from_json_str(black_box(&text)).unwrap())
    });
    group.finish();
}

criterion_group!(
    name = codec_benches;
    config = Criterion::default();
    targets =
        bench_write,
        bench_read,
);

criterion_group!(
    name = json_benches;
    config = Criterion::default().sample_size(30);
    targets = bench_json
);

criterion_main!(codec_benches, json_benches);

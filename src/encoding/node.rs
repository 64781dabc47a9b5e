//! Node encoder/decoder
//!
//! Every tagged node (declaration, statement, expression) starts with the
//! common prefix
//!
//! ```text
//! [tag: u8]
//! [id: string ref]
//! [result_type: presence u8, TypeRef]      expressions only
//! [location: presence u8, 20 bytes]         only with HAS_DEBUG_INFO
//! [synthetic: u8]
//! ```
//!
//! followed by the variant fields in declaration order. Strings are 4-byte
//! references into the string table, optional fields carry a presence byte
//! (strictly 0 or 1), lists carry a 4-byte count.
//!
//! The decoder reads tags in a family context: a tag outside the family's
//! range, or unassigned inside it, is `UnknownNodeTag`.

use super::bytes::{ByteReader, ByteWriter};
use super::intern::{StringInterner, StringTable};
use super::tags::{decl, expr, stmt, NodeFamily};
use crate::error::{DecodeError, EncodeError};
use crate::ir::{
    Argument, BinaryOp, CatchClause, ClassDecl, ClassKind, DeclKind, Declaration, EnumConstant,
    EnumDecl, ExprKind, Expression, FloatBits, FunctionDecl, FunctionKind, FunctionModifiers,
    ImportDirective, IrTree, LambdaBody, LiteralValue, MapEntry, Mutability, NodeMeta, ParamKind,
    Parameter, PostfixOp, ProgramUnit, SourceLocation, Statement, StmtKind, SwitchCase, TypeRef,
    UnaryOp, VariableDecl,
};

// ============================================================================
// Contexts
// ============================================================================

/// Context for encoding nodes - resolves strings against the collected table
pub struct EncodeContext<'a> {
    out: &'a mut ByteWriter,
    strings: &'a StringInterner,
    debug_info: bool,
}

impl<'a> EncodeContext<'a> {
    pub fn new(out: &'a mut ByteWriter, strings: &'a StringInterner, debug_info: bool) -> Self {
        Self {
            out,
            strings,
            debug_info,
        }
    }

    /// Write a string reference
    fn string(&mut self, s: &str) -> Result<(), EncodeError> {
        let index = self
            .strings
            .get(s)
            .ok_or_else(|| EncodeError::Uninterned(s.to_owned()))?;
        self.out.write_u32(index);
        Ok(())
    }

    fn opt_string(&mut self, s: Option<&str>) -> Result<(), EncodeError> {
        match s {
            None => self.out.write_u8(0),
            Some(s) => {
                self.out.write_u8(1);
                self.string(s)?;
            }
        }
        Ok(())
    }

    fn string_list(&mut self, items: &[String]) -> Result<(), EncodeError> {
        self.seq(items, |ctx, s| ctx.string(s))
    }

    #[inline]
    fn u8(&mut self, v: u8) {
        self.out.write_u8(v);
    }

    #[inline]
    fn bool(&mut self, v: bool) {
        self.out.write_bool(v);
    }

    /// Write a count followed by each item
    fn seq<T>(
        &mut self,
        items: &[T],
        f: impl Fn(&mut Self, &T) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        self.out.write_count(items.len())?;
        for item in items {
            f(self, item)?;
        }
        Ok(())
    }

    /// Write a presence byte and, if present, the value
    fn opt<T>(
        &mut self,
        value: Option<&T>,
        f: impl Fn(&mut Self, &T) -> Result<(), EncodeError>,
    ) -> Result<(), EncodeError> {
        match value {
            None => {
                self.out.write_u8(0);
                Ok(())
            }
            Some(v) => {
                self.out.write_u8(1);
                f(self, v)
            }
        }
    }
}

/// Context for decoding nodes - resolves string references and bounds depth
pub struct DecodeContext<'a> {
    reader: ByteReader<'a>,
    strings: &'a StringTable,
    debug_info: bool,
    depth: usize,
    max_depth: usize,
}

impl<'a> DecodeContext<'a> {
    pub fn new(
        reader: ByteReader<'a>,
        strings: &'a StringTable,
        debug_info: bool,
        max_depth: usize,
    ) -> Self {
        Self {
            reader,
            strings,
            debug_info,
            depth: 0,
            max_depth,
        }
    }

    pub fn reader(&self) -> &ByteReader<'a> {
        &self.reader
    }

    fn position(&self) -> usize {
        self.reader.position()
    }

    /// Read a string reference and resolve it
    fn string(&mut self) -> Result<String, DecodeError> {
        let offset = self.position();
        let index = self.reader.read_u32()?;
        self.strings.resolve(index, offset).map(str::to_owned)
    }

    fn opt_string(&mut self) -> Result<Option<String>, DecodeError> {
        self.opt(Self::string)
    }

    fn string_list(&mut self) -> Result<Vec<String>, DecodeError> {
        self.seq(Self::string)
    }

    #[inline]
    fn u8(&mut self) -> Result<u8, DecodeError> {
        self.reader.read_u8()
    }

    #[inline]
    fn bool(&mut self, what: &'static str) -> Result<bool, DecodeError> {
        self.reader.read_bool(what)
    }

    /// Read an inner discriminant byte and map it through `f`
    fn byte_enum<T>(
        &mut self,
        what: &'static str,
        f: impl Fn(u8) -> Option<T>,
    ) -> Result<T, DecodeError> {
        let offset = self.position();
        let v = self.u8()?;
        f(v).ok_or_else(|| DecodeError::invalid_value(what, v, offset))
    }

    fn seq<T>(
        &mut self,
        f: impl Fn(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Vec<T>, DecodeError> {
        let count = self.reader.read_count()?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(f(self)?);
        }
        Ok(items)
    }

    fn opt<T>(
        &mut self,
        f: impl Fn(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<Option<T>, DecodeError> {
        if self.bool("presence flag")? {
            f(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Read a tag byte that must belong to `family`
    fn tag(&mut self, family: NodeFamily) -> Result<(u8, usize), DecodeError> {
        let offset = self.position();
        let tag = self.u8()?;
        if !family.contains(tag) {
            return Err(DecodeError::UnknownNodeTag {
                tag,
                family,
                offset,
            });
        }
        Ok((tag, offset))
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                limit: self.max_depth,
                offset: self.position(),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

// ============================================================================
// Tree body
// ============================================================================

/// Encode the metadata map followed by the root declaration list
pub fn encode_body(ctx: &mut EncodeContext<'_>, tree: &IrTree) -> Result<(), EncodeError> {
    ctx.out.write_count(tree.metadata.len())?;
    for (key, value) in &tree.metadata {
        ctx.string(key)?;
        ctx.string(value)?;
    }
    ctx.seq(&tree.declarations, encode_declaration)
}

/// Decode the metadata map followed by the root declaration list
pub fn decode_body(ctx: &mut DecodeContext<'_>) -> Result<IrTree, DecodeError> {
    let mut tree = IrTree::new();
    let count = ctx.reader.read_count()?;
    for _ in 0..count {
        let key_offset = ctx.position();
        let key = ctx.string()?;
        let value = ctx.string()?;
        if tree.metadata.insert(key, value).is_some() {
            return Err(DecodeError::DuplicateMetadataKey { offset: key_offset });
        }
    }
    tree.declarations = ctx.seq(decode_declaration)?;
    Ok(tree)
}

// ============================================================================
// Shared pieces
// ============================================================================

fn encode_location(ctx: &mut EncodeContext<'_>, loc: &SourceLocation) -> Result<(), EncodeError> {
    ctx.string(&loc.file)?;
    ctx.out.write_u32(loc.line);
    ctx.out.write_u32(loc.column);
    ctx.out.write_u32(loc.offset);
    ctx.out.write_u32(loc.length);
    Ok(())
}

fn decode_location(ctx: &mut DecodeContext<'_>) -> Result<SourceLocation, DecodeError> {
    Ok(SourceLocation {
        file: ctx.string()?,
        line: ctx.reader.read_u32()?,
        column: ctx.reader.read_u32()?,
        offset: ctx.reader.read_u32()?,
        length: ctx.reader.read_u32()?,
    })
}

/// Location and synthetic flag; the tail of every node prefix
fn encode_meta_tail(ctx: &mut EncodeContext<'_>, meta: &NodeMeta) -> Result<(), EncodeError> {
    if ctx.debug_info {
        ctx.opt(meta.location.as_ref(), encode_location)?;
    }
    ctx.bool(meta.synthetic);
    Ok(())
}

fn decode_meta_tail(ctx: &mut DecodeContext<'_>, id: String) -> Result<NodeMeta, DecodeError> {
    let location = if ctx.debug_info {
        ctx.opt(decode_location)?
    } else {
        None
    };
    let synthetic = ctx.bool("synthetic flag")?;
    Ok(NodeMeta {
        id,
        location,
        synthetic,
    })
}

fn encode_meta(ctx: &mut EncodeContext<'_>, meta: &NodeMeta) -> Result<(), EncodeError> {
    ctx.string(&meta.id)?;
    encode_meta_tail(ctx, meta)
}

fn decode_meta(ctx: &mut DecodeContext<'_>) -> Result<NodeMeta, DecodeError> {
    let id = ctx.string()?;
    decode_meta_tail(ctx, id)
}

pub fn encode_type_ref(ctx: &mut EncodeContext<'_>, ty: &TypeRef) -> Result<(), EncodeError> {
    ctx.string(&ty.name)?;
    ctx.bool(ty.nullable);
    ctx.seq(&ty.type_args, encode_type_ref)
}

pub fn decode_type_ref(ctx: &mut DecodeContext<'_>) -> Result<TypeRef, DecodeError> {
    ctx.enter()?;
    let name = ctx.string()?;
    let nullable = ctx.bool("nullable flag")?;
    let type_args = ctx.seq(decode_type_ref)?;
    ctx.leave();
    Ok(TypeRef {
        name,
        nullable,
        type_args,
    })
}

fn encode_argument(ctx: &mut EncodeContext<'_>, arg: &Argument) -> Result<(), EncodeError> {
    ctx.opt_string(arg.name.as_deref())?;
    encode_expression(ctx, &arg.value)
}

fn decode_argument(ctx: &mut DecodeContext<'_>) -> Result<Argument, DecodeError> {
    Ok(Argument {
        name: ctx.opt_string()?,
        value: decode_expression(ctx)?,
    })
}

fn encode_literal(ctx: &mut EncodeContext<'_>, value: &LiteralValue) -> Result<(), EncodeError> {
    ctx.u8(value.discriminant());
    match value {
        LiteralValue::Null => {}
        LiteralValue::Bool(b) => ctx.bool(*b),
        LiteralValue::Int(i) => ctx.out.write_i64(*i),
        LiteralValue::Double(bits) => ctx.out.write_u64(bits.0),
        LiteralValue::String(s) => ctx.string(s)?,
    }
    Ok(())
}

fn decode_literal(ctx: &mut DecodeContext<'_>) -> Result<LiteralValue, DecodeError> {
    let offset = ctx.position();
    match ctx.u8()? {
        0 => Ok(LiteralValue::Null),
        1 => Ok(LiteralValue::Bool(ctx.bool("bool literal")?)),
        2 => Ok(LiteralValue::Int(ctx.reader.read_i64()?)),
        3 => Ok(LiteralValue::Double(FloatBits(ctx.reader.read_u64()?))),
        4 => Ok(LiteralValue::String(ctx.string()?)),
        other => Err(DecodeError::invalid_value("literal kind", other, offset)),
    }
}

// ============================================================================
// Declarations
// ============================================================================

pub fn encode_declaration(ctx: &mut EncodeContext<'_>, d: &Declaration) -> Result<(), EncodeError> {
    ctx.u8(d.kind.tag());
    encode_meta(ctx, &d.meta)?;
    match &d.kind {
        DeclKind::ProgramUnit(unit) => encode_program_unit(ctx, unit),
        DeclKind::Class(class) => encode_class(ctx, class),
        DeclKind::Function(func) => encode_function(ctx, func),
        DeclKind::Variable(var) => encode_variable(ctx, var),
        DeclKind::Enum(e) => encode_enum(ctx, e),
    }
}

pub fn decode_declaration(ctx: &mut DecodeContext<'_>) -> Result<Declaration, DecodeError> {
    ctx.enter()?;
    let (tag, offset) = ctx.tag(NodeFamily::Declaration)?;
    let meta = decode_meta(ctx)?;
    let kind = decode_decl_fields(ctx, tag, offset)?;
    ctx.leave();
    Ok(Declaration { meta, kind })
}

#[inline(never)]
fn decode_decl_fields(
    ctx: &mut DecodeContext<'_>,
    tag: u8,
    offset: usize,
) -> Result<DeclKind, DecodeError> {
    match tag {
        decl::PROGRAM_UNIT => decode_program_unit(ctx).map(DeclKind::ProgramUnit),
        decl::CLASS => decode_class(ctx).map(DeclKind::Class),
        decl::FUNCTION => decode_function(ctx).map(DeclKind::Function),
        decl::VARIABLE => decode_variable(ctx).map(DeclKind::Variable),
        decl::ENUM => decode_enum(ctx).map(DeclKind::Enum),
        _ => Err(DecodeError::UnknownNodeTag {
            tag,
            family: NodeFamily::Declaration,
            offset,
        }),
    }
}

fn encode_program_unit(ctx: &mut EncodeContext<'_>, unit: &ProgramUnit) -> Result<(), EncodeError> {
    ctx.string(&unit.path)?;
    ctx.seq(&unit.imports, encode_import)?;
    ctx.seq(&unit.declarations, encode_declaration)
}

fn decode_program_unit(ctx: &mut DecodeContext<'_>) -> Result<ProgramUnit, DecodeError> {
    Ok(ProgramUnit {
        path: ctx.string()?,
        imports: ctx.seq(decode_import)?,
        declarations: ctx.seq(decode_declaration)?,
    })
}

fn encode_import(ctx: &mut EncodeContext<'_>, import: &ImportDirective) -> Result<(), EncodeError> {
    ctx.string(&import.uri)?;
    ctx.opt_string(import.prefix.as_deref())?;
    ctx.string_list(&import.show)?;
    ctx.string_list(&import.hide)
}

fn decode_import(ctx: &mut DecodeContext<'_>) -> Result<ImportDirective, DecodeError> {
    Ok(ImportDirective {
        uri: ctx.string()?,
        prefix: ctx.opt_string()?,
        show: ctx.string_list()?,
        hide: ctx.string_list()?,
    })
}

fn encode_class(ctx: &mut EncodeContext<'_>, class: &ClassDecl) -> Result<(), EncodeError> {
    ctx.string(&class.name)?;
    ctx.u8(class.class_kind as u8);
    ctx.string_list(&class.type_params)?;
    ctx.opt(class.superclass.as_ref(), encode_type_ref)?;
    ctx.seq(&class.interfaces, encode_type_ref)?;
    ctx.seq(&class.mixins, encode_type_ref)?;
    ctx.string_list(&class.annotations)?;
    ctx.seq(&class.members, encode_declaration)
}

fn decode_class(ctx: &mut DecodeContext<'_>) -> Result<ClassDecl, DecodeError> {
    Ok(ClassDecl {
        name: ctx.string()?,
        class_kind: ctx.byte_enum("class kind", ClassKind::from_u8)?,
        type_params: ctx.string_list()?,
        superclass: ctx.opt(decode_type_ref)?,
        interfaces: ctx.seq(decode_type_ref)?,
        mixins: ctx.seq(decode_type_ref)?,
        annotations: ctx.string_list()?,
        members: ctx.seq(decode_declaration)?,
    })
}

fn encode_function(ctx: &mut EncodeContext<'_>, func: &FunctionDecl) -> Result<(), EncodeError> {
    ctx.string(&func.name)?;
    ctx.u8(func.function_kind as u8);
    ctx.string_list(&func.type_params)?;
    ctx.seq(&func.params, encode_parameter)?;
    ctx.opt(func.return_type.as_ref(), encode_type_ref)?;
    ctx.opt(func.body.as_deref(), encode_statement)?;
    ctx.u8(func.modifiers.bits());
    Ok(())
}

fn decode_function(ctx: &mut DecodeContext<'_>) -> Result<FunctionDecl, DecodeError> {
    Ok(FunctionDecl {
        name: ctx.string()?,
        function_kind: ctx.byte_enum("function kind", FunctionKind::from_u8)?,
        type_params: ctx.string_list()?,
        params: ctx.seq(decode_parameter)?,
        return_type: ctx.opt(decode_type_ref)?,
        body: ctx.opt(decode_statement)?.map(Box::new),
        modifiers: ctx.byte_enum("function modifiers", FunctionModifiers::from_bits)?,
    })
}

fn encode_parameter(ctx: &mut EncodeContext<'_>, param: &Parameter) -> Result<(), EncodeError> {
    encode_meta(ctx, &param.meta)?;
    ctx.string(&param.name)?;
    ctx.opt(param.declared_type.as_ref(), encode_type_ref)?;
    ctx.u8(param.param_kind as u8);
    ctx.bool(param.required);
    ctx.opt(param.default_value.as_ref(), encode_expression)
}

fn decode_parameter(ctx: &mut DecodeContext<'_>) -> Result<Parameter, DecodeError> {
    Ok(Parameter {
        meta: decode_meta(ctx)?,
        name: ctx.string()?,
        declared_type: ctx.opt(decode_type_ref)?,
        param_kind: ctx.byte_enum("parameter kind", ParamKind::from_u8)?,
        required: ctx.bool("required flag")?,
        default_value: ctx.opt(decode_expression)?,
    })
}

fn encode_variable(ctx: &mut EncodeContext<'_>, var: &VariableDecl) -> Result<(), EncodeError> {
    ctx.string(&var.name)?;
    ctx.opt(var.declared_type.as_ref(), encode_type_ref)?;
    ctx.opt(var.initializer.as_ref(), encode_expression)?;
    ctx.u8(var.mutability as u8);
    ctx.bool(var.is_static);
    ctx.bool(var.is_late);
    Ok(())
}

fn decode_variable(ctx: &mut DecodeContext<'_>) -> Result<VariableDecl, DecodeError> {
    Ok(VariableDecl {
        name: ctx.string()?,
        declared_type: ctx.opt(decode_type_ref)?,
        initializer: ctx.opt(decode_expression)?,
        mutability: ctx.byte_enum("mutability", Mutability::from_u8)?,
        is_static: ctx.bool("static flag")?,
        is_late: ctx.bool("late flag")?,
    })
}

fn encode_enum(ctx: &mut EncodeContext<'_>, e: &EnumDecl) -> Result<(), EncodeError> {
    ctx.string(&e.name)?;
    ctx.seq(&e.constants, |ctx, constant| {
        encode_meta(ctx, &constant.meta)?;
        ctx.string(&constant.name)?;
        ctx.seq(&constant.args, encode_argument)
    })?;
    ctx.seq(&e.members, encode_declaration)
}

fn decode_enum(ctx: &mut DecodeContext<'_>) -> Result<EnumDecl, DecodeError> {
    Ok(EnumDecl {
        name: ctx.string()?,
        constants: ctx.seq(|ctx| {
            Ok(EnumConstant {
                meta: decode_meta(ctx)?,
                name: ctx.string()?,
                args: ctx.seq(decode_argument)?,
            })
        })?,
        members: ctx.seq(decode_declaration)?,
    })
}

// ============================================================================
// Statements
// ============================================================================

pub fn encode_statement(ctx: &mut EncodeContext<'_>, s: &Statement) -> Result<(), EncodeError> {
    ctx.u8(s.kind.tag());
    encode_meta(ctx, &s.meta)?;
    encode_stmt_fields(ctx, &s.kind)
}

// Every arm is a single call so the frame on the nesting path stays small in
// unoptimized builds.
#[inline(never)]
fn encode_stmt_fields(ctx: &mut EncodeContext<'_>, kind: &StmtKind) -> Result<(), EncodeError> {
    match kind {
        StmtKind::Block { statements } => ctx.seq(statements, encode_statement),
        StmtKind::Expression { expr } => encode_expression(ctx, expr),
        StmtKind::LocalVariable(var) => encode_variable(ctx, var),
        StmtKind::LocalFunction(func) => encode_function(ctx, func),
        StmtKind::If {
            condition,
            then_branch,
            else_branch,
        } => encode_if(ctx, condition, then_branch, else_branch.as_deref()),
        StmtKind::For {
            initializer,
            condition,
            updaters,
            body,
        } => encode_for(ctx, initializer.as_deref(), condition.as_ref(), updaters, body),
        StmtKind::ForIn {
            variable,
            variable_type,
            iterable,
            body,
            is_await,
        } => encode_for_in(ctx, variable, variable_type.as_ref(), iterable, body, *is_await),
        StmtKind::While { condition, body } => encode_while(ctx, condition, body),
        StmtKind::DoWhile { body, condition } => encode_do_while(ctx, body, condition),
        StmtKind::Switch { subject, cases } => encode_switch(ctx, subject, cases),
        StmtKind::Try {
            body,
            catches,
            finally,
        } => encode_try(ctx, body, catches, finally.as_deref()),
        StmtKind::Return { value } => ctx.opt(value.as_ref(), encode_expression),
        StmtKind::Break { label } | StmtKind::Continue { label } => {
            ctx.opt_string(label.as_deref())
        }
        StmtKind::Rethrow | StmtKind::Empty => Ok(()),
        StmtKind::Yield { value, is_star } => encode_yield(ctx, value, *is_star),
        StmtKind::Labeled { labels, body } => encode_labeled(ctx, labels, body),
        StmtKind::Assert { condition, message } => encode_assert(ctx, condition, message.as_ref()),
    }
}

#[inline(never)]
fn encode_if(
    ctx: &mut EncodeContext<'_>,
    condition: &Expression,
    then_branch: &Statement,
    else_branch: Option<&Statement>,
) -> Result<(), EncodeError> {
    encode_expression(ctx, condition)?;
    encode_statement(ctx, then_branch)?;
    ctx.opt(else_branch, encode_statement)
}

#[inline(never)]
fn encode_for(
    ctx: &mut EncodeContext<'_>,
    initializer: Option<&Statement>,
    condition: Option<&Expression>,
    updaters: &[Expression],
    body: &Statement,
) -> Result<(), EncodeError> {
    ctx.opt(initializer, encode_statement)?;
    ctx.opt(condition, encode_expression)?;
    ctx.seq(updaters, encode_expression)?;
    encode_statement(ctx, body)
}

#[inline(never)]
fn encode_for_in(
    ctx: &mut EncodeContext<'_>,
    variable: &str,
    variable_type: Option<&TypeRef>,
    iterable: &Expression,
    body: &Statement,
    is_await: bool,
) -> Result<(), EncodeError> {
    ctx.string(variable)?;
    ctx.opt(variable_type, encode_type_ref)?;
    encode_expression(ctx, iterable)?;
    encode_statement(ctx, body)?;
    ctx.bool(is_await);
    Ok(())
}

#[inline(never)]
fn encode_while(
    ctx: &mut EncodeContext<'_>,
    condition: &Expression,
    body: &Statement,
) -> Result<(), EncodeError> {
    encode_expression(ctx, condition)?;
    encode_statement(ctx, body)
}

#[inline(never)]
fn encode_do_while(
    ctx: &mut EncodeContext<'_>,
    body: &Statement,
    condition: &Expression,
) -> Result<(), EncodeError> {
    encode_statement(ctx, body)?;
    encode_expression(ctx, condition)
}

#[inline(never)]
fn encode_switch(
    ctx: &mut EncodeContext<'_>,
    subject: &Expression,
    cases: &[SwitchCase],
) -> Result<(), EncodeError> {
    encode_expression(ctx, subject)?;
    ctx.seq(cases, encode_switch_case)
}

#[inline(never)]
fn encode_try(
    ctx: &mut EncodeContext<'_>,
    body: &Statement,
    catches: &[CatchClause],
    finally: Option<&Statement>,
) -> Result<(), EncodeError> {
    encode_statement(ctx, body)?;
    ctx.seq(catches, encode_catch_clause)?;
    ctx.opt(finally, encode_statement)
}

#[inline(never)]
fn encode_yield(ctx: &mut EncodeContext<'_>, value: &Expression, is_star: bool) -> Result<(), EncodeError> {
    encode_expression(ctx, value)?;
    ctx.bool(is_star);
    Ok(())
}

#[inline(never)]
fn encode_labeled(ctx: &mut EncodeContext<'_>, labels: &[String], body: &Statement) -> Result<(), EncodeError> {
    ctx.string_list(labels)?;
    encode_statement(ctx, body)
}

#[inline(never)]
fn encode_assert(
    ctx: &mut EncodeContext<'_>,
    condition: &Expression,
    message: Option<&Expression>,
) -> Result<(), EncodeError> {
    encode_expression(ctx, condition)?;
    ctx.opt(message, encode_expression)
}

fn boxed_statement(ctx: &mut DecodeContext<'_>) -> Result<Box<Statement>, DecodeError> {
    decode_statement(ctx).map(Box::new)
}

pub fn decode_statement(ctx: &mut DecodeContext<'_>) -> Result<Statement, DecodeError> {
    ctx.enter()?;
    let (tag, offset) = ctx.tag(NodeFamily::Statement)?;
    let meta = decode_meta(ctx)?;
    let kind = decode_stmt_fields(ctx, tag, offset)?;
    ctx.leave();
    Ok(Statement { meta, kind })
}

#[inline(never)]
fn decode_stmt_fields(
    ctx: &mut DecodeContext<'_>,
    tag: u8,
    offset: usize,
) -> Result<StmtKind, DecodeError> {
    match tag {
        stmt::BLOCK => ctx
            .seq(decode_statement)
            .map(|statements| StmtKind::Block { statements }),
        stmt::EXPRESSION => decode_expression(ctx).map(|expr| StmtKind::Expression { expr }),
        stmt::LOCAL_VARIABLE => decode_variable(ctx).map(StmtKind::LocalVariable),
        stmt::LOCAL_FUNCTION => decode_function(ctx).map(StmtKind::LocalFunction),
        stmt::IF => decode_if(ctx),
        stmt::FOR => decode_for(ctx),
        stmt::FOR_IN => decode_for_in(ctx),
        stmt::WHILE => decode_while(ctx),
        stmt::DO_WHILE => decode_do_while(ctx),
        stmt::SWITCH => decode_switch(ctx),
        stmt::TRY => decode_try(ctx),
        stmt::RETURN => ctx
            .opt(decode_expression)
            .map(|value| StmtKind::Return { value }),
        stmt::BREAK => ctx.opt_string().map(|label| StmtKind::Break { label }),
        stmt::CONTINUE => ctx.opt_string().map(|label| StmtKind::Continue { label }),
        stmt::RETHROW => Ok(StmtKind::Rethrow),
        stmt::YIELD => decode_yield(ctx),
        stmt::LABELED => decode_labeled(ctx),
        stmt::ASSERT => decode_assert(ctx),
        stmt::EMPTY => Ok(StmtKind::Empty),
        _ => Err(DecodeError::UnknownNodeTag {
            tag,
            family: NodeFamily::Statement,
            offset,
        }),
    }
}

#[inline(never)]
fn decode_if(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::If {
        condition: decode_expression(ctx)?,
        then_branch: boxed_statement(ctx)?,
        else_branch: ctx.opt(boxed_statement)?,
    })
}

#[inline(never)]
fn decode_for(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::For {
        initializer: ctx.opt(boxed_statement)?,
        condition: ctx.opt(decode_expression)?,
        updaters: ctx.seq(decode_expression)?,
        body: boxed_statement(ctx)?,
    })
}

#[inline(never)]
fn decode_for_in(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::ForIn {
        variable: ctx.string()?,
        variable_type: ctx.opt(decode_type_ref)?,
        iterable: decode_expression(ctx)?,
        body: boxed_statement(ctx)?,
        is_await: ctx.bool("await flag")?,
    })
}

#[inline(never)]
fn decode_while(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::While {
        condition: decode_expression(ctx)?,
        body: boxed_statement(ctx)?,
    })
}

#[inline(never)]
fn decode_do_while(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::DoWhile {
        body: boxed_statement(ctx)?,
        condition: decode_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_switch(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::Switch {
        subject: decode_expression(ctx)?,
        cases: ctx.seq(decode_switch_case)?,
    })
}

#[inline(never)]
fn decode_try(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::Try {
        body: boxed_statement(ctx)?,
        catches: ctx.seq(decode_catch_clause)?,
        finally: ctx.opt(boxed_statement)?,
    })
}

#[inline(never)]
fn decode_yield(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::Yield {
        value: decode_expression(ctx)?,
        is_star: ctx.bool("yield* flag")?,
    })
}

#[inline(never)]
fn decode_labeled(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::Labeled {
        labels: ctx.string_list()?,
        body: boxed_statement(ctx)?,
    })
}

#[inline(never)]
fn decode_assert(ctx: &mut DecodeContext<'_>) -> Result<StmtKind, DecodeError> {
    Ok(StmtKind::Assert {
        condition: decode_expression(ctx)?,
        message: ctx.opt(decode_expression)?,
    })
}

fn encode_switch_case(ctx: &mut EncodeContext<'_>, case: &SwitchCase) -> Result<(), EncodeError> {
    encode_meta(ctx, &case.meta)?;
    ctx.seq(&case.patterns, encode_expression)?;
    ctx.opt(case.guard.as_ref(), encode_expression)?;
    ctx.seq(&case.body, encode_statement)
}

fn decode_switch_case(ctx: &mut DecodeContext<'_>) -> Result<SwitchCase, DecodeError> {
    Ok(SwitchCase {
        meta: decode_meta(ctx)?,
        patterns: ctx.seq(decode_expression)?,
        guard: ctx.opt(decode_expression)?,
        body: ctx.seq(decode_statement)?,
    })
}

fn encode_catch_clause(ctx: &mut EncodeContext<'_>, clause: &CatchClause) -> Result<(), EncodeError> {
    encode_meta(ctx, &clause.meta)?;
    ctx.opt(clause.exception_type.as_ref(), encode_type_ref)?;
    ctx.opt_string(clause.exception_var.as_deref())?;
    ctx.opt_string(clause.stack_trace_var.as_deref())?;
    encode_statement(ctx, &clause.body)
}

fn decode_catch_clause(ctx: &mut DecodeContext<'_>) -> Result<CatchClause, DecodeError> {
    Ok(CatchClause {
        meta: decode_meta(ctx)?,
        exception_type: ctx.opt(decode_type_ref)?,
        exception_var: ctx.opt_string()?,
        stack_trace_var: ctx.opt_string()?,
        body: decode_statement(ctx)?,
    })
}

// ============================================================================
// Expressions
// ============================================================================

pub fn encode_expression(ctx: &mut EncodeContext<'_>, e: &Expression) -> Result<(), EncodeError> {
    ctx.u8(e.kind.tag());
    ctx.string(&e.meta.id)?;
    ctx.opt(e.result_type.as_ref(), encode_type_ref)?;
    encode_meta_tail(ctx, &e.meta)?;
    encode_expr_fields(ctx, &e.kind)
}

// Every arm is a single call so the frame on the nesting path stays small in
// unoptimized builds.
#[inline(never)]
fn encode_expr_fields(ctx: &mut EncodeContext<'_>, kind: &ExprKind) -> Result<(), EncodeError> {
    match kind {
        ExprKind::Literal { value } => encode_literal(ctx, value),
        ExprKind::StringInterpolation { parts } => ctx.seq(parts, encode_expression),
        ExprKind::Identifier { name } => ctx.string(name),
        ExprKind::This | ExprKind::Super => Ok(()),
        ExprKind::Binary { op, left, right } => encode_op_pair(ctx, *op as u8, left, right),
        ExprKind::Unary { op, operand } => encode_op_operand(ctx, *op as u8, operand),
        ExprKind::Postfix { op, operand } => encode_op_operand(ctx, *op as u8, operand),
        ExprKind::Call { callee, args } => encode_call(ctx, callee, args),
        ExprKind::MethodCall {
            target,
            method,
            type_args,
            args,
            null_aware,
        } => encode_method_call(ctx, target.as_deref(), method, type_args, args, *null_aware),
        ExprKind::ConstructorCall {
            constructed_type,
            constructor,
            args,
            is_const,
        } => encode_constructor_call(ctx, constructed_type, constructor.as_deref(), args, *is_const),
        ExprKind::PropertyAccess {
            target,
            property,
            null_aware,
        } => encode_property_access(ctx, target, property, *null_aware),
        ExprKind::Index { target, index } => encode_pair(ctx, target, index),
        ExprKind::ListLiteral {
            element_type,
            elements,
            is_const,
        }
        | ExprKind::SetLiteral {
            element_type,
            elements,
            is_const,
        } => encode_collection(ctx, element_type.as_ref(), elements, *is_const),
        ExprKind::MapLiteral {
            key_type,
            value_type,
            entries,
            is_const,
        } => encode_map_literal(ctx, key_type.as_ref(), value_type.as_ref(), entries, *is_const),
        ExprKind::RecordLiteral { fields } => ctx.seq(fields, encode_argument),
        ExprKind::Spread {
            operand,
            null_aware,
        } => encode_flagged(ctx, operand, *null_aware),
        ExprKind::CollectionIf {
            condition,
            then_element,
            else_element,
        } => encode_collection_if(ctx, condition, then_element, else_element.as_deref()),
        ExprKind::CollectionFor {
            variable,
            iterable,
            element,
        } => encode_collection_for(ctx, variable, iterable, element),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => encode_conditional(ctx, condition, then_expr, else_expr),
        ExprKind::Lambda {
            params,
            body,
            is_async,
        } => encode_lambda(ctx, params, body, *is_async),
        ExprKind::Await { operand } | ExprKind::NullAssert { operand } => {
            encode_expression(ctx, operand)
        }
        ExprKind::Throw { exception } => encode_expression(ctx, exception),
        ExprKind::Cascade { target, sections } => encode_cascade(ctx, target, sections),
        ExprKind::Cast {
            operand,
            target_type,
        } => encode_cast(ctx, operand, target_type),
        ExprKind::TypeCheck {
            operand,
            target_type,
            negated,
        } => encode_type_check(ctx, operand, target_type, *negated),
        ExprKind::TypeLiteral { literal_type } => encode_type_ref(ctx, literal_type),
        ExprKind::Assignment { target, value } => encode_pair(ctx, target, value),
        ExprKind::CompoundAssignment { op, target, value } => {
            encode_op_pair(ctx, *op as u8, target, value)
        }
        ExprKind::Parenthesized { inner } => encode_expression(ctx, inner),
    }
}

#[inline(never)]
fn encode_pair(ctx: &mut EncodeContext<'_>, a: &Expression, b: &Expression) -> Result<(), EncodeError> {
    encode_expression(ctx, a)?;
    encode_expression(ctx, b)
}

#[inline(never)]
fn encode_op_pair(
    ctx: &mut EncodeContext<'_>,
    op: u8,
    a: &Expression,
    b: &Expression,
) -> Result<(), EncodeError> {
    ctx.u8(op);
    encode_pair(ctx, a, b)
}

#[inline(never)]
fn encode_op_operand(ctx: &mut EncodeContext<'_>, op: u8, operand: &Expression) -> Result<(), EncodeError> {
    ctx.u8(op);
    encode_expression(ctx, operand)
}

#[inline(never)]
fn encode_flagged(ctx: &mut EncodeContext<'_>, operand: &Expression, flag: bool) -> Result<(), EncodeError> {
    encode_expression(ctx, operand)?;
    ctx.bool(flag);
    Ok(())
}

#[inline(never)]
fn encode_call(ctx: &mut EncodeContext<'_>, callee: &Expression, args: &[Argument]) -> Result<(), EncodeError> {
    encode_expression(ctx, callee)?;
    ctx.seq(args, encode_argument)
}

#[inline(never)]
fn encode_method_call(
    ctx: &mut EncodeContext<'_>,
    target: Option<&Expression>,
    method: &str,
    type_args: &[TypeRef],
    args: &[Argument],
    null_aware: bool,
) -> Result<(), EncodeError> {
    ctx.opt(target, encode_expression)?;
    ctx.string(method)?;
    ctx.seq(type_args, encode_type_ref)?;
    ctx.seq(args, encode_argument)?;
    ctx.bool(null_aware);
    Ok(())
}

#[inline(never)]
fn encode_constructor_call(
    ctx: &mut EncodeContext<'_>,
    constructed_type: &TypeRef,
    constructor: Option<&str>,
    args: &[Argument],
    is_const: bool,
) -> Result<(), EncodeError> {
    encode_type_ref(ctx, constructed_type)?;
    ctx.opt_string(constructor)?;
    ctx.seq(args, encode_argument)?;
    ctx.bool(is_const);
    Ok(())
}

#[inline(never)]
fn encode_property_access(
    ctx: &mut EncodeContext<'_>,
    target: &Expression,
    property: &str,
    null_aware: bool,
) -> Result<(), EncodeError> {
    encode_expression(ctx, target)?;
    ctx.string(property)?;
    ctx.bool(null_aware);
    Ok(())
}

#[inline(never)]
fn encode_collection(
    ctx: &mut EncodeContext<'_>,
    element_type: Option<&TypeRef>,
    elements: &[Expression],
    is_const: bool,
) -> Result<(), EncodeError> {
    ctx.opt(element_type, encode_type_ref)?;
    ctx.seq(elements, encode_expression)?;
    ctx.bool(is_const);
    Ok(())
}

#[inline(never)]
fn encode_map_literal(
    ctx: &mut EncodeContext<'_>,
    key_type: Option<&TypeRef>,
    value_type: Option<&TypeRef>,
    entries: &[MapEntry],
    is_const: bool,
) -> Result<(), EncodeError> {
    ctx.opt(key_type, encode_type_ref)?;
    ctx.opt(value_type, encode_type_ref)?;
    ctx.seq(entries, |ctx, entry| encode_pair(ctx, &entry.key, &entry.value))?;
    ctx.bool(is_const);
    Ok(())
}

#[inline(never)]
fn encode_collection_if(
    ctx: &mut EncodeContext<'_>,
    condition: &Expression,
    then_element: &Expression,
    else_element: Option<&Expression>,
) -> Result<(), EncodeError> {
    encode_pair(ctx, condition, then_element)?;
    ctx.opt(else_element, encode_expression)
}

#[inline(never)]
fn encode_collection_for(
    ctx: &mut EncodeContext<'_>,
    variable: &str,
    iterable: &Expression,
    element: &Expression,
) -> Result<(), EncodeError> {
    ctx.string(variable)?;
    encode_pair(ctx, iterable, element)
}

#[inline(never)]
fn encode_conditional(
    ctx: &mut EncodeContext<'_>,
    condition: &Expression,
    then_expr: &Expression,
    else_expr: &Expression,
) -> Result<(), EncodeError> {
    encode_pair(ctx, condition, then_expr)?;
    encode_expression(ctx, else_expr)
}

#[inline(never)]
fn encode_lambda(
    ctx: &mut EncodeContext<'_>,
    params: &[Parameter],
    body: &LambdaBody,
    is_async: bool,
) -> Result<(), EncodeError> {
    ctx.seq(params, encode_parameter)?;
    ctx.u8(body.discriminant());
    match body {
        LambdaBody::Expression(e) => encode_expression(ctx, e)?,
        LambdaBody::Block(s) => encode_statement(ctx, s)?,
    }
    ctx.bool(is_async);
    Ok(())
}

#[inline(never)]
fn encode_cascade(
    ctx: &mut EncodeContext<'_>,
    target: &Expression,
    sections: &[Expression],
) -> Result<(), EncodeError> {
    encode_expression(ctx, target)?;
    ctx.seq(sections, encode_expression)
}

#[inline(never)]
fn encode_cast(ctx: &mut EncodeContext<'_>, operand: &Expression, target_type: &TypeRef) -> Result<(), EncodeError> {
    encode_expression(ctx, operand)?;
    encode_type_ref(ctx, target_type)
}

#[inline(never)]
fn encode_type_check(
    ctx: &mut EncodeContext<'_>,
    operand: &Expression,
    target_type: &TypeRef,
    negated: bool,
) -> Result<(), EncodeError> {
    encode_cast(ctx, operand, target_type)?;
    ctx.bool(negated);
    Ok(())
}

fn boxed_expression(ctx: &mut DecodeContext<'_>) -> Result<Box<Expression>, DecodeError> {
    decode_expression(ctx).map(Box::new)
}

pub fn decode_expression(ctx: &mut DecodeContext<'_>) -> Result<Expression, DecodeError> {
    ctx.enter()?;
    let (tag, offset) = ctx.tag(NodeFamily::Expression)?;
    let id = ctx.string()?;
    let result_type = ctx.opt(decode_type_ref)?;
    let meta = decode_meta_tail(ctx, id)?;
    let kind = decode_expr_fields(ctx, tag, offset)?;
    ctx.leave();
    Ok(Expression {
        meta,
        result_type,
        kind,
    })
}

#[inline(never)]
fn decode_expr_fields(
    ctx: &mut DecodeContext<'_>,
    tag: u8,
    offset: usize,
) -> Result<ExprKind, DecodeError> {
    match tag {
        expr::LITERAL => decode_literal(ctx).map(|value| ExprKind::Literal { value }),
        expr::STRING_INTERPOLATION => ctx
            .seq(decode_expression)
            .map(|parts| ExprKind::StringInterpolation { parts }),
        expr::IDENTIFIER => ctx.string().map(|name| ExprKind::Identifier { name }),
        expr::THIS => Ok(ExprKind::This),
        expr::SUPER => Ok(ExprKind::Super),
        expr::BINARY => decode_binary(ctx),
        expr::UNARY => decode_unary(ctx),
        expr::POSTFIX => decode_postfix(ctx),
        expr::CALL => decode_call(ctx),
        expr::METHOD_CALL => decode_method_call(ctx),
        expr::CONSTRUCTOR_CALL => decode_constructor_call(ctx),
        expr::PROPERTY_ACCESS => decode_property_access(ctx),
        expr::INDEX => decode_index(ctx),
        expr::LIST_LITERAL => decode_list_literal(ctx),
        expr::SET_LITERAL => decode_set_literal(ctx),
        expr::MAP_LITERAL => decode_map_literal(ctx),
        expr::RECORD_LITERAL => ctx
            .seq(decode_argument)
            .map(|fields| ExprKind::RecordLiteral { fields }),
        expr::SPREAD => decode_spread(ctx),
        expr::COLLECTION_IF => decode_collection_if(ctx),
        expr::COLLECTION_FOR => decode_collection_for(ctx),
        expr::CONDITIONAL => decode_conditional(ctx),
        expr::LAMBDA => decode_lambda(ctx),
        expr::AWAIT => boxed_expression(ctx).map(|operand| ExprKind::Await { operand }),
        expr::THROW => boxed_expression(ctx).map(|exception| ExprKind::Throw { exception }),
        expr::CASCADE => decode_cascade(ctx),
        expr::CAST => decode_cast(ctx),
        expr::TYPE_CHECK => decode_type_check(ctx),
        expr::TYPE_LITERAL => {
            decode_type_ref(ctx).map(|literal_type| ExprKind::TypeLiteral { literal_type })
        }
        expr::ASSIGNMENT => decode_assignment(ctx),
        expr::COMPOUND_ASSIGNMENT => decode_compound_assignment(ctx),
        expr::NULL_ASSERT => boxed_expression(ctx).map(|operand| ExprKind::NullAssert { operand }),
        expr::PARENTHESIZED => boxed_expression(ctx).map(|inner| ExprKind::Parenthesized { inner }),
        _ => Err(DecodeError::UnknownNodeTag {
            tag,
            family: NodeFamily::Expression,
            offset,
        }),
    }
}

#[inline(never)]
fn decode_binary(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Binary {
        op: ctx.byte_enum("binary operator", BinaryOp::from_u8)?,
        left: boxed_expression(ctx)?,
        right: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_unary(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Unary {
        op: ctx.byte_enum("unary operator", UnaryOp::from_u8)?,
        operand: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_postfix(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Postfix {
        op: ctx.byte_enum("postfix operator", PostfixOp::from_u8)?,
        operand: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_call(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Call {
        callee: boxed_expression(ctx)?,
        args: ctx.seq(decode_argument)?,
    })
}

#[inline(never)]
fn decode_method_call(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::MethodCall {
        target: ctx.opt(boxed_expression)?,
        method: ctx.string()?,
        type_args: ctx.seq(decode_type_ref)?,
        args: ctx.seq(decode_argument)?,
        null_aware: ctx.bool("null-aware flag")?,
    })
}

#[inline(never)]
fn decode_constructor_call(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::ConstructorCall {
        constructed_type: decode_type_ref(ctx)?,
        constructor: ctx.opt_string()?,
        args: ctx.seq(decode_argument)?,
        is_const: ctx.bool("const flag")?,
    })
}

#[inline(never)]
fn decode_property_access(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::PropertyAccess {
        target: boxed_expression(ctx)?,
        property: ctx.string()?,
        null_aware: ctx.bool("null-aware flag")?,
    })
}

#[inline(never)]
fn decode_index(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Index {
        target: boxed_expression(ctx)?,
        index: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_list_literal(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::ListLiteral {
        element_type: ctx.opt(decode_type_ref)?,
        elements: ctx.seq(decode_expression)?,
        is_const: ctx.bool("const flag")?,
    })
}

#[inline(never)]
fn decode_set_literal(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::SetLiteral {
        element_type: ctx.opt(decode_type_ref)?,
        elements: ctx.seq(decode_expression)?,
        is_const: ctx.bool("const flag")?,
    })
}

fn decode_map_entry(ctx: &mut DecodeContext<'_>) -> Result<MapEntry, DecodeError> {
    Ok(MapEntry {
        key: decode_expression(ctx)?,
        value: decode_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_map_literal(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::MapLiteral {
        key_type: ctx.opt(decode_type_ref)?,
        value_type: ctx.opt(decode_type_ref)?,
        entries: ctx.seq(decode_map_entry)?,
        is_const: ctx.bool("const flag")?,
    })
}

#[inline(never)]
fn decode_spread(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Spread {
        operand: boxed_expression(ctx)?,
        null_aware: ctx.bool("null-aware flag")?,
    })
}

#[inline(never)]
fn decode_collection_if(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::CollectionIf {
        condition: boxed_expression(ctx)?,
        then_element: boxed_expression(ctx)?,
        else_element: ctx.opt(boxed_expression)?,
    })
}

#[inline(never)]
fn decode_collection_for(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::CollectionFor {
        variable: ctx.string()?,
        iterable: boxed_expression(ctx)?,
        element: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_conditional(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Conditional {
        condition: boxed_expression(ctx)?,
        then_expr: boxed_expression(ctx)?,
        else_expr: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_lambda(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    let params = ctx.seq(decode_parameter)?;
    let body_offset = ctx.position();
    let body = match ctx.u8()? {
        0 => LambdaBody::Expression(boxed_expression(ctx)?),
        1 => LambdaBody::Block(boxed_statement(ctx)?),
        other => return Err(DecodeError::invalid_value("lambda body", other, body_offset)),
    };
    Ok(ExprKind::Lambda {
        params,
        body,
        is_async: ctx.bool("async flag")?,
    })
}

#[inline(never)]
fn decode_cascade(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Cascade {
        target: boxed_expression(ctx)?,
        sections: ctx.seq(decode_expression)?,
    })
}

#[inline(never)]
fn decode_cast(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Cast {
        operand: boxed_expression(ctx)?,
        target_type: decode_type_ref(ctx)?,
    })
}

#[inline(never)]
fn decode_type_check(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::TypeCheck {
        operand: boxed_expression(ctx)?,
        target_type: decode_type_ref(ctx)?,
        negated: ctx.bool("negated flag")?,
    })
}

#[inline(never)]
fn decode_assignment(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::Assignment {
        target: boxed_expression(ctx)?,
        value: boxed_expression(ctx)?,
    })
}

#[inline(never)]
fn decode_compound_assignment(ctx: &mut DecodeContext<'_>) -> Result<ExprKind, DecodeError> {
    Ok(ExprKind::CompoundAssignment {
        op: ctx.byte_enum("binary operator", BinaryOp::from_u8)?,
        target: boxed_expression(ctx)?,
        value: boxed_expression(ctx)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Visitor;

    /// Encode a single expression against its own string table
    fn encode_expr_bytes(e: &Expression, debug_info: bool) -> (Vec<u8>, StringInterner) {
        let mut interner = StringInterner::new();
        struct Collect<'a>(&'a mut StringInterner);
        impl Visitor for Collect<'_> {
            fn visit_str(&mut self, _role: crate::ir::StrRole, value: &str) {
                self.0.intern(value).unwrap();
            }
        }
        Collect(&mut interner).visit_expression(e);
        let mut out = ByteWriter::new();
        encode_expression(&mut EncodeContext::new(&mut out, &interner, debug_info), e).unwrap();
        (out.into_inner(), interner)
    }

    fn table_of(interner: &StringInterner) -> StringTable {
        let mut out = ByteWriter::new();
        interner.encode(&mut out).unwrap();
        let bytes = out.into_inner();
        StringTable::decode(&mut ByteReader::new(&bytes)).unwrap()
    }

    fn ident(id: &str, name: &str) -> Expression {
        Expression::new(
            NodeMeta::synthetic(id),
            ExprKind::Identifier {
                name: name.to_string(),
            },
        )
    }

    #[test]
    fn test_expression_prefix_layout() {
        let e = ident("e1", "x");
        let (bytes, _) = encode_expr_bytes(&e, false);
        // tag, id ref, no result type, synthetic, name ref
        assert_eq!(
            bytes,
            vec![expr::IDENTIFIER, 0, 0, 0, 0, 0, 1, 1, 0, 0, 0]
        );
    }

    #[test]
    fn test_location_written_only_with_debug_info() {
        let e = Expression::new(
            NodeMeta::at("e1", SourceLocation::new("a.dart", 1, 2, 3, 4)),
            ExprKind::This,
        );
        let (without, _) = encode_expr_bytes(&e, false);
        let (with, interner) = encode_expr_bytes(&e, true);
        assert_eq!(with.len(), without.len() + 1 + SourceLocation::ENCODED_SIZE);

        let table = table_of(&interner);
        let mut ctx = DecodeContext::new(ByteReader::new(&with), &table, true, 64);
        assert_eq!(decode_expression(&mut ctx).unwrap(), e);
    }

    #[test]
    fn test_wrong_family_tag() {
        let s = Statement::new(NodeMeta::synthetic("s1"), StmtKind::Empty);
        let mut interner = StringInterner::new();
        interner.intern("s1").unwrap();
        let mut out = ByteWriter::new();
        encode_statement(&mut EncodeContext::new(&mut out, &interner, false), &s).unwrap();
        let bytes = out.into_inner();

        let table = table_of(&interner);
        let mut ctx = DecodeContext::new(ByteReader::new(&bytes), &table, false, 64);
        match decode_expression(&mut ctx) {
            Err(DecodeError::UnknownNodeTag { tag, family, offset }) => {
                assert_eq!(tag, stmt::EMPTY);
                assert_eq!(family, NodeFamily::Expression);
                assert_eq!(offset, 0);
            }
            other => panic!("expected UnknownNodeTag, got {other:?}"),
        }
    }

    #[test]
    fn test_unassigned_tag_in_range() {
        let (mut bytes, interner) = encode_expr_bytes(&ident("e1", "x"), false);
        bytes[0] = 0x7E;
        let table = table_of(&interner);
        let mut ctx = DecodeContext::new(ByteReader::new(&bytes), &table, false, 64);
        assert!(matches!(
            decode_expression(&mut ctx),
            Err(DecodeError::UnknownNodeTag { tag: 0x7E, family: NodeFamily::Expression, .. })
        ));
    }

    #[test]
    fn test_invalid_presence_byte() {
        let (mut bytes, interner) = encode_expr_bytes(&ident("e1", "x"), false);
        // result_type presence byte follows tag and id
        bytes[5] = 2;
        let table = table_of(&interner);
        let mut ctx = DecodeContext::new(ByteReader::new(&bytes), &table, false, 64);
        assert!(matches!(
            decode_expression(&mut ctx),
            Err(DecodeError::InvalidValue { value: 2, offset: 5, .. })
        ));
    }

    #[test]
    fn test_invalid_operator_byte() {
        let e = Expression::new(
            NodeMeta::synthetic("e0"),
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand: ident("e1", "x").boxed(),
            },
        );
        let (mut bytes, interner) = encode_expr_bytes(&e, false);
        // op byte follows the 7-byte prefix
        bytes[7] = 0xEE;
        let table = table_of(&interner);
        let mut ctx = DecodeContext::new(ByteReader::new(&bytes), &table, false, 64);
        assert!(matches!(
            decode_expression(&mut ctx),
            Err(DecodeError::InvalidValue { what: "unary operator", value: 0xEE, offset: 7 })
        ));
    }

    #[test]
    fn test_depth_limit() {
        let mut e = ident("leaf", "x");
        for i in 0..10 {
            e = Expression::new(
                NodeMeta::synthetic(format!("p{i}")),
                ExprKind::Parenthesized { inner: e.boxed() },
            );
        }
        let (bytes, interner) = encode_expr_bytes(&e, false);
        let table = table_of(&interner);

        let mut ctx = DecodeContext::new(ByteReader::new(&bytes), &table, false, 11);
        assert_eq!(decode_expression(&mut ctx).unwrap(), e);

        let mut ctx = DecodeContext::new(ByteReader::new(&bytes), &table, false, 10);
        assert!(matches!(
            decode_expression(&mut ctx),
            Err(DecodeError::DepthLimitExceeded { limit: 10, .. })
        ));
    }

    #[test]
    fn test_uninterned_string() {
        let interner = StringInterner::new();
        let mut out = ByteWriter::new();
        let err = encode_expression(
            &mut EncodeContext::new(&mut out, &interner, false),
            &ident("e1", "x"),
        )
        .unwrap_err();
        assert!(matches!(err, EncodeError::Uninterned(s) if s == "e1"));
    }
}

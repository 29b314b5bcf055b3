use ordered_float::NotNan;
use tracing::debug;

use crate::{
    analyzer::AffinityResolver,
    ast::{decode_blob, dequote, Expr, ExprKind, ExprList, LiteralKind, RaiseAction, UnaryOp},
    codegen::{CodegenContext, CodegenError, Opcode, SubqueryCoder, P4},
};

/// Result code `Halt` reports for a `RAISE` other than IGNORE.
const CONSTRAINT_VIOLATION: i32 = 19;

/// Lowers a resolved expression tree to instructions that leave exactly one
/// value on the stack.
pub struct ExprCoder;

impl ExprCoder {
    pub fn code_expr(expr: &mut Expr, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        match expr.kind {
            ExprKind::In { .. } | ExprKind::Exists { .. } | ExprKind::Subquery { .. } => {
                Self::code_subquery_value(expr, ctx)
            }
            _ => Self::code_node(expr, ctx),
        }
    }

    /// Codes every item left to right and returns how many values were pushed.
    pub fn code_expr_list(list: &mut ExprList, ctx: &mut CodegenContext) -> Result<usize, CodegenError> {
        for expr in list.iter_mut() {
            Self::code_expr(expr, ctx)?;
        }
        Ok(list.len())
    }

    /// Codes `expr` and, when that took more than one instruction or a
    /// function call, stores the value in a fresh memory cell and turns the
    /// node into a [`ExprKind::Register`] read of that cell.
    pub fn code_and_cache(expr: &mut Expr, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        let start = ctx.program.current_addr();
        Self::code_expr(expr, ctx)?;
        let end = ctx.program.current_addr();
        let is_call = ctx.program.op(start).is_some_and(|op| op.opcode == Opcode::Function);
        if end > start + 1 || is_call {
            let slot = ctx.alloc_mem();
            ctx.program.add_op(Opcode::MemStore, slot as i32, 0);
            debug!(slot, instructions = end - start, "cached expression value");
            expr.kind = ExprKind::Register { slot };
        }
        Ok(())
    }

    /// Emits a comparison of the two values on top of the stack and returns
    /// its address. `p2` is the jump target, 0 to push the result instead.
    pub(crate) fn code_compare(
        left: &Expr,
        right: &Expr,
        opcode: Opcode,
        p2: i32,
        jump_if_null: bool,
        ctx: &mut CodegenContext,
    ) -> Result<usize, CodegenError> {
        let affinity = AffinityResolver::compare_affinity(left, AffinityResolver::affinity(right));
        let coll = AffinityResolver::binary_compare_collation(left, right, ctx.schema)?;
        Ok(ctx.program.add_op4(opcode, jump_if_null as i32, p2, P4::Compare { affinity, coll }))
    }

    fn code_node(expr: &mut Expr, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        let Expr { kind, token, agg, .. } = expr;
        let text = token.as_deref().unwrap_or_default();
        match kind {
            ExprKind::Column(col) => {
                match agg {
                    Some(slot) if !ctx.fill_agg => {
                        ctx.program.add_op(Opcode::AggGet, slot.depth as i32, slot.index as i32)
                    }
                    _ if col.is_rowid() => ctx.program.add_op(Opcode::Rowid, col.cursor, 0),
                    _ => ctx.program.add_op(Opcode::Column, col.cursor, col.column),
                };
            }
            ExprKind::Literal(LiteralKind::Integer) => Self::code_integer(text, ctx)?,
            ExprKind::Literal(LiteralKind::Float) => Self::code_real(text, ctx)?,
            ExprKind::Literal(LiteralKind::String) => {
                ctx.program.add_op4(Opcode::String8, 0, 0, P4::Text(dequote(text)));
            }
            ExprKind::Literal(LiteralKind::Blob) => {
                let bytes = decode_blob(text).ok_or_else(|| CodegenError::MalformedLiteral(text.to_string()))?;
                ctx.program.add_op4(Opcode::HexBlob, 0, 0, P4::Blob(bytes));
            }
            ExprKind::Literal(LiteralKind::Null) => {
                ctx.program.add_op(Opcode::Null, 0, 0);
            }
            ExprKind::Variable { slot } => {
                let p4 = if text.len() > 1 { P4::Text(text.to_string()) } else { P4::None };
                ctx.program.add_op4(Opcode::Variable, *slot as i32, 0, p4);
            }
            ExprKind::Register { slot } => {
                ctx.program.add_op(Opcode::MemLoad, *slot as i32, 0);
            }
            ExprKind::Alias { expr: inner, .. } => Self::code_expr(inner, ctx)?,
            ExprKind::Binary { op, left, right } => {
                let opcode = Opcode::for_binary(*op);
                Self::code_expr(left, ctx)?;
                Self::code_expr(right, ctx)?;
                if opcode.is_comparison() {
                    Self::code_compare(left, right, opcode, 0, false, ctx)?;
                } else {
                    ctx.program.add_op(opcode, 0, 0);
                }
            }
            ExprKind::Unary { op, operand } => Self::code_unary(*op, operand, ctx)?,
            ExprKind::Function { aggregate: true, .. } => {
                let slot = agg.ok_or_else(|| CodegenError::UnclassifiedAggregate(text.to_string()))?;
                ctx.program.add_op(Opcode::AggGet, 0, slot.index as i32);
            }
            ExprKind::Function { args, def, .. } => {
                let n_arg = args.len() as i32;
                let def = match def {
                    Some(id) => *id,
                    None => ctx
                        .functions
                        .lookup(text, n_arg, ctx.config.encoding)
                        .ok_or_else(|| CodegenError::UnknownFunction(text.to_string()))?,
                };
                let needs_coll = ctx.functions.get(def).is_some_and(|d| d.needs_coll_seq);

                let n_expr = Self::code_expr_list(args, ctx)?;
                let mut constant_mask: u32 = 0;
                let mut coll = None;
                for (i, arg) in args.iter().enumerate().take(32) {
                    if arg.is_constant() {
                        constant_mask |= 1 << i;
                    }
                    if needs_coll && coll.is_none() {
                        coll = AffinityResolver::expr_collation(arg, ctx.schema)?;
                    }
                }
                if needs_coll {
                    let coll = coll.unwrap_or(ctx.schema.default_collation());
                    ctx.program.add_op4(Opcode::CollSeq, 0, 0, P4::CollSeq(coll));
                }
                ctx.program.add_op4(Opcode::Function, n_expr as i32, constant_mask as i32, P4::FuncDef(def));
            }
            ExprKind::Between { operand, bounds } => {
                let [low, high] = &mut **bounds;
                Self::code_expr(operand, ctx)?;
                ctx.program.add_op(Opcode::Dup, 0, 0);
                Self::code_expr(low, ctx)?;
                Self::code_compare(operand, low, Opcode::Ge, 0, false, ctx)?;
                ctx.program.add_op(Opcode::Pull, 1, 0);
                Self::code_expr(high, ctx)?;
                Self::code_compare(operand, high, Opcode::Le, 0, false, ctx)?;
                ctx.program.add_op(Opcode::And, 0, 0);
            }
            ExprKind::Case { base, arms, otherwise } => {
                let end = ctx.program.make_label();
                if let Some(base) = base.as_deref_mut() {
                    Self::code_expr(base, ctx)?;
                }
                for arm in arms.iter_mut() {
                    Self::code_expr(&mut arm.when, ctx)?;
                    let jump = match base.as_deref() {
                        Some(base) => {
                            ctx.program.add_op(Opcode::Dup, 1, 1);
                            let jump = Self::code_compare(base, &arm.when, Opcode::Ne, 0, true, ctx)?;
                            ctx.program.add_op(Opcode::Pop, 1, 0);
                            jump
                        }
                        None => ctx.program.add_op(Opcode::IfNot, 1, 0),
                    };
                    Self::code_expr(&mut arm.then, ctx)?;
                    ctx.program.add_jump(Opcode::Goto, 0, end);
                    let next = ctx.program.current_addr() as i32;
                    ctx.program.change_p2(jump, next);
                }
                if base.is_some() {
                    ctx.program.add_op(Opcode::Pop, 1, 0);
                }
                match otherwise.as_deref_mut() {
                    Some(otherwise) => Self::code_expr(otherwise, ctx)?,
                    None => {
                        ctx.program.add_op(Opcode::Null, 0, 0);
                    }
                }
                ctx.program.resolve_label(end);
            }
            ExprKind::Raise { action } => {
                let trigger = ctx.trigger.ok_or(CodegenError::RaiseOutsideTrigger)?;
                match action {
                    RaiseAction::Ignore => {
                        ctx.program.add_op(Opcode::ContextPop, 0, 0);
                        ctx.program.add_jump(Opcode::Goto, 0, trigger.ignore_jump);
                    }
                    action => {
                        ctx.program.add_op4(Opcode::Halt, CONSTRAINT_VIOLATION, action.code(), P4::Text(dequote(text)));
                    }
                }
            }
            ExprKind::Id => return Err(CodegenError::Unresolved(text.to_string())),
            ExprKind::Dot { left, right } => {
                return Err(CodegenError::Unresolved(format!("{}.{}", dotted_name(left), dotted_name(right))));
            }
            ExprKind::In { .. } | ExprKind::Exists { .. } | ExprKind::Subquery { .. } => {
                return Err(CodegenError::NotASubquery);
            }
        }
        Ok(())
    }

    fn code_unary(op: UnaryOp, operand: &mut Expr, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        let numeric_literal = match operand.kind {
            ExprKind::Literal(kind @ (LiteralKind::Integer | LiteralKind::Float)) => Some(kind),
            _ => None,
        };
        match (op, numeric_literal) {
            (UnaryOp::Negate, Some(kind)) => {
                let negated = format!("-{}", operand.name());
                match kind {
                    LiteralKind::Integer => Self::code_integer(&negated, ctx),
                    _ => Self::code_real(&negated, ctx),
                }
            }
            (UnaryOp::Plus, _) => Self::code_expr(operand, ctx),
            (UnaryOp::IsNull | UnaryOp::NotNull, _) => {
                ctx.program.add_op(Opcode::Integer, 1, 0);
                Self::code_expr(operand, ctx)?;
                let dest = ctx.program.current_addr() as i32 + 2;
                if let Some(opcode) = Opcode::for_unary(op) {
                    ctx.program.add_op(opcode, 1, dest);
                }
                ctx.program.add_op(Opcode::AddImm, -1, 0);
                Ok(())
            }
            _ => {
                Self::code_expr(operand, ctx)?;
                if let Some(opcode) = Opcode::for_unary(op) {
                    ctx.program.add_op(opcode, 0, 0);
                }
                Ok(())
            }
        }
    }

    /// Value of an `IN`, `EXISTS` or scalar subquery node; the subquery
    /// itself is lowered first.
    fn code_subquery_value(expr: &mut Expr, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        SubqueryCoder::code_subselect(expr, ctx)?;
        let affinity = AffinityResolver::comparison_affinity(expr);
        match &mut expr.kind {
            ExprKind::Exists { mem: Some(mem), .. } | ExprKind::Subquery { mem: Some(mem), .. } => {
                ctx.program.add_op(Opcode::MemLoad, *mem as i32, 0);
            }
            ExprKind::In { operand, cursor: Some(cursor), .. } => {
                let cursor = *cursor;
                ctx.program.add_op(Opcode::Integer, 1, 0);
                Self::code_expr(operand, ctx)?;
                let addr = ctx.program.current_addr() as i32;
                ctx.program.add_op(Opcode::NotNull, -1, addr + 4);
                ctx.program.add_op(Opcode::Pop, 2, 0);
                ctx.program.add_op(Opcode::Null, 0, 0);
                ctx.program.add_op(Opcode::Goto, 0, addr + 7);
                ctx.program.add_op4(Opcode::MakeRecord, 1, 0, P4::Affinity(affinity));
                ctx.program.add_op(Opcode::Found, cursor, addr + 7);
                ctx.program.add_op(Opcode::AddImm, -1, 0);
            }
            _ => return Err(CodegenError::NotASubquery),
        }
        Ok(())
    }

    /// `Integer` for 32-bit values, `Integer` with a 64-bit payload when it
    /// fits, otherwise a `Real`.
    fn code_integer(text: &str, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        if let Ok(value) = text.parse::<i32>() {
            ctx.program.add_op(Opcode::Integer, value, 0);
        } else if let Ok(value) = text.parse::<i64>() {
            ctx.program.add_op4(Opcode::Integer, 0, 0, P4::Int64(value));
        } else {
            Self::code_real(text, ctx)?;
        }
        Ok(())
    }

    fn code_real(text: &str, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        let value = text
            .parse::<f64>()
            .ok()
            .and_then(|v| NotNan::new(v).ok())
            .ok_or_else(|| CodegenError::MalformedLiteral(text.to_string()))?;
        ctx.program.add_op4(Opcode::Real, 0, 0, P4::Real(value));
        Ok(())
    }
}

fn dotted_name(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Dot { left, right } => format!("{}.{}", dotted_name(left), dotted_name(right)),
        _ => expr.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        _tests::fixtures::{self, RecordingSelectCoder},
        ast::{BinaryOp, Select},
        catalog::{Affinity, CompileConfig, FunctionCatalog, Schema},
        codegen::{Program, SelectDest},
    };

    struct Env {
        schema: Schema,
        functions: FunctionCatalog,
        config: CompileConfig,
        coder: RecordingSelectCoder,
    }

    fn env() -> Env {
        Env {
            schema: fixtures::schema(),
            functions: FunctionCatalog::with_builtins(),
            config: CompileConfig::new(),
            coder: RecordingSelectCoder::default(),
        }
    }

    fn compile(env: &mut Env, expr: &mut Expr) -> Result<Program, CodegenError> {
        let mut ctx = CodegenContext::new(&env.schema, &env.functions, &env.config, &mut env.coder);
        ExprCoder::code_expr(expr, &mut ctx)?;
        ctx.finish()
    }

    fn with_affinity(mut e: Expr, affinity: Affinity) -> Expr {
        e.affinity = Some(affinity);
        e
    }

    #[test]
    fn integer_literals_pick_the_narrowest_encoding() {
        let mut env = env();
        let small = compile(&mut env, &mut Expr::integer(42)).unwrap();
        assert_eq!(small.instructions[0].p1, 42);
        assert_eq!(small.instructions[0].p4, P4::None);

        let wide = compile(&mut env, &mut Expr::integer(5_000_000_000)).unwrap();
        assert_eq!(wide.instructions[0].opcode, Opcode::Integer);
        assert_eq!(wide.instructions[0].p4, P4::Int64(5_000_000_000));

        let huge = compile(&mut env, &mut Expr::integer_text("99999999999999999999")).unwrap();
        assert_eq!(huge.instructions[0].opcode, Opcode::Real);
    }

    #[test]
    fn negative_literals_are_folded() {
        let mut env = env();
        let program = compile(&mut env, &mut Expr::unary(UnaryOp::Negate, Expr::integer(7))).unwrap();
        assert_eq!(program.opcodes(), [Opcode::Integer]);
        assert_eq!(program.instructions[0].p1, -7);

        let program = compile(&mut env, &mut Expr::unary(UnaryOp::Negate, Expr::float("2.5"))).unwrap();
        assert_eq!(program.instructions[0].p4, P4::Real(NotNan::new(-2.5).unwrap()));

        let program = compile(&mut env, &mut Expr::unary(UnaryOp::Negate, Expr::column(0, 1))).unwrap();
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::Negative]);
    }

    #[test]
    fn string_and_blob_literals_are_decoded() {
        let mut env = env();
        let program = compile(&mut env, &mut Expr::string("it's")).unwrap();
        assert_eq!(program.instructions[0].p4, P4::Text("it's".into()));

        let program = compile(&mut env, &mut Expr::blob("CAFE")).unwrap();
        assert_eq!(program.instructions[0].opcode, Opcode::HexBlob);
        assert_eq!(program.instructions[0].p4, P4::Blob(vec![0xCA, 0xFE]));

        let err = compile(&mut env, &mut Expr::blob("ABC")).unwrap_err();
        assert_eq!(err, CodegenError::MalformedLiteral("x'ABC'".into()));
    }

    #[test]
    fn columns_read_accumulators_unless_filling_them() {
        let mut env = env();
        let mut col = Expr::column(2, 3);
        col.agg = Some(crate::ast::AggSlot { index: 5, depth: 1 });
        let program = compile(&mut env, &mut col).unwrap();
        assert_eq!(program.instructions[0].opcode, Opcode::AggGet);
        assert_eq!((program.instructions[0].p1, program.instructions[0].p2), (1, 5));

        let mut ctx = CodegenContext::new(&env.schema, &env.functions, &env.config, &mut env.coder);
        ctx.fill_agg = true;
        ExprCoder::code_expr(&mut col, &mut ctx).unwrap();
        let program = ctx.finish().unwrap();
        assert_eq!(program.instructions[0].opcode, Opcode::Column);

        let program = compile(&mut env, &mut Expr::column(0, -1)).unwrap();
        assert_eq!(program.opcodes(), [Opcode::Rowid]);
    }

    #[test]
    fn comparison_carries_affinity_and_collation() {
        let mut env = env();
        let mut e = Expr::binary(
            BinaryOp::Lt,
            with_affinity(Expr::column(0, 1), Affinity::Integer),
            Expr::string("5"),
        );
        let program = compile(&mut env, &mut e).unwrap();
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::String8, Opcode::Lt]);
        let cmp = &program.instructions[2];
        assert_eq!((cmp.p1, cmp.p2), (0, 0));
        assert_eq!(cmp.p4, P4::Compare { affinity: Affinity::Integer, coll: env.schema.default_collation() });
    }

    #[test]
    fn arithmetic_emits_operands_then_operator() {
        let mut env = env();
        let mut e = Expr::binary(
            BinaryOp::Concat,
            Expr::binary(BinaryOp::Star, Expr::integer(2), Expr::integer(3)),
            Expr::string("x"),
        );
        let program = compile(&mut env, &mut e).unwrap();
        assert_eq!(
            program.opcodes(),
            [Opcode::Integer, Opcode::Integer, Opcode::Multiply, Opcode::String8, Opcode::Concat]
        );
    }

    #[test]
    fn is_null_yields_a_boolean() {
        let mut env = env();
        let program = compile(&mut env, &mut Expr::unary(UnaryOp::IsNull, Expr::column(0, 1))).unwrap();
        assert_eq!(program.opcodes(), [Opcode::Integer, Opcode::Column, Opcode::IsNull, Opcode::AddImm]);
        assert_eq!(program.instructions[2].p2, 4);
    }

    #[test]
    fn between_compares_against_both_bounds() {
        let mut env = env();
        let mut e = Expr::between(Expr::column(0, 1), Expr::integer(1), Expr::integer(10));
        let program = compile(&mut env, &mut e).unwrap();
        assert_eq!(
            program.opcodes(),
            [
                Opcode::Column,
                Opcode::Dup,
                Opcode::Integer,
                Opcode::Ge,
                Opcode::Pull,
                Opcode::Integer,
                Opcode::Le,
                Opcode::And
            ]
        );
    }

    #[test]
    fn case_without_base_chains_to_one_end() {
        let mut env = env();
        let mut e = Expr::case(
            None,
            vec![
                (Expr::binary(BinaryOp::Eq, Expr::column(0, 1), Expr::integer(1)), Expr::string("one")),
                (Expr::binary(BinaryOp::Eq, Expr::column(0, 1), Expr::integer(2)), Expr::string("two")),
            ],
            None,
        );
        let program = compile(&mut env, &mut e).unwrap();
        let end = program.len() as i32;
        let jumps: Vec<_> = program.instructions.iter().filter(|i| i.opcode == Opcode::Goto).collect();
        assert_eq!(jumps.len(), 2);
        assert!(jumps.iter().all(|j| j.p2 == end));
        assert_eq!(program.instructions.last().unwrap().opcode, Opcode::Null);
        let if_not = &program.instructions[3];
        assert_eq!(if_not.opcode, Opcode::IfNot);
        assert_eq!(program.instructions[if_not.p2 as usize].opcode, Opcode::Column);
    }

    #[test]
    fn case_with_base_duplicates_and_pops_it() {
        let mut env = env();
        let mut e = Expr::case(
            Some(Expr::column(0, 1)),
            vec![(Expr::integer(1), Expr::string("one"))],
            Some(Expr::string("other")),
        );
        let program = compile(&mut env, &mut e).unwrap();
        assert_eq!(
            program.opcodes(),
            [
                Opcode::Column,
                Opcode::Integer,
                Opcode::Dup,
                Opcode::Ne,
                Opcode::Pop,
                Opcode::String8,
                Opcode::Goto,
                Opcode::Pop,
                Opcode::String8
            ]
        );
        assert_eq!(program.instructions[3].p1, 1);
        assert_eq!(program.instructions[3].p2, 7);
        assert_eq!(program.instructions[6].p2, 9);
    }

    #[test]
    fn function_call_masks_constant_arguments() {
        let mut env = env();
        let mut e = Expr::function("substr", vec![Expr::column(0, 2), Expr::integer(1), Expr::integer(3)]);
        let program = compile(&mut env, &mut e).unwrap();
        let call = program.instructions.last().unwrap();
        assert_eq!(call.opcode, Opcode::Function);
        assert_eq!((call.p1, call.p2), (3, 0b110));
        let id = env.functions.lookup("substr", 3, env.config.encoding).unwrap();
        assert_eq!(call.p4, P4::FuncDef(id));
    }

    #[test]
    fn collating_function_gets_its_collation_first() {
        let mut env = env();
        let nocase = env.schema.find_collation("NOCASE").unwrap();
        let mut arg = Expr::column(0, 2);
        arg.coll = Some(nocase);
        let mut e = Expr::function("max", vec![arg, Expr::string("b")]);
        let program = compile(&mut env, &mut e).unwrap();
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::String8, Opcode::CollSeq, Opcode::Function]);
        assert_eq!(program.instructions[2].p4, P4::CollSeq(nocase));
    }

    #[test]
    fn unknown_function_is_an_error() {
        let mut env = env();
        let err = compile(&mut env, &mut Expr::function("nope", vec![])).unwrap_err();
        assert_eq!(err.to_string(), "no such function: nope");
    }

    #[test]
    fn unresolved_identifiers_are_rejected() {
        let mut env = env();
        let err = compile(&mut env, &mut Expr::qualified("t1", "a")).unwrap_err();
        assert_eq!(err, CodegenError::Unresolved("t1.a".into()));
    }

    #[test]
    fn raise_requires_a_trigger_program() {
        let mut env = env();
        let err = compile(&mut env, &mut Expr::raise(RaiseAction::Abort, "boom")).unwrap_err();
        assert_eq!(err.to_string(), "RAISE() may only be used within a trigger-program");

        let mut ctx = CodegenContext::new(&env.schema, &env.functions, &env.config, &mut env.coder).in_trigger();
        ExprCoder::code_expr(&mut Expr::raise(RaiseAction::Abort, "boom"), &mut ctx).unwrap();
        ExprCoder::code_expr(&mut Expr::raise(RaiseAction::Ignore, ""), &mut ctx).unwrap();
        let program = ctx.finish().unwrap();
        assert_eq!(program.opcodes(), [Opcode::Halt, Opcode::ContextPop, Opcode::Goto]);
        assert_eq!(program.instructions[0].p2, 2);
        assert_eq!(program.instructions[0].p4, P4::Text("boom".into()));
        assert_eq!(program.instructions[2].p2, 3);
    }

    #[test]
    fn scalar_subquery_loads_its_cell() {
        let mut env = env();
        let select = Select::new(ExprList::from_exprs(vec![Expr::integer(1)]), Default::default());
        let program = compile(&mut env, &mut Expr::subquery(select)).unwrap();
        assert_eq!(program.instructions.last().unwrap().opcode, Opcode::MemLoad);
        assert_eq!(env.coder.calls, [SelectDest::Mem(1)]);
    }

    #[test]
    fn cached_values_become_registers() {
        let mut env = env();
        let mut ctx = CodegenContext::new(&env.schema, &env.functions, &env.config, &mut env.coder);
        let mut sum = Expr::binary(BinaryOp::Plus, Expr::column(0, 1), Expr::integer(1));
        ExprCoder::code_and_cache(&mut sum, &mut ctx).unwrap();
        assert_eq!(sum.kind, ExprKind::Register { slot: 0 });

        let mut single = Expr::column(0, 1);
        ExprCoder::code_and_cache(&mut single, &mut ctx).unwrap();
        assert!(matches!(single.kind, ExprKind::Column(_)));

        ExprCoder::code_expr(&mut sum, &mut ctx).unwrap();
        let program = ctx.finish().unwrap();
        assert_eq!(
            program.opcodes(),
            [Opcode::Column, Opcode::Integer, Opcode::Add, Opcode::MemStore, Opcode::Column, Opcode::MemLoad]
        );
    }
}

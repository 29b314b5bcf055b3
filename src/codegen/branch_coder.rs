use crate::{
    ast::{BinaryOp, Expr, ExprKind, UnaryOp},
    codegen::{CodegenContext, CodegenError, ExprCoder, Label, Opcode},
};

/// Compiles a boolean expression into a conditional jump instead of a value.
pub struct BranchCoder;

impl BranchCoder {
    /// Jumps to `dest` when `expr` is true and falls through otherwise. A NULL
    /// result jumps only when `jump_if_null` is set.
    pub fn code_if_true(
        expr: &mut Expr,
        dest: Label,
        jump_if_null: bool,
        ctx: &mut CodegenContext,
    ) -> Result<(), CodegenError> {
        Self::code_branch(expr, dest, jump_if_null, true, ctx)
    }

    /// Jumps to `dest` when `expr` is false and falls through otherwise.
    pub fn code_if_false(
        expr: &mut Expr,
        dest: Label,
        jump_if_null: bool,
        ctx: &mut CodegenContext,
    ) -> Result<(), CodegenError> {
        Self::code_branch(expr, dest, jump_if_null, false, ctx)
    }

    fn code_branch(
        expr: &mut Expr,
        dest: Label,
        jump_if_null: bool,
        jump_when: bool,
        ctx: &mut CodegenContext,
    ) -> Result<(), CodegenError> {
        match &mut expr.kind {
            ExprKind::Binary { op: op @ (BinaryOp::And | BinaryOp::Or), left, right } => {
                // AND jumping on true and OR jumping on false both need the
                // left side to skip over the right side.
                if (*op == BinaryOp::And) == jump_when {
                    let skip = ctx.program.make_label();
                    Self::code_branch(left, skip, !jump_if_null, !jump_when, ctx)?;
                    Self::code_branch(right, dest, jump_if_null, jump_when, ctx)?;
                    ctx.program.resolve_label(skip);
                } else {
                    Self::code_branch(left, dest, jump_if_null, jump_when, ctx)?;
                    Self::code_branch(right, dest, jump_if_null, jump_when, ctx)?;
                }
                return Ok(());
            }
            ExprKind::Unary { op: UnaryOp::Not, operand } => {
                return Self::code_branch(operand, dest, jump_if_null, !jump_when, ctx);
            }
            ExprKind::Binary { op, left, right } => {
                if let Some(opcode) = branch_opcode(Opcode::for_binary(*op), jump_when) {
                    ExprCoder::code_expr(left, ctx)?;
                    ExprCoder::code_expr(right, ctx)?;
                    ExprCoder::code_compare(left, right, opcode, dest.as_p2(), jump_if_null, ctx)?;
                    return Ok(());
                }
            }
            ExprKind::Unary { op, operand } => {
                if let Some(opcode) = Opcode::for_unary(*op).and_then(|code| branch_opcode(code, jump_when)) {
                    ExprCoder::code_expr(operand, ctx)?;
                    ctx.program.add_jump(opcode, 1, dest);
                    return Ok(());
                }
            }
            ExprKind::Between { operand, bounds } => {
                let [low, high] = &mut **bounds;
                ExprCoder::code_expr(operand, ctx)?;
                ctx.program.add_op(Opcode::Dup, 0, 0);
                ExprCoder::code_expr(low, ctx)?;
                if jump_when {
                    let below = ExprCoder::code_compare(operand, low, Opcode::Lt, 0, !jump_if_null, ctx)?;
                    ExprCoder::code_expr(high, ctx)?;
                    ExprCoder::code_compare(operand, high, Opcode::Le, dest.as_p2(), jump_if_null, ctx)?;
                    ctx.program.add_op(Opcode::Integer, 0, 0);
                    let pop = ctx.program.current_addr() as i32;
                    ctx.program.change_p2(below, pop);
                    ctx.program.add_op(Opcode::Pop, 1, 0);
                } else {
                    let addr = ctx.program.current_addr() as i32;
                    ExprCoder::code_compare(operand, low, Opcode::Ge, addr + 3, !jump_if_null, ctx)?;
                    ctx.program.add_op(Opcode::Pop, 1, 0);
                    ctx.program.add_jump(Opcode::Goto, 0, dest);
                    ExprCoder::code_expr(high, ctx)?;
                    ExprCoder::code_compare(operand, high, Opcode::Gt, dest.as_p2(), jump_if_null, ctx)?;
                }
                return Ok(());
            }
            _ => {}
        }
        ExprCoder::code_expr(expr, ctx)?;
        let opcode = if jump_when { Opcode::If } else { Opcode::IfNot };
        ctx.program.add_jump(opcode, jump_if_null as i32, dest);
        Ok(())
    }
}

/// The jump opcode for a comparison or NULL test, negated on the false branch.
fn branch_opcode(opcode: Opcode, jump_when: bool) -> Option<Opcode> {
    let negated = opcode.negated()?;
    Some(if jump_when { opcode } else { negated })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        _tests::fixtures::{self, RecordingSelectCoder},
        catalog::{CompileConfig, FunctionCatalog, Schema},
        codegen::Program,
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

    /// Codes the branch, then a `Null` at the fall-through, then resolves `dest`.
    fn branch(env: &mut Env, expr: &mut Expr, jump_when: bool, jump_if_null: bool) -> Program {
        let mut ctx = CodegenContext::new(&env.schema, &env.functions, &env.config, &mut env.coder);
        let dest = ctx.program.make_label();
        if jump_when {
            BranchCoder::code_if_true(expr, dest, jump_if_null, &mut ctx).unwrap();
        } else {
            BranchCoder::code_if_false(expr, dest, jump_if_null, &mut ctx).unwrap();
        }
        ctx.program.add_op(Opcode::Null, 0, 0);
        ctx.program.resolve_label(dest);
        ctx.finish().unwrap()
    }

    fn cmp(op: BinaryOp, column: i32, value: i64) -> Expr {
        Expr::binary(op, Expr::column(0, column), Expr::integer(value))
    }

    #[test]
    fn comparison_jumps_directly() {
        let mut env = env();
        let program = branch(&mut env, &mut cmp(BinaryOp::Lt, 1, 5), true, false);
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::Integer, Opcode::Lt, Opcode::Null]);
        assert_eq!(program.instructions[2].p2, 4);

        let program = branch(&mut env, &mut cmp(BinaryOp::Lt, 1, 5), false, true);
        assert_eq!(program.instructions[2].opcode, Opcode::Ge);
        assert_eq!(program.instructions[2].p1, 1);
    }

    #[test]
    fn and_on_true_skips_the_right_side() {
        let mut env = env();
        let mut e = Expr::binary(BinaryOp::And, cmp(BinaryOp::Eq, 1, 1), cmp(BinaryOp::Eq, 2, 2));
        let program = branch(&mut env, &mut e, true, false);
        assert_eq!(
            program.opcodes(),
            [Opcode::Column, Opcode::Integer, Opcode::Ne, Opcode::Column, Opcode::Integer, Opcode::Eq, Opcode::Null]
        );
        assert_eq!((program.instructions[2].p1, program.instructions[2].p2), (1, 6));
        assert_eq!((program.instructions[5].p1, program.instructions[5].p2), (0, 7));
    }

    #[test]
    fn or_on_false_mirrors_and_on_true() {
        let mut env = env();
        let mut e = Expr::binary(BinaryOp::Or, cmp(BinaryOp::Gt, 1, 1), cmp(BinaryOp::Le, 2, 2));
        let program = branch(&mut env, &mut e, false, false);
        assert_eq!(program.instructions[2].opcode, Opcode::Gt);
        assert_eq!(program.instructions[2].p2, 6);
        assert_eq!(program.instructions[5].opcode, Opcode::Gt);
        assert_eq!(program.instructions[5].p2, 7);
    }

    #[test]
    fn or_on_true_jumps_from_both_sides() {
        let mut env = env();
        let mut e = Expr::binary(BinaryOp::Or, cmp(BinaryOp::Eq, 1, 1), cmp(BinaryOp::Eq, 2, 2));
        let program = branch(&mut env, &mut e, true, false);
        assert_eq!(program.instructions[2].p2, 7);
        assert_eq!(program.instructions[5].p2, 7);
    }

    #[test]
    fn not_flips_the_branch() {
        let mut env = env();
        let mut e = Expr::unary(UnaryOp::Not, cmp(BinaryOp::Eq, 1, 1));
        let program = branch(&mut env, &mut e, true, false);
        assert_eq!(program.instructions[2].opcode, Opcode::Ne);
    }

    #[test]
    fn null_tests_jump_with_p1_set() {
        let mut env = env();
        let mut e = Expr::unary(UnaryOp::IsNull, Expr::column(0, 1));
        let program = branch(&mut env, &mut e, false, false);
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::NotNull, Opcode::Null]);
        assert_eq!((program.instructions[1].p1, program.instructions[1].p2), (1, 3));
    }

    #[test]
    fn other_expressions_test_their_value() {
        let mut env = env();
        let program = branch(&mut env, &mut Expr::column(0, 1), true, true);
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::If, Opcode::Null]);
        assert_eq!((program.instructions[1].p1, program.instructions[1].p2), (1, 3));

        let mut sum = Expr::binary(BinaryOp::Plus, Expr::column(0, 1), Expr::integer(1));
        let program = branch(&mut env, &mut sum, false, false);
        assert_eq!(program.opcodes(), [Opcode::Column, Opcode::Integer, Opcode::Add, Opcode::IfNot, Opcode::Null]);
    }

    #[test]
    fn between_on_true() {
        let mut env = env();
        let mut e = Expr::between(Expr::column(0, 1), Expr::integer(1), Expr::integer(9));
        let program = branch(&mut env, &mut e, true, false);
        assert_eq!(
            program.opcodes(),
            [
                Opcode::Column,
                Opcode::Dup,
                Opcode::Integer,
                Opcode::Lt,
                Opcode::Integer,
                Opcode::Le,
                Opcode::Integer,
                Opcode::Pop,
                Opcode::Null
            ]
        );
        assert_eq!((program.instructions[3].p1, program.instructions[3].p2), (1, 7));
        assert_eq!(program.instructions[5].p2, 9);
    }

    #[test]
    fn between_on_false() {
        let mut env = env();
        let mut e = Expr::between(Expr::column(0, 1), Expr::integer(1), Expr::integer(9));
        let program = branch(&mut env, &mut e, false, false);
        assert_eq!(
            program.opcodes(),
            [
                Opcode::Column,
                Opcode::Dup,
                Opcode::Integer,
                Opcode::Ge,
                Opcode::Pop,
                Opcode::Goto,
                Opcode::Integer,
                Opcode::Gt,
                Opcode::Null
            ]
        );
        assert_eq!(program.instructions[3].p2, 6);
        assert_eq!(program.instructions[5].p2, 9);
        assert_eq!(program.instructions[7].p2, 9);
    }
}

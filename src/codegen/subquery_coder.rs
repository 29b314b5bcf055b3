use tracing::debug;

use crate::{
    analyzer::AffinityResolver,
    ast::{Expr, ExprKind, ExprList, InRhs},
    catalog::Affinity,
    codegen::{CodegenContext, CodegenError, ExprCoder, KeyInfo, Opcode, SelectDest, P4},
};

/// Lowers the sub-select or IN list owned by an expression into the memory
/// cell or ephemeral table its value is later read from.
pub struct SubqueryCoder;

impl SubqueryCoder {
    /// Emits the code that fills the node's cursor or memory cell and records
    /// the allocated handle on the node. Uncorrelated subqueries outside
    /// trigger programs are guarded so they run only once per statement.
    pub fn code_subselect(expr: &mut Expr, ctx: &mut CodegenContext) -> Result<(), CodegenError> {
        if !matches!(expr.kind, ExprKind::In { .. } | ExprKind::Exists { .. } | ExprKind::Subquery { .. }) {
            return Err(CodegenError::NotASubquery);
        }

        let run_once = !expr.flags.correlated && ctx.trigger.is_none();
        debug!(correlated = expr.flags.correlated, run_once, "lowering subquery");
        let done = if run_once {
            let mem = ctx.alloc_mem();
            ctx.program.add_op(Opcode::MemLoad, mem as i32, 0);
            let done = ctx.program.make_label();
            ctx.program.add_jump(Opcode::If, 0, done);
            ctx.program.add_op(Opcode::Integer, 1, 0);
            ctx.program.add_op(Opcode::MemStore, mem as i32, 1);
            Some(done)
        } else {
            None
        };

        let has_select = expr.select().is_some();
        // keys stored in an IN set must match the key ExprCoder builds for the lookup
        let set_affinity = AffinityResolver::comparison_affinity(expr);
        if has_select {
            ctx.program.add_op(Opcode::AggContextPush, 0, 0);
        }

        match &mut expr.kind {
            ExprKind::In { operand, rhs, cursor } => {
                let temp = ctx.alloc_cursor();
                *cursor = Some(temp);
                let open = ctx.program.add_op(Opcode::OpenTemp, temp, 0);
                ctx.program.add_op(Opcode::SetNumColumns, temp, 1);

                let key_coll = match rhs {
                    InRhs::Select(select) => {
                        debug!(cursor = temp, affinity = %set_affinity, "filling IN set from sub-select");
                        ctx.select_coder.code_select(
                            &mut ctx.program,
                            select,
                            SelectDest::Set { cursor: temp, affinity: set_affinity },
                        )?;
                        match select.result.first() {
                            Some(first) => Some(AffinityResolver::binary_compare_collation(operand, first, ctx.schema)?),
                            None => None,
                        }
                    }
                    InRhs::List(items) => {
                        let affinity = AffinityResolver::affinity(operand).unwrap_or(Affinity::Numeric);
                        for item in items.iter_mut() {
                            if !item.is_constant() {
                                return Err(CodegenError::NonConstantInList);
                            }
                            ExprCoder::code_expr(item, ctx)?;
                            ctx.program.add_op4(Opcode::MakeRecord, 1, 0, P4::Affinity(affinity));
                            ctx.program.add_op(Opcode::String8, 0, 0);
                            ctx.program.add_op(Opcode::PutStrKey, temp, 0);
                        }
                        operand.coll
                    }
                };
                ctx.program.change_p4(open, P4::KeyInfo(KeyInfo { n_field: 1, collations: vec![key_coll] }));
            }
            ExprKind::Subquery { select, mem } => {
                let cell = ctx.alloc_mem();
                *mem = Some(cell);
                ctx.select_coder.code_select(&mut ctx.program, select, SelectDest::Mem(cell))?;
            }
            ExprKind::Exists { select, mem } => {
                let cell = ctx.alloc_mem();
                *mem = Some(cell);
                // only row existence matters, so the copy selects a constant
                let mut check = select.dup();
                check.result = ExprList::from_exprs(vec![Expr::integer(1)]);
                ctx.select_coder.code_select(&mut ctx.program, &check, SelectDest::Exists(cell))?;
            }
            _ => return Err(CodegenError::NotASubquery),
        }

        if has_select {
            ctx.program.add_op(Opcode::AggContextPop, 0, 0);
        }
        if let Some(done) = done {
            ctx.program.resolve_label(done);
        }
        Ok(())
    }
}

use tracing::debug;

use crate::{
    catalog::{CompileConfig, FunctionCatalog, Schema},
    codegen::{CodegenError, Label, Program, ProgramBuilder, SelectCoder},
};

/// State of a trigger program being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerProgram {
    /// Where `RAISE(IGNORE)` jumps to.
    pub ignore_jump: Label,
}

/// Per-statement code generation state.
pub struct CodegenContext<'a> {
    pub program: ProgramBuilder,
    pub schema: &'a Schema,
    pub functions: &'a FunctionCatalog,
    pub config: &'a CompileConfig,
    pub select_coder: &'a mut dyn SelectCoder,
    pub trigger: Option<TriggerProgram>,
    /// Set while the aggregate accumulators themselves are being filled, so
    /// columns read their cursors instead of accumulator slots.
    pub fill_agg: bool,
    n_tab: i32,
    n_mem: usize,
}

impl<'a> CodegenContext<'a> {
    pub fn new(
        schema: &'a Schema,
        functions: &'a FunctionCatalog,
        config: &'a CompileConfig,
        select_coder: &'a mut dyn SelectCoder,
    ) -> Self {
        Self {
            program: ProgramBuilder::new(),
            schema,
            functions,
            config,
            select_coder,
            trigger: None,
            fill_agg: false,
            n_tab: 0,
            n_mem: 0,
        }
    }

    /// Starts cursor numbering after the cursors the statement already uses.
    pub fn with_cursor_base(mut self, n_tab: i32) -> Self {
        self.n_tab = n_tab;
        self
    }

    /// Compiles into a trigger program; makes a label for `RAISE(IGNORE)`.
    pub fn in_trigger(mut self) -> Self {
        let ignore_jump = self.program.make_label();
        self.trigger = Some(TriggerProgram { ignore_jump });
        self
    }

    pub fn alloc_cursor(&mut self) -> i32 {
        self.n_tab += 1;
        self.n_tab - 1
    }

    pub fn alloc_mem(&mut self) -> usize {
        self.n_mem += 1;
        self.n_mem - 1
    }

    /// Resolves the trigger's ignore label at the end of the program and
    /// patches all jumps.
    pub fn finish(mut self) -> Result<Program, CodegenError> {
        if let Some(trigger) = self.trigger {
            self.program.resolve_label(trigger.ignore_jump);
        }
        debug!(cursors = self.n_tab, memory_cells = self.n_mem, "code generation finished");
        self.program.finish()
    }
}

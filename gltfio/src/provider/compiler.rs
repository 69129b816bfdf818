//! The variant compiler boundary.

use crate::attribute::VertexAttributeSemantic;
use crate::error::CompileError;
use crate::material::{MaterialKey, ShadingProgram};

/// Builds shading programs for material keys.
///
/// Implementations are free to refuse arbitrary feature combinations and
/// build the nearest supported variant instead. The returned program's
/// [`key`](ShadingProgram::key) is the canonical key actually honored, and
/// everything downstream (UV resolution, cache insertion) uses it.
///
/// # Contract
///
/// - Deterministic: equal input keys produce equivalent programs with equal
///   canonical keys.
/// - Idempotent on canonical keys: compiling `program.key()` again yields the
///   same canonical key.
/// - [`needs_placeholder`](Self::needs_placeholder) depends only on the
///   strategy and the attribute, never on what has been compiled.
pub trait VariantCompiler {
    /// Strategy name, for logging.
    fn name(&self) -> &'static str;

    /// Compile the nearest supported variant of `key`.
    fn compile(&mut self, key: &MaterialKey) -> Result<ShadingProgram, CompileError>;

    /// Whether meshes must always bind this attribute, with synthesized
    /// default data if the source primitive lacks it.
    fn needs_placeholder(&self, attribute: VertexAttributeSemantic) -> bool;
}

impl<C: VariantCompiler + ?Sized> VariantCompiler for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compile(&mut self, key: &MaterialKey) -> Result<ShadingProgram, CompileError> {
        (**self).compile(key)
    }

    fn needs_placeholder(&self, attribute: VertexAttributeSemantic) -> bool {
        (**self).needs_placeholder(attribute)
    }
}

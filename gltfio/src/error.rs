//! Material provider error types.

use std::fmt;

use crate::material::ParameterType;

/// Errors reported by a [`VariantCompiler`](crate::provider::VariantCompiler).
///
/// Unsupported feature combinations are never errors: compilers down-grade the
/// key instead. These variants cover the cases where no program can be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// No variant in the compiler's catalogue can serve the request, even
    /// after down-grading.
    UnsupportedVariant(String),
    /// The compiler reached its program budget.
    BudgetExhausted {
        /// Maximum number of programs the compiler may build.
        budget: usize,
    },
    /// The underlying shader backend failed.
    Backend(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVariant(msg) => write!(f, "no supported variant: {msg}"),
            Self::BudgetExhausted { budget } => {
                write!(f, "program budget of {budget} exhausted")
            }
            Self::Backend(msg) => write!(f, "shader backend error: {msg}"),
        }
    }
}

impl std::error::Error for CompileError {}

/// Errors that can occur when creating or editing program instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// The caller-supplied UV map buffer is smaller than
    /// [`UV_MAP_SIZE`](crate::material::UV_MAP_SIZE).
    UvMapTooSmall {
        /// Length of the supplied buffer.
        len: usize,
        /// Minimum required length.
        required: usize,
    },
    /// Compiling the requested variant failed.
    Compile(CompileError),
    /// The program has no parameter with this name.
    UnknownParameter(String),
    /// The value type does not match the parameter declaration.
    ParameterTypeMismatch {
        /// Parameter name.
        name: String,
        /// Declared type of the parameter.
        expected: ParameterType,
    },
}

impl fmt::Display for MaterialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UvMapTooSmall { len, required } => {
                write!(f, "uv map buffer holds {len} entries, need at least {required}")
            }
            Self::Compile(e) => write!(f, "compilation failed: {e}"),
            Self::UnknownParameter(name) => write!(f, "unknown parameter: {name}"),
            Self::ParameterTypeMismatch { name, expected } => {
                write!(f, "parameter {name} expects a {expected:?} value")
            }
        }
    }
}

impl std::error::Error for MaterialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CompileError> for MaterialError {
    fn from(e: CompileError) -> Self {
        Self::Compile(e)
    }
}

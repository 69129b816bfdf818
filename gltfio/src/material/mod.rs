//! Material requirements, programs, and instances.
//!
//! Materials are split into three layers:
//!
//! - [`MaterialKey`]: **Requirements** extracted from a glTF material. Plain
//!   value, used as the cache key.
//! - [`ShadingProgram`]: **Compiled variant** satisfying one canonical key.
//!   Shared via `Arc` across instances.
//! - [`ProgramInstance`]: **Bindings** holding actual parameter values.
//!
//! The [`uv`] module derives the glTF-channel to hardware-UV-set table that
//! goes with every resolved key.

mod instance;
mod key;
mod program;
pub mod uv;

pub use instance::ProgramInstance;
pub use key::{
    AlphaMode, MaterialFeatures, MaterialKey, TextureBinding, TextureCategory, TextureSlot,
};
pub use program::{
    IDENTITY_MAT3, MaterialValue, ParameterDef, ParameterType, ShadingProgram, TextureRef,
};
pub(crate) use program::ParameterLayout;
pub use uv::{UV_MAP_SIZE, UvMap, UvSet, resolve_uv_map, uv_set_for};

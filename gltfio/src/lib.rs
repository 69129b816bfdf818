//! # RedLilium glTF Material Provider
//!
//! Resolves glTF material requirements into shared shading programs.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`MaterialKey`] - Value-comparable description of what a glTF material needs
//! - [`resolve_uv_map`] - Maps glTF UV channels onto the two hardware UV sets
//! - [`MaterialCache`] - Deduplicates compiled programs by canonical key
//! - [`MaterialProvider`] - Facade creating [`ProgramInstance`]s from keys
//! - Two compiler strategies: [`UbershaderCompiler`] (fixed catalogue) and
//!   [`GeneratingCompiler`] (one program per material)
//!
//! ## Example
//!
//! ```
//! use redlilium_gltfio::{
//!     MaterialKey, MaterialProvider, TextureSlot, UV_MAP_SIZE, UbershaderCompiler, UvSet,
//! };
//!
//! let mut provider = MaterialProvider::new(UbershaderCompiler::standard());
//! let key = MaterialKey::new()
//!     .with_texture(TextureSlot::BaseColor, 0)
//!     .with_texture(TextureSlot::Normal, 1);
//!
//! let mut uvmap = [UvSet::Unused; UV_MAP_SIZE];
//! let instance = provider
//!     .create_instance(&key, &mut uvmap, Some("body"))
//!     .unwrap();
//!
//! assert_eq!(uvmap[0], UvSet::Uv0);
//! assert_eq!(uvmap[1], UvSet::Uv1);
//! assert_eq!(instance.label(), Some("body"));
//! assert_eq!(provider.program_count(), 1);
//! ```

pub mod attribute;
pub mod error;
#[cfg(feature = "gltf")]
pub mod gltf;
pub mod material;
pub mod provider;

// Re-export main types for convenience
pub use attribute::VertexAttributeSemantic;
pub use error::{CompileError, MaterialError};
pub use material::{
    AlphaMode, MaterialFeatures, MaterialKey, MaterialValue, ParameterDef, ParameterType,
    ProgramInstance, ShadingProgram, TextureBinding, TextureCategory, TextureRef, TextureSlot,
    UV_MAP_SIZE, UvMap, UvSet, resolve_uv_map, uv_set_for,
};
pub use provider::{
    Extension, GeneratingCompiler, GeneratingProvider, GeneratorConfig, MaterialCache,
    MaterialProvider, Shading, UbershaderCatalog, UbershaderCompiler, UbershaderProvider,
    UbershaderVariant, VariantCompiler,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

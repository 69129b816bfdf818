//! Material provider: compiler strategies, program cache, and the facade
//! that turns material keys into program instances.

mod cache;
mod compiler;
mod generator;
mod ubershader;

use std::borrow::BorrowMut;
use std::sync::Arc;

pub use cache::MaterialCache;
pub use compiler::VariantCompiler;
pub use generator::{
    DEFAULT_MAX_SAMPLERS, GENERATOR_STRATEGY, GeneratingCompiler, GeneratorConfig, shader_defines,
};
pub use ubershader::{
    Extension, Shading, UBERSHADER_STRATEGY, UbershaderCatalog, UbershaderCompiler,
    UbershaderVariant,
};

use crate::attribute::VertexAttributeSemantic;
use crate::error::MaterialError;
use crate::material::{MaterialKey, ProgramInstance, ShadingProgram, UV_MAP_SIZE, UvSet};

/// Provider serving every material from the ubershader catalogue.
pub type UbershaderProvider = MaterialProvider<UbershaderCompiler>;

/// Provider generating one program per material.
pub type GeneratingProvider = MaterialProvider<GeneratingCompiler>;

/// Creates program instances for glTF materials.
///
/// Owns a [`VariantCompiler`] and a [`MaterialCache`]. The cache may be
/// injected (`&mut MaterialCache`, or any `BorrowMut<MaterialCache>`) to share
/// programs across providers or to inspect it in tests.
///
/// Releasing the provider's programs never invalidates instances already
/// handed out; they hold their program through an `Arc`.
#[derive(Debug)]
pub struct MaterialProvider<C, S = MaterialCache> {
    compiler: C,
    cache: S,
}

impl<C: VariantCompiler> MaterialProvider<C> {
    /// Create a provider with its own empty cache.
    pub fn new(compiler: C) -> Self {
        Self::with_cache(compiler, MaterialCache::new())
    }
}

impl<C: VariantCompiler, S: BorrowMut<MaterialCache>> MaterialProvider<C, S> {
    /// Create a provider over an existing cache.
    pub fn with_cache(compiler: C, cache: S) -> Self {
        log::debug!("material provider created with {} strategy", compiler.name());
        Self { compiler, cache }
    }

    /// Create an instance for `key`.
    ///
    /// `uvmap` receives the glTF-channel to hardware-UV-set table for the
    /// program actually used; entries beyond the eighth are set to
    /// [`UvSet::Unused`]. Buffers shorter than [`UV_MAP_SIZE`] are rejected
    /// before anything is compiled.
    ///
    /// When the compiler down-grades the request, the instance reports the
    /// canonical key through [`ProgramInstance::key`] and `uvmap` follows it.
    pub fn create_instance(
        &mut self,
        key: &MaterialKey,
        uvmap: &mut [UvSet],
        label: Option<&str>,
    ) -> Result<ProgramInstance, MaterialError> {
        if uvmap.len() < UV_MAP_SIZE {
            return Err(MaterialError::UvMapTooSmall {
                len: uvmap.len(),
                required: UV_MAP_SIZE,
            });
        }

        let (program, canonical) = self
            .cache
            .borrow_mut()
            .resolve(key, &mut self.compiler)
            .map_err(|err| {
                log::warn!("{} failed to compile [{key}]: {err}", self.compiler.name());
                MaterialError::Compile(err)
            })?;

        let (head, tail) = uvmap.split_at_mut(UV_MAP_SIZE);
        head.copy_from_slice(program.uv_map());
        tail.fill(UvSet::Unused);

        log::trace!(
            "instance {} of '{}' for [{canonical}]",
            label.unwrap_or("<unnamed>"),
            program.name()
        );
        let instance = ProgramInstance::new(program);
        Ok(match label {
            Some(label) => instance.with_label(label),
            None => instance,
        })
    }

    /// Every program in the cache, in creation order. A shared cache also
    /// lists programs created by other strategies.
    pub fn list_programs(&self) -> Vec<Arc<ShadingProgram>> {
        self.cache.borrow().snapshot()
    }

    /// Number of distinct programs in the cache.
    pub fn program_count(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Whether meshes must carry `attribute`, synthesizing default data if
    /// the glTF primitive has none. Depends only on the strategy.
    pub fn needs_placeholder_attribute(&self, attribute: VertexAttributeSemantic) -> bool {
        self.compiler.needs_placeholder(attribute)
    }

    /// Drop all cached programs. Safe to call repeatedly; outstanding
    /// instances stay valid.
    pub fn release_all(&mut self) {
        self.cache.borrow_mut().clear();
    }

    /// The program cache.
    pub fn cache(&self) -> &MaterialCache {
        self.cache.borrow()
    }

    /// The compiler strategy.
    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    /// Split into compiler and cache.
    pub fn into_parts(self) -> (C, S) {
        (self.compiler, self.cache)
    }
}

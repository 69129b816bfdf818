//! Per-material strategy: one bespoke program per canonical key.
//!
//! The generated source is a `#define` preamble describing exactly the
//! features and texture slots in use, followed by the shared surface
//! template. Unused features cost nothing at runtime, so meshes never need
//! placeholder attributes.

use std::collections::HashSet;

use crate::attribute::VertexAttributeSemantic;
use crate::error::CompileError;
use crate::material::{
    AlphaMode, MaterialFeatures, MaterialKey, ParameterLayout, ShadingProgram, UvSet,
    resolve_uv_map, uv_set_for,
};

use super::compiler::VariantCompiler;

/// Strategy name reported by [`GeneratingCompiler`].
pub const GENERATOR_STRATEGY: &str = "generated";

/// Default sampler limit, matching common mobile GPU fragment stage limits.
pub const DEFAULT_MAX_SAMPLERS: usize = 16;

const SURFACE_TEMPLATE: &str = "\
#include \"gltf/surface.fs\"
#include \"gltf/lighting.fs\"
";

const FEATURE_DEFINES: [(MaterialFeatures, &str); 8] = [
    (MaterialFeatures::DOUBLE_SIDED, "DOUBLE_SIDED"),
    (MaterialFeatures::VERTEX_COLORS, "HAS_VERTEX_COLORS"),
    (MaterialFeatures::CLEAR_COAT, "HAS_CLEAR_COAT"),
    (MaterialFeatures::TRANSMISSION, "HAS_TRANSMISSION"),
    (MaterialFeatures::SHEEN, "HAS_SHEEN"),
    (MaterialFeatures::IOR, "HAS_IOR"),
    (MaterialFeatures::TEXTURE_TRANSFORMS, "HAS_TEXTURE_TRANSFORMS"),
    (MaterialFeatures::DIAGNOSTICS, "ENABLE_DIAGNOSTICS"),
];

/// Limits of a [`GeneratingCompiler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Maximum texture slots one program may sample. Surplus slots are
    /// dropped from the end of the declaration order.
    pub max_samplers: usize,
    /// Maximum number of distinct canonical keys to build programs for;
    /// `None` is unlimited. Rebuilding a key already built is free.
    pub program_budget: Option<usize>,
}

impl GeneratorConfig {
    /// Set the sampler limit.
    #[must_use]
    pub fn with_max_samplers(mut self, max_samplers: usize) -> Self {
        self.max_samplers = max_samplers;
        self
    }

    /// Set the program budget.
    #[must_use]
    pub fn with_program_budget(mut self, budget: usize) -> Self {
        self.program_budget = Some(budget);
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_samplers: DEFAULT_MAX_SAMPLERS,
            program_budget: None,
        }
    }
}

/// Builds a dedicated program for every canonical key.
#[derive(Debug, Default)]
pub struct GeneratingCompiler {
    config: GeneratorConfig,
    built: HashSet<MaterialKey>,
    compiled: usize,
}

impl GeneratingCompiler {
    /// Create a compiler with the given limits.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            built: HashSet::new(),
            compiled: 0,
        }
    }

    /// The limits in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Number of programs built so far.
    pub fn compiled_count(&self) -> usize {
        self.compiled
    }

    fn constrain(&self, key: &MaterialKey) -> MaterialKey {
        let mut canonical = key.canonicalize();
        let surplus: Vec<_> = canonical
            .enabled_textures()
            .map(|(slot, _)| slot)
            .skip(self.config.max_samplers)
            .collect();
        if !surplus.is_empty() {
            log::debug!(
                "dropping {} texture slot(s) beyond the {} sampler limit",
                surplus.len(),
                self.config.max_samplers
            );
            for slot in surplus {
                canonical.disable_texture(slot);
            }
            canonical = canonical.canonicalize();
        }
        canonical
    }
}

/// Preprocessor defines describing a canonical key.
///
/// Texture slots produce `HAS_<SLOT>_TEXTURE` plus `<SLOT>_UV <n>` naming
/// the hardware set (0 or 1) the slot samples.
pub fn shader_defines(key: &MaterialKey) -> Vec<String> {
    let shading = if key.has_feature(MaterialFeatures::UNLIT) {
        "SHADING_UNLIT"
    } else if key.has_feature(MaterialFeatures::SPECULAR_GLOSSINESS) {
        "SHADING_SPECULAR_GLOSSINESS"
    } else {
        "SHADING_LIT"
    };
    let blending = match key.alpha_mode {
        AlphaMode::Opaque => "BLENDING_OPAQUE",
        AlphaMode::Mask => "BLENDING_MASKED",
        AlphaMode::Blend => "BLENDING_TRANSPARENT",
    };

    let mut defines = vec![shading.to_owned(), blending.to_owned()];
    defines.extend(
        FEATURE_DEFINES
            .iter()
            .filter(|(flag, _)| key.has_feature(*flag))
            .map(|(_, define)| (*define).to_owned()),
    );
    for (slot, _) in key.enabled_textures() {
        let name = slot.name().to_ascii_uppercase();
        let set = match uv_set_for(key, slot) {
            Some(UvSet::Uv1) => 1,
            _ => 0,
        };
        defines.push(format!("HAS_{name}_TEXTURE"));
        defines.push(format!("{name}_UV {set}"));
    }
    defines
}

impl VariantCompiler for GeneratingCompiler {
    fn name(&self) -> &'static str {
        GENERATOR_STRATEGY
    }

    fn compile(&mut self, key: &MaterialKey) -> Result<ShadingProgram, CompileError> {
        let canonical = self.constrain(key);
        if let Some(budget) = self.config.program_budget
            && !self.built.contains(&canonical)
            && self.built.len() >= budget
        {
            return Err(CompileError::BudgetExhausted { budget });
        }
        if canonical != *key {
            log::debug!("generator canonicalized [{key}] to [{canonical}]");
        }

        let defines = shader_defines(&canonical);
        let mut source: String = defines.iter().map(|d| format!("#define {d}\n")).collect();
        source.push_str(SURFACE_TEMPLATE);

        let parameters = ParameterLayout::new()
            .build(&canonical, canonical.enabled_textures().map(|(slot, _)| slot));

        self.built.insert(canonical);
        self.compiled += 1;
        Ok(ShadingProgram::new(
            format!("generated [{canonical}]"),
            GENERATOR_STRATEGY,
            canonical,
            source.into(),
            resolve_uv_map(&canonical),
        )
        .with_defines(defines)
        .with_parameters(parameters))
    }

    fn needs_placeholder(&self, _attribute: VertexAttributeSemantic) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::TextureSlot;

    #[test]
    fn defines_describe_key() {
        let key = MaterialKey::new()
            .with_alpha_mode(AlphaMode::Mask)
            .with_feature(MaterialFeatures::DOUBLE_SIDED | MaterialFeatures::VERTEX_COLORS)
            .with_texture(TextureSlot::BaseColor, 0)
            .with_texture(TextureSlot::Normal, 1);
        assert_eq!(
            shader_defines(&key),
            vec![
                "SHADING_LIT",
                "BLENDING_MASKED",
                "DOUBLE_SIDED",
                "HAS_VERTEX_COLORS",
                "HAS_BASE_COLOR_TEXTURE",
                "BASE_COLOR_UV 0",
                "HAS_NORMAL_TEXTURE",
                "NORMAL_UV 1",
            ]
        );
    }

    #[test]
    fn full_key_is_honored() {
        let key = MaterialKey::new()
            .with_feature(
                MaterialFeatures::DIAGNOSTICS
                    | MaterialFeatures::SHEEN
                    | MaterialFeatures::TRANSMISSION,
            )
            .with_alpha_mode(AlphaMode::Mask)
            .with_texture(TextureSlot::SheenColor, 0)
            .with_texture(TextureSlot::Transmission, 1);
        let program = GeneratingCompiler::default().compile(&key).unwrap();
        assert_eq!(*program.key(), key);
        assert!(program.has_define("ENABLE_DIAGNOSTICS"));
        assert!(program.has_define("HAS_SHEEN"));
        assert!(program.source().contains("#define TRANSMISSION_UV 1\n"));
        assert!(program.find_parameter("sheen_color_texture").is_some());
        assert!(program.find_parameter("normal_texture").is_none());
    }

    #[test]
    fn sampler_limit_drops_trailing_slots() {
        let mut compiler =
            GeneratingCompiler::new(GeneratorConfig::default().with_max_samplers(2));
        let key = MaterialKey::new()
            .with_texture(TextureSlot::BaseColor, 0)
            .with_texture(TextureSlot::Normal, 0)
            .with_texture(TextureSlot::Emissive, 1);
        let program = compiler.compile(&key).unwrap();
        assert_eq!(program.key().texture_count(), 2);
        assert!(!program.key().has_texture(TextureSlot::Emissive));
        assert_eq!(program.uv_map()[1], UvSet::Unused);
    }

    #[test]
    fn budget_is_hard_failure() {
        let mut compiler =
            GeneratingCompiler::new(GeneratorConfig::default().with_program_budget(1));
        assert!(compiler.compile(&MaterialKey::new()).is_ok());
        assert_eq!(
            compiler
                .compile(&MaterialKey::new().with_feature(MaterialFeatures::UNLIT))
                .unwrap_err(),
            CompileError::BudgetExhausted { budget: 1 }
        );
        assert_eq!(compiler.compiled_count(), 1);
    }

    #[test]
    fn budget_charges_distinct_canonical_keys() {
        let mut compiler =
            GeneratingCompiler::new(GeneratorConfig::default().with_program_budget(1));
        let base = MaterialKey::new().with_texture(TextureSlot::BaseColor, 0);
        let stale = base
            .with_texture(TextureSlot::Normal, 5)
            .without_texture(TextureSlot::Normal);

        compiler.compile(&base).unwrap();
        let again = compiler.compile(&stale).unwrap();
        assert_eq!(*again.key(), base);
        assert_eq!(compiler.compiled_count(), 2);
        assert!(compiler.compile(&MaterialKey::new()).is_err());
    }

    #[test]
    fn compiling_canonical_key_is_stable() {
        let mut compiler =
            GeneratingCompiler::new(GeneratorConfig::default().with_max_samplers(1));
        let key = MaterialKey::new()
            .with_feature(MaterialFeatures::UNLIT)
            .with_texture(TextureSlot::BaseColor, 2)
            .with_texture(TextureSlot::Occlusion, 0);
        let first = compiler.compile(&key).unwrap();
        let second = compiler.compile(first.key()).unwrap();
        assert_eq!(first.key(), second.key());
        assert_eq!(first.source(), second.source());
    }

    #[test]
    fn no_placeholders() {
        let compiler = GeneratingCompiler::default();
        for attribute in VertexAttributeSemantic::ALL {
            assert!(!compiler.needs_placeholder(attribute));
        }
    }
}

//! Ubershader strategy: a fixed catalogue of precompiled variants.
//!
//! Every material is served by one of a small number of prebuilt programs
//! selected by shading model, blending, and at most one lit extension.
//! Texture presence is a runtime decision inside the ubershader, so programs
//! built from the same catalogue entry share a single source blob and have
//! identical parameter layouts.
//!
//! # Down-grading
//!
//! Requests are mapped to the nearest catalogue entry:
//!
//! 1. Diagnostics are not shipped and are cleared.
//! 2. Transmission wins over sheen when both are requested.
//! 3. Candidates are tried keeping the shading model, then the extension,
//!    then the alpha mode: alpha coarsens `Mask → Blend → Opaque` before the
//!    extension is dropped, and specular-glossiness falls back to lit last.
//! 4. No candidate at all is a [`CompileError::UnsupportedVariant`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::attribute::VertexAttributeSemantic;
use crate::error::CompileError;
use crate::material::{
    AlphaMode, MaterialFeatures, MaterialKey, ParameterLayout, ShadingProgram, TextureSlot,
    resolve_uv_map,
};

use super::compiler::VariantCompiler;

/// Strategy name reported by [`UbershaderCompiler`].
pub const UBERSHADER_STRATEGY: &str = "ubershader";

const UBERSHADER_TEMPLATE: &str = "\
// Runtime-branching glTF ubershader. Texture slots are sampled through
// `*_uv_set` uniforms selecting the UV0 or UV1 stream; unbound slots sample a
// 1x1 placeholder texture.
#include \"gltf/surface.fs\"
#include \"gltf/lighting.fs\"
";

/// Shading model of a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shading {
    /// Metallic-roughness PBR.
    Lit,
    /// `KHR_materials_unlit`.
    Unlit,
    /// `KHR_materials_pbrSpecularGlossiness`.
    SpecularGlossiness,
}

/// Lit extension baked into a catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// `KHR_materials_sheen`.
    Sheen,
    /// `KHR_materials_transmission`.
    Transmission,
}

/// One precompiled ubershader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UbershaderVariant {
    /// Shading model.
    pub shading: Shading,
    /// Blending configuration.
    pub blending: AlphaMode,
    /// Optional lit extension.
    pub extension: Option<Extension>,
}

impl UbershaderVariant {
    /// Create a variant without extension.
    pub fn new(shading: Shading, blending: AlphaMode) -> Self {
        Self {
            shading,
            blending,
            extension: None,
        }
    }

    /// Set the extension.
    #[must_use]
    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension = Some(extension);
        self
    }

    /// The variant a key would ideally use.
    pub fn for_key(key: &MaterialKey) -> Self {
        let shading = if key.has_feature(MaterialFeatures::UNLIT) {
            Shading::Unlit
        } else if key.has_feature(MaterialFeatures::SPECULAR_GLOSSINESS) {
            Shading::SpecularGlossiness
        } else {
            Shading::Lit
        };
        let extension = if key.has_feature(MaterialFeatures::TRANSMISSION) {
            Some(Extension::Transmission)
        } else if key.has_feature(MaterialFeatures::SHEEN) {
            Some(Extension::Sheen)
        } else {
            None
        };
        Self {
            shading,
            blending: key.alpha_mode,
            extension,
        }
    }

    /// Archive name, e.g. `lit_opaque` or `lit_sheen_blend`.
    pub fn name(&self) -> String {
        let shading = match self.shading {
            Shading::Lit => "lit",
            Shading::Unlit => "unlit",
            Shading::SpecularGlossiness => "specgloss",
        };
        let blending = match self.blending {
            AlphaMode::Opaque => "opaque",
            AlphaMode::Mask => "masked",
            AlphaMode::Blend => "blend",
        };
        match self.extension {
            Some(Extension::Sheen) => format!("{shading}_sheen_{blending}"),
            Some(Extension::Transmission) => format!("{shading}_transmission_{blending}"),
            None => format!("{shading}_{blending}"),
        }
    }

    /// Reduce a key to what this variant honors.
    fn constrain(&self, mut key: MaterialKey) -> MaterialKey {
        key.alpha_mode = self.blending;
        if self.shading == Shading::Lit {
            key.features
                .remove(MaterialFeatures::UNLIT | MaterialFeatures::SPECULAR_GLOSSINESS);
        }
        match self.extension {
            None => key
                .features
                .remove(MaterialFeatures::SHEEN | MaterialFeatures::TRANSMISSION),
            Some(Extension::Sheen) => key.features.remove(MaterialFeatures::TRANSMISSION),
            Some(Extension::Transmission) => key.features.remove(MaterialFeatures::SHEEN),
        }
        key.canonicalize()
    }

    /// Features the variant's program supports; drives its parameter layout.
    fn layout_key(&self) -> MaterialKey {
        let features = match self.shading {
            Shading::Unlit => MaterialFeatures::UNLIT,
            Shading::SpecularGlossiness => MaterialFeatures::SPECULAR_GLOSSINESS,
            Shading::Lit => {
                let extension = match self.extension {
                    Some(Extension::Sheen) => MaterialFeatures::SHEEN,
                    Some(Extension::Transmission) => MaterialFeatures::TRANSMISSION,
                    None => MaterialFeatures::empty(),
                };
                MaterialFeatures::CLEAR_COAT | MaterialFeatures::IOR | extension
            }
        };
        MaterialKey::new()
            .with_feature(features | MaterialFeatures::TEXTURE_TRANSFORMS)
            .with_alpha_mode(self.blending)
    }

    /// Texture slots the variant samples.
    fn texture_slots(&self) -> Vec<TextureSlot> {
        let count = match self.shading {
            Shading::Unlit => 1,
            Shading::SpecularGlossiness => 5,
            Shading::Lit => 8,
        };
        let mut slots = TextureSlot::ALL[..count].to_vec();
        match self.extension {
            Some(Extension::Sheen) => {
                slots.extend([TextureSlot::SheenColor, TextureSlot::SheenRoughness]);
            }
            Some(Extension::Transmission) => slots.push(TextureSlot::Transmission),
            None => {}
        }
        slots
    }

    fn defines(&self) -> Vec<String> {
        let mut defines = vec![
            match self.shading {
                Shading::Lit => "SHADING_LIT",
                Shading::Unlit => "SHADING_UNLIT",
                Shading::SpecularGlossiness => "SHADING_SPECULAR_GLOSSINESS",
            }
            .to_owned(),
            match self.blending {
                AlphaMode::Opaque => "BLENDING_OPAQUE",
                AlphaMode::Mask => "BLENDING_MASKED",
                AlphaMode::Blend => "BLENDING_TRANSPARENT",
            }
            .to_owned(),
        ];
        match self.extension {
            Some(Extension::Sheen) => defines.push("HAS_SHEEN".to_owned()),
            Some(Extension::Transmission) => defines.push("HAS_TRANSMISSION".to_owned()),
            None => {}
        }
        defines
    }
}

fn shading_fallbacks(shading: Shading) -> &'static [Shading] {
    match shading {
        Shading::Lit => &[Shading::Lit],
        Shading::Unlit => &[Shading::Unlit],
        Shading::SpecularGlossiness => &[Shading::SpecularGlossiness, Shading::Lit],
    }
}

fn blending_fallbacks(blending: AlphaMode) -> &'static [AlphaMode] {
    match blending {
        AlphaMode::Opaque => &[AlphaMode::Opaque],
        AlphaMode::Mask => &[AlphaMode::Mask, AlphaMode::Blend, AlphaMode::Opaque],
        AlphaMode::Blend => &[AlphaMode::Blend, AlphaMode::Opaque],
    }
}

/// The set of precompiled variants an [`UbershaderCompiler`] can serve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UbershaderCatalog {
    variants: Vec<UbershaderVariant>,
}

impl UbershaderCatalog {
    /// The standard catalogue.
    ///
    /// - Lit, unlit, and specular-glossiness, each opaque, masked, and blended.
    /// - Lit sheen and lit transmission, each opaque and blended.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        for shading in [Shading::Lit, Shading::Unlit, Shading::SpecularGlossiness] {
            for blending in [AlphaMode::Opaque, AlphaMode::Mask, AlphaMode::Blend] {
                catalog = catalog.with_variant(UbershaderVariant::new(shading, blending));
            }
        }
        for extension in [Extension::Sheen, Extension::Transmission] {
            for blending in [AlphaMode::Opaque, AlphaMode::Blend] {
                catalog = catalog.with_variant(
                    UbershaderVariant::new(Shading::Lit, blending).with_extension(extension),
                );
            }
        }
        catalog
    }

    /// Create an empty catalogue.
    pub fn empty() -> Self {
        Self {
            variants: Vec::new(),
        }
    }

    /// Add a variant.
    #[must_use]
    pub fn with_variant(mut self, variant: UbershaderVariant) -> Self {
        if !self.contains(&variant) {
            self.variants.push(variant);
        }
        self
    }

    /// Remove a variant.
    #[must_use]
    pub fn without_variant(mut self, variant: UbershaderVariant) -> Self {
        self.variants.retain(|v| *v != variant);
        self
    }

    /// Whether the catalogue ships this variant.
    pub fn contains(&self, variant: &UbershaderVariant) -> bool {
        self.variants.contains(variant)
    }

    /// All variants.
    pub fn variants(&self) -> &[UbershaderVariant] {
        &self.variants
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Check if the catalogue is empty.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Closest shipped variant to `desired`, following the module-level
    /// fallback order.
    pub fn nearest(&self, desired: UbershaderVariant) -> Option<UbershaderVariant> {
        let extensions = [desired.extension, None];
        let extensions = if desired.extension.is_some() {
            &extensions[..]
        } else {
            &extensions[1..]
        };
        for &shading in shading_fallbacks(desired.shading) {
            for &extension in extensions {
                if extension.is_some() && shading != Shading::Lit {
                    continue;
                }
                for &blending in blending_fallbacks(desired.blending) {
                    let candidate = UbershaderVariant {
                        shading,
                        blending,
                        extension,
                    };
                    if self.contains(&candidate) {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}

impl Default for UbershaderCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Serves every material from a fixed [`UbershaderCatalog`].
///
/// Ubershaders sample both UV streams and vertex colors unconditionally, so
/// meshes must provide placeholders when the glTF primitive lacks them.
#[derive(Debug, Default)]
pub struct UbershaderCompiler {
    catalog: UbershaderCatalog,
    sources: HashMap<UbershaderVariant, Arc<str>>,
}

impl UbershaderCompiler {
    /// Create a compiler over a catalogue.
    pub fn new(catalog: UbershaderCatalog) -> Self {
        Self {
            catalog,
            sources: HashMap::new(),
        }
    }

    /// Create a compiler over the standard catalogue.
    pub fn standard() -> Self {
        Self::new(UbershaderCatalog::standard())
    }

    /// The catalogue in use.
    pub fn catalog(&self) -> &UbershaderCatalog {
        &self.catalog
    }

    /// Source blob of a variant, loaded once.
    fn source(&mut self, variant: UbershaderVariant) -> Arc<str> {
        let source = self.sources.entry(variant).or_insert_with(|| {
            log::debug!("loading ubershader archive {}", variant.name());
            Arc::from(format!(
                "// archive: {}\n{UBERSHADER_TEMPLATE}",
                variant.name()
            ))
        });
        Arc::clone(source)
    }
}

impl VariantCompiler for UbershaderCompiler {
    fn name(&self) -> &'static str {
        UBERSHADER_STRATEGY
    }

    fn compile(&mut self, key: &MaterialKey) -> Result<ShadingProgram, CompileError> {
        let mut requested = key.canonicalize();
        requested.features.remove(MaterialFeatures::DIAGNOSTICS);
        if requested.has_feature(MaterialFeatures::TRANSMISSION | MaterialFeatures::SHEEN) {
            requested.features.remove(MaterialFeatures::SHEEN);
            requested = requested.canonicalize();
        }

        let desired = UbershaderVariant::for_key(&requested);
        let variant = self.catalog.nearest(desired).ok_or_else(|| {
            CompileError::UnsupportedVariant(format!("{} ({key})", desired.name()))
        })?;

        let canonical = variant.constrain(requested);
        if canonical != *key {
            log::debug!("ubershader down-graded [{key}] to [{canonical}]");
        }

        let layout_key = variant.layout_key();
        let parameters = ParameterLayout::new().build(&layout_key, variant.texture_slots());
        Ok(ShadingProgram::new(
            variant.name(),
            UBERSHADER_STRATEGY,
            canonical,
            self.source(variant),
            resolve_uv_map(&canonical),
        )
        .with_defines(variant.defines())
        .with_parameters(parameters))
    }

    fn needs_placeholder(&self, attribute: VertexAttributeSemantic) -> bool {
        matches!(
            attribute,
            VertexAttributeSemantic::TexCoord0
                | VertexAttributeSemantic::TexCoord1
                | VertexAttributeSemantic::Color
        )
    }
}

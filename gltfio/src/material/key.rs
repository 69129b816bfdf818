//! Material requirement keys.
//!
//! A [`MaterialKey`] records everything a shading program must support for
//! one glTF material. Keys compare and hash by value, so two keys built from
//! different materials with the same requirements share a cached program.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Feature flags of a glTF material that select the shading program.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MaterialFeatures: u16 {
        /// Back faces are rendered (`doubleSided`).
        const DOUBLE_SIDED = 1 << 0;
        /// `KHR_materials_unlit`.
        const UNLIT = 1 << 1;
        /// The primitive carries `COLOR_0`.
        const VERTEX_COLORS = 1 << 2;
        /// `KHR_materials_pbrSpecularGlossiness` workflow.
        const SPECULAR_GLOSSINESS = 1 << 3;
        /// `KHR_materials_clearcoat`.
        const CLEAR_COAT = 1 << 4;
        /// `KHR_materials_transmission`.
        const TRANSMISSION = 1 << 5;
        /// `KHR_materials_sheen`.
        const SHEEN = 1 << 6;
        /// `KHR_materials_ior`.
        const IOR = 1 << 7;
        /// At least one texture uses `KHR_texture_transform`.
        const TEXTURE_TRANSFORMS = 1 << 8;
        /// Debug visualisation support.
        const DIAGNOSTICS = 1 << 9;
    }
}

impl MaterialFeatures {
    /// Extensions that only make sense on the lit metallic-roughness model.
    pub const LIT_EXTENSIONS: Self = Self::CLEAR_COAT
        .union(Self::TRANSMISSION)
        .union(Self::SHEEN)
        .union(Self::IOR);
}

/// Alpha rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaMode {
    /// Fully opaque (alpha ignored).
    #[default]
    Opaque,
    /// Alpha masking with a cutoff threshold.
    Mask,
    /// Full alpha blending.
    Blend,
}

/// Optional texture slots of a glTF material.
///
/// The declaration order is significant: UV channels are assigned to
/// hardware UV sets in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureSlot {
    /// Base color (or diffuse, for specular-glossiness).
    BaseColor,
    /// Metallic-roughness (or specular-glossiness).
    MetallicRoughness,
    /// Tangent-space normal map.
    Normal,
    /// Ambient occlusion.
    Occlusion,
    /// Emissive color.
    Emissive,
    /// Clear-coat intensity.
    ClearCoat,
    /// Clear-coat roughness.
    ClearCoatRoughness,
    /// Clear-coat normal map.
    ClearCoatNormal,
    /// Sheen color.
    SheenColor,
    /// Sheen roughness.
    SheenRoughness,
    /// Transmission factor.
    Transmission,
}

/// Groups of texture slots that usually share a UV channel in authored assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureCategory {
    /// Base color, metallic-roughness, occlusion, emissive.
    Surface,
    /// Normal and clear-coat normal maps.
    Normal,
    /// Clear-coat intensity and roughness.
    ClearCoat,
    /// Sheen color and roughness.
    Sheen,
    /// Transmission.
    Transmission,
}

impl TextureSlot {
    /// Number of texture slots.
    pub const COUNT: usize = 11;

    /// All slots in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::BaseColor,
        Self::MetallicRoughness,
        Self::Normal,
        Self::Occlusion,
        Self::Emissive,
        Self::ClearCoat,
        Self::ClearCoatRoughness,
        Self::ClearCoatNormal,
        Self::SheenColor,
        Self::SheenRoughness,
        Self::Transmission,
    ];

    /// Position of this slot in [`TextureSlot::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case name, used for parameter names and shader defines.
    pub fn name(self) -> &'static str {
        match self {
            Self::BaseColor => "base_color",
            Self::MetallicRoughness => "metallic_roughness",
            Self::Normal => "normal",
            Self::Occlusion => "occlusion",
            Self::Emissive => "emissive",
            Self::ClearCoat => "clear_coat",
            Self::ClearCoatRoughness => "clear_coat_roughness",
            Self::ClearCoatNormal => "clear_coat_normal",
            Self::SheenColor => "sheen_color",
            Self::SheenRoughness => "sheen_roughness",
            Self::Transmission => "transmission",
        }
    }

    /// Category used when aliasing surplus UV channels.
    pub fn category(self) -> TextureCategory {
        match self {
            Self::BaseColor | Self::MetallicRoughness | Self::Occlusion | Self::Emissive => {
                TextureCategory::Surface
            }
            Self::Normal | Self::ClearCoatNormal => TextureCategory::Normal,
            Self::ClearCoat | Self::ClearCoatRoughness => TextureCategory::ClearCoat,
            Self::SheenColor | Self::SheenRoughness => TextureCategory::Sheen,
            Self::Transmission => TextureCategory::Transmission,
        }
    }

    /// Feature flag a slot depends on, if any.
    fn required_feature(self) -> Option<MaterialFeatures> {
        match self {
            Self::ClearCoat | Self::ClearCoatRoughness | Self::ClearCoatNormal => {
                Some(MaterialFeatures::CLEAR_COAT)
            }
            Self::SheenColor | Self::SheenRoughness => Some(MaterialFeatures::SHEEN),
            Self::Transmission => Some(MaterialFeatures::TRANSMISSION),
            _ => None,
        }
    }
}

/// Presence flag and UV channel of one texture slot.
///
/// The UV channel of a disabled slot is kept as authored; it takes part in
/// key equality but never in UV resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureBinding {
    /// Whether the material samples this texture.
    pub enabled: bool,
    /// glTF `texCoord` index.
    pub uv: u8,
}

/// Requirements of one glTF material.
///
/// # Example
///
/// ```
/// use redlilium_gltfio::{AlphaMode, MaterialFeatures, MaterialKey, TextureSlot};
///
/// let key = MaterialKey::new()
///     .with_alpha_mode(AlphaMode::Mask)
///     .with_feature(MaterialFeatures::DOUBLE_SIDED)
///     .with_texture(TextureSlot::BaseColor, 0);
///
/// assert_eq!(key.texture(TextureSlot::BaseColor), Some(0));
/// assert_eq!(key.texture(TextureSlot::Normal), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MaterialKey {
    /// Feature flags.
    pub features: MaterialFeatures,
    /// Alpha rendering mode.
    pub alpha_mode: AlphaMode,
    /// Texture slots, indexed by [`TextureSlot::index`].
    pub textures: [TextureBinding; TextureSlot::COUNT],
}

impl MaterialKey {
    /// Creates an opaque, single-sided, untextured lit key.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add feature flags.
    #[must_use]
    pub fn with_feature(mut self, features: MaterialFeatures) -> Self {
        self.features.insert(features);
        self
    }

    /// Set the alpha rendering mode.
    #[must_use]
    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    /// Enable a texture slot sampling the given glTF UV channel.
    #[must_use]
    pub fn with_texture(mut self, slot: TextureSlot, uv: u8) -> Self {
        self.textures[slot.index()] = TextureBinding { enabled: true, uv };
        self
    }

    /// Disable a texture slot, keeping its UV channel.
    #[must_use]
    pub fn without_texture(mut self, slot: TextureSlot) -> Self {
        self.disable_texture(slot);
        self
    }

    /// Check a feature flag.
    pub fn has_feature(&self, features: MaterialFeatures) -> bool {
        self.features.contains(features)
    }

    /// Whether the slot is enabled.
    pub fn has_texture(&self, slot: TextureSlot) -> bool {
        self.textures[slot.index()].enabled
    }

    /// UV channel of an enabled slot.
    pub fn texture(&self, slot: TextureSlot) -> Option<u8> {
        let binding = self.textures[slot.index()];
        binding.enabled.then_some(binding.uv)
    }

    /// Raw binding of a slot, enabled or not.
    pub fn binding(&self, slot: TextureSlot) -> TextureBinding {
        self.textures[slot.index()]
    }

    /// Disable a texture slot in place.
    pub fn disable_texture(&mut self, slot: TextureSlot) {
        self.textures[slot.index()].enabled = false;
    }

    /// Enabled slots with their UV channels, in declaration order.
    pub fn enabled_textures(&self) -> impl Iterator<Item = (TextureSlot, u8)> + '_ {
        TextureSlot::ALL
            .into_iter()
            .filter_map(|slot| self.texture(slot).map(|uv| (slot, uv)))
    }

    /// Number of enabled slots.
    pub fn texture_count(&self) -> usize {
        self.textures.iter().filter(|t| t.enabled).count()
    }

    /// Drop requirements that cannot take effect.
    ///
    /// - Unlit materials keep only the base color texture and no lit extensions.
    /// - Specular-glossiness materials carry no lit extensions.
    /// - Extension textures require their extension flag.
    /// - Texture transforms require at least one texture.
    /// - Disabled slots reset their UV channel to 0.
    ///
    /// The result is a fixed point: canonicalizing twice changes nothing.
    #[must_use]
    pub fn canonicalize(mut self) -> Self {
        if self.has_feature(MaterialFeatures::UNLIT) {
            self.features
                .remove(MaterialFeatures::SPECULAR_GLOSSINESS | MaterialFeatures::LIT_EXTENSIONS);
            for slot in TextureSlot::ALL {
                if slot != TextureSlot::BaseColor {
                    self.disable_texture(slot);
                }
            }
        } else if self.has_feature(MaterialFeatures::SPECULAR_GLOSSINESS) {
            self.features.remove(MaterialFeatures::LIT_EXTENSIONS);
        }

        for slot in TextureSlot::ALL {
            if let Some(feature) = slot.required_feature()
                && !self.features.contains(feature)
            {
                self.disable_texture(slot);
            }
        }

        if self.texture_count() == 0 {
            self.features.remove(MaterialFeatures::TEXTURE_TRANSFORMS);
        }

        for binding in &mut self.textures {
            if !binding.enabled {
                binding.uv = 0;
            }
        }
        self
    }
}

impl fmt::Display for MaterialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shading = if self.has_feature(MaterialFeatures::UNLIT) {
            "unlit"
        } else if self.has_feature(MaterialFeatures::SPECULAR_GLOSSINESS) {
            "specgloss"
        } else {
            "lit"
        };
        write!(f, "{shading} {:?}", self.alpha_mode)?;
        for (name, _) in self.features.iter_names() {
            write!(f, " {}", name.to_ascii_lowercase())?;
        }
        write!(f, " [")?;
        for (i, (slot, uv)) in self.enabled_textures().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}@{uv}", slot.name())?;
        }
        write!(f, "]")
    }
}

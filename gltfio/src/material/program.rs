//! Compiled shading programs and their parameter layouts.
//!
//! A [`ShadingProgram`] is produced by a
//! [`VariantCompiler`](crate::provider::VariantCompiler) for one canonical
//! [`MaterialKey`]. Programs are shared via `Arc` across every
//! [`ProgramInstance`](super::ProgramInstance) that uses the same variant.

use std::sync::Arc;

use super::key::{AlphaMode, MaterialFeatures, MaterialKey, TextureSlot};
use super::uv::UvMap;

/// Type of value expected by a program parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    /// Single f32 value.
    Float,
    /// 3-component float vector.
    Vec3,
    /// 4-component float vector.
    Vec4,
    /// Column-major 3x3 matrix (UV transforms).
    Mat3,
    /// Texture reference.
    Texture,
}

/// Reference to a glTF texture and sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureRef {
    /// Index into the document's texture array.
    pub texture: usize,
    /// Index into the document's sampler array.
    pub sampler: Option<usize>,
}

/// A typed parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialValue {
    /// Single float (metallic, roughness, normal scale, ...).
    Float(f32),
    /// 3-component vector (emissive factor, sheen color).
    Vec3([f32; 3]),
    /// 4-component vector (base color factor).
    Vec4([f32; 4]),
    /// 3x3 matrix, column-major.
    Mat3([[f32; 3]; 3]),
    /// Texture binding; `None` samples the strategy's placeholder texture.
    Texture(Option<TextureRef>),
}

impl MaterialValue {
    /// The type of this value.
    pub fn value_type(&self) -> ParameterType {
        match self {
            Self::Float(_) => ParameterType::Float,
            Self::Vec3(_) => ParameterType::Vec3,
            Self::Vec4(_) => ParameterType::Vec4,
            Self::Mat3(_) => ParameterType::Mat3,
            Self::Texture(_) => ParameterType::Texture,
        }
    }
}

/// 3x3 identity, the default UV transform.
pub const IDENTITY_MAT3: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Describes one parameter slot of a [`ShadingProgram`].
///
/// Scalar and vector parameters share uniform binding 0. Each texture gets
/// its own binding, assigned incrementally from 1.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    /// Parameter name (e.g. "base_color_factor", "normal_texture").
    pub name: String,
    /// Expected value type.
    pub value_type: ParameterType,
    /// GPU binding slot index.
    pub binding: u32,
    /// Value new instances start with (glTF defaults).
    pub default: MaterialValue,
}

/// Builds ordered parameter lists.
#[derive(Debug)]
pub(crate) struct ParameterLayout {
    params: Vec<ParameterDef>,
    next_texture_binding: u32,
}

impl ParameterLayout {
    pub(crate) fn new() -> Self {
        Self {
            params: Vec::new(),
            next_texture_binding: 1,
        }
    }

    fn uniform(&mut self, name: &str, default: MaterialValue) {
        self.params.push(ParameterDef {
            name: name.into(),
            value_type: default.value_type(),
            binding: 0,
            default,
        });
    }

    fn texture(&mut self, slot: TextureSlot, transforms: bool) {
        self.params.push(ParameterDef {
            name: format!("{}_texture", slot.name()),
            value_type: ParameterType::Texture,
            binding: self.next_texture_binding,
            default: MaterialValue::Texture(None),
        });
        self.next_texture_binding += 1;
        if transforms {
            self.uniform(
                &format!("{}_uv_transform", slot.name()),
                MaterialValue::Mat3(IDENTITY_MAT3),
            );
        }
    }

    /// Parameters for the features present in `key`, with one texture
    /// parameter per slot in `slots`.
    ///
    /// | Condition | Parameters |
    /// |-----------|------------|
    /// | always | `base_color_factor` |
    /// | lit | `emissive_factor`, `normal_scale`, `occlusion_strength` |
    /// | metallic-roughness | `metallic_factor`, `roughness_factor` |
    /// | specular-glossiness | `specular_factor`, `glossiness_factor` |
    /// | mask | `alpha_cutoff` |
    /// | extensions | clear coat, sheen, transmission, ior factors |
    pub(crate) fn build(
        mut self,
        key: &MaterialKey,
        slots: impl IntoIterator<Item = TextureSlot>,
    ) -> Vec<ParameterDef> {
        use MaterialValue::*;

        self.uniform("base_color_factor", Vec4([1.0; 4]));

        if !key.has_feature(MaterialFeatures::UNLIT) {
            if key.has_feature(MaterialFeatures::SPECULAR_GLOSSINESS) {
                self.uniform("specular_factor", Vec3([1.0; 3]));
                self.uniform("glossiness_factor", Float(1.0));
            } else {
                self.uniform("metallic_factor", Float(1.0));
                self.uniform("roughness_factor", Float(1.0));
            }
            self.uniform("emissive_factor", Vec3([0.0; 3]));
            self.uniform("normal_scale", Float(1.0));
            self.uniform("occlusion_strength", Float(1.0));
        }

        if key.alpha_mode == AlphaMode::Mask {
            self.uniform("alpha_cutoff", Float(0.5));
        }

        if key.has_feature(MaterialFeatures::CLEAR_COAT) {
            self.uniform("clear_coat_factor", Float(0.0));
            self.uniform("clear_coat_roughness_factor", Float(0.0));
            self.uniform("clear_coat_normal_scale", Float(1.0));
        }
        if key.has_feature(MaterialFeatures::SHEEN) {
            self.uniform("sheen_color_factor", Vec3([0.0; 3]));
            self.uniform("sheen_roughness_factor", Float(0.0));
        }
        if key.has_feature(MaterialFeatures::TRANSMISSION) {
            self.uniform("transmission_factor", Float(0.0));
        }
        if key.has_feature(MaterialFeatures::IOR) {
            self.uniform("ior", Float(1.5));
        }

        let transforms = key.has_feature(MaterialFeatures::TEXTURE_TRANSFORMS);
        for slot in slots {
            self.texture(slot, transforms);
        }
        self.params
    }
}

/// A compiled, shareable shading program for one canonical key.
#[derive(Debug, Clone)]
pub struct ShadingProgram {
    name: String,
    strategy: &'static str,
    key: MaterialKey,
    source: Arc<str>,
    defines: Vec<String>,
    uv_map: UvMap,
    parameters: Vec<ParameterDef>,
}

impl ShadingProgram {
    /// Assemble a program. Called by compilers.
    pub fn new(
        name: impl Into<String>,
        strategy: &'static str,
        key: MaterialKey,
        source: Arc<str>,
        uv_map: UvMap,
    ) -> Self {
        Self {
            name: name.into(),
            strategy,
            key,
            source,
            defines: Vec::new(),
            uv_map,
            parameters: Vec::new(),
        }
    }

    /// Set the shader defines.
    #[must_use]
    pub fn with_defines(mut self, defines: Vec<String>) -> Self {
        self.defines = defines;
        self
    }

    /// Set the parameter layout.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<ParameterDef>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Debug name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the compiler strategy that built this program.
    pub fn strategy(&self) -> &'static str {
        self.strategy
    }

    /// The canonical key this program satisfies.
    pub fn key(&self) -> &MaterialKey {
        &self.key
    }

    /// Shader source. Programs from the same ubershader variant share it.
    pub fn source(&self) -> &Arc<str> {
        &self.source
    }

    /// Preprocessor defines in force.
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Whether a define is set (ignoring its value).
    pub fn has_define(&self, name: &str) -> bool {
        self.defines
            .iter()
            .any(|d| d.split_whitespace().next() == Some(name))
    }

    /// UV map the program was compiled against.
    pub fn uv_map(&self) -> &UvMap {
        &self.uv_map
    }

    /// Ordered parameter layout.
    pub fn parameters(&self) -> &[ParameterDef] {
        &self.parameters
    }

    /// Find a parameter by name.
    pub fn find_parameter(&self, name: &str) -> Option<(usize, &ParameterDef)> {
        self.parameters
            .iter()
            .enumerate()
            .find(|(_, p)| p.name == name)
    }
}

// Ensure ShadingProgram is Send + Sync
static_assertions::assert_impl_all!(ShadingProgram: Send, Sync);

//! glTF 2.0 material key extraction.
//!
//! Reads the requirements of each glTF material into a [`MaterialKey`]:
//! core PBR textures with their `texCoord`, alpha mode, double-sidedness,
//! and the material extensions the providers understand.
//!
//! `KHR_materials_clearcoat` and `KHR_materials_sheen` are read from the raw
//! extension JSON. A `KHR_texture_transform` on any texture sets
//! [`MaterialFeatures::TEXTURE_TRANSFORMS`].
//!
//! Vertex colors belong to the mesh, not the material; use
//! [`material_key_for_primitive`] to include them.
//!
//! # Example
//!
//! ```
//! use redlilium_gltfio::gltf::load_material_keys;
//! use redlilium_gltfio::{AlphaMode, MaterialFeatures};
//!
//! let json = br#"{
//!     "asset": { "version": "2.0" },
//!     "materials": [{ "alphaMode": "MASK", "doubleSided": true }]
//! }"#;
//! let keys = load_material_keys(json).unwrap();
//! assert_eq!(keys[0].alpha_mode, AlphaMode::Mask);
//! assert!(keys[0].has_feature(MaterialFeatures::DOUBLE_SIDED));
//! ```

mod error;
#[cfg(test)]
mod tests;

pub use error::GltfError;

use gltf_dep::texture::Info;
use gltf_dep::{Document, Gltf, Material, Primitive, Semantic};
use serde_json::Value;

use crate::material::{AlphaMode, MaterialFeatures, MaterialKey, TextureSlot};

const TEXTURE_TRANSFORM: &str = "KHR_texture_transform";

/// Parse a `.gltf` or `.glb` slice and extract one key per material, in
/// document order.
pub fn load_material_keys(data: &[u8]) -> Result<Vec<MaterialKey>, GltfError> {
    let gltf = Gltf::from_slice(data)?;
    let keys = material_keys(&gltf.document);
    log::debug!("extracted {} material key(s)", keys.len());
    Ok(keys)
}

/// One key per material, in document order.
pub fn material_keys(document: &Document) -> Vec<MaterialKey> {
    document.materials().map(|m| material_key(&m)).collect()
}

/// One key per mesh primitive, in mesh then primitive order, including
/// vertex colors.
pub fn primitive_keys(document: &Document) -> Vec<MaterialKey> {
    document
        .meshes()
        .flat_map(|mesh| mesh.primitives())
        .map(|primitive| material_key_for_primitive(&primitive))
        .collect()
}

/// Key of the primitive's material, with vertex colors when it has `COLOR_0`.
pub fn material_key_for_primitive(primitive: &Primitive) -> MaterialKey {
    let key = material_key(&primitive.material());
    if primitive.get(&Semantic::Colors(0)).is_some() {
        key.with_feature(MaterialFeatures::VERTEX_COLORS)
    } else {
        key
    }
}

/// Requirements of one glTF material.
pub fn material_key(material: &Material) -> MaterialKey {
    let mut extractor = KeyExtractor::default();

    extractor.key.alpha_mode = match material.alpha_mode() {
        gltf_dep::material::AlphaMode::Opaque => AlphaMode::Opaque,
        gltf_dep::material::AlphaMode::Mask => AlphaMode::Mask,
        gltf_dep::material::AlphaMode::Blend => AlphaMode::Blend,
    };
    if material.double_sided() {
        extractor.feature(MaterialFeatures::DOUBLE_SIDED);
    }

    if material.unlit() {
        extractor.feature(MaterialFeatures::UNLIT);
    }

    if let Some(sg) = material.pbr_specular_glossiness() {
        extractor.feature(MaterialFeatures::SPECULAR_GLOSSINESS);
        extractor.info(TextureSlot::BaseColor, sg.diffuse_texture());
        extractor.info(
            TextureSlot::MetallicRoughness,
            sg.specular_glossiness_texture(),
        );
    } else {
        let pbr = material.pbr_metallic_roughness();
        extractor.info(TextureSlot::BaseColor, pbr.base_color_texture());
        extractor.info(
            TextureSlot::MetallicRoughness,
            pbr.metallic_roughness_texture(),
        );
    }

    if let Some(normal) = material.normal_texture() {
        extractor.texture(
            TextureSlot::Normal,
            normal.tex_coord().into(),
            normal.extension_value(TEXTURE_TRANSFORM).is_some(),
        );
    }
    if let Some(occlusion) = material.occlusion_texture() {
        extractor.texture(
            TextureSlot::Occlusion,
            occlusion.tex_coord().into(),
            occlusion.extension_value(TEXTURE_TRANSFORM).is_some(),
        );
    }
    extractor.info(TextureSlot::Emissive, material.emissive_texture());

    if let Some(transmission) = material.transmission() {
        extractor.feature(MaterialFeatures::TRANSMISSION);
        extractor.info(
            TextureSlot::Transmission,
            transmission.transmission_texture(),
        );
    }
    if material.ior().is_some() {
        extractor.feature(MaterialFeatures::IOR);
    }

    if let Some(clearcoat) = material.extension_value("KHR_materials_clearcoat") {
        extractor.feature(MaterialFeatures::CLEAR_COAT);
        extractor.json(TextureSlot::ClearCoat, clearcoat, "clearcoatTexture");
        extractor.json(
            TextureSlot::ClearCoatRoughness,
            clearcoat,
            "clearcoatRoughnessTexture",
        );
        extractor.json(
            TextureSlot::ClearCoatNormal,
            clearcoat,
            "clearcoatNormalTexture",
        );
    }
    if let Some(sheen) = material.extension_value("KHR_materials_sheen") {
        extractor.feature(MaterialFeatures::SHEEN);
        extractor.json(TextureSlot::SheenColor, sheen, "sheenColorTexture");
        extractor.json(TextureSlot::SheenRoughness, sheen, "sheenRoughnessTexture");
    }

    extractor.finish()
}

#[derive(Default)]
struct KeyExtractor {
    key: MaterialKey,
    transformed: bool,
}

impl KeyExtractor {
    fn feature(&mut self, feature: MaterialFeatures) {
        self.key.features.insert(feature);
    }

    fn texture(&mut self, slot: TextureSlot, tex_coord: u64, transformed: bool) {
        // Saturates; any channel past 7 is outside the UV table anyway.
        let uv = u8::try_from(tex_coord).unwrap_or(u8::MAX);
        self.key = self.key.with_texture(slot, uv);
        self.transformed |= transformed;
    }

    fn info(&mut self, slot: TextureSlot, info: Option<Info>) {
        if let Some(info) = info {
            let transformed = info.texture_transform().is_some();
            self.texture(slot, info.tex_coord().into(), transformed);
        }
    }

    fn json(&mut self, slot: TextureSlot, extension: &Value, field: &str) {
        let Some(info) = extension.get(field) else {
            return;
        };
        let tex_coord = info.get("texCoord").and_then(Value::as_u64).unwrap_or(0);
        let transformed = info
            .get("extensions")
            .and_then(|e| e.get(TEXTURE_TRANSFORM))
            .is_some();
        self.texture(slot, tex_coord, transformed);
    }

    fn finish(mut self) -> MaterialKey {
        if self.transformed {
            self.feature(MaterialFeatures::TEXTURE_TRANSFORMS);
        }
        self.key
    }
}

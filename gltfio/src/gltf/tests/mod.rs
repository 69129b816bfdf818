//! Extraction tests over small inline glTF documents.

use crate::gltf::{GltfError, load_material_keys, primitive_keys};
use crate::material::{AlphaMode, MaterialFeatures, MaterialKey, TextureSlot};

/// Wrap material JSON in a document with one image-backed texture.
fn document(materials: &str) -> String {
    format!(
        r#"{{
            "asset": {{ "version": "2.0" }},
            "extensionsUsed": [
                "KHR_materials_unlit",
                "KHR_materials_pbrSpecularGlossiness",
                "KHR_materials_transmission",
                "KHR_materials_ior",
                "KHR_materials_clearcoat",
                "KHR_materials_sheen",
                "KHR_texture_transform"
            ],
            "images": [{{ "uri": "albedo.png" }}],
            "textures": [{{ "source": 0 }}],
            "materials": [{materials}]
        }}"#
    )
}

fn single_key(material: &str) -> MaterialKey {
    let keys = load_material_keys(document(material).as_bytes()).expect("valid document");
    assert_eq!(keys.len(), 1);
    keys[0]
}

#[test]
fn test_empty_material_is_default_key() {
    assert_eq!(single_key("{}"), MaterialKey::new());
}

#[test]
fn test_core_textures_and_channels() {
    let key = single_key(
        r#"{
            "alphaMode": "BLEND",
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
            "normalTexture": { "index": 0, "texCoord": 1 },
            "occlusionTexture": { "index": 0, "texCoord": 1 },
            "emissiveTexture": { "index": 0, "texCoord": 3 }
        }"#,
    );
    assert_eq!(key.alpha_mode, AlphaMode::Blend);
    assert_eq!(key.texture(TextureSlot::BaseColor), Some(0));
    assert_eq!(key.texture(TextureSlot::MetallicRoughness), None);
    assert_eq!(key.texture(TextureSlot::Normal), Some(1));
    assert_eq!(key.texture(TextureSlot::Occlusion), Some(1));
    assert_eq!(key.texture(TextureSlot::Emissive), Some(3));
    assert!(!key.has_feature(MaterialFeatures::TEXTURE_TRANSFORMS));
}

#[test]
fn test_unlit() {
    let key = single_key(
        r#"{
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
            "extensions": { "KHR_materials_unlit": {} }
        }"#,
    );
    assert!(key.has_feature(MaterialFeatures::UNLIT));
    assert_eq!(key.texture(TextureSlot::BaseColor), Some(0));
}

#[test]
fn test_specular_glossiness_textures() {
    let key = single_key(
        r#"{
            "extensions": {
                "KHR_materials_pbrSpecularGlossiness": {
                    "diffuseTexture": { "index": 0 },
                    "specularGlossinessTexture": { "index": 0, "texCoord": 1 }
                }
            }
        }"#,
    );
    assert!(key.has_feature(MaterialFeatures::SPECULAR_GLOSSINESS));
    assert_eq!(key.texture(TextureSlot::BaseColor), Some(0));
    assert_eq!(key.texture(TextureSlot::MetallicRoughness), Some(1));
}

#[test]
fn test_transmission_ior_and_transform() {
    let key = single_key(
        r#"{
            "pbrMetallicRoughness": {
                "baseColorTexture": {
                    "index": 0,
                    "extensions": { "KHR_texture_transform": { "scale": [2.0, 2.0] } }
                }
            },
            "extensions": {
                "KHR_materials_transmission": {
                    "transmissionFactor": 1.0,
                    "transmissionTexture": { "index": 0, "texCoord": 1 }
                },
                "KHR_materials_ior": { "ior": 1.4 }
            }
        }"#,
    );
    assert!(key.has_feature(
        MaterialFeatures::TRANSMISSION
            | MaterialFeatures::IOR
            | MaterialFeatures::TEXTURE_TRANSFORMS
    ));
    assert_eq!(key.texture(TextureSlot::Transmission), Some(1));
}

#[test]
fn test_clearcoat_and_sheen_from_raw_json() {
    let key = single_key(
        r#"{
            "extensions": {
                "KHR_materials_clearcoat": {
                    "clearcoatFactor": 1.0,
                    "clearcoatTexture": { "index": 0, "texCoord": 1 },
                    "clearcoatNormalTexture": {
                        "index": 0,
                        "extensions": { "KHR_texture_transform": { "rotation": 0.5 } }
                    }
                },
                "KHR_materials_sheen": {
                    "sheenColorFactor": [1.0, 0.0, 0.0],
                    "sheenRoughnessTexture": { "index": 0 }
                }
            }
        }"#,
    );
    assert!(key.has_feature(
        MaterialFeatures::CLEAR_COAT
            | MaterialFeatures::SHEEN
            | MaterialFeatures::TEXTURE_TRANSFORMS
    ));
    assert_eq!(key.texture(TextureSlot::ClearCoat), Some(1));
    assert_eq!(key.texture(TextureSlot::ClearCoatRoughness), None);
    assert_eq!(key.texture(TextureSlot::ClearCoatNormal), Some(0));
    assert_eq!(key.texture(TextureSlot::SheenColor), None);
    assert_eq!(key.texture(TextureSlot::SheenRoughness), Some(0));
}

#[test]
fn test_keys_follow_document_order() {
    let json = document(r#"{ "alphaMode": "MASK" }, { "doubleSided": true }"#);
    let keys = load_material_keys(json.as_bytes()).unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].alpha_mode, AlphaMode::Mask);
    assert!(keys[1].has_feature(MaterialFeatures::DOUBLE_SIDED));
}

#[test]
fn test_vertex_colors_come_from_primitive() {
    let json = r#"{
        "asset": { "version": "2.0" },
        "buffers": [{ "uri": "mesh.bin", "byteLength": 84 }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 48 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC4" }
        ],
        "materials": [{ "doubleSided": true }],
        "meshes": [{
            "primitives": [
                { "attributes": { "POSITION": 0, "COLOR_0": 1 }, "material": 0 },
                { "attributes": { "POSITION": 0 }, "material": 0 }
            ]
        }]
    }"#;
    let gltf = gltf_dep::Gltf::from_slice(json.as_bytes()).unwrap();
    let keys = primitive_keys(&gltf.document);

    assert_eq!(keys.len(), 2);
    assert!(keys[0].has_feature(MaterialFeatures::VERTEX_COLORS | MaterialFeatures::DOUBLE_SIDED));
    assert!(!keys[1].has_feature(MaterialFeatures::VERTEX_COLORS));
    assert!(keys[1].has_feature(MaterialFeatures::DOUBLE_SIDED));
}

#[test]
fn test_invalid_document_is_error() {
    let err = load_material_keys(b"{ not json").unwrap_err();
    assert!(matches!(err, GltfError::Parse(_)));
    assert!(err.to_string().starts_with("glTF parse error"));
}

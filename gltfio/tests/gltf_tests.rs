//! glTF document to program instance, end to end.

#![cfg(feature = "gltf")]

mod common;

use rstest::rstest;

use common::{Strategy, provider, uv_buffer};
use redlilium_gltfio::gltf::load_material_keys;
use redlilium_gltfio::{AlphaMode, MaterialFeatures, TextureSlot, UvSet};

const CAR_PAINT: &str = r#"{
    "asset": { "version": "2.0" },
    "extensionsUsed": ["KHR_materials_clearcoat", "KHR_materials_sheen"],
    "images": [{ "uri": "paint.png" }, { "uri": "detail.png" }],
    "textures": [{ "source": 0 }, { "source": 1 }],
    "materials": [
        {
            "name": "paint",
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
            "normalTexture": { "index": 1, "texCoord": 1 },
            "extensions": {
                "KHR_materials_clearcoat": {
                    "clearcoatFactor": 1.0,
                    "clearcoatTexture": { "index": 1, "texCoord": 1 }
                }
            }
        },
        {
            "name": "seat",
            "alphaMode": "MASK",
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
            "extensions": {
                "KHR_materials_sheen": { "sheenColorTexture": { "index": 1 } }
            }
        },
        {
            "name": "paint_copy",
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
            "normalTexture": { "index": 1, "texCoord": 1 },
            "extensions": {
                "KHR_materials_clearcoat": {
                    "clearcoatTexture": { "index": 0, "texCoord": 1 }
                }
            }
        }
    ]
}"#;

#[rstest]
#[case::ubershader(Strategy::Ubershader)]
#[case::generated(Strategy::Generated)]
fn test_document_materials_to_instances(#[case] strategy: Strategy) {
    let keys = load_material_keys(CAR_PAINT.as_bytes()).unwrap();
    assert_eq!(keys.len(), 3);
    assert!(keys[0].has_feature(MaterialFeatures::CLEAR_COAT));
    assert_eq!(keys[0], keys[2]);

    let mut provider = provider(strategy);
    let mut instances = Vec::new();
    for (key, label) in keys.iter().zip(["paint", "seat", "paint_copy"]) {
        let mut uvmap = uv_buffer();
        let instance = provider
            .create_instance(key, &mut uvmap, Some(label))
            .unwrap();
        assert_eq!(uvmap[0], UvSet::Uv0);
        instances.push((instance, uvmap));
    }

    let (paint, paint_uv) = &instances[0];
    assert_eq!(paint_uv[1], UvSet::Uv1);
    assert!(paint.key().has_texture(TextureSlot::ClearCoat));

    let (seat, _) = &instances[1];
    assert!(seat.key().has_texture(TextureSlot::SheenColor));
    match strategy {
        Strategy::Ubershader => assert_eq!(seat.key().alpha_mode, AlphaMode::Blend),
        Strategy::Generated => assert_eq!(seat.key().alpha_mode, AlphaMode::Mask),
    }

    assert_eq!(provider.program_count(), 2);
}

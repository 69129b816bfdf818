use criterion::{Criterion, black_box, criterion_group, criterion_main};

use redlilium_gltfio::{
    GeneratingCompiler, MaterialKey, MaterialProvider, TextureSlot, UV_MAP_SIZE,
    UbershaderCompiler, UvSet, resolve_uv_map,
};

fn textured_key() -> MaterialKey {
    MaterialKey::new()
        .with_texture(TextureSlot::BaseColor, 0)
        .with_texture(TextureSlot::MetallicRoughness, 0)
        .with_texture(TextureSlot::Normal, 1)
        .with_texture(TextureSlot::Occlusion, 2)
        .with_texture(TextureSlot::Emissive, 3)
}

// ---------------------------------------------------------------------------
// UV resolution
// ---------------------------------------------------------------------------

fn bench_resolve_uv_map(c: &mut Criterion) {
    let key = textured_key();
    c.bench_function("resolve_uv_map_four_channels", |b| {
        b.iter(|| resolve_uv_map(black_box(&key)));
    });
}

// ---------------------------------------------------------------------------
// Instance creation
// ---------------------------------------------------------------------------

fn bench_cache_hit(c: &mut Criterion) {
    let key = textured_key();
    let mut provider = MaterialProvider::new(UbershaderCompiler::standard());
    let mut uvmap = [UvSet::Unused; UV_MAP_SIZE];
    provider
        .create_instance(&key, &mut uvmap, None)
        .expect("warm-up compile");

    c.bench_function("create_instance_cache_hit", |b| {
        b.iter(|| provider.create_instance(black_box(&key), &mut uvmap, None));
    });
}

fn bench_ubershader_miss(c: &mut Criterion) {
    let key = textured_key();
    let mut uvmap = [UvSet::Unused; UV_MAP_SIZE];
    c.bench_function("create_instance_ubershader_miss", |b| {
        b.iter(|| {
            let mut provider = MaterialProvider::new(UbershaderCompiler::standard());
            provider.create_instance(black_box(&key), &mut uvmap, None)
        });
    });
}

fn bench_generated_miss(c: &mut Criterion) {
    let key = textured_key();
    let mut uvmap = [UvSet::Unused; UV_MAP_SIZE];
    c.bench_function("create_instance_generated_miss", |b| {
        b.iter(|| {
            let mut provider = MaterialProvider::new(GeneratingCompiler::default());
            provider.create_instance(black_box(&key), &mut uvmap, None)
        });
    });
}

criterion_group!(
    benches,
    bench_resolve_uv_map,
    bench_cache_hit,
    bench_ubershader_miss,
    bench_generated_miss,
);
criterion_main!(benches);

//! Shared helpers for provider integration tests.

#![allow(dead_code)]

use redlilium_gltfio::{
    GeneratingCompiler, GeneratorConfig, MaterialProvider, UV_MAP_SIZE, UbershaderCatalog,
    UbershaderCompiler, UvSet, VariantCompiler,
};

/// Compiler strategy under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Ubershader,
    Generated,
}

pub type BoxedProvider = MaterialProvider<Box<dyn VariantCompiler>>;

/// Install the test logger once per process.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A compiler for `strategy` with default settings.
pub fn compiler(strategy: Strategy) -> Box<dyn VariantCompiler> {
    match strategy {
        Strategy::Ubershader => Box::new(UbershaderCompiler::standard()),
        Strategy::Generated => Box::new(GeneratingCompiler::default()),
    }
}

/// A compiler for `strategy` that can never build a program.
pub fn failing_compiler(strategy: Strategy) -> Box<dyn VariantCompiler> {
    match strategy {
        Strategy::Ubershader => Box::new(UbershaderCompiler::new(UbershaderCatalog::empty())),
        Strategy::Generated => Box::new(GeneratingCompiler::new(
            GeneratorConfig::default().with_program_budget(0),
        )),
    }
}

/// A provider with its own cache.
pub fn provider(strategy: Strategy) -> BoxedProvider {
    init_logging();
    MaterialProvider::new(compiler(strategy))
}

/// A UV table buffer pre-filled with a sentinel.
pub fn uv_buffer() -> [UvSet; UV_MAP_SIZE] {
    [UvSet::Uv1; UV_MAP_SIZE]
}

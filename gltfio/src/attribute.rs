//! Vertex attribute identities.
//!
//! Providers answer per-attribute questions (see
//! [`VariantCompiler::needs_placeholder`](crate::provider::VariantCompiler::needs_placeholder))
//! so the vertex-layout code knows which streams must be synthesized when a
//! glTF primitive omits them.

/// Semantic meaning of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttributeSemantic {
    /// Vertex position (typically float3).
    Position,
    /// Vertex normal (typically float3).
    Normal,
    /// Vertex tangent (typically float4, w = handedness).
    Tangent,
    /// Texture coordinates set 0 (typically float2).
    TexCoord0,
    /// Texture coordinates set 1 (typically float2).
    TexCoord1,
    /// Vertex color (typically float4 or unorm4).
    Color,
    /// Bone indices for skinning (typically uint4).
    Joints,
    /// Bone weights for skinning (typically float4).
    Weights,
}

impl VertexAttributeSemantic {
    /// All semantics in shader location order.
    pub const ALL: [Self; 8] = [
        Self::Position,
        Self::Normal,
        Self::Tangent,
        Self::TexCoord0,
        Self::TexCoord1,
        Self::Color,
        Self::Joints,
        Self::Weights,
    ];
}

//! Program instances holding per-use parameter values.

use std::sync::Arc;

use crate::error::MaterialError;

use super::key::MaterialKey;
use super::program::{MaterialValue, ShadingProgram, TextureRef};

/// A per-use binding of a [`ShadingProgram`] with its own parameter values.
///
/// `values[i]` corresponds to `program.parameters()[i]`. Instances share the
/// program via `Arc` and own everything else, so they can outlive the cache
/// that produced the program.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use redlilium_gltfio::{MaterialKey, MaterialValue, UbershaderCompiler, VariantCompiler};
/// use redlilium_gltfio::ProgramInstance;
///
/// let program = UbershaderCompiler::standard().compile(&MaterialKey::new()).unwrap();
/// let mut instance = ProgramInstance::new(Arc::new(program)).with_label("red_metal");
/// instance
///     .set("base_color_factor", MaterialValue::Vec4([1.0, 0.0, 0.0, 1.0]))
///     .unwrap();
/// assert_eq!(instance.get_vec4("base_color_factor"), Some([1.0, 0.0, 0.0, 1.0]));
/// ```
#[derive(Debug, Clone)]
pub struct ProgramInstance {
    program: Arc<ShadingProgram>,
    label: Option<String>,
    values: Vec<MaterialValue>,
}

impl ProgramInstance {
    /// Create a new instance with default values for all parameters.
    pub fn new(program: Arc<ShadingProgram>) -> Self {
        let values = program.parameters().iter().map(|p| p.default).collect();
        Self {
            program,
            label: None,
            values,
        }
    }

    /// Set the diagnostic label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The shared program.
    pub fn program(&self) -> &Arc<ShadingProgram> {
        &self.program
    }

    /// Canonical key of the program in force.
    pub fn key(&self) -> &MaterialKey {
        self.program.key()
    }

    /// Diagnostic label, not part of any cache key.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// All values, in parameter order.
    pub fn values(&self) -> &[MaterialValue] {
        &self.values
    }

    /// Set a parameter by name.
    pub fn set(&mut self, name: &str, value: MaterialValue) -> Result<(), MaterialError> {
        let (idx, def) = self
            .program
            .find_parameter(name)
            .ok_or_else(|| MaterialError::UnknownParameter(name.to_owned()))?;
        if def.value_type != value.value_type() {
            return Err(MaterialError::ParameterTypeMismatch {
                name: name.to_owned(),
                expected: def.value_type,
            });
        }
        self.values[idx] = value;
        Ok(())
    }

    /// Get a value by parameter name.
    pub fn get(&self, name: &str) -> Option<&MaterialValue> {
        let (idx, _) = self.program.find_parameter(name)?;
        self.values.get(idx)
    }

    /// Get a float value by parameter name.
    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            MaterialValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a vec3 value by parameter name.
    pub fn get_vec3(&self, name: &str) -> Option<[f32; 3]> {
        match self.get(name)? {
            MaterialValue::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a vec4 value by parameter name.
    pub fn get_vec4(&self, name: &str) -> Option<[f32; 4]> {
        match self.get(name)? {
            MaterialValue::Vec4(v) => Some(*v),
            _ => None,
        }
    }

    /// Get a bound texture by parameter name.
    pub fn get_texture(&self, name: &str) -> Option<&TextureRef> {
        match self.get(name)? {
            MaterialValue::Texture(t) => t.as_ref(),
            _ => None,
        }
    }

    /// Iterator over all bound textures.
    pub fn textures(&self) -> impl Iterator<Item = &TextureRef> {
        self.values.iter().filter_map(|v| match v {
            MaterialValue::Texture(t) => t.as_ref(),
            _ => None,
        })
    }
}

// Ensure ProgramInstance is Send + Sync
static_assertions::assert_impl_all!(ProgramInstance: Send, Sync);

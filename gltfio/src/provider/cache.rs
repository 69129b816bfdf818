//! Program cache keyed by compiler strategy and canonical material key.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::CompileError;
use crate::material::{MaterialKey, ShadingProgram};

use super::compiler::VariantCompiler;

/// Deduplicates compiled programs.
///
/// Programs are stored under the strategy name and the canonical key their
/// compiler reported, so providers of different strategies can share one
/// cache without receiving each other's programs. Request keys that were
/// down-graded are remembered as aliases of their canonical key, so asking
/// again never recompiles. Programs are listed in creation order.
#[derive(Debug, Default)]
pub struct MaterialCache {
    programs: Vec<Arc<ShadingProgram>>,
    by_key: HashMap<(&'static str, MaterialKey), usize>,
    aliases: HashMap<(&'static str, MaterialKey), MaterialKey>,
}

impl MaterialCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up or compile the program for `key`.
    ///
    /// Returns the shared program and the canonical key it honors. When a
    /// fresh compile lands on a canonical key that is already cached, the
    /// cached program is kept and the new one is discarded.
    pub fn resolve<C>(
        &mut self,
        key: &MaterialKey,
        compiler: &mut C,
    ) -> Result<(Arc<ShadingProgram>, MaterialKey), CompileError>
    where
        C: VariantCompiler + ?Sized,
    {
        let strategy = compiler.name();
        let lookup = self
            .aliases
            .get(&(strategy, *key))
            .copied()
            .unwrap_or(*key);
        if let Some(&idx) = self.by_key.get(&(strategy, lookup)) {
            return Ok((Arc::clone(&self.programs[idx]), lookup));
        }

        let program = compiler.compile(key)?;
        let canonical = *program.key();
        let idx = match self.by_key.get(&(strategy, canonical)) {
            Some(&idx) => {
                log::trace!("[{key}] converged on cached program for [{canonical}]");
                idx
            }
            None => {
                log::debug!(
                    "{strategy} compiled program #{} '{}'",
                    self.programs.len(),
                    program.name()
                );
                self.programs.push(Arc::new(program));
                self.by_key.insert((strategy, canonical), self.programs.len() - 1);
                self.programs.len() - 1
            }
        };
        if canonical != *key {
            self.aliases.insert((strategy, *key), canonical);
        }
        Ok((Arc::clone(&self.programs[idx]), canonical))
    }

    /// Whether `key` resolves without compiling under the strategy named
    /// `strategy`.
    pub fn contains(&self, strategy: &'static str, key: &MaterialKey) -> bool {
        let lookup = self.aliases.get(&(strategy, *key)).unwrap_or(key);
        self.by_key.contains_key(&(strategy, *lookup))
    }

    /// Cached programs in creation order.
    pub fn programs(&self) -> impl Iterator<Item = &Arc<ShadingProgram>> {
        self.programs.iter()
    }

    /// Owned copy of the program list.
    pub fn snapshot(&self) -> Vec<Arc<ShadingProgram>> {
        self.programs.clone()
    }

    /// Number of distinct programs.
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    /// Whether nothing has been compiled.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Drop every program and alias. Instances created earlier keep their
    /// programs alive.
    pub fn clear(&mut self) {
        if self.programs.is_empty() && self.aliases.is_empty() {
            return;
        }
        log::info!("releasing {} cached program(s)", self.programs.len());
        self.programs.clear();
        self.by_key.clear();
        self.aliases.clear();
    }
}

// Ensure MaterialCache is Send + Sync
static_assertions::assert_impl_all!(MaterialCache: Send, Sync);

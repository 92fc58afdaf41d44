//! Block state to model variant resolution.

use crate::error::{RenderError, Result};
use crate::resource_pack::blockstate::parse_variant_key;
use crate::resource_pack::{BlockstateDefinition, ModelVariant, MultipartCase, ResourcePack};
use crate::types::InputBlock;
use std::collections::HashMap;

/// Resolves block states to model variants.
pub struct StateResolver<'a> {
    pack: &'a ResourcePack,
}

impl<'a> StateResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self { pack }
    }

    /// Resolve a block to the model variants that should be composited for it.
    pub fn resolve(&self, block: &InputBlock) -> Result<Vec<ModelVariant>> {
        let blockstate = self.pack.blockstate(&block.name).ok_or_else(|| {
            RenderError::ResourceNotFound(format!("blockstate {}", block.name))
        })?;

        match blockstate {
            BlockstateDefinition::Variants(variants) => self.resolve_variants(variants, block),
            BlockstateDefinition::Multipart(cases) => self.resolve_multipart(cases, block),
        }
    }

    /// Resolve using the variants format: the key must describe exactly the
    /// given properties, or be the catch-all `""`.
    fn resolve_variants(
        &self,
        variants: &HashMap<String, Vec<ModelVariant>>,
        block: &InputBlock,
    ) -> Result<Vec<ModelVariant>> {
        if let Some(first) = variants.get("").and_then(|list| list.first()) {
            return Ok(vec![first.clone()]);
        }

        for (key, list) in variants {
            if parse_variant_key(key)? == block.properties {
                if let Some(first) = list.first() {
                    return Ok(vec![first.clone()]);
                }
            }
        }

        Err(RenderError::InvalidStateSpec(format!(
            "no variant of {} matches {:?}",
            block.name, block.properties
        )))
    }

    /// Resolve using the multipart format: every case whose condition holds
    /// contributes its models, in declaration order.
    fn resolve_multipart(
        &self,
        cases: &[MultipartCase],
        block: &InputBlock,
    ) -> Result<Vec<ModelVariant>> {
        let mut result = Vec::new();

        for case in cases {
            let applies = match case.condition()? {
                Some(condition) => condition.matches(&block.properties),
                None => true,
            };
            if applies {
                result.extend(case.apply.variants().into_iter().cloned());
            }
        }

        Ok(result)
    }
}

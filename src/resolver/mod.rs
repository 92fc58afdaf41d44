//! Block state and model resolution.
//!
//! This module handles resolving block states to concrete model variants
//! and resolving model inheritance chains.

pub mod state_resolver;
pub mod model_resolver;

pub use state_resolver::StateResolver;
pub use model_resolver::{ModelResolver, ResolvedModel};

use crate::error::{RenderError, Result};
use crate::resource_pack::ResourcePack;
use crate::types::{InputBlock, ModelRotation};
use std::collections::{BTreeMap, HashMap};

/// One model of a block, ready to be rendered onto a canvas.
#[derive(Debug, Clone)]
pub struct ResolvedPart {
    /// The fully resolved block model (with inherited elements/textures).
    pub model: ResolvedModel,
    /// Whole-model rotation from the blockstate.
    pub rotation: ModelRotation,
    /// Whether inferred UVs follow the rotated geometry.
    pub uv_lock: bool,
}

/// Resolve a block to the model parts that make up its icon.
pub fn resolve_block(pack: &ResourcePack, block: &InputBlock) -> Result<Vec<ResolvedPart>> {
    let state_resolver = StateResolver::new(pack);
    let model_resolver = ModelResolver::new(pack);

    state_resolver
        .resolve(block)?
        .into_iter()
        .map(|variant| {
            Ok(ResolvedPart {
                model: model_resolver.resolve(&variant.model_location())?,
                rotation: ModelRotation::new(variant.x, variant.y, variant.z),
                uv_lock: variant.uvlock,
            })
        })
        .collect()
}

/// Every combination of the values of `keys`, varying the last key fastest.
///
/// `keys` must name exactly the properties in `values`, usually those of
/// [`crate::resource_pack::BlockstateDefinition::property_values`].
pub fn state_combinations(
    values: &BTreeMap<String, Vec<String>>,
    keys: &[String],
) -> Result<Vec<HashMap<String, String>>> {
    let mut expected: Vec<&String> = values.keys().collect();
    let mut given: Vec<&String> = keys.iter().collect();
    expected.sort();
    given.sort();
    given.dedup();
    if expected != given || given.len() != keys.len() {
        return Err(RenderError::InvalidStateSpec(format!(
            "keys {:?} do not match the properties {:?}",
            keys, expected
        )));
    }

    let mut combinations = vec![HashMap::new()];
    for key in keys {
        combinations = combinations
            .into_iter()
            .flat_map(|partial: HashMap<String, String>| {
                values[key].iter().map(move |value| {
                    let mut state = partial.clone();
                    state.insert(key.clone(), value.clone());
                    state
                })
            })
            .collect();
    }

    Ok(combinations)
}

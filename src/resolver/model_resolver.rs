//! Model inheritance resolution.

use crate::error::{RenderError, Result};
use crate::resource_pack::{BlockModel, ModelElement, ResourcePack};
use crate::types::with_namespace;
use std::cell::RefCell;
use std::collections::HashMap;
use tracing::trace;

/// Maximum depth for model inheritance to prevent infinite loops.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Maximum number of `#ref` hops for one texture reference.
const MAX_TEXTURE_INDIRECTION: usize = 32;

/// A model with its inherited elements and all texture references followed
/// to literal texture identifiers.
#[derive(Debug, Clone)]
pub struct ResolvedModel {
    /// Normalized location of the model that was resolved.
    pub location: String,
    /// Elements ready for rendering; every face texture is a literal identifier.
    pub elements: Vec<ModelElement>,
}

/// Resolves model inheritance chains.
pub struct ModelResolver<'a> {
    pack: &'a ResourcePack,
    cache: RefCell<HashMap<String, ResolvedModel>>,
}

impl<'a> ModelResolver<'a> {
    pub fn new(pack: &'a ResourcePack) -> Self {
        Self {
            pack,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolve a model with all inherited elements and textures.
    pub fn resolve(&self, model_location: &str) -> Result<ResolvedModel> {
        let location = with_namespace(model_location);

        if let Some(cached) = self.cache.borrow().get(&location) {
            return Ok(cached.clone());
        }

        let chain = self.collect_chain(&location)?;
        let textures = merge_textures(&chain);

        // The nearest model that declares elements wins
        let mut elements = chain
            .iter()
            .find(|model| model.has_elements())
            .and_then(|model| model.elements.clone())
            .ok_or_else(|| {
                RenderError::MalformedGeometry(format!(
                    "no elements in {} or any of its parents",
                    location
                ))
            })?;

        for element in &mut elements {
            for (_, face) in element.faces.iter_mut() {
                face.texture = resolve_texture_reference(&face.texture, &textures, &location)?;
            }
        }

        trace!(model = %location, depth = chain.len(), "resolved model");

        let resolved = ResolvedModel { location, elements };
        self.cache
            .borrow_mut()
            .insert(resolved.location.clone(), resolved.clone());

        Ok(resolved)
    }

    /// The model followed by its ancestors, child first.
    fn collect_chain(&self, location: &str) -> Result<Vec<&'a BlockModel>> {
        let mut chain = Vec::new();
        let mut current = location.to_string();

        loop {
            if chain.len() >= MAX_INHERITANCE_DEPTH {
                return Err(RenderError::ModelInheritanceTooDeep(location.to_string()));
            }

            let model = self.pack.model(&current).ok_or_else(|| {
                RenderError::ResourceNotFound(format!("model {}", current))
            })?;
            chain.push(model);

            match &model.parent {
                // builtin/generated and friends have no file behind them
                Some(parent) if !parent.starts_with("builtin/") => {
                    current = with_namespace(parent);
                }
                _ => break,
            }
        }

        Ok(chain)
    }
}

/// Merge texture variables down the chain; children override parents.
fn merge_textures(chain: &[&BlockModel]) -> HashMap<String, String> {
    let mut merged = HashMap::new();
    for model in chain.iter().rev() {
        for (key, value) in &model.textures {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Follow `#ref` indirections until a literal identifier is reached.
fn resolve_texture_reference(
    reference: &str,
    textures: &HashMap<String, String>,
    location: &str,
) -> Result<String> {
    let mut current = reference;

    for _ in 0..MAX_TEXTURE_INDIRECTION {
        let Some(key) = current.strip_prefix('#') else {
            return Ok(current.to_string());
        };
        current = textures.get(key).map(String::as_str).ok_or_else(|| {
            RenderError::UnresolvedTextureReference(format!(
                "{} (via {}) is not defined by {} or its parents",
                current, reference, location
            ))
        })?;
    }

    Err(RenderError::UnresolvedTextureReference(format!(
        "{} in {} loops back on itself",
        reference, location
    )))
}

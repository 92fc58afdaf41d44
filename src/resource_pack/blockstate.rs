//! Blockstate definition parsing.
//!
//! Blockstates define how block properties map to model variants.
//! There are two formats: "variants" and "multipart".

use crate::error::{RenderError, Result};
use crate::types::with_namespace;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A blockstate definition from blockstates/*.json.
#[derive(Debug, Clone)]
pub enum BlockstateDefinition {
    /// Simple variants: property combinations map to models.
    Variants(HashMap<String, Vec<ModelVariant>>),
    /// Multipart: conditional model application.
    Multipart(Vec<MultipartCase>),
}

impl<'de> Deserialize<'de> for BlockstateDefinition {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawBlockstate {
            variants: Option<HashMap<String, VariantValue>>,
            multipart: Option<Vec<MultipartCase>>,
        }

        let raw = RawBlockstate::deserialize(deserializer)?;

        match (raw.variants, raw.multipart) {
            (Some(variants), None) => {
                let parsed: HashMap<String, Vec<ModelVariant>> = variants
                    .into_iter()
                    .map(|(k, v)| (k, v.into_vec()))
                    .collect();
                Ok(BlockstateDefinition::Variants(parsed))
            }
            (None, Some(multipart)) => Ok(BlockstateDefinition::Multipart(multipart)),
            (Some(_), Some(_)) => Err(de::Error::custom(
                "blockstate declares both \"variants\" and \"multipart\"",
            )),
            (None, None) => Err(de::Error::custom(
                "expected either \"variants\" or \"multipart\"",
            )),
        }
    }
}

impl BlockstateDefinition {
    /// Every property mentioned by the definition with all values it can take,
    /// sorted in a human-friendly order.
    pub fn property_values(&self) -> Result<BTreeMap<String, Vec<String>>> {
        let mut seen: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        match self {
            BlockstateDefinition::Variants(variants) => {
                for key in variants.keys() {
                    for (name, value) in parse_variant_key(key)? {
                        seen.entry(name).or_default().insert(value);
                    }
                }
            }
            BlockstateDefinition::Multipart(cases) => {
                for case in cases {
                    if let Some(condition) = case.condition()? {
                        condition.collect_values(&mut seen);
                    }
                }
            }
        }

        Ok(seen
            .into_iter()
            .map(|(name, values)| (name, sort_property_values(values)))
            .collect())
    }
}

/// Parse a variant key like `facing=north,half=top` into its pairs.
pub fn parse_variant_key(key: &str) -> Result<HashMap<String, String>> {
    if key.is_empty() {
        return Ok(HashMap::new());
    }

    key.split(',')
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    RenderError::InvalidStateSpec(format!("malformed variant key '{}'", key))
                })
        })
        .collect()
}

/// Fixed value orders, tried in turn. A property uses the first table that
/// contains every one of its values.
const VALUE_ORDERS: [&[&str]; 4] = [
    &["_floor", "north", "west", "south", "east", "up", "down"],
    &[
        "east_west",
        "north_south",
        "north_east",
        "north_west",
        "south_east",
        "south_west",
        "ascending_north",
        "ascending_west",
        "ascending_south",
        "ascending_east",
    ],
    &["straight", "inner_left", "inner_right", "outer_left", "outer_right"],
    // Chest halves are named from the chest's point of view
    &["single", "right", "left"],
];

fn sort_property_values(values: BTreeSet<String>) -> Vec<String> {
    if values.iter().all(|v| !v.is_empty() && v.bytes().all(|b| b.is_ascii_digit())) {
        let mut numeric: Vec<String> = values.into_iter().collect();
        numeric.sort_by_key(|v| v.parse::<u64>().unwrap_or(u64::MAX));
        return numeric;
    }

    if values.iter().all(|v| v == "false" || v == "true") {
        return in_order(&values, &["false", "true"]);
    }

    if let Some(order) = VALUE_ORDERS
        .iter()
        .find(|order| values.iter().all(|v| order.contains(&v.as_str())))
    {
        return in_order(&values, order);
    }

    // BTreeSet iteration is already lexicographic
    values.into_iter().collect()
}

fn in_order(values: &BTreeSet<String>, order: &[&str]) -> Vec<String> {
    order
        .iter()
        .filter(|v| values.contains(**v))
        .map(|v| v.to_string())
        .collect()
}

/// A variant value can be a single model or an array of weighted models.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VariantValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl VariantValue {
    fn into_vec(self) -> Vec<ModelVariant> {
        match self {
            VariantValue::Single(v) => vec![v],
            VariantValue::Multiple(v) => v,
        }
    }
}

/// A model variant reference with optional rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelVariant {
    /// Model resource location (e.g., "block/stone" or "minecraft:block/stone").
    pub model: String,
    /// X rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub x: i32,
    /// Y rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub y: i32,
    /// Z rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub z: i32,
    /// If true, inferred UVs follow the rotated geometry.
    #[serde(default)]
    pub uvlock: bool,
    /// Weight for random selection (default 1).
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

impl ModelVariant {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            x: 0,
            y: 0,
            z: 0,
            uvlock: false,
            weight: 1,
        }
    }

    /// Get the full resource location for the model.
    pub fn model_location(&self) -> String {
        with_namespace(&self.model)
    }
}

/// A multipart case with optional condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultipartCase {
    /// Raw condition for when this case applies. Kept unparsed so that a
    /// malformed condition fails the render that evaluates it.
    #[serde(default)]
    pub when: Option<Value>,
    /// Model(s) to apply when condition is met.
    pub apply: ApplyValue,
}

impl MultipartCase {
    /// Parse the `when` clause, if any.
    pub fn condition(&self) -> Result<Option<MultipartCondition>> {
        self.when.as_ref().map(MultipartCondition::from_value).transpose()
    }
}

/// The apply value can be a single model or array.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ApplyValue {
    Single(ModelVariant),
    Multiple(Vec<ModelVariant>),
}

impl ApplyValue {
    pub fn variants(&self) -> Vec<&ModelVariant> {
        match self {
            ApplyValue::Single(v) => vec![v],
            ApplyValue::Multiple(v) => v.iter().collect(),
        }
    }
}

/// Boolean condition over block-state properties.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipartCondition {
    /// Any of the sub-conditions must match.
    Or(Vec<MultipartCondition>),
    /// All of the sub-conditions must match.
    And(Vec<MultipartCondition>),
    /// The property must equal one of the values (`a|b` in the file).
    Property { name: String, values: Vec<String> },
}

impl MultipartCondition {
    /// Parse a `when` object. Keys of one object are combined with AND;
    /// `OR` and `AND` keys hold lists of nested objects.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            RenderError::InvalidStateSpec(format!("condition must be an object, got {}", value))
        })?;

        let mut clauses = Vec::with_capacity(object.len());
        for (key, value) in object {
            let clause = match key.as_str() {
                "OR" | "AND" => {
                    let list = value.as_array().ok_or_else(|| {
                        RenderError::InvalidStateSpec(format!(
                            "value of {} must be a list, got {}",
                            key, value
                        ))
                    })?;
                    let nested = list.iter().map(Self::from_value).collect::<Result<Vec<_>>>()?;
                    if key == "OR" {
                        MultipartCondition::Or(nested)
                    } else {
                        MultipartCondition::And(nested)
                    }
                }
                name => {
                    let raw = match value {
                        Value::String(s) => s.clone(),
                        Value::Bool(b) => b.to_string(),
                        Value::Number(n) => n.to_string(),
                        other => {
                            return Err(RenderError::InvalidStateSpec(format!(
                                "unsupported value for property {}: {}",
                                name, other
                            )))
                        }
                    };
                    MultipartCondition::Property {
                        name: name.to_string(),
                        values: raw.split('|').map(String::from).collect(),
                    }
                }
            };
            clauses.push(clause);
        }

        Ok(match clauses.len() {
            1 => clauses.remove(0),
            _ => MultipartCondition::And(clauses),
        })
    }

    /// Check if the condition matches the given block properties.
    /// A property absent from the state never matches.
    pub fn matches(&self, properties: &HashMap<String, String>) -> bool {
        match self {
            MultipartCondition::Or(any) => any.iter().any(|c| c.matches(properties)),
            MultipartCondition::And(all) => all.iter().all(|c| c.matches(properties)),
            MultipartCondition::Property { name, values } => properties
                .get(name)
                .map(|v| values.iter().any(|allowed| allowed == v))
                .unwrap_or(false),
        }
    }

    fn collect_values(&self, seen: &mut BTreeMap<String, BTreeSet<String>>) {
        match self {
            MultipartCondition::Or(nested) | MultipartCondition::And(nested) => {
                for condition in nested {
                    condition.collect_values(seen);
                }
            }
            MultipartCondition::Property { name, values } => {
                seen.entry(name.clone())
                    .or_default()
                    .extend(values.iter().cloned());
            }
        }
    }
}

//! Block model parsing.
//!
//! Block models define the 3D geometry of blocks using cuboid elements.

use crate::types::{Direction, ElementRotation};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A parsed block model from models/*.json.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockModel {
    /// Parent model to inherit from.
    #[serde(default)]
    pub parent: Option<String>,

    /// Texture variable definitions.
    #[serde(default)]
    pub textures: HashMap<String, String>,

    /// Model elements (cuboids). `None` means "inherit from the parent",
    /// which is different from an explicitly empty list.
    #[serde(default)]
    pub elements: Option<Vec<ModelElement>>,
}

impl BlockModel {
    /// Create an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if this model declares its own elements (not inherited).
    pub fn has_elements(&self) -> bool {
        self.elements.is_some()
    }
}

/// A cuboid element within a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelElement {
    /// First corner (0-16 range), not necessarily the minimum.
    pub from: [f64; 3],
    /// Opposite corner (0-16 range).
    pub to: [f64; 3],
    /// Optional rotation.
    #[serde(default)]
    pub rotation: Option<ElementRotation>,
    /// Face definitions, in declaration order.
    #[serde(default)]
    pub faces: ElementFaces,
}

impl ModelElement {
    pub fn new(from: [f64; 3], to: [f64; 3]) -> Self {
        Self {
            from,
            to,
            rotation: None,
            faces: ElementFaces::default(),
        }
    }

    pub fn with_rotation(mut self, rotation: ElementRotation) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_face(mut self, direction: Direction, face: ModelFace) -> Self {
        self.faces.insert(direction, face);
        self
    }
}

/// The faces of an element, kept in the order the model file declares them.
///
/// Declaration order decides which of two equally deep faces wins a pixel,
/// so a hash map is not good enough here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementFaces(Vec<(Direction, ModelFace)>);

impl ElementFaces {
    /// Insert or replace the face for a direction. New directions go last.
    pub fn insert(&mut self, direction: Direction, face: ModelFace) {
        match self.0.iter_mut().find(|(d, _)| *d == direction) {
            Some(slot) => slot.1 = face,
            None => self.0.push((direction, face)),
        }
    }

    pub fn get(&self, direction: Direction) -> Option<&ModelFace> {
        self.0.iter().find(|(d, _)| *d == direction).map(|(_, f)| f)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, &ModelFace)> {
        self.0.iter().map(|(d, f)| (*d, f))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Direction, &mut ModelFace)> {
        self.0.iter_mut().map(|(d, f)| (*d, f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Direction, ModelFace)> for ElementFaces {
    fn from_iter<T: IntoIterator<Item = (Direction, ModelFace)>>(iter: T) -> Self {
        let mut faces = ElementFaces::default();
        for (direction, face) in iter {
            faces.insert(direction, face);
        }
        faces
    }
}

impl Serialize for ElementFaces {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (direction, face) in &self.0 {
            map.serialize_entry(direction, face)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ElementFaces {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FacesVisitor;

        impl<'de> Visitor<'de> for FacesVisitor {
            type Value = ElementFaces;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from face direction to face")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut faces = ElementFaces::default();
                while let Some((direction, face)) = access.next_entry::<Direction, ModelFace>()? {
                    faces.insert(direction, face);
                }
                Ok(faces)
            }
        }

        deserializer.deserialize_map(FacesVisitor)
    }
}

/// A face of a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFace {
    /// UV coordinates [u1, v1, u2, v2] in 0-16 range. Inferred from geometry if absent.
    #[serde(default)]
    pub uv: Option<[f64; 4]>,
    /// Texture reference (e.g., "#side" or "block/stone").
    pub texture: String,
    /// UV rotation in degrees (0, 90, 180, 270).
    #[serde(default)]
    pub rotation: i32,
    /// Tint index; any value marks the face as tintable.
    #[serde(default)]
    pub tintindex: Option<i32>,
}

impl ModelFace {
    pub fn new(texture: impl Into<String>) -> Self {
        Self {
            uv: None,
            texture: texture.into(),
            rotation: 0,
            tintindex: None,
        }
    }

    pub fn with_uv(mut self, uv: [f64; 4]) -> Self {
        self.uv = Some(uv);
        self
    }

    pub fn with_rotation(mut self, rotation: i32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn tinted(mut self) -> Self {
        self.tintindex = Some(0);
        self
    }

    /// Check if this face takes the render tint.
    pub fn has_tint(&self) -> bool {
        self.tintindex.is_some()
    }
}

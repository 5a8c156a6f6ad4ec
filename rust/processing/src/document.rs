// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model document types.
//!
//! Only the fields the pipeline reads or writes are typed. Everything else is
//! carried through untouched so the output keeps the input's structure.

use crate::error::ValidationError;
use facegen_geometry::{Face, Point3};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

const MODEL_INFORMATION: &str = "modelInformation";

/// A building model as uploaded: a payload of elements plus everything else,
/// `modelInformation` included, kept as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub payload: Payload,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Elements of a model. Only planar elements are typed; linear elements and
/// anything else stay in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    pub planar_elements: Vec<PlanarElement>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A wall, floor or slab given as a loop of vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanarElement {
    /// Coordinates as written, so integers stay integers on output
    pub vertices: Vec<[Number; 3]>,
    /// Triangles as index triples into `vertices`
    #[serde(default, deserialize_with = "faces_or_empty")]
    pub face_vertices: Vec<Face>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Existing faces are replaced on tessellation, so a value that is not a
/// list of index triples reads as no faces.
fn faces_or_empty<'de, D>(deserializer: D) -> Result<Vec<Face>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[inline]
fn coordinate(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

impl PlanarElement {
    /// Build an element from coordinates. Returns `None` if a coordinate is
    /// NaN or infinite, since JSON has no way to write it.
    pub fn from_coordinates(vertices: &[[f64; 3]]) -> Option<Self> {
        let vertices = vertices
            .iter()
            .map(|v| {
                Some([
                    Number::from_f64(v[0])?,
                    Number::from_f64(v[1])?,
                    Number::from_f64(v[2])?,
                ])
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            vertices,
            face_vertices: Vec::new(),
            extra: Map::new(),
        })
    }

    /// Vertex loop as floating point coordinates
    pub fn coordinates(&self) -> Vec<[f64; 3]> {
        self.vertices
            .iter()
            .map(|v| [coordinate(&v[0]), coordinate(&v[1]), coordinate(&v[2])])
            .collect()
    }

    /// Vertex loop as points
    pub fn points(&self) -> Vec<Point3<f64>> {
        self.vertices
            .iter()
            .map(|v| Point3::new(coordinate(&v[0]), coordinate(&v[1]), coordinate(&v[2])))
            .collect()
    }
}

impl ModelDocument {
    /// Parse and validate a document from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, crate::Error> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(value)?)
    }

    /// Validate a parsed JSON value and convert it.
    ///
    /// Fails if `payload` or `payload.planarElements` is missing, or if any
    /// element cannot be read; the position of the first bad element is reported.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let root = value.as_object().ok_or(ValidationError::NotAnObject)?;
        let payload = root.get("payload").ok_or(ValidationError::MissingPayload)?;
        let elements = payload
            .as_object()
            .and_then(|p| p.get("planarElements"))
            .ok_or(ValidationError::MissingPlanarElements)?;
        let elements = elements
            .as_array()
            .ok_or(ValidationError::InvalidPlanarElements)?;

        for (index, element) in elements.iter().enumerate() {
            PlanarElement::deserialize(element).map_err(|e| ValidationError::InvalidElement {
                index,
                reason: e.to_string(),
            })?;
        }

        serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// The `modelInformation` object, if present and an object
    pub fn model_information(&self) -> Option<&Map<String, Value>> {
        self.extra.get(MODEL_INFORMATION).and_then(Value::as_object)
    }

    /// Drop the `destination` entry from the model information, if any.
    pub fn remove_destination(&mut self) -> Option<Value> {
        self.extra
            .get_mut(MODEL_INFORMATION)
            .and_then(Value::as_object_mut)
            .and_then(|info| info.remove("destination"))
    }

    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

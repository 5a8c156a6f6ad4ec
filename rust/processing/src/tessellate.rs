// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face generation for every planar element of a document.

use crate::document::{ModelDocument, PlanarElement};
use facegen_geometry::{
    tessellate_element, TessellationOptions, TessellationPath, TessellationWarning,
};
use rayon::prelude::*;
use serde::Serialize;

/// An element that ended up without faces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementWarning {
    /// Position of the element in `payload.planarElements`
    pub index: usize,
    pub vertices: Vec<[f64; 3]>,
    pub reason: String,
    #[serde(skip)]
    pub warning: TessellationWarning,
}

/// Summary of a document tessellation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentReport {
    pub element_count: usize,
    pub face_count: usize,
    /// Elements triangulated in their horizontal projection
    pub primary_count: usize,
    /// Elements that needed the rotation fallback
    pub fallback_count: usize,
    pub empty_count: usize,
    pub warnings: Vec<ElementWarning>,
}

struct ElementOutcome {
    path: TessellationPath,
    faces: usize,
    warning: Option<TessellationWarning>,
}

fn tessellate_one(element: &mut PlanarElement, options: &TessellationOptions) -> ElementOutcome {
    let result = tessellate_element(&element.points(), options);
    let faces = result.faces.len();
    element.face_vertices = result.faces;
    ElementOutcome {
        path: result.path,
        faces,
        warning: result.warning,
    }
}

/// Tessellate a list of planar elements, replacing each element's faces.
///
/// Elements are independent; `parallel` spreads them over the rayon pool
/// without changing the result. Zero-face elements are reported and logged,
/// never fatal.
pub fn tessellate_elements(
    elements: &mut [PlanarElement],
    options: &TessellationOptions,
    parallel: bool,
) -> DocumentReport {
    let outcomes: Vec<ElementOutcome> = if parallel {
        elements
            .par_iter_mut()
            .map(|e| tessellate_one(e, options))
            .collect()
    } else {
        elements.iter_mut().map(|e| tessellate_one(e, options)).collect()
    };

    let mut report = DocumentReport {
        element_count: elements.len(),
        ..Default::default()
    };

    for (index, outcome) in outcomes.into_iter().enumerate() {
        report.face_count += outcome.faces;
        match outcome.path {
            TessellationPath::Primary => report.primary_count += 1,
            TessellationPath::RotationFallback => report.fallback_count += 1,
            TessellationPath::Empty => report.empty_count += 1,
            TessellationPath::Failed => {}
        }

        if let Some(warning) = outcome.warning {
            let vertices = elements[index].coordinates();
            tracing::warn!(
                element_index = index,
                vertex_count = vertices.len(),
                vertices = ?vertices,
                reason = %warning,
                "Planar element produced no faces"
            );
            report.warnings.push(ElementWarning {
                index,
                vertices,
                reason: warning.to_string(),
                warning,
            });
        }
    }

    tracing::debug!(
        elements = report.element_count,
        faces = report.face_count,
        fallback = report.fallback_count,
        warnings = report.warnings.len(),
        "Tessellated planar elements"
    );

    report
}

/// Tessellate every planar element of a validated document in place.
pub fn tessellate_document(
    document: &mut ModelDocument,
    options: &TessellationOptions,
    parallel: bool,
) -> DocumentReport {
    tessellate_elements(&mut document.payload.planar_elements, options, parallel)
}

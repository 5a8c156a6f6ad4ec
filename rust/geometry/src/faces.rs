// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle index lists to face tuples

/// One triangle as three indices into an element's vertex list
pub type Face = [u32; 3];

/// Group a flat triangle index list into faces over the original, unclosed
/// vertex list of length `original_len`.
///
/// Index `original_len` is the synthetic closing point and maps to 0, which
/// holds the same coordinates. Triangles with any other out-of-range index
/// are dropped.
pub fn emit_faces(indices: &[usize], original_len: usize) -> Vec<Face> {
    let remap = |i: usize| -> Option<u32> {
        let i = if i == original_len { 0 } else { i };
        if i < original_len {
            u32::try_from(i).ok()
        } else {
            None
        }
    };

    indices
        .chunks_exact(3)
        .filter_map(|t| Some([remap(t[0])?, remap(t[1])?, remap(t[2])?]))
        .collect()
}

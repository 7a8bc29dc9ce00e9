//! Region boundary masks.
//!
//! A pixel is on a boundary when any neighbour under the chosen
//! connectivity carries a different label. Both sides of a transition are
//! marked, and the result is thickened by one dilation pass so the line
//! stays visible over the heatmap.

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Pixel neighbourhood used for both boundary detection and dilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Connectivity {
    /// Edge neighbours only.
    #[default]
    Four,
    /// Edge and corner neighbours.
    Eight,
}

const FOUR: &[(isize, isize)] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];
const EIGHT: &[(isize, isize)] = &[
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Connectivity {
    pub fn offsets(self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => FOUR,
            Connectivity::Eight => EIGHT,
        }
    }

    /// Parse the numeric form used in config files (4 or 8).
    pub fn from_neighbours(n: u8) -> Option<Self> {
        match n {
            4 => Some(Connectivity::Four),
            8 => Some(Connectivity::Eight),
            _ => None,
        }
    }
}

/// `true` marks a drawable boundary pixel; `false` is transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryMask {
    mask: Array2<bool>,
}

impl BoundaryMask {
    /// Detect label transitions in `slice`, then dilate once.
    pub fn from_slice(slice: ArrayView2<'_, u32>, connectivity: Connectivity) -> Self {
        let edges = find_transitions(slice, connectivity);
        Self {
            mask: dilate(edges.view(), connectivity),
        }
    }

    /// Transitions only, without the thickening pass.
    pub fn thin(slice: ArrayView2<'_, u32>, connectivity: Connectivity) -> Self {
        Self {
            mask: find_transitions(slice, connectivity),
        }
    }

    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.mask.get((row, col)).copied().unwrap_or(false)
    }

    pub fn dim(&self) -> (usize, usize) {
        self.mask.dim()
    }

    pub fn marked_count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    pub fn as_array(&self) -> &Array2<bool> {
        &self.mask
    }
}

fn neighbours(
    (rows, cols): (usize, usize),
    (r, c): (usize, usize),
    offsets: &'static [(isize, isize)],
) -> impl Iterator<Item = (usize, usize)> {
    offsets.iter().filter_map(move |&(dr, dc)| {
        let nr = r.checked_add_signed(dr)?;
        let nc = c.checked_add_signed(dc)?;
        (nr < rows && nc < cols).then_some((nr, nc))
    })
}

fn find_transitions(slice: ArrayView2<'_, u32>, connectivity: Connectivity) -> Array2<bool> {
    let dim = slice.dim();
    Array2::from_shape_fn(dim, |(r, c)| {
        let label = slice[(r, c)];
        neighbours(dim, (r, c), connectivity.offsets()).any(|n| slice[n] != label)
    })
}

fn dilate(mask: ArrayView2<'_, bool>, connectivity: Connectivity) -> Array2<bool> {
    let dim = mask.dim();
    Array2::from_shape_fn(dim, |(r, c)| {
        mask[(r, c)] || neighbours(dim, (r, c), connectivity.offsets()).any(|n| mask[n])
    })
}

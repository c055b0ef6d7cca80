//! Tetromino definitions and shapes
//!
//! All 7 tetrominoes with their rotation masks. Every mask is a 4x4 grid,
//! row-major, where `true` marks an occupied cell relative to the top-left
//! corner of the piece's bounding box.

/// Side length of a shape mask
pub const MASK_SIZE: usize = 4;

/// One rotation state of a piece
pub type Mask = [[bool; MASK_SIZE]; MASK_SIZE];

/// Display colors a piece can have. The empty board cell is not a color,
/// see [`crate::board::Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    White,
    Red,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    Green,
}

/// The 7 tetromino types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I, // White - long bar
    O, // Red - square
    T, // Yellow - T-shape
    J, // Blue - J-shape
    L, // Magenta - L-shape
    S, // Cyan - S-shape
    Z, // Green - Z-shape
}

impl PieceKind {
    /// Every kind, in catalog order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::J,
        PieceKind::L,
        PieceKind::S,
        PieceKind::Z,
    ];

    /// Get the color for this tetromino
    pub fn color(&self) -> PieceColor {
        match self {
            PieceKind::I => PieceColor::White,
            PieceKind::O => PieceColor::Red,
            PieceKind::T => PieceColor::Yellow,
            PieceKind::J => PieceColor::Blue,
            PieceKind::L => PieceColor::Magenta,
            PieceKind::S => PieceColor::Cyan,
            PieceKind::Z => PieceColor::Green,
        }
    }

    /// Rotation states in order; rotating right walks forward through them
    pub fn shapes(&self) -> &'static [Mask] {
        match self {
            PieceKind::I => &I_SHAPES,
            PieceKind::O => &O_SHAPES,
            PieceKind::T => &T_SHAPES,
            PieceKind::J => &J_SHAPES,
            PieceKind::L => &L_SHAPES,
            PieceKind::S => &S_SHAPES,
            PieceKind::Z => &Z_SHAPES,
        }
    }

    /// Number of distinct rotation states
    pub fn rotation_count(&self) -> usize {
        self.shapes().len()
    }
}

/// Build a mask from a digit picture, `1` for filled
const fn mask(rows: [[u8; MASK_SIZE]; MASK_SIZE]) -> Mask {
    let mut out = [[false; MASK_SIZE]; MASK_SIZE];
    let mut r = 0;
    while r < MASK_SIZE {
        let mut c = 0;
        while c < MASK_SIZE {
            out[r][c] = rows[r][c] != 0;
            c += 1;
        }
        r += 1;
    }
    out
}

static I_SHAPES: [Mask; 2] = [
    mask([
        [0, 0, 0, 0],
        [1, 1, 1, 1],
        [0, 0, 0, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [0, 1, 0, 0],
        [0, 1, 0, 0],
        [0, 1, 0, 0],
        [0, 1, 0, 0],
    ]),
];

static O_SHAPES: [Mask; 1] = [mask([
    [0, 0, 0, 0],
    [0, 1, 1, 0],
    [0, 1, 1, 0],
    [0, 0, 0, 0],
])];

static T_SHAPES: [Mask; 4] = [
    mask([
        [0, 0, 0, 0],
        [0, 1, 0, 0],
        [1, 1, 1, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [0, 0, 0, 0],
        [0, 1, 0, 0],
        [0, 1, 1, 0],
        [0, 1, 0, 0],
    ]),
    mask([
        [0, 0, 0, 0],
        [0, 0, 0, 0],
        [1, 1, 1, 0],
        [0, 1, 0, 0],
    ]),
    mask([
        [0, 0, 0, 0],
        [0, 1, 0, 0],
        [1, 1, 0, 0],
        [0, 1, 0, 0],
    ]),
];

static J_SHAPES: [Mask; 4] = [
    mask([
        [0, 0, 0, 0],
        [1, 1, 1, 0],
        [0, 0, 1, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [0, 1, 0, 0],
        [0, 1, 0, 0],
        [1, 1, 0, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [1, 0, 0, 0],
        [1, 1, 1, 0],
        [0, 0, 0, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [1, 1, 0, 0],
        [1, 0, 0, 0],
        [1, 0, 0, 0],
        [0, 0, 0, 0],
    ]),
];

static L_SHAPES: [Mask; 4] = [
    mask([
        [0, 0, 0, 0],
        [1, 1, 1, 0],
        [1, 0, 0, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [0, 0, 0, 0],
        [1, 1, 0, 0],
        [0, 1, 0, 0],
        [0, 1, 0, 0],
    ]),
    mask([
        [0, 0, 0, 0],
        [0, 0, 1, 0],
        [1, 1, 1, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [1, 0, 0, 0],
        [1, 0, 0, 0],
        [1, 1, 0, 0],
        [0, 0, 0, 0],
    ]),
];

static S_SHAPES: [Mask; 2] = [
    mask([
        [0, 0, 0, 0],
        [0, 1, 1, 0],
        [1, 1, 0, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [1, 0, 0, 0],
        [1, 1, 0, 0],
        [0, 1, 0, 0],
        [0, 0, 0, 0],
    ]),
];

static Z_SHAPES: [Mask; 2] = [
    mask([
        [0, 0, 0, 0],
        [1, 1, 0, 0],
        [0, 1, 1, 0],
        [0, 0, 0, 0],
    ]),
    mask([
        [0, 0, 1, 0],
        [0, 1, 1, 0],
        [0, 1, 0, 0],
        [0, 0, 0, 0],
    ]),
];

/// Iterate the occupied cells of a mask as (row, col)
pub fn occupied_cells(mask: &Mask) -> impl Iterator<Item = (usize, usize)> + '_ {
    mask.iter().enumerate().flat_map(|(r, row)| {
        row.iter()
            .enumerate()
            .filter(|(_, filled)| **filled)
            .map(move |(c, _)| (r, c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mask_has_four_cells() {
        for kind in PieceKind::ALL {
            for shape in kind.shapes() {
                assert_eq!(occupied_cells(shape).count(), 4, "{kind:?}");
            }
        }
    }

    #[test]
    fn test_rotation_counts() {
        assert_eq!(PieceKind::O.rotation_count(), 1);
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            assert_eq!(kind.rotation_count(), 2);
        }
        for kind in [PieceKind::T, PieceKind::J, PieceKind::L] {
            assert_eq!(kind.rotation_count(), 4);
        }
    }

    #[test]
    fn test_colors_are_distinct() {
        let colors: std::collections::HashSet<_> =
            PieceKind::ALL.iter().map(|k| k.color()).collect();
        assert_eq!(colors.len(), 7);
        assert_eq!(PieceKind::I.color(), PieceColor::White);
        assert_eq!(PieceKind::Z.color(), PieceColor::Green);
    }
}

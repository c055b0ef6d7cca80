//! Live piece: a kind plus its current rotation state

use crate::tetromino::{Mask, PieceColor, PieceKind};
use rand::Rng;

/// A piece in play, in the preview slot, or in the hold slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Index into `kind.shapes()`
    rotation: usize,
}

impl Piece {
    /// Create a piece in its first rotation state
    pub fn new(kind: PieceKind) -> Self {
        Self { kind, rotation: 0 }
    }

    /// Pick a kind uniformly from the 7 tetrominoes
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let index = rng.gen_range(0..PieceKind::ALL.len());
        Self::new(PieceKind::ALL[index])
    }

    #[allow(dead_code)]
    pub fn rotation(&self) -> usize {
        self.rotation
    }

    /// Mask for the current rotation
    pub fn mask(&self) -> &'static Mask {
        &self.kind.shapes()[self.rotation]
    }

    pub fn color(&self) -> PieceColor {
        self.kind.color()
    }

    /// Step backward through the rotation states, wrapping around
    pub fn rotate_left(&mut self) {
        self.step_rotation(-1);
    }

    /// Step forward through the rotation states, wrapping around
    pub fn rotate_right(&mut self) {
        self.step_rotation(1);
    }

    fn step_rotation(&mut self, delta: isize) {
        let count = self.kind.rotation_count() as isize;
        self.rotation = (self.rotation as isize + delta).rem_euclid(count) as usize;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_rotate_right_cycles_back() {
        for kind in PieceKind::ALL {
            let mut piece = Piece::new(kind);
            let start = *piece.mask();
            for _ in 0..kind.rotation_count() {
                piece.rotate_right();
            }
            assert_eq!(*piece.mask(), start, "{kind:?}");
        }
    }

    #[test]
    fn test_rotate_left_inverts_rotate_right() {
        for kind in PieceKind::ALL {
            for steps in 0..4 {
                let mut piece = Piece::new(kind);
                for _ in 0..steps {
                    piece.rotate_right();
                }
                let before = piece;
                piece.rotate_right();
                piece.rotate_left();
                assert_eq!(piece, before);
                piece.rotate_left();
                piece.rotate_right();
                assert_eq!(piece, before);
            }
        }
    }

    #[test]
    fn test_rotate_left_from_zero_wraps() {
        let mut piece = Piece::new(PieceKind::T);
        piece.rotate_left();
        assert_eq!(piece.rotation(), 3);

        let mut piece = Piece::new(PieceKind::O);
        piece.rotate_left();
        assert_eq!(piece.rotation(), 0);
    }

    #[test]
    fn test_random_covers_all_kinds() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let piece = Piece::random(&mut rng);
            assert_eq!(piece.rotation(), 0);
            seen.insert(piece.kind);
        }
        assert_eq!(seen.len(), 7);
    }
}

//! Tile-set identity under the square's transpose symmetry.
//!
//! Reflecting a puzzle's revealed cells across the main diagonal yields the
//! same puzzle, so tile sets are compared and deduplicated through their
//! canonical form.

use crate::grid::Coord;

pub type TileSet = Vec<Coord>;

/// Canonical form: the lexicographically smaller of the sorted set and its
/// sorted transpose. Idempotent, and invariant under transposition.
pub fn canonicalize_tiles(tiles: &[Coord]) -> TileSet {
    let mut direct: TileSet = tiles.to_vec();
    direct.sort_unstable();
    direct.dedup();

    let mut flipped: TileSet = tiles.iter().map(|t| t.transpose()).collect();
    flipped.sort_unstable();
    flipped.dedup();

    if flipped < direct { flipped } else { direct }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(u8, u8)]) -> TileSet {
        pairs.iter().map(|&(i, j)| Coord::new(i, j)).collect()
    }

    #[test]
    fn canonical_form_is_sorted() {
        let tiles = coords(&[(2, 0), (0, 1)]);
        assert_eq!(canonicalize_tiles(&tiles), coords(&[(0, 1), (2, 0)]));
    }

    #[test]
    fn transpose_maps_to_same_form() {
        let tiles = coords(&[(0, 1), (2, 3), (4, 0)]);
        let flipped: TileSet = tiles.iter().map(|t| t.transpose()).collect();
        assert_eq!(canonicalize_tiles(&tiles), canonicalize_tiles(&flipped));
    }

    #[test]
    fn idempotent() {
        let tiles = coords(&[(3, 1), (1, 3), (0, 2)]);
        let once = canonicalize_tiles(&tiles);
        assert_eq!(canonicalize_tiles(&once), once);
    }

    #[test]
    fn diagonal_sets_are_their_own_transpose() {
        let tiles = coords(&[(0, 0), (1, 1), (2, 2)]);
        assert_eq!(canonicalize_tiles(&tiles), tiles);
    }
}

//! # Archetype Catalog - Topology Mask Generators
//!
//! Each archetype is a named, fixed procedure for generating a playability
//! mask. The catalog is a compile-time registry: a field-less enum with one
//! variant per archetype, dispatched exhaustively by [`Archetype::generate`].
//! Deterministic archetypes ignore the RNG and always produce the same
//! geometry for a given board size; the procedural archetype draws a
//! symmetric random mask and rejection-samples it against the path validator
//! until it is competitive.

use rand::Rng;
use tracing::{debug, trace};

use crate::mask::Mask;

/// Minimum potential four-in-a-row lines a procedural mask must admit.
pub const MIN_PATHS: usize = 15;

/// Attempt budget for procedural rejection sampling.
pub const MAX_GENERATION_ATTEMPTS: usize = 50;

/// A named, fixed procedure for generating a playability mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Procedural left-right symmetric layout, validated for balance.
    FractalRandom,
    /// Alternating cells are void; only diagonal wins are possible.
    SwissCheese,
    /// Two rectangular corridors meet in a central junction.
    LPivot,
    /// Fully playable except two square void islands.
    Figure8,
    /// Periodic horizontal bands joined by two vertical side corridors.
    Corridors,
}

impl Archetype {
    /// The complete, read-only catalog.
    pub const ALL: [Archetype; 5] = [
        Archetype::FractalRandom,
        Archetype::SwissCheese,
        Archetype::LPivot,
        Archetype::Figure8,
        Archetype::Corridors,
    ];

    /// Stable string identifier, usable from external controllers.
    pub fn id(self) -> &'static str {
        match self {
            Archetype::FractalRandom => "fractal-random",
            Archetype::SwissCheese => "swiss-cheese",
            Archetype::LPivot => "l-pivot",
            Archetype::Figure8 => "figure-8",
            Archetype::Corridors => "corridors",
        }
    }

    /// Looks up an archetype by its string identifier.
    pub fn from_id(id: &str) -> Option<Archetype> {
        Archetype::ALL.into_iter().find(|a| a.id() == id)
    }

    pub fn name(self) -> &'static str {
        match self {
            Archetype::FractalRandom => "Fractal Random",
            Archetype::SwissCheese => "Swiss Cheese",
            Archetype::LPivot => "The 'L' Pivot",
            Archetype::Figure8 => "Figure-8",
            Archetype::Corridors => "Corridors",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Archetype::FractalRandom => "Procedural layout validated for competitive balance.",
            Archetype::SwissCheese => "Alternating cells are void. Only diagonal wins are possible.",
            Archetype::LPivot => "Two rectangles meet at a central junction.",
            Archetype::Figure8 => "Navigate around two large void islands in the center.",
            Archetype::Corridors => "Narrow pathways force intense local skirmishes.",
        }
    }

    /// Generates a playability mask for a `size`×`size` board.
    ///
    /// Deterministic archetypes ignore `rng` and are pure: two successive
    /// calls yield bit-identical masks.
    pub fn generate<R: Rng>(self, size: usize, rng: &mut R) -> Mask {
        match self {
            Archetype::FractalRandom => generate_fractal_random(size, rng),
            Archetype::SwissCheese => generate_swiss_cheese(size),
            Archetype::LPivot => generate_l_pivot(size),
            Archetype::Figure8 => generate_figure_8(size),
            Archetype::Corridors => generate_corridors(size),
        }
    }
}

fn generate_swiss_cheese(size: usize) -> Mask {
    let mut mask = Mask::new(size);
    for row in 0..size {
        for col in 0..size {
            if (row + col) % 2 == 0 {
                mask.set(row, col, true);
            }
        }
    }
    mask
}

fn generate_l_pivot(size: usize) -> Mask {
    let mut mask = Mask::new(size);
    // Central band: columns/rows 4..=7 on the reference 12x12 board.
    let lo = (size / 2).saturating_sub(2);
    let hi = (size / 2 + 2).min(size);
    for row in 0..size {
        for col in 0..size {
            if (lo..hi).contains(&row) || (lo..hi).contains(&col) {
                mask.set(row, col, true);
            }
        }
    }
    mask
}

fn generate_figure_8(size: usize) -> Mask {
    let mut mask = Mask::filled(size);
    let side = size / 4;
    // Two square voids: (3,3) and (7,7) on the reference 12x12 board.
    let islands = [(side, side), (size / 2 + 1, size / 2 + 1)];
    for (ir, ic) in islands {
        for row in ir..(ir + side).min(size) {
            for col in ic..(ic + side).min(size) {
                mask.set(row, col, false);
            }
        }
    }
    mask
}

fn generate_corridors(size: usize) -> Mask {
    let mut mask = Mask::new(size);
    if size < 4 {
        return mask;
    }
    for row in 1..size - 1 {
        if row % 4 == 1 || row % 4 == 2 {
            for col in 1..size - 1 {
                mask.set(row, col, true);
            }
        }
        // Vertical side corridors connecting the bands.
        for col in [1, 2, size - 3, size - 2] {
            mask.set(row, col, true);
        }
    }
    mask
}

/// Draws one left-right symmetric random candidate. A single density is
/// drawn per candidate; every Bernoulli outcome on the left half is
/// mirrored across the vertical axis.
fn random_candidate<R: Rng>(size: usize, rng: &mut R) -> Mask {
    let mut mask = Mask::new(size);
    let density = rng.gen_range(0.45..0.60);
    for row in 0..size {
        for col in 0..size.div_ceil(2) {
            let active = rng.gen_bool(density);
            mask.set(row, col, active);
            mask.set(row, size - 1 - col, active);
        }
    }
    mask
}

/// Rejection-sampled procedural generation: symmetric random masks can by
/// chance admit too few winning lines to be a fair game, so candidates are
/// regenerated until [`MIN_PATHS`] is reached. The attempt budget keeps
/// generation from blocking; on exhaustion the final candidate is used
/// as-is, degrading competitiveness rather than failing.
fn generate_fractal_random<R: Rng>(size: usize, rng: &mut R) -> Mask {
    let mut candidate = random_candidate(size, rng);
    let mut paths = candidate.count_potential_paths();
    let mut attempts = 1;
    while paths < MIN_PATHS && attempts < MAX_GENERATION_ATTEMPTS {
        trace!(attempts, paths, "rejected procedural mask candidate");
        candidate = random_candidate(size, rng);
        paths = candidate.count_potential_paths();
        attempts += 1;
    }
    if paths >= MIN_PATHS {
        debug!(attempts, paths, "accepted procedural mask");
    } else {
        debug!(
            attempts,
            paths, "path threshold not reached within budget; using final candidate"
        );
    }
    candidate
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use super::*;
    use crate::mask::DIRECTIONS;

    #[test]
    fn test_catalog_ids_round_trip() {
        for archetype in Archetype::ALL {
            assert_eq!(Archetype::from_id(archetype.id()), Some(archetype));
            assert!(!archetype.name().is_empty());
            assert!(!archetype.description().is_empty());
        }
        assert_eq!(Archetype::from_id("no-such-archetype"), None);
    }

    #[test]
    fn test_deterministic_archetypes_are_pure() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for archetype in [
            Archetype::SwissCheese,
            Archetype::LPivot,
            Archetype::Figure8,
            Archetype::Corridors,
        ] {
            let first = archetype.generate(12, &mut rng);
            let second = archetype.generate(12, &mut rng);
            assert_eq!(first, second, "{:?} not pure", archetype);
        }
    }

    #[test]
    fn test_swiss_cheese_only_admits_diagonal_lines() {
        let mask = generate_swiss_cheese(12);
        assert!(mask.count_potential_paths() > 0);
        // No 4 consecutive playable cells exist along an axis.
        for row in 0..12 {
            for col in 0..12 {
                for dir in [DIRECTIONS[0], DIRECTIONS[1]] {
                    let open = (0..4).all(|i| {
                        crate::mask::step(12, row, col, dir, i)
                            .is_some_and(|(r, c)| mask.is_playable(r, c))
                    });
                    assert!(!open, "axis line at ({}, {}) via {:?}", row, col, dir);
                }
            }
        }
    }

    #[test]
    fn test_l_pivot_band_matches_reference_board() {
        let mask = generate_l_pivot(12);
        assert!(mask.is_playable(0, 4));
        assert!(mask.is_playable(0, 7));
        assert!(!mask.is_playable(0, 3));
        assert!(!mask.is_playable(0, 8));
        assert!(mask.is_playable(5, 0));
        assert!(mask.is_playable(5, 11));
    }

    #[test]
    fn test_figure_8_voids_match_reference_board() {
        let mask = generate_figure_8(12);
        for row in 3..6 {
            for col in 3..6 {
                assert!(!mask.is_playable(row, col));
            }
        }
        for row in 7..10 {
            for col in 7..10 {
                assert!(!mask.is_playable(row, col));
            }
        }
        assert!(mask.is_playable(0, 0));
        assert!(mask.is_playable(6, 6));
    }

    #[test]
    fn test_corridors_keeps_side_corridors() {
        let mask = generate_corridors(12);
        for row in 1..11 {
            assert!(mask.is_playable(row, 1));
            assert!(mask.is_playable(row, 2));
            assert!(mask.is_playable(row, 9));
            assert!(mask.is_playable(row, 10));
        }
        // Border stays void.
        for i in 0..12 {
            assert!(!mask.is_playable(0, i));
            assert!(!mask.is_playable(11, i));
            assert!(!mask.is_playable(i, 0));
            assert!(!mask.is_playable(i, 11));
        }
    }

    #[test]
    fn test_fractal_random_is_symmetric_and_competitive() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        for _ in 0..50 {
            let mask = Archetype::FractalRandom.generate(12, &mut rng);
            for row in 0..12 {
                for col in 0..12 {
                    assert_eq!(mask.is_playable(row, col), mask.is_playable(row, 11 - col));
                }
            }
            assert!(mask.count_potential_paths() >= MIN_PATHS);
        }
    }

    /// RNG wrapper counting value draws, to bound the rejection loop.
    struct CountingRng<R> {
        inner: R,
        draws: usize,
    }

    impl<R: rand::RngCore> rand::RngCore for CountingRng<R> {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn test_fractal_random_attempt_budget_is_bounded() {
        // A 4x4 board admits at most 10 potential paths, below MIN_PATHS,
        // so every candidate is rejected and the loop must stop at the
        // attempt budget and hand back the final candidate.
        let mut rng = CountingRng {
            inner: Xoshiro256StarStar::seed_from_u64(3),
            draws: 0,
        };
        let mask = Archetype::FractalRandom.generate(4, &mut rng);
        assert!(mask.count_potential_paths() < MIN_PATHS);
        // One density draw plus 4*2 Bernoulli draws per candidate.
        let max_draws_per_candidate = 1 + 4 * 2;
        assert!(rng.draws <= MAX_GENERATION_ATTEMPTS * max_draws_per_candidate);
    }
}

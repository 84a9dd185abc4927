//! Property tests for the grid primitives.

use proptest::prelude::*;

use crate::{
    exception_applies, sample_line, trace_sight, DistanceField, HexCell, Occluder, SightConfig,
    Unbounded,
};

fn cell() -> impl Strategy<Value = HexCell> {
    (-20i32..20, -20i32..20).prop_map(|(column, row)| HexCell::new(column, row))
}

proptest! {
    #[test]
    fn distance_field_has_hexagonal_size(origin in cell(), radius in 0u32..8) {
        let field = DistanceField::compute(origin, radius, &Unbounded);
        let r = radius as usize;
        prop_assert_eq!(field.len(), 3 * r * r + 3 * r + 1);
        prop_assert_eq!(field.distance(origin), Some(0));
        for (cell, distance) in field.iter() {
            prop_assert!(distance <= radius);
            prop_assert_eq!(distance, origin.distance_to(cell));
        }
    }

    #[test]
    fn sight_is_symmetric_on_flat_terrain(
        a in cell(),
        b in cell(),
        height in -3i32..6,
    ) {
        let flat = |_| Occluder::open(height);
        let forward = trace_sight(a, b, height, height, SightConfig::default(), flat);
        let backward = trace_sight(b, a, height, height, SightConfig::default(), flat);
        prop_assert_eq!(forward.is_clear(), backward.is_clear());
        prop_assert!(forward.is_clear());
    }

    #[test]
    fn supreme_exception_never_blocks(
        a in cell(),
        b in cell(),
        origin_vision in -2i32..4,
        blocker in 1i32..6,
        lead in 2i32..5,
    ) {
        let target_vision = blocker + lead;
        prop_assert!(exception_applies(target_vision, blocker, 2));
        let line = trace_sight(
            a,
            b,
            origin_vision,
            target_vision,
            SightConfig::default(),
            |_| Occluder::open(blocker),
        );
        prop_assert!(line.is_clear());
    }

    #[test]
    fn samples_never_include_endpoints(a in cell(), b in cell()) {
        let samples = sample_line(a, b);
        prop_assert!(samples.iter().all(|s| s.cell != a && s.cell != b));
        let steps = (b.column - a.column).unsigned_abs().max((b.row - a.row).unsigned_abs());
        prop_assert!(samples.len() <= steps.saturating_sub(1) as usize);
    }
}

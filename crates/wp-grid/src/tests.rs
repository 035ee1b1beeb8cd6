//! Unit tests for wp-grid.

#[cfg(test)]
mod helpers {
    use wp_core::WayId;

    use crate::{BBox, Grid, GridBuilder, Way};

    /// `(0,0)-(2,2)` at cell size 1: the 2×2 lattice `{0, 1} × {0, 1}`.
    pub fn unit_grid() -> Grid {
        GridBuilder::new(BBox::new(0.0, 0.0, 2.0, 2.0), 1.0).build().unwrap()
    }

    /// A way along `y = 0` from `x = 0` to `x = 1`.
    pub fn bottom_way() -> Way {
        Way::from_coords(WayId(1), &[[0.0, 0.0], [1.0, 0.0]])
    }
}

// ── Grid ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod grid {
    use wp_core::CoreError;

    use super::helpers::unit_grid;
    use crate::{BBox, GridBuilder, GridError};

    #[test]
    fn two_by_two_lattice_row_major() {
        let grid = unit_grid();
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        let coords: Vec<_> = grid.iter_coords().collect();
        assert_eq!(coords, vec![(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        assert!(grid.cells().iter().all(|c| c.cost == 0.0 && !c.obstacle));
    }

    #[test]
    fn rebuild_is_identical() {
        assert_eq!(unit_grid(), unit_grid());
    }

    #[test]
    fn exact_decimal_multiple_gets_no_extra_column() {
        let grid = GridBuilder::new(BBox::new(0.0, 0.0, 0.9, 0.3), 0.3).build().unwrap();
        assert_eq!((grid.rows(), grid.cols()), (1, 3));
    }

    #[test]
    fn partial_cell_rounds_up() {
        let grid = GridBuilder::new(BBox::new(0.0, 0.0, 2.5, 1.0), 1.0).build().unwrap();
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.cell(0, 2).unwrap().x, 2.0);
    }

    #[test]
    fn rejects_bad_cell_size() {
        for cs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = GridBuilder::new(BBox::new(0.0, 0.0, 1.0, 1.0), cs).build().unwrap_err();
            assert!(matches!(err, GridError::Precondition(CoreError::Invalid(_))), "{cs}");
        }
    }

    #[test]
    fn rejects_empty_or_inverted_bbox() {
        assert!(GridBuilder::new(BBox::new(0.0, 0.0, 0.0, 1.0), 1.0).build().is_err());
        assert!(GridBuilder::new(BBox::new(2.0, 0.0, 1.0, 1.0), 1.0).build().is_err());
        assert!(GridBuilder::new(BBox::new(0.0, f64::NAN, 1.0, 1.0), 1.0).build().is_err());
    }

    #[test]
    fn oversized_lattice_is_an_error_not_an_allocation() {
        for bbox in [BBox::new(0.0, 0.0, 1e300, 1.0), BBox::new(-1e308, -1e308, 1e308, 1e308)] {
            let err = GridBuilder::new(bbox, 1.0).build().unwrap_err();
            assert!(matches!(err, GridError::Precondition(CoreError::Invalid(_))), "{bbox:?}");
        }
        let tiny_cells = GridBuilder::new(BBox::new(0.0, 0.0, 1.0, 1.0), 1e-6).build();
        assert!(tiny_cells.is_err());
    }

    #[test]
    fn cell_limit_is_configurable() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(GridBuilder::new(bbox, 1.0).with_max_cells(99).build().is_err());
        assert_eq!(GridBuilder::new(bbox, 1.0).with_max_cells(100).build().unwrap().len(), 100);
    }

    #[test]
    fn world_to_cell_snaps_to_nearest_sample() {
        let grid = unit_grid();
        assert_eq!(grid.world_to_cell(0.9, 0.2), Some((0, 1)));
        assert_eq!(grid.world_to_cell(0.0, 1.1), Some((1, 0)));
        assert_eq!(grid.world_to_cell(-0.6, 0.0), None);
        assert_eq!(grid.world_to_cell(5.0, 0.0), None);
        assert!(grid.is_traversable(1, 1));
        assert!(!grid.is_traversable(2, 0));
    }
}

// ── Ways ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod way {
    use wp_core::{CoreError, WayId};

    use super::helpers::bottom_way;
    use crate::{resample_ways, GridError, Way};

    #[test]
    fn straight_segment_at_half_step() {
        assert_eq!(bottom_way().resample(0.5).unwrap(), vec![[0.0, 0.0], [0.5, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn segment_ends_exactly_on_its_node() {
        let way = Way::from_coords(WayId(0), &[[0.0, 0.0], [1.0, 1.0], [1.0, 3.0]]);
        let pts = way.resample(0.3).unwrap();
        assert_eq!(pts.first(), Some(&[0.0, 0.0]));
        assert!(pts.contains(&[1.0, 1.0]));
        assert_eq!(pts.last(), Some(&[1.0, 3.0]));
        for w in pts.windows(2) {
            let step = (w[1][0] - w[0][0]).hypot(w[1][1] - w[0][1]);
            assert!(step <= 0.3 + 1e-12, "step {step}");
        }
    }

    #[test]
    fn degenerate_segment_emits_only_its_end() {
        let way = Way::from_coords(WayId(0), &[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(way.resample(1.0).unwrap(), vec![[0.0, 0.0], [0.0, 0.0], [1.0, 0.0]]);
    }

    #[test]
    fn single_node_and_empty_ways() {
        assert_eq!(Way::from_coords(WayId(0), &[[3.0, 4.0]]).resample(1.0).unwrap(), vec![[3.0, 4.0]]);
        assert!(Way::from_coords(WayId(0), &[]).resample(1.0).unwrap().is_empty());
    }

    #[test]
    fn segment_sample_count_is_bounded() {
        let err = bottom_way().resample(1e-9).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));

        let long = Way::from_coords(WayId(2), &[[0.0, 0.0], [1e12, 0.0]]);
        assert!(matches!(long.resample(1.0), Err(GridError::Config(_))));

        let overflowing = Way::from_coords(WayId(3), &[[-1e308, 0.0], [1e308, 0.0]]);
        assert!(matches!(overflowing.resample(1.0), Err(GridError::Config(_))));
    }

    #[test]
    fn non_finite_nodes_are_rejected() {
        let ways = [
            Way::from_coords(WayId(1), &[[f64::NAN, 0.0], [1.0, 1.0]]),
            Way::from_coords(WayId(2), &[[0.0, f64::INFINITY]]),
        ];
        for way in &ways {
            let err = way.resample(0.5).unwrap_err();
            assert!(matches!(err, GridError::Precondition(CoreError::Invalid(_))), "{way:?}");
        }
        assert!(resample_ways(&ways, 0.5).is_err());
    }

    #[test]
    fn references_keep_way_order_and_ids() {
        let ways = [
            bottom_way(),
            Way::from_coords(WayId(7), &[[5.0, 5.0]]),
        ];
        let refs = resample_ways(&ways, 0.5).unwrap();
        assert_eq!(refs.len(), 4);
        assert!(refs[..3].iter().all(|r| r.way == WayId(1)));
        assert_eq!(refs[3].way, WayId(7));
        assert_eq!(refs[3].point, [5.0, 5.0]);
    }
}

// ── Obstacles and index ───────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use wp_core::WayId;

    use super::helpers::bottom_way;
    use crate::{Barrier, NearestReference, ObstacleTest, Reference, ReferenceIndex};

    #[test]
    fn polygon_boundary_counts_as_inside() {
        let b = Barrier::rect([0.0, 0.0], [2.0, 2.0]);
        assert!(b.contains([1.0, 1.0]));
        assert!(b.contains([0.0, 0.0]));
        assert!(b.contains([2.0, 1.0]));
        assert!(!b.contains([2.1, 1.0]));
    }

    #[test]
    fn line_blocks_only_points_on_it() {
        let wall = Barrier::line(vec![[0.0, 1.0], [2.0, 1.0]]);
        assert!(wall.contains([1.0, 1.0]));
        assert!(!wall.contains([1.0, 0.5]));
    }

    #[test]
    fn nearest_reference_distance() {
        let index = ReferenceIndex::from_ways(&[bottom_way()], 0.5).unwrap();
        assert_eq!(index.len(), 3);
        let (d, r) = index.nearest([0.5, 2.0]).unwrap();
        assert!((d - 2.0).abs() < 1e-12);
        assert_eq!(r.point, [0.5, 0.0]);
    }

    #[test]
    fn non_finite_references_are_dropped_from_the_index() {
        let refs = vec![
            Reference { point: [f64::NAN, 0.0], way: WayId(1) },
            Reference { point: [1.0, 1.0], way: WayId(2) },
            Reference { point: [0.0, f64::NEG_INFINITY], way: WayId(3) },
        ];
        let index = ReferenceIndex::new(refs);
        assert_eq!(index.len(), 1);
        assert_eq!(index.nearest([0.0, 0.0]).unwrap().1.way, WayId(2));
    }

    #[test]
    fn barrier_finiteness() {
        assert!(Barrier::rect([0.0, 0.0], [1.0, 1.0]).is_finite());
        assert!(!Barrier::line(vec![[0.0, 0.0], [f64::NAN, 1.0]]).is_finite());
    }

    #[test]
    fn empty_index_has_no_nearest() {
        let index = ReferenceIndex::new(Vec::new());
        assert!(index.is_empty());
        assert!(index.nearest([0.0, 0.0]).is_none());
    }
}

// ── Cost map ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cost {
    use wp_core::WayId;

    use super::helpers::{bottom_way, unit_grid};
    use crate::{
        Barrier, CostMapBuilder, CostMapConfig, CostShape, GridError, NearestReference, Reference,
        Way, OBSTACLE_COST, OFF_PATH_COST,
    };

    const NO_BARRIERS: &[Barrier] = &[];

    #[test]
    fn shape_names_parse() {
        assert_eq!(" Quadratic".parse::<CostShape>().unwrap(), CostShape::Quadratic);
        assert_eq!("linear".parse::<CostShape>().unwrap(), CostShape::Linear);
        assert_eq!("zero".parse::<CostShape>().unwrap(), CostShape::Zero);
        assert!(matches!("cubic".parse::<CostShape>(), Err(GridError::UnknownCostShape(s)) if s == "cubic"));
    }

    #[test]
    fn quadratic_is_ratio_squared() {
        let config = CostMapConfig::default();
        assert_eq!(config.cost_shape, CostShape::Quadratic);
        assert_eq!(config.proximity_cost(0.0), 0.0);
        assert!((config.proximity_cost(0.5) - 0.25).abs() < 1e-12);
        assert!((config.proximity_cost(0.99) - 0.9801).abs() < 1e-12);
    }

    #[test]
    fn at_or_beyond_max_dist_is_off_path() {
        let config = CostMapConfig::default();
        assert_eq!(config.proximity_cost(1.0), OFF_PATH_COST);
        assert_eq!(config.proximity_cost(50.0), OFF_PATH_COST);
        assert!(OFF_PATH_COST.is_finite());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let bad = [
            CostMapConfig { max_path_dist: 0.0, ..CostMapConfig::default() },
            CostMapConfig { max_way_step: f64::NAN, ..CostMapConfig::default() },
            CostMapConfig { off_path_cost: 0.5, ..CostMapConfig::default() },
            CostMapConfig { off_path_cost: f64::INFINITY, ..CostMapConfig::default() },
        ];
        for config in bad {
            assert!(matches!(CostMapBuilder::new(config), Err(GridError::Config(_))), "{config:?}");
        }
    }

    #[test]
    fn on_way_cells_are_free_for_every_shape() {
        for shape in [CostShape::Linear, CostShape::Quadratic, CostShape::Zero] {
            let builder = CostMapBuilder::new(CostMapConfig::default().with_shape(shape)).unwrap();
            let grid = builder.build(unit_grid(), NO_BARRIERS, &[bottom_way()]).unwrap();
            assert_eq!(grid.cell(0, 0).unwrap().cost, 0.0, "{shape}");
            assert_eq!(grid.cell(0, 1).unwrap().cost, 0.0, "{shape}");
            // One unit from the way is exactly max_path_dist.
            assert_eq!(grid.cell(1, 0).unwrap().cost, OFF_PATH_COST, "{shape}");
        }
    }

    #[test]
    fn shaped_cost_between_way_and_limit() {
        let config = CostMapConfig { max_path_dist: 2.0, ..CostMapConfig::default() };
        let builder = CostMapBuilder::new(config.with_shape(CostShape::Linear)).unwrap();
        let grid = builder.build(unit_grid(), NO_BARRIERS, &[bottom_way()]).unwrap();
        assert!((grid.cell(1, 1).unwrap().cost - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_ways_means_everything_off_path() {
        let builder = CostMapBuilder::new(CostMapConfig::default()).unwrap();
        let grid = builder.build(unit_grid(), NO_BARRIERS, &[]).unwrap();
        assert!(grid.cells().iter().all(|c| c.cost == OFF_PATH_COST));
    }

    #[test]
    fn barrier_over_whole_bbox_blocks_every_cell() {
        let builder = CostMapBuilder::new(CostMapConfig::default()).unwrap();
        let barriers = [Barrier::rect([0.0, 0.0], [2.0, 2.0])];
        let grid = builder.build(unit_grid(), &barriers, &[bottom_way()]).unwrap();
        assert_eq!(grid.obstacle_count(), grid.len());
        for cell in grid.cells() {
            assert!(cell.obstacle);
            assert_eq!(cell.cost, OBSTACLE_COST);
            assert!(cell.cost.is_infinite());
        }
    }

    #[test]
    fn obstacle_overrides_proximity() {
        let builder = CostMapBuilder::new(CostMapConfig::default()).unwrap();
        let barriers = [Barrier::rect([-0.5, -0.5], [0.5, 0.5])];
        let grid = builder.build(unit_grid(), &barriers, &[bottom_way()]).unwrap();
        assert!(grid.cell(0, 0).unwrap().obstacle);
        assert!(grid.cell(0, 0).unwrap().cost.is_infinite());
        assert_eq!(grid.cell(0, 1).unwrap().cost, 0.0);
        assert_eq!(grid.obstacle_count(), 1);
    }

    #[test]
    fn oversampled_way_fails_the_build() {
        let config = CostMapConfig { max_way_step: 1e-9, ..CostMapConfig::default() };
        let builder = CostMapBuilder::new(config).unwrap();
        let result = builder.build(unit_grid(), NO_BARRIERS, &[bottom_way()]);
        assert!(matches!(result, Err(GridError::Config(_))));
    }

    /// Every query lands a fixed distance from a single reference.
    struct Fixed(f64);

    impl NearestReference for Fixed {
        fn nearest(&self, p: [f64; 2]) -> Option<(f64, Reference)> {
            Some((self.0, Reference { point: p, way: WayId(0) }))
        }

        fn len(&self) -> usize {
            1
        }
    }

    #[test]
    fn custom_index_is_honoured() {
        let builder = CostMapBuilder::new(CostMapConfig::default()).unwrap();
        let grid = builder.build_with_index(unit_grid(), NO_BARRIERS, &Fixed(0.5));
        assert!(grid.cells().iter().all(|c| (c.cost - 0.25).abs() < 1e-12));
    }

    #[test]
    fn repeated_build_is_identical() {
        let builder = CostMapBuilder::new(CostMapConfig::default()).unwrap();
        let ways: Vec<Way> = vec![bottom_way()];
        let a = builder.build(unit_grid(), NO_BARRIERS, &ways).unwrap();
        let b = builder.build(unit_grid(), NO_BARRIERS, &ways).unwrap();
        assert_eq!(a, b);
    }
}

// ── Map entry points ──────────────────────────────────────────────────────────

#[cfg(test)]
mod map {
    use wp_core::{CoreError, WayId};

    use super::helpers::bottom_way;
    use crate::{
        build_cost_grid, build_cost_grid_for_map, BBox, Barrier, CostMapConfig, GridError, MapData, Way,
    };

    fn map() -> MapData {
        MapData::new(BBox::new(0.0, 0.0, 2.0, 2.0))
            .with_barrier(Barrier::rect([1.0, 1.0], [2.0, 2.0]))
            .with_way(bottom_way())
    }

    #[test]
    fn builds_over_map_bbox() {
        let grid = build_cost_grid_for_map(&map(), 1.0, &CostMapConfig::default()).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.obstacle_count(), 1);
        assert!(grid.cell(1, 1).unwrap().obstacle);
        assert_eq!(grid.cell(0, 0).unwrap().cost, 0.0);
    }

    #[test]
    fn explicit_bbox_overrides_map_bbox() {
        let bbox = BBox::new(0.0, 0.0, 4.0, 1.0);
        let grid = build_cost_grid(bbox, 1.0, &map(), &CostMapConfig::default()).unwrap();
        assert_eq!((grid.rows(), grid.cols()), (1, 4));
    }

    #[test]
    fn non_finite_way_node_is_a_precondition_error() {
        let map = map().with_way(Way::from_coords(WayId(1), &[[f64::NAN, 0.0], [1.0, 1.0]]));
        let err = build_cost_grid_for_map(&map, 1.0, &CostMapConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::Precondition(CoreError::Invalid(_))));
    }

    #[test]
    fn non_finite_barrier_is_a_precondition_error() {
        let map = map().with_barrier(Barrier::polygon(vec![[0.0, 0.0], [f64::NAN, 1.0], [1.0, 1.0]]));
        let err = build_cost_grid_for_map(&map, 1.0, &CostMapConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::Precondition(CoreError::Invalid(_))));
    }

    #[test]
    fn huge_bbox_is_a_precondition_error() {
        let bbox = BBox::new(0.0, 0.0, 1e300, 1.0);
        let err = build_cost_grid(bbox, 1.0, &map(), &CostMapConfig::default()).unwrap_err();
        assert!(matches!(err, GridError::Precondition(_)));
    }

    #[test]
    fn config_checked_before_grid_bounds() {
        let config = CostMapConfig { max_way_step: 0.0, ..CostMapConfig::default() };
        let bad_bbox = BBox::new(1.0, 1.0, 0.0, 0.0);
        let err = build_cost_grid(bad_bbox, 1.0, &map(), &config).unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
    }
}

// ── CSV export ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod export {
    use super::helpers::{bottom_way, unit_grid};
    use crate::{Barrier, CostMapBuilder, CostMapConfig, GridCsvWriter};

    #[test]
    fn writes_header_and_one_row_per_cell() {
        let builder = CostMapBuilder::new(CostMapConfig::default()).unwrap();
        let barriers = [Barrier::rect([0.5, 0.5], [1.5, 1.5])];
        let grid = builder.build(unit_grid(), &barriers, &[bottom_way()]).unwrap();

        let mut writer = GridCsvWriter::from_writer(Vec::new());
        writer.write_grid(&grid).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "row,col,x,y,cost,obstacle");
        assert_eq!(lines.len(), 1 + grid.len());
        assert_eq!(lines[1], "0,0,0,0,0,0");
        assert_eq!(lines[4], "1,1,1,1,inf,1");
    }

    #[test]
    fn creates_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.csv");
        let mut writer = GridCsvWriter::create(&path).unwrap();
        writer.write_grid(&unit_grid()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
    }
}

// ── Parallel build ────────────────────────────────────────────────────────────

/// Run with `--features parallel`; checks the Rayon paths against a plain
/// sequential evaluation of the same inputs.
#[cfg(all(test, feature = "parallel"))]
mod parallel {
    use wp_core::WayId;

    use crate::{
        resample_ways, BBox, Barrier, CostMapBuilder, CostMapConfig, GridBuilder, NearestReference,
        ObstacleTest, ReferenceIndex, Way, OBSTACLE_COST,
    };

    fn ways() -> Vec<Way> {
        (0..12)
            .map(|i| {
                let y = i as f64 * 0.8;
                Way::from_coords(WayId(i), &[[0.0, y], [4.0, y + 1.0], [9.5, y]])
            })
            .collect()
    }

    #[test]
    fn resampling_matches_per_way_order() {
        let ways = ways();
        let expected: Vec<[f64; 2]> = ways.iter().flat_map(|w| w.resample(0.3).unwrap()).collect();
        let refs = resample_ways(&ways, 0.3).unwrap();
        assert_eq!(refs.iter().map(|r| r.point).collect::<Vec<_>>(), expected);
        assert!(refs.windows(2).all(|w| w[0].way <= w[1].way));
    }

    #[test]
    fn cost_map_matches_sequential_evaluation() {
        let config = CostMapConfig { max_path_dist: 0.7, ..CostMapConfig::default() };
        let barriers = [
            Barrier::rect([2.0, 2.0], [3.5, 4.0]),
            Barrier::line(vec![[6.0, 0.0], [6.0, 9.0]]),
        ];
        let ways = ways();
        let grid = GridBuilder::new(BBox::new(0.0, 0.0, 10.0, 10.0), 0.25).build().unwrap();
        let built = CostMapBuilder::new(config).unwrap().build(grid.clone(), &barriers, &ways).unwrap();

        let index = ReferenceIndex::from_ways(&ways, config.max_way_step).unwrap();
        for (cell, out) in grid.cells().iter().zip(built.cells()) {
            let p = [cell.x, cell.y];
            let obstacle = barriers.iter().any(|b| b.contains(p));
            let cost = if obstacle {
                OBSTACLE_COST
            } else {
                config.proximity_cost(index.nearest(p).unwrap().0)
            };
            assert_eq!(out.obstacle, obstacle, "{p:?}");
            assert_eq!(out.cost, cost, "{p:?}");
        }
    }
}

use float_cmp::approx_eq;
use vpindex::{Error, Point, VPTree, VPTreeBuilder, VantageSelection, L1, L2};

fn abcd() -> Vec<Point<f64, char>> {
    vec![
        Point::new(vec![0.0, 0.0], 'A'),
        Point::new(vec![1.0, 0.0], 'B'),
        Point::new(vec![0.0, 2.0], 'C'),
        Point::new(vec![5.0, 5.0], 'D'),
    ]
}

#[test]
fn four_point_knn() {
    for seed in 0..32 {
        let tree = VPTreeBuilder::new(L2).seed(seed).build(abcd()).unwrap();
        let hits = tree.search_knn(&[0.0, 0.0], 2).unwrap();
        let got: Vec<_> = hits.iter().map(|(d, p)| (*d, *p.id())).collect();
        assert_eq!(got, vec![(0.0, 'A'), (1.0, 'B')], "seed {}", seed);
    }
}

#[test]
fn four_point_range() {
    for seed in 0..32 {
        let tree = VPTreeBuilder::new(L2).seed(seed).build(abcd()).unwrap();
        let mut ids: Vec<_> = tree
            .search_range(&[0.0, 0.0], 2.5)
            .unwrap()
            .into_iter()
            .map(|(_, p)| *p.id())
            .collect();
        ids.sort();
        assert_eq!(ids, vec!['A', 'B', 'C'], "seed {}", seed);
    }
}

#[test]
fn four_point_everything() {
    let tree = VPTree::new(abcd(), L2).unwrap();
    let hits = tree.search_knn(&[0.0, 0.0], 10).unwrap();
    let ids: Vec<_> = hits.iter().map(|(_, p)| *p.id()).collect();
    assert_eq!(ids, vec!['A', 'B', 'C', 'D']);
    assert!(approx_eq!(f64, hits[3].0, 50f64.sqrt(), ulps = 2));

    let all = tree.search_range(&[0.0, 0.0], f64::INFINITY).unwrap();
    assert_eq!(all.len(), 4);
}

#[test]
fn single_point_tree() {
    let tree = VPTree::new(vec![Point::new(vec![3.0, 4.0], 'Z')], L2).unwrap();
    assert!(tree.root().is_leaf());

    let hits = tree.search_knn(&[0.0, 0.0], 5).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(*hits[0].1.id(), 'Z');
    assert!(approx_eq!(f64, hits[0].0, 5.0, ulps = 2));

    assert_eq!(tree.search_range(&[0.0, 0.0], 5.5).unwrap().len(), 1);
    assert!(tree.search_range(&[0.0, 0.0], 5.0).unwrap().is_empty());
}

#[test]
fn errors_come_before_results() {
    let tree = VPTree::new(abcd(), L1).unwrap();
    assert!(matches!(tree.search_knn(&[0.0, 0.0], 0), Err(Error::InvalidQuery(_))));
    assert!(matches!(
        tree.search_range(&[0.0, 0.0], -0.5),
        Err(Error::InvalidQuery(_))
    ));
    assert_eq!(
        tree.search_knn(&[0.0], 1).err(),
        Some(Error::DimensionMismatch { expected: 2, actual: 1 })
    );
    assert!(matches!(
        VPTree::<f64, char, _>::new(Vec::new(), L1),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn overflowing_distances_are_rejected() {
    // Squares of these coordinates overflow f32, so L2 yields infinity.
    let far: Vec<_> = [0.0f32, 1e20, 2e20, 3e20]
        .iter()
        .enumerate()
        .map(|(i, &x)| Point::new(vec![x], i))
        .collect();
    for seed in 0..8 {
        let result = VPTreeBuilder::new(L2).seed(seed).build(far.clone());
        assert!(matches!(result, Err(Error::InvalidDistance(_))), "seed {}", seed);
    }

    // A tree over tame points still refuses a query that overflows.
    let near: Vec<_> = (0..4).map(|i| Point::new(vec![i as f32], i)).collect();
    let tree = VPTreeBuilder::new(L2).seed(0).build(near).unwrap();
    assert!(matches!(
        tree.search_knn(&[1e20f32], 4),
        Err(Error::InvalidDistance(_))
    ));
    assert!(matches!(
        tree.search_range(&[1e20f32], 1.0),
        Err(Error::InvalidDistance(_))
    ));
    assert!(matches!(
        tree.nearest_neighbor(&[1e20f32]),
        Err(Error::InvalidDistance(_))
    ));
}

#[test]
fn large_finite_distances_keep_every_neighbor() {
    let wide: Vec<_> = [0.0f32, 1e15, 2e15, 3e15]
        .iter()
        .enumerate()
        .map(|(i, &x)| Point::new(vec![x], i))
        .collect();
    for seed in 0..8 {
        let tree = VPTreeBuilder::new(L2).seed(seed).build(wide.clone()).unwrap();
        let hits = tree.search_knn(&[0.0f32], 4).unwrap();
        let ids: Vec<_> = hits.iter().map(|(_, p)| *p.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3], "seed {}", seed);
        assert_eq!(hits[0].0, 0.0);
        assert_eq!(tree.search_range(&[0.0f32], f32::INFINITY).unwrap().len(), 4);
    }
}

/// Squared distance breaks the triangle inequality, so pruning may discard
/// the subtree that holds the true nearest neighbor. This pins down what
/// the search returns in that case.
#[test]
fn squared_distance_can_miss_the_nearest() {
    let squared = |a: &[f64], b: &[f64]| (a[0] - b[0]) * (a[0] - b[0]);
    let points: Vec<_> = [0.0, 4.0, 5.0, 10.0]
        .iter()
        .map(|&x| Point::new(vec![x], x as i32))
        .collect();

    // Deterministic shape: 10 at the root (mu = 36) with 5 inside; 0 outside
    // (mu = 16) with 4 beyond it.
    let tree = VPTreeBuilder::new(squared)
        .selection(VantageSelection::FarthestFromCentroid)
        .build(points)
        .unwrap();
    let root = tree.root();
    assert_eq!(*root.vantage_point().id(), 10);
    assert_eq!(root.threshold(), Some(36.0));
    assert_eq!(*root.inner().unwrap().vantage_point().id(), 5);
    let outer = root.outer().unwrap();
    assert_eq!(*outer.vantage_point().id(), 0);
    assert_eq!(outer.threshold(), Some(16.0));
    assert_eq!(*outer.outer().unwrap().vantage_point().id(), 4);

    // Brute force says 4 (at 2.25); the tree answers 0 (at 6.25).
    let hits = tree.search_knn(&[2.5], 1).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(*hits[0].1.id(), 0);
    assert_eq!(hits[0].0, 6.25);

    // A true metric over the same points finds it.
    let tree = VPTreeBuilder::new(L1)
        .selection(VantageSelection::FarthestFromCentroid)
        .build(vec![
            Point::new(vec![0.0], 0),
            Point::new(vec![4.0], 4),
            Point::new(vec![5.0], 5),
            Point::new(vec![10.0], 10),
        ])
        .unwrap();
    let hits = tree.search_knn(&[2.5], 1).unwrap();
    assert_eq!(*hits[0].1.id(), 4);
}

#[test]
fn concurrent_queries_share_one_tree() {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let points: Vec<_> = (0..500)
        .map(|i| Point::new(vec![(i % 25) as f64, (i / 25) as f64], i))
        .collect();
    let tree = VPTreeBuilder::new(L2).seed(11).build(points).unwrap();
    assert_send_sync(&tree);

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let tree = &tree;
                s.spawn(move || {
                    let q = [t as f64 * 5.0, t as f64 * 4.0];
                    let knn = tree.search_knn(&q, 7).unwrap();
                    let range = tree.search_range(&q, 2.0).unwrap();
                    (knn.len(), range.len())
                })
            })
            .collect();
        for h in handles {
            let (k, r) = h.join().unwrap();
            assert_eq!(k, 7);
            // Points within distance 2 of a lattice point: itself, 4 at 1,
            // 4 at sqrt(2); the 4 at distance 2 are excluded. Queries on the
            // edge of the grid see fewer.
            assert!(r >= 4 && r <= 9, "range found {}", r);
        }
    });
}

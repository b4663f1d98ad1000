//! Vantage-Point Trees are a data structure for fast exact
//! k-nearest-neighbor and range searches in arbitrary metric spaces.
//!
//! Nodes live in a flat arena and refer to their children by index. Both
//! construction and search walk the tree with an explicit work-stack, so a
//! degenerate (chain-shaped) tree never exhausts the call stack.
use std::fmt::{Debug, Display, Write};

use num::{Float, NumCast};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::{Error, Result};
use crate::median::median;
use crate::metric::{checked_distance, Metric};
use crate::point::Point;

pub trait Scalar: Float + Debug + Display {}
impl<T: Float + Debug + Display> Scalar for T {}

/// Strategy used to pick the vantage point of each partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VantageSelection {
    /// Uniformly at random from the remaining points.
    #[default]
    Random,
    /// The point farthest (under the tree's metric) from the coordinate-wise
    /// mean of the remaining points. Deterministic; ties go to the earliest
    /// point in input order.
    FarthestFromCentroid,
}

pub(crate) const ROOT: usize = 0;

pub(crate) struct VPNode<F, I> {
    pub(crate) center: Point<F, I>,
    pub(crate) mu: Option<F>,
    pub(crate) inner: Option<usize>,
    pub(crate) outer: Option<usize>,
}

/// Where a freshly built node hangs in the tree.
enum Slot {
    Root,
    Inner(usize),
    Outer(usize),
}

fn centroid<F: Scalar, I>(items: &[Point<F, I>], dim: usize) -> Result<Vec<F>> {
    let n: F = NumCast::from(items.len()).ok_or_else(|| {
        Error::InvalidInput(format!("{} points do not fit the scalar type", items.len()))
    })?;
    let mut sum = vec![F::zero(); dim];
    for p in items {
        for (s, &x) in sum.iter_mut().zip(p.coords()) {
            *s = *s + x;
        }
    }
    Ok(sum.into_iter().map(|s| s / n).collect())
}

fn select_vantage_point<F, I, M, R>(
    items: &[Point<F, I>],
    metric: &M,
    selection: VantageSelection,
    dim: usize,
    rng: &mut R,
) -> Result<usize>
where
    F: Scalar,
    M: Metric<F>,
    R: Rng + ?Sized,
{
    if items.len() == 1 {
        return Ok(0);
    }
    match selection {
        VantageSelection::Random => Ok(rng.gen_range(0..items.len())),
        VantageSelection::FarthestFromCentroid => {
            let c = centroid(items, dim)?;
            let mut best = (F::neg_infinity(), 0);
            for (i, p) in items.iter().enumerate() {
                let d = checked_distance(metric, &c, p.coords())?;
                if d > best.0 {
                    best = (d, i);
                }
            }
            Ok(best.1)
        }
    }
}

/// Configures and builds a [`VPTree`].
///
/// ```
/// use vpindex::{Point, VPTreeBuilder, VantageSelection, L2};
///
/// let points = vec![
///     Point::new(vec![0.0, 0.0], 'a'),
///     Point::new(vec![3.0, 4.0], 'b'),
/// ];
/// let tree = VPTreeBuilder::new(L2)
///     .selection(VantageSelection::Random)
///     .seed(7)
///     .build(points)
///     .unwrap();
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct VPTreeBuilder<M> {
    metric: M,
    selection: VantageSelection,
    seed: Option<u64>,
}

impl<M> VPTreeBuilder<M> {
    pub fn new(metric: M) -> Self {
        VPTreeBuilder {
            metric,
            selection: VantageSelection::default(),
            seed: None,
        }
    }

    pub fn selection(mut self, selection: VantageSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Seed the pivot source, making random trees reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build<F, I>(self, points: Vec<Point<F, I>>) -> Result<VPTree<F, I, M>>
    where
        F: Scalar,
        M: Metric<F>,
    {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        VPTree::build_with_rng(points, self.metric, self.selection, &mut rng)
    }
}

/// A vantage-point tree over a fixed set of points.
///
/// The tree is immutable once built; any number of queries may run against
/// it concurrently, each owning its own search state.
pub struct VPTree<F, I, M> {
    pub(crate) nodes: Vec<VPNode<F, I>>,
    pub(crate) metric: M,
    pub(crate) dim: usize,
}

impl<F: Scalar, I, M: Metric<F>> VPTree<F, I, M> {
    /// Construct a new vantage point tree with randomly chosen vantage
    /// points.
    pub fn new(points: Vec<Point<F, I>>, metric: M) -> Result<Self> {
        VPTreeBuilder::new(metric).build(points)
    }

    /// Construct a tree, drawing vantage points from `rng`.
    ///
    /// Fails with [`Error::InvalidInput`] on an empty point set and with
    /// [`Error::DimensionMismatch`] if the points disagree on
    /// dimensionality.
    pub fn build_with_rng<R: Rng + ?Sized>(
        points: Vec<Point<F, I>>,
        metric: M,
        selection: VantageSelection,
        rng: &mut R,
    ) -> Result<Self> {
        let n = points.len();
        let dim = match points.first() {
            Some(p) => p.dim(),
            None => {
                return Err(Error::InvalidInput(
                    "cannot build a tree from an empty point set".to_string(),
                ))
            }
        };
        if let Some(p) = points.iter().find(|p| p.dim() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: p.dim(),
            });
        }

        let mut nodes: Vec<VPNode<F, I>> = Vec::with_capacity(n);
        let mut pending = vec![(points, Slot::Root)];
        let mut distances: Vec<F> = Vec::new();
        let mut scratch: Vec<F> = Vec::new();

        while let Some((mut items, slot)) = pending.pop() {
            let at = select_vantage_point(&items, &metric, selection, dim, rng)?;
            let center = items.remove(at);

            let idx = nodes.len();
            match slot {
                Slot::Root => {}
                Slot::Inner(parent) => nodes[parent].inner = Some(idx),
                Slot::Outer(parent) => nodes[parent].outer = Some(idx),
            }

            if items.is_empty() {
                nodes.push(VPNode { center, mu: None, inner: None, outer: None });
                continue;
            }

            distances.clear();
            for p in &items {
                distances.push(checked_distance(&metric, center.coords(), p.coords())?);
            }
            scratch.clear();
            scratch.extend_from_slice(&distances);
            let mu = median(&mut scratch)
                .ok_or_else(|| Error::InvalidInput("empty partition".to_string()))?;

            // Points exactly at the median go outside.
            let mut inner_items = Vec::new();
            let mut outer_items = Vec::new();
            for (p, &d) in items.into_iter().zip(distances.iter()) {
                if d >= mu {
                    outer_items.push(p);
                } else {
                    inner_items.push(p);
                }
            }

            nodes.push(VPNode { center, mu: Some(mu), inner: None, outer: None });
            if !outer_items.is_empty() {
                pending.push((outer_items, Slot::Outer(idx)));
            }
            if !inner_items.is_empty() {
                pending.push((inner_items, Slot::Inner(idx)));
            }
        }

        let tree = VPTree { nodes, metric, dim };
        debug!(
            points = n,
            dim,
            height = tree.height(),
            ?selection,
            "built vantage-point tree"
        );
        Ok(tree)
    }
}

impl<F, I, M> VPTree<F, I, M> {
    /// Number of indexed points (equal to the number of nodes).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dimensionality shared by every indexed point.
    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(ROOT, 1)];
        while let Some((idx, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.nodes[idx];
            stack.extend(node.inner.iter().chain(node.outer.iter()).map(|&c| (c, depth + 1)));
        }
        height
    }

    /// All indexed points, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Point<F, I>> + '_ {
        self.nodes.iter().map(|n| &n.center)
    }

    pub fn root(&self) -> NodeRef<'_, F, I, M> {
        NodeRef { tree: self, index: ROOT }
    }

    /// Render the tree as indented text, one node per line.
    pub fn dump(&self) -> String
    where
        F: Debug,
        I: Debug,
    {
        let mut out = String::new();
        let mut stack = vec![(ROOT, 0, "root")];
        while let Some((idx, depth, side)) = stack.pop() {
            let node = &self.nodes[idx];
            let _ = writeln!(
                out,
                "{:indent$}{} id={:?} at={:?} mu={:?}",
                "",
                side,
                node.center.id(),
                node.center.coords(),
                node.mu,
                indent = depth * 2
            );
            if let Some(outer) = node.outer {
                stack.push((outer, depth + 1, "outer"));
            }
            if let Some(inner) = node.inner {
                stack.push((inner, depth + 1, "inner"));
            }
        }
        out
    }
}

/// Read-only view of one node of a [`VPTree`].
pub struct NodeRef<'a, F, I, M> {
    tree: &'a VPTree<F, I, M>,
    index: usize,
}

impl<'a, F, I, M> Clone for NodeRef<'a, F, I, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, F, I, M> Copy for NodeRef<'a, F, I, M> {}

impl<'a, F, I, M> NodeRef<'a, F, I, M> {
    fn node(&self) -> &'a VPNode<F, I> {
        &self.tree.nodes[self.index]
    }

    pub fn vantage_point(&self) -> &'a Point<F, I> {
        &self.node().center
    }

    /// Partitioning radius; `None` for a leaf.
    pub fn threshold(&self) -> Option<F>
    where
        F: Copy,
    {
        self.node().mu
    }

    /// Subtree of points strictly closer than the threshold.
    pub fn inner(&self) -> Option<Self> {
        self.node().inner.map(|index| NodeRef { tree: self.tree, index })
    }

    /// Subtree of points at or beyond the threshold.
    pub fn outer(&self) -> Option<Self> {
        self.node().outer.map(|index| NodeRef { tree: self.tree, index })
    }

    pub fn is_leaf(&self) -> bool {
        self.node().mu.is_none()
    }

    /// Every point stored in this node's subtree, itself included.
    pub fn subtree_points(&self) -> Vec<&'a Point<F, I>> {
        let mut points = Vec::new();
        let mut stack = vec![self.index];
        while let Some(idx) = stack.pop() {
            let node = &self.tree.nodes[idx];
            points.push(&node.center);
            stack.extend(node.inner.iter().chain(node.outer.iter()));
        }
        points
    }
}

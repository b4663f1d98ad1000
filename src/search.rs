//! Exact k-nearest-neighbor and range search over a built [`VPTree`].
//!
//! Both searches share one traversal. At each node the query's distance to
//! the vantage point `d` is compared against the threshold `mu` and the
//! current bound `tau`: the inner subtree can only hold a hit when
//! `d <= mu + tau`, the outer one only when `d >= mu - tau`. The side the
//! query falls on is visited first, and the test for the other side is
//! re-evaluated once that subtree is done, so a bound that tightened in the
//! meantime is taken into account.
use tracing::trace;

use crate::buffer::BoundedBuffer;
use crate::error::{Error, Result};
use crate::metric::{checked_distance, Metric};
use crate::point::Point;
use crate::vptree::{VPTree, ROOT};
use crate::Scalar;

/// Counters collected while answering one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose vantage point was compared against the query.
    pub visited: usize,
}

/// The per-query state a traversal feeds candidates into.
trait Neighborhood<F> {
    /// Current pruning bound.
    fn tau(&self) -> F;

    /// Offer the node at `index`, at distance `d` from the query.
    fn consider(&mut self, d: F, index: usize);
}

struct Nearest<F> {
    hits: BoundedBuffer<F, usize>,
    tau: F,
}

impl<F: Scalar> Nearest<F> {
    fn new(k: usize) -> Self {
        Nearest {
            hits: BoundedBuffer::new(k),
            tau: F::infinity(),
        }
    }
}

impl<F: Scalar> Neighborhood<F> for Nearest<F> {
    fn tau(&self) -> F {
        self.tau
    }

    fn consider(&mut self, d: F, index: usize) {
        if d < self.tau {
            self.hits.push(d, index);
            self.tau = self.hits.peek_max().unwrap_or_else(F::infinity);
        }
    }
}

struct Within<F> {
    radius: F,
    hits: Vec<(F, usize)>,
}

impl<F: Scalar> Neighborhood<F> for Within<F> {
    fn tau(&self) -> F {
        self.radius
    }

    fn consider(&mut self, d: F, index: usize) {
        if d < self.radius {
            self.hits.push((d, index));
        }
    }
}

enum Step<F> {
    Visit(usize),
    /// Re-check the inner child of `node` once the outer side is done.
    Inner { node: usize, d: F },
    /// Re-check the outer child of `node` once the inner side is done.
    Outer { node: usize, d: F },
}

impl<F: Scalar, I, M: Metric<F>> VPTree<F, I, M> {
    fn check_query(&self, query: &[F]) -> Result<()> {
        if query.len() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        Ok(())
    }

    fn traverse<N: Neighborhood<F>>(&self, query: &[F], hood: &mut N) -> Result<SearchStats> {
        let mut stats = SearchStats::default();
        let mut stack = vec![Step::Visit(ROOT)];

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit(idx) => {
                    let node = &self.nodes[idx];
                    let d = checked_distance(&self.metric, query, node.center.coords())?;
                    stats.visited += 1;
                    hood.consider(d, idx);

                    let mu = match node.mu {
                        Some(mu) => mu,
                        None => continue,
                    };
                    let tau = hood.tau();
                    if d < mu {
                        if node.outer.is_some() {
                            stack.push(Step::Outer { node: idx, d });
                        }
                        if let Some(inner) = node.inner {
                            if d <= mu + tau {
                                stack.push(Step::Visit(inner));
                            }
                        }
                    } else {
                        if node.inner.is_some() {
                            stack.push(Step::Inner { node: idx, d });
                        }
                        if let Some(outer) = node.outer {
                            if d >= mu - tau {
                                stack.push(Step::Visit(outer));
                            }
                        }
                    }
                }
                Step::Inner { node, d } => {
                    let node = &self.nodes[node];
                    if let (Some(mu), Some(inner)) = (node.mu, node.inner) {
                        if d <= mu + hood.tau() {
                            stack.push(Step::Visit(inner));
                        }
                    }
                }
                Step::Outer { node, d } => {
                    let node = &self.nodes[node];
                    if let (Some(mu), Some(outer)) = (node.mu, node.outer) {
                        if d >= mu - hood.tau() {
                            stack.push(Step::Visit(outer));
                        }
                    }
                }
            }
        }
        Ok(stats)
    }

    fn resolve(&self, hits: Vec<(F, usize)>) -> Vec<(F, &Point<F, I>)> {
        hits.into_iter()
            .map(|(d, idx)| (d, &self.nodes[idx].center))
            .collect()
    }

    /// Find the `k` points closest to `query`, ascending by distance.
    ///
    /// Returns `min(k, self.len())` pairs. Points at equal distance come
    /// back in no defined order.
    pub fn search_knn<Q>(&self, query: &Q, k: usize) -> Result<Vec<(F, &Point<F, I>)>>
    where
        Q: AsRef<[F]> + ?Sized,
    {
        self.search_knn_with_stats(query, k).map(|(hits, _)| hits)
    }

    pub fn search_knn_with_stats<Q>(
        &self,
        query: &Q,
        k: usize,
    ) -> Result<(Vec<(F, &Point<F, I>)>, SearchStats)>
    where
        Q: AsRef<[F]> + ?Sized,
    {
        let query = query.as_ref();
        if k == 0 {
            return Err(Error::InvalidQuery("k must be positive".to_string()));
        }
        self.check_query(query)?;

        let mut hood = Nearest::new(k);
        let stats = self.traverse(query, &mut hood)?;
        let hits = hood.hits.into_sorted_vec();
        trace!(k, visited = stats.visited, found = hits.len(), "knn search");
        Ok((self.resolve(hits), stats))
    }

    /// Find the single point closest to `query`.
    pub fn nearest_neighbor<Q>(&self, query: &Q) -> Result<(F, &Point<F, I>)>
    where
        Q: AsRef<[F]> + ?Sized,
    {
        let hits = self.search_knn(query, 1)?;
        // A tree is never empty and every finite distance beats the initial
        // unbounded `tau`, so a successful search always yields one hit.
        Ok(hits[0])
    }

    /// Find every point strictly closer than `radius` to `query`.
    ///
    /// Each match appears exactly once; the order is unspecified.
    pub fn search_range<Q>(&self, query: &Q, radius: F) -> Result<Vec<(F, &Point<F, I>)>>
    where
        Q: AsRef<[F]> + ?Sized,
    {
        self.search_range_with_stats(query, radius).map(|(hits, _)| hits)
    }

    pub fn search_range_with_stats<Q>(
        &self,
        query: &Q,
        radius: F,
    ) -> Result<(Vec<(F, &Point<F, I>)>, SearchStats)>
    where
        Q: AsRef<[F]> + ?Sized,
    {
        let query = query.as_ref();
        if radius.is_nan() || radius < F::zero() {
            return Err(Error::InvalidQuery(format!(
                "radius must be non-negative, got {}",
                radius
            )));
        }
        self.check_query(query)?;

        let mut hood = Within {
            radius,
            hits: Vec::new(),
        };
        let stats = self.traverse(query, &mut hood)?;
        trace!(%radius, visited = stats.visited, found = hood.hits.len(), "range search");
        Ok((self.resolve(hood.hits), stats))
    }
}

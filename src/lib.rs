//! Exact nearest-neighbor and range search in metric spaces with a
//! vantage-point tree.
//!
//! ```
//! use vpindex::{Point, VPTree, L2};
//!
//! let points = vec![
//!     Point::new(vec![0.0, 0.0], "a"),
//!     Point::new(vec![1.0, 0.0], "b"),
//!     Point::new(vec![0.0, 2.0], "c"),
//!     Point::new(vec![5.0, 5.0], "d"),
//! ];
//! let tree = VPTree::new(points, L2).unwrap();
//!
//! let nearest = tree.search_knn(&[0.0, 0.0], 2).unwrap();
//! assert_eq!(nearest[0], (0.0, &Point::new(vec![0.0, 0.0], "a")));
//! assert_eq!(*nearest[1].1.id(), "b");
//!
//! let close = tree.search_range(&[0.0, 0.0], 2.5).unwrap();
//! assert_eq!(close.len(), 3);
//! ```
pub mod buffer;
pub mod error;
pub mod median;
pub mod metric;
pub mod point;
pub mod search;
pub mod vptree;

pub use buffer::BoundedBuffer;
pub use error::{Error, Result};
pub use median::median;
pub use metric::{Metric, L1, L2};
pub use point::Point;
pub use search::SearchStats;
pub use vptree::{NodeRef, Scalar, VPTree, VPTreeBuilder, VantageSelection};

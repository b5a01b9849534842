//! Boolean operations on 2D vector paths.
//!
//! Both operands are flattened into straight segments, split at every crossing and assembled into a planar mesh.
//! A sweep line then assigns each edge the winding numbers of both operands on either side, the requested operation
//! decides which edges bound the result, and the result is traced back out of the mesh as closed polygons.

mod aabb;
mod combiner;
mod epsilons;
mod flatten;
mod intersection_finder;
mod mesh;
mod path;
mod path_clip;
#[cfg(feature = "parsing")]
mod path_data;
mod quad_tree;
mod reconstruct;
mod segment;
mod sweep;
mod util;
mod vector;
mod vertex_pool;
mod winding;

pub use aabb::Aabb;
pub use combiner::ClipOperation;
pub use epsilons::{EPS, Epsilons};
pub use flatten::{flatten_cubic, flatten_quadratic};
pub use path::{FillRule, Path, PathCommand, path_bounding_box, path_from_bez_path, path_is_empty, path_to_bez_path, path_to_rect, rect_to_path, subpaths};
pub use path_clip::{ClipError, contains, intersects, path_clip, path_clip_with_epsilons, path_contains_point, simplify, simplify_with_epsilons};
#[cfg(feature = "parsing")]
pub use path_data::{PathDataError, path_from_path_data, path_to_path_data};
pub use vector::Vector;

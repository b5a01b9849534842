use thiserror::Error;

use crate::aabb::{Aabb, bounding_boxes_overlap, intersect_bounding_boxes};
use crate::combiner::{BooleanCombiner, ClipOperation};
use crate::epsilons::{EPS, Epsilons};
use crate::intersection_finder::{IntersectionFinder, Pairing, has_crossings, unsplit_sub_edges};
use crate::mesh::WingedEdgeMesh;
use crate::path::{FillRule, Path, PathCommand, path_bounding_box, path_is_empty, path_to_rect, rect_to_path};
#[cfg(feature = "logging")]
use crate::path_data::path_to_path_data;
use crate::reconstruct::PathReconstructor;
use crate::segment::{Operand, Segment, SegmentCollector};
use crate::sweep::{classify_edges, winding_at};
use crate::vector::Vector;
use crate::vertex_pool::VertexPool;
use crate::winding::Winding;

/// Internal inconsistency detected while rebuilding the result. No partial output is returned alongside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ClipError {
	#[error("the boundary walk starting at edge {edge} did not close")]
	UnclosedTraversal { edge: usize },

	#[error("edge {edge} was reached against its orientation")]
	OrientationMismatch { edge: usize },
}

/// Combines two paths with a boolean operation, using the default tolerances.
///
/// The result is made of straight lines only and is meant to be filled with [`FillRule::NonZero`]. Its outer
/// boundaries run counter-clockwise in a y-up view, holes clockwise.
///
/// An empty operand covers nothing: `Union` and `Exclude` return the other operand, `Intersect` is empty and
/// `Subtract` returns `a` as it is, so subtracting from an empty `a` is empty.
pub fn path_clip(a: &[PathCommand], fill_a: FillRule, b: &[PathCommand], fill_b: FillRule, operation: ClipOperation) -> Result<Path, ClipError> {
	path_clip_with_epsilons(a, fill_a, b, fill_b, operation, &EPS)
}

pub fn path_clip_with_epsilons(a: &[PathCommand], fill_a: FillRule, b: &[PathCommand], fill_b: FillRule, operation: ClipOperation, eps: &Epsilons) -> Result<Path, ClipError> {
	if operation == ClipOperation::Simplify {
		return simplify_with_epsilons(a, fill_a, eps);
	}

	#[cfg(feature = "logging")]
	log::trace!("{operation:?}\n  a ({fill_a:?}): {}\n  b ({fill_b:?}): {}", path_to_path_data(a), path_to_path_data(b));

	if let Some(result) = shortcut(a, fill_a, b, fill_b, operation, eps)? {
		log::debug!("{operation:?} answered without building a mesh");
		return Ok(result);
	}

	let mesh = build_mesh(a, b, eps);
	let result = clip_mesh(&mesh, operation, fill_a, fill_b)?;

	#[cfg(feature = "logging")]
	log::trace!("result: {}", path_to_path_data(&result));

	Ok(result)
}

/// Resolves self-intersections and overlapping subpaths of `path`, keeping the area selected by `fill`.
pub fn simplify(path: &[PathCommand], fill: FillRule) -> Result<Path, ClipError> {
	simplify_with_epsilons(path, fill, &EPS)
}

pub fn simplify_with_epsilons(path: &[PathCommand], fill: FillRule, eps: &Epsilons) -> Result<Path, ClipError> {
	if path_is_empty(path) {
		return Ok(Path::new());
	}
	let mesh = build_mesh(path, &[], eps);
	clip_mesh(&mesh, ClipOperation::Simplify, fill, FillRule::NonZero)
}

/// `true` when the areas filled by `a` and `b` (both with [`FillRule::NonZero`]) overlap. Touching boundaries do not
/// count.
pub fn intersects(a: &[PathCommand], b: &[PathCommand]) -> bool {
	if path_is_empty(a) || path_is_empty(b) {
		return false;
	}
	let (Some(box_a), Some(box_b)) = (path_bounding_box(a), path_bounding_box(b)) else { return false };
	if !bounding_boxes_overlap(&box_a, &box_b) {
		return false;
	}
	if let (Some(rect_a), Some(rect_b)) = (path_to_rect(a), path_to_rect(b)) {
		return intersect_bounding_boxes(&rect_a, &rect_b).is_some_and(|overlap| overlap.width() > 0. && overlap.height() > 0.);
	}

	let (segments, pool) = collect_segments(a, b, &EPS);
	if has_crossings(&segments, &pool, &EPS) {
		return true;
	}

	let mesh = split_into_mesh(segments, pool, &EPS);
	let combiner = BooleanCombiner::new(ClipOperation::Intersect, FillRule::NonZero, FillRule::NonZero);
	mesh.edges().iter().any(|edge| combiner.region_inside(edge.winding) || combiner.region_inside(edge.right_winding()))
}

/// `true` when `rect` lies entirely inside the area filled by `path` with [`FillRule::NonZero`].
///
/// Empty and zero-area rectangles are never contained.
pub fn contains(path: &[PathCommand], rect: &Aabb) -> bool {
	if rect.is_empty() || rect.width() <= 0. || rect.height() <= 0. || path_is_empty(path) {
		return false;
	}
	if !path_bounding_box(path).is_some_and(|bounding_box| bounding_box.contains_box(rect)) {
		return false;
	}
	if let Some(path_rect) = path_to_rect(path) {
		return path_rect.contains_box(rect);
	}

	let rect_path = rect_to_path(rect);
	let (segments, pool) = collect_segments(path, &rect_path, &EPS);
	let mesh = split_into_mesh(segments, pool, &EPS);

	let center = (rect.min() + rect.max()) / 2.;
	if !FillRule::NonZero.is_inside(winding_at(&mesh, center).a) {
		return false;
	}

	// No region may be inside the rectangle but outside the path
	let combiner = BooleanCombiner::new(ClipOperation::Subtract, FillRule::NonZero, FillRule::NonZero);
	let outside_path = |winding: Winding| combiner.inside_b(winding) && !combiner.inside_a(winding);
	!mesh.edges().iter().any(|edge| outside_path(edge.winding) || outside_path(edge.right_winding()))
}

/// `true` when `point` lies in the area `path` fills with `fill`. Points on the boundary may go either way.
pub fn path_contains_point(path: &[PathCommand], fill: FillRule, point: Vector) -> bool {
	if !path_bounding_box(path).is_some_and(|bounding_box| bounding_box.contains_box(&Aabb::from_points(point, point))) {
		return false;
	}
	// Ray casting only needs the segments, crossings between them don't matter
	let (segments, pool) = collect_segments(path, &[], &EPS);
	let mesh = WingedEdgeMesh::build(pool.into_points(), unsplit_sub_edges(&segments));
	fill.is_inside(winding_at(&mesh, point).a)
}

/// Answers the cases that don't need a mesh. `None` means the full algorithm has to run.
fn shortcut(a: &[PathCommand], fill_a: FillRule, b: &[PathCommand], fill_b: FillRule, operation: ClipOperation, eps: &Epsilons) -> Result<Option<Path>, ClipError> {
	use ClipOperation::*;

	let empty = Ok(Some(Path::new()));
	match (path_is_empty(a), path_is_empty(b)) {
		(true, true) => return empty,
		(true, false) => {
			return match operation {
				Union | Exclude => as_nonzero(b, fill_b, eps).map(Some),
				Intersect | Subtract | Simplify => empty,
			};
		}
		(false, true) => {
			return match operation {
				Intersect => empty,
				Union | Exclude | Subtract | Simplify => as_nonzero(a, fill_a, eps).map(Some),
			};
		}
		(false, false) => {}
	}

	if a == b && fill_a == fill_b {
		return match operation {
			Intersect | Union | Simplify => as_nonzero(a, fill_a, eps).map(Some),
			Subtract | Exclude => empty,
		};
	}

	let (Some(box_a), Some(box_b)) = (path_bounding_box(a), path_bounding_box(b)) else { return Ok(None) };
	if !bounding_boxes_overlap(&box_a, &box_b) {
		return match operation {
			Intersect => empty,
			Subtract | Simplify => as_nonzero(a, fill_a, eps).map(Some),
			Union | Exclude if fill_a == FillRule::NonZero && fill_b == FillRule::NonZero => Ok(Some(a.iter().chain(b).copied().collect())),
			Union | Exclude => Ok(None),
		};
	}

	if let (Some(rect_a), Some(rect_b)) = (path_to_rect(a), path_to_rect(b)) {
		return Ok(match operation {
			Intersect => Some(match intersect_bounding_boxes(&rect_a, &rect_b) {
				Some(overlap) if overlap.width() > 0. && overlap.height() > 0. => rect_to_path(&overlap),
				_ => Path::new(),
			}),
			Union if rect_a.contains_box(&rect_b) => Some(rect_to_path(&rect_a)),
			Union if rect_b.contains_box(&rect_a) => Some(rect_to_path(&rect_b)),
			Subtract if rect_b.contains_box(&rect_a) => Some(Path::new()),
			_ => None,
		});
	}

	Ok(None)
}

/// An operand returned as the result, converted so that filling it with [`FillRule::NonZero`] covers the same area.
fn as_nonzero(path: &[PathCommand], fill: FillRule, eps: &Epsilons) -> Result<Path, ClipError> {
	match fill {
		FillRule::NonZero => Ok(path.to_vec()),
		FillRule::EvenOdd => simplify_with_epsilons(path, fill, eps),
	}
}

fn collect_segments(a: &[PathCommand], b: &[PathCommand], eps: &Epsilons) -> (Vec<Segment>, VertexPool) {
	let mut pool = VertexPool::new(eps.point);
	let mut collector = SegmentCollector::new(&mut pool, eps);
	collector.add_path(a, Operand::A);
	collector.add_path(b, Operand::B);
	let segments = collector.finish();
	(segments, pool)
}

/// Splits the segments at all their intersections and builds the classified mesh.
fn split_into_mesh(mut segments: Vec<Segment>, mut pool: VertexPool, eps: &Epsilons) -> WingedEdgeMesh {
	let sub_edges = IntersectionFinder::new(&mut pool, eps).split(&mut segments, Pairing::All);
	log::debug!("{} segments split into {} sub-edges over {} vertices", segments.len(), sub_edges.len(), pool.len());

	let mut mesh = WingedEdgeMesh::build(pool.into_points(), sub_edges);
	debug_assert!(mesh.validate(), "traversal cycles of the mesh must close");
	classify_edges(&mut mesh);
	mesh
}

fn build_mesh(a: &[PathCommand], b: &[PathCommand], eps: &Epsilons) -> WingedEdgeMesh {
	let (segments, pool) = collect_segments(a, b, eps);
	split_into_mesh(segments, pool, eps)
}

fn clip_mesh(mesh: &WingedEdgeMesh, operation: ClipOperation, fill_a: FillRule, fill_b: FillRule) -> Result<Path, ClipError> {
	let selection = BooleanCombiner::new(operation, fill_a, fill_b).select(mesh);
	log::debug!("{operation:?}: {} of {} edges bound the result", selection.iter().flatten().count(), mesh.edge_count());
	PathReconstructor::new(mesh, &selection).reconstruct()
}

#[cfg(test)]
mod tests {
	use super::*;
	use glam::DVec2;

	fn square(x: f64, y: f64, size: f64) -> Path {
		rect_to_path(&Aabb::new(x, y, x + size, y + size))
	}

	fn triangle(points: [(f64, f64); 3]) -> Path {
		let [p0, p1, p2] = points.map(|(x, y)| DVec2::new(x, y));
		vec![PathCommand::MoveTo(p0), PathCommand::LineTo(p1), PathCommand::LineTo(p2), PathCommand::Close]
	}

	#[test]
	fn empty_operands() {
		let a = square(0., 0., 1.);
		assert_eq!(path_clip(&[], FillRule::NonZero, &[], FillRule::NonZero, ClipOperation::Union), Ok(Path::new()));
		assert_eq!(path_clip(&[], FillRule::NonZero, &a, FillRule::NonZero, ClipOperation::Union), Ok(a.clone()));
		assert_eq!(path_clip(&a, FillRule::NonZero, &[], FillRule::NonZero, ClipOperation::Subtract), Ok(a.clone()));
		assert_eq!(path_clip(&[], FillRule::NonZero, &a, FillRule::NonZero, ClipOperation::Subtract), Ok(Path::new()));
		assert_eq!(path_clip(&a, FillRule::NonZero, &[], FillRule::NonZero, ClipOperation::Intersect), Ok(Path::new()));
	}

	#[test]
	fn rectangles_take_the_fast_path() {
		let a = square(0., 0., 2.);
		let b = square(1., 1., 2.);
		assert_eq!(path_clip(&a, FillRule::NonZero, &b, FillRule::NonZero, ClipOperation::Intersect), Ok(square(1., 1., 1.)));
		assert_eq!(path_clip(&a, FillRule::NonZero, &square(0.5, 0.5, 1.), FillRule::NonZero, ClipOperation::Union), Ok(a.clone()));
		assert_eq!(path_clip(&square(0.5, 0.5, 1.), FillRule::NonZero, &a, FillRule::NonZero, ClipOperation::Subtract), Ok(Path::new()));
		assert_eq!(path_clip(&a, FillRule::NonZero, &square(2., 0., 1.), FillRule::NonZero, ClipOperation::Intersect), Ok(Path::new()));
	}

	#[test]
	fn disjoint_union_concatenates() {
		let a = triangle([(0., 0.), (1., 0.), (0., 1.)]);
		let b = triangle([(5., 5.), (6., 5.), (5., 6.)]);
		let union = path_clip(&a, FillRule::NonZero, &b, FillRule::NonZero, ClipOperation::Union).unwrap();
		assert_eq!(union.len(), a.len() + b.len());
		assert_eq!(path_clip(&a, FillRule::NonZero, &b, FillRule::NonZero, ClipOperation::Subtract), Ok(a.clone()));
	}

	#[test]
	fn overlapping_triangles() {
		let a = triangle([(0., 0.), (4., 0.), (0., 4.)]);
		let b = triangle([(1., 1.), (5., 1.), (1., 5.)]);
		let intersection = path_clip(&a, FillRule::NonZero, &b, FillRule::NonZero, ClipOperation::Intersect).unwrap();
		// Triangle (1, 1), (3, 1), (1, 3)
		let corners: Vec<_> = intersection.iter().filter_map(PathCommand::end_point).collect();
		assert_eq!(corners.len(), 3);
		for corner in [DVec2::new(1., 1.), DVec2::new(3., 1.), DVec2::new(1., 3.)] {
			assert!(corners.iter().any(|point| point.abs_diff_eq(corner, 1e-9)), "{corner} missing from {corners:?}");
		}
	}

	#[test]
	fn even_odd_operand_is_normalised() {
		let mut ring = square(0., 0., 3.);
		ring.extend(square(1., 1., 1.));
		let result = path_clip(&ring, FillRule::EvenOdd, &[], FillRule::NonZero, ClipOperation::Union).unwrap();
		assert!(path_contains_point(&result, FillRule::NonZero, DVec2::new(0.5, 0.5)));
		assert!(!path_contains_point(&result, FillRule::NonZero, DVec2::new(1.5, 1.5)));
	}

	#[test]
	fn bow_tie_simplifies_into_two_lobes() {
		let bow_tie = vec![
			PathCommand::MoveTo(DVec2::new(0., 0.)),
			PathCommand::LineTo(DVec2::new(2., 2.)),
			PathCommand::LineTo(DVec2::new(2., 0.)),
			PathCommand::LineTo(DVec2::new(0., 2.)),
			PathCommand::Close,
		];
		let simplified = simplify(&bow_tie, FillRule::NonZero).unwrap();
		assert_eq!(simplified.iter().filter(|command| matches!(command, PathCommand::MoveTo(_))).count(), 2);
		assert!(path_contains_point(&simplified, FillRule::NonZero, DVec2::new(0.5, 1.)));
		assert!(path_contains_point(&simplified, FillRule::NonZero, DVec2::new(1.5, 1.)));
		assert!(!path_contains_point(&simplified, FillRule::NonZero, DVec2::new(1., 0.5)));
		assert!(!path_contains_point(&simplified, FillRule::NonZero, DVec2::new(1., 1.5)));
	}

	#[test]
	fn crossing_on_a_horizontal_edge() {
		// The first side crosses the horizontal side at (14/3, 3), splitting the path into a counter-clockwise and a
		// clockwise loop
		let path = vec![
			PathCommand::MoveTo(DVec2::new(6., 4.)),
			PathCommand::LineTo(DVec2::new(2., 1.)),
			PathCommand::LineTo(DVec2::new(5., 3.)),
			PathCommand::LineTo(DVec2::new(3., 3.)),
			PathCommand::Close,
		];
		let simplified = simplify(&path, FillRule::NonZero).unwrap();
		assert!((kurbo::Shape::area(&crate::path::path_to_bez_path(&simplified)) - 7. / 6.).abs() < 1e-9);
		assert!(simplified.iter().filter_map(PathCommand::end_point).any(|point| point.y == 3. && (point.x - 14. / 3.).abs() < 1e-9));
		assert!(path_contains_point(&simplified, FillRule::NonZero, DVec2::new(3.9, 2.3)));
		assert!(path_contains_point(&simplified, FillRule::NonZero, DVec2::new(4.5, 3.3)));
		assert!(!path_contains_point(&simplified, FillRule::NonZero, DVec2::new(5., 2.)));
		assert!(!path_contains_point(&simplified, FillRule::NonZero, DVec2::new(2., 3.)));

		let square = square(2., 2., 2.);
		let union = path_clip(&path, FillRule::NonZero, &square, FillRule::NonZero, ClipOperation::Union).unwrap();
		assert!(path_contains_point(&union, FillRule::NonZero, DVec2::new(4.5, 3.3)));
		assert!(path_contains_point(&union, FillRule::NonZero, DVec2::new(2.5, 2.5)));
	}

	#[test]
	fn intersects_queries() {
		let a = triangle([(0., 0.), (4., 0.), (0., 4.)]);
		assert!(intersects(&a, &triangle([(1., 1.), (5., 1.), (1., 5.)])));
		assert!(intersects(&a, &triangle([(0.5, 0.5), (1., 0.5), (0.5, 1.)])));
		assert!(!intersects(&a, &triangle([(3., 3.), (5., 3.), (3., 5.)])));
		assert!(!intersects(&square(0., 0., 1.), &square(1., 0., 1.)));
		assert!(!intersects(&a, &[]));
	}

	#[test]
	fn contains_queries() {
		let a = triangle([(0., 0.), (4., 0.), (0., 4.)]);
		assert!(contains(&a, &Aabb::new(0.5, 0.5, 1.5, 1.5)));
		assert!(contains(&a, &Aabb::new(0., 0., 1., 1.)));
		assert!(!contains(&a, &Aabb::new(1.5, 1.5, 2.5, 2.5)));
		assert!(!contains(&a, &Aabb::new(1., 1., 1., 2.)));
		assert!(contains(&square(0., 0., 4.), &Aabb::new(1., 1., 2., 2.)));

		let mut ring = square(0., 0., 3.);
		ring.extend(triangle([(1., 1.), (1., 2.), (2., 2.)]));
		assert!(!contains(&ring, &Aabb::new(0.5, 0.5, 2.5, 2.5)));
		assert!(contains(&ring, &Aabb::new(0.25, 0.25, 0.75, 2.75)));
	}
}

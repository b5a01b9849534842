use crate::aabb::expand_bounding_box;
use crate::epsilons::Epsilons;
use crate::path::line_segment::{LineSegment, line_segment_intersection, line_segment_param, point_on_segment_interior};
use crate::quad_tree::QuadTree;
use crate::segment::{Operand, Segment};
use crate::vector::Vector;
use crate::vertex_pool::VertexPool;

/// Which segment pairs are tested against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Pairing {
	/// Every pair, so self-intersections of one operand are resolved too.
	All,
	/// Only pairs made of one segment of each operand.
	CrossOperand,
}

impl Pairing {
	fn accepts(self, a: Operand, b: Operand) -> bool {
		match self {
			Pairing::All => true,
			Pairing::CrossOperand => a != b,
		}
	}
}

/// Straight piece of a split segment, running from `from` to `to` in the input direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SubEdge {
	pub operand: Operand,
	pub from: usize,
	pub to: usize,
}

const QUAD_TREE_DEPTH: usize = 8;
const QUAD_TREE_NODE_CAPACITY: usize = 16;

pub(crate) struct IntersectionFinder<'a> {
	pool: &'a mut VertexPool,
	eps: &'a Epsilons,
}

impl<'a> IntersectionFinder<'a> {
	pub(crate) fn new(pool: &'a mut VertexPool, eps: &'a Epsilons) -> Self {
		IntersectionFinder { pool, eps }
	}

	/// Records every intersection between candidate pairs on both segments involved. Returns the number of
	/// intersections recorded.
	pub(crate) fn produce_intersections(&mut self, segments: &mut [Segment], pairing: Pairing) -> usize {
		let mut count = 0;
		for (i, j) in candidate_pairs(segments, self.eps, pairing) {
			count += self.intersect_pair(segments, i, j);
		}
		count
	}

	/// Splits every segment at its intersections.
	pub(crate) fn split(&mut self, segments: &mut [Segment], pairing: Pairing) -> Vec<SubEdge> {
		let count = self.produce_intersections(segments, pairing);
		log::trace!("{count} intersections between {} segments", segments.len());
		split_segments(segments)
	}

	fn line(&self, segment: &Segment) -> LineSegment {
		[self.pool.point(segment.a), self.pool.point(segment.b)]
	}

	fn intersect_pair(&mut self, segments: &mut [Segment], i: usize, j: usize) -> usize {
		let line_i = self.line(&segments[i]);
		let line_j = self.line(&segments[j]);
		let before = segments[i].intersections.len() + segments[j].intersections.len();

		if let Some((s, _)) = line_segment_intersection(line_i, line_j, self.eps.param) {
			let point = snap_to_axis_aligned(line_i[0].lerp(line_i[1], s.clamp(0., 1.)), [line_i, line_j]);
			let vertex = self.pool.add_point(point);
			let position = self.pool.point(vertex);
			segments[i].add_intersection(line_segment_param(line_i, position), vertex);
			segments[j].add_intersection(line_segment_param(line_j, position), vertex);
		}

		// End points resting on the other segment: T-junctions and collinear overlaps
		for (target, line, other) in [(i, line_i, j), (j, line_j, i)] {
			for vertex in [segments[other].a, segments[other].b] {
				let position = self.pool.point(vertex);
				if point_on_segment_interior(line, position, self.eps.point) {
					segments[target].add_intersection(line_segment_param(line, position), vertex);
				}
			}
		}

		segments[i].intersections.len() + segments[j].intersections.len() - before
	}
}

/// Moves a crossing point exactly onto the horizontal or vertical lines among `lines`, so it doesn't land a rounding
/// error away from their coordinate.
fn snap_to_axis_aligned(mut point: Vector, lines: [LineSegment; 2]) -> Vector {
	for [start, end] in lines {
		if start.y == end.y {
			point.y = start.y;
		}
		if start.x == end.x {
			point.x = start.x;
		}
	}
	point
}

fn candidate_pairs(segments: &[Segment], eps: &Epsilons, pairing: Pairing) -> Vec<(usize, usize)> {
	let boxes = segments.iter().enumerate().map(|(index, segment)| (expand_bounding_box(&segment.bounding_box, eps.point), index));
	let Some(tree) = QuadTree::from_pairs(boxes, QUAD_TREE_DEPTH, QUAD_TREE_NODE_CAPACITY) else {
		return Vec::new();
	};

	let mut pairs = Vec::new();
	for (i, segment) in segments.iter().enumerate() {
		let mut candidates: Vec<usize> = tree
			.find(&expand_bounding_box(&segment.bounding_box, eps.point))
			.into_iter()
			.filter(|&j| j > i && pairing.accepts(segment.operand, segments[j].operand))
			.collect();
		candidates.sort_unstable();
		pairs.extend(candidates.into_iter().map(|j| (i, j)));
	}
	pairs
}

fn split_segments(segments: &mut [Segment]) -> Vec<SubEdge> {
	let mut sub_edges = Vec::with_capacity(segments.len());
	for segment in segments.iter_mut() {
		let chain = segment.split_points();
		sub_edges.extend(chain.windows(2).map(|pair| SubEdge {
			operand: segment.operand,
			from: pair[0],
			to: pair[1],
		}));
	}
	sub_edges
}

/// Sub-edges of unsplit segments, for queries that only need winding numbers.
pub(crate) fn unsplit_sub_edges(segments: &[Segment]) -> Vec<SubEdge> {
	segments
		.iter()
		.map(|segment| SubEdge {
			operand: segment.operand,
			from: segment.a,
			to: segment.b,
		})
		.collect()
}

/// `true` when a segment of one operand properly crosses a segment of the other: both crossing parameters are in the
/// open interval and the crossing point is not one of the four end points. Touching does not count.
pub(crate) fn has_crossings(segments: &[Segment], pool: &VertexPool, eps: &Epsilons) -> bool {
	let line = |segment: &Segment| [pool.point(segment.a), pool.point(segment.b)];
	let interior = |param: f64| param > eps.param && param < 1. - eps.param;

	candidate_pairs(segments, eps, Pairing::CrossOperand).into_iter().any(|(i, j)| {
		let (line_i, line_j) = (line(&segments[i]), line(&segments[j]));
		let Some((s, t)) = line_segment_intersection(line_i, line_j, eps.param) else { return false };
		if !interior(s) || !interior(t) {
			return false;
		}
		let point = line_i[0].lerp(line_i[1], s);
		!line_i.iter().chain(line_j.iter()).any(|end| end.abs_diff_eq(point, eps.point))
	})
}

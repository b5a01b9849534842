use smallvec::SmallVec;

use crate::aabb::Aabb;
use crate::epsilons::Epsilons;
use crate::flatten::{flatten_cubic, flatten_quadratic};
use crate::path::PathCommand;
use crate::vector::Vector;
use crate::vertex_pool::VertexPool;

/// Which input path a segment came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Operand {
	A = 0,
	B = 1,
}

/// A vertex inserted on a segment, at parameter `t` along it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Intersection {
	pub t: f64,
	pub vertex: usize,
}

/// A straight piece of an input path, between two pooled vertices.
#[derive(Clone, Debug)]
pub(crate) struct Segment {
	pub operand: Operand,
	pub a: usize,
	pub b: usize,
	pub bounding_box: Aabb,
	pub intersections: SmallVec<[Intersection; 2]>,
}

impl Segment {
	/// Records a vertex on the segment's interior. End points and parameters outside `(0, 1)` are ignored.
	pub(crate) fn add_intersection(&mut self, t: f64, vertex: usize) {
		if vertex != self.a && vertex != self.b && t > 0. && t < 1. {
			self.intersections.push(Intersection { t, vertex });
		}
	}

	/// Vertex chain from `a` to `b` through all intersections, ordered by `t`.
	pub(crate) fn split_points(&mut self) -> SmallVec<[usize; 4]> {
		self.intersections.sort_by(|x, y| x.t.total_cmp(&y.t));

		let mut chain = SmallVec::new();
		chain.push(self.a);
		for intersection in &self.intersections {
			if chain.last() != Some(&intersection.vertex) {
				chain.push(intersection.vertex);
			}
		}
		if chain.last() != Some(&self.b) {
			chain.push(self.b);
		}
		chain
	}
}

/// Collects the straight segments of every subpath of `path`, flattening curves and closing open subpaths.
///
/// Segments whose ends fall onto the same pooled vertex are dropped.
pub(crate) struct SegmentCollector<'a> {
	pool: &'a mut VertexPool,
	eps: &'a Epsilons,
	segments: Vec<Segment>,
}

impl<'a> SegmentCollector<'a> {
	pub(crate) fn new(pool: &'a mut VertexPool, eps: &'a Epsilons) -> Self {
		SegmentCollector { pool, eps, segments: Vec::new() }
	}

	pub(crate) fn add_path(&mut self, path: &[PathCommand], operand: Operand) {
		let mut start: Option<(Vector, usize)> = None;
		let mut current: Option<(Vector, usize)> = None;

		for cmd in path {
			match *cmd {
				PathCommand::MoveTo(point) => {
					self.close_subpath(start, current, operand);
					let vertex = self.pool.add_point(point);
					start = Some((point, vertex));
					current = start;
				}
				PathCommand::LineTo(point) => {
					let from = self.current_or_start(&mut start, current, point);
					current = Some(self.add_line(from, point, operand));
				}
				PathCommand::QuadTo(ctrl, point) => {
					let from = self.current_or_start(&mut start, current, point);
					let mut last = from;
					for next in flatten_quadratic(from.0, ctrl, point, self.eps.flatten_tolerance) {
						last = self.add_line(last, next, operand);
					}
					current = Some(last);
				}
				PathCommand::CubicTo(ctrl1, ctrl2, point) => {
					let from = self.current_or_start(&mut start, current, point);
					let mut last = from;
					for next in flatten_cubic(from.0, ctrl1, ctrl2, point, self.eps.flatten_tolerance) {
						last = self.add_line(last, next, operand);
					}
					current = Some(last);
				}
				PathCommand::Close => {
					self.close_subpath(start, current, operand);
					current = start;
				}
			}
		}
		self.close_subpath(start, current, operand);
	}

	/// A drawing command without a preceding move starts a new subpath at its own end point.
	fn current_or_start(&mut self, start: &mut Option<(Vector, usize)>, current: Option<(Vector, usize)>, point: Vector) -> (Vector, usize) {
		current.unwrap_or_else(|| {
			let first = (point, self.pool.add_point(point));
			*start = Some(first);
			first
		})
	}

	fn close_subpath(&mut self, start: Option<(Vector, usize)>, current: Option<(Vector, usize)>, operand: Operand) {
		if let (Some(start), Some(current)) = (start, current) {
			if start.1 != current.1 {
				self.add_line(current, start.0, operand);
			}
		}
	}

	fn add_line(&mut self, (_, a): (Vector, usize), to: Vector, operand: Operand) -> (Vector, usize) {
		let b = self.pool.add_point(to);
		if a != b {
			self.segments.push(Segment {
				operand,
				a,
				b,
				bounding_box: Aabb::from_points(self.pool.point(a), self.pool.point(b)),
				intersections: SmallVec::new(),
			});
		}
		(to, b)
	}

	pub(crate) fn finish(self) -> Vec<Segment> {
		self.segments
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::epsilons::EPS;
	use glam::DVec2;

	fn collect(path: &[PathCommand]) -> (Vec<Segment>, VertexPool) {
		let mut pool = VertexPool::new(EPS.point);
		let mut collector = SegmentCollector::new(&mut pool, &EPS);
		collector.add_path(path, Operand::A);
		let segments = collector.finish();
		(segments, pool)
	}

	#[test]
	fn closes_open_subpaths() {
		let (segments, pool) = collect(&[PathCommand::MoveTo(DVec2::new(0., 0.)), PathCommand::LineTo(DVec2::new(1., 0.)), PathCommand::LineTo(DVec2::new(1., 1.))]);
		assert_eq!(segments.len(), 3);
		assert_eq!(pool.len(), 3);
		assert_eq!(segments[2].b, segments[0].a);
	}

	#[test]
	fn explicit_closing_line_is_not_duplicated() {
		let (segments, _) = collect(&[
			PathCommand::MoveTo(DVec2::new(0., 0.)),
			PathCommand::LineTo(DVec2::new(1., 0.)),
			PathCommand::LineTo(DVec2::new(1., 1.)),
			PathCommand::LineTo(DVec2::new(0., 0.)),
			PathCommand::Close,
		]);
		assert_eq!(segments.len(), 3);
	}

	#[test]
	fn zero_length_segments_are_dropped() {
		let (segments, _) = collect(&[
			PathCommand::MoveTo(DVec2::new(0., 0.)),
			PathCommand::LineTo(DVec2::new(1., 0.)),
			PathCommand::LineTo(DVec2::new(1., 1e-9)),
			PathCommand::LineTo(DVec2::new(0., 1.)),
			PathCommand::Close,
		]);
		assert_eq!(segments.len(), 3);
		assert!(segments.iter().all(|segment| segment.a != segment.b));
	}

	#[test]
	fn curves_are_flattened() {
		let (segments, _) = collect(&[PathCommand::MoveTo(DVec2::new(0., 0.)), PathCommand::CubicTo(DVec2::new(0., 10.), DVec2::new(10., 10.), DVec2::new(10., 0.)), PathCommand::Close]);
		assert!(segments.len() > 4);
		assert!(segments.iter().all(|segment| segment.operand == Operand::A));
	}

	#[test]
	fn split_points_follow_parameter_order() {
		let mut segment = Segment {
			operand: Operand::B,
			a: 0,
			b: 1,
			bounding_box: Aabb::default(),
			intersections: SmallVec::new(),
		};
		segment.add_intersection(0.75, 3);
		segment.add_intersection(0.25, 2);
		segment.add_intersection(0.25, 2);
		segment.add_intersection(0.5, 1);
		assert_eq!(segment.split_points().as_slice(), &[0, 2, 3, 1]);
	}
}

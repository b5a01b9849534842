//! Curve flattening. Curves are replaced by polylines before clipping; the iterators returned here are lazy and
//! yield every polyline vertex after the curve's start point, ending with the curve's end point.

use glam::DVec2;
use lyon_geom::{CubicBezierSegment, Point, QuadraticBezierSegment, point};

use crate::vector::Vector;

fn to_point(vector: Vector) -> Point<f64> {
	point(vector.x, vector.y)
}

fn to_vector(point: Point<f64>) -> Vector {
	DVec2::new(point.x, point.y)
}

pub fn flatten_quadratic(from: Vector, ctrl: Vector, to: Vector, tolerance: f64) -> impl Iterator<Item = Vector> {
	QuadraticBezierSegment {
		from: to_point(from),
		ctrl: to_point(ctrl),
		to: to_point(to),
	}
	.flattened(tolerance)
	.map(to_vector)
}

pub fn flatten_cubic(from: Vector, ctrl1: Vector, ctrl2: Vector, to: Vector, tolerance: f64) -> impl Iterator<Item = Vector> {
	CubicBezierSegment {
		from: to_point(from),
		ctrl1: to_point(ctrl1),
		ctrl2: to_point(ctrl2),
		to: to_point(to),
	}
	.flattened(tolerance)
	.map(to_vector)
}

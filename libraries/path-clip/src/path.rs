pub(crate) mod line_segment;

use glam::DVec2;
use kurbo::{BezPath, PathEl, Point};

use crate::aabb::{Aabb, extend_bounding_box};
use crate::vector::Vector;

/// One element of a path. Coordinates are absolute.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathCommand {
	MoveTo(Vector),
	LineTo(Vector),
	/// Quadratic Bézier curve: control point, end point.
	QuadTo(Vector, Vector),
	/// Cubic Bézier curve: first control point, second control point, end point.
	CubicTo(Vector, Vector, Vector),
	Close,
}

impl PathCommand {
	/// The point the pen ends up at, `None` for [`PathCommand::Close`].
	pub fn end_point(&self) -> Option<Vector> {
		match *self {
			PathCommand::MoveTo(point) | PathCommand::LineTo(point) | PathCommand::QuadTo(_, point) | PathCommand::CubicTo(_, _, point) => Some(point),
			PathCommand::Close => None,
		}
	}
}

pub type Path = Vec<PathCommand>;

/// Rule deciding which winding numbers count as filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillRule {
	#[default]
	NonZero,
	EvenOdd,
}

impl FillRule {
	/// Bit mask applied to a winding number; the point is inside when any bit survives.
	pub const fn mask(self) -> i32 {
		match self {
			FillRule::NonZero => !0,
			FillRule::EvenOdd => 1,
		}
	}

	#[inline]
	pub const fn is_inside(self, winding: i32) -> bool {
		winding & self.mask() != 0
	}
}

/// Splits a path into its subpaths. Each slice starts at a `MoveTo` unless the path itself doesn't.
pub fn subpaths(path: &[PathCommand]) -> impl Iterator<Item = &[PathCommand]> {
	let mut rest = path;
	std::iter::from_fn(move || {
		if rest.is_empty() {
			return None;
		}
		let end = rest.iter().skip(1).position(|cmd| matches!(cmd, PathCommand::MoveTo(_))).map_or(rest.len(), |index| index + 1);
		let (subpath, tail) = rest.split_at(end);
		rest = tail;
		Some(subpath)
	})
}

/// `true` when the path draws nothing: no commands, or only moves and closes.
pub fn path_is_empty(path: &[PathCommand]) -> bool {
	!path.iter().any(|cmd| matches!(cmd, PathCommand::LineTo(_) | PathCommand::QuadTo(..) | PathCommand::CubicTo(..)))
}

/// Bounding box of all points of the path, control points included.
pub fn path_bounding_box(path: &[PathCommand]) -> Option<Aabb> {
	let mut bounding_box = None;
	for cmd in path {
		match *cmd {
			PathCommand::MoveTo(p) | PathCommand::LineTo(p) => bounding_box = Some(extend_bounding_box(bounding_box, p)),
			PathCommand::QuadTo(c, p) => {
				bounding_box = Some(extend_bounding_box(bounding_box, c));
				bounding_box = Some(extend_bounding_box(bounding_box, p));
			}
			PathCommand::CubicTo(c1, c2, p) => {
				for point in [c1, c2, p] {
					bounding_box = Some(extend_bounding_box(bounding_box, point));
				}
			}
			PathCommand::Close => {}
		}
	}
	bounding_box
}

/// Detects a path that is exactly one axis-aligned rectangle, made of straight lines only.
pub fn path_to_rect(path: &[PathCommand]) -> Option<Aabb> {
	let mut commands = path.iter();
	let mut points = match commands.next()? {
		PathCommand::MoveTo(point) => vec![*point],
		_ => return None,
	};
	let mut closed = false;
	for cmd in commands {
		match *cmd {
			PathCommand::LineTo(point) if !closed => points.push(point),
			PathCommand::Close if !closed => closed = true,
			_ => return None,
		}
	}

	if points.len() == 5 && points[0] == points[4] {
		points.pop();
	}
	let [p0, p1, p2, p3] = points[..] else { return None };

	let horizontal_first = p0.y == p1.y && p1.x == p2.x && p2.y == p3.y && p3.x == p0.x;
	let vertical_first = p0.x == p1.x && p1.y == p2.y && p2.x == p3.x && p3.y == p0.y;
	let rect = Aabb::from_points(p0, p2);

	((horizontal_first || vertical_first) && rect.width() > 0. && rect.height() > 0.).then_some(rect)
}

/// Closed counter-clockwise (in a y-up view) path around a rectangle.
pub fn rect_to_path(rect: &Aabb) -> Path {
	vec![
		PathCommand::MoveTo(DVec2::new(rect.left(), rect.top())),
		PathCommand::LineTo(DVec2::new(rect.right(), rect.top())),
		PathCommand::LineTo(DVec2::new(rect.right(), rect.bottom())),
		PathCommand::LineTo(DVec2::new(rect.left(), rect.bottom())),
		PathCommand::Close,
	]
}

fn point_to_vector(point: Point) -> Vector {
	DVec2::new(point.x, point.y)
}

fn vector_to_point(vector: Vector) -> Point {
	Point::new(vector.x, vector.y)
}

pub fn path_from_bez_path(bez_path: &BezPath) -> Path {
	bez_path
		.elements()
		.iter()
		.map(|element| match *element {
			PathEl::MoveTo(p) => PathCommand::MoveTo(point_to_vector(p)),
			PathEl::LineTo(p) => PathCommand::LineTo(point_to_vector(p)),
			PathEl::QuadTo(c, p) => PathCommand::QuadTo(point_to_vector(c), point_to_vector(p)),
			PathEl::CurveTo(c1, c2, p) => PathCommand::CubicTo(point_to_vector(c1), point_to_vector(c2), point_to_vector(p)),
			PathEl::ClosePath => PathCommand::Close,
		})
		.collect()
}

pub fn path_to_bez_path(path: &[PathCommand]) -> BezPath {
	let mut bez_path = BezPath::new();
	for cmd in path {
		bez_path.push(match *cmd {
			PathCommand::MoveTo(p) => PathEl::MoveTo(vector_to_point(p)),
			PathCommand::LineTo(p) => PathEl::LineTo(vector_to_point(p)),
			PathCommand::QuadTo(c, p) => PathEl::QuadTo(vector_to_point(c), vector_to_point(p)),
			PathCommand::CubicTo(c1, c2, p) => PathEl::CurveTo(vector_to_point(c1), vector_to_point(c2), vector_to_point(p)),
			PathCommand::Close => PathEl::ClosePath,
		});
	}
	bez_path
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square(x: f64, y: f64, size: f64) -> Path {
		rect_to_path(&Aabb::new(x, y, x + size, y + size))
	}

	#[test]
	fn fill_rule_masks() {
		assert!(FillRule::NonZero.is_inside(2));
		assert!(FillRule::NonZero.is_inside(-1));
		assert!(!FillRule::NonZero.is_inside(0));
		assert!(!FillRule::EvenOdd.is_inside(2));
		assert!(FillRule::EvenOdd.is_inside(-3));
	}

	#[test]
	fn splits_subpaths_at_moves() {
		let mut path = square(0., 0., 1.);
		path.extend(square(2., 0., 1.));
		let parts: Vec<_> = subpaths(&path).collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0].len(), 5);
		assert_eq!(parts[1][0], PathCommand::MoveTo(DVec2::new(2., 0.)));
		assert_eq!(subpaths(&[]).count(), 0);
	}

	#[test]
	fn detects_rectangles() {
		assert_eq!(path_to_rect(&square(1., 2., 3.)), Some(Aabb::new(1., 2., 4., 5.)));

		let explicit_close = vec![
			PathCommand::MoveTo(DVec2::new(0., 0.)),
			PathCommand::LineTo(DVec2::new(0., 2.)),
			PathCommand::LineTo(DVec2::new(1., 2.)),
			PathCommand::LineTo(DVec2::new(1., 0.)),
			PathCommand::LineTo(DVec2::new(0., 0.)),
		];
		assert_eq!(path_to_rect(&explicit_close), Some(Aabb::new(0., 0., 1., 2.)));

		let skewed = vec![
			PathCommand::MoveTo(DVec2::new(0., 0.)),
			PathCommand::LineTo(DVec2::new(1., 0.)),
			PathCommand::LineTo(DVec2::new(1.5, 1.)),
			PathCommand::LineTo(DVec2::new(0., 1.)),
			PathCommand::Close,
		];
		assert_eq!(path_to_rect(&skewed), None);

		let mut two_squares = square(0., 0., 1.);
		two_squares.extend(square(2., 0., 1.));
		assert_eq!(path_to_rect(&two_squares), None);
	}

	#[test]
	fn bounding_box_includes_control_points() {
		let path = vec![PathCommand::MoveTo(DVec2::ZERO), PathCommand::QuadTo(DVec2::new(1., 5.), DVec2::new(2., 0.))];
		assert_eq!(path_bounding_box(&path), Some(Aabb::new(0., 0., 2., 5.)));
		assert_eq!(path_bounding_box(&[]), None);
	}

	#[test]
	fn empty_paths() {
		assert!(path_is_empty(&[]));
		assert!(path_is_empty(&[PathCommand::MoveTo(DVec2::ONE), PathCommand::Close]));
		assert!(!path_is_empty(&square(0., 0., 1.)));
	}

	#[test]
	fn kurbo_conversion_keeps_commands() {
		let path = vec![
			PathCommand::MoveTo(DVec2::new(0., 0.)),
			PathCommand::CubicTo(DVec2::new(1., 0.), DVec2::new(1., 1.), DVec2::new(0., 1.)),
			PathCommand::QuadTo(DVec2::new(-1., 1.), DVec2::new(0., 0.)),
			PathCommand::Close,
		];
		assert_eq!(path_from_bez_path(&path_to_bez_path(&path)), path);
	}
}

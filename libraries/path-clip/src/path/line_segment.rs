use glam::DVec2;

pub type LineSegment = [DVec2; 2];

/// Intersects two line segments, returning the parameters `(s, t)` of the crossing on the first and second segment.
///
/// Parallel and numerically degenerate pairs (zero or non-finite reciprocal of the denominator) yield `None`.
#[inline(never)]
pub fn line_segment_intersection([p1, p2]: LineSegment, [p3, p4]: LineSegment, eps: f64) -> Option<(f64, f64)> {
	// https://en.wikipedia.org/wiki/Intersection_(geometry)#Two_line_segments

	let a = p2 - p1;
	let b = p3 - p4;
	let c = p3 - p1;

	let denom = a.x * b.y - a.y * b.x;
	let inv_denom = denom.recip();

	if denom == 0. || !inv_denom.is_finite() {
		return None;
	}

	let s = (c.x * b.y - c.y * b.x) * inv_denom;
	let t = (a.x * c.y - a.y * c.x) * inv_denom;

	if (-eps..=1. + eps).contains(&s) && (-eps..=1. + eps).contains(&t) { Some((s, t)) } else { None }
}

/// Parameter of the projection of `point` onto the segment's supporting line.
pub fn line_segment_param([start, end]: LineSegment, point: DVec2) -> f64 {
	let direction = end - start;
	let length_squared = direction.length_squared();
	if length_squared == 0. {
		return 0.;
	}
	(point - start).dot(direction) / length_squared
}

/// `true` when `point` lies strictly between the segment's end points, within `eps` of the segment.
pub fn point_on_segment_interior(segment @ [start, end]: LineSegment, point: DVec2, eps: f64) -> bool {
	let t = line_segment_param(segment, point);
	t > 0. && t < 1. && start.lerp(end, t).distance_squared(point) <= eps * eps
}

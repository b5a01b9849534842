// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use glam::{BVec2, DVec2};

/// Axis-aligned bounding box. `min` is the top-left corner in a y-down view, the bottom-left one in a y-up view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	min: DVec2,
	max: DVec2,
}

impl Default for Aabb {
	fn default() -> Self {
		Self {
			min: DVec2::INFINITY,
			max: DVec2::NEG_INFINITY,
		}
	}
}

impl Aabb {
	pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
		Aabb {
			min: DVec2::new(left, top),
			max: DVec2::new(right, bottom),
		}
	}

	pub fn from_points(a: DVec2, b: DVec2) -> Self {
		Aabb { min: a.min(b), max: a.max(b) }
	}

	#[inline]
	pub fn min(&self) -> DVec2 {
		self.min
	}
	#[inline]
	pub fn max(&self) -> DVec2 {
		self.max
	}
	#[inline]
	pub fn top(&self) -> f64 {
		self.min.y
	}
	#[inline]
	pub fn left(&self) -> f64 {
		self.min.x
	}
	#[inline]
	pub fn right(&self) -> f64 {
		self.max.x
	}
	#[inline]
	pub fn bottom(&self) -> f64 {
		self.max.y
	}

	/// `true` for the default box that has not been extended by any point.
	pub fn is_empty(&self) -> bool {
		self.min.cmpgt(self.max).any()
	}

	pub fn width(&self) -> f64 {
		self.max.x - self.min.x
	}

	pub fn height(&self) -> f64 {
		self.max.y - self.min.y
	}

	pub fn contains_box(&self, other: &Aabb) -> bool {
		(self.min.cmple(other.min) & other.max.cmple(self.max)) == BVec2::TRUE
	}
}

#[inline]
pub fn bounding_boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
	(a.min.cmple(b.max) & b.min.cmple(a.max)) == BVec2::TRUE
}

#[inline]
pub fn merge_bounding_boxes(a: &Aabb, b: &Aabb) -> Aabb {
	Aabb {
		min: a.min.min(b.min),
		max: a.max.max(b.max),
	}
}

#[inline]
pub fn extend_bounding_box(bounding_box: Option<Aabb>, point: DVec2) -> Aabb {
	match bounding_box {
		Some(bb) => Aabb {
			min: bb.min.min(point),
			max: bb.max.max(point),
		},
		None => Aabb { min: point, max: point },
	}
}

pub fn bounding_box_max_extent(bounding_box: &Aabb) -> f64 {
	(bounding_box.max - bounding_box.min).max_element()
}

pub fn expand_bounding_box(bounding_box: &Aabb, padding: f64) -> Aabb {
	Aabb {
		min: bounding_box.min - DVec2::splat(padding),
		max: bounding_box.max + DVec2::splat(padding),
	}
}

/// Overlapping part of two boxes, `None` when they are disjoint.
pub fn intersect_bounding_boxes(a: &Aabb, b: &Aabb) -> Option<Aabb> {
	bounding_boxes_overlap(a, b).then(|| Aabb {
		min: a.min.max(b.min),
		max: a.max.min(b.max),
	})
}

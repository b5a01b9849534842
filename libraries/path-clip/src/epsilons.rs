// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use crate::aabb::{bounding_box_max_extent, merge_bounding_boxes};
use crate::path::{PathCommand, path_bounding_box};

/// Tolerances used throughout one clipping call.
///
/// All values are absolute distances in input coordinates. They are passed by reference into every stage,
/// there is no global mutable state.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Epsilons {
	/// Two points closer than this (per axis) are the same vertex.
	pub point: f64,
	/// Slack on the `[0, 1]` parameter range when intersecting two line segments.
	pub param: f64,
	/// Maximum distance between a curve and the polyline replacing it.
	pub flatten_tolerance: f64,
}

pub const EPS: Epsilons = Epsilons {
	point: 1e-6,
	param: 1e-9,
	flatten_tolerance: 1e-3,
};

impl Default for Epsilons {
	fn default() -> Self {
		EPS
	}
}

impl Epsilons {
	/// Scales the default tolerances to geometry whose largest extent is `extent`.
	///
	/// The defaults are tuned for coordinates roughly in the `0..1000` range. Small extents keep the defaults.
	pub fn scaled(extent: f64) -> Self {
		let factor = (extent / 1000.).max(1.);
		Epsilons {
			point: EPS.point * factor,
			param: EPS.param,
			flatten_tolerance: EPS.flatten_tolerance * factor,
		}
	}

	/// Tolerances scaled to the combined bounds of both operands.
	pub fn for_paths(a: &[PathCommand], b: &[PathCommand]) -> Self {
		let bounding_box = match (path_bounding_box(a), path_bounding_box(b)) {
			(Some(a), Some(b)) => merge_bounding_boxes(&a, &b),
			(Some(bounding_box), None) | (None, Some(bounding_box)) => bounding_box,
			(None, None) => return EPS,
		};
		// Distance from the origin counts too, far away coordinates lose precision just the same
		let extent = bounding_box_max_extent(&bounding_box).max(bounding_box.min().abs().max_element()).max(bounding_box.max().abs().max_element());
		Self::scaled(extent)
	}
}

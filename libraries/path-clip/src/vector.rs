// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use glam::DVec2;

pub type Vector = DVec2;

pub fn vectors_equal(a: Vector, b: Vector, eps: f64) -> bool {
	a.abs_diff_eq(b, eps)
}

/// Angle of `v` measured counter-clockwise from the positive x axis, in `[0, 2π)`.
pub fn vector_angle(v: Vector) -> f64 {
	use std::f64::consts::TAU;
	let angle = v.y.atan2(v.x);
	if angle < 0. { angle + TAU } else { angle }
}

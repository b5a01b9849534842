//! Assigns winding numbers to mesh edges by sweeping a horizontal line through the mesh by increasing y.
//!
//! Between two consecutive vertex heights no edges cross, so the edges spanning that band can be ordered from left to
//! right. Walking them in that order and accumulating their winding changes gives the winding on both sides of every
//! edge. The far left is outside of everything.

use std::cmp::Ordering;

use crate::mesh::{Edge, WingedEdgeMesh};
use crate::vector::Vector;
use crate::winding::Winding;

#[derive(Clone, Copy, Debug, PartialEq)]
enum SweepState {
	NoState,
	AtScanline { index: usize, y: f64 },
	Finished,
}

/// `true` when the edge goes up (towards greater y).
#[inline]
fn is_upward(mesh: &WingedEdgeMesh, edge: &Edge) -> bool {
	mesh.vertex(edge.second).point.y > mesh.vertex(edge.first).point.y
}

/// Change of winding when crossing the edge from the left of the scanline towards the right, negated.
#[inline]
fn crossing(mesh: &WingedEdgeMesh, edge: &Edge) -> Winding {
	if is_upward(mesh, edge) { edge.delta } else { -edge.delta }
}

fn y_range(mesh: &WingedEdgeMesh, edge: &Edge) -> (f64, f64) {
	let (a, b) = (mesh.vertex(edge.first).point.y, mesh.vertex(edge.second).point.y);
	(a.min(b), a.max(b))
}

/// Vertex indices of the lower and the upper end of the edge.
fn ends(mesh: &WingedEdgeMesh, edge: &Edge) -> (usize, usize) {
	if mesh.vertex(edge.first).point.y <= mesh.vertex(edge.second).point.y {
		(edge.first, edge.second)
	} else {
		(edge.second, edge.first)
	}
}

/// Left to right order of two edges spanning the band between `y` and `next_y`.
///
/// Edges meeting at their lower or upper end are ordered by the turn between their directions, as their x positions
/// only differ by rounding inside a thin band.
fn band_order(mesh: &WingedEdgeMesh, a: &Edge, b: &Edge, y: f64, next_y: f64) -> Ordering {
	let (a_low, a_high) = ends(mesh, a);
	let (b_low, b_high) = ends(mesh, b);
	let shared_end = if a_low == b_low {
		Some(1.)
	} else if a_high == b_high {
		Some(-1.)
	} else {
		None
	};
	if let Some(sign) = shared_end {
		let direction = |low: usize, high: usize| mesh.vertex(high).point - mesh.vertex(low).point;
		let turn = direction(a_low, a_high).perp_dot(direction(b_low, b_high)) * sign;
		if turn != 0. {
			return turn.total_cmp(&0.);
		}
	}

	let span = |edge: &Edge| x_at(mesh, edge, y) + x_at(mesh, edge, next_y);
	span(a).total_cmp(&span(b))
}

fn x_at(mesh: &WingedEdgeMesh, edge: &Edge, y: f64) -> f64 {
	let (mut low, mut high) = (mesh.vertex(edge.first).point, mesh.vertex(edge.second).point);
	if low.y > high.y {
		std::mem::swap(&mut low, &mut high);
	}
	if y <= low.y {
		return low.x;
	}
	if y >= high.y {
		return high.x;
	}
	low.x + (high.x - low.x) * (y - low.y) / (high.y - low.y)
}

pub(crate) struct SweepClassifier<'a> {
	mesh: &'a WingedEdgeMesh,
	/// Distinct vertex heights, ascending.
	scanlines: Vec<f64>,
	/// Non-horizontal edges ordered by their lowest y.
	rising: Vec<usize>,
	next_rising: usize,
	/// Horizontal edges ordered by their y.
	horizontal: Vec<usize>,
	next_horizontal: usize,
	/// Edges spanning the band above the current scanline.
	active: Vec<usize>,
	windings: Vec<Option<Winding>>,
	state: SweepState,
}

impl<'a> SweepClassifier<'a> {
	pub(crate) fn new(mesh: &'a WingedEdgeMesh) -> Self {
		let edges = mesh.edges();

		let mut scanlines: Vec<f64> = edges.iter().flat_map(|edge| [mesh.vertex(edge.first).point.y, mesh.vertex(edge.second).point.y]).collect();
		scanlines.sort_by(f64::total_cmp);
		scanlines.dedup();

		let (mut horizontal, mut rising): (Vec<usize>, Vec<usize>) = (0..edges.len()).partition(|&index| {
			let (low, high) = y_range(mesh, &edges[index]);
			low == high
		});
		rising.sort_by(|&a, &b| y_range(mesh, &edges[a]).0.total_cmp(&y_range(mesh, &edges[b]).0).then(a.cmp(&b)));
		horizontal.sort_by(|&a, &b| y_range(mesh, &edges[a]).0.total_cmp(&y_range(mesh, &edges[b]).0).then(a.cmp(&b)));

		SweepClassifier {
			mesh,
			scanlines,
			rising,
			next_rising: 0,
			horizontal,
			next_horizontal: 0,
			active: Vec::new(),
			windings: vec![None; edges.len()],
			state: SweepState::NoState,
		}
	}

	/// Runs the sweep to completion and returns the left-side winding of every edge.
	pub(crate) fn classify(mut self) -> Vec<Winding> {
		while self.advance() {}
		debug_assert_eq!(self.state, SweepState::Finished);
		self.windings.into_iter().map(Option::unwrap_or_default).collect()
	}

	/// Moves to the next scanline. Returns `false` once all scanlines have been handled.
	fn advance(&mut self) -> bool {
		let index = match self.state {
			SweepState::NoState => 0,
			SweepState::AtScanline { index, .. } => index + 1,
			SweepState::Finished => return false,
		};
		let Some(&y) = self.scanlines.get(index) else {
			self.state = SweepState::Finished;
			return false;
		};
		self.state = SweepState::AtScanline { index, y };

		let mesh = self.mesh;
		let edges = mesh.edges();
		self.active.retain(|&edge| y_range(mesh, &edges[edge]).1 > y);
		while let Some(&edge) = self.rising.get(self.next_rising) {
			if y_range(mesh, &edges[edge]).0 > y {
				break;
			}
			self.active.push(edge);
			self.next_rising += 1;
		}

		self.handle_crossing_edges(self.scanlines.get(index + 1).copied());
		true
	}

	/// Assigns windings to the edges crossing the band between the current scanline and `next_y`, and to the horizontal
	/// edges lying on the current scanline.
	fn handle_crossing_edges(&mut self, next_y: Option<f64>) {
		let SweepState::AtScanline { y, .. } = self.state else { return };
		let mesh = self.mesh;
		let edges = mesh.edges();

		if let Some(next_y) = next_y {
			self.active.sort_by(|&a, &b| band_order(mesh, &edges[a], &edges[b], y, next_y));

			let mut running = Winding::ZERO;
			for &index in &self.active {
				let edge = &edges[index];
				let left_of_edge = running;
				let right_of_edge = running - crossing(mesh, edge);
				self.windings[index].get_or_insert(if is_upward(mesh, edge) { left_of_edge } else { right_of_edge });
				running = right_of_edge;
			}
		}

		while let Some(&index) = self.horizontal.get(self.next_horizontal) {
			let edge = &edges[index];
			let (first, second) = (mesh.vertex(edge.first).point, mesh.vertex(edge.second).point);
			if first.y > y {
				break;
			}
			self.next_horizontal += 1;

			// Winding of the region right above the edge; `active` holds exactly the edges spanning that region
			let middle_x = (first.x + second.x) / 2.;
			let above = self
				.active
				.iter()
				.map(|&other| &edges[other])
				.filter(|other| x_at(mesh, other, y) > middle_x)
				.fold(Winding::ZERO, |sum, other| sum + crossing(mesh, other));
			let above = if next_y.is_some() { above } else { Winding::ZERO };

			// Walking towards +x the left side is above, walking towards -x it is below
			self.windings[index] = Some(if second.x > first.x { above } else { above + edge.delta });
		}
	}
}

/// Winding of both operands at `point`, by casting a ray towards +x.
pub(crate) fn winding_at(mesh: &WingedEdgeMesh, point: Vector) -> Winding {
	mesh.edges()
		.iter()
		.filter(|edge| {
			let (low, high) = y_range(mesh, edge);
			low <= point.y && point.y < high
		})
		.filter(|edge| x_at(mesh, edge, point.y) > point.x)
		.fold(Winding::ZERO, |sum, edge| sum + crossing(mesh, edge))
}

/// Runs the sweep over `mesh` and stores the resulting windings on its edges.
pub(crate) fn classify_edges(mesh: &mut WingedEdgeMesh) {
	let windings = SweepClassifier::new(mesh).classify();
	mesh.set_windings(windings);
}

//! Planar winged-edge mesh built from crossing-free sub-edges.
//!
//! Vertices and edges live in flat arrays and refer to each other by index. Each edge stores, for both traversal
//! sides and both directions, the edge that follows it when walking around the face on that side.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::intersection_finder::SubEdge;
use crate::vector::{Vector, vector_angle};
use crate::winding::Winding;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Side {
	Left = 0,
	Right = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
	/// From `first` to `second`.
	Forward = 0,
	Backward = 1,
}

impl Direction {
	pub fn reversed(self) -> Self {
		match self {
			Direction::Forward => Direction::Backward,
			Direction::Backward => Direction::Forward,
		}
	}
}

/// An edge walked in a given direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct EdgeRef {
	pub edge: usize,
	pub direction: Direction,
}

impl EdgeRef {
	pub fn reversed(self) -> Self {
		EdgeRef {
			edge: self.edge,
			direction: self.direction.reversed(),
		}
	}
}

#[derive(Clone, Debug)]
pub(crate) struct Vertex {
	pub point: Vector,
	/// One of the incident edges, if any.
	pub edge: Option<usize>,
}

#[derive(Clone, Debug)]
pub(crate) struct Edge {
	pub first: usize,
	pub second: usize,
	/// Change of winding when crossing the edge from its right side to its left side.
	pub delta: Winding,
	/// Winding of the region on the left side, assigned by the sweep.
	pub winding: Winding,
	/// Direction angle from `first` to `second`.
	pub angle: f64,
	/// Direction angle from `second` to `first`.
	pub inv_angle: f64,
	next: [[EdgeRef; 2]; 2],
}

impl Edge {
	#[inline]
	pub fn next(&self, side: Side, direction: Direction) -> EdgeRef {
		self.next[side as usize][direction as usize]
	}

	pub fn start_vertex(&self, direction: Direction) -> usize {
		match direction {
			Direction::Forward => self.first,
			Direction::Backward => self.second,
		}
	}

	pub fn end_vertex(&self, direction: Direction) -> usize {
		self.start_vertex(direction.reversed())
	}

	/// Winding of the region on the right side.
	pub fn right_winding(&self) -> Winding {
		self.winding - self.delta
	}
}

pub(crate) struct WingedEdgeMesh {
	vertices: Vec<Vertex>,
	edges: Vec<Edge>,
}

impl WingedEdgeMesh {
	/// Folds sub-edges sharing both vertices into one edge and links all edges around their vertices.
	///
	/// Edges whose contributions cancel out for both operands are dropped.
	pub(crate) fn build(points: Vec<Vector>, sub_edges: impl IntoIterator<Item = SubEdge>) -> Self {
		let mut vertices: Vec<Vertex> = points.into_iter().map(|point| Vertex { point, edge: None }).collect();

		let mut lookup: FxHashMap<(usize, usize), usize> = FxHashMap::default();
		let mut folded: Vec<(usize, usize, Winding)> = Vec::new();
		for SubEdge { operand, from, to } in sub_edges {
			if from == to {
				continue;
			}
			let key = (from.min(to), from.max(to));
			let index = *lookup.entry(key).or_insert_with(|| {
				folded.push((key.0, key.1, Winding::ZERO));
				folded.len() - 1
			});
			folded[index].2 += Winding::single(operand, from < to);
		}

		let placeholder = EdgeRef {
			edge: 0,
			direction: Direction::Forward,
		};
		let mut edges: Vec<Edge> = folded
			.into_iter()
			.filter(|(_, _, delta)| !delta.is_zero())
			.map(|(first, second, delta)| {
				let direction = vertices[second].point - vertices[first].point;
				Edge {
					first,
					second,
					delta,
					winding: Winding::ZERO,
					angle: vector_angle(direction),
					inv_angle: vector_angle(-direction),
					next: [[placeholder; 2]; 2],
				}
			})
			.collect();

		// Outgoing edges of every vertex, counter-clockwise
		let mut fans: Vec<SmallVec<[(f64, EdgeRef); 4]>> = vec![SmallVec::new(); vertices.len()];
		for (index, edge) in edges.iter().enumerate() {
			fans[edge.first].push((
				edge.angle,
				EdgeRef {
					edge: index,
					direction: Direction::Forward,
				},
			));
			fans[edge.second].push((
				edge.inv_angle,
				EdgeRef {
					edge: index,
					direction: Direction::Backward,
				},
			));
		}

		for (vertex, fan) in vertices.iter_mut().zip(fans.iter_mut()) {
			fan.sort_by(|(angle_a, ref_a), (angle_b, ref_b)| angle_a.total_cmp(angle_b).then(ref_a.edge.cmp(&ref_b.edge)));
			vertex.edge = fan.first().map(|(_, edge_ref)| edge_ref.edge);

			let len = fan.len();
			for (position, &(_, outgoing)) in fan.iter().enumerate() {
				// Arriving along the reverse of `outgoing`, the left face continues clockwise, the right face counter-clockwise
				let arriving = outgoing.reversed();
				let clockwise = fan[(position + len - 1) % len].1;
				let counter_clockwise = fan[(position + 1) % len].1;
				let next = &mut edges[arriving.edge].next;
				next[Side::Left as usize][arriving.direction as usize] = clockwise;
				next[Side::Right as usize][arriving.direction as usize] = counter_clockwise;
			}
		}

		WingedEdgeMesh { vertices, edges }
	}

	#[inline]
	pub(crate) fn edges(&self) -> &[Edge] {
		&self.edges
	}

	#[cfg(test)]
	pub(crate) fn edge(&self, index: usize) -> &Edge {
		&self.edges[index]
	}

	#[inline]
	pub(crate) fn vertex(&self, index: usize) -> &Vertex {
		&self.vertices[index]
	}

	pub(crate) fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub(crate) fn set_windings(&mut self, windings: impl IntoIterator<Item = Winding>) {
		for (edge, winding) in self.edges.iter_mut().zip(windings) {
			edge.winding = winding;
		}
	}

	/// The traversal following `current` when keeping the face on `side`.
	#[inline]
	pub(crate) fn next(&self, current: EdgeRef, side: Side) -> EdgeRef {
		self.edges[current.edge].next(side, current.direction)
	}

	/// The next outgoing edge clockwise around the start vertex of `outgoing`.
	#[inline]
	pub(crate) fn rotate_clockwise(&self, outgoing: EdgeRef) -> EdgeRef {
		self.next(outgoing.reversed(), Side::Left)
	}

	pub(crate) fn start_point(&self, edge_ref: EdgeRef) -> Vector {
		self.vertices[self.edges[edge_ref.edge].start_vertex(edge_ref.direction)].point
	}

	/// Checks that every traversal mode forms closed cycles that stay connected vertex to vertex, and that every vertex
	/// refers to one of its own edges.
	pub(crate) fn validate(&self) -> bool {
		let vertices_linked = self
			.vertices
			.iter()
			.enumerate()
			.all(|(index, vertex)| vertex.edge.is_none_or(|edge| self.edges[edge].first == index || self.edges[edge].second == index));

		let directions = [Direction::Forward, Direction::Backward];
		vertices_linked && (0..self.edges.len()).all(|index| {
			[Side::Left, Side::Right].into_iter().all(|side| {
				directions.into_iter().all(|direction| {
					let start = EdgeRef { edge: index, direction };
					let mut current = start;
					for _ in 0..=2 * self.edges.len() {
						let next = self.next(current, side);
						let end = self.edges[current.edge].end_vertex(current.direction);
						if self.edges[next.edge].start_vertex(next.direction) != end {
							return false;
						}
						current = next;
						if current == start {
							return true;
						}
					}
					false
				})
			})
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::segment::Operand;
	use glam::DVec2;

	fn sub_edge(operand: Operand, from: usize, to: usize) -> SubEdge {
		SubEdge { operand, from, to }
	}

	/// Unit square split by a diagonal from vertex 0 to vertex 2.
	fn split_square() -> WingedEdgeMesh {
		let points = vec![DVec2::new(0., 0.), DVec2::new(1., 0.), DVec2::new(1., 1.), DVec2::new(0., 1.)];
		let sub_edges = [
			sub_edge(Operand::A, 0, 1),
			sub_edge(Operand::A, 1, 2),
			sub_edge(Operand::A, 2, 3),
			sub_edge(Operand::A, 3, 0),
			sub_edge(Operand::B, 0, 2),
		];
		WingedEdgeMesh::build(points, sub_edges)
	}

	fn cycle(mesh: &WingedEdgeMesh, start: EdgeRef, side: Side) -> Vec<usize> {
		let mut vertices = Vec::new();
		let mut current = start;
		loop {
			vertices.push(mesh.edge(current.edge).start_vertex(current.direction));
			current = mesh.next(current, side);
			if current == start {
				return vertices;
			}
		}
	}

	#[test]
	fn traversal_cycles_close() {
		let mesh = split_square();
		assert_eq!(mesh.edge_count(), 5);
		assert!(mesh.validate());
	}

	#[test]
	fn left_traversal_walks_the_left_face() {
		let mesh = split_square();
		let bottom = EdgeRef {
			edge: 0,
			direction: Direction::Forward,
		};
		// Walking the bottom edge to the right, the face on the left is the lower-right triangle
		assert_eq!(cycle(&mesh, bottom, Side::Left), vec![0, 1, 2]);
		// The face on the right is the unbounded outside
		assert_eq!(cycle(&mesh, bottom, Side::Right), vec![0, 1, 2, 3]);
	}

	#[test]
	fn rotation_visits_the_whole_fan() {
		let mesh = split_square();
		let start = EdgeRef {
			edge: 0,
			direction: Direction::Forward,
		};
		let mut current = start;
		let mut seen = Vec::new();
		loop {
			seen.push(current.edge);
			current = mesh.rotate_clockwise(current);
			if current == start {
				break;
			}
		}
		seen.sort_unstable();
		assert_eq!(seen, vec![0, 3, 4]);
	}

	#[test]
	fn coincident_sub_edges_are_folded() {
		let points = vec![DVec2::new(0., 0.), DVec2::new(1., 0.), DVec2::new(0., 1.), DVec2::new(5., 5.)];
		let mesh = WingedEdgeMesh::build(
			points,
			[
				sub_edge(Operand::A, 0, 1),
				sub_edge(Operand::B, 0, 1),
				sub_edge(Operand::A, 1, 2),
				sub_edge(Operand::A, 2, 0),
				sub_edge(Operand::B, 1, 2),
				sub_edge(Operand::B, 2, 0),
				// Cancels itself out
				sub_edge(Operand::A, 0, 3),
				sub_edge(Operand::A, 3, 0),
			],
		);
		assert_eq!(mesh.edge_count(), 3);
		assert_eq!(mesh.edge(0).delta, Winding { a: 1, b: 1 });
		assert_eq!(mesh.edge(2).delta, Winding { a: -1, b: -1 });
		assert_eq!(mesh.vertex(0).edge, Some(0));
		assert_eq!(mesh.vertex(3).edge, None);
		assert!(mesh.validate());
	}
}

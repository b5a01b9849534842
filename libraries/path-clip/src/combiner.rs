use crate::mesh::{Direction, WingedEdgeMesh};
use crate::path::FillRule;
use crate::winding::Winding;

/// Boolean operation between two paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClipOperation {
	/// Area covered by both paths.
	Intersect,
	/// Area covered by either path.
	Union,
	/// Area of the first path not covered by the second.
	Subtract,
	/// Area covered by exactly one of the paths.
	Exclude,
	/// Area of the first path, with self-intersections and overlaps resolved. The second path is ignored.
	Simplify,
}

impl ClipOperation {
	/// Truth table indexed by `[inside_a][inside_b]`.
	const fn table(self) -> [[bool; 2]; 2] {
		match self {
			ClipOperation::Intersect => [[false, false], [false, true]],
			ClipOperation::Union => [[false, true], [true, true]],
			ClipOperation::Subtract => [[false, false], [true, false]],
			ClipOperation::Exclude => [[false, true], [true, false]],
			ClipOperation::Simplify => [[false, false], [true, true]],
		}
	}

	#[inline]
	pub fn is_inside(self, inside_a: bool, inside_b: bool) -> bool {
		self.table()[inside_a as usize][inside_b as usize]
	}
}

/// Decides which mesh edges bound the result.
pub(crate) struct BooleanCombiner {
	operation: ClipOperation,
	a_mask: i32,
	b_mask: i32,
}

impl BooleanCombiner {
	pub(crate) fn new(operation: ClipOperation, fill_a: FillRule, fill_b: FillRule) -> Self {
		BooleanCombiner {
			operation,
			a_mask: fill_a.mask(),
			b_mask: fill_b.mask(),
		}
	}

	pub(crate) fn inside_a(&self, winding: Winding) -> bool {
		winding.a & self.a_mask != 0
	}

	pub(crate) fn inside_b(&self, winding: Winding) -> bool {
		winding.b & self.b_mask != 0
	}

	/// Whether a region with the given winding belongs to the result.
	pub(crate) fn region_inside(&self, winding: Winding) -> bool {
		self.operation.is_inside(self.inside_a(winding), self.inside_b(winding))
	}

	/// For every edge, the direction that keeps the result on its left, or `None` when the edge doesn't separate the
	/// result from its complement.
	pub(crate) fn select(&self, mesh: &WingedEdgeMesh) -> Vec<Option<Direction>> {
		mesh.edges()
			.iter()
			.map(|edge| match (self.region_inside(edge.winding), self.region_inside(edge.right_winding())) {
				(true, false) => Some(Direction::Forward),
				(false, true) => Some(Direction::Backward),
				_ => None,
			})
			.collect()
	}
}

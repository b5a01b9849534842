use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::vector::{Vector, vectors_equal};

/// Owns every distinct point of one clipping call. Points closer than `eps` (per axis) share an index.
///
/// Lookups go through a hash grid with cells of size `eps`, so only the 3×3 neighbourhood of a cell is searched.
pub(crate) struct VertexPool {
	points: Vec<Vector>,
	cells: FxHashMap<(i64, i64), SmallVec<[usize; 2]>>,
	eps: f64,
	cell_factor: f64,
}

impl VertexPool {
	pub(crate) fn new(eps: f64) -> Self {
		let eps = if eps > 0. { eps } else { f64::MIN_POSITIVE };
		VertexPool {
			points: Vec::new(),
			cells: FxHashMap::default(),
			eps,
			cell_factor: eps.recip(),
		}
	}

	fn cell(&self, point: Vector) -> (i64, i64) {
		let cell = (point * self.cell_factor).floor();
		(cell.x as i64, cell.y as i64)
	}

	/// Index of an existing vertex within epsilon of `point`, otherwise of a newly allocated one.
	pub(crate) fn add_point(&mut self, point: Vector) -> usize {
		if let Some(index) = self.find(point) {
			return index;
		}

		let index = self.points.len();
		self.points.push(point);
		let cell = self.cell(point);
		self.cells.entry(cell).or_default().push(index);
		index
	}

	pub(crate) fn find(&self, point: Vector) -> Option<usize> {
		let (cx, cy) = self.cell(point);
		let mut best: Option<(usize, f64)> = None;
		for x in cx.saturating_sub(1)..=cx.saturating_add(1) {
			for y in cy.saturating_sub(1)..=cy.saturating_add(1) {
				let Some(indices) = self.cells.get(&(x, y)) else { continue };
				for &index in indices {
					let candidate = self.points[index];
					if !vectors_equal(candidate, point, self.eps) {
						continue;
					}
					let distance = candidate.distance_squared(point);
					if best.is_none_or(|(_, best_distance)| distance < best_distance) {
						best = Some((index, distance));
					}
				}
			}
		}
		best.map(|(index, _)| index)
	}

	#[inline]
	pub(crate) fn point(&self, index: usize) -> Vector {
		self.points[index]
	}

	pub(crate) fn len(&self) -> usize {
		self.points.len()
	}

	pub(crate) fn into_points(self) -> Vec<Vector> {
		self.points
	}
}

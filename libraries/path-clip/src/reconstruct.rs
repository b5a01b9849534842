use crate::mesh::{Direction, EdgeRef, Side, WingedEdgeMesh};
use crate::path::{Path, PathCommand};
use crate::path_clip::ClipError;
use crate::util::bit_vec::BitVec;

/// Turns the surviving edges of a classified mesh into closed polygons.
pub(crate) struct PathReconstructor<'a> {
	mesh: &'a WingedEdgeMesh,
	/// Per edge, the direction keeping the result on the left, `None` for dropped edges.
	selection: &'a [Option<Direction>],
	visited: BitVec,
}

impl<'a> PathReconstructor<'a> {
	pub(crate) fn new(mesh: &'a WingedEdgeMesh, selection: &'a [Option<Direction>]) -> Self {
		debug_assert_eq!(mesh.edge_count(), selection.len());
		PathReconstructor {
			mesh,
			selection,
			visited: BitVec::new(selection.len()),
		}
	}

	/// Emits one `MoveTo`, `LineTo`…, `Close` loop per boundary, in the order the boundaries are discovered.
	pub(crate) fn reconstruct(mut self) -> Result<Path, ClipError> {
		let mut path = Path::new();
		for edge in 0..self.selection.len() {
			let Some(direction) = self.selection[edge] else { continue };
			if self.visited.get(edge) {
				continue;
			}
			self.trace_loop(EdgeRef { edge, direction }, &mut path)?;
		}
		log::trace!("reconstructed {} of {} edges", self.visited.count_ones(), self.selection.len());
		Ok(path)
	}

	fn is_survivor(&self, edge_ref: EdgeRef) -> bool {
		self.selection[edge_ref.edge].is_some()
	}

	fn trace_loop(&mut self, start: EdgeRef, path: &mut Path) -> Result<(), ClipError> {
		let max_steps = 2 * self.mesh.edge_count() + 1;

		path.push(PathCommand::MoveTo(self.mesh.start_point(start)));
		self.visited.set(start.edge);

		let mut current = start;
		let mut steps = 0;
		loop {
			// Sharpest left turn at the end vertex, then keep pivoting clockwise past edges that were dropped
			let mut candidate = self.mesh.next(current, Side::Left);
			while !self.is_survivor(candidate) {
				steps += 1;
				if steps > max_steps {
					return Err(ClipError::UnclosedTraversal { edge: start.edge });
				}
				candidate = self.mesh.rotate_clockwise(candidate);
			}

			if self.selection[candidate.edge] != Some(candidate.direction) {
				return Err(ClipError::OrientationMismatch { edge: candidate.edge });
			}
			if candidate == start {
				path.push(PathCommand::Close);
				return Ok(());
			}
			steps += 1;
			if self.visited.get(candidate.edge) || steps > max_steps {
				return Err(ClipError::UnclosedTraversal { edge: start.edge });
			}

			path.push(PathCommand::LineTo(self.mesh.start_point(candidate)));
			self.visited.set(candidate.edge);
			current = candidate;
		}
	}
}

// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use rustc_hash::FxHashSet;

use crate::aabb::{Aabb, bounding_boxes_overlap, merge_bounding_boxes};

/// Broad phase for segment pairs: values are stored in every leaf their bounding box overlaps.
pub(crate) struct QuadTree<T> {
	bounding_box: Aabb,
	depth: usize,
	inner_node_capacity: usize,
	subtrees: Option<Box<[QuadTree<T>; 4]>>,
	pairs: Vec<(Aabb, T)>,
}

impl<T: Copy> QuadTree<T> {
	/// Builds a tree covering all given boxes. Returns `None` when `pairs` is empty.
	pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (Aabb, T)>, depth: usize, inner_node_capacity: usize) -> Option<Self> {
		let pairs: Vec<_> = pairs.into_iter().collect();
		let bounding_box = pairs.iter().map(|(key, _)| *key).reduce(|a, b| merge_bounding_boxes(&a, &b))?;

		let mut tree = QuadTree::new(bounding_box, depth, inner_node_capacity);
		for (key, value) in pairs {
			tree.insert(key, value);
		}
		Some(tree)
	}

	pub(crate) fn new(bounding_box: Aabb, depth: usize, inner_node_capacity: usize) -> Self {
		QuadTree {
			bounding_box,
			depth,
			inner_node_capacity,
			subtrees: None,
			pairs: Vec::new(),
		}
	}

	pub(crate) fn insert(&mut self, bounding_box: Aabb, value: T) -> bool {
		if !bounding_boxes_overlap(&bounding_box, &self.bounding_box) {
			return false;
		}

		if self.depth > 0 && self.pairs.len() >= self.inner_node_capacity {
			for tree in self.ensure_subtrees().iter_mut() {
				tree.insert(bounding_box, value);
			}
		} else {
			self.pairs.push((bounding_box, value));
		}

		true
	}

	pub(crate) fn find(&self, bounding_box: &Aabb) -> FxHashSet<T>
	where
		T: Eq + std::hash::Hash,
	{
		let mut set = FxHashSet::default();
		self.find_internal(bounding_box, &mut set);
		set
	}

	fn find_internal(&self, bounding_box: &Aabb, set: &mut FxHashSet<T>)
	where
		T: Eq + std::hash::Hash,
	{
		if !bounding_boxes_overlap(bounding_box, &self.bounding_box) {
			return;
		}

		for (key, value) in &self.pairs {
			if bounding_boxes_overlap(bounding_box, key) {
				set.insert(*value);
			}
		}

		if let Some(subtrees) = &self.subtrees {
			for tree in subtrees.iter() {
				tree.find_internal(bounding_box, set);
			}
		}
	}

	fn ensure_subtrees(&mut self) -> &mut [QuadTree<T>; 4] {
		let bounding_box = self.bounding_box;
		let depth = self.depth - 1;
		let capacity = self.inner_node_capacity;

		self.subtrees.get_or_insert_with(|| {
			let mid_x = (bounding_box.left() + bounding_box.right()) / 2.;
			let mid_y = (bounding_box.top() + bounding_box.bottom()) / 2.;

			Box::new([
				QuadTree::new(Aabb::new(bounding_box.left(), bounding_box.top(), mid_x, mid_y), depth, capacity),
				QuadTree::new(Aabb::new(mid_x, bounding_box.top(), bounding_box.right(), mid_y), depth, capacity),
				QuadTree::new(Aabb::new(bounding_box.left(), mid_y, mid_x, bounding_box.bottom()), depth, capacity),
				QuadTree::new(Aabb::new(mid_x, mid_y, bounding_box.right(), bounding_box.bottom()), depth, capacity),
			])
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn finds_overlapping_entries() {
		let boxes = (0..40).map(|i| (Aabb::new(i as f64, 0., i as f64 + 0.5, 1.), i));
		let tree = QuadTree::from_pairs(boxes, 4, 2).unwrap();

		let mut found: Vec<_> = tree.find(&Aabb::new(10.2, 0.2, 12.1, 0.3)).into_iter().collect();
		found.sort_unstable();
		assert_eq!(found, vec![10, 11, 12]);
		assert!(tree.find(&Aabb::new(100., 0., 101., 1.)).is_empty());
	}

	#[test]
	fn empty_input_builds_no_tree() {
		assert!(QuadTree::<usize>::from_pairs(std::iter::empty(), 4, 2).is_none());
	}
}

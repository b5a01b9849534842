/// Fixed-size bit set, used for per-edge flags that must not live on the mesh itself.
pub struct BitVec {
	data: Vec<u64>,
}

impl BitVec {
	pub fn new(capacity: usize) -> Self {
		let num_words = capacity.div_ceil(64);
		BitVec { data: vec![0; num_words] }
	}

	pub fn set(&mut self, index: usize) {
		let word_index = index / 64;
		let bit_index = index % 64;
		self.data[word_index] |= 1u64 << bit_index;
	}

	pub fn get(&self, index: usize) -> bool {
		let word_index = index / 64;
		let bit_index = index % 64;
		self.data.get(word_index).is_some_and(|word| word & (1u64 << bit_index) != 0)
	}

	pub fn count_ones(&self) -> usize {
		self.data.iter().map(|word| word.count_ones() as usize).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn set_bits_are_reported() {
		let mut bv = BitVec::new(200);
		bv.set(5);
		bv.set(64);
		bv.set(128);
		bv.set(199);

		assert!([5, 64, 128, 199].into_iter().all(|index| bv.get(index)));
		assert!(bv.get(64));
		assert!(!bv.get(63));
		assert_eq!(bv.count_ones(), 4);
	}

	#[test]
	fn empty_bit_vec() {
		let bv = BitVec::new(0);
		assert_eq!(bv.count_ones(), 0);
		assert!(!bv.get(3));
	}
}

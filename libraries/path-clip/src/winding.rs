use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::segment::Operand;

/// Winding numbers of both operands at once.
///
/// Edges carry a `Winding` as the change in winding when crossing them from right to left, and the sweep assigns
/// every edge the `Winding` of the region on its left.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub(crate) struct Winding {
	pub a: i32,
	pub b: i32,
}

impl Winding {
	pub const ZERO: Winding = Winding { a: 0, b: 0 };

	/// Contribution of one segment of `operand`, `positive` when it runs in the edge's own direction.
	pub fn single(operand: Operand, positive: bool) -> Self {
		let sign = if positive { 1 } else { -1 };
		match operand {
			Operand::A => Winding { a: sign, b: 0 },
			Operand::B => Winding { a: 0, b: sign },
		}
	}

	pub fn is_zero(self) -> bool {
		self == Self::ZERO
	}
}

impl Add for Winding {
	type Output = Self;

	fn add(self, rhs: Self) -> Self::Output {
		Winding { a: self.a + rhs.a, b: self.b + rhs.b }
	}
}

impl AddAssign for Winding {
	fn add_assign(&mut self, rhs: Self) {
		*self = *self + rhs
	}
}

impl Sub for Winding {
	type Output = Self;

	fn sub(self, rhs: Self) -> Self::Output {
		Winding { a: self.a - rhs.a, b: self.b - rhs.b }
	}
}

impl SubAssign for Winding {
	fn sub_assign(&mut self, rhs: Self) {
		*self = *self - rhs
	}
}

impl Neg for Winding {
	type Output = Self;

	fn neg(self) -> Self::Output {
		Winding { a: -self.a, b: -self.b }
	}
}

impl std::fmt::Debug for Winding {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}a + {}b", self.a, self.b)
	}
}

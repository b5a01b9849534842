pub(crate) mod bit_vec;

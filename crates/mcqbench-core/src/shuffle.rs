//! Uniform random permutation (Fisher–Yates).
//!
//! Used independently for question order and for each question's option
//! order. The randomness source is injected so tests can seed it.

use rand::Rng;

/// Return a uniformly shuffled copy of `items`. The input is not modified.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    shuffle_in_place(&mut out, rng);
    out
}

/// Fisher–Yates: for `i` from the last index down to 1, swap `i` with a
/// uniformly drawn `j` in `[0, i]`.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

//! Seeded, reproducible permutation.
//!
//! For `i` from `len - 1` down to `1`, swap `items[i]` with
//! `items[|seed + i| mod (i + 1)]`. The swap target depends only on the seed
//! and the position, so the permutation is NOT uniform: many orderings can
//! never be produced and some are favoured. Sessions rely on the exact
//! recurrence to rebuild the same view after a reload, so it must not be
//! swapped for a proper PRNG.

pub fn seeded_shuffle<T>(items: &mut [T], seed: i64) {
    for i in (1..items.len()).rev() {
        let j = (seed.wrapping_add(i as i64).unsigned_abs() % (i as u64 + 1)) as usize;
        items.swap(i, j);
    }
}

/// Owned convenience form of [`seeded_shuffle`].
pub fn seeded_shuffled<T: Clone>(items: &[T], seed: i64) -> Vec<T> {
    let mut out = items.to_vec();
    seeded_shuffle(&mut out, seed);
    out
}

/// Sum of the UTF-16 code units of `text`, starting from `base`.
pub fn charcode_sum(text: &str, base: i64) -> i64 {
    text.encode_utf16().fold(base, |acc, unit| acc.wrapping_add(unit as i64))
}

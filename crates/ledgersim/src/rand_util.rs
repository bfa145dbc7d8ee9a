//! Seeded draw helpers shared by the operation builders.

use rand::Rng;
use rand::rngs::StdRng;

use crate::config::LenBounds;

/// Alphabet for generated string fields.
const STRING_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Draws a length uniformly from the inclusive `[min, max]` bounds.
#[must_use]
pub fn rand_len_between(rng: &mut StdRng, bounds: LenBounds) -> usize {
    rng.gen_range(bounds.min..=bounds.max)
}

/// Generates a random string of exactly `len` bytes from the field alphabet.
#[must_use]
pub fn rand_string_of_length(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..STRING_ALPHABET.len());
            char::from(STRING_ALPHABET[idx])
        })
        .collect()
}

/// Generates a metadata value whose length lies within `bounds`.
#[must_use]
pub fn rand_metadata(rng: &mut StdRng, bounds: LenBounds) -> String {
    let len = rand_len_between(rng, bounds);
    rand_string_of_length(rng, len)
}

/// Draws one element uniformly, `None` on an empty slice.
#[must_use]
pub fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..items.len());
    Some(&items[idx])
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn generated_string_has_exact_length() {
        let mut rng = StdRng::seed_from_u64(11);
        for len in [0, 1, 10, 256] {
            assert_eq!(rand_string_of_length(&mut rng, len).len(), len);
        }
    }

    #[test]
    fn generated_string_stays_in_alphabet() {
        let mut rng = StdRng::seed_from_u64(12);
        let value = rand_string_of_length(&mut rng, 512);
        assert!(
            value
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        );
    }

    #[test]
    fn pick_on_empty_slice_is_none() {
        let mut rng = StdRng::seed_from_u64(13);
        let empty: &[u8] = &[];
        assert_eq!(pick(&mut rng, empty), None);
    }

    #[test]
    fn draws_are_deterministic_per_seed() {
        let bounds = LenBounds::new(10, 256).unwrap();
        let draw = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            rand_metadata(&mut rng, bounds)
        };
        assert_eq!(draw(77), draw(77));
        assert_ne!(draw(77), draw(78));
    }

    proptest! {
        #[test]
        fn metadata_length_always_within_bounds(
            seed in any::<u64>(),
            min in 1usize..128,
            span in 0usize..128,
        ) {
            let bounds = LenBounds::new(min, min + span).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let value = rand_metadata(&mut rng, bounds);
            prop_assert!(bounds.contains(value.len()));
        }
    }
}

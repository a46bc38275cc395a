//! Short opaque identifiers for public onboarding URLs and uploaded file
//! names.

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Identifier length. 36^10 keeps the collision probability negligible
/// even for tens of thousands of draws.
const ID_LEN: usize = 10;

/// Draws a fresh identifier from a CSPRNG.
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn ten_thousand_ids_are_unique() {
        let ids: HashSet<String> = (0..10_000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    proptest! {
        #[test]
        fn ids_are_lowercase_alphanumeric(_seed in 0u32..256) {
            let id = generate_id();
            prop_assert_eq!(id.len(), ID_LEN);
            prop_assert!(id.bytes().all(|b| ALPHABET.contains(&b)));
        }
    }
}

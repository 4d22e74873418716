//! Utility functions shared by the ranking and rating code

/// Round half away from zero the way the league has always rounded points:
/// double the value, truncate, add one and halve with integer division.
pub fn round_half_up(value: f64) -> i64 {
    ((value * 2.0) as i64 + 1).div_euclid(2)
}

/// Assign "sports" places to an already-sorted sequence.
///
/// The first entry gets place 1. Every later entry keeps the previous place
/// unless `is_worse(previous_key, key)` holds, in which case it gets its
/// 1-based position. Tied entries therefore share a place and the place
/// after a tie skips accordingly (1, 1, 3).
pub fn assign_places<K, F>(keys: &[K], mut is_worse: F) -> Vec<u32>
where
    F: FnMut(&K, &K) -> bool,
{
    let mut places = Vec::with_capacity(keys.len());
    let mut place = 1u32;
    for (index, key) in keys.iter().enumerate() {
        if index > 0 && is_worse(&keys[index - 1], key) {
            place = index as u32 + 1;
        }
        places.push(place);
    }
    places
}

/// Uppercased, whitespace-collapsed form of a player name
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// 64-bit FNV-1a; stable across runs and platforms
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

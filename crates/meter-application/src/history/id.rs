use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 5;

/// Generates encounter ids of the form `<timestamp>-<sequence><random>`.
///
/// The sequence keeps ids from one generator distinct even when many are
/// created within the same millisecond; the random tail keeps ids from
/// separate runs apart.
#[derive(Debug, Default)]
pub struct EncounterIdGenerator {
    sequence: AtomicU64,
}

impl EncounterIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self, timestamp_ms: i64) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut rng = rand::thread_rng();
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        format!("{}-{}{}", timestamp_ms, to_base36(sequence), suffix)
    }
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_within_same_millisecond() {
        let generator = EncounterIdGenerator::new();
        let ids: HashSet<String> = (0..10_000).map(|_| generator.next_id(1_700_000_000_000)).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_id_shape() {
        let id = EncounterIdGenerator::new().next_id(42);
        let (timestamp, tail) = id.split_once('-').unwrap();
        assert_eq!(timestamp, "42");
        assert_eq!(tail.len(), 1 + SUFFIX_LEN);
        assert!(tail.bytes().all(|b| ALPHABET.contains(&b)));
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}

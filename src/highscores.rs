//! Best score
//!
//! A single scalar persisted to LocalStorage, raised whenever a session
//! ends above it.

use crate::persistence::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    pub value: u32,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "flappy_best_score";

    /// Read the stored value; absent or unreadable means zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let value = store
            .get(Self::STORAGE_KEY)
            .map(|raw| parse_stored(&raw))
            .unwrap_or(0);
        log::info!("Best score: {}", value);
        Self { value }
    }

    /// Record a finished session. Returns true (and persists) only when it beats the best.
    pub fn submit(&mut self, score: u32, store: &mut impl KeyValueStore) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        store.set(Self::STORAGE_KEY, &score.to_string());
        log::info!("New best score {} saved", score);
        true
    }
}

/// Parse a stored value. Older saves may hold a float string such as "12.0".
fn parse_stored(raw: &str) -> u32 {
    let raw = raw.trim();
    raw.parse::<u32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.min(u32::MAX as f64) as u32)
        })
        .unwrap_or_else(|| {
            log::warn!("Ignoring malformed best score {:?}", raw);
            0
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_absent_defaults_to_zero() {
        let store = MemoryStore::new();
        assert_eq!(BestScore::load(&store).value, 0);
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let mut best = BestScore::load(&store);
        assert!(best.submit(5, &mut store));
        assert_eq!(BestScore::load(&store).value, 5);
    }

    #[test]
    fn test_only_strictly_higher_scores_are_saved() {
        let mut store = MemoryStore::new();
        store.set(BestScore::STORAGE_KEY, "8");
        let mut best = BestScore::load(&store);
        assert!(!best.submit(8, &mut store));
        assert!(!best.submit(3, &mut store));
        assert_eq!(best.value, 8);
        assert!(best.submit(9, &mut store));
        assert_eq!(store.get(BestScore::STORAGE_KEY).as_deref(), Some("9"));
    }

    #[test]
    fn test_parse_stored() {
        assert_eq!(parse_stored("42"), 42);
        assert_eq!(parse_stored(" 7 \n"), 7);
        assert_eq!(parse_stored("12.0"), 12);
        assert_eq!(parse_stored("-3"), 0);
        assert_eq!(parse_stored("banana"), 0);
        assert_eq!(parse_stored(""), 0);
    }
}

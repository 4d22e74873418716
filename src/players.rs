//! Player identity resolution
//!
//! The results service does not always report a stable user id. Such players
//! get a synthetic id derived from their normalized name, which can later be
//! merged into a real id once one is known.

use crate::error::{LeagueError, Result};
use crate::types::{Competition, Player, PlayerId};
use crate::utils::{fnv1a_64, normalize_name};
use std::collections::BTreeMap;
use tracing::debug;

/// Synthetic id for a player known only by name. Always negative, so it
/// never collides with an upstream id.
pub fn synthetic_id(name: &str) -> PlayerId {
    let hash = fnv1a_64(normalize_name(name).as_bytes());
    -((hash >> 1) as i64) - 1
}

pub fn is_synthetic(id: PlayerId) -> bool {
    id < 0
}

#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
    merged: BTreeMap<PlayerId, PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the identity of a reported player, registering it on first
    /// sight. A real id arriving for a name that was so far only known by its
    /// synthetic id merges the two.
    pub fn resolve(&mut self, user_id: Option<PlayerId>, name: &str) -> Player {
        let synthetic = synthetic_id(name);

        let id = match user_id {
            Some(real) => {
                if self.players.contains_key(&synthetic) {
                    self.merge(synthetic, real, name);
                }
                // Later name-only rows for this name resolve to the real id
                self.merged.insert(synthetic, real);
                real
            }
            None => self.canonical_id(synthetic),
        };

        self.players
            .entry(id)
            .or_insert_with(|| Player::new(id, name.trim()))
            .clone()
    }

    /// Merge a synthetic identity into a real one
    pub fn merge_identity(&mut self, synthetic_id: PlayerId, real_id: PlayerId) -> Result<()> {
        if !is_synthetic(synthetic_id) {
            return Err(LeagueError::IdentityMergeFailed {
                reason: format!("{} is not a synthetic player id", synthetic_id),
            }
            .into());
        }
        if is_synthetic(real_id) {
            return Err(LeagueError::IdentityMergeFailed {
                reason: format!("cannot merge into synthetic id {}", real_id),
            }
            .into());
        }
        let name = match self.players.get(&synthetic_id) {
            Some(player) => player.name.clone(),
            None => {
                return Err(LeagueError::PlayerNotFound {
                    player_id: synthetic_id,
                }
                .into())
            }
        };

        self.merge(synthetic_id, real_id, &name);
        Ok(())
    }

    fn merge(&mut self, synthetic_id: PlayerId, real_id: PlayerId, name: &str) {
        debug!("Merging synthetic player {} into {}", synthetic_id, real_id);
        self.players.remove(&synthetic_id);
        self.merged.insert(synthetic_id, real_id);
        self.players
            .entry(real_id)
            .or_insert_with(|| Player::new(real_id, name.trim()));
    }

    /// The id a player is known by after all merges
    pub fn canonical_id(&self, id: PlayerId) -> PlayerId {
        self.merged.get(&id).copied().unwrap_or(id)
    }

    /// Rewrite player ids in an already normalized competition tree
    pub fn apply_merges(&self, competition: &mut Competition) {
        for result in &mut competition.results {
            let id = self.canonical_id(result.player.id);
            if id != result.player.id {
                result.player.id = id;
            }
        }
        for round in &mut competition.sub {
            self.apply_merges(round);
        }
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&self.canonical_id(id))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RoundResult;
    use chrono::NaiveDate;

    #[test]
    fn test_synthetic_id_is_stable_and_negative() {
        let a = synthetic_id("Jan Kowalski");
        let b = synthetic_id("  JAN   kowalski");
        assert_eq!(a, b);
        assert!(is_synthetic(a));
        assert_ne!(a, synthetic_id("Anna Nowak"));
    }

    #[test]
    fn test_resolve_real_and_synthetic() {
        let mut registry = PlayerRegistry::new();
        let real = registry.resolve(Some(1001), "Anna Nowak");
        assert_eq!(real.id, 1001);

        let guest = registry.resolve(None, "Guest Player");
        assert!(is_synthetic(guest.id));
        assert_eq!(registry.resolve(None, "guest player").id, guest.id);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_real_id_merges_known_name() {
        let mut registry = PlayerRegistry::new();
        let guest = registry.resolve(None, "Piotr Zielinski");
        let later = registry.resolve(Some(42), "Piotr Zielinski");

        assert_eq!(later.id, 42);
        assert_eq!(registry.canonical_id(guest.id), 42);
        assert_eq!(registry.resolve(None, "PIOTR ZIELINSKI").id, 42);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_name_only_after_real_id_resolves_to_real() {
        let mut registry = PlayerRegistry::new();
        let real = registry.resolve(Some(42), "Piotr Zielinski");
        let later = registry.resolve(None, " piotr  zielinski ");

        assert_eq!(real.id, 42);
        assert_eq!(later.id, 42);
        assert_eq!(registry.canonical_id(synthetic_id("Piotr Zielinski")), 42);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_explicit_merge_and_apply() {
        let mut registry = PlayerRegistry::new();
        let guest = registry.resolve(None, "Ola");

        let mut competition =
            Competition::new(5, "Round", NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        competition
            .results
            .push(RoundResult::new(guest.clone(), "Women"));

        registry.merge_identity(guest.id, 77).unwrap();
        registry.apply_merges(&mut competition);

        assert_eq!(competition.results[0].player.id, 77);
        assert_eq!(registry.get(guest.id).map(|p| p.id), Some(77));
    }

    #[test]
    fn test_merge_rejects_invalid_ids() {
        let mut registry = PlayerRegistry::new();
        let guest = registry.resolve(None, "Ola");
        assert!(registry.merge_identity(10, 20).is_err());
        assert!(registry.merge_identity(guest.id, -5).is_err());
        assert!(registry.merge_identity(synthetic_id("Nobody"), 20).is_err());
    }
}

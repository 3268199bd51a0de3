//! Per-round record of night actions.
//!
//! Entries are created lazily on the first action of a round and only ever
//! filled in, never rewritten. Death resolution reads the completed round.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::state::{RoundNo, UserId};

/// What the witch did in one round. At most one per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum WitchAction {
    Save(UserId),
    Poison(UserId),
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeerVerdict {
    Wolf,
    Good,
}

impl SeerVerdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wolf => "wolf",
            Self::Good => "good",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeerCheck {
    pub seer: UserId,
    pub target: UserId,
    pub result: SeerVerdict,
    pub target_was_alive: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLog {
    pub wolf_kill_target: Option<UserId>,
    pub witch_action: Option<WitchAction>,
    pub seer_check: Option<SeerCheck>,
}

impl RoundLog {
    pub fn saved(&self) -> Option<UserId> {
        match self.witch_action {
            Some(WitchAction::Save(target)) => Some(target),
            _ => None,
        }
    }

    pub fn poisoned(&self) -> Option<UserId> {
        match self.witch_action {
            Some(WitchAction::Poison(target)) => Some(target),
            _ => None,
        }
    }

    /// Players who die from this round's night.
    ///
    /// The wolf target dies unless saved; the poison target always dies.
    /// Sorted, without duplicates, at most two entries.
    pub fn deaths(&self) -> Vec<UserId> {
        let mut deaths = Vec::with_capacity(2);
        if let Some(target) = self.wolf_kill_target {
            if self.saved() != Some(target) {
                deaths.push(target);
            }
        }
        if let Some(target) = self.poisoned() {
            if !deaths.contains(&target) {
                deaths.push(target);
            }
        }
        deaths.sort_unstable();
        deaths
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog(BTreeMap<RoundNo, RoundLog>);

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, round: RoundNo) -> Option<&RoundLog> {
        self.0.get(&round)
    }

    /// Round entry, created on first use.
    pub fn entry(&mut self, round: RoundNo) -> &mut RoundLog {
        self.0.entry(round).or_default()
    }

    pub fn rounds(&self) -> impl Iterator<Item = (RoundNo, &RoundLog)> {
        self.0.iter().map(|(round, log)| (*round, log))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(RoundNo, RoundLog)> for ActionLog {
    fn from_iter<I: IntoIterator<Item = (RoundNo, RoundLog)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

//! Creature party state and store

use crate::creature::Creature;
use crate::error::{Error, Result};
use crate::stream::{Stream, StreamReader};
use serde::{Deserialize, Serialize};

/// Maximum number of creatures in a party
pub const MAX_PARTY_SIZE: usize = 6;

/// Immutable snapshot of the party
///
/// Holds at most [`MAX_PARTY_SIZE`] creatures and an active index that points
/// at a member whenever the party is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPartyState", into = "RawPartyState")]
pub struct PartyState {
    party: Vec<Creature>,
    active_index: usize,
}

#[derive(Serialize, Deserialize)]
struct RawPartyState {
    party: Vec<Creature>,
    #[serde(default)]
    active_index: usize,
}

impl PartyState {
    /// Create an empty party
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a party, checking size, active index and member stats
    pub fn from_members(party: Vec<Creature>, active_index: usize) -> Result<Self> {
        if party.len() > MAX_PARTY_SIZE {
            return Err(Error::PartyOverflow {
                size: party.len(),
                max: MAX_PARTY_SIZE,
            });
        }
        let index_ok = if party.is_empty() {
            active_index == 0
        } else {
            active_index < party.len()
        };
        if !index_ok {
            return Err(Error::ActiveIndexOutOfRange {
                index: active_index,
                size: party.len(),
            });
        }
        for creature in &party {
            creature.validate()?;
        }
        Ok(Self {
            party,
            active_index,
        })
    }

    /// Party members in order
    pub fn members(&self) -> &[Creature] {
        &self.party
    }

    /// Index of the active member
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// The active member, if the party is non-empty
    pub fn active(&self) -> Option<&Creature> {
        self.party.get(self.active_index)
    }

    /// Number of members
    pub fn len(&self) -> usize {
        self.party.len()
    }

    /// Check if the party has no members
    pub fn is_empty(&self) -> bool {
        self.party.is_empty()
    }

    /// Check if the party cannot take another member
    pub fn is_full(&self) -> bool {
        self.party.len() >= MAX_PARTY_SIZE
    }
}

impl TryFrom<RawPartyState> for PartyState {
    type Error = Error;

    fn try_from(raw: RawPartyState) -> Result<Self> {
        Self::from_members(raw.party, raw.active_index)
    }
}

impl From<PartyState> for RawPartyState {
    fn from(state: PartyState) -> Self {
        Self {
            party: state.party,
            active_index: state.active_index,
        }
    }
}

/// Owner of the party state
#[derive(Debug)]
pub struct PartyStore {
    state: PartyState,
    stream: Stream<PartyState>,
}

impl PartyStore {
    /// Create a store with an empty party
    pub fn new() -> Self {
        Self::with_state(PartyState::new())
    }

    /// Create a store seeded with `state`
    pub fn with_state(state: PartyState) -> Self {
        let stream = Stream::with_value(state.clone());
        Self { state, stream }
    }

    /// Read-only stream of party snapshots
    pub fn stream(&self) -> StreamReader<PartyState> {
        self.stream.reader()
    }

    /// Current party state
    pub fn state(&self) -> &PartyState {
        &self.state
    }

    /// Append a creature unless the party is full
    ///
    /// Creatures with more hit points than `max_hp` are refused.
    pub fn add_creature(&mut self, creature: Creature) -> bool {
        if self.state.is_full() {
            tracing::debug!(creature = %creature.id, "party is full");
            return false;
        }
        if let Err(err) = creature.validate() {
            tracing::warn!(%err, "creature refused");
            return false;
        }

        let mut next = self.state.clone();
        next.party.push(creature);
        self.publish(next);
        true
    }

    /// Make the member at `index` active
    ///
    /// Out-of-range indices are ignored.
    pub fn switch_active(&mut self, index: usize) -> bool {
        if index >= self.state.len() {
            tracing::debug!(index, size = self.state.len(), "switch index out of range");
            return false;
        }

        let mut next = self.state.clone();
        next.active_index = index;
        self.publish(next);
        true
    }

    /// Give experience to the active member, applying every level-up
    ///
    /// An empty party has no one to receive it; the call is ignored and
    /// returns `false`.
    pub fn gain_exp(&mut self, amount: u32) -> bool {
        let index = self.state.active_index;
        let Some(current) = self.state.party.get(index) else {
            tracing::warn!(amount, "experience gained with an empty party");
            return false;
        };

        let (updated, levels) = current.gain_exp(amount);
        if levels > 0 {
            tracing::info!(
                creature = %updated.id,
                level = updated.level,
                levels,
                "creature leveled up"
            );
        }

        let mut next = self.state.clone();
        next.party[index] = updated;
        self.publish(next);
        true
    }

    fn publish(&mut self, next: PartyState) {
        self.state = next.clone();
        self.stream.push(next);
    }
}

impl Default for PartyStore {
    fn default() -> Self {
        Self::new()
    }
}

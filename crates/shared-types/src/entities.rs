//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Game**: `Deck`, `DrawMode`, `DrawState`, `PlayerCounts`, `PlayerId`
//! - **Presentation**: `Layout` (passive, never consulted by draw logic)
//! - **Replication**: `SpinEvent`, `RemoteResetPolicy`
//! - **Coordination**: `Lease`

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TypeError;

/// Number of seats at the table. Player ids run `1..=MAX_PLAYERS`.
pub const MAX_PLAYERS: u8 = 4;

/// A player at this many draws is excluded from drawing.
pub const PLAYER_DRAW_CAP: u32 = 20;

/// Size of the rotating presentation palette.
pub const COLOR_COUNT: u32 = 20;

/// Lease time-to-live in milliseconds.
pub const LEASE_TTL_MS: u64 = 5_000;

/// Candidate shown by displays when the deck is empty.
pub const PLACEHOLDER_CANDIDATE: &str = "?";

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

// =============================================================================
// CLUSTER A: GAME
// =============================================================================

/// A seat at the table, validated to `1..=MAX_PLAYERS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// Validate a raw seat number.
    pub fn new(raw: u8) -> Result<Self, TypeError> {
        if (1..=MAX_PLAYERS).contains(&raw) {
            Ok(Self(raw))
        } else {
            Err(TypeError::InvalidPlayer(raw))
        }
    }

    /// The 1-based seat number.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Every seat in ascending order.
    pub fn all() -> impl Iterator<Item = PlayerId> {
        (1..=MAX_PLAYERS).map(PlayerId)
    }

    fn slot(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = TypeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> Self {
        player.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}P", self.0)
    }
}

/// How an exhausted deck behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// Exhausting the deck clears the used set and starts a fresh cycle
    /// within the same draw.
    #[default]
    Loop,
    /// Drawn items stay out until an explicit reset; an exhausted deck
    /// yields misses.
    Exhaust,
}

impl DrawMode {
    /// Wire label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DrawMode::Loop => "loop",
            DrawMode::Exhaust => "exhaust",
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loop" => Ok(DrawMode::Loop),
            "exhaust" => Ok(DrawMode::Exhaust),
            other => Err(TypeError::UnknownMode(other.to_string())),
        }
    }
}

/// Ordered pool of unique item labels.
///
/// Uniqueness is enforced on every construction path, including
/// deserialization of a hand-edited record.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Deck(Vec<String>);

impl Deck {
    /// Build a deck from operator text: one item per line, lines trimmed,
    /// blanks dropped, duplicates collapsed keeping the first occurrence.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_items(text.lines().map(str::trim).filter(|line| !line.is_empty()))
    }

    /// Build a deck from labels, collapsing duplicates in order.
    pub fn from_items<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let items = items
            .into_iter()
            .map(Into::into)
            .filter(|item: &String| seen.insert(item.clone()))
            .collect();
        Self(items)
    }

    /// Normalized operator text, one item per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.0.join("\n")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|i| i == item)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for Deck {
    fn from(items: Vec<String>) -> Self {
        Self::from_items(items)
    }
}

impl From<Deck> for Vec<String> {
    fn from(deck: Deck) -> Self {
        deck.0
    }
}

/// Per-player draw counters, always covering every seat.
///
/// Serialized as `{"1": n, "2": n, "3": n, "4": n}`. Missing seats read as
/// zero, unknown keys are ignored and values are clamped to the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u64>", into = "BTreeMap<String, u64>")]
pub struct PlayerCounts([u32; MAX_PLAYERS as usize]);

impl PlayerCounts {
    #[must_use]
    pub fn get(&self, player: PlayerId) -> u32 {
        self.0[player.slot()]
    }

    /// Add one draw, saturating at the cap.
    pub fn increment(&mut self, player: PlayerId) {
        let count = &mut self.0[player.slot()];
        *count = (*count + 1).min(PLAYER_DRAW_CAP);
    }

    #[must_use]
    pub fn is_capped(&self, player: PlayerId) -> bool {
        self.get(player) >= PLAYER_DRAW_CAP
    }

    pub fn clear(&mut self) {
        self.0 = [0; MAX_PLAYERS as usize];
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, u32)> + '_ {
        PlayerId::all().map(move |p| (p, self.get(p)))
    }
}

impl From<BTreeMap<String, u64>> for PlayerCounts {
    fn from(raw: BTreeMap<String, u64>) -> Self {
        let mut counts = Self::default();
        for (key, value) in raw {
            let Some(player) = key.trim().parse::<u8>().ok().and_then(|k| PlayerId::new(k).ok())
            else {
                continue;
            };
            let clamped = u32::try_from(value)
                .unwrap_or(PLAYER_DRAW_CAP)
                .min(PLAYER_DRAW_CAP);
            counts.0[player.slot()] = clamped;
        }
        counts
    }
}

impl From<PlayerCounts> for BTreeMap<String, u64> {
    fn from(counts: PlayerCounts) -> Self {
        counts
            .iter()
            .map(|(p, n)| (p.get().to_string(), u64::from(n)))
            .collect()
    }
}

// =============================================================================
// CLUSTER B: PRESENTATION
// =============================================================================

/// Display positioning. Passive: draw logic never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Layout {
    /// Build a layout, replacing non-finite inputs with the defaults.
    #[must_use]
    pub fn sanitized(x: f64, y: f64, scale: f64) -> Self {
        let fallback = Self::default();
        let pick = |v: f64, d: f64| if v.is_finite() { v } else { d };
        Self {
            x: pick(x, fallback.x),
            y: pick(y, fallback.y),
            scale: if scale.is_finite() && scale != 0.0 {
                scale
            } else {
                fallback.scale
            },
        }
    }
}

// =============================================================================
// CLUSTER C: SHARED STATE
// =============================================================================

/// The single shared record.
///
/// ## Invariants
///
/// - `used_items ⊆ deck`
/// - every player count is at most `PLAYER_DRAW_CAP`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrawState {
    pub deck: Deck,
    pub used_items: BTreeSet<String>,
    pub player_counts: PlayerCounts,
    pub mode: DrawMode,
    pub layout: Layout,
}

impl DrawState {
    /// Empty deck, `loop` mode, zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items still drawable this cycle, in deck order.
    #[must_use]
    pub fn available(&self) -> Vec<&str> {
        self.deck
            .iter()
            .filter(|item| !self.used_items.contains(*item))
            .collect()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.available().len()
    }

    #[must_use]
    pub fn is_capped(&self, player: PlayerId) -> bool {
        self.player_counts.is_capped(player)
    }

    /// Replace the deck and mode, zeroing all derived state. Layout survives.
    pub fn reconfigure(&mut self, deck: Deck, mode: DrawMode) {
        self.deck = deck;
        self.mode = mode;
        self.reset_game();
    }

    /// Clear used items and counters, keeping deck, mode and layout.
    pub fn reset_game(&mut self) {
        self.used_items.clear();
        self.player_counts.clear();
    }

    /// Drop any used item the deck no longer contains.
    pub fn retain_deck_items(&mut self) {
        let deck = &self.deck;
        self.used_items.retain(|item| deck.contains(item));
    }

    /// Check every state invariant.
    pub fn check_invariants(&self) -> Result<(), TypeError> {
        if let Some(stray) = self.used_items.iter().find(|i| !self.deck.contains(i)) {
            return Err(TypeError::InvariantViolation(format!(
                "used item {stray:?} is not in the deck"
            )));
        }
        if let Some((player, count)) = self
            .player_counts
            .iter()
            .find(|(_, n)| *n > PLAYER_DRAW_CAP)
        {
            return Err(TypeError::InvariantViolation(format!(
                "{player} has {count} draws, cap is {PLAYER_DRAW_CAP}"
            )));
        }
        Ok(())
    }
}

// =============================================================================
// CLUSTER D: REPLICATION
// =============================================================================

/// Immutable fact describing one committed draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinEvent {
    pub player_id: PlayerId,
    /// The drawn item, `None` on a miss.
    pub result_value: Option<String>,
    pub is_miss: bool,
    /// Rotating presentation index in `0..COLOR_COUNT`.
    pub color_index: u8,
    pub timestamp: Timestamp,
    /// Labels displays may flash while animating. A superset of the result.
    pub candidate_set: Vec<String>,
    /// The used set was cleared during this draw.
    pub reset_occurred: bool,
    /// Mode that governed the draw.
    pub mode: DrawMode,
}

/// How a receiver treats `resetOccurred` on a SPIN it did not publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemoteResetPolicy {
    /// Clear only when the governing mode is `loop`. An exhaust-mode
    /// receiver never accepts a cycle reset.
    #[default]
    LoopOnly,
    /// Always clear.
    Always,
}

impl RemoteResetPolicy {
    /// Whether a reset flag should clear local state under `mode`.
    #[must_use]
    pub fn honors(self, mode: DrawMode) -> bool {
        match self {
            RemoteResetPolicy::LoopOnly => mode == DrawMode::Loop,
            RemoteResetPolicy::Always => true,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteResetPolicy::LoopOnly => "loop-only",
            RemoteResetPolicy::Always => "always",
        }
    }
}

impl FromStr for RemoteResetPolicy {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "loop-only" | "loop_only" | "loop" => Ok(RemoteResetPolicy::LoopOnly),
            "always" => Ok(RemoteResetPolicy::Always),
            other => Err(TypeError::UnknownPolicy(other.to_string())),
        }
    }
}

// =============================================================================
// CLUSTER E: COORDINATION
// =============================================================================

/// Advisory claim of exclusive access to the draw state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    /// Fencing token of the holder.
    #[serde(rename = "id")]
    pub holder_id: String,
    pub acquired_at: Timestamp,
}

impl Lease {
    /// A lease is active while `now - acquired_at < ttl_ms`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp, ttl_ms: u64) -> bool {
        now.saturating_sub(self.acquired_at) < ttl_ms
    }
}

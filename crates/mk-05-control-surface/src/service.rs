//! # Control Surface Service
//!
//! The producing side of the game. Every command that writes the shared
//! record follows the same critical section:
//!
//! ```text
//! acquire lease → load (merge) → mutate → save → publish → release
//! ```
//!
//! A lease timeout leaves the store and the channel untouched.

use std::collections::HashMap;
use std::sync::Arc;

use lottery_telemetry::{
    metric_inc, time_histogram, DRAWS, EVENTS_PUBLISHED, LEASE_TIMEOUTS, LEASE_WAIT,
    STORE_CORRUPTIONS,
};
use mk_01_state_store::{LoadReport, SharedStore, StateStore};
use mk_02_lease_lock::{LeaseLock, TimeSource};
use mk_03_draw_engine::{DrawEngine, DrawOutcome, DrawRequest, RandomSource};
use shared_bus::{ContextId, EventEnvelope, EventFilter, EventPublisher, LotteryEvent};
use shared_types::{Deck, DrawMode, DrawState, Layout, PlayerId, SpinEvent};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::domain::{
    apply_foreign_reset, apply_foreign_spin, ControlConfig, ControlError, DeckStatus,
};

/// Result of a draw request that got through the lease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawReport {
    /// The committed store showed the player at the cap; nothing happened.
    Capped,
    /// A draw was saved and published.
    Spun(SpinEvent),
}

pub struct ControlSurface {
    config: ControlConfig,
    store: StateStore,
    lease: LeaseLock,
    engine: DrawEngine,
    publisher: Arc<dyn EventPublisher>,
    clock: Arc<dyn TimeSource>,
    state: DrawState,
    selected_mode: DrawMode,
    last_request: HashMap<PlayerId, Instant>,
}

impl ControlSurface {
    pub fn new(
        config: ControlConfig,
        store: SharedStore,
        publisher: Arc<dyn EventPublisher>,
        clock: Arc<dyn TimeSource>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        let lease = LeaseLock::new(Arc::clone(&store), Arc::clone(&clock), config.lease.clone());
        Self {
            store: StateStore::new(store),
            lease,
            engine: DrawEngine::new(rng),
            publisher,
            clock,
            state: DrawState::new(),
            selected_mode: DrawMode::default(),
            last_request: HashMap::new(),
            config,
        }
    }

    /// Load the persisted record and adopt its mode as the selection.
    pub fn open(&mut self) -> Result<LoadReport, ControlError> {
        let report = self.load()?;
        self.selected_mode = self.state.mode;
        info!(
            context = %self.config.context_id,
            status = %self.status(),
            "[mk-05] Control surface opened"
        );
        Ok(report)
    }

    /// Change the operator's mode selection. Governs the next draw.
    pub fn select_mode(&mut self, mode: DrawMode) {
        self.selected_mode = mode;
    }

    /// Replace the deck and start a new game.
    ///
    /// Returns the normalized deck text. An empty deck is rejected before
    /// anything is touched.
    pub async fn submit_deck(&mut self, text: &str, mode: DrawMode) -> Result<String, ControlError> {
        let deck = Deck::parse(text);
        if deck.is_empty() {
            return Err(ControlError::EmptyDeck);
        }
        let normalized = deck.to_text();

        self.locked(move |this| {
            this.load()?;
            let mut next = this.state.clone();
            next.reconfigure(deck, mode);
            this.store.save(&next)?;
            this.state = next;
            this.selected_mode = mode;
            info!(items = this.state.deck.len(), mode = %mode, "[mk-05] Deck submitted");
            this.publish(LotteryEvent::ResetGame);
            this.publish(LotteryEvent::SyncState);
            Ok(())
        })
        .await?;

        Ok(normalized)
    }

    /// Draw for player `raw_player` (1..=4).
    pub async fn trigger_draw(&mut self, raw_player: u8) -> Result<DrawReport, ControlError> {
        let player = PlayerId::new(raw_player).map_err(|_| ControlError::PlayerOutOfRange(raw_player))?;

        let now = Instant::now();
        if let Some(last) = self.last_request.get(&player) {
            let elapsed = now.duration_since(*last);
            if elapsed < self.config.cooldown {
                return Err(ControlError::CoolingDown {
                    player,
                    remaining: self.config.cooldown - elapsed,
                });
            }
        }
        self.last_request.insert(player, now);

        if self.state.is_capped(player) {
            return Err(ControlError::PlayerCapped(player));
        }

        self.locked(move |this| {
            this.load()?;
            let request = DrawRequest::new(player, this.clock.now_ms()).with_mode(this.selected_mode);

            let drawn = match this.engine.draw(&this.state, request) {
                DrawOutcome::Capped => {
                    metric_inc!(DRAWS, &["capped"]);
                    return Ok(DrawReport::Capped);
                }
                DrawOutcome::Drawn(drawn) => drawn,
            };

            this.store.save(&drawn.state)?;
            this.state = drawn.state;
            metric_inc!(DRAWS, &[drawn.kind.as_str()]);
            info!(
                player_id = %player,
                kind = %drawn.kind,
                result = ?drawn.event.result_value,
                "[mk-05] Draw committed"
            );
            this.publish(LotteryEvent::Spin(drawn.event.clone()));
            Ok(DrawReport::Spun(drawn.event))
        })
        .await
    }

    /// Clear used items and counters, keeping the deck.
    pub async fn reset_game(&mut self, confirm: bool) -> Result<(), ControlError> {
        if !confirm {
            return Err(ControlError::ResetNotConfirmed);
        }

        self.locked(|this| {
            this.load()?;
            let mut next = this.state.clone();
            next.reset_game();
            this.store.save(&next)?;
            this.state = next;
            info!("[mk-05] Game reset");
            this.publish(LotteryEvent::ResetGame);
            Ok(())
        })
        .await
    }

    /// Save and publish a new display layout. Non-finite values fall back to
    /// the defaults.
    pub async fn update_layout(&mut self, x: f64, y: f64, scale: f64) -> Result<Layout, ControlError> {
        let layout = Layout::sanitized(x, y, scale);

        self.locked(move |this| {
            this.load()?;
            let next = DrawState {
                layout,
                ..this.state.clone()
            };
            this.store.save(&next)?;
            this.state = next;
            this.publish(LotteryEvent::UpdateConfig(layout));
            Ok(layout)
        })
        .await
    }

    /// Hard-refresh every display, then resend the layout once they are back.
    pub async fn reload_display(&self) {
        self.publish(LotteryEvent::Reload);
        tokio::time::sleep(self.config.relayout_delay).await;
        self.publish(LotteryEvent::UpdateConfig(self.state.layout));
    }

    /// Fold an event from the channel into local state.
    ///
    /// Returns whether anything was applied. Own echoes, layout and reload
    /// signals are skipped.
    pub fn handle_event(&mut self, envelope: &EventEnvelope) -> Result<bool, ControlError> {
        if envelope.origin == self.config.context_id {
            return Ok(false);
        }

        match &envelope.event {
            LotteryEvent::Spin(spin) => {
                let effect = apply_foreign_spin(&mut self.state, spin, self.config.remote_reset_policy);
                debug!(
                    origin = %envelope.origin,
                    player_id = %spin.player_id,
                    reset_applied = effect.reset_applied,
                    item_recorded = effect.item_recorded,
                    "[mk-05] Foreign spin applied"
                );
                Ok(true)
            }
            LotteryEvent::ResetGame => {
                apply_foreign_reset(&mut self.state);
                debug!(origin = %envelope.origin, "[mk-05] Foreign reset applied");
                Ok(true)
            }
            LotteryEvent::SyncState => {
                self.load()?;
                self.selected_mode = self.state.mode;
                Ok(true)
            }
            LotteryEvent::UpdateConfig(_) | LotteryEvent::Reload => Ok(false),
        }
    }

    /// Subscription filter for this surface: everything but its own echoes.
    pub fn filter(&self) -> EventFilter {
        EventFilter::all().excluding_origin(self.config.context_id.clone())
    }

    pub fn status(&self) -> DeckStatus {
        DeckStatus::of(&self.state)
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn selected_mode(&self) -> DrawMode {
        self.selected_mode
    }

    pub fn context_id(&self) -> &ContextId {
        &self.config.context_id
    }

    /// Watch every state this surface saves.
    pub fn observe(&self) -> tokio::sync::watch::Receiver<DrawState> {
        self.store.subscribe()
    }

    /// Run `op` while holding the lease. The lease is released whether or
    /// not `op` succeeds.
    async fn locked<T, F>(&mut self, op: F) -> Result<T, ControlError>
    where
        F: FnOnce(&mut Self) -> Result<T, ControlError>,
    {
        let acquired = {
            let _timer = time_histogram!(LEASE_WAIT);
            self.lease.acquire().await
        };
        let id = match acquired {
            Ok(id) => id,
            Err(e) => {
                if e.is_timeout() {
                    metric_inc!(LEASE_TIMEOUTS);
                }
                warn!(error = %e, "[mk-05] Could not take the lease");
                return Err(e.into());
            }
        };

        let result = op(&mut *self);

        if let Err(e) = self.lease.release(&id) {
            warn!(holder = %id, error = %e, "[mk-05] Lease release failed, it will expire");
        }
        result
    }

    fn load(&mut self) -> Result<LoadReport, ControlError> {
        let report = self.store.load(&mut self.state)?;
        if report.is_corrupt() {
            metric_inc!(STORE_CORRUPTIONS);
        }
        Ok(report)
    }

    fn publish(&self, event: LotteryEvent) {
        metric_inc!(EVENTS_PUBLISHED, &[event.kind()]);
        self.publisher
            .publish(EventEnvelope::new(self.config.context_id.clone(), event));
    }
}

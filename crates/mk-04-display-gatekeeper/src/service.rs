//! # Display Surface
//!
//! Read-only consumer of the replication channel. Every event passes
//! through here before anything is rendered:
//!
//! | Event | Effect |
//! |-------|--------|
//! | `SPIN` | gatekeep, append to the player's history, render |
//! | `RESET_GAME` | clear the seen-set and all histories |
//! | `UPDATE_CONFIG` | replace the layout |
//! | `RELOAD` | drop all local state |
//! | `SYNC_STATE` | ignored; displays hold no store copy |

use std::collections::BTreeMap;

use lottery_telemetry::{metric_inc, GATEKEEPER_DOWNGRADES};
use shared_bus::{EventFilter, LotteryEvent, Subscription};
use shared_types::{Layout, PlayerId, RemoteResetPolicy, SpinEvent};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::{DisplayAction, GateVerdict, Gatekeeper, RenderedSpin};

#[derive(Debug, Clone, Default)]
pub struct DisplaySurface {
    gatekeeper: Gatekeeper,
    histories: BTreeMap<PlayerId, Vec<RenderedSpin>>,
    layout: Layout,
}

impl DisplaySurface {
    pub fn new(policy: RemoteResetPolicy) -> Self {
        Self {
            gatekeeper: Gatekeeper::new(policy),
            histories: BTreeMap::new(),
            layout: Layout::default(),
        }
    }

    /// Filter a display subscribes with: everything, including echoes.
    pub fn filter() -> EventFilter {
        EventFilter::all()
    }

    /// Apply one event and say what the renderer should do.
    pub fn apply(&mut self, event: &LotteryEvent) -> DisplayAction {
        match event {
            LotteryEvent::Spin(spin) => DisplayAction::Render(self.render(spin)),
            LotteryEvent::ResetGame => {
                self.gatekeeper.clear();
                self.histories.clear();
                info!("[mk-04] Display reset");
                DisplayAction::Cleared
            }
            LotteryEvent::UpdateConfig(layout) => {
                self.layout = *layout;
                debug!(x = layout.x, y = layout.y, scale = layout.scale, "[mk-04] Relayout");
                DisplayAction::Relayout(*layout)
            }
            LotteryEvent::Reload => {
                let policy = self.gatekeeper.policy();
                *self = Self::new(policy);
                info!("[mk-04] Display reloaded");
                DisplayAction::Reload
            }
            LotteryEvent::SyncState => DisplayAction::Ignored,
        }
    }

    fn render(&mut self, spin: &SpinEvent) -> RenderedSpin {
        let verdict = self.gatekeeper.admit(spin);
        if matches!(verdict, GateVerdict::Downgraded(_)) {
            metric_inc!(GATEKEEPER_DOWNGRADES);
        }

        let history = self.histories.entry(spin.player_id).or_default();
        let rendered = RenderedSpin {
            player: spin.player_id,
            slot: history.len(),
            result: verdict.item().map(String::from),
            downgraded: matches!(verdict, GateVerdict::Downgraded(_)),
            color_index: spin.color_index,
            candidate_set: spin.candidate_set.clone(),
            timestamp: spin.timestamp,
        };
        history.push(rendered.clone());
        rendered
    }

    /// Consume `subscription` until the bus closes or the renderer hangs up.
    pub async fn run(mut self, mut subscription: Subscription, actions: mpsc::Sender<DisplayAction>) {
        while let Some(envelope) = subscription.recv().await {
            let action = self.apply(&envelope.event);
            if matches!(action, DisplayAction::Ignored) {
                continue;
            }
            if actions.send(action).await.is_err() {
                debug!("[mk-04] Renderer gone, display stopping");
                return;
            }
        }
        debug!("[mk-04] Channel closed, display stopping");
    }

    #[must_use]
    pub fn history(&self, player: PlayerId) -> &[RenderedSpin] {
        self.histories.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn gatekeeper(&self) -> &Gatekeeper {
        &self.gatekeeper
    }

    /// Every item currently shown as a win, across all players.
    #[must_use]
    pub fn shown_wins(&self) -> Vec<&str> {
        self.histories
            .values()
            .flatten()
            .filter_map(|spin| spin.result.as_deref())
            .collect()
    }
}

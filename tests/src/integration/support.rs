//! Shared fixtures: one store, one channel and one manual clock that any
//! number of surfaces can be attached to.

use std::sync::Arc;

use mk_01_state_store::{InMemoryKVStore, SharedStore, StateStore};
use mk_02_lease_lock::ManualTimeSource;
use mk_03_draw_engine::{RandomSource, ThreadRandomSource};
use mk_04_display_gatekeeper::{DisplayAction, DisplaySurface};
use mk_05_control_surface::{ControlConfig, ControlSurface};
use shared_bus::{ContextId, EventFilter, InMemoryEventBus, Subscription};
use shared_types::{DrawState, RemoteResetPolicy, SpinEvent};

/// Fixed wall clock start for lease timestamps.
pub const T0: u64 = 1_700_000_000_000;

pub struct Rig {
    pub store: SharedStore,
    pub bus: Arc<InMemoryEventBus>,
    pub clock: Arc<ManualTimeSource>,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryKVStore::new()))
    }

    pub fn with_store(store: SharedStore) -> Self {
        Self {
            store,
            bus: Arc::new(InMemoryEventBus::new()),
            clock: Arc::new(ManualTimeSource::new(T0)),
        }
    }

    pub fn control(&self, name: &str) -> ControlSurface {
        self.control_with(name, Arc::new(ThreadRandomSource))
    }

    pub fn control_with(&self, name: &str, rng: Arc<dyn RandomSource>) -> ControlSurface {
        let config = ControlConfig {
            context_id: ContextId::named(name),
            ..ControlConfig::default()
        };
        ControlSurface::new(
            config,
            Arc::clone(&self.store),
            self.bus.clone(),
            self.clock.clone(),
            rng,
        )
    }

    /// A display with its own subscription, driven by hand through `pump`.
    pub fn display(&self) -> DisplayHarness {
        DisplayHarness {
            surface: DisplaySurface::new(RemoteResetPolicy::default()),
            subscription: self.bus.subscribe(DisplaySurface::filter()),
        }
    }

    pub fn watch(&self) -> Subscription {
        self.bus.subscribe(EventFilter::all())
    }

    /// What a fresh context would load right now.
    pub fn committed(&self) -> DrawState {
        let mut state = DrawState::new();
        StateStore::new(Arc::clone(&self.store))
            .load(&mut state)
            .expect("committed state readable");
        state
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}

pub struct DisplayHarness {
    pub surface: DisplaySurface,
    pub subscription: Subscription,
}

impl DisplayHarness {
    /// Apply every buffered event and return the non-ignored actions.
    pub fn pump(&mut self) -> Vec<DisplayAction> {
        self.subscription
            .drain()
            .expect("bus open")
            .iter()
            .map(|envelope| self.surface.apply(&envelope.event))
            .filter(|action| !matches!(action, DisplayAction::Ignored))
            .collect()
    }
}

/// Every SPIN payload buffered on `subscription`.
pub fn spins(subscription: &mut Subscription) -> Vec<SpinEvent> {
    subscription
        .drain()
        .expect("bus open")
        .into_iter()
        .filter_map(|envelope| match envelope.event {
            shared_bus::LotteryEvent::Spin(spin) => Some(spin),
            _ => None,
        })
        .collect()
}

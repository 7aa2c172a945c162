//! # MK-Lottery Draw Benchmarks
//!
//! | Target | Operation |
//! |--------|-----------|
//! | mk-03 Draw Engine | one draw against decks of growing size |
//! | mk-04 Gatekeeper | admitting a stream of spins |
//! | mk-01 State Store | merge of a persisted record |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mk_01_state_store::PersistedState;
use mk_03_draw_engine::{DrawEngine, DrawRequest, ThreadRandomSource};
use mk_04_display_gatekeeper::Gatekeeper;
use shared_types::{Deck, DrawMode, DrawState, PlayerId, RemoteResetPolicy, SpinEvent};

fn deck_of(size: usize) -> Deck {
    Deck::from_items((0..size).map(|i| format!("item-{i}")))
}

fn half_used(size: usize, mode: DrawMode) -> DrawState {
    let mut state = DrawState::new();
    state.reconfigure(deck_of(size), mode);
    state.used_items = (0..size / 2).map(|i| format!("item-{i}")).collect();
    state
}

fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("mk-03-draw-engine");
    let engine = DrawEngine::new(Arc::new(ThreadRandomSource));
    let Ok(player) = PlayerId::new(1) else {
        return;
    };

    for size in [10, 100, 1_000, 10_000] {
        let state = half_used(size, DrawMode::Exhaust);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("draw_exhaust", size), &state, |b, state| {
            b.iter(|| black_box(engine.draw(state, DrawRequest::new(player, 0))))
        });
    }

    let mut exhausted = DrawState::new();
    exhausted.reconfigure(deck_of(1_000), DrawMode::Loop);
    exhausted.used_items = exhausted.deck.iter().map(String::from).collect();
    group.bench_function("draw_loop_reset_1000", |b| {
        b.iter(|| black_box(engine.draw(&exhausted, DrawRequest::new(player, 0))))
    });

    group.finish();
}

fn bench_gatekeeper(c: &mut Criterion) {
    let mut group = c.benchmark_group("mk-04-gatekeeper");
    let Ok(player) = PlayerId::new(2) else {
        return;
    };
    let spins: Vec<SpinEvent> = (0..1_000)
        .map(|i| SpinEvent {
            player_id: player,
            result_value: Some(format!("item-{}", i % 500)),
            is_miss: false,
            color_index: 0,
            timestamp: 0,
            candidate_set: Vec::new(),
            reset_occurred: false,
            mode: DrawMode::Exhaust,
        })
        .collect();

    group.throughput(Throughput::Elements(spins.len() as u64));
    group.bench_function("admit_1000_with_duplicates", |b| {
        b.iter(|| {
            let mut gate = Gatekeeper::new(RemoteResetPolicy::LoopOnly);
            for spin in &spins {
                black_box(gate.admit(spin));
            }
        })
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("mk-01-state-store");

    for size in [100, 1_000] {
        let persisted = half_used(size, DrawMode::Loop);
        let Ok(raw) = serde_json::to_string(&persisted) else {
            return;
        };
        group.bench_with_input(BenchmarkId::new("parse_and_merge", size), &raw, |b, raw| {
            b.iter(|| {
                let mut local = DrawState::new();
                if let Ok(record) = PersistedState::parse(raw) {
                    black_box(record.merge_into(&mut local));
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_draw, bench_gatekeeper, bench_merge);
criterion_main!(benches);

//! # Lease Contention
//!
//! Several control surfaces sharing one store and one channel, drawing at
//! the same time. The lease serializes the critical sections; the merge on
//! load hands each holder the committed state of the previous one.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use mk_01_state_store::{LEASE_KEY, STATE_KEY};
    use mk_05_control_surface::{ControlError, DrawReport};
    use shared_types::{DrawMode, Lease, PlayerId};

    use crate::integration::support::{spins, Rig, T0};

    fn hold_lease(rig: &Rig, holder: &str, acquired_at: u64) {
        let lease = Lease {
            holder_id: holder.to_string(),
            acquired_at,
        };
        rig.store
            .put(LEASE_KEY, &serde_json::to_string(&lease).unwrap())
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_racing_controllers_never_repeat_in_exhaust() {
        let rig = Rig::new();
        let mut a = rig.control("a");
        let mut b = rig.control("b");
        let mut c = rig.control("c");
        let mut sub = rig.watch();

        a.submit_deck("1\n2\n3\n4\n5\n6\n7\n8\n9", DrawMode::Exhaust).await.unwrap();
        b.open().unwrap();
        c.open().unwrap();

        for _ in 0..3 {
            let (ra, rb, rc) = tokio::join!(a.trigger_draw(1), b.trigger_draw(2), c.trigger_draw(3));
            for report in [ra, rb, rc] {
                assert!(matches!(report, Ok(DrawReport::Spun(_))), "{report:?}");
            }
            tokio::time::advance(Duration::from_millis(500)).await;
        }

        let results: Vec<String> = spins(&mut sub)
            .into_iter()
            .map(|spin| spin.result_value.expect("nine items, nine draws"))
            .collect();
        let distinct: HashSet<&String> = results.iter().collect();
        assert_eq!(results.len(), 9);
        assert_eq!(distinct.len(), 9);

        let committed = rig.committed();
        assert_eq!(committed.used_items.len(), 9);
        for player in 1..=3 {
            assert_eq!(committed.player_counts.get(PlayerId::new(player).unwrap()), 3);
        }
        assert!(rig.store.get(LEASE_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_racing_submit_and_draw_keep_invariants() {
        let rig = Rig::new();
        let mut operator = rig.control("operator");
        let mut booth = rig.control("booth");

        operator.submit_deck("A\nB\nC", DrawMode::Loop).await.unwrap();
        booth.open().unwrap();

        let (submitted, drawn) = tokio::join!(
            operator.submit_deck("X\nY", DrawMode::Exhaust),
            booth.trigger_draw(4)
        );
        submitted.unwrap();
        drawn.unwrap();

        let committed = rig.committed();
        assert!(committed.check_invariants().is_ok());
        assert_eq!(committed.deck.len(), 2);
        assert_eq!(committed.mode, DrawMode::Exhaust);
    }

    #[tokio::test(start_paused = true)]
    async fn test_busy_leaves_store_byte_for_byte() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A\nB", DrawMode::Exhaust).await.unwrap();

        hold_lease(&rig, "stuck-tab", T0);
        let record_before = rig.store.get(STATE_KEY).unwrap();
        let lease_before = rig.store.get(LEASE_KEY).unwrap();
        let mut sub = rig.watch();

        let err = control.trigger_draw(1).await.unwrap_err();

        assert!(matches!(err, ControlError::Busy { .. }));
        assert!(err.is_retryable());
        assert_eq!(rig.store.get(STATE_KEY).unwrap(), record_before);
        assert_eq!(rig.store.get(LEASE_KEY).unwrap(), lease_before);
        assert!(sub.drain().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_lease_is_taken_over() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A\nB", DrawMode::Exhaust).await.unwrap();

        hold_lease(&rig, "crashed-tab", T0);
        rig.clock.advance(5_000);

        let report = control.trigger_draw(1).await.unwrap();

        assert!(matches!(report, DrawReport::Spun(_)));
        assert!(rig.store.get(LEASE_KEY).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_foreign_lease_outlives_busy_then_frees() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A", DrawMode::Loop).await.unwrap();
        hold_lease(&rig, "slow-tab", T0);

        assert!(control.reset_game(true).await.is_err());

        rig.store.delete(LEASE_KEY).unwrap();
        control.reset_game(true).await.unwrap();
        assert!(rig.committed().used_items.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replica_tracks_racing_writer() {
        let rig = Rig::new();
        let mut writer = rig.control("writer");
        let mut replica = rig.control("replica");
        let mut feed = rig.bus.subscribe(replica.filter());

        writer.submit_deck("A\nB\nC", DrawMode::Exhaust).await.unwrap();
        for envelope in feed.drain().unwrap() {
            replica.handle_event(&envelope).unwrap();
        }
        for player in 1..=3 {
            writer.trigger_draw(player).await.unwrap();
        }
        for envelope in feed.drain().unwrap() {
            replica.handle_event(&envelope).unwrap();
        }

        assert_eq!(replica.state().used_items, rig.committed().used_items);
        assert_eq!(replica.status().remaining, 0);
        assert!(replica.status().exhausted);

        let mut sub = rig.watch();
        let DrawReport::Spun(spin) = replica.trigger_draw(4).await.unwrap() else {
            panic!("expected a spin");
        };
        assert!(spin.is_miss);
        assert_eq!(spins(&mut sub).len(), 1);
    }
}

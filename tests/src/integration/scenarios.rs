//! # Game Scenarios
//!
//! End-to-end games driven through the control surface, including contexts
//! that share nothing but a record file on disk.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mk_01_state_store::{FileBackedKVStore, KeyValueStore, LoadReport, SharedStore, STATE_KEY};
    use mk_05_control_surface::{ControlError, DrawReport};
    use shared_types::{DrawMode, DrawState, PlayerId, SpinEvent, PLAYER_DRAW_CAP};
    use tempfile::tempdir;

    use crate::integration::support::{spins, Rig};

    async fn spin(control: &mut mk_05_control_surface::ControlSurface, player: u8) -> SpinEvent {
        tokio::time::advance(Duration::from_millis(500)).await;
        match control.trigger_draw(player).await {
            Ok(DrawReport::Spun(spin)) => spin,
            other => panic!("expected a spin, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaust_two_items_then_miss() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A\nB", DrawMode::Exhaust).await.unwrap();

        let first = spin(&mut control, 1).await;
        assert_eq!(rig.committed().used_items.len(), 1);

        let second = spin(&mut control, 1).await;
        assert_ne!(first.result_value, second.result_value);

        let third = spin(&mut control, 1).await;
        assert!(third.is_miss);
        assert_eq!(third.result_value, None);
        assert!(!third.reset_occurred);

        let committed = rig.committed();
        assert_eq!(committed.used_items.len(), 2);
        assert_eq!(control.status().to_string(), "[exhaust] 0 / 2 (Used: 2) Empty (Miss)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_single_item_cycles() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A", DrawMode::Loop).await.unwrap();

        let first = spin(&mut control, 2).await;
        assert_eq!(first.result_value.as_deref(), Some("A"));
        assert!(!first.reset_occurred);

        let second = spin(&mut control, 2).await;
        assert_eq!(second.result_value.as_deref(), Some("A"));
        assert!(second.reset_occurred);

        let committed = rig.committed();
        assert_eq!(committed.used_items.len(), 1);
        assert_eq!(committed.player_counts.get(PlayerId::new(2).unwrap()), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_deck_rejected_everywhere() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A\nB", DrawMode::Loop).await.unwrap();
        let before = rig.store.get(STATE_KEY).unwrap();
        let mut sub = rig.watch();

        let err = control.submit_deck("\n   \n\t\n", DrawMode::Exhaust).await.unwrap_err();

        assert!(matches!(err, ControlError::EmptyDeck));
        assert_eq!(rig.store.get(STATE_KEY).unwrap(), before);
        assert!(sub.drain().unwrap().is_empty());
        assert_eq!(control.selected_mode(), DrawMode::Loop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cap_stops_events_and_mutation() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A\nB\nC", DrawMode::Loop).await.unwrap();
        let mut sub = rig.watch();

        for _ in 0..PLAYER_DRAW_CAP {
            spin(&mut control, 1).await;
        }
        assert_eq!(spins(&mut sub).len(), PLAYER_DRAW_CAP as usize);
        let before = rig.store.get(STATE_KEY).unwrap();

        tokio::time::advance(Duration::from_millis(500)).await;
        let err = control.trigger_draw(1).await.unwrap_err();

        assert!(matches!(err, ControlError::PlayerCapped(_)));
        assert!(sub.drain().unwrap().is_empty());
        assert_eq!(rig.store.get(STATE_KEY).unwrap(), before);
        assert!(control.status().to_string().ends_with("1P:MAX"));

        // Other players are unaffected.
        spin(&mut control, 2).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_color_index_rotates_per_player() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A\nB\nC", DrawMode::Loop).await.unwrap();

        let colors: Vec<u8> = {
            let mut colors = Vec::new();
            for _ in 0..4 {
                colors.push(spin(&mut control, 3).await.color_index);
            }
            colors
        };
        assert_eq!(colors, vec![0, 1, 2, 3]);
        assert_eq!(spin(&mut control, 4).await.color_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mode_switch_applies_to_next_draw() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.submit_deck("A", DrawMode::Exhaust).await.unwrap();
        spin(&mut control, 1).await;
        assert!(spin(&mut control, 1).await.is_miss);

        control.select_mode(DrawMode::Loop);
        let cycled = spin(&mut control, 1).await;

        assert!(cycled.reset_occurred);
        assert_eq!(cycled.mode, DrawMode::Loop);
        assert_eq!(rig.committed().mode, DrawMode::Loop);
    }

    #[tokio::test(start_paused = true)]
    async fn test_contexts_share_record_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lottery.json");

        let first_store: SharedStore = Arc::new(FileBackedKVStore::new(&path).unwrap());
        let first = Rig::with_store(first_store);
        let mut operator = first.control("operator");
        operator.submit_deck("North\nSouth\nEast", DrawMode::Exhaust).await.unwrap();
        let drawn = spin(&mut operator, 1).await;

        let second_store: SharedStore = Arc::new(FileBackedKVStore::new(&path).unwrap());
        let second = Rig::with_store(second_store);
        let mut booth = second.control("booth");
        let LoadReport::Loaded(summary) = booth.open().unwrap() else {
            panic!("record should load");
        };
        assert!(summary.game_applied);
        assert_eq!(booth.selected_mode(), DrawMode::Exhaust);
        assert!(booth
            .state()
            .used_items
            .contains(drawn.result_value.as_deref().unwrap()));

        let other = spin(&mut booth, 2).await;
        assert_ne!(other.result_value, drawn.result_value);

        let mut reread = DrawState::new();
        mk_01_state_store::StateStore::new(Arc::new(FileBackedKVStore::new(&path).unwrap()))
            .load(&mut reread)
            .unwrap();
        assert_eq!(reread.used_items.len(), 2);
        assert!(reread.check_invariants().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_corrupt_record_file_recovers_on_submit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lottery.json");
        let store = FileBackedKVStore::new(&path).unwrap();
        store.put(STATE_KEY, "{ not json").unwrap();

        let rig = Rig::with_store(Arc::new(store));
        let mut control = rig.control("ctl");

        assert!(control.open().unwrap().is_corrupt());
        assert_eq!(control.state(), &DrawState::new());

        control.submit_deck("A", DrawMode::Loop).await.unwrap();
        assert_eq!(rig.committed().deck.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_truncated_data_file_does_not_block_play() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lottery.json");
        std::fs::write(&path, "{ truncated").unwrap();

        let rig = Rig::with_store(Arc::new(FileBackedKVStore::new(&path).unwrap()));
        let mut control = rig.control("ctl");

        let report = control.open().unwrap();
        assert!(matches!(report, LoadReport::Missing | LoadReport::Corrupt { .. }));
        assert_eq!(control.state(), &DrawState::new());

        control.submit_deck("A\nB", DrawMode::Exhaust).await.unwrap();
        let drawn = spin(&mut control, 1).await;
        assert!(!drawn.is_miss);

        let committed = rig.committed();
        assert_eq!(committed.deck.len(), 2);
        assert_eq!(committed.used_items.len(), 1);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_layout_survives_new_deck() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        control.update_layout(10.0, 20.0, 1.5).await.unwrap();

        control.submit_deck("A\nB", DrawMode::Loop).await.unwrap();

        let committed = rig.committed();
        assert_eq!(committed.layout.x, 10.0);
        assert_eq!(committed.layout.scale, 1.5);
    }
}

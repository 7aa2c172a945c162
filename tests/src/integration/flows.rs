//! # Control → Channel → Display Flows
//!
//! Every control command reaches the displays as the event kinds the
//! displays understand, and the displays end up showing what the store
//! committed.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mk_03_draw_engine::FixedRandomSource;
    use mk_04_display_gatekeeper::{DisplayAction, DisplaySurface};
    use mk_05_control_surface::DrawReport;
    use shared_bus::{EventFilter, LotteryEvent};
    use shared_types::{DrawMode, Layout, PlayerId, RemoteResetPolicy};
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use crate::integration::support::{spins, Rig};

    fn p(raw: u8) -> PlayerId {
        PlayerId::new(raw).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_renders_on_every_display() {
        let rig = Rig::new();
        let mut control = rig.control_with("ctl", Arc::new(FixedRandomSource::first()));
        let mut left = rig.display();
        let mut right = rig.display();

        control.submit_deck("Gold\nSilver", DrawMode::Exhaust).await.unwrap();
        control.trigger_draw(1).await.unwrap();

        for display in [&mut left, &mut right] {
            let actions = display.pump();
            assert_eq!(actions.len(), 2, "RESET_GAME then SPIN, SYNC_STATE ignored");
            assert_eq!(actions[0], DisplayAction::Cleared);
            let DisplayAction::Render(spin) = &actions[1] else {
                panic!("expected a render, got {:?}", actions[1]);
            };
            assert_eq!(spin.result.as_deref(), Some("Gold"));
            assert!(!spin.downgraded);
            assert_eq!(display.surface.history(p(1)).len(), 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_display_shows_what_store_committed() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        let mut display = rig.display();

        control.submit_deck("A\nB\nC\nD", DrawMode::Exhaust).await.unwrap();
        for player in 1..=4 {
            control.trigger_draw(player).await.unwrap();
        }
        display.pump();

        let committed = rig.committed();
        let mut shown = display.surface.shown_wins();
        shown.sort_unstable();
        let used: Vec<&str> = committed.used_items.iter().map(String::as_str).collect();
        assert_eq!(shown, used);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_displays() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        let mut display = rig.display();

        control.submit_deck("A\nB", DrawMode::Exhaust).await.unwrap();
        control.trigger_draw(2).await.unwrap();
        display.pump();
        assert_eq!(display.surface.gatekeeper().seen_count(), 1);

        control.reset_game(true).await.unwrap();

        assert_eq!(display.pump(), vec![DisplayAction::Cleared]);
        assert_eq!(display.surface.gatekeeper().seen_count(), 0);
        assert!(display.surface.history(p(2)).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_layout_and_reload_reach_display() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        let mut display = rig.display();

        control.update_layout(120.0, -40.0, 0.75).await.unwrap();
        let expected = Layout::sanitized(120.0, -40.0, 0.75);
        assert_eq!(display.pump(), vec![DisplayAction::Relayout(expected)]);
        assert_eq!(display.surface.layout(), expected);

        control.reload_display().await;

        assert_eq!(
            display.pump(),
            vec![DisplayAction::Reload, DisplayAction::Relayout(expected)]
        );
        assert_eq!(display.surface.layout(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reload_waits_before_relayout() {
        let rig = Rig::new();
        let control = rig.control("ctl");
        let mut sub = rig.watch();

        let started = tokio::time::Instant::now();
        control.reload_display().await;

        assert!(started.elapsed() >= Duration::from_millis(500));
        let kinds: Vec<_> = sub.drain().unwrap().iter().map(|e| e.event.kind()).collect();
        assert_eq!(kinds, vec!["RELOAD", "UPDATE_CONFIG"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_cycle_reset_reaches_display() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        let mut display = rig.display();

        control.submit_deck("Solo", DrawMode::Loop).await.unwrap();
        control.trigger_draw(1).await.unwrap();
        tokio::time::advance(Duration::from_millis(500)).await;
        let DrawReport::Spun(second) = control.trigger_draw(1).await.unwrap() else {
            panic!("expected a spin");
        };
        assert!(second.reset_occurred);

        let renders: Vec<_> = display
            .pump()
            .into_iter()
            .filter_map(|action| match action {
                DisplayAction::Render(spin) => Some(spin),
                _ => None,
            })
            .collect();
        assert_eq!(renders.len(), 2);
        assert!(renders.iter().all(|r| r.result.as_deref() == Some("Solo")));
        assert!(renders.iter().all(|r| !r.downgraded));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replayed_spin_renders_once() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        let mut sub = rig.watch();
        let mut display = DisplaySurface::new(RemoteResetPolicy::LoopOnly);

        control.submit_deck("A\nB", DrawMode::Exhaust).await.unwrap();
        control.trigger_draw(3).await.unwrap();
        let spin = spins(&mut sub).remove(0);
        let event = LotteryEvent::Spin(spin.clone());

        let first = display.apply(&event);
        let second = display.apply(&event);

        let (DisplayAction::Render(first), DisplayAction::Render(second)) = (first, second) else {
            panic!("expected two renders");
        };
        assert_eq!(first.result, spin.result_value);
        assert!(second.is_miss());
        assert!(second.downgraded);
    }

    #[tokio::test]
    async fn test_display_task_forwards_actions() {
        let rig = Rig::new();
        let mut control = rig.control("ctl");
        let (tx, mut rx) = mpsc::channel(16);
        let display = DisplaySurface::new(RemoteResetPolicy::default());
        let handle = tokio::spawn(display.run(rig.bus.subscribe(EventFilter::all()), tx));

        control.submit_deck("A", DrawMode::Loop).await.unwrap();

        let action = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timeout")
            .expect("action");
        assert_eq!(action, DisplayAction::Cleared);

        drop(rx);
        control.trigger_draw(1).await.unwrap();
        timeout(Duration::from_secs(1), handle)
            .await
            .expect("display task stops once the renderer is gone")
            .unwrap();
    }
}

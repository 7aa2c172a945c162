//! # Cross-Process Replication
//!
//! Contexts that each open their own store handle and their own event log
//! handle on the same files, the way separate processes do.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use mk_01_state_store::FileBackedKVStore;
    use mk_02_lease_lock::SystemTimeSource;
    use mk_03_draw_engine::ThreadRandomSource;
    use mk_04_display_gatekeeper::{DisplayAction, DisplaySurface};
    use mk_05_control_surface::{ControlConfig, ControlSurface, DrawReport};
    use shared_bus::{ContextId, EventFilter, FileEventLog};
    use shared_types::{DrawMode, RemoteResetPolicy};
    use tempfile::tempdir;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    /// One context: its own store handle, log handle and tail task.
    struct Context {
        log: Arc<FileEventLog>,
        control: ControlSurface,
        _tail: JoinHandle<()>,
    }

    fn context(name: &str, data: &Path, events: &Path) -> Context {
        let log = Arc::new(
            FileEventLog::open_with(events, Duration::from_millis(5), 1024 * 1024).unwrap(),
        );
        let tail = log.spawn_tail();
        let config = ControlConfig {
            context_id: ContextId::named(name),
            ..ControlConfig::default()
        };
        let control = ControlSurface::new(
            config,
            Arc::new(FileBackedKVStore::new(data).unwrap()),
            log.clone(),
            Arc::new(SystemTimeSource),
            Arc::new(ThreadRandomSource),
        );
        Context {
            log,
            control,
            _tail: tail,
        }
    }

    #[tokio::test]
    async fn test_display_renders_draw_from_other_context() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("lottery.json");
        let events = dir.path().join("lottery.events");

        let booth = context("booth", &data, &events);
        let mut operator = context("operator", &data, &events);

        let (tx, mut actions) = mpsc::channel(16);
        tokio::spawn(
            DisplaySurface::new(RemoteResetPolicy::default())
                .run(booth.log.subscribe(DisplaySurface::filter()), tx),
        );

        operator
            .control
            .submit_deck("North\nSouth", DrawMode::Exhaust)
            .await
            .unwrap();
        let DrawReport::Spun(spin) = operator.control.trigger_draw(1).await.unwrap() else {
            panic!("expected a spin");
        };

        let rendered = timeout(WAIT, async {
            loop {
                match actions.recv().await {
                    Some(DisplayAction::Render(rendered)) => break rendered,
                    Some(_) => continue,
                    None => panic!("display stopped"),
                }
            }
        })
        .await
        .expect("booth display rendered the operator's draw");

        assert_eq!(rendered.result, spin.result_value);
        assert_eq!(rendered.slot, 0);
    }

    #[tokio::test]
    async fn test_control_surface_reconciles_other_context() {
        let dir = tempdir().unwrap();
        let data = dir.path().join("lottery.json");
        let events = dir.path().join("lottery.events");

        let mut booth = context("booth", &data, &events);
        let mut operator = context("operator", &data, &events);
        let mut incoming = booth.log.subscribe(booth.control.filter());
        let mut echoes = operator.log.subscribe(EventFilter::all());

        operator
            .control
            .submit_deck("A\nB\nC", DrawMode::Loop)
            .await
            .unwrap();
        operator.control.trigger_draw(2).await.unwrap();

        timeout(WAIT, async {
            while booth.control.state().used_items.is_empty() {
                let envelope = incoming.recv().await.expect("log open");
                booth.control.handle_event(&envelope).unwrap();
            }
        })
        .await
        .expect("booth saw the operator's spin");

        assert_eq!(booth.control.state().deck.len(), 3);
        assert_eq!(booth.control.selected_mode(), DrawMode::Loop);

        // The operator got its own events once, from the local channel.
        let kinds: Vec<_> = echoes
            .drain()
            .unwrap()
            .iter()
            .map(|e| e.event.kind())
            .collect();
        assert_eq!(kinds, vec!["RESET_GAME", "SYNC_STATE", "SPIN"]);
    }
}

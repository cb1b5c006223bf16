//! Integration tests for the playback coordinator.
//!
//! These tests drive the coordinator through its public handle with a
//! scripted engine, firing readiness, failure and position notifications the
//! way a real streaming engine would.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use {
        parking_lot::Mutex,
        tokio::time::{Duration, sleep, timeout},
        url::Url,
    };

    use crate::{
        catalog::{Catalog, FallbackTable, Station, StationId},
        config::PlaybackConfig,
        playback::{
            coordinator::PlaybackCoordinator,
            engine::{AttemptEvents, StreamEngine},
            now_playing::{NowPlayingInfo, NowPlayingSurface, RemoteCommand, RemoteCommandStatus},
            session::PlaybackPhase::{Idle, Loading, Paused, Playing},
        },
        state::PlayerEvent,
    };

    // Default timeout in milliseconds for test async operations
    const TEST_TIMEOUT_MS: u64 = 1000;

    #[derive(Clone, Default)]
    struct ScriptedEngine {
        opens: Arc<Mutex<Vec<(Url, AttemptEvents)>>>,
        releases: Arc<Mutex<usize>>,
        volume: Arc<Mutex<Option<f32>>>,
    }

    impl ScriptedEngine {
        fn open_count(&self) -> usize {
            self.opens.lock().len()
        }

        fn opened_url(&self, index: usize) -> Url {
            self.opens.lock()[index].0.clone()
        }

        fn events(&self, index: usize) -> AttemptEvents {
            self.opens.lock()[index].1.clone()
        }

        fn latest(&self) -> AttemptEvents {
            self.opens.lock().last().map(|(_, e)| e.clone()).unwrap()
        }
    }

    impl StreamEngine for ScriptedEngine {
        fn open(&mut self, url: &Url, events: AttemptEvents) {
            self.opens.lock().push((url.clone(), events));
        }

        fn play(&mut self) {}

        fn pause(&mut self) {}

        fn release(&mut self) {
            *self.releases.lock() += 1;
        }

        fn set_volume(&mut self, volume: f32) {
            *self.volume.lock() = Some(volume);
        }
    }

    #[derive(Clone, Default)]
    struct SharedSurface {
        info: Arc<Mutex<Option<NowPlayingInfo>>>,
    }

    impl NowPlayingSurface for SharedSurface {
        fn publish(&mut self, info: &NowPlayingInfo) {
            *self.info.lock() = Some(info.clone());
        }

        fn clear(&mut self) {
            *self.info.lock() = None;
        }
    }

    struct Fixture {
        coordinator: PlaybackCoordinator,
        engine: ScriptedEngine,
        surface: SharedSurface,
    }

    fn fixture(fallbacks: FallbackTable) -> Fixture {
        let engine = ScriptedEngine::default();
        let surface = SharedSurface::default();
        let config = PlaybackConfig {
            initial_volume: 0.7,
            fallbacks,
        };
        let coordinator = PlaybackCoordinator::spawn(engine.clone(), surface.clone(), config);

        Fixture {
            coordinator,
            engine,
            surface,
        }
    }

    fn station(id: u32) -> Station {
        Catalog::builtin().get(StationId::new(id)).cloned().unwrap()
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        timeout(Duration::from_millis(TEST_TIMEOUT_MS), async {
            while !condition() {
                sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_play_station_until_ready() {
        let f = fixture(FallbackTable::new());
        let mut events = f.coordinator.subscribe();

        f.coordinator.play_station(station(1));
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Loading);
        assert!(!f.coordinator.is_playing());

        f.engine.latest().ready();
        f.coordinator.flush().await;
        assert!(f.coordinator.is_playing());
        assert_eq!(
            f.coordinator.current_station().map(|s| s.id()),
            Some(StationId::new(1))
        );

        assert_eq!(
            events.try_recv().unwrap(),
            PlayerEvent::StationChanged(Some(station(1)))
        );
        assert_eq!(events.try_recv().unwrap(), PlayerEvent::PhaseChanged(Loading));
        assert_eq!(events.try_recv().unwrap(), PlayerEvent::PhaseChanged(Playing));

        let info = f.surface.info.lock().clone().unwrap();
        assert_eq!(info.title, "MBC FM");
        assert!(info.is_live_stream);
        assert_eq!(info.playback_rate, 1.0);
    }

    #[tokio::test]
    async fn test_replaying_current_station_toggles() {
        let f = fixture(FallbackTable::new());
        f.coordinator.play_station(station(4));
        f.coordinator.flush().await;
        f.engine.latest().ready();

        f.coordinator.play_station(station(4));
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Paused);
        assert_eq!(f.engine.open_count(), 1);

        f.coordinator.play_station(station(4));
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Playing);
        assert_eq!(f.engine.open_count(), 1);
    }

    #[tokio::test]
    async fn test_double_tap_while_loading_pauses() {
        let f = fixture(FallbackTable::new());
        f.coordinator.play_station(station(11));
        f.coordinator.play_station(station(11));
        f.coordinator.flush().await;

        assert_eq!(f.coordinator.phase(), Paused);
        assert_eq!(f.engine.open_count(), 1);

        f.engine.latest().ready();
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Paused);
        assert!(!f.coordinator.is_playing());
    }

    #[tokio::test]
    async fn test_superseded_notifications_are_ignored() {
        let f = fixture(FallbackTable::builtin());
        f.coordinator.play_station(station(1));
        f.coordinator.flush().await;
        f.coordinator.play_station(station(5));
        f.coordinator.flush().await;
        assert_eq!(*f.engine.releases.lock(), 1);

        let stale = f.engine.events(0);
        stale.ready();
        stale.position(30.0);
        stale.failed("late failure");
        f.coordinator.flush().await;

        assert_eq!(f.coordinator.phase(), Loading);
        assert_eq!(
            f.coordinator.current_station().map(|s| s.id()),
            Some(StationId::new(5))
        );
        assert_eq!(f.coordinator.current_time(), 0.0);
        assert_eq!(f.engine.open_count(), 2);
        assert!(f.coordinator.last_failure().is_none());

        f.engine.events(1).ready();
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Playing);
    }

    #[tokio::test]
    async fn test_volume_is_clamped_and_applied() {
        let f = fixture(FallbackTable::new());
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.volume(), 0.7);

        f.coordinator.set_volume(1.4);
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.volume(), 1.0);
        assert_eq!(*f.engine.volume.lock(), Some(1.0));

        f.coordinator.set_volume(-0.2);
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.volume(), 0.0);
        assert_eq!(*f.engine.volume.lock(), Some(0.0));
    }

    #[tokio::test]
    async fn test_single_fallback_then_idle() {
        let f = fixture(FallbackTable::builtin());
        let fallback = FallbackTable::builtin()
            .lookup(StationId::new(2))
            .cloned()
            .unwrap();

        f.coordinator.play_station(station(2));
        f.coordinator.flush().await;
        f.engine.latest().failed("404");
        f.coordinator.flush().await;

        assert_eq!(f.engine.open_count(), 2);
        assert_eq!(f.engine.opened_url(1), fallback);
        assert_eq!(f.coordinator.phase(), Loading);
        assert!(!f.coordinator.last_failure().unwrap().is_terminal());

        f.engine.latest().failed("404 again");
        f.coordinator.flush().await;

        assert_eq!(f.coordinator.phase(), Idle);
        assert!(f.coordinator.current_station().is_none());
        assert!(f.coordinator.last_failure().unwrap().is_terminal());
        assert!(f.surface.info.lock().is_none());

        sleep(Duration::from_millis(20)).await;
        assert_eq!(f.engine.open_count(), 2);
    }

    #[tokio::test]
    async fn test_interruption_round_trip() {
        let f = fixture(FallbackTable::new());
        f.coordinator.play_station(station(9));
        f.coordinator.flush().await;
        f.engine.latest().ready();

        f.coordinator.interruption_began();
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Paused);
        assert_eq!(
            f.coordinator.current_station().map(|s| s.id()),
            Some(StationId::new(9))
        );

        f.coordinator.interruption_ended(true);
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Playing);
        assert_eq!(
            f.coordinator.current_station().map(|s| s.id()),
            Some(StationId::new(9))
        );
    }

    #[tokio::test]
    async fn test_stop_clears_everything() {
        let f = fixture(FallbackTable::new());
        f.coordinator.play_station(station(6));
        f.coordinator.flush().await;
        f.engine.latest().ready();
        f.engine.latest().position(12.0);
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.current_time(), 12.0);

        f.coordinator.stop();
        f.coordinator.flush().await;
        assert_eq!(f.coordinator.phase(), Idle);
        assert!(f.coordinator.current_station().is_none());
        assert!(f.surface.info.lock().is_none());
        assert_eq!(f.coordinator.current_time(), 0.0);
    }

    #[tokio::test]
    async fn test_remote_commands() {
        let f = fixture(FallbackTable::new());
        assert_eq!(
            f.coordinator.remote_command(RemoteCommand::Play).await,
            RemoteCommandStatus::NoActionableItem
        );

        f.coordinator.play_station(station(13));
        f.coordinator.flush().await;
        f.engine.latest().ready();

        assert_eq!(
            f.coordinator.remote_command(RemoteCommand::Pause).await,
            RemoteCommandStatus::Success
        );
        assert_eq!(f.coordinator.phase(), Paused);
        assert_eq!(f.surface.info.lock().clone().unwrap().playback_rate, 0.0);

        assert_eq!(
            f.coordinator.remote_command(RemoteCommand::Play).await,
            RemoteCommandStatus::Success
        );
        assert_eq!(f.coordinator.phase(), Playing);
        assert_eq!(f.engine.open_count(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_releases_session() {
        let f = fixture(FallbackTable::new());
        f.coordinator.play_station(station(5));
        f.coordinator.flush().await;
        f.engine.latest().ready();
        f.coordinator.flush().await;
        assert!(f.surface.info.lock().is_some());

        f.coordinator.shutdown();
        let surface = f.surface.clone();
        wait_until(move || surface.info.lock().is_none()).await;

        assert_eq!(*f.engine.releases.lock(), 1);
        assert_eq!(
            f.coordinator.remote_command(RemoteCommand::Play).await,
            RemoteCommandStatus::CommandFailed
        );
    }

    #[tokio::test]
    async fn test_clones_share_one_session() {
        let f = fixture(FallbackTable::new());
        let view = f.coordinator.clone();

        view.play_station(station(10));
        f.coordinator.flush().await;
        f.engine.latest().ready();
        f.coordinator.flush().await;

        assert!(view.is_playing());
        assert_eq!(
            f.coordinator.current_station().map(|s| s.id()),
            Some(StationId::new(10))
        );
    }
}

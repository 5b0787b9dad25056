//! Scripted sync service behind the `com.meego.msyncd` interface.
//!
//! Every `start_sync` plays back the same four status events on independent
//! one-shot timers; `abort_sync` emits a single `Aborted` event right away and
//! leaves any pending timers alone, so a subscriber can see both.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use mocksync_core::{ProfileId, ProfileSet, StatusEvent, SyncStatus};

use crate::config::ScheduleConfig;
use crate::schedule::Scheduler;

pub const ABORT_MESSAGE: &str = "aborted by the user";

/// Status and percent for each scripted step, in firing order.
pub const SYNC_SCRIPT: [(SyncStatus, i32); 4] = [
    (SyncStatus::Queued, 0),
    (SyncStatus::Running, 10),
    (SyncStatus::Progress, 20),
    (SyncStatus::Done, 100),
];

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// In-flight runs per profile. A profile is active while it has at least one run.
type ActiveSyncs = BTreeMap<ProfileId, BTreeSet<u64>>;

#[derive(Clone)]
pub struct MockSyncService {
    inner: Arc<Inner>,
}

struct Inner {
    profiles: ProfileSet,
    active: RwLock<ActiveSyncs>,
    next_run: AtomicU64,
    events: broadcast::Sender<StatusEvent>,
    schedule: ScheduleConfig,
    scheduler: Scheduler,
}

impl MockSyncService {
    pub fn new(profiles: ProfileSet, schedule: ScheduleConfig, scheduler: Scheduler) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                profiles,
                active: RwLock::new(BTreeMap::new()),
                next_run: AtomicU64::new(0),
                events,
                schedule,
                scheduler,
            }),
        }
    }

    /// New receiver for every status event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.inner.events.subscribe()
    }

    /// Emit `Aborted` for `profile_id` before returning. Pending timers keep firing.
    pub async fn abort_sync(&self, profile_id: ProfileId) {
        self.inner.active.write().await.remove(&profile_id);
        self.emit(StatusEvent::new(
            profile_id,
            SyncStatus::Aborted,
            ABORT_MESSAGE,
            0,
        ));
    }

    /// Schedule the four-step status script for `profile_id` and return immediately.
    pub async fn start_sync(&self, profile_id: ProfileId) -> bool {
        let run = self.inner.next_run.fetch_add(1, Ordering::Relaxed);
        self.inner
            .active
            .write()
            .await
            .entry(profile_id.clone())
            .or_default()
            .insert(run);

        tracing::debug!(
            profile_id = %profile_id,
            run,
            known_profile = self.is_known_profile(&profile_id),
            "scheduling sync script",
        );

        let delays = self.inner.schedule.delays();
        for (delay, (status, percent)) in delays.into_iter().zip(SYNC_SCRIPT) {
            let service = self.clone();
            let profile_id = profile_id.clone();
            self.inner.scheduler.schedule(delay, async move {
                if status == SyncStatus::Done {
                    service.finish_run(&profile_id, run).await;
                }
                service.emit(StatusEvent::new(profile_id, status, "", percent));
            });
        }
        true
    }

    /// Sorted snapshot of the active profile ids.
    pub async fn running_syncs(&self) -> Vec<ProfileId> {
        self.inner.active.read().await.keys().cloned().collect()
    }

    /// The first preloaded profile document. `_profile_id` is not looked up.
    pub fn sync_profile(&self, _profile_id: &ProfileId) -> &str {
        &self.inner.profiles.first().document
    }

    /// Whether `profile_id` names a loaded fixture. Unknown ids are still accepted everywhere.
    pub fn is_known_profile(&self, profile_id: &ProfileId) -> bool {
        self.inner.profiles.get(profile_id).is_some()
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.inner.profiles
    }

    async fn finish_run(&self, profile_id: &ProfileId, run: u64) {
        let mut active = self.inner.active.write().await;
        if let Some(runs) = active.get_mut(profile_id) {
            runs.remove(&run);
            if runs.is_empty() {
                active.remove(profile_id);
            }
        }
    }

    fn emit(&self, event: StatusEvent) {
        tracing::info!(
            profile_id = %event.profile_id,
            status = event.status.code(),
            message = %event.message,
            percent = event.percent,
            "sync status",
        );
        // No subscribers is fine: the signal simply has no listeners.
        let _ = self.inner.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::{sleep, Instant};

    use mocksync_core::BUILTIN_PROFILE_XML;

    fn service() -> MockSyncService {
        MockSyncService::new(
            ProfileSet::builtin(),
            ScheduleConfig::default(),
            Scheduler::current(),
        )
    }

    fn drain(rx: &mut broadcast::Receiver<StatusEvent>) -> Vec<StatusEvent> {
        let mut events = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(n)) => panic!("receiver lagged by {n}"),
            }
        }
        events
    }

    async fn collect_until_done(
        rx: &mut broadcast::Receiver<StatusEvent>,
        count: usize,
    ) -> Vec<(StatusEvent, Instant)> {
        let mut events = Vec::new();
        while events.len() < count {
            let event = rx.recv().await.expect("status event");
            events.push((event, Instant::now()));
        }
        events
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn start_sync_plays_four_events_in_order() {
        let service = service();
        let mut rx = service.subscribe();
        let started = Instant::now();

        assert!(service.start_sync(ProfileId::from("45")).await);
        assert!(drain(&mut rx).is_empty(), "start returns before any event");

        let events = collect_until_done(&mut rx, 4).await;
        let wire: Vec<_> = events.iter().map(|(e, _)| e.to_wire()).collect();
        assert_eq!(
            wire,
            vec![
                ("45".to_string(), 0, String::new(), 0),
                ("45".to_string(), 1, String::new(), 10),
                ("45".to_string(), 2, String::new(), 20),
                ("45".to_string(), 4, String::new(), 100),
            ]
        );

        let offsets: Vec<u128> = events
            .iter()
            .map(|(_, at)| at.duration_since(started).as_millis())
            .collect();
        assert_eq!(offsets, vec![200, 400, 600, 800]);

        sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty(), "exactly four events per start");
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn abort_emits_once_before_returning() {
        let service = service();
        let mut rx = service.subscribe();

        service.abort_sync(ProfileId::from("45")).await;

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![StatusEvent::new("45", SyncStatus::Aborted, ABORT_MESSAGE, 0)]
        );

        sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn abort_does_not_cancel_pending_script() {
        let service = service();
        let mut rx = service.subscribe();
        let id = ProfileId::from("45");

        service.start_sync(id.clone()).await;
        sleep(Duration::from_millis(300)).await;
        service.abort_sync(id.clone()).await;
        assert!(service.running_syncs().await.is_empty(), "abort clears the active entry");

        let events = collect_until_done(&mut rx, 5).await;
        let statuses: Vec<SyncStatus> = events.iter().map(|(e, _)| e.status).collect();
        assert_eq!(
            statuses,
            vec![
                SyncStatus::Queued,
                SyncStatus::Aborted,
                SyncStatus::Running,
                SyncStatus::Progress,
                SyncStatus::Done,
            ]
        );
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn running_syncs_tracks_start_until_done() {
        let service = service();
        let mut rx = service.subscribe();

        service.start_sync(ProfileId::from("45")).await;
        service.start_sync(ProfileId::from("45")).await;
        service.start_sync(ProfileId::from("12")).await;

        let running = service.running_syncs().await;
        assert_eq!(running, vec![ProfileId::from("12"), ProfileId::from("45")]);

        collect_until_done(&mut rx, 12).await;
        assert!(service.running_syncs().await.is_empty());
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn restart_after_abort_survives_stale_done() {
        let service = service();
        let id = ProfileId::from("45");

        service.start_sync(id.clone()).await;
        sleep(Duration::from_millis(100)).await;
        service.abort_sync(id.clone()).await;
        sleep(Duration::from_millis(100)).await;
        service.start_sync(id.clone()).await;

        // First run's Done fires at 800ms; the second run is still pending until 1000ms.
        sleep(Duration::from_millis(650)).await;
        assert_eq!(service.running_syncs().await, vec![id.clone()]);

        sleep(Duration::from_millis(200)).await;
        assert!(service.running_syncs().await.is_empty());
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn concurrent_starts_keep_per_profile_order() {
        let service = service();
        let mut rx = service.subscribe();

        service.start_sync(ProfileId::from("a")).await;
        sleep(Duration::from_millis(100)).await;
        service.start_sync(ProfileId::from("b")).await;

        let events = collect_until_done(&mut rx, 8).await;
        for id in ["a", "b"] {
            let percents: Vec<i32> = events
                .iter()
                .filter(|(e, _)| e.profile_id.0 == id)
                .map(|(e, _)| e.percent)
                .collect();
            assert_eq!(percents, vec![0, 10, 20, 100], "profile {id}");
        }
    }

    #[tokio::test]
    async fn sync_profile_ignores_requested_id() {
        let service = service();
        for id in ["45", "", "unknown", "test-profile"] {
            assert_eq!(service.sync_profile(&ProfileId::from(id)), BUILTIN_PROFILE_XML);
        }
    }

    #[tokio::test]
    async fn known_profile_uses_real_lookup_but_start_accepts_any_id() {
        let service = service();
        assert!(service.is_known_profile(&ProfileId::from("test-profile")));
        assert!(!service.is_known_profile(&ProfileId::from("45")));
        assert!(service.start_sync(ProfileId::from("45")).await);
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn custom_schedule_changes_offsets() {
        let schedule = ScheduleConfig {
            queued_ms: 10,
            running_ms: 20,
            progress_ms: 30,
            done_ms: 40,
        };
        let service = MockSyncService::new(ProfileSet::builtin(), schedule, Scheduler::current());
        let mut rx = service.subscribe();
        let started = Instant::now();

        service.start_sync(ProfileId::from("45")).await;
        let events = collect_until_done(&mut rx, 4).await;
        let (_, done_at) = events.last().expect("done event");
        assert_eq!(done_at.duration_since(started), Duration::from_millis(40));
    }
}

//! D-Bus binding for the `com.meego.msyncd` interface.
//!
//! Method and signal names keep the daemon's camelCase spelling so clients
//! written against the real service interoperate with the mock.

use zbus::{interface, proxy, SignalContext};

use mocksync_core::ProfileId;

use crate::service::MockSyncService;

/// Server side of the interface, served at [`crate::paths::OBJECT_PATH`].
pub struct SyncFwInterface {
    service: MockSyncService,
}

impl SyncFwInterface {
    pub fn new(service: MockSyncService) -> Self {
        Self { service }
    }
}

#[interface(name = "com.meego.msyncd")]
impl SyncFwInterface {
    #[zbus(name = "abortSync")]
    async fn abort_sync(&self, profile_id: String) {
        self.service.abort_sync(ProfileId(profile_id)).await;
    }

    #[zbus(name = "startSync")]
    async fn start_sync(&self, profile_id: String) -> bool {
        self.service.start_sync(ProfileId(profile_id)).await
    }

    #[zbus(name = "runningSyncs")]
    async fn running_syncs(&self) -> Vec<String> {
        self.service
            .running_syncs()
            .await
            .into_iter()
            .map(|id| id.0)
            .collect()
    }

    #[zbus(name = "syncProfile")]
    async fn sync_profile(&self, profile_id: String) -> String {
        self.service
            .sync_profile(&ProfileId(profile_id))
            .to_string()
    }

    /// `(profileId, status, message, statusDetails)`; signature `sisi`.
    #[zbus(signal, name = "syncStatus")]
    pub async fn sync_status(
        ctxt: &SignalContext<'_>,
        profile_id: &str,
        status: i32,
        message: &str,
        status_details: i32,
    ) -> zbus::Result<()>;
}

/// Client side of the interface.
#[proxy(
    interface = "com.meego.msyncd",
    default_service = "com.meego.msyncd",
    default_path = "/synchronizer",
    gen_blocking = false
)]
pub trait SyncFw {
    #[zbus(name = "abortSync")]
    fn abort_sync(&self, profile_id: &str) -> zbus::Result<()>;

    #[zbus(name = "startSync")]
    fn start_sync(&self, profile_id: &str) -> zbus::Result<bool>;

    #[zbus(name = "runningSyncs")]
    fn running_syncs(&self) -> zbus::Result<Vec<String>>;

    #[zbus(name = "syncProfile")]
    fn sync_profile(&self, profile_id: &str) -> zbus::Result<String>;

    #[zbus(signal, name = "syncStatus")]
    fn sync_status(
        &self,
        profile_id: String,
        status: i32,
        message: String,
        status_details: i32,
    ) -> zbus::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::SyncFwInterface;
    use zbus::object_server::Interface as _;

    use mocksync_core::{ProfileSet, BUILTIN_PROFILE_XML};

    use crate::config::ScheduleConfig;
    use crate::paths::INTERFACE_NAME;
    use crate::schedule::Scheduler;
    use crate::service::MockSyncService;

    fn interface() -> SyncFwInterface {
        SyncFwInterface::new(MockSyncService::new(
            ProfileSet::builtin(),
            ScheduleConfig::default(),
            Scheduler::current(),
        ))
    }

    #[test]
    fn interface_name_matches_const() {
        assert_eq!(INTERFACE_NAME, SyncFwInterface::name().as_str());
    }

    #[tokio::test(start_paused = true, flavor = "current_thread")]
    async fn methods_delegate_to_service() {
        let iface = interface();

        assert!(iface.start_sync("45".to_string()).await);
        assert!(iface.start_sync("45".to_string()).await);
        assert_eq!(iface.running_syncs().await, vec!["45".to_string()]);
        assert_eq!(iface.sync_profile("999".to_string()).await, BUILTIN_PROFILE_XML);

        iface.abort_sync("45".to_string()).await;
        assert!(iface.running_syncs().await.is_empty());
    }
}

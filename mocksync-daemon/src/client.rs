use futures::{Stream, StreamExt};
use zbus::fdo::DBusProxy;
use zbus::names::BusName;
use zbus::Connection;

use mocksync_core::{ProfileId, StatusEvent};

use crate::bus::SyncFwProxy;
use crate::error::DaemonError;
use crate::paths::BUS_NAME;

const SERVICE_UNKNOWN: &str = "org.freedesktop.DBus.Error.ServiceUnknown";

/// Thin client over the `com.meego.msyncd` proxy.
pub struct SyncClient {
    proxy: SyncFwProxy<'static>,
}

impl SyncClient {
    /// Connect to the session bus, or the system bus when `system_bus` is set.
    ///
    /// Fails with [`DaemonError::ServiceNotRunning`] when nothing owns the mock's bus name.
    pub async fn connect(system_bus: bool) -> Result<Self, DaemonError> {
        let connection = if system_bus {
            Connection::system().await?
        } else {
            Connection::session().await?
        };
        Self::with_connection(&connection).await
    }

    pub async fn with_connection(connection: &Connection) -> Result<Self, DaemonError> {
        if !service_has_owner(connection).await? {
            return Err(DaemonError::ServiceNotRunning {
                name: BUS_NAME.to_string(),
            });
        }
        let proxy = SyncFwProxy::new(connection).await?;
        Ok(Self { proxy })
    }

    pub async fn start_sync(&self, profile_id: &ProfileId) -> Result<bool, DaemonError> {
        self.proxy
            .start_sync(profile_id.as_ref())
            .await
            .map_err(map_call_err)
    }

    pub async fn abort_sync(&self, profile_id: &ProfileId) -> Result<(), DaemonError> {
        self.proxy
            .abort_sync(profile_id.as_ref())
            .await
            .map_err(map_call_err)
    }

    pub async fn running_syncs(&self) -> Result<Vec<ProfileId>, DaemonError> {
        let ids = self.proxy.running_syncs().await.map_err(map_call_err)?;
        Ok(ids.into_iter().map(ProfileId).collect())
    }

    pub async fn sync_profile(&self, profile_id: &ProfileId) -> Result<String, DaemonError> {
        self.proxy
            .sync_profile(profile_id.as_ref())
            .await
            .map_err(map_call_err)
    }

    /// Decoded `syncStatus` signals. Signals with an unknown status code are skipped.
    pub async fn status_events(&self) -> Result<impl Stream<Item = StatusEvent>, DaemonError> {
        let signals = self.proxy.receive_sync_status().await?;
        Ok(signals.filter_map(|signal| async move {
            let args = match signal.args() {
                Ok(args) => args,
                Err(err) => {
                    tracing::warn!(error = %err, "malformed syncStatus signal");
                    return None;
                }
            };
            let event = StatusEvent::from_wire(
                args.profile_id,
                args.status,
                args.message,
                args.status_details,
            );
            if event.is_none() {
                tracing::warn!(status = args.status, "unknown sync status code");
            }
            event
        }))
    }
}

async fn service_has_owner(connection: &Connection) -> Result<bool, DaemonError> {
    let dbus = DBusProxy::new(connection).await?;
    let name = BusName::try_from(BUS_NAME).map_err(zbus::Error::from)?;
    let owned = dbus
        .name_has_owner(name)
        .await
        .map_err(zbus::Error::from)?;
    Ok(owned)
}

fn map_call_err(err: zbus::Error) -> DaemonError {
    let unknown = match &err {
        zbus::Error::MethodError(name, _, _) => name.as_str() == SERVICE_UNKNOWN,
        zbus::Error::FDO(fdo) => matches!(**fdo, zbus::fdo::Error::ServiceUnknown(_)),
        _ => false,
    };
    if unknown {
        DaemonError::ServiceNotRunning {
            name: BUS_NAME.to_string(),
        }
    } else {
        DaemonError::Bus(err)
    }
}

use tokio::sync::broadcast::{self, error::RecvError};
use zbus::object_server::InterfaceRef;
use zbus::Connection;

use mocksync_core::StatusEvent;

use crate::bus::SyncFwInterface;
use crate::config::MockConfig;
use crate::error::{io_err, DaemonError};
use crate::paths::{BUS_NAME, OBJECT_PATH};
use crate::schedule::Scheduler;
use crate::service::MockSyncService;

/// Start the mock on a single-threaded runtime and block until it exits.
pub fn start_blocking(config: MockConfig) -> Result<(), DaemonError> {
    init_tracing();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(config))
}

/// Own the bus name, serve the interface, and forward status events as signals until Ctrl-C.
pub async fn run(config: MockConfig) -> Result<(), DaemonError> {
    config.schedule.validate()?;
    let profiles = config.profile_set()?;
    tracing::info!(profiles = profiles.len(), "loaded profile fixtures");

    let service = MockSyncService::new(profiles, config.schedule.clone(), Scheduler::current());
    // Subscribe before serving so no event can slip past the forwarder.
    let events = service.subscribe();
    let connection = serve(&service, config.system_bus).await?;
    let iface = connection
        .object_server()
        .interface::<_, SyncFwInterface>(OBJECT_PATH)
        .await?;

    let bus = if config.system_bus { "system" } else { "session" };
    tracing::info!(
        bus,
        name = BUS_NAME,
        path = OBJECT_PATH,
        "mock sync service ready",
    );

    let (shutdown_tx, _) = broadcast::channel::<()>(4);

    let forwarder_handle = {
        let shutdown = shutdown_tx.clone();
        let shutdown_rx = shutdown.subscribe();
        tokio::spawn(async move {
            let result = signal_forwarder_task(iface, events, shutdown_rx).await;
            let _ = shutdown.send(());
            result
        })
    };

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            let mut shutdown_rx = shutdown.subscribe();
            tokio::select! {
                _ = shutdown_rx.recv() => Ok(()),
                signal = tokio::signal::ctrl_c() => {
                    match signal {
                        Ok(()) => {
                            tracing::info!("received ctrl-c, shutting down mock sync service");
                            let _ = shutdown.send(());
                            Ok(())
                        }
                        Err(err) => Err(io_err("ctrl-c handler", err)),
                    }
                }
            }
        })
    };

    let (forwarder_result, signal_result) = tokio::join!(forwarder_handle, signal_handle);
    handle_join("signal_forwarder", forwarder_result)?;
    handle_join("signal_handler", signal_result)?;

    // Dropping the connection releases the bus name.
    drop(connection);
    Ok(())
}

async fn serve(service: &MockSyncService, system_bus: bool) -> Result<Connection, DaemonError> {
    let builder = if system_bus {
        zbus::connection::Builder::system()?
    } else {
        zbus::connection::Builder::session()?
    };
    let connection = builder
        .name(BUS_NAME)?
        .serve_at(OBJECT_PATH, SyncFwInterface::new(service.clone()))?
        .build()
        .await?;
    Ok(connection)
}

/// Re-emit every broadcast status event as a `syncStatus` signal.
async fn signal_forwarder_task(
    iface: InterfaceRef<SyncFwInterface>,
    mut events: broadcast::Receiver<StatusEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            received = events.recv() => match received {
                Ok(event) => {
                    let (profile_id, status, message, percent) = event.to_wire();
                    SyncFwInterface::sync_status(
                        iface.signal_context(),
                        &profile_id,
                        status,
                        &message,
                        percent,
                    )
                    .await?;
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "signal forwarder lagged; status events dropped");
                }
                Err(RecvError::Closed) => return Err(DaemonError::ChannelClosed("status events")),
            }
        }
    }
    Ok(())
}

fn handle_join(
    task: &'static str,
    result: Result<Result<(), DaemonError>, tokio::task::JoinError>,
) -> Result<(), DaemonError> {
    match result {
        Ok(inner) => inner,
        Err(source) => Err(DaemonError::TaskJoin { task, source }),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

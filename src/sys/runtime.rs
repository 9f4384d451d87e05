use crate::config;
use crate::events::AppEvent;
use crate::sys::server;
use async_channel::Sender;
use std::io;
use std::path::PathBuf;
use std::thread;

/// Runs the control socket and the config watcher on a single-threaded tokio
/// runtime in its own thread. Events reach the GUI through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>, config_path: PathBuf) -> io::Result<()> {
    thread::Builder::new()
        .name("pieview-services".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                tokio::join!(
                    server::run_server(tx.clone()),
                    config::run_async_watcher(tx, config_path),
                );
            });
            log::debug!("Background services stopped");
        })?;
    Ok(())
}

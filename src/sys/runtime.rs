use crate::events::AppEvent;
use async_channel::Sender;
use std::io;
use std::thread;
use tokio::runtime::Runtime;

/// Control socket and config watcher on their own Tokio runtime. They only
/// ever talk to the UI through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) -> io::Result<()> {
    let rt = Runtime::new()?;

    thread::Builder::new()
        .name("fortune-wheel-services".into())
        .spawn(move || {
            rt.block_on(async {
                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::sys::server::run_server(tx).await;
                    });
                }

                {
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        crate::config::run_async_watcher(tx).await;
                    });
                }

                std::future::pending::<()>().await;
            });
        })?;
    Ok(())
}

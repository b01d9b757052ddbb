use std::io;

use tokio::task::JoinHandle;

/// Wait on the HTTP and probe listeners until either one stops.
///
/// The first listener to fail, or to panic, ends the wait with its error; the
/// other task is left to be torn down with the runtime.
pub async fn run_until_failure(
    http: JoinHandle<io::Result<()>>,
    probe: JoinHandle<io::Result<()>>,
) -> io::Result<()> {
    tokio::try_join!(listener("http", http), listener("probe", probe))?;
    tracing::info!("Servers exited successfully");
    Ok(())
}

async fn listener(name: &'static str, handle: JoinHandle<io::Result<()>>) -> io::Result<()> {
    let result = match handle.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::from(e)),
    };
    if let Err(e) = &result {
        tracing::error!(server = name, error = %e, "Server error");
    }
    result
}

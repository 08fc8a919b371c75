pub mod assist;
pub mod config;
pub mod plan;
pub mod progress;
pub mod session;
pub mod subjects;
pub mod timer;

use std::future::Future;

/// Run `fut` to completion on a fresh single-threaded runtime.
pub fn block_on<F: Future>(fut: F) -> Result<F::Output, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    Ok(runtime.block_on(fut))
}

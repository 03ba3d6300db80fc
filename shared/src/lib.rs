pub mod config;
pub mod logging;
pub mod models;

/// Initialise tracing for the calling crate, honouring `RUST_LOG`.
#[macro_export]
macro_rules! init_tracing {
    () => {
        $crate::logging::init(env!("CARGO_CRATE_NAME"))
    };
}

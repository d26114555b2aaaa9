use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    prelude::*,
    EnvFilter,
};

const DEFAULT_FILTER: &str = "info,complaints_backend=debug,actix_web=info";

/// Logs sur stdout, filtrables avec RUST_LOG.
/// Les logs du crate `log` (middleware Logger d'actix) passent aussi par ici.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339());

    // Déjà initialisé (tests) : on ignore
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

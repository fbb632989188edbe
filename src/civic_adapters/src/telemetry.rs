use civic_core::{LoginObserver, Udo};

/// Audit trail of successful logins on the `civic::audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLoginObserver;

impl LoginObserver for TracingLoginObserver {
    fn on_login(&self, udo: &Udo) {
        tracing::info!(target: "civic::audit", uid = %udo.id, email = %udo.email, "Login");
    }
}

use crate::domain::udo::Udo;

/// Receives a notification for every successful local login.
///
/// Injected into the authenticator; used for audit trails and other side
/// effects that must not influence the login result.
pub trait LoginObserver: Send + Sync {
    fn on_login(&self, udo: &Udo);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoginObserver;

impl LoginObserver for NoopLoginObserver {
    fn on_login(&self, _udo: &Udo) {}
}

impl<T: LoginObserver + ?Sized> LoginObserver for std::sync::Arc<T> {
    fn on_login(&self, udo: &Udo) {
        (**self).on_login(udo)
    }
}

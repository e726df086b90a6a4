//! Shared HTTP adapter state.
//!
//! Handlers and extractors reach the domain only through these ports, so
//! tests can swap in mocks without any I/O.

use std::sync::Arc;

use crate::domain::ports::{Authenticator, UserRegistration};

/// Dependency bundle registered as `web::Data<HttpState>`.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn UserRegistration>,
    pub authenticator: Arc<dyn Authenticator>,
}

impl HttpState {
    pub fn new(
        registration: Arc<dyn UserRegistration>,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self {
            registration,
            authenticator,
        }
    }
}

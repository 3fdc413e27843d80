use std::{fmt, sync::Arc};

use rea_core::SessionStore;
use rea_core::clients::{
    ChsApiClient, CompanyProfileClient, EmailRegistryClient, TransactionClient,
};
use rea_core::validation::FormValidator;

use crate::infra::config::Config;
use crate::render::Renderer;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<dyn SessionStore>,
    pub profiles: Arc<dyn CompanyProfileClient>,
    pub emails: Arc<dyn EmailRegistryClient>,
    pub transactions: Arc<dyn TransactionClient>,
    pub renderer: Arc<Renderer>,
    pub validator: FormValidator,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// State backed by a single API client for all three remote services.
    pub fn new(
        config: Arc<Config>,
        sessions: Arc<dyn SessionStore>,
        api: Arc<ChsApiClient>,
        renderer: Arc<Renderer>,
    ) -> Self {
        Self {
            config,
            sessions,
            profiles: api.clone(),
            emails: api.clone(),
            transactions: api,
            renderer,
            validator: FormValidator::new(),
        }
    }
}

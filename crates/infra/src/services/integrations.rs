//! Calendar integration connect and disconnect

use std::sync::Arc;

use studyflow_core::IntegrationRepository;
use studyflow_domain::{CalendarIntegration, CalendarProvider, Result};
use tracing::{info, instrument};

pub struct IntegrationService {
    integrations: Arc<dyn IntegrationRepository>,
}

impl IntegrationService {
    pub fn new(integrations: Arc<dyn IntegrationRepository>) -> Self {
        Self { integrations }
    }

    /// Store or replace a user's credential for a provider.
    #[instrument(skip(self, integration), fields(user_id = %integration.user_id, provider = %integration.provider))]
    pub async fn connect(&self, integration: &CalendarIntegration) -> Result<()> {
        self.integrations.upsert(integration).await?;
        info!("calendar integration connected");
        Ok(())
    }

    /// Drop a user's credential for a provider. Already-mirrored events are
    /// left on the remote calendar.
    #[instrument(skip(self))]
    pub async fn disconnect(&self, user_id: &str, provider: CalendarProvider) -> Result<()> {
        self.integrations.delete(user_id, provider).await?;
        info!("calendar integration disconnected");
        Ok(())
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<CalendarIntegration>> {
        self.integrations.list_active(user_id).await
    }
}

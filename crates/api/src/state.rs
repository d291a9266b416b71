use std::sync::Arc;

use contest_hub_domain::services::telemetry::TelemetryGuard;
use contest_hub_gateway::{CheckoutGateway, IdentityProvider};
use contest_hub_storage::SeaOrmStorage;

#[derive(Clone)]
pub struct AppState {
    storage: SeaOrmStorage,
    gateway: Arc<dyn CheckoutGateway>,
    identity: Arc<dyn IdentityProvider>,
    telemetry: TelemetryGuard,
    client_origin: String,
}

impl AppState {
    pub fn new(
        storage: SeaOrmStorage,
        gateway: Arc<dyn CheckoutGateway>,
        identity: Arc<dyn IdentityProvider>,
        telemetry: TelemetryGuard,
        client_origin: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            gateway,
            identity,
            telemetry,
            client_origin: client_origin.into(),
        }
    }

    pub fn storage(&self) -> &SeaOrmStorage {
        &self.storage
    }

    pub fn gateway(&self) -> &dyn CheckoutGateway {
        self.gateway.as_ref()
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }

    /// Origin the checkout redirect URLs are built against.
    pub fn client_origin(&self) -> &str {
        &self.client_origin
    }
}

use rev_client::{DynRevClient, Result};
use rev_types::{DepositRequest, DepositResponse};
use tracing::info;

/// Forwards deposits to the Rev partner. Failures arrive already classified by
/// the client's error decoder.
#[derive(Clone)]
pub struct PartnerService {
    client: DynRevClient,
}

impl PartnerService {
    pub fn new(client: DynRevClient) -> Self {
        Self { client }
    }

    pub async fn deposit(&self, request: DepositRequest) -> Result<DepositResponse> {
        info!(request = ?request, "deposit request");
        let response = self.client.deposit(&request).await?;
        info!(response = ?response, "deposit response");
        Ok(response)
    }
}

impl std::fmt::Debug for PartnerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerService").finish_non_exhaustive()
    }
}

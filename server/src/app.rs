use anyhow::{Context, Result};
use rev_client::{ClientErrorDecoder, HttpRevClient, JsonDecoder, RevErrorHandler};
use rev_types::{EnumCodec, ResolverCache};
use std::sync::Arc;
use tracing::debug;

use crate::config::Config;
use crate::metrics;
use crate::server;
use crate::service::PartnerService;

#[derive(Debug, Clone)]
pub struct App {
    pub server: server::Server,
}

// construct a new instance of the rev application
pub fn new(config: Config) -> Result<App> {
    debug!(partner = ?config.partner, "create new application from config");

    let metrics = metrics::Metrics::new();

    // one resolver cache shared by every codec in the process
    let codec = EnumCodec::new(Arc::new(ResolverCache::new()));
    let json = JsonDecoder::new(codec.clone());
    let errors = ClientErrorDecoder::new(Arc::new(RevErrorHandler::new()), json.clone());

    let client = HttpRevClient::new(config.partner.url.clone(), &config.partner.token, json, errors)
        .context("fail create rev partner client")?;
    let service = PartnerService::new(Arc::new(client));

    let deps = server::Dependencies::new(metrics, service, codec);
    let server = server::Server::new(config.server.addr, deps);

    Ok(App { server })
}

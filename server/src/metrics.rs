use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};
use rev_types::ErrorCategory;
use std::sync::Arc;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct OutcomeLabel {
    pub outcome: String,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct CategoryLabel {
    pub category: String,
}

#[derive(Default, Debug, Clone)]
pub struct PartnerMetrics {
    pub deposits_total: Family<OutcomeLabel, Counter>,
    pub failures_total: Family<CategoryLabel, Counter>,
}

#[derive(Default, Debug, Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    pub partner: PartnerMetrics,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();
        let partner = PartnerMetrics::default();

        registry.register(
            "rev_deposits",
            "Total deposits forwarded to the partner",
            partner.deposits_total.clone(),
        );
        registry.register(
            "rev_partner_failures",
            "Total classified partner failures",
            partner.failures_total.clone(),
        );

        Metrics {
            registry: Arc::new(registry),
            partner,
        }
    }

    pub fn record_success(&self) {
        self.partner
            .deposits_total
            .get_or_create(&OutcomeLabel {
                outcome: OUTCOME_SUCCESS.to_string(),
            })
            .inc();
    }

    pub fn record_failure(&self, category: ErrorCategory) {
        self.partner
            .deposits_total
            .get_or_create(&OutcomeLabel {
                outcome: OUTCOME_FAILURE.to_string(),
            })
            .inc();
        self.partner
            .failures_total
            .get_or_create(&CategoryLabel {
                category: category.to_string(),
            })
            .inc();
    }
}

pub const OUTCOME_SUCCESS: &str = "success";
pub const OUTCOME_FAILURE: &str = "failure";

use serde::{Deserialize, Serialize};

/// One billing tier. `price_minor` is the monthly price in minor currency
/// units; `provider_price_ref` is the processor-side price identifier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price_minor: i64,
    pub interval: String,
    pub provider_price_ref: String,
    pub features: Vec<String>,
}

/// The plan catalog is built once at startup and handed to the use cases
/// that need it. Nothing reads plan data from globals.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
}

impl PlanCatalog {
    pub fn new(plans: Vec<Plan>) -> Self {
        Self { plans }
    }

    pub fn find(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == plan_id)
    }

    pub fn all(&self) -> &[Plan] {
        &self.plans
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new(vec![
            Plan {
                id: "basic".to_string(),
                name: "Basic".to_string(),
                price_minor: 4900,
                interval: "month".to_string(),
                provider_price_ref: "price_basic_monthly".to_string(),
                features: vec![
                    "Up to 50 property listings".to_string(),
                    "Up to 100 client profiles".to_string(),
                    "Basic analytics".to_string(),
                ],
            },
            Plan {
                id: "professional".to_string(),
                name: "Professional".to_string(),
                price_minor: 9900,
                interval: "month".to_string(),
                provider_price_ref: "price_professional_monthly".to_string(),
                features: vec![
                    "Up to 200 property listings".to_string(),
                    "Up to 500 client profiles".to_string(),
                    "Advanced analytics".to_string(),
                    "Team collaboration".to_string(),
                ],
            },
            Plan {
                id: "enterprise".to_string(),
                name: "Enterprise".to_string(),
                price_minor: 29900,
                interval: "month".to_string(),
                provider_price_ref: "price_enterprise_monthly".to_string(),
                features: vec![
                    "Unlimited property listings".to_string(),
                    "Unlimited client profiles".to_string(),
                    "Custom analytics".to_string(),
                    "Dedicated account manager".to_string(),
                ],
            },
        ])
    }
}

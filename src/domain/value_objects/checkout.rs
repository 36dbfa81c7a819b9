use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentModel {
    pub plan: String,
    pub email: String,
    pub company_name: String,
}

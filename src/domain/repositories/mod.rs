pub mod activities;
pub mod clients;
pub mod companies;
pub mod payment_provider_customers;
pub mod properties;
pub mod roles;
pub mod subscriptions;
pub mod users;

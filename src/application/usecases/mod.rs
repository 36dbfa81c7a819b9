pub mod activity_tracking;
pub mod authentication;
pub mod checkout;
pub mod clients;
pub mod dashboard;
pub mod properties;
pub mod provisioning;
pub mod role_seeding;
pub mod subscriptions;

pub mod activity_types;
pub mod client_types;
pub mod company_statuses;
pub mod property_statuses;
pub mod subscription_statuses;
pub mod user_roles;
pub mod user_statuses;

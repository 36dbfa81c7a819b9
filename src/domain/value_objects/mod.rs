pub mod checkout;
pub mod dashboard;
pub mod enums;
pub mod iam;
pub mod plans;
pub mod records;
pub mod registration;
pub mod subscriptions;

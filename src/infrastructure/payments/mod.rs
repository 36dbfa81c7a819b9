pub mod paystack_client;
pub mod stripe_client;

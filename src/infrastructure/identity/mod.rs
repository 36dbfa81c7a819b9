pub mod gotrue_client;

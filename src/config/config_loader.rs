use anyhow::Result;

use super::config_model::{Database, DotEnvyConfig, Identity, Paystack, Server, Stripe};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .expect("SERVER_PORT is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let identity = Identity {
        base_url: std::env::var("IDENTITY_BASE_URL").expect("IDENTITY_BASE_URL is invalid"),
        api_key: std::env::var("IDENTITY_API_KEY").expect("IDENTITY_API_KEY is invalid"),
        jwt_secret: std::env::var("IDENTITY_JWT_SECRET").expect("IDENTITY_JWT_SECRET is invalid"),
    };

    let stripe = Stripe {
        secret_key: std::env::var("STRIPE_SECRET_KEY").expect("STRIPE_SECRET_KEY is invalid"),
        webhook_secret: std::env::var("STRIPE_WEBHOOK_SECRET")
            .expect("STRIPE_WEBHOOK_SECRET is invalid"),
    };

    let paystack = Paystack {
        secret_key: std::env::var("PAYSTACK_SECRET_KEY").expect("PAYSTACK_SECRET_KEY is invalid"),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        identity,
        stripe,
        paystack,
    })
}

pub fn get_identity_jwt_secret() -> Result<String> {
    dotenvy::dotenv().ok();

    Ok(std::env::var("IDENTITY_JWT_SECRET").expect("IDENTITY_JWT_SECRET is invalid"))
}

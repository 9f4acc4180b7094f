use anyhow::{Ok, Result};

use super::config_model::DotEnvyConfig;

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = super::config_model::Server {
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

    let database = super::config_model::Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    };

    let payment_gateway = super::config_model::PaymentGateway {
        base_url: std::env::var("PAYMENT_GATEWAY_URL").expect("PAYMENT_GATEWAY_URL is invalid"),
        return_url: std::env::var("PAYMENT_RETURN_URL").expect("PAYMENT_RETURN_URL is invalid"),
        timeout_secs: std::env::var("PAYMENT_GATEWAY_TIMEOUT")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?,
        expire_minutes: std::env::var("PAYMENT_EXPIRE_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()?,
    };

    let sweep = super::config_model::Sweep {
        hour: std::env::var("SWEEP_HOUR")
            .unwrap_or_else(|_| "0".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig {
        server,
        database,
        payment_gateway,
        sweep,
    })
}

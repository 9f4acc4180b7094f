#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub payment_gateway: PaymentGateway,
    pub sweep: Sweep,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PaymentGateway {
    pub base_url: String,
    pub return_url: String,
    pub timeout_secs: u64,
    pub expire_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Sweep {
    pub hour: u32,
}

use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

pub static SHARED_CLIENT: Lazy<Client> = Lazy::new(|| create_base_client(60));

fn create_base_client(timeout_secs: u64) -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(20))
        .pool_max_idle_per_host(16)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(crate::constants::USER_AGENT.as_str())
        .build()
        .unwrap_or_else(|_| Client::new())
}

pub fn get_client() -> Client {
    SHARED_CLIENT.clone()
}

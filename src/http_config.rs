//! HTTP client configuration
//!
//! Timeouts and headers for the Outlook on the web service endpoint.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

use crate::config::{APP_NAME, APP_VERSION};
use crate::error::AppResult;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    pub user_agent: String,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment
    pub system_proxy: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(45),
            user_agent: format!("{}/{}", APP_NAME, APP_VERSION),
            system_proxy: true,
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reminder downloads cover a month of meetings and can be slow.
    pub fn outlook_api() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(60),
            ..Self::default()
        }
    }

    /// Token checks run while the login browser waits, so fail fast.
    pub fn token_check() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            ..Self::default()
        }
    }

    /// Connects directly, ignoring proxy variables.
    pub fn without_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }

    pub fn build_client(&self) -> AppResult<Client> {
        let mut builder = ClientBuilder::new()
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2);
        if !self.system_proxy {
            builder = builder.no_proxy();
        }
        Ok(builder.build()?)
    }
}

pub mod logging;

use nlq_adapters::http::{HttpClientError, HttpGraphQueryApi};
use nlq_core::config::AppConfig;

pub fn http_api(config: &AppConfig) -> Result<HttpGraphQueryApi, HttpClientError> {
    HttpGraphQueryApi::new(&config.backend_url, config.request_timeout())
}

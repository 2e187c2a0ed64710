// Not every test binary uses every helper
#![allow(dead_code)]

pub mod wiremock_helpers;

use statementfinder::config::{AppConfig, FilesConfig, HttpConfig};

/// Build an AppConfig suitable for tests: short timeout, standard hop limit,
/// file locations pointing wherever the test wants them.
pub fn test_config(data_dir: &str, input_file: &str, output_file: &str) -> AppConfig {
    AppConfig {
        http: test_http_config(),
        files: FilesConfig {
            data_dir: data_dir.to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.to_string(),
        },
    }
}

pub fn test_http_config() -> HttpConfig {
    HttpConfig {
        user_agent: "statementfinder test, Audit: audit@test.example".to_string(),
        request_timeout_secs: 5,
        max_redirect_hops: 10,
    }
}

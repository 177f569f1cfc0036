//! `Config::from_env` against the real process environment.

use std::env;

use dating_backend::config::{Config, ServiceGroup};
use serial_test::serial;

const VARS: [&str; 4] = ["JWT_SECRET", "APP_SERVICES", "BACKEND_PORT", "RATE_LIMIT_ENABLED"];

fn clear() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn missing_secret_is_fatal() {
    clear();
    let err = Config::from_env().unwrap_err();
    assert_eq!(err.code().as_str(), "CONFIGURATION_ERROR");
}

#[test]
#[serial]
fn environment_selects_services_and_port() {
    clear();
    env::set_var("JWT_SECRET", "integration-secret");
    env::set_var("APP_SERVICES", "chat");
    env::set_var("BACKEND_PORT", "4100");
    env::set_var("RATE_LIMIT_ENABLED", "false");

    let config = Config::from_env().unwrap();
    clear();

    assert_eq!(config.port, 4100);
    assert!(config.serves(ServiceGroup::Chat));
    assert!(!config.serves(ServiceGroup::Profile));
    assert!(!config.rate_limit_enabled);
    assert_eq!(config.service_name(), "chat");
}

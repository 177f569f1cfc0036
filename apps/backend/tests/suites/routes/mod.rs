mod chat;
mod config_env;
mod health;
mod profile;
mod rate_limiting;
mod services;

#![allow(dead_code)]

pub mod auth;
pub mod fake_provider;

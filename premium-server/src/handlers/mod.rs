//! HTTP handlers

pub mod health;
pub mod auth;
pub mod model;
pub mod predictions;
pub mod scenarios;

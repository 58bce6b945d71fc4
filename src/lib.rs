//! Belgian Real Estate Price Predictor
//!
//! Server-rendered form that collects property attributes, forwards them to
//! a remote price prediction API and shows the returned estimate.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;

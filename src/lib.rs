//! Hybrid study-program recommendation service
//!
//! Combines TF-IDF content similarity and SVD-based collaborative filtering
//! over pre-trained artifacts, exposed through an axum HTTP API.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

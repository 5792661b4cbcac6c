//! # IO Module
//!
//! Interface layer between HTTP clients and the domain services. The only
//! interface today is the axum REST API in [`rest`].

pub mod rest;

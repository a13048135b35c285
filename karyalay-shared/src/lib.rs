//! Dual-environment database configuration core for the Karyalay portal.
//!
//! [`config`] holds the operations; [`models`] the plain data they exchange.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod models;

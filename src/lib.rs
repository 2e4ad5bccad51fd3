//! Leaddesk: admin console backend for real-estate lead management.
//!
//! A JSON API over the sales MySQL database (project enquiries, customers,
//! follow-up notes) plus a small operator CLI.

pub mod auth;
pub mod cli;
pub mod config;
pub mod http;
pub mod leads;
pub mod storage;
pub mod types;

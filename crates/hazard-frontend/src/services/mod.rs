//! # Services Module
//!
//! Backend API client, description generation, and the poll loop.

pub mod api;
pub mod describe;
pub mod poller;

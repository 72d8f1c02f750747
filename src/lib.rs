//! Crawl-and-extract pipeline for the rostender.info tender search.
//!
//! The crate is split along the lifecycle of a crawl: `scrapers` fetches
//! and parses pages, `services` orchestrates a run and writes the table,
//! `jobs` tracks submitted crawls, and `server` exposes the job API.

pub mod cli;
pub mod config;
pub mod jobs;
pub mod models;
pub mod scrapers;
pub mod server;
pub mod services;

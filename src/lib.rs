pub mod account;
pub mod api;
pub mod config;
pub mod creds;
pub mod display;
pub mod eventlog;
pub mod proxy;
pub mod runner;
pub mod stats;
pub mod types;

/// ExeOS rewards API base URL (bearer-token authenticated, JSON in/out).
pub const API_BASE: &str = "https://api.exeos.network";

/// External public-IP lookup endpoint.
///
/// Fetched through each account's own client so the reported address reflects
/// that account's proxy egress.
pub const IP_LOOKUP_URL: &str = "https://api.ipify.org/?format=json";

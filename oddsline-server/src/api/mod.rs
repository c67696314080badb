//! HTTP API.
//!
//! - [`user`]: fixtures, bets, account and wallet routes plus the odds
//!   push socket, under `/api/v1`
//! - [`admin`]: odds publishing and transaction settlement, under
//!   `/api/v1/admin`

pub mod admin;
pub mod extractors;
pub mod user;

//! kwesta - Volunteer cash-reconciliation client for charity collection
//! events.
//!
//! Volunteers return donation boxes to the event staff, who count the
//! cash denomination by denomination, credit the counting crew and submit
//! a settlement record to the collection server. This crate is the client
//! side of that workflow, headless by design: any front end (the bundled
//! CLI, a mobile shell) drives the same state machine.
//!
//! # Modules
//!
//! - [`domain`] - Denominations, tallies, the counting crew, the outbound
//!   settlement record
//! - [`api`] - Typed gateway to the collection server ([`api::CollectionApi`]
//!   trait, [`api::HttpApi`] reqwest implementation)
//! - [`settlement`] - The settlement workflow state machine
//! - [`auth`] - Login/logout flows
//! - [`session`] - Session snapshot and the credential-store port
//! - [`qr`] - Login-hint payload parsing for scanned QR codes
//! - [`config`] - Configuration loading from TOML files
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use kwesta::api::HttpApi;
//! use kwesta::settlement::{FormInput, SettlementSession};
//! use kwesta::domain::Denomination;
//! # use kwesta::session::CredentialStore;
//! # fn store() -> Arc<dyn CredentialStore> { unimplemented!() }
//!
//! # async fn run() {
//! let gateway = Arc::new(HttpApi::default());
//! let mut session = SettlementSession::new(gateway, store());
//!
//! session.open(7).await;
//! session.edit(FormInput::Count(Denomination::Note10Zl, "2".into()));
//! println!("{}", session.summary().grand_total);
//! session.submit().await;
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod qr;
pub mod session;
pub mod settlement;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

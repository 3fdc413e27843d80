//! # REA Core
//!
//! Core library for the registered email address service: the multi-step flow
//! a company officer goes through to replace the email address Companies House
//! holds on file for a company.
//!
//! ## Overview
//!
//! - **Session**: typed view over the per-browser session bag plus the stores
//!   that persist it (Redis in production, in-memory for tests)
//! - **Clients**: company profile, email registry and transaction API clients
//! - **Validation**: form schema checks and email / company number syntax
//! - **Workflow**: one handler per page, each returning view data or a
//!   rejected view data carrying errors
//!
//! ## Architecture
//!
//! Handlers never touch HTTP types. They take a `&mut Session`, the submitted
//! form and whichever client traits they need, and the server crate turns the
//! outcome into a render or a redirect.

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Remote API clients and the traits the workflow depends on
pub mod clients;

/// Session keys, page titles and user-facing error messages
pub mod constants;

/// Date helpers used by confirmation pages
pub mod date;

pub mod error;

/// Domain models returned by the remote services
pub mod models;

/// Page routes shared between the workflow and the router
pub mod routes;

/// Typed session model and session stores
pub mod session;

/// Form validation
pub mod validation;

/// View data handed to the template renderer
pub mod view;

/// Page handlers for the email change flow
pub mod workflow;

pub use error::{Result, ServiceError};
pub use models::{ApiResource, CompanyProfile, RegisteredEmailAddress, Transaction, TransactionStatus};
pub use session::{ExtraData, Session, SessionStore};
pub use view::{ValidationErrors, ViewData};

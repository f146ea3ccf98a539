//! # Rivet
//!
//! Rivet is a defensive client adapter for the Zammad ticketing REST API.
//!
//! It turns a small set of semantic ticket operations (list, fetch, create,
//! update state/priority, post message, discover and download attachments)
//! into backend calls that tolerate the inconsistencies real Zammad
//! deployments exhibit: varying call conventions, varying pagination
//! behavior, and varying attachment representations.
//!
//! ## Features
//!
//! - **Read operations**: list tickets, fetch a ticket, fetch its articles,
//!   and build a consolidated detail view that degrades gracefully instead
//!   of failing
//! - **Write operations**: create tickets, update state and priority
//!   (including priority-name resolution), and post messages
//! - **Attachments**: multi-strategy metadata discovery and downloads with
//!   response-shape normalization to raw bytes
//! - **Call-shape probing**: write and discovery operations try an ordered
//!   list of plausible backend call conventions and accept the first that
//!   succeeds
//!
//! ## Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`config`] - Explicit configuration, loadable from environment variables
//! - [`error`] - The unified error taxonomy
//! - [`models`] - Loosely-typed records for backend data
//! - [`page`] - Paginated cursor draining
//! - [`probe`] - The ordered call-shape candidate executor
//! - [`zammad_client`] - The client and all public operations
//!
//! ## Usage
//!
//! ```ignore
//! use rivet::config::Config;
//! use rivet::models::MessageDraft;
//! use rivet::zammad_client::ZammadClient;
//!
//! async fn example() -> Result<(), rivet::error::RivetError> {
//!     let client = ZammadClient::new(Config::from_env()?);
//!
//!     for ticket in client.list_tickets().await? {
//!         println!("#{:?}: {}", ticket.id, ticket.display_title());
//!     }
//!
//!     client
//!         .send_message_to_ticket(42, MessageDraft::new("On it.").internal(true))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Rivet reads three connection settings from the environment:
//!
//! - `ZAMMAD_URL` (required): base URL of the Zammad instance
//! - `ZAMMAD_USERNAME` / `ZAMMAD_PASSWORD` (optional): basic-auth credentials
//! - `ZAMMAD_TIMEOUT_SECS` (optional): per-request timeout, default 30
//!
//! Every operation opens its own connection; the client holds no state
//! across calls, so operations are safe to invoke concurrently. Concurrent
//! downloads to the same destination path race last-writer-wins; use
//! distinct paths per concurrent download.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod page;
pub mod probe;
pub mod zammad_client;

//! # Pagecraft Gateway
//!
//! Persistence for page documents.
//!
//! ## Architecture
//!
//! ```text
//!   builder store ──▶ SaveCoordinator ──┐
//!                                       ▼
//!                               dyn PageGateway ◀── MemoryGateway / FileGateway
//!                                       ▲
//!   public route  ──▶ PublicPages ──────┘   (Published pages only)
//! ```
//!
//! Gateway calls are async. Errors are `GatewayError`; nothing on the public
//! side sees them; `PublicPages` reduces every outcome to found, not found
//! or unavailable.

mod error;
mod file;
mod gateway;
mod memory;
mod publication;
mod save;

pub use error::{GatewayError, GatewayResult};
pub use file::FileGateway;
pub use gateway::PageGateway;
pub use memory::MemoryGateway;
pub use publication::{PublicLookup, PublicPage, PublicPages};
pub use save::{save_key, SaveCoordinator};

//! Handler chain (event side).
//!
//! Decoded events of one leasing cycle arrive grouped by type. The chain
//! hands each group to the first handler owning that type.
//!
//! - `EventHandler`: one link, owns a set of types.
//! - `HandlerChain`: ordered, read-only links plus the routing loop.
//! - `ChainBuilder`: startup wiring with fail-fast ownership checks.
//! - `PostIndexHandler`, `UserIndexHandler`: search index maintenance.

pub mod builder;
pub mod handler;
pub mod post;
pub mod router;
pub mod user;

pub use self::builder::{ChainBuildError, ChainBuilder};
pub use self::router::{ChainReport, GroupFailure, HandlerChain};
pub use self::handler::{EventHandler, HandlerError};
pub use self::post::PostIndexHandler;
pub use self::user::UserIndexHandler;

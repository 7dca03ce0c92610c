//! spotter: relational, visibility-aware element location for browser UI tests
//!
//! Elements are described the way a person would point at them: by their
//! text, by where they sit relative to other elements ("under `Cheese`",
//! "right of `Name`", "inside `Order form`") and by whether they are actually
//! visible and enabled. Selectors remain available as a fallback.
//!
//! Resolution is split in two halves:
//!
//! - the [`resolver`] runs next to the page. In one synchronous pass it turns
//!   a positional constraint [`Chain`] into exactly one element, a confirmed
//!   absence, or a description of why neither holds. It works against any
//!   [`Document`] and speaks JSON so it can be run across a remote-execution
//!   boundary.
//! - the [`poller`] runs on the test side. It calls the resolver through a
//!   [`RemoteExecutor`] until it gets the same kind of answer twice, at least
//!   half a second apart, or a deadline passes.
//!
//! The [`actions`] module layers a fluent API (`under(..).see(..)`,
//! `click`, `long_press`) on top of both.
//!
//! # Examples
//!
//! ## Resolving against a captured page
//!
//! ```ignore
//! use spotter::{Chain, Position, ResolveOptions, ResolutionOutcome, resolve};
//! use spotter::dom::{SnapshotDocument, SnapshotNode};
//!
//! let page = SnapshotDocument::new(
//!     SnapshotNode::new("body").at(0.0, 0.0, 1280.0, 720.0).children([
//!         SnapshotNode::new("label").text("Cheese").at(0.0, 0.0, 120.0, 20.0),
//!         SnapshotNode::new("span").id("p").text("Provolone").at(0.0, 30.0, 120.0, 20.0),
//!     ]),
//! );
//! let chain = Chain::global("Cheese").then(Position::Under, "Provolone");
//! let outcome = resolve(&page, &chain, &ResolveOptions::default());
//! assert_eq!(outcome, ResolutionOutcome::Found(page.element_by_id("p").unwrap()));
//! ```
//!
//! ## Polling until stable
//!
//! ```ignore
//! use spotter::{Chain, DocumentExecutor, FinderConfig, ResolveOptions, poll_until_stable};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> spotter::Result<()> {
//!     let executor = DocumentExecutor::new(Arc::new(page));
//!     let resolved = poll_until_stable(
//!         &executor,
//!         &Chain::global("Provolone"),
//!         Duration::from_secs(6),
//!         "see(\"Provolone\")",
//!         &ResolveOptions::default(),
//!         &FinderConfig::default(),
//!     )
//!     .await?;
//!     println!("{:?}", resolved);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod chain;
pub mod dom;
mod error;
pub mod executor;
pub mod locator;
pub mod options;
pub mod outcome;
pub mod poller;
pub mod resolver;

// Re-export error types
pub use error::{Error, Result};

// Re-export the constraint model
pub use chain::{Chain, Position, PositionalConstraint};
pub use locator::{Locator, Strategy, by};

// Re-export options and configuration
pub use options::{
    AGONIZINGLY_SLOW_FIND_TIMEOUT, DEFAULT_DWELL, DEFAULT_POLL_INTERVAL, FIND_TIMEOUT, FinderConfig,
    ResolveOptions, ResolveOptionsBuilder, SLOW_FIND_TIMEOUT, Urgency,
};

// Re-export both halves of resolution
pub use dom::{Document, Rect};
pub use executor::{DocumentExecutor, RemoteExecutor, ResolveRequest};
pub use outcome::{ResolutionOutcome, Resolved, decode_wire};
pub use poller::poll_until_stable;
pub use resolver::{DisplayStatus, Resolver, ResolverConfig, ScrollPolicy, resolve, resolve_json};

// Re-export the action layer
pub use actions::{ActionContext, ChainedAction, Driver};

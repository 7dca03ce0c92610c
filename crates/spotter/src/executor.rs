// Remote execution boundary
//
// The poller never touches a page directly. It sends a `ResolveRequest` to a
// `RemoteExecutor`, which runs the resolver wherever the page lives (a browser
// context, a captured snapshot) and returns the typed outcome.

use crate::chain::{Chain, PositionalConstraint};
use crate::dom::Document;
use crate::error::Result;
use crate::options::ResolveOptions;
use crate::outcome::ResolutionOutcome;
use crate::resolver::{Resolver, ResolverConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One resolution request as it crosses the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub chain: Vec<PositionalConstraint>,
    #[serde(default)]
    pub options: ResolveOptions,
}

impl ResolveRequest {
    pub fn new(chain: &Chain, options: ResolveOptions) -> Self {
        Self {
            chain: chain.to_vec(),
            options,
        }
    }

    /// The `(locatorChainJSON, optionsJSON)` argument pair of the resolver
    pub fn to_json_args(&self) -> Result<(String, String)> {
        Ok((
            serde_json::to_string(&self.chain)?,
            serde_json::to_string(&self.options)?,
        ))
    }
}

/// Runs the resolver on the far side of a remote-execution boundary.
///
/// Implementations for a live browser ship the request to the page, invoke
/// the resolver there and decode its `element | true | string` answer with
/// [`crate::outcome::decode_wire`]. Transport failures are returned as `Err`;
/// the poller treats them as a failed attempt and retries.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
    /// Reference to a resolved element, valid on the driver side
    type Handle: Clone + Send + Sync + fmt::Debug;

    async fn execute(&self, request: &ResolveRequest) -> Result<ResolutionOutcome<Self::Handle>>;
}

#[async_trait]
impl<E: RemoteExecutor + ?Sized> RemoteExecutor for Arc<E> {
    type Handle = E::Handle;

    async fn execute(&self, request: &ResolveRequest) -> Result<ResolutionOutcome<Self::Handle>> {
        (**self).execute(request).await
    }
}

/// Executes requests in process against a [`Document`].
///
/// The request still travels as JSON strings, exactly as it would to a page,
/// so this executor exercises the full wire path.
pub struct DocumentExecutor<D: Document> {
    document: Arc<D>,
    config: ResolverConfig,
}

impl<D: Document> DocumentExecutor<D> {
    pub fn new(document: Arc<D>) -> Self {
        Self {
            document,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn document(&self) -> &Arc<D> {
        &self.document
    }
}

impl<D: Document> Clone for DocumentExecutor<D> {
    fn clone(&self) -> Self {
        Self {
            document: Arc::clone(&self.document),
            config: self.config.clone(),
        }
    }
}

#[async_trait]
impl<D> RemoteExecutor for DocumentExecutor<D>
where
    D: Document + Send + Sync,
    D::Node: Send + Sync,
{
    type Handle = D::Node;

    async fn execute(&self, request: &ResolveRequest) -> Result<ResolutionOutcome<D::Node>> {
        let (chain_json, options_json) = request.to_json_args()?;
        let outcome = Resolver::new(self.document.as_ref())
            .with_config(self.config.clone())
            .resolve_json(&chain_json, &options_json);
        tracing::trace!(chain = %chain_json, ?outcome, "Resolved in process");
        Ok(outcome)
    }
}

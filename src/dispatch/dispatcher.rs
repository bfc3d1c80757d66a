//! Request dispatch state machine.

use crate::balance::RotationTracker;
use crate::error::DispatchError;
use crate::observability::metrics;
use crate::resolver::BackendResolver;

use super::transport::ProxyTransport;

/// Orchestrates one request: resolve alias, pick endpoint, forward, and on
/// forwarding failure run a single re-resolve-and-retry cycle.
pub struct Dispatcher<R, T> {
    resolver: R,
    rotation: RotationTracker,
    transport: T,
}

impl<R, T> Dispatcher<R, T>
where
    R: BackendResolver,
    T: ProxyTransport,
{
    pub fn new(resolver: R, transport: T) -> Self {
        Self {
            resolver,
            rotation: RotationTracker::new(),
            transport,
        }
    }

    /// Handle one inbound request for an already-parsed alias.
    pub async fn handle(
        &self,
        alias: &str,
        request: &T::Request,
    ) -> Result<T::Response, DispatchError> {
        let backends = self.resolver.resolve(alias).await;
        if backends.is_empty() {
            return Err(DispatchError::AliasNotFound {
                alias: alias.to_string(),
            });
        }

        // Non-empty set checked above, so the pick cannot fail.
        let endpoint = self
            .rotation
            .pick_next(alias, &backends)
            .map_err(|_| DispatchError::AliasNotFound {
                alias: alias.to_string(),
            })?;

        match self.transport.forward(&endpoint, request).await {
            Ok(response) => {
                tracing::debug!(alias = %alias, backend = %endpoint, "Request forwarded");
                Ok(response)
            }
            Err(error) => {
                tracing::warn!(
                    alias = %alias,
                    backend = %endpoint,
                    error = %error,
                    "Forward failed, starting recovery"
                );
                self.recover(alias, request).await
            }
        }
    }

    /// The single bounded recovery cycle: re-resolve the alias, advance the
    /// rotation with a fresh pick, and forward once more.
    ///
    /// An alias whose backends vanished between the two resolutions reports
    /// the same as one that never existed.
    async fn recover(
        &self,
        alias: &str,
        request: &T::Request,
    ) -> Result<T::Response, DispatchError> {
        metrics::record_retry(alias);

        let backends = self.resolver.resolve(alias).await;
        if backends.is_empty() {
            return Err(DispatchError::AliasNotFound {
                alias: alias.to_string(),
            });
        }

        let endpoint = self
            .rotation
            .pick_next(alias, &backends)
            .map_err(|_| DispatchError::AliasNotFound {
                alias: alias.to_string(),
            })?;

        match self.transport.forward(&endpoint, request).await {
            Ok(response) => {
                tracing::debug!(alias = %alias, backend = %endpoint, "Recovery forward succeeded");
                Ok(response)
            }
            Err(error) => {
                tracing::error!(
                    alias = %alias,
                    backend = %endpoint,
                    error = %error,
                    "Recovery forward failed"
                );
                Err(DispatchError::UpstreamUnavailable {
                    alias: alias.to_string(),
                })
            }
        }
    }
}

//! Nameserver discovery and address resolution.
//!
//! Both lookups go through the system-configured resolver. Failures are
//! returned as typed errors; nothing here prints.

use std::sync::Arc;

use async_trait::async_trait;
use axfr_core::{AxfrError, Domain, Nameserver, ResolvedAddress, Result};
use hickory_resolver::TokioResolver;
use tracing::debug;

/// Source of NS and A answers for the transfer workflow.
#[async_trait]
pub trait NameserverDirectory: Send + Sync {
    /// NS records for `domain`, in the order the resolver returned them.
    async fn nameservers(&self, domain: &Domain) -> Result<Vec<Nameserver>>;

    /// First A record of `nameserver`.
    async fn resolve(&self, nameserver: &Nameserver) -> Result<ResolvedAddress>;
}

#[async_trait]
impl<T: NameserverDirectory + ?Sized> NameserverDirectory for Arc<T> {
    async fn nameservers(&self, domain: &Domain) -> Result<Vec<Nameserver>> {
        (**self).nameservers(domain).await
    }

    async fn resolve(&self, nameserver: &Nameserver) -> Result<ResolvedAddress> {
        (**self).resolve(nameserver).await
    }
}

/// [`NameserverDirectory`] backed by the system resolver
pub struct SystemResolver {
    resolver: TokioResolver,
}

impl SystemResolver {
    /// Create a resolver from the system configuration.
    ///
    /// # Errors
    ///
    /// Returns `AxfrError::ResolverSetup` if the system resolver
    /// configuration cannot be read.
    pub fn new() -> Result<Self> {
        let resolver = TokioResolver::builder_tokio()
            .map_err(|e| AxfrError::ResolverSetup {
                reason: e.to_string(),
            })?
            .build();
        Ok(Self::from_resolver(resolver))
    }

    /// Wrap an already configured resolver
    #[must_use]
    pub const fn from_resolver(resolver: TokioResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl NameserverDirectory for SystemResolver {
    async fn nameservers(&self, domain: &Domain) -> Result<Vec<Nameserver>> {
        debug!(domain = %domain, "looking up NS records");

        let response = self
            .resolver
            .ns_lookup(domain.as_str())
            .await
            .map_err(|e| AxfrError::NameserverLookup {
                domain: domain.clone(),
                reason: e.to_string(),
            })?;

        let nameservers: Vec<Nameserver> = response
            .iter()
            .map(|ns| Nameserver::new(ns.to_string()))
            .collect();

        debug!(domain = %domain, count = nameservers.len(), "NS lookup finished");
        Ok(nameservers)
    }

    async fn resolve(&self, nameserver: &Nameserver) -> Result<ResolvedAddress> {
        debug!(nameserver = %nameserver, "looking up A record");

        let response = self
            .resolver
            .ipv4_lookup(nameserver.as_str())
            .await
            .map_err(|e| AxfrError::AddressResolution {
                nameserver: nameserver.clone(),
                reason: e.to_string(),
            })?;

        // Only the first answer is used.
        response.iter().next().map_or_else(
            || {
                Err(AxfrError::NoAddress {
                    nameserver: nameserver.clone(),
                })
            },
            |a| Ok(ResolvedAddress::new(nameserver.clone(), a.0)),
        )
    }
}

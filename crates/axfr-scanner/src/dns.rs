use crate::scan::RESOLVE_DNS_TIMEOUT_MS;
use crate::{Error, Result};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, SocketAddr};
use std::{sync::Arc, time::Duration};
use tracing::debug;

pub type DnsResolver = Arc<TokioAsyncResolver>;

pub fn new_resolver() -> DnsResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_millis(RESOLVE_DNS_TIMEOUT_MS);
    debug!("DNS resolver options: {:?}", opts);
    let dns_resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), opts);

    Arc::new(dns_resolver)
}

/// Nameservers are given as hostnames or IP literals. Literals connect
/// directly, hostnames go through the resolver and the first address wins.
pub async fn nameserver_addr(
    dns_resolver: &DnsResolver,
    nameserver: &str,
    port: u16,
) -> Result<SocketAddr> {
    if let Ok(ip) = nameserver.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    let lookup = dns_resolver.lookup_ip(nameserver).await?;
    let ip = lookup
        .iter()
        .next()
        .ok_or_else(|| Error::NoNameserverAddress(nameserver.to_string()))?;
    debug!("{:12} - {} is {}", "NS ADDRESS", nameserver, ip);

    Ok(SocketAddr::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ip_literals_skip_the_resolver() {
        let dns_resolver = new_resolver();
        let addr = nameserver_addr(&dns_resolver, "192.0.2.53", 53).await.unwrap();
        assert_eq!(addr, "192.0.2.53:53".parse().unwrap());
    }

    #[tokio::test]
    async fn ipv6_literals_skip_the_resolver() {
        let dns_resolver = new_resolver();
        let addr = nameserver_addr(&dns_resolver, "2001:db8::53", 53).await.unwrap();
        assert_eq!(addr, "[2001:db8::53]:53".parse().unwrap());
    }
}

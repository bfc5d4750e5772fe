use crate::axfr::{TcpZoneTransfer, ZoneTransfer};
use crate::model::{self, TransferOutcome};
use crate::{dns, Result};
use std::collections::BTreeSet;
use tracing::{error, info, instrument};

// region:        --- Constants

// timeouts
pub const RESOLVE_DNS_TIMEOUT_MS: u64 = 4000;

// endregion:     --- Constants

// region:        --- Scan main function

#[tokio::main]
#[instrument(name = "scan", level = "info", skip_all)]
pub async fn scan(domain: &str, nameservers: &[String]) -> Result<BTreeSet<String>> {
    let transport = TcpZoneTransfer::new(dns::new_resolver());

    let outcomes = attempt_all(&transport, domain, nameservers).await;
    Ok(model::merge_subdomains(&outcomes))
}

// endregion:     --- Scan main function

// region:        --- Scan subfunctions

/// One zone-transfer attempt per nameserver, strictly in list order. A
/// failing nameserver never stops the loop; every attempt is recorded as an
/// outcome.
pub async fn attempt_all(
    transport: &dyn ZoneTransfer,
    domain: &str,
    nameservers: &[String],
) -> Vec<TransferOutcome> {
    let mut outcomes = Vec::with_capacity(nameservers.len());

    for nameserver in nameservers {
        let outcome = match transport.transfer(domain, nameserver).await {
            Ok(zone) => TransferOutcome::Transferred {
                nameserver: nameserver.clone(),
                subdomains: zone.subdomains(),
            },
            Err(err) => TransferOutcome::Failed {
                nameserver: nameserver.clone(),
                reason: err,
            },
        };

        match &outcome {
            TransferOutcome::Transferred {
                nameserver,
                subdomains,
            } => info!(
                "{:12} - {:?} ({} names)",
                "TRANSFERRED",
                nameserver,
                subdomains.len()
            ),
            TransferOutcome::Failed { nameserver, reason } => {
                error!("{:12} - {:?}: {}", "FAILED", nameserver, reason)
            }
        }

        outcomes.push(outcome);
    }

    outcomes
}

// endregion:     --- Scan subfunctions

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axfr::zone_apex;
    use crate::model::Zone;
    use crate::Error;
    use async_trait::async_trait;
    use hickory_resolver::proto::rr::rdata::A;
    use hickory_resolver::proto::rr::{Name, RData, Record};

    /// Scripted transport: each nameserver maps to a fixed outcome.
    struct ScriptedTransfer;

    fn zone_with(domain: &str, owners: &[&str]) -> Zone {
        let apex = zone_apex(domain).unwrap();
        let records = owners
            .iter()
            .map(|owner| {
                Record::from_rdata(
                    Name::from_utf8(owner).unwrap(),
                    300,
                    RData::A(A::new(198, 51, 100, 3)),
                )
            })
            .collect();
        Zone::new(apex, records)
    }

    #[async_trait]
    impl ZoneTransfer for ScriptedTransfer {
        async fn transfer(&self, domain: &str, nameserver: &str) -> Result<Zone> {
            match nameserver {
                "ns1.example.com" => Ok(zone_with(
                    domain,
                    &["www.example.com.", "mail.example.com."],
                )),
                "ns2.example.com" => Ok(zone_with(domain, &["www.example.com."])),
                _ => Err(Error::NoNameserverAddress(nameserver.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn failure_does_not_stop_the_loop() {
        let nameservers = vec![
            "refused.example.com".to_string(),
            "ns1.example.com".to_string(),
        ];
        let outcomes = attempt_all(&ScriptedTransfer, "example.com", &nameservers).await;

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            &outcomes[0],
            TransferOutcome::Failed { nameserver, .. } if nameserver == "refused.example.com"
        ));
        assert!(matches!(&outcomes[1], TransferOutcome::Transferred { .. }));

        assert_eq!(model::merge_subdomains(&outcomes).len(), 2);
    }

    #[tokio::test]
    async fn overlapping_names_collapse_to_one() {
        let nameservers = vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()];
        let outcomes = attempt_all(&ScriptedTransfer, "example.com", &nameservers).await;

        let merged = model::merge_subdomains(&outcomes);
        assert!(merged.contains("www.example.com"));
        assert_eq!(merged.len(), 2);
    }

    #[tokio::test]
    async fn all_failures_leave_the_set_empty() {
        let nameservers = vec!["a.invalid".to_string(), "b.invalid".to_string()];
        let outcomes = attempt_all(&ScriptedTransfer, "example.com", &nameservers).await;

        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome, TransferOutcome::Failed { .. })));
        assert!(model::merge_subdomains(&outcomes).is_empty());
    }
}

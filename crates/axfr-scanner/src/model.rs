use crate::{Error, Result};
use hickory_resolver::proto::rr::{Name, Record};
use std::collections::BTreeSet;
use std::io::Write;

// region:        --- Models

/// A transferred zone: the apex it was requested for plus the resource
/// records received in the answer stream.
pub struct Zone {
    apex: Name,
    records: Vec<Record>,
}

impl Zone {
    pub fn new(apex: Name, records: Vec<Record>) -> Self {
        Self { apex, records }
    }

    /// Owner names of the zone as fully-qualified strings, the apex itself
    /// excluded. Owners outside the zone are skipped and the trailing dot is
    /// trimmed.
    pub fn subdomains(&self) -> BTreeSet<String> {
        let apex = &self.apex;
        self.records
            .iter()
            .map(|record| record.name())
            .filter(|&owner| owner != apex && apex.zone_of(owner))
            .map(|owner| owner.to_utf8().trim_end_matches('.').to_string())
            .collect()
    }
}

/// Result of one zone-transfer attempt against one nameserver.
#[derive(Debug)]
pub enum TransferOutcome {
    Transferred {
        nameserver: String,
        subdomains: BTreeSet<String>,
    },
    Failed {
        nameserver: String,
        reason: Error,
    },
}

pub fn merge_subdomains(outcomes: &[TransferOutcome]) -> BTreeSet<String> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            TransferOutcome::Transferred { subdomains, .. } => Some(subdomains),
            TransferOutcome::Failed { .. } => None,
        })
        .flatten()
        .cloned()
        .collect()
}

// endregion:     --- Models

// region:        --- Reporting

pub fn write_report(out: &mut impl Write, subdomains: &BTreeSet<String>) -> Result<()> {
    if subdomains.is_empty() {
        writeln!(out, "No subdomains found.")?;
        return Ok(());
    }

    writeln!(out, "-------- Found Subdomains:")?;
    for subdomain in subdomains {
        writeln!(out, "{}", subdomain)?;
    }
    writeln!(out, "-------- Total unique subdomains: {}", subdomains.len())?;

    Ok(())
}

// endregion:     --- Reporting

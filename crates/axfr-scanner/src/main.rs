mod axfr;
mod dns;
mod error;
mod model;
mod scan;

pub use error::{Error, Result};

use clap::{Arg, ArgAction, Command};
use std::io;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about("Attempt DNS zone transfers (AXFR) against a list of nameservers")
        .disable_version_flag(true)
        .arg(
            Arg::new("domain")
                .short('d')
                .long("domain")
                .help("Target domain. Example: example.com")
                .value_name("DOMAIN")
                .required(true),
        )
        .arg(
            Arg::new("nameservers")
                .short('n')
                .long("nameservers")
                .help("Nameservers separated by a comma. Example: ns1.example.com,ns2.example.com")
                .value_name("NS1,NS2")
                .required(true),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .action(ArgAction::Version)
                .help("Print the version"),
        )
        .get_matches();

    init_tracing_subscriber();

    if let (Some(domain), Some(nameservers)) = (
        cli.get_one::<String>("domain"),
        cli.get_one::<String>("nameservers"),
    ) {
        let nameservers: Vec<String> = nameservers.split(',').map(String::from).collect();

        info!(
            "{:12} - {} against {} nameservers",
            "TARGET",
            domain,
            nameservers.len()
        );
        let subdomains = scan::scan(domain, &nameservers)?;

        model::write_report(&mut io::stdout(), &subdomains)?;
    }

    Ok(())
}

fn init_tracing_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_file(false)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Unable to set global subscriber");
}

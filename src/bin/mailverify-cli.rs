#[path = "mailverify-cli/args.rs"]
mod args;
#[path = "mailverify-cli/output.rs"]
mod output;

use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands, VerifyArgs};
use mailverify_lib::{VerificationVerdict, Verifier, VerifyContext, check_mx, is_valid_syntax};
use output::SyntaxRow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let invalid = match &cli.cmd {
        Some(Commands::Verify(verify)) => {
            let rows = run_verify(verify)?;
            output::write_reports(&rows, &cli)?;
            output::any_invalid(&rows)
        }
        Some(Commands::Mx {
            domain,
            dns_timeout_ms,
        }) => {
            let records = check_mx(domain, Duration::from_millis(*dns_timeout_ms))
                .or_else(|err| if err.is_no_records() { Ok(Vec::new()) } else { Err(err) })
                .with_context(|| format!("résolution MX de {domain}"))?;
            output::write_reports(&records, &cli)?;
            records.is_empty()
        }
        Some(Commands::Syntax { emails }) => {
            let rows = emails
                .iter()
                .map(|email| SyntaxRow {
                    email: email.clone(),
                    valid: is_valid_syntax(email),
                })
                .collect::<Vec<_>>();
            output::write_reports(&rows, &cli)?;
            output::any_invalid(&rows)
        }
        None => {
            Cli::clap_command().print_help()?;
            println!();
            return Ok(());
        }
    };

    // codes de sortie : 0 OK, 2 invalids, 1 fatal
    if invalid {
        std::process::exit(2);
    }
    Ok(())
}

fn run_verify(args: &VerifyArgs) -> Result<Vec<VerificationVerdict>> {
    let mut emails = args.emails.clone();
    if args.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            let email = line.trim();
            if !email.is_empty() {
                emails.push(email.to_string());
            }
        }
    }
    if emails.is_empty() {
        anyhow::bail!("aucune adresse: passez des EMAIL en argument ou --stdin");
    }

    let verifier = Verifier::new(args.verify_options());
    let mut rows = Vec::with_capacity(emails.len());
    for email in &emails {
        let verdict = match args.deadline() {
            Some(budget) => verifier
                .verify_with_context(email, &VerifyContext::with_timeout(budget))
                .with_context(|| format!("vérification de {email}"))?,
            None => verifier.verify(email),
        };
        rows.push(verdict);
    }
    Ok(rows)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

use anyhow::{Context, Result, bail};

use crate::args::Cli;
use mailverify_lib::{MxRecord, VerificationStatus, VerificationVerdict};

/// Une ligne de sortie, quelle que soit la sous-commande.
pub trait Report {
    fn human(&self) -> String;

    fn is_invalid(&self) -> bool;

    #[cfg(feature = "with-csv")]
    fn csv_record(&self) -> Vec<String>;
}

#[cfg(feature = "with-serde")]
pub trait Row: Report + serde::Serialize {}
#[cfg(feature = "with-serde")]
impl<T: Report + serde::Serialize> Row for T {}

#[cfg(not(feature = "with-serde"))]
pub trait Row: Report {}
#[cfg(not(feature = "with-serde"))]
impl<T: Report> Row for T {}

impl Report for VerificationVerdict {
    fn human(&self) -> String {
        let tag = match self.status {
            VerificationStatus::Valid => "[OK]     ",
            VerificationStatus::PotentiallyValid => "[MAYBE]  ",
            VerificationStatus::Invalid => "[INVALID]",
        };
        let mut line = format!("{tag} {} :: {}", self.email, self.message);
        let flags = [
            (self.is_catch_all, "catch-all"),
            (self.is_role_based, "role"),
            (self.is_spam_trap, "spam-trap"),
        ]
        .into_iter()
        .filter(|(flag, _)| *flag == Some(true))
        .map(|(_, name)| name)
        .collect::<Vec<_>>();
        if !flags.is_empty() {
            line.push_str(&format!(" [{}]", flags.join(", ")));
        }
        line
    }

    fn is_invalid(&self) -> bool {
        VerificationVerdict::is_invalid(self)
    }

    #[cfg(feature = "with-csv")]
    fn csv_record(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.status.to_string(),
            self.message.clone(),
            self.account.clone(),
            self.domain.clone(),
            bool_opt_str(self.is_catch_all).to_string(),
            bool_opt_str(self.is_role_based).to_string(),
            bool_opt_str(self.is_spam_trap).to_string(),
        ]
    }
}

impl Report for MxRecord {
    fn human(&self) -> String {
        format!("{:>5} {}", self.priority, self.exchange)
    }

    fn is_invalid(&self) -> bool {
        false
    }

    #[cfg(feature = "with-csv")]
    fn csv_record(&self) -> Vec<String> {
        vec![self.priority.to_string(), self.exchange.clone()]
    }
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub struct SyntaxRow {
    pub email: String,
    pub valid: bool,
}

impl Report for SyntaxRow {
    fn human(&self) -> String {
        if self.valid {
            format!("[OK]      {}", self.email)
        } else {
            format!("[INVALID] {} :: Invalid email format", self.email)
        }
    }

    fn is_invalid(&self) -> bool {
        !self.valid
    }

    #[cfg(feature = "with-csv")]
    fn csv_record(&self) -> Vec<String> {
        vec![self.email.clone(), self.valid.to_string()]
    }
}

pub fn any_invalid<T: Report>(rows: &[T]) -> bool {
    rows.iter().any(<T as Report>::is_invalid)
}

pub fn write_reports<T: Row>(rows: &[T], cli: &Cli) -> Result<()> {
    match cli.format.as_str() {
        "human" => write_human(rows, cli),
        "json" => write_json(rows, cli),
        "ndjson" => write_ndjson(rows, cli),
        "csv" => write_csv(rows, cli),
        other => bail!("unknown --format '{other}', use: human|json|ndjson|csv"),
    }
}

fn write_human<T: Row>(rows: &[T], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = String::new();
        for row in rows {
            buf.push_str(&row.human());
            buf.push('\n');
        }
        write_all_atomically(path, buf.as_bytes())?;
    } else {
        for row in rows {
            println!("{}", row.human());
        }
    }
    Ok(())
}

#[cfg(feature = "with-serde")]
fn write_json<T: Row>(rows: &[T], cli: &Cli) -> Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    if let Some(path) = &cli.out {
        write_all_atomically(path, s.as_bytes())?;
    } else {
        println!("{s}");
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json<T: Row>(_: &[T], _: &Cli) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-serde")]
fn write_ndjson<T: Row>(rows: &[T], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut buf = Vec::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            buf.extend_from_slice(line.as_bytes());
            buf.push(b'\n');
        }
        write_all_atomically(path, &buf)?;
    } else {
        for row in rows {
            println!("{}", serde_json::to_string(row)?);
        }
    }
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_ndjson<T: Row>(_: &[T], _: &Cli) -> Result<()> {
    bail!("format=ndjson nécessite la feature 'with-serde'")
}

#[cfg(feature = "with-csv")]
fn write_csv<T: Row>(rows: &[T], cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.out {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.write_record(row.csv_record())?;
        }
        let data = wtr.into_inner()?;
        write_all_atomically(path, &data)?;
    } else {
        let mut wtr = csv::Writer::from_writer(std::io::stdout());
        for row in rows {
            wtr.write_record(row.csv_record())?;
        }
        wtr.flush()?;
    }
    Ok(())
}

#[cfg(not(feature = "with-csv"))]
fn write_csv<T: Row>(_: &[T], _: &Cli) -> Result<()> {
    bail!("format=csv nécessite la feature 'with-csv'")
}

#[cfg(feature = "with-csv")]
fn bool_opt_str(opt: Option<bool>) -> &'static str {
    match opt {
        Some(true) => "true",
        Some(false) => "false",
        None => "",
    }
}

fn write_all_atomically(path: &str, bytes: &[u8]) -> Result<()> {
    use std::io::Write;

    let tmp = format!("{path}.tmp");
    {
        let mut f = std::fs::File::create(&tmp).with_context(|| format!("create {tmp}"))?;
        f.write_all(bytes)?;
        f.sync_all()?;
    }
    std::fs::rename(&tmp, path).with_context(|| format!("rename {tmp} -> {path}"))?;
    Ok(())
}

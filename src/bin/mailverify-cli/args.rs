use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use mailverify_lib::smtp_verify::{DEFAULT_HELO, DEFAULT_MAIL_FROM, DEFAULT_PORT};
use mailverify_lib::{ProbeOptions, VerifyOptions};

#[derive(Parser)]
#[command(name = "mailverify-cli", version, about = "Vérification de délivrabilité e-mail")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// format: human|json|ndjson|csv
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// verbosité des logs sur stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// pipeline complet : syntaxe, DNS, MX, sonde SMTP, catch-all, heuristiques
    Verify(VerifyArgs),
    /// liste les enregistrements MX d'un domaine, préféré en tête
    Mx {
        domain: String,
        /// timeout DNS par requête (ms)
        #[arg(long = "dns-timeout-ms", default_value_t = 2_000)]
        dns_timeout_ms: u64,
    },
    /// vérification du format, hors ligne
    Syntax {
        #[arg(required = true)]
        emails: Vec<String>,
    },
}

#[derive(Args)]
pub struct VerifyArgs {
    /// adresses à vérifier
    pub emails: Vec<String>,

    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    pub stdin: bool,

    /// port SMTP du serveur MX
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// nom annoncé avec HELO
    #[arg(long, default_value = DEFAULT_HELO)]
    pub helo: String,

    /// enveloppe MAIL FROM
    #[arg(long = "from", default_value = DEFAULT_MAIL_FROM)]
    pub mail_from: String,

    /// timeout de session SMTP (ms)
    #[arg(long = "timeout-ms", default_value_t = 500)]
    pub timeout_ms: u64,

    /// timeout DNS par requête (ms)
    #[arg(long = "dns-timeout-ms", default_value_t = 2_000)]
    pub dns_timeout_ms: u64,

    /// budget global par adresse (ms), illimité si absent
    #[arg(long = "deadline-ms")]
    pub deadline_ms: Option<u64>,

    /// lance les sondes cible et catch-all en parallèle
    #[arg(long)]
    pub concurrent: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn clap_command() -> clap::Command {
        <Self as clap::CommandFactory>::command()
    }
}

impl VerifyArgs {
    pub fn verify_options(&self) -> VerifyOptions {
        let probe = ProbeOptions {
            port: self.port,
            helo_name: self.helo.clone(),
            mail_from: self.mail_from.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        };
        VerifyOptions::default()
            .with_probe(probe)
            .with_dns_timeout(Duration::from_millis(self.dns_timeout_ms))
            .concurrent(self.concurrent)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Cli {
        <Cli as Parser>::try_parse_from(argv).expect("valid arguments")
    }

    #[test]
    fn verify_flags_map_to_options() {
        let cli = parse(&[
            "mailverify-cli",
            "verify",
            "jane.doe@example.com",
            "--port",
            "2525",
            "--helo",
            "probe.example.net",
            "--from",
            "bounce@example.net",
            "--timeout-ms",
            "750",
            "--dns-timeout-ms",
            "300",
            "--deadline-ms",
            "5000",
            "--concurrent",
        ]);
        let Some(Commands::Verify(args)) = cli.cmd else {
            panic!("expected the verify subcommand");
        };
        assert_eq!(args.emails, vec!["jane.doe@example.com".to_string()]);

        let options = args.verify_options();
        assert_eq!(options.probe.port, 2525);
        assert_eq!(options.probe.helo_name, "probe.example.net");
        assert_eq!(options.probe.mail_from, "bounce@example.net");
        assert_eq!(options.probe.timeout, Duration::from_millis(750));
        assert_eq!(options.dns_timeout, Duration::from_millis(300));
        assert!(options.concurrent_probes);
        assert_eq!(args.deadline(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn verify_defaults_match_the_library() {
        let cli = parse(&["mailverify-cli", "verify", "jane.doe@example.com"]);
        let Some(Commands::Verify(args)) = cli.cmd else {
            panic!("expected the verify subcommand");
        };
        assert_eq!(args.verify_options(), VerifyOptions::default());
        assert_eq!(args.deadline(), None);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = parse(&["mailverify-cli", "syntax", "a@b.co", "--format", "json", "-vv"]);
        assert_eq!(cli.format, "json");
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.cmd, Some(Commands::Syntax { .. })));
    }

    #[test]
    fn clap_definition_is_consistent() {
        Cli::clap_command().debug_assert();
    }
}

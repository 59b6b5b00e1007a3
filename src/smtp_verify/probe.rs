use std::time::Instant;

use crate::context::VerifyContext;

use super::error::ProbeError;
use super::options::ProbeOptions;
use super::session::SmtpSession;
use super::types::{ProbeOutcome, ProbeReport, ProbeStage, ProbeTarget, Transition};

/// Runs one bounded `HELO` / `MAIL FROM` / `RCPT TO` / `QUIT` dialog against
/// `target` and reports whether `recipient` was accepted.
///
/// Never fails: connection errors, malformed replies, peer closes, timeouts
/// and cancellation all resolve to a non-accepted [`ProbeOutcome`]. The
/// session deadline is `options.timeout` from now, clamped to the context
/// deadline.
pub fn probe_recipient(
    target: &ProbeTarget,
    recipient: &str,
    options: &ProbeOptions,
    ctx: &VerifyContext,
) -> ProbeReport {
    let started = Instant::now();
    let deadline = ctx.clamp(started + options.timeout());

    let (outcome, transcript) =
        match SmtpSession::connect(&target.exchange, &target.addrs, deadline, ctx) {
            Ok(mut session) => {
                let outcome = run_dialog(&mut session, recipient, options, ctx);
                (outcome, session.close())
            }
            Err(err) => (ProbeOutcome::from(err), Vec::new()),
        };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        ProbeOutcome::Accepted | ProbeOutcome::Rejected { .. } => {
            tracing::info!(
                exchange = %target.exchange,
                recipient,
                %outcome,
                elapsed_ms,
                "SMTP probe finished"
            );
        }
        _ => {
            tracing::warn!(
                exchange = %target.exchange,
                recipient,
                %outcome,
                elapsed_ms,
                "SMTP probe inconclusive"
            );
        }
    }

    ProbeReport::new(outcome, target.exchange.clone(), transcript)
}

fn run_dialog(
    session: &mut SmtpSession,
    recipient: &str,
    options: &ProbeOptions,
    ctx: &VerifyContext,
) -> ProbeOutcome {
    loop {
        let reply = match session.read_reply(ctx) {
            Ok(reply) => reply,
            Err(err) => return err.into(),
        };
        match session.stage.on_reply(&reply) {
            Transition::Advance { command, next } => {
                let line = options.render(command, recipient);
                if let Err(err) = session.send_command(&line, ctx) {
                    return err.into();
                }
                session.stage = next;
            }
            Transition::Finish(outcome) => {
                send_quit(session, ctx);
                session.stage = ProbeStage::Done;
                return outcome;
            }
        }
    }
}

/// The outcome is already decided; a failed `QUIT` changes nothing.
fn send_quit(session: &mut SmtpSession, ctx: &VerifyContext) {
    if let Err(err) = session.send_command("QUIT", ctx) {
        if !matches!(err, ProbeError::Closed) {
            tracing::debug!(error = %err, "QUIT not delivered");
        }
    }
}

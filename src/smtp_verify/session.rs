use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::{Duration, Instant};

use crate::context::{Interrupt, VerifyContext};

use super::error::ProbeError;
use super::types::{ProbeStage, SmtpReply};

/// Upper bound of a single blocking read, so cancellation is noticed quickly.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// A reply line longer than this is treated as garbage.
const MAX_LINE: usize = 4096;

/// One probe connection. Owns its socket; never reused across probes.
pub(crate) struct SmtpSession {
    host: String,
    stream: TcpStream,
    buffer: Vec<u8>,
    deadline: Instant,
    pub(crate) stage: ProbeStage,
    transcript: Vec<String>,
}

impl SmtpSession {
    /// Tries each address in turn until one connects or the deadline passes.
    pub(crate) fn connect(
        host: &str,
        addrs: &[SocketAddr],
        deadline: Instant,
        ctx: &VerifyContext,
    ) -> Result<Self, ProbeError> {
        let mut last_err = None;
        for addr in addrs {
            let remaining = remaining(deadline, ctx)?;
            tracing::debug!(host, %addr, "connecting");
            match TcpStream::connect_timeout(addr, remaining) {
                Ok(stream) => {
                    return Ok(Self {
                        host: host.to_string(),
                        stream,
                        buffer: Vec::new(),
                        deadline,
                        stage: ProbeStage::AwaitGreeting,
                        transcript: Vec::new(),
                    });
                }
                Err(err) => {
                    tracing::debug!(host, %addr, error = %err, "connect failed");
                    last_err = Some(ProbeError::connect(addr, err));
                }
            }
        }
        Err(last_err.unwrap_or_else(|| ProbeError::NoAddress {
            exchange: host.to_string(),
        }))
    }

    pub(crate) fn send_command(
        &mut self,
        command: &str,
        ctx: &VerifyContext,
    ) -> Result<(), ProbeError> {
        self.record("C", command);
        let remaining = remaining(self.deadline, ctx)?;
        self.stream
            .set_write_timeout(Some(remaining))
            .map_err(ProbeError::io)?;
        let mut line = command.as_bytes().to_vec();
        line.extend_from_slice(b"\r\n");
        self.stream.write_all(&line).map_err(ProbeError::io)?;
        self.stream.flush().map_err(ProbeError::io)
    }

    /// Reads one complete reply, folding `NNN-` continuation lines.
    pub(crate) fn read_reply(&mut self, ctx: &VerifyContext) -> Result<SmtpReply, ProbeError> {
        let mut code = None;
        let mut lines = Vec::new();
        loop {
            let line = self.read_line(ctx)?;
            self.record("S", &line);
            if line.len() < 3 || !line.is_char_boundary(3) {
                return Err(ProbeError::Protocol(format!("invalid reply: {line}")));
            }
            let parsed = line[..3]
                .parse::<u16>()
                .map_err(|_| ProbeError::Protocol(format!("invalid code in line: {line}")))?;
            match code {
                Some(existing) if existing != parsed => {
                    return Err(ProbeError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed),
            }
            let continuation = line.as_bytes().get(3) == Some(&b'-');
            lines.push(line.get(4..).unwrap_or_default().to_string());
            if !continuation {
                return Ok(SmtpReply {
                    code: parsed,
                    lines,
                });
            }
        }
    }

    fn read_line(&mut self, ctx: &VerifyContext) -> Result<String, ProbeError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }
            if self.buffer.len() > MAX_LINE {
                return Err(ProbeError::Protocol(format!(
                    "reply line exceeds {MAX_LINE} bytes"
                )));
            }

            let slice = remaining(self.deadline, ctx)?.min(POLL_INTERVAL);
            self.stream
                .set_read_timeout(Some(slice))
                .map_err(ProbeError::io)?;
            let mut chunk = [0u8; 512];
            match self.stream.read(&mut chunk) {
                Ok(0) => return Err(ProbeError::Closed),
                Ok(read) => self.buffer.extend_from_slice(&chunk[..read]),
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) if super::error::is_timeout(&err) => {}
                Err(err) => return Err(ProbeError::io(err)),
            }
        }
    }

    fn record(&mut self, direction: &str, message: &str) {
        tracing::debug!(host = %self.host, stage = ?self.stage, "{direction}: {message}");
        self.transcript
            .push(format!("[{}] {direction}: {message}", self.host));
    }

    /// Shuts the socket down and hands back the transcript.
    pub(crate) fn close(mut self) -> Vec<String> {
        self.stage = ProbeStage::Done;
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            tracing::trace!(host = %self.host, error = %err, "shutdown failed");
        }
        self.transcript
    }
}

/// Time left before `deadline`, or why there is none.
fn remaining(deadline: Instant, ctx: &VerifyContext) -> Result<Duration, ProbeError> {
    ctx.check().map_err(|interrupt| match interrupt {
        Interrupt::Cancelled => ProbeError::Cancelled,
        Interrupt::DeadlineExceeded => ProbeError::Timeout,
    })?;
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        Err(ProbeError::Timeout)
    } else {
        Ok(left)
    }
}

//! Reply lines written back to API clients.
//!
//! Every request yields exactly one [`Reply`], rendered as a single
//! `\n`-terminated line by [`ResponseWriter`].

use std::fmt;
use std::io::{self, Write};

use crate::device::BacklightStatus;

/// Greeting written once when a client connects.
pub const GREETING: &str = "version:1.2";

/// One reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// `status:<on|off|device error>`
    Status(BacklightStatus),
    /// `statusapi:busy` when any session holds the lock, else `statusapi:idle`.
    StatusApi {
        /// Whether the lock is held.
        busy: bool,
    },
    /// `profiles:<name>;<name>;...`
    Profiles(Vec<String>),
    /// `profile:<name>`
    Profile(String),
    /// `lock:success`
    LockSuccess,
    /// `lock:busy`
    LockBusy,
    /// `unlock:success`
    UnlockSuccess,
    /// `unlock:not locked`
    UnlockNotLocked,
    /// `ok`
    Ok,
    /// `error`
    Error,
    /// `busy`
    Busy,
    /// `not locked`
    NotLocked,
    /// `fail`
    Fail,
    /// `authorization required`
    AuthorizationRequired,
    /// `unknown command`
    UnknownCommand,
}

impl fmt::Display for Reply {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(formatter, "status:{status}"),
            Self::StatusApi { busy: true } => formatter.write_str("statusapi:busy"),
            Self::StatusApi { busy: false } => formatter.write_str("statusapi:idle"),
            Self::Profiles(names) => {
                formatter.write_str("profiles:")?;
                for name in names {
                    write!(formatter, "{name};")?;
                }
                Ok(())
            }
            Self::Profile(name) => write!(formatter, "profile:{name}"),
            Self::LockSuccess => formatter.write_str("lock:success"),
            Self::LockBusy => formatter.write_str("lock:busy"),
            Self::UnlockSuccess => formatter.write_str("unlock:success"),
            Self::UnlockNotLocked => formatter.write_str("unlock:not locked"),
            Self::Ok => formatter.write_str("ok"),
            Self::Error => formatter.write_str("error"),
            Self::Busy => formatter.write_str("busy"),
            Self::NotLocked => formatter.write_str("not locked"),
            Self::Fail => formatter.write_str("fail"),
            Self::AuthorizationRequired => formatter.write_str("authorization required"),
            Self::UnknownCommand => formatter.write_str("unknown command"),
        }
    }
}

/// Writes newline-framed reply lines to a stream.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Wraps an output stream.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes the connection greeting.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn write_greeting(&mut self) -> io::Result<()> {
        self.write_line(GREETING)
    }

    /// Writes one reply line.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn write_reply(&mut self, reply: &Reply) -> io::Result<()> {
        self.write_line(reply)
    }

    fn write_line(&mut self, line: impl fmt::Display) -> io::Result<()> {
        writeln!(self.writer, "{line}")?;
        self.writer.flush()
    }
}

//! Command grammar for the remote-control protocol.
//!
//! A request line is either a bare keyword (`getstatus`, `lock`, ...) or a
//! keyword followed by `:` and a payload (`setcolor:1-255,0,0;`). Parsing is
//! purely syntactic: range checks that depend on the device (LED count) are
//! applied here too, but session state is left to the engine.

use thiserror::Error;

use crate::device::{BacklightStatus, Rgb};

/// Lowest accepted gamma.
pub const MIN_GAMMA: f64 = 0.01;
/// Highest accepted gamma.
pub const MAX_GAMMA: f64 = 10.0;
/// Longest accepted gamma payload in characters.
pub const MAX_GAMMA_CHARS: usize = 5;
/// Highest accepted brightness percentage.
pub const MAX_BRIGHTNESS: u8 = 100;

/// A colour addressed to one LED by zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedColor {
    /// Zero-based LED index.
    pub index: usize,
    /// Requested (uncorrected) colour.
    pub color: Rgb,
}

/// A parsed and range-checked request.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read-only query; never gated.
    Query(Query),
    /// `lock`
    Lock,
    /// `unlock`
    Unlock,
    /// `apikey:<key>`
    ApiKey(String),
    /// State change; requires authorization and the lock.
    Mutation(Mutation),
}

/// Read-only requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// `getstatus`
    Status,
    /// `getstatusapi`
    StatusApi,
    /// `getprofiles`
    Profiles,
    /// `getprofile`
    Profile,
}

/// Requests that change device state.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// `setcolor:<led>-<r>,<g>,<b>;...`
    SetColor(Vec<LedColor>),
    /// `setgamma:<value>`
    SetGamma(f64),
    /// `setsmooth:<value>`
    SetSmooth(u8),
    /// `setbrightness:<value>`
    SetBrightness(u8),
    /// `setprofile:<name>`
    SetProfile(String),
    /// `setstatus:on` or `setstatus:off`
    SetStatus(BacklightStatus),
}

impl Command {
    /// Parses one request line with its terminator already removed.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Unknown`] when the keyword is not recognised
    /// (including a bare keyword given a payload or vice versa) and
    /// [`CommandError::InvalidPayload`] when the payload is malformed or out
    /// of range.
    pub fn parse(line: &str, led_count: usize) -> Result<Self, CommandError> {
        let Some((keyword, payload)) = line.split_once(':') else {
            return match line {
                "getstatus" => Ok(Self::Query(Query::Status)),
                "getstatusapi" => Ok(Self::Query(Query::StatusApi)),
                "getprofiles" => Ok(Self::Query(Query::Profiles)),
                "getprofile" => Ok(Self::Query(Query::Profile)),
                "lock" => Ok(Self::Lock),
                "unlock" => Ok(Self::Unlock),
                _ => Err(CommandError::unknown(line)),
            };
        };

        let mutation = match keyword {
            "setcolor" => parse_colors(payload, led_count).map(Mutation::SetColor),
            "setgamma" => parse_gamma(payload).map(Mutation::SetGamma),
            "setsmooth" => parse_bounded("setsmooth", payload, u8::MAX).map(Mutation::SetSmooth),
            "setbrightness" => parse_bounded("setbrightness", payload, MAX_BRIGHTNESS)
                .map(Mutation::SetBrightness),
            "setprofile" => parse_profile(payload).map(Mutation::SetProfile),
            "setstatus" => parse_status(payload).map(Mutation::SetStatus),
            "apikey" => return Ok(Self::ApiKey(payload.to_owned())),
            _ => return Err(CommandError::unknown(line)),
        };
        mutation.map(Self::Mutation)
    }

    /// Whether an unauthenticated session is refused this command.
    #[must_use]
    pub const fn requires_authorization(&self) -> bool {
        matches!(self, Self::Lock | Self::Mutation(_))
    }

    /// Keyword used in logs.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Query(Query::Status) => "getstatus",
            Self::Query(Query::StatusApi) => "getstatusapi",
            Self::Query(Query::Profiles) => "getprofiles",
            Self::Query(Query::Profile) => "getprofile",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::ApiKey(_) => "apikey",
            Self::Mutation(mutation) => mutation.keyword(),
        }
    }
}

impl Mutation {
    /// Keyword used in logs.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::SetColor(_) => "setcolor",
            Self::SetGamma(_) => "setgamma",
            Self::SetSmooth(_) => "setsmooth",
            Self::SetBrightness(_) => "setbrightness",
            Self::SetProfile(_) => "setprofile",
            Self::SetStatus(_) => "setstatus",
        }
    }
}

/// Reasons a request line is rejected before reaching the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CommandError {
    /// Keyword not part of the protocol.
    #[error("unknown command: {line}")]
    Unknown {
        /// Offending request line.
        line: String,
    },
    /// Keyword recognised but payload rejected.
    #[error("invalid {command} payload: {message}")]
    InvalidPayload {
        /// Keyword whose payload failed.
        command: &'static str,
        /// Why the payload was rejected.
        message: String,
    },
}

impl CommandError {
    fn unknown(line: &str) -> Self {
        Self::Unknown {
            line: line.to_owned(),
        }
    }

    fn invalid(command: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            command,
            message: message.into(),
        }
    }
}

fn parse_colors(payload: &str, led_count: usize) -> Result<Vec<LedColor>, CommandError> {
    let body = payload.strip_suffix(';').unwrap_or(payload);
    if body.is_empty() {
        return Err(CommandError::invalid("setcolor", "no LED entries"));
    }
    body.split(';')
        .map(|entry| parse_led_color(entry, led_count))
        .collect()
}

fn parse_led_color(entry: &str, led_count: usize) -> Result<LedColor, CommandError> {
    let (led, channels) = entry
        .split_once('-')
        .ok_or_else(|| CommandError::invalid("setcolor", format!("'{entry}' lacks '-'")))?;
    let led = parse_digits::<usize>(led)
        .ok_or_else(|| CommandError::invalid("setcolor", format!("bad LED number '{led}'")))?;
    if led == 0 || led > led_count {
        return Err(CommandError::invalid(
            "setcolor",
            format!("LED {led} outside 1..={led_count}"),
        ));
    }

    let mut parts = channels.split(',');
    let mut channel = || {
        let text = parts.next().unwrap_or_default();
        parse_digits::<u8>(text).ok_or_else(|| {
            CommandError::invalid("setcolor", format!("bad channel '{text}' in '{entry}'"))
        })
    };
    let color = Rgb::new(channel()?, channel()?, channel()?);
    if parts.next().is_some() {
        return Err(CommandError::invalid(
            "setcolor",
            format!("'{entry}' has more than three channels"),
        ));
    }

    Ok(LedColor {
        index: led - 1,
        color,
    })
}

fn parse_gamma(payload: &str) -> Result<f64, CommandError> {
    if payload.len() > MAX_GAMMA_CHARS || !is_decimal(payload) {
        return Err(CommandError::invalid(
            "setgamma",
            format!("'{payload}' is not a decimal of at most {MAX_GAMMA_CHARS} characters"),
        ));
    }
    let value: f64 = payload
        .parse()
        .map_err(|_| CommandError::invalid("setgamma", format!("'{payload}' is not a number")))?;
    if !(MIN_GAMMA..=MAX_GAMMA).contains(&value) {
        return Err(CommandError::invalid(
            "setgamma",
            format!("{value} outside {MIN_GAMMA}..={MAX_GAMMA}"),
        ));
    }
    Ok(value)
}

/// Matches `^[0-9]*\.?[0-9]+$`.
fn is_decimal(text: &str) -> bool {
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => ("", text),
    };
    whole.bytes().all(|byte| byte.is_ascii_digit())
        && !fraction.is_empty()
        && fraction.bytes().all(|byte| byte.is_ascii_digit())
}

fn parse_bounded(command: &'static str, payload: &str, max: u8) -> Result<u8, CommandError> {
    parse_digits::<u8>(payload)
        .filter(|value| *value <= max)
        .ok_or_else(|| CommandError::invalid(command, format!("'{payload}' outside 0..={max}")))
}

fn parse_profile(payload: &str) -> Result<String, CommandError> {
    if payload.is_empty() {
        return Err(CommandError::invalid("setprofile", "empty profile name"));
    }
    Ok(payload.to_owned())
}

fn parse_status(payload: &str) -> Result<BacklightStatus, CommandError> {
    match payload {
        "on" => Ok(BacklightStatus::On),
        "off" => Ok(BacklightStatus::Off),
        other => Err(CommandError::invalid(
            "setstatus",
            format!("'{other}' is neither 'on' nor 'off'"),
        )),
    }
}

/// Parses a non-empty run of ASCII digits, rejecting signs and overflow.
fn parse_digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const LEDS: usize = 10;

    fn parse(line: &str) -> Result<Command, CommandError> {
        Command::parse(line, LEDS)
    }

    fn is_invalid(result: &Result<Command, CommandError>) -> bool {
        matches!(result, Err(CommandError::InvalidPayload { .. }))
    }

    #[rstest]
    #[case("getstatus", Command::Query(Query::Status))]
    #[case("getstatusapi", Command::Query(Query::StatusApi))]
    #[case("getprofiles", Command::Query(Query::Profiles))]
    #[case("getprofile", Command::Query(Query::Profile))]
    #[case("lock", Command::Lock)]
    #[case("unlock", Command::Unlock)]
    #[case("setstatus:on", Command::Mutation(Mutation::SetStatus(BacklightStatus::On)))]
    #[case("setstatus:off", Command::Mutation(Mutation::SetStatus(BacklightStatus::Off)))]
    #[case(
        "setprofile:Movie: night",
        Command::Mutation(Mutation::SetProfile("Movie: night".to_owned()))
    )]
    #[case("apikey:s3cret", Command::ApiKey("s3cret".to_owned()))]
    #[case("apikey:", Command::ApiKey(String::new()))]
    #[case("setsmooth:43", Command::Mutation(Mutation::SetSmooth(43)))]
    #[case("setbrightness:100", Command::Mutation(Mutation::SetBrightness(100)))]
    fn parses_keywords(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse(line), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("GETSTATUS")]
    #[case("getstatus ")]
    #[case("lock:now")]
    #[case("setcolor")]
    #[case("apikey")]
    #[case("frobnicate:1")]
    fn rejects_unknown_commands(#[case] line: &str) {
        assert!(matches!(parse(line), Err(CommandError::Unknown { .. })));
    }

    #[rstest]
    #[case("1-1,1,1", 0, Rgb::new(1, 1, 1))]
    #[case("1-1,1,1;", 0, Rgb::new(1, 1, 1))]
    #[case("2-1,1,1;", 1, Rgb::new(1, 1, 1))]
    #[case("10-1,1,1;", 9, Rgb::new(1, 1, 1))]
    #[case("1-192,1,1;", 0, Rgb::new(192, 1, 1))]
    #[case("1-1,185,1;", 0, Rgb::new(1, 185, 1))]
    #[case("1-14,15,19;", 0, Rgb::new(14, 15, 19))]
    #[case("1-255,255,255;", 0, Rgb::new(255, 255, 255))]
    #[case("10-0,0,1;", 9, Rgb::new(0, 0, 1))]
    #[case("10-1,0,0;", 9, Rgb::new(1, 0, 0))]
    fn parses_single_led_colors(#[case] payload: &str, #[case] index: usize, #[case] color: Rgb) {
        let command = parse(&format!("setcolor:{payload}"));
        assert_eq!(
            command,
            Ok(Command::Mutation(Mutation::SetColor(vec![LedColor {
                index,
                color
            }])))
        );
    }

    #[test]
    fn repeated_led_keeps_every_entry_in_order() {
        let Ok(Command::Mutation(Mutation::SetColor(entries))) =
            parse("setcolor:1-1,1,1;1-1,1,1;1-2,2,2;1-3,3,3;")
        else {
            panic!("expected setcolor");
        };
        assert_eq!(entries.len(), 4);
        assert_eq!(entries.last().map(|entry| entry.color), Some(Rgb::new(3, 3, 3)));
    }

    #[test]
    fn accepts_every_led_in_one_line() {
        let line = "setcolor:1-1,1,1;2-2,2,2;3-3,3,3;4-4,4,4;5-5,5,5;6-6,6,6;7-7,7,7;8-8,8,8;9-9,9,9;10-10,10,10;";
        let Ok(Command::Mutation(Mutation::SetColor(entries))) = parse(line) else {
            panic!("expected setcolor");
        };
        assert_eq!(entries.len(), LEDS);
    }

    #[rstest]
    #[case("1--1,1,1;")]
    #[case("1-1,,1,1;")]
    #[case("1-1,1,,1;")]
    #[case("1-1.1.1")]
    #[case("1-1,1,1;2-")]
    #[case("11-1,1,1;")]
    #[case("0-1,1,1;")]
    #[case("1-1,-1,1;")]
    #[case("1-1,1111,1;")]
    #[case("1-1,1,256;")]
    #[case("!-1,1,1;")]
    #[case("-1,1,1;")]
    #[case("1-1,1;")]
    #[case("1-1,100000000000000000000000;")]
    #[case("1-1,1,1;2-4,5,,;")]
    #[case("1-1,1,1;2-2,2,2;3-3,3,3;4-4,4,4;5-5,5,5;;6-6,6,6;7-7,7,7;8-8,8,8;9-9,9,9;")]
    #[case("1-1,1,1;;")]
    #[case("")]
    #[case(";")]
    #[case("1-1,1,1,1;")]
    #[case("1- 1,1,1;")]
    fn rejects_malformed_colors(#[case] payload: &str) {
        assert!(is_invalid(&parse(&format!("setcolor:{payload}"))));
    }

    #[rstest]
    #[case(".01", 0.01)]
    #[case("1.0", 1.0)]
    #[case("2.0", 2.0)]
    #[case("3", 3.0)]
    #[case("10.00", 10.0)]
    fn parses_gamma(#[case] payload: &str, #[case] expected: f64) {
        assert_eq!(
            parse(&format!("setgamma:{payload}")),
            Ok(Command::Mutation(Mutation::SetGamma(expected)))
        );
    }

    #[rstest]
    #[case("0.00")]
    #[case("0.0001")]
    #[case("12.0")]
    #[case(":12.0")]
    #[case("2.0;")]
    #[case("1.2.0")]
    #[case("-1.2")]
    #[case("10.01")]
    #[case("4.56857")]
    #[case("4.5685787384739473827432423489237985739487593745987349857938475")]
    #[case("+100500")]
    #[case("Galaxy in Danger!")]
    #[case("1.")]
    #[case("")]
    fn rejects_invalid_gamma(#[case] payload: &str) {
        assert!(is_invalid(&parse(&format!("setgamma:{payload}"))));
    }

    #[rstest]
    #[case("-1")]
    #[case("256")]
    #[case("10.0")]
    #[case("1.0")]
    #[case(".0")]
    #[case("..0")]
    #[case("1.")]
    #[case("")]
    fn rejects_invalid_smooth(#[case] payload: &str) {
        assert!(is_invalid(&parse(&format!("setsmooth:{payload}"))));
    }

    #[rstest]
    #[case("setsmooth:0", Command::Mutation(Mutation::SetSmooth(0)))]
    #[case("setsmooth:255", Command::Mutation(Mutation::SetSmooth(255)))]
    #[case("setbrightness:0", Command::Mutation(Mutation::SetBrightness(0)))]
    fn parses_bounds(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(parse(line), Ok(expected));
    }

    #[rstest]
    #[case("setbrightness:101")]
    #[case("setprofile:")]
    #[case("setstatus:ON")]
    #[case("setstatus:")]
    fn rejects_other_payloads(#[case] line: &str) {
        assert!(is_invalid(&parse(line)));
    }

    #[rstest]
    #[case(Command::Lock, true)]
    #[case(Command::Unlock, false)]
    #[case(Command::Query(Query::Status), false)]
    #[case(Command::ApiKey(String::new()), false)]
    #[case(Command::Mutation(Mutation::SetGamma(1.0)), true)]
    #[case(Command::Mutation(Mutation::SetProfile("A".to_owned())), true)]
    fn gates_lock_and_mutations(#[case] command: Command, #[case] gated: bool) {
        assert_eq!(command.requires_authorization(), gated);
    }
}

use crate::error::{Error, Result};
use regex::Regex;

const NUMBER: &str = r"\A[0-9]+(\.[0-9]+)?\z";
const HEX_NUMBER: &str = r"\A0[xX][0-9A-Fa-f]+\z";
const EMAIL_ADDRESS: &str = r"(?i)\A[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\z";
const WEBSITE_ADDRESS: &str =
    r"(?i)\A(?:(?:https?|ftp|file)://|www\.)[A-Z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+\z";
const WEBSITE_CHARS: &str = r"[:/@?=&#%+~]+";
const DIGIT_RUNS: &str = r"[0-9]+";
const UNDERSCORES: &str = r"_+";
const CAMEL_CASE: &str = r"[a-z]+[A-Z]+[a-z]+";
const CAMEL_BOUNDARY: &str = r"[a-z][A-Z]";
const DOTS: &str = r"\.+";

/// Compiled patterns used by the filter rules. Built once and shared read-only.
#[derive(Debug, Clone)]
pub struct Matchers {
    pub number: Regex,
    pub hex_number: Regex,
    pub email: Regex,
    pub website: Regex,
    pub website_chars: Regex,
    pub digit_runs: Regex,
    pub underscores: Regex,
    pub camel_case: Regex,
    pub camel_boundary: Regex,
    pub dots: Regex,
}

impl Matchers {
    pub fn new() -> Result<Self> {
        Ok(Self {
            number: compile(NUMBER)?,
            hex_number: compile(HEX_NUMBER)?,
            email: compile(EMAIL_ADDRESS)?,
            website: compile(WEBSITE_ADDRESS)?,
            website_chars: compile(WEBSITE_CHARS)?,
            digit_runs: compile(DIGIT_RUNS)?,
            underscores: compile(UNDERSCORES)?,
            camel_case: compile(CAMEL_CASE)?,
            camel_boundary: compile(CAMEL_BOUNDARY)?,
            dots: compile(DOTS)?,
        })
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

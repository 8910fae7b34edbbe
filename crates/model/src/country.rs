use std::{borrow::Borrow, error, fmt};

/// Lower-case ISO 3166-1 alpha-2 country code, e.g. `de`.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryCode(String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyCountryCode;

impl error::Error for EmptyCountryCode {}

impl fmt::Display for EmptyCountryCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "country code is empty")
    }
}

impl CountryCode {
    pub fn new<S: AsRef<str>>(code: S) -> Result<Self, EmptyCountryCode> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(EmptyCountryCode);
        }
        Ok(Self(code.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CountryCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

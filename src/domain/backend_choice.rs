use std::fmt;

/// The two interchangeable hosted generation vendors.
///
/// Gemini is the default; adding a vendor is a variant here plus a
/// factory arm in the backend factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendChoice {
    Gemini,
    Groq,
}

impl BackendChoice {
    /// Case-insensitive parse of a caller-supplied identifier.
    pub fn try_parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "gemini" => Some(Self::Gemini),
            "groq" => Some(Self::Groq),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendChoice::Gemini => "gemini",
            BackendChoice::Groq => "groq",
        }
    }
}

impl Default for BackendChoice {
    fn default() -> Self {
        BackendChoice::Gemini
    }
}

impl fmt::Display for BackendChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

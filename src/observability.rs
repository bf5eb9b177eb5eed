//! Observability module for request correlation

use uuid::Uuid;

/// Header carrying the correlation id in both directions
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Longest caller-supplied correlation id we echo back
const MAX_CORRELATION_LEN: usize = 128;

/// Correlation ID for tracking one purchase request across log lines
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Create a new correlation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse a caller-supplied id when it is short and printable,
    /// otherwise mint a fresh one
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v)
                if !v.is_empty()
                    && v.len() <= MAX_CORRELATION_LEN
                    && v.chars().all(|c| c.is_ascii_graphic()) =>
            {
                Self(v.to_string())
            }
            _ => Self::new(),
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_ids_are_distinct_uuids() {
        let a = CorrelationId::new();
        let b = CorrelationId::new();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_from_header() {
        assert_eq!(
            CorrelationId::from_header(Some("req-42")).as_str(),
            "req-42"
        );
        assert_ne!(CorrelationId::from_header(Some("")).as_str(), "");
        assert_ne!(
            CorrelationId::from_header(Some("has space")).as_str(),
            "has space"
        );
        let long = "a".repeat(MAX_CORRELATION_LEN + 1);
        assert_ne!(CorrelationId::from_header(Some(&long)).as_str(), long);
        assert!(Uuid::parse_str(CorrelationId::from_header(None).as_str()).is_ok());
    }
}

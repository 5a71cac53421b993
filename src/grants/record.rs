//! Persisted grant records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted security artifact: authorization code, refresh token,
/// consent record, device code.
///
/// The `data` payload is produced and consumed by the issuing service;
/// this crate never inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Unique identifier, primary lookup key
    pub key: String,
    /// Categorical tag, e.g. "authorization_code"
    pub grant_type: String,
    /// Issuing client identifier
    pub client_id: String,
    /// End-user identifier; `None` for client-only grants
    pub subject_id: Option<String>,
    /// Set at issuance
    pub creation_time: DateTime<Utc>,
    /// `None` means the grant never expires
    pub expiration: Option<DateTime<Utc>>,
    /// Serialized payload, opaque to the store
    pub data: String,
}

impl Grant {
    /// A grant is expired iff its expiration is strictly before `as_of`.
    /// Grants without an expiration never expire.
    pub fn is_expired_at(&self, as_of: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(expiration) => expiration < as_of,
            None => false,
        }
    }
}

/// Conjunctive filter over subject, client and grant type.
///
/// Subject is always required; client and type narrow the match further.
/// A grant with no subject never matches any filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantFilter {
    subject_id: String,
    client_id: Option<String>,
    grant_type: Option<String>,
}

impl GrantFilter {
    /// All grants belonging to a subject
    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            client_id: None,
            grant_type: None,
        }
    }

    /// Narrow to grants issued by a client
    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Narrow to grants of one type
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.grant_type = Some(grant_type.into());
        self
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn grant_type(&self) -> Option<&str> {
        self.grant_type.as_deref()
    }

    /// Check whether a grant satisfies every field of this filter
    pub fn matches(&self, grant: &Grant) -> bool {
        if grant.subject_id.as_deref() != Some(self.subject_id.as_str()) {
            return false;
        }

        if let Some(client_id) = &self.client_id {
            if grant.client_id != *client_id {
                return false;
            }
        }

        if let Some(grant_type) = &self.grant_type {
            if grant.grant_type != *grant_type {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(subject: Option<&str>, client: &str, grant_type: &str) -> Grant {
        Grant {
            key: format!("{}-{}", client, grant_type),
            grant_type: grant_type.to_string(),
            client_id: client.to_string(),
            subject_id: subject.map(str::to_string),
            creation_time: Utc::now(),
            expiration: None,
            data: "{}".to_string(),
        }
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let mut g = grant(Some("alice"), "web", "refresh_token");

        g.expiration = Some(now - Duration::seconds(1));
        assert!(g.is_expired_at(now));

        g.expiration = Some(now);
        assert!(!g.is_expired_at(now)); // strictly before, not at

        g.expiration = Some(now + Duration::seconds(1));
        assert!(!g.is_expired_at(now));
    }

    #[test]
    fn test_no_expiration_never_expires() {
        let g = grant(Some("alice"), "web", "refresh_token");
        assert!(!g.is_expired_at(Utc::now() + Duration::days(10_000)));
    }

    #[test]
    fn test_filter_subject_only() {
        let filter = GrantFilter::for_subject("alice");

        assert!(filter.matches(&grant(Some("alice"), "web", "refresh_token")));
        assert!(filter.matches(&grant(Some("alice"), "mobile", "authorization_code")));
        assert!(!filter.matches(&grant(Some("bob"), "web", "refresh_token")));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let filter = GrantFilter::for_subject("alice")
            .with_client("web")
            .with_grant_type("refresh_token");

        assert!(filter.matches(&grant(Some("alice"), "web", "refresh_token")));
        assert!(!filter.matches(&grant(Some("alice"), "web", "authorization_code")));
        assert!(!filter.matches(&grant(Some("alice"), "mobile", "refresh_token")));
        assert!(!filter.matches(&grant(Some("bob"), "web", "refresh_token")));
    }

    #[test]
    fn test_subjectless_grant_never_matches() {
        let filter = GrantFilter::for_subject("alice");
        assert!(!filter.matches(&grant(None, "web", "client_credentials")));
    }
}

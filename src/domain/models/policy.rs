use serde::{Deserialize, Serialize};

use crate::domain::config::client::Expiry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<Expiry>,
    /// MIME patterns such as `image/*`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<Vec<String>>,
}

impl UploadPolicy {
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    pub fn with_expires(mut self, expires: impl Into<Expiry>) -> Self {
        self.expires = Some(expires.into());
        self
    }

    pub fn with_allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Returns the policy as sent on the wire: unset limits take the given
    /// defaults and an empty type list is dropped rather than sent empty.
    pub fn resolve(&self, default_max_size: u64, default_expires: &Expiry) -> UploadPolicy {
        UploadPolicy {
            max_size: Some(self.max_size.unwrap_or(default_max_size)),
            expires: Some(
                self.expires
                    .clone()
                    .unwrap_or_else(|| default_expires.clone()),
            ),
            allowed_types: self
                .allowed_types
                .clone()
                .filter(|types| !types.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_fills_defaults() {
        let resolved = UploadPolicy::default().resolve(1024, &Expiry::Days(28));
        assert_eq!(resolved.max_size, Some(1024));
        assert_eq!(resolved.expires, Some(Expiry::Days(28)));
        assert_eq!(resolved.allowed_types, None);
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let policy = UploadPolicy::default()
            .with_max_size(10)
            .with_expires("1d")
            .with_allowed_types(["image/*", "application/pdf"]);
        let resolved = policy.resolve(1024, &Expiry::Days(28));
        assert_eq!(resolved, policy);
    }

    #[test]
    fn test_empty_allowed_types_omitted_from_wire() {
        let policy = UploadPolicy::default().with_allowed_types(Vec::<String>::new());
        let resolved = policy.resolve(1024, &Expiry::Days(28));

        assert_eq!(
            serde_json::to_value(&resolved).unwrap(),
            json!({ "max_size": 1024, "expires": 28 })
        );
    }
}

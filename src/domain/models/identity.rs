use serde::{Deserialize, Serialize};

/// Ciphertext of a user's id and token. The filestore receives only this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedIdentity(String);

impl EncryptedIdentity {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userToken")]
    pub user_token: String,
}

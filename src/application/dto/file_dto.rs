use crate::domain::models::{file::FileContent, policy::UploadPolicy};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchArgs {
    pub user_id: String,
    pub user_token: String,
    pub fingerprint: String,
}

impl FetchArgs {
    pub fn new(
        user_id: impl Into<String>,
        user_token: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_token: user_token.into(),
            fingerprint: fingerprint.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreArgs {
    pub user_id: String,
    pub user_token: String,
    pub file: FileContent,
    pub policy: Option<UploadPolicy>,
}

impl StoreArgs {
    pub fn new(
        user_id: impl Into<String>,
        user_token: impl Into<String>,
        file: impl Into<FileContent>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_token: user_token.into(),
            file: file.into(),
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
}

/// Same as [`StoreArgs`] minus the content, which is read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFromPathArgs {
    pub user_id: String,
    pub user_token: String,
    pub policy: Option<UploadPolicy>,
}

impl StoreFromPathArgs {
    pub fn new(user_id: impl Into<String>, user_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_token: user_token.into(),
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_file(self, file: impl Into<FileContent>) -> StoreArgs {
        StoreArgs {
            user_id: self.user_id,
            user_token: self.user_token,
            file: file.into(),
            policy: self.policy,
        }
    }
}

//! Chat message types.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ClientError;

/// Conversation role.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message sent to the provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Build a message from an untyped role name, as received from callers.
    pub fn parse(role: &str, content: impl Into<String>) -> Result<Self, ClientError> {
        let role = role
            .trim()
            .to_ascii_lowercase()
            .parse::<Role>()
            .map_err(|_| ClientError::validation(format!("Invalid message role: '{role}'")))?;
        let message = Self::new(role, content);
        message.validate()?;
        Ok(message)
    }

    /// Content must not be empty or whitespace-only.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.content.trim().is_empty() {
            return Err(ClientError::validation(format!(
                "Message content cannot be empty ({} message)",
                self.role
            )));
        }
        Ok(())
    }
}

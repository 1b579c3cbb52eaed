use serde::{Deserialize, Serialize};

/// Response body of a successful password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String, // always "bearer"
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Public view of an account. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub disabled: bool,
}

/// Credentials received through HTTP Basic auth, echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub file_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipartFormResponse {
    pub title: String,
    pub file_name: String,
    pub file_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Payload formats served under `/random/{format}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomFormat {
    Json,
    Xml,
    Plaintext,
    Html,
}

impl RandomFormat {
    pub fn as_str(&self) -> &str {
        match self {
            RandomFormat::Json => "json",
            RandomFormat::Xml => "xml",
            RandomFormat::Plaintext => "plaintext",
            RandomFormat::Html => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            RandomFormat::Json => "application/json",
            RandomFormat::Xml => "application/xml",
            RandomFormat::Plaintext => "text/plain; charset=utf-8",
            RandomFormat::Html => "text/html; charset=utf-8",
        }
    }
}

impl std::str::FromStr for RandomFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(RandomFormat::Json),
            "xml" => Ok(RandomFormat::Xml),
            "plaintext" | "text" => Ok(RandomFormat::Plaintext),
            "html" => Ok(RandomFormat::Html),
            other => Err(format!("unknown random format: {}", other)),
        }
    }
}

//! Libraries, members and account payloads

use serde::{Deserialize, Serialize};

/// A branch a copy can be returned to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    pub id: i64,
    pub name: String,
    pub location: String,
}

/// Account role as issued by the authentication API
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Member,
    Librarian,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Member => "Member",
            Self::Librarian => "Librarian",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Member" => Self::Member,
            "Librarian" => Self::Librarian,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The signed-in member's profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberProfile {
    /// Home library, the default place of return
    #[serde(default)]
    pub library_id: Option<i64>,
}

/// A registered account, as listed for librarians
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: i64,
    pub email: String,
    pub role: Role,
    pub is_approved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful login payload
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub role: Role,
}

/// Self-service registration form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationForm {
    pub name: String,
    pub phone_number: String,
    pub email: String,
    pub address: String,
    pub library_id: i64,
    pub role: Role,
}

impl RegistrationForm {
    /// First blank required field, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("name", &self.name),
            ("phone number", &self.phone_number),
            ("email", &self.email),
            ("address", &self.address),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}

/// Token plus new password, shared by the reset and set-password calls
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    pub token: String,
    pub password: String,
}

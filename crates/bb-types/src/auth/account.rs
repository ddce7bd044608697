use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Account types recognised by the backend.
///
/// Parsing is case-insensitive; serialisation always uses the capitalised form
/// the backend issues in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum AccountType {
    Admin,
    Staff,
    Parent,
}

impl AccountType {
    pub const ALL: [AccountType; 3] = [AccountType::Admin, AccountType::Staff, AccountType::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Admin => "Admin",
            AccountType::Staff => "Staff",
            AccountType::Parent => "Parent",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(AccountType::Admin),
            "staff" => Ok(AccountType::Staff),
            "parent" => Ok(AccountType::Parent),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl TryFrom<String> for AccountType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

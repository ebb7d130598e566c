//! Role enumeration shared by claims, user records and permission checks

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account role carried in token claims and user records.
///
/// Drives both which views a client renders and which endpoints the backend
/// permits. Roles the client does not recognize deserialize as `Unknown`,
/// which grants no special permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "STUDENT")]
    Student,
    #[serde(rename = "COMPANY")]
    Company,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Wire representation, matching the backend's choices.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
            Role::Company => "COMPANY",
            Role::Unknown => "UNKNOWN",
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin/TPO",
            Role::Student => "Student",
            Role::Company => "Company Representative",
            Role::Unknown => "Unknown",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Unknown
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "STUDENT" => Ok(Role::Student),
            "COMPANY" => Ok(Role::Company),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_roles_degrade() {
        let role: Role = serde_json::from_str("\"SUPERVISOR\"").unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn known_roles_round_trip() {
        for (wire, role) in [
            ("\"ADMIN\"", Role::Admin),
            ("\"STUDENT\"", Role::Student),
            ("\"COMPANY\"", Role::Company),
        ] {
            let parsed: Role = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, role);
            assert_eq!(serde_json::to_string(&parsed).unwrap(), wire);
        }
    }
}

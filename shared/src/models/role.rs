//! Roles and account status

use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UserRole {
    SuperAdmin,
    Admin,
    ViewerAdmin,
    /// Private customer
    UserFiz,
    /// Legal-entity customer
    UserYur,
}

impl UserRole {
    /// Ordinary customers see only what they own
    pub fn is_customer(&self) -> bool {
        matches!(self, Self::UserFiz | Self::UserYur)
    }

    /// Back-office roles, read access to everything
    pub fn is_staff(&self) -> bool {
        !self.is_customer()
    }

    /// Staff roles allowed to mutate other users' data
    pub fn can_manage(&self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::ViewerAdmin => "VIEWER_ADMIN",
            Self::UserFiz => "USER_FIZ",
            Self::UserYur => "USER_YUR",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "ADMIN" => Ok(Self::Admin),
            "VIEWER_ADMIN" => Ok(Self::ViewerAdmin),
            "USER_FIZ" => Ok(Self::UserFiz),
            "USER_YUR" => Ok(Self::UserYur),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum UserStatus {
    /// Registered, waiting for OTP activation
    Inactive,
    Active,
    Banned,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_predicates() {
        assert!(UserRole::UserFiz.is_customer());
        assert!(UserRole::UserYur.is_customer());
        assert!(UserRole::ViewerAdmin.is_staff());
        assert!(!UserRole::ViewerAdmin.can_manage());
        assert!(UserRole::Admin.can_manage());
        assert!(UserRole::SuperAdmin.can_manage());
    }

    #[test]
    fn test_role_roundtrip_str() {
        for role in [
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::ViewerAdmin,
            UserRole::UserFiz,
            UserRole::UserYur,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}

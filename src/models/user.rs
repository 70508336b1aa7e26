use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Buyer,
    Seller,
    SuperAdmin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Invited,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Invited => "INVITED",
            UserStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(UserStatus::Active),
            "INVITED" => Some(UserStatus::Invited),
            "INACTIVE" => Some(UserStatus::Inactive),
            _ => None,
        }
    }

    /// Accounts in these states may log in and call authenticated APIs.
    pub fn can_authenticate(&self) -> bool {
        matches!(self, UserStatus::Active | UserStatus::Invited)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Salted digest, never the plaintext. Excluded from every wire shape.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub status: UserStatus,
    pub roles: Vec<Role>,
    pub profile_image_key: Option<String>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Seller profile joined with the owning user's display fields, which the
/// course serializer and the seller endpoints both render from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerWithUser {
    pub id: Uuid,
    pub user_id: Uuid,
    pub slug_name: String,
    pub designation: String,
    pub description: Option<String>,
    pub facebook_link: Option<String>,
    pub twitter_link: Option<String>,
    pub instagram_link: Option<String>,
    pub linkedin_link: Option<String>,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// src/types/user.rs
use serde::{Deserialize, Serialize};

use super::{Entity, Patch, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Client,
    Other(i64),
}

impl Role {
    pub fn from_id(role_id: i64) -> Self {
        match role_id {
            1 => Role::Admin,
            2 => Role::Client,
            other => Role::Other(other),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Role::Admin => 1,
            Role::Client => 2,
            Role::Other(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, rename = "Profile", alias = "profile", skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::from_id(self.role_id)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

impl Entity for User {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

impl Patch<User> for UserPatch {
    fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name = name.clone();
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(role_id) = self.role_id {
            user.role_id = role_id;
        }
    }
}

//! # Identity
//!
//! Snapshot of what the external identity provider knows about the current
//! user. Sign-in itself happens elsewhere; this crate only reads the phone
//! number the orders endpoint keys on.
use serde::{Deserialize, Serialize};

use crate::utils::normalize_phone;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PhoneNumber {
    pub phone_number: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub loaded: bool,
    pub user: Option<User>,
}

impl Identity {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn signed_out() -> Self {
        Self {
            loaded: true,
            user: None,
        }
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            loaded: true,
            user: Some(user),
        }
    }

    pub fn with_phone(phone: &str) -> Self {
        Self::signed_in(User {
            phone_numbers: vec![PhoneNumber {
                phone_number: phone.to_string(),
            }],
        })
    }

    /// First registered phone number, without the leading `+`. `None` while
    /// the provider is still loading.
    pub fn user_phone(&self) -> Option<String> {
        if !self.loaded {
            return None;
        }

        let first = self.user.as_ref()?.phone_numbers.first()?;
        normalize_phone(&first.phone_number)
    }
}

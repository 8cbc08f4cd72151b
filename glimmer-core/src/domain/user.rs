//! User account domain types

use serde::{Deserialize, Serialize};

use crate::wire;

/// Profile returned by `GET /users/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "wire::opt_id")]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

/// Free-tier image allowance returned by `GET /users/free-usage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FreeUsage {
    #[serde(default)]
    pub free_images_remaining: u32,
    #[serde(default)]
    pub free_images_used: u32,
    #[serde(default)]
    pub total_free_images_granted: u32,
    #[serde(default)]
    pub has_subscription: bool,
}

impl FreeUsage {
    /// Whether a campaign of `images` renders fits the allowance
    ///
    /// Subscribers are never limited.
    pub fn allows(&self, images: u32) -> bool {
        self.has_subscription || images <= self.free_images_remaining
    }

    /// Share of the free grant already used, 0 when nothing was granted
    pub fn used_percent(&self) -> u8 {
        if self.total_free_images_granted == 0 {
            return 0;
        }
        let pct = f64::from(self.free_images_used) * 100.0
            / f64::from(self.total_free_images_granted);
        pct.round().clamp(0.0, 100.0) as u8
    }
}

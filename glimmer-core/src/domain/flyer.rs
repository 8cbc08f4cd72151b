//! Flyer view entity
//!
//! A flyer pairs an address of a completed job with its rendered output
//! image. Flyers are never fetched from the backend; they are derived.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::address::Address;

/// An address together with its generated image reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flyer {
    /// Composite `{job_id}-{address_id}` identifier
    pub id: String,
    pub job_id: String,
    pub address_id: String,
    /// Output image URL; fetching it requires the bearer token
    pub image_url: String,
    pub full_address: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Path of the rendered image for one address, relative to the API base URL
pub fn output_image_path(job_id: &str, address_id: &str) -> String {
    format!("/jobs/{}/addresses/{}/output-image", job_id, address_id)
}

impl Flyer {
    pub fn composite_id(job_id: &str, address_id: &str) -> String {
        format!("{}-{}", job_id, address_id)
    }

    /// Derives the flyer for `address` of job `job_id`
    ///
    /// # Arguments
    /// * `job_id` - Owning job; wins over the address's own `job_id`
    /// * `address` - The resolved address
    /// * `base_url` - API base URL without a trailing slash
    pub fn from_address(job_id: &str, address: &Address, base_url: &str) -> Self {
        Self {
            id: Self::composite_id(job_id, &address.id),
            job_id: job_id.to_string(),
            address_id: address.id.clone(),
            image_url: format!("{}{}", base_url, output_image_path(job_id, &address.id)),
            full_address: address.display_address(),
            created_at: address.created_at,
        }
    }
}

//! Campaign submission
//!
//! Validates the new-campaign form, builds the job request and applies the
//! free-tier quota rule.

use glimmer_core::domain::job::Job;
use glimmer_core::dto::job::{CreateJob, NewAddress, prune_empty};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::QuotaPolicy;
use crate::error::{Result, SyncError};
use crate::repository::JobRepository;

/// A campaign as entered by the user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Campaign {
    pub name: String,
    /// One street address per flyer
    pub addresses: Vec<String>,
    pub city: String,
    pub state: String,
    pub lighting_preferences: Option<Value>,
}

/// Per-field validation failures of a [`Campaign`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub campaign_name: Option<String>,
    pub addresses: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.campaign_name.is_none()
            && self.addresses.is_none()
            && self.city.is_none()
            && self.state.is_none()
    }

    fn messages(&self) -> impl Iterator<Item = &str> {
        [&self.campaign_name, &self.addresses, &self.city, &self.state]
            .into_iter()
            .filter_map(|m| m.as_deref())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<&str> = self.messages().collect();
        write!(f, "{}", messages.join("; "))
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl Campaign {
    fn street_addresses(&self) -> impl Iterator<Item = &str> {
        self.addresses.iter().map(|a| a.trim()).filter(|a| !a.is_empty())
    }

    /// Number of images the campaign will render
    pub fn image_count(&self) -> u32 {
        u32::try_from(self.street_addresses().count()).unwrap_or(u32::MAX)
    }

    /// Checks every field, reporting all failures at once
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        if blank(&self.name) {
            errors.campaign_name = Some("Campaign name is required".to_string());
        }
        if self.image_count() == 0 {
            errors.addresses = Some("At least one street address is required".to_string());
        }
        if blank(&self.city) {
            errors.city = Some("City is required".to_string());
        }
        if blank(&self.state) {
            errors.state = Some("State is required".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Builds the job request; call [`Campaign::validate`] first
    pub fn to_request(&self) -> CreateJob {
        let city = self.city.trim().to_string();
        let state = self.state.trim().to_string();

        CreateJob {
            description: self.name.trim().to_string(),
            addresses: self
                .street_addresses()
                .map(|street| NewAddress {
                    street: street.to_string(),
                    city: city.clone(),
                    state: state.clone(),
                })
                .collect(),
            lighting_preferences: self.lighting_preferences.clone().and_then(prune_empty),
        }
    }
}

fn quota_message(required: u32, remaining: u32) -> String {
    format!(
        "This campaign needs {} images but only {} free images remain. Subscribe to continue creating images.",
        required, remaining
    )
}

/// Validates and submits `campaign`, enforcing the free allowance per `policy`
///
/// # Returns
/// The job created by the backend
pub async fn submit_campaign(
    repo: &dyn JobRepository,
    campaign: &Campaign,
    policy: QuotaPolicy,
) -> Result<Job> {
    campaign.validate().map_err(SyncError::InvalidCampaign)?;

    let required = campaign.image_count();
    let request = campaign.to_request();

    match policy {
        QuotaPolicy::Reject => {
            let usage = repo.free_usage().await?;
            if !usage.allows(required) {
                warn!(
                    "Refusing campaign of {} images, {} free remaining",
                    required, usage.free_images_remaining
                );
                return Err(SyncError::QuotaExceeded {
                    required,
                    remaining: usage.free_images_remaining,
                    job_deleted: false,
                    message: quota_message(required, usage.free_images_remaining),
                });
            }

            let job = repo.submit_job(&request).await?;
            info!("Submitted job {} ({} addresses)", job.id, required);
            Ok(job)
        }
        QuotaPolicy::DeleteJob => {
            let job = repo.submit_job(&request).await?;
            info!("Submitted job {} ({} addresses)", job.id, required);

            let usage = repo.free_usage().await?;
            if usage.allows(required) {
                return Ok(job);
            }

            warn!(
                "Job {} exceeds the free allowance ({} > {}), deleting it",
                job.id, required, usage.free_images_remaining
            );
            repo.delete_job(&job.id).await?;
            Err(SyncError::QuotaExceeded {
                required,
                remaining: usage.free_images_remaining,
                job_deleted: true,
                message: quota_message(required, usage.free_images_remaining),
            })
        }
    }
}

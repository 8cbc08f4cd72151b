//! Address and output image endpoints

use crate::FlyerClient;
use crate::error::Result;
use glimmer_core::domain::address::Address;
use glimmer_core::domain::flyer::output_image_path;
use reqwest::Method;

impl FlyerClient {
    /// List the addresses of a job, in backend order
    pub async fn list_addresses(&self, job_id: &str) -> Result<Vec<Address>> {
        let response = self
            .request(Method::GET, &format!("/jobs/{}/addresses/", job_id))?
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Image metadata of one address
    ///
    /// Returned as raw JSON; its shape is owned by the rendering backend.
    pub async fn address_images(&self, job_id: &str, address_id: &str) -> Result<serde_json::Value> {
        let response = self
            .request(
                Method::GET,
                &format!("/jobs/{}/addresses/{}/images", job_id, address_id),
            )?
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Absolute URL of the rendered image of one address
    pub fn output_image_url(&self, job_id: &str, address_id: &str) -> String {
        self.url(&output_image_path(job_id, address_id))
    }

    /// Download the rendered image of one address
    pub async fn output_image(&self, job_id: &str, address_id: &str) -> Result<Vec<u8>> {
        let response = self
            .request(Method::GET, &output_image_path(job_id, address_id))?
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }
}

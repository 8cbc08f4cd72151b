//! Service layer
//!
//! Services contain the business logic of the sync engine. They orchestrate
//! repository calls and turn backend payloads into view-model events:
//! resolving completed jobs into flyers and submitting new campaigns.

pub mod campaign;
pub mod resolver;

pub use campaign::{Campaign, ValidationErrors, submit_campaign};
pub use resolver::{Resolution, resolve};

//! Request handlers
//!
//! GET handlers answer with HAL+JSON documents. Form posts answer with a 303
//! redirect whose query string carries the flash message.

pub mod budget_items;
pub mod dashboard;
pub mod expenses;
pub mod index;
pub mod projects;

use serde::Serialize;

use crate::extractors::{Flash, HalResponse};

/// A document together with the flash message of the previous redirect
#[derive(Debug, Serialize)]
pub struct Page<T: Serialize> {
    #[serde(flatten)]
    pub body: T,
    #[serde(skip_serializing_if = "Flash::is_empty")]
    pub flash: Flash,
}

pub(crate) fn page<T: Serialize>(body: T, flash: Flash) -> HalResponse<Page<T>> {
    HalResponse(Page { body, flash })
}

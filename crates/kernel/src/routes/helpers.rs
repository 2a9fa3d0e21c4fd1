//! Shared extraction helpers for the resource routes.

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::listing::{DEFAULT_PAGE_SIZE, ListParams, OrderingKey};

/// Query string accepted by every list endpoint.
///
/// `ordering` takes the serde name of an ordering variant (`name`, `-name`);
/// omitted fields fall back to the first page of fifty, ordered by the
/// resource default.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "O: serde::Deserialize<'de> + Default"))]
pub struct ListQuery<O: OrderingKey> {
    #[serde(default)]
    pub ordering: O,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_page_number")]
    pub page_number: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

fn default_page_number() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl<O: OrderingKey> ListQuery<O> {
    /// Validate the raw query into engine parameters.
    ///
    /// `page_number` and `page_size` must both be at least 1; a blank or
    /// whitespace-only search is treated as no search at all.
    pub fn into_params(self) -> AppResult<ListParams<O>> {
        if self.page_number < 1 {
            return Err(AppError::BadRequest(
                "page_number must be at least 1.".to_string(),
            ));
        }
        if self.page_size < 1 {
            return Err(AppError::BadRequest(
                "page_size must be at least 1.".to_string(),
            ));
        }

        let mut params =
            ListParams::new(self.ordering).with_page(self.page_number, self.page_size);

        if let Some(search) = self.search {
            let trimmed = search.trim();
            if !trimmed.is_empty() {
                params = params.with_search(trimmed);
            }
        }

        Ok(params)
    }
}

/// Request body for create and rename operations.
#[derive(Debug, Deserialize)]
pub struct ResourceInput {
    pub name: String,
}

//! Shared paging query parameters.

use serde::Deserialize;
use sgpj_core::store::{PageRequest, SortDirection};

/// Query parameters accepted by every paged listing. Defaults match the
/// persistence layer: page 0, size 10, backend-default order.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PagingParams {
  pub page:           Option<usize>,
  pub size:           Option<usize>,
  pub sort_by:        Option<String>,
  pub sort_direction: Option<SortDirection>,
}

impl From<PagingParams> for PageRequest {
  fn from(params: PagingParams) -> Self {
    PageRequest {
      page:           params.page.unwrap_or(0),
      size:           params.size.unwrap_or(PageRequest::DEFAULT_SIZE),
      sort_by:        params.sort_by,
      sort_direction: params.sort_direction,
    }
  }
}

use errors::CustomError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    pub number: i64,
    pub num_pages: i64,
    pub total: i64,
    pub page_size: i64,
}

impl Page {
    /// Validates the requested page against `total` results. The first page
    /// always exists, even when there is nothing on it.
    pub fn resolve(requested: Option<i64>, total: i64, page_size: i64) -> Result<Page, CustomError> {
        let page_size = page_size.max(1);
        let num_pages = ((total + page_size - 1) / page_size).max(1);
        let number = requested.unwrap_or(1);

        if number < 1 || number > num_pages {
            return Err(CustomError::NotFound(format!("Invalid page ({})", number)));
        }

        Ok(Page {
            number,
            num_pages,
            total,
            page_size,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.number - 1) * self.page_size
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

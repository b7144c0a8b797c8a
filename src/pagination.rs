use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::FilterConfig;
use crate::filter::{Filter, FilterError};

#[derive(Debug, Error, PartialEq)]
pub enum PaginationError {
    #[error("Invalid page: {0}")]
    InvalidPage(String),
}

/// Resolved page window for a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// `page` must be a positive integer. A missing or unusable `page_size`
    /// falls back to the default, and anything larger is clamped to the maximum.
    pub fn from_params(
        page: Option<&str>,
        page_size: Option<&str>,
        config: &FilterConfig,
    ) -> Result<Self, PaginationError> {
        let page = match page.map(str::trim).filter(|p| !p.is_empty()) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n,
                _ => return Err(PaginationError::InvalidPage(raw.to_string())),
            },
        };

        let page_size = page_size
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(config.default_page_size)
            .min(config.max_page_size);

        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    pub fn apply(&self, filter: &mut Filter) -> Result<(), FilterError> {
        filter.limit(self.page_size, Some(self.offset()))?;
        Ok(())
    }

    fn has_next(&self, count: i64) -> bool {
        self.page.saturating_mul(self.page_size) < count
    }

    /// Highest page holding results; an empty collection still has page 1.
    fn last_page(&self, count: i64) -> i64 {
        (count.max(0) + self.page_size - 1) / self.page_size
    }
}

/// Paginated list envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// `current` is the absolute URL of the request being answered; links are
    /// omitted when it is unknown.
    pub fn new(results: Vec<T>, count: i64, request: &PageRequest, current: Option<&Url>) -> Self {
        let next = current
            .filter(|_| request.has_next(count))
            .map(|url| with_page(url, Some(request.page + 1)));
        let previous = current.filter(|_| request.page > 1).map(|url| {
            let target = (request.page - 1).min(request.last_page(count)).max(1);
            with_page(url, (target > 1).then_some(target))
        });

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// `url` with its `page` parameter replaced, or removed when `page` is `None`.
fn with_page(url: &Url, page: Option<i64>) -> String {
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "page")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut link = url.clone();
    link.set_query(None);
    if !retained.is_empty() || page.is_some() {
        let mut pairs = link.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if let Some(page) = page {
            pairs.append_pair("page", &page.to_string());
        }
    }
    link.to_string()
}

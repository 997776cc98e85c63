//! Narrow, single-purpose queries over the shared pool.
//!
//! Each service is built once at startup with the [`PoolManager`] it
//! queries through. "Not found" is always `Ok(None)`, never an error.
//!
//! [`PoolManager`]: crate::db::PoolManager

pub mod event_service;
pub mod notification_service;
pub mod registration_service;
pub mod token_service;
pub mod user_service;

pub use event_service::EventService;
pub use notification_service::NotificationService;
pub use registration_service::RegistrationService;
pub use token_service::TokenService;
pub use user_service::UserService;

/// One page of a listing, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub per_page: i64,
}

impl Page {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(20).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::Page;

    #[test]
    fn page_is_clamped() {
        assert_eq!(Page::new(Some(0), Some(500)), Page { page: 1, per_page: 100 });
        assert_eq!(Page::new(Some(3), Some(10)).offset(), 20);
        assert_eq!(Page::default().offset(), 0);
        assert_eq!(Page::default().per_page, 20);
    }
}

//! Shared handler utilities for the page routes.

use axum::response::Redirect;
use catalog_core::{EntityKind, Notice, NoticeLevel};
use serde::Deserialize;

/// Toast carried on a redirect target.
#[derive(Debug, Default, Deserialize)]
pub struct ToastQuery {
    pub toast: Option<String>,
    pub message: Option<String>,
}

impl ToastQuery {
    /// Both parameters must be present and the level known.
    pub fn into_notice(self) -> Option<Notice> {
        let level = NoticeLevel::from_str(self.toast?.as_str())?;
        let message = self.message.filter(|m| !m.is_empty())?;
        Some(Notice { level, message })
    }
}

pub(crate) fn toast_location(kind: EntityKind, notice: &Notice) -> String {
    format!(
        "/{}?toast={}&message={}",
        kind.as_str(),
        notice.level.as_str(),
        urlencoding::encode(&notice.message)
    )
}

/// 303 back to the list page of `kind`, showing `notice`.
pub(crate) fn redirect_with_notice(kind: EntityKind, notice: &Notice) -> Redirect {
    Redirect::to(&toast_location(kind, notice))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toast_location_encodes_message() {
        let notice = Notice::error("Failed to create type: Name is required");
        assert_eq!(
            toast_location(EntityKind::Type, &notice),
            "/type?toast=error&message=Failed%20to%20create%20type%3A%20Name%20is%20required"
        );
    }

    #[test]
    fn test_toast_query_requires_both_parts() {
        let query = ToastQuery {
            toast: Some("success".into()),
            message: Some("Category created successfully".into()),
        };
        assert_eq!(
            query.into_notice(),
            Some(Notice::success("Category created successfully"))
        );

        let query = ToastQuery {
            toast: Some("success".into()),
            message: None,
        };
        assert_eq!(query.into_notice(), None);

        let query = ToastQuery {
            toast: Some("warning".into()),
            message: Some("x".into()),
        };
        assert_eq!(query.into_notice(), None);
    }
}

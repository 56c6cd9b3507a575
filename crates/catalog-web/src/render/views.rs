use super::{escape, layout};
use catalog_core::validation::NAME_FIELD;
use catalog_core::{CatalogError, EntityKind, Notice, Record};

pub const EMPTY_MESSAGE: &str = "No data yet";
pub const LOAD_FAILED_MESSAGE: &str = "Something went wrong";

/// What the list panel shows.
#[derive(Debug, Clone, Copy)]
pub enum ListState<'a> {
    Ready(&'a [Record]),
    Failed,
}

/// Submitted value and error for the name field of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub value: String,
    pub error: Option<String>,
}

impl FormState {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            error: None,
        }
    }

    /// Keep what the user typed and attach the name message from `err`.
    pub fn rejected(value: impl Into<String>, err: &CatalogError) -> Self {
        let error = err
            .first_field_message(NAME_FIELD)
            .map(str::to_string)
            .or_else(|| Some(err.to_string()));
        Self {
            value: value.into(),
            error,
        }
    }
}

fn name_form(action: &str, submit: &str, form: &FormState) -> String {
    let error = form
        .error
        .as_deref()
        .map(|msg| {
            format!(
                r#"<p class="field-error" data-testid="name-error">{}</p>"#,
                escape(msg)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<form method="post" action="{action}" class="entity-form">
<label for="name">Name</label>
<input id="name" name="{NAME_FIELD}" type="text" value="{value}" required>
{error}
<button type="submit">{submit}</button>
</form>"#,
        action = escape(action),
        value = escape(&form.value),
    )
}

fn card(kind: EntityKind, record: &Record) -> String {
    let slug = kind.as_str();
    format!(
        r#"<li class="card" data-testid="{slug}-card">
<span class="card-name">{name}</span>
<span class="card-actions">
<a href="/{slug}/{id}/edit" aria-label="Edit">Edit</a>
<a href="/{slug}/{id}/delete" aria-label="Delete">Delete</a>
</span>
</li>"#,
        name = escape(&record.name),
        id = record.id,
    )
}

/// The list page of one entity: create form above the cards.
pub fn list_view(
    kind: EntityKind,
    state: ListState<'_>,
    form: &FormState,
    notice: Option<&Notice>,
) -> String {
    let content = match state {
        ListState::Failed => format!(r#"<p class="error">{LOAD_FAILED_MESSAGE}</p>"#),
        ListState::Ready(records) if records.is_empty() => {
            format!(r#"<p class="empty">{EMPTY_MESSAGE}</p>"#)
        }
        ListState::Ready(records) => {
            let cards: String = records.iter().map(|r| card(kind, r)).collect();
            format!(r#"<ul class="cards">{cards}</ul>"#)
        }
    };

    let body = format!(
        r#"<section class="panel">
<div class="panel-header"><h1>{title}</h1></div>
{form}
{content}
</section>"#,
        title = kind.plural_label(),
        form = name_form(&format!("/{}", kind.as_str()), "Add", form),
    );

    layout(kind.plural_label(), Some(kind), notice, &body)
}

/// Update form pre-filled with the current (or rejected) name.
pub fn edit_view(
    kind: EntityKind,
    id: &str,
    form: &FormState,
    notice: Option<&Notice>,
) -> String {
    let body = format!(
        r#"<section class="panel">
<div class="panel-header"><h1>Edit {label}</h1><a href="/{slug}">Back</a></div>
{form}
</section>"#,
        label = kind.as_str(),
        slug = kind.as_str(),
        form = name_form(&format!("/{}/{}", kind.as_str(), id), "Save", form),
    );

    layout(kind.plural_label(), Some(kind), notice, &body)
}

pub fn confirm_delete_view(kind: EntityKind, record: &Record) -> String {
    let slug = kind.as_str();
    let body = format!(
        r#"<section class="panel">
<h1>Delete {slug}</h1>
<p>Delete &quot;{name}&quot;? This cannot be undone.</p>
<form method="post" action="/{slug}/{id}/delete">
<button type="submit">Delete</button>
<a href="/{slug}">Cancel</a>
</form>
</section>"#,
        name = escape(&record.name),
        id = record.id,
    );

    layout(kind.plural_label(), Some(kind), None, &body)
}

/// Home page. A `None` count means the list could not be loaded.
pub fn home_view(counts: &[(EntityKind, Option<usize>)]) -> String {
    let rows: String = counts
        .iter()
        .map(|(kind, count)| {
            let count = count
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            format!(
                r#"<li><a href="/{slug}">{label}</a> <span class="count">{count}</span></li>"#,
                slug = kind.as_str(),
                label = kind.plural_label(),
            )
        })
        .collect();

    let body = format!(
        r#"<section class="panel">
<h1>Catalog</h1>
<ul class="summary">{rows}</ul>
</section>"#
    );

    layout("Home", None, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::validation::CreateInput;

    fn record(name: &str) -> Record {
        serde_json::from_value(serde_json::json!({
            "id": "123e4567-e89b-12d3-a456-426614174000",
            "name": name,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_empty_list_shows_empty_message() {
        let html = list_view(
            EntityKind::Category,
            ListState::Ready(&[]),
            &FormState::default(),
            None,
        );
        assert!(html.contains(EMPTY_MESSAGE));
        assert!(!html.contains("category-card"));
    }

    #[test]
    fn test_list_renders_escaped_cards() {
        let records = vec![record("Fish & Chips")];
        let html = list_view(
            EntityKind::Type,
            ListState::Ready(&records),
            &FormState::default(),
            None,
        );
        assert!(html.contains(r#"data-testid="type-card""#));
        assert!(html.contains("Fish &amp; Chips"));
        assert!(html.contains("/type/123e4567-e89b-12d3-a456-426614174000/edit"));
        assert!(!html.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_failed_list_shows_error_state() {
        let html = list_view(
            EntityKind::Section,
            ListState::Failed,
            &FormState::default(),
            None,
        );
        assert!(html.contains(LOAD_FAILED_MESSAGE));
        assert!(!html.contains(EMPTY_MESSAGE));
    }

    #[test]
    fn test_rejected_form_keeps_value_and_message() {
        let err = CreateInput::new("a").validate().unwrap_err();
        let form = FormState::rejected("a", &err);
        assert_eq!(
            form.error.as_deref(),
            Some("Name must be at least 2 characters")
        );

        let html = edit_view(EntityKind::Category, "some-id", &form, None);
        assert!(html.contains(r#"value="a""#));
        assert!(html.contains("Name must be at least 2 characters"));
        assert!(html.contains(r#"action="/category/some-id""#));
    }

    #[test]
    fn test_confirm_delete_posts_to_delete_route() {
        let html = confirm_delete_view(EntityKind::Section, &record("Dairy"));
        assert!(html.contains(
            r#"action="/section/123e4567-e89b-12d3-a456-426614174000/delete""#
        ));
        assert!(html.contains("Dairy"));
    }

    #[test]
    fn test_home_lists_counts() {
        let html = home_view(&[
            (EntityKind::Category, Some(2)),
            (EntityKind::Type, None),
            (EntityKind::Section, Some(0)),
        ]);
        assert!(html.contains(r#"<a href="/category">Categories</a> <span class="count">2</span>"#));
        assert!(html.contains(r#"<span class="count">?</span>"#));
    }
}

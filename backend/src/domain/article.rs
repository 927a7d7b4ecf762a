//! Article model.
//!
//! An article is addressed by its slug, which is derived from the title once
//! at creation and never changes afterwards, even when the title is edited.

use std::fmt;

use chrono::{DateTime, Utc};

use super::{UserAccount, UserId};

/// Validation errors returned by article constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArticleValidationError {
    /// Slug was empty or contained characters outside `[a-z0-9-]`.
    #[error("slug must be non-empty lowercase ASCII letters, digits, or hyphens")]
    InvalidSlug,
    /// Title produced no slug characters.
    #[error("title must contain at least one letter or digit")]
    UnsluggableTitle,
}

/// URL-safe article identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Validate an existing slug, such as one taken from a request path.
    pub fn new(value: impl Into<String>) -> Result<Self, ArticleValidationError> {
        let value = value.into();
        let allowed = value
            .chars()
            .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
        if value.is_empty() || !allowed {
            return Err(ArticleValidationError::InvalidSlug);
        }
        Ok(Self(value))
    }

    /// Derive the slug for `title`.
    ///
    /// # Examples
    /// ```
    /// use conduit::domain::Slug;
    ///
    /// let slug = Slug::from_title("How to train your dragon").expect("sluggable");
    /// assert_eq!(slug.as_str(), "how-to-train-your-dragon");
    /// ```
    pub fn from_title(title: &str) -> Result<Self, ArticleValidationError> {
        let derived = slug::slugify(title);
        if derived.is_empty() {
            return Err(ArticleValidationError::UnsluggableTitle);
        }
        Ok(Self(derived))
    }

    /// Borrow the slug text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored article.
///
/// ## Invariants
/// - `slug` and `author_id` never change after creation.
/// - `tag_list` is never absent; it may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    slug: Slug,
    title: String,
    description: String,
    body: String,
    tag_list: Vec<String>,
    author_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Article {
    /// Build an article from a validated draft.
    pub fn create(draft: ArticleDraft, author_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            slug: draft.slug,
            title: draft.title,
            description: draft.description,
            body: draft.body,
            tag_list: draft.tag_list,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate an article read from storage.
    #[expect(clippy::too_many_arguments, reason = "mirrors the stored row")]
    pub fn from_parts(
        slug: Slug,
        title: String,
        description: String,
        body: String,
        tag_list: Vec<String>,
        author_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            slug,
            title,
            description,
            body,
            tag_list,
            author_id,
            created_at,
            updated_at,
        }
    }

    /// Return a copy with `changes` applied and `updated_at` bumped to `now`.
    pub fn apply(&self, changes: &ArticleChanges, now: DateTime<Utc>) -> Self {
        let mut updated = self.clone();
        if let Some(title) = &changes.title {
            updated.title.clone_from(title);
        }
        if let Some(description) = &changes.description {
            updated.description.clone_from(description);
        }
        if let Some(body) = &changes.body {
            updated.body.clone_from(body);
        }
        if let Some(tags) = &changes.tag_list {
            updated.tag_list.clone_from(tags);
        }
        updated.updated_at = now;
        updated
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    pub fn tag_list(&self) -> &[String] {
        self.tag_list.as_slice()
    }

    pub fn author_id(&self) -> &UserId {
        &self.author_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Validated input for a new article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    slug: Slug,
    title: String,
    description: String,
    body: String,
    tag_list: Vec<String>,
}

impl ArticleDraft {
    /// Derive the slug from `title` and normalise an absent tag list to empty.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
        tag_list: Option<Vec<String>>,
    ) -> Result<Self, ArticleValidationError> {
        let title = title.into();
        let slug = Slug::from_title(&title)?;
        Ok(Self {
            slug,
            title,
            description: description.into(),
            body: body.into(),
            tag_list: tag_list.unwrap_or_default(),
        })
    }

    /// Slug the article will be stored under.
    pub fn slug(&self) -> &Slug {
        &self.slug
    }
}

/// Partial article update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub tag_list: Option<Vec<String>>,
}

/// Public view of an article's author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorProfile {
    pub username: String,
    pub bio: String,
    pub image: Option<String>,
}

impl From<&UserAccount> for AuthorProfile {
    fn from(account: &UserAccount) -> Self {
        Self {
            username: account.username().as_str().to_owned(),
            bio: account.bio().to_owned(),
            image: account.image().map(str::to_owned),
        }
    }
}

/// Article joined with its author's public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoredArticle {
    pub article: Article,
    pub author: AuthorProfile,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[rstest]
    #[case("Hello, World!", "hello-world")]
    #[case("  Rust  2024 ", "rust-2024")]
    #[case("Ação Rápida", "acao-rapida")]
    fn slug_is_derived_from_title(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(Slug::from_title(title).expect("sluggable").as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("?!")]
    fn unsluggable_titles_are_rejected(#[case] title: &str) {
        assert_eq!(
            Slug::from_title(title).expect_err("no slug"),
            ArticleValidationError::UnsluggableTitle
        );
    }

    #[rstest]
    #[case("")]
    #[case("Upper")]
    #[case("with space")]
    #[case("under_score")]
    fn path_slugs_are_checked(#[case] raw: &str) {
        assert!(Slug::new(raw).is_err());
    }

    #[rstest]
    fn draft_defaults_tags_to_empty(created_at: DateTime<Utc>) {
        let draft = ArticleDraft::new("Title", "desc", "body", None).expect("valid draft");
        let article = Article::create(draft, UserId::random(), created_at);
        assert!(article.tag_list().is_empty());
        assert_eq!(article.created_at(), article.updated_at());
    }

    #[rstest]
    fn apply_keeps_slug_when_title_changes(created_at: DateTime<Utc>) {
        let draft = ArticleDraft::new("Original title", "desc", "body", Some(vec!["rust".into()]))
            .expect("valid draft");
        let article = Article::create(draft, UserId::random(), created_at);
        let later = created_at + chrono::Duration::minutes(5);

        let updated = article.apply(
            &ArticleChanges {
                title: Some("Brand new title".to_owned()),
                ..ArticleChanges::default()
            },
            later,
        );

        assert_eq!(updated.slug().as_str(), "original-title");
        assert_eq!(updated.title(), "Brand new title");
        assert_eq!(updated.tag_list(), ["rust".to_owned()]);
        assert_eq!(updated.created_at(), created_at);
        assert_eq!(updated.updated_at(), later);
    }
}

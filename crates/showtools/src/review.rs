//! Review widget: a star rating and a comment, delivered as a `mailto:` draft.
//!
//! Nothing is sent from the page. The visitor's mail client opens with the
//! subject and body filled in.

use thiserror::Error;

pub const MAX_RATING: u8 = 5;

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';
const ANONYMOUS: &str = "Anonymous";

/// Validation failures shown inline next to the form. The `Display` text is
/// the message the visitor sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Please select a star rating.")]
    MissingRating,

    #[error("Please write a review.")]
    EmptyReview,
}

/// A validated review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub rating: u8,
    pub name: Option<String>,
    pub text: String,
}

impl Review {
    /// `★★★★☆` for a rating of 4.
    pub fn stars(&self) -> String {
        let filled = self.rating.min(MAX_RATING) as usize;
        let mut stars = String::with_capacity(MAX_RATING as usize * 3);
        stars.extend(std::iter::repeat(FILLED_STAR).take(filled));
        stars.extend(std::iter::repeat(EMPTY_STAR).take(MAX_RATING as usize - filled));
        stars
    }

    pub fn author(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS)
    }

    pub fn subject(&self) -> String {
        format!(
            "Show Tools Review: {} ({}/{})",
            self.stars(),
            self.rating,
            MAX_RATING
        )
    }

    pub fn body(&self) -> String {
        format!(
            "Rating: {} ({}/{})\nName: {}\n\nReview:\n{}\n",
            self.stars(),
            self.rating,
            MAX_RATING,
            self.author(),
            self.text
        )
    }

    /// `mailto:` URI with percent-encoded subject and body.
    pub fn mailto(&self, recipient: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            recipient,
            urlencoding::encode(&self.subject()),
            urlencoding::encode(&self.body())
        )
    }
}

/// Form state behind the review widget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewForm {
    rating: u8,
    name: String,
    text: String,
}

impl ReviewForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Set the star rating; values above five are clamped.
    pub fn set_rating(&mut self, rating: u8) {
        self.rating = rating.min(MAX_RATING);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Check the form. The rating is checked before the text.
    pub fn validate(&self) -> Result<Review, ReviewError> {
        if self.rating == 0 {
            return Err(ReviewError::MissingRating);
        }
        let text = self.text.trim();
        if text.is_empty() {
            return Err(ReviewError::EmptyReview);
        }
        let name = self.name.trim();
        Ok(Review {
            rating: self.rating,
            name: (!name.is_empty()).then(|| name.to_string()),
            text: text.to_string(),
        })
    }

    /// Validate, compose the `mailto:` URI, and reset the form.
    /// On error the form is left untouched.
    pub fn submit(&mut self, recipient: &str) -> Result<String, ReviewError> {
        let review = self.validate()?;
        let uri = review.mailto(recipient);
        tracing::info!(rating = review.rating, "composed review draft");
        *self = Self::default();
        Ok(uri)
    }
}

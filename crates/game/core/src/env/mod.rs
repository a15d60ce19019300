//! Traits describing read-only content.
//!
//! The [`Env`] aggregate bundles oracles so the engine can reach seed data
//! without coupling to how it was loaded.
mod content;
mod error;

pub use content::{ContentOracle, ContentSnapshot};
pub use error::OracleError;

/// Aggregates read-only oracles required by the reducer and action pipeline.
pub struct Env<'a, C>
where
    C: ContentOracle + ?Sized,
{
    content: Option<&'a C>,
}

pub type GameEnv<'a> = Env<'a, dyn ContentOracle + 'a>;

impl<C> Clone for Env<'_, C>
where
    C: ContentOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Env<'_, C> where C: ContentOracle + ?Sized {}

impl<'a, C> Env<'a, C>
where
    C: ContentOracle + ?Sized,
{
    pub fn new(content: Option<&'a C>) -> Self {
        Self { content }
    }

    pub fn with_content(content: &'a C) -> Self {
        Self::new(Some(content))
    }

    pub fn content(&self) -> Result<&'a C, OracleError> {
        self.content.ok_or(OracleError::ContentNotAvailable)
    }
}

impl<'a> GameEnv<'a> {
    /// Environment without any oracle. Transitions that need content reject.
    pub fn empty() -> Self {
        Self { content: None }
    }

    pub fn from_content<C>(content: &'a C) -> Self
    where
        C: ContentOracle + 'a,
    {
        Self {
            content: Some(content as &'a (dyn ContentOracle + 'a)),
        }
    }
}

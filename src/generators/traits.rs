//! Traits for generator system standardization.

use super::validation::ValidationErrors;
use super::GeneratorError;
use crate::declaration::models::PassportDeclaration;
use crate::storage::NamingScheme;

/// Trait for validating request objects.
pub trait Validator {
    /// Validate the state of the object.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// A strategy that turns a declaration into PDF bytes.
pub trait Renderer {
    /// Short identifier reported back to clients ("layout" / "template").
    fn name(&self) -> &'static str;

    /// How files produced by this renderer are named on disk.
    fn naming_scheme(&self) -> NamingScheme;

    /// Render the declaration to a complete PDF document.
    fn render(&self, declaration: &PassportDeclaration) -> Result<Vec<u8>, GeneratorError>;
}

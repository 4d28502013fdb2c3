use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to build template context: {source}")]
    FailedToBuildContext { source: tera::Error },

    #[error("Failed to render template: {source}")]
    FailedToRender { source: tera::Error },
}

/// A text template rendered against any serializable value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextTemplate {
    pub template: &'static str,
}

impl TextTemplate {
    pub fn new(template: &'static str) -> Self {
        Self { template }
    }

    pub fn render<T: Serialize>(&self, data: &T) -> Result<String, TemplateError> {
        let context = Context::from_serialize(data)
            .map_err(|source| TemplateError::FailedToBuildContext { source })?;

        Tera::one_off(self.template, &context, false)
            .map_err(|source| TemplateError::FailedToRender { source })
    }
}

use crate::config::ErrorMethod;
use crate::prelude_internal::*;

use super::Field;

fn collapse(messages: Vec<String>, method: ErrorMethod) -> Option<String> {
    match method {
        ErrorMethod::First => messages.into_iter().next(),
        ErrorMethod::All if messages.is_empty() => None,
        ErrorMethod::All => Some(messages.join(", ")),
    }
}

impl Field {
    /// The object's messages for this attribute and for its association.
    pub fn errors(&self) -> Vec<String> {
        self.collect_errors(|object, key| object.errors_for(key))
    }

    /// Like [`Field::errors`], with the attribute name prepended by the object.
    pub fn full_errors(&self) -> Vec<String> {
        self.collect_errors(|object, key| object.full_errors_for(key))
    }

    fn collect_errors(
        &self,
        read: impl Fn(&dyn Bindable, &str) -> Option<Vec<String>>,
    ) -> Vec<String> {
        let Some(object) = self.object.as_deref() else {
            return Vec::new();
        };
        let key = self.key_name();
        let mut messages = read(object, &key).unwrap_or_default();
        if let Some(association) = self.association().filter(|a| a.name != key) {
            messages.extend(read(object, &association.name).unwrap_or_default());
        }
        messages
    }

    pub fn has_errors(&self) -> bool {
        self.options.error.is_some() || !self.errors().is_empty()
    }

    pub fn show_errors(&self) -> bool {
        self.options.show_errors != Some(false)
    }

    /// The custom error, or the object's errors collapsed per configuration,
    /// behind the configured prefix.
    pub fn error_message(&self) -> Option<String> {
        let config = self.context.config();
        let text = match &self.options.error {
            Some(error) => error.clone(),
            None => collapse(self.errors(), config.error_method)?,
        };
        Some(match &config.error_prefix {
            Some(prefix) => format!("{prefix} {text}").trim_start().to_string(),
            None => text,
        })
    }

    pub fn full_error_message(&self) -> Option<String> {
        match &self.options.error {
            Some(error) => Some(error.clone()),
            None => collapse(self.full_errors(), self.context.config().error_method),
        }
    }

    /// Error free with a present value.
    pub fn is_valid(&self) -> bool {
        !self.has_errors() && self.has_value()
    }
}

//! Renderer-facing attribute sets.
//!
//! The engine never emits markup. Components describe what a renderer needs:
//! DOM addressing, constraint attributes and state classes.

use crate::field::InputType;
use crate::prelude_internal::*;

/// Attributes of an input element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    pub id: String,
    pub name: String,
    pub value: Option<String>,
    pub input_type: Option<InputType>,
    pub required: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub multiple: bool,
    pub checked: Option<bool>,
    pub placeholder: Option<String>,
    pub pattern: Option<String>,
    pub minlength: Option<usize>,
    pub maxlength: Option<usize>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Option<Step>,
    /// Visible rows of a select
    pub size: Option<usize>,
    /// The component name followed by state classes
    pub classes: Vec<String>,
}

impl Attributes {
    pub(crate) fn state_classes(
        component: &str,
        required: bool,
        invalid: bool,
        readonly: bool,
        disabled: bool,
    ) -> Vec<String> {
        let mut classes = vec![component.to_string()];
        classes.push(if required { "required" } else { "optional" }.to_string());
        if invalid {
            classes.push("invalid".to_string());
        }
        if readonly {
            classes.push("readonly".to_string());
        }
        if disabled {
            classes.push("disabled".to_string());
        }
        classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Label,
    Hint,
    Error,
    FullError,
}

impl ComponentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Label => "label",
            ComponentKind::Hint => "hint",
            ComponentKind::Error => "error",
            ComponentKind::FullError => "full_error",
        }
    }
}

/// A decorative component. Building one never makes a field extractable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub kind: ComponentKind,
    /// `<field id>_<component>`
    pub id: String,
    /// The input a label points at
    pub for_id: Option<String>,
    pub text: Option<String>,
    pub visible: bool,
}

impl Component {
    pub(crate) fn new(kind: ComponentKind, field_id: &str, text: Option<String>, visible: bool) -> Self {
        Self {
            kind,
            id: format!("{field_id}_{}", kind.as_str()),
            for_id: (kind == ComponentKind::Label).then(|| field_id.to_string()),
            text,
            visible,
        }
    }
}

//! Leaf nodes bound to a single value.

mod errors;
mod inference;
mod input;

use std::cell::OnceCell;

pub use inference::EMAIL_PATTERN;
pub use input::{InputComponent, InputKind, InputOptions, InputType};

use crate::choices::ChoiceList;
use crate::component::{Component, ComponentKind};
use crate::field_collection::{CollectionRange, FieldCollection};
use crate::object::{Association, AttributeType, Validator};
use crate::prelude_internal::*;

/// Explicitly configured options. Anything left `None` is inferred on demand.
#[derive(Debug, Clone, Default)]
pub struct FieldOptions {
    pub label: Option<String>,
    pub hint: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub disabled: Option<bool>,
    pub readonly: Option<bool>,
    pub multiple: Option<bool>,
    pub pattern: Option<String>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    pub step: Option<Step>,
    pub minlength: Option<usize>,
    pub maxlength: Option<usize>,
    pub limit: Option<usize>,
    pub choices: Option<Choices>,
    pub grouped_choices: Option<Vec<(String, Choices)>>,
    pub input_type: Option<InputType>,
    /// Custom error message; takes priority over the object's errors
    pub error: Option<String>,
    pub show_errors: Option<bool>,
}

/// Introspection results, computed at most once per field.
#[derive(Debug, Default)]
struct InferenceCache {
    attribute_type: OnceCell<Option<AttributeType>>,
    validators: OnceCell<Option<Vec<Validator>>>,
    association: OnceCell<Option<Association>>,
    input_type: OnceCell<InputType>,
    required: OnceCell<bool>,
    choices: OnceCell<Option<ChoiceList>>,
}

#[derive(Debug)]
pub struct Field {
    node: Rc<Node>,
    dom: DomPath,
    object: Option<Rc<dyn Bindable>>,
    value: Value,
    options: FieldOptions,
    cache: InferenceCache,
    input: Option<InputComponent>,
    context: Rc<FormContext>,
}

impl Field {
    pub(crate) fn new(
        node: Rc<Node>,
        object: Option<Rc<dyn Bindable>>,
        value: Option<Value>,
        options: FieldOptions,
        context: Rc<FormContext>,
    ) -> Self {
        let mut field = Field {
            dom: DomPath::resolve(&node),
            node,
            object,
            value: Value::Null,
            options,
            cache: InferenceCache::default(),
            input: None,
            context,
        };
        field.value = match value {
            Some(value) => value,
            None => field.value_from_object(),
        };
        field
    }

    /// Associated records resolve to their `to_param`; plain attributes are read as-is.
    fn value_from_object(&self) -> Value {
        let Some(object) = &self.object else {
            return Value::Null;
        };
        let raw = object.read_attribute(&self.key_name()).unwrap_or_default();
        match self.association() {
            Some(association) if association.kind.is_plural() => Value::Array(
                raw.to_array()
                    .iter()
                    .filter_map(Value::to_param)
                    .map(Value::Text)
                    .collect(),
            ),
            Some(_) => raw.to_param().map_or(Value::Null, Value::Text),
            None => raw,
        }
    }

    pub fn key(&self) -> &Key {
        self.node.key()
    }

    pub(crate) fn key_name(&self) -> String {
        self.node.key().to_string()
    }

    pub fn node(&self) -> &Rc<Node> {
        &self.node
    }

    pub fn dom(&self) -> &DomPath {
        &self.dom
    }

    /// The value as rendered into a DOM `value` attribute.
    pub fn dom_value(&self) -> String {
        self.value.to_param().unwrap_or_default()
    }

    pub fn object(&self) -> Option<&Rc<dyn Bindable>> {
        self.object.as_ref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_blank()
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub(crate) fn context(&self) -> &Rc<FormContext> {
        &self.context
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.value = value.into();
        self
    }

    pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.options.label = Some(label.into());
        self
    }

    pub fn set_hint(&mut self, hint: impl Into<String>) -> &mut Self {
        self.options.hint = Some(hint.into());
        self
    }

    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.options.placeholder = Some(placeholder.into());
        self
    }

    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.options.required = Some(required);
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) -> &mut Self {
        self.options.disabled = Some(disabled);
        self
    }

    pub fn set_readonly(&mut self, readonly: bool) -> &mut Self {
        self.options.readonly = Some(readonly);
        self
    }

    pub fn set_multiple(&mut self, multiple: bool) -> &mut Self {
        self.options.multiple = Some(multiple);
        self
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) -> &mut Self {
        self.options.pattern = Some(pattern.into());
        self
    }

    pub fn set_min(&mut self, min: impl Into<Number>) -> &mut Self {
        self.options.min = Some(min.into());
        self
    }

    pub fn set_max(&mut self, max: impl Into<Number>) -> &mut Self {
        self.options.max = Some(max.into());
        self
    }

    pub fn set_step(&mut self, step: Step) -> &mut Self {
        self.options.step = Some(step);
        self
    }

    pub fn set_minlength(&mut self, minlength: usize) -> &mut Self {
        self.options.minlength = Some(minlength);
        self
    }

    pub fn set_maxlength(&mut self, maxlength: usize) -> &mut Self {
        self.options.maxlength = Some(maxlength);
        self
    }

    pub fn set_limit(&mut self, limit: usize) -> &mut Self {
        self.options.limit = Some(limit);
        self
    }

    pub fn set_choices(&mut self, choices: impl Into<Choices>) -> &mut Self {
        self.options.choices = Some(choices.into());
        self.options.grouped_choices = None;
        self.cache.choices = OnceCell::new();
        self
    }

    pub fn set_grouped_choices<L: Into<String>>(
        &mut self,
        groups: impl IntoIterator<Item = (L, Choices)>,
    ) -> &mut Self {
        self.options.grouped_choices = Some(
            groups
                .into_iter()
                .map(|(label, choices)| (label.into(), choices))
                .collect(),
        );
        self.cache.choices = OnceCell::new();
        self
    }

    pub fn set_input_type(&mut self, input_type: InputType) -> &mut Self {
        self.options.input_type = Some(input_type);
        self
    }

    /// A hand-set error that replaces whatever the object reports.
    pub fn set_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.options.error = Some(error.into());
        self
    }

    /// Keeps errors out of the rendered output without clearing them.
    pub fn hide_errors(&mut self) -> &mut Self {
        self.options.show_errors = Some(false);
        self
    }

    pub fn hint(&self) -> Option<&str> {
        self.options.hint.as_deref()
    }

    pub fn placeholder(&self) -> Option<&str> {
        self.options.placeholder.as_deref()
    }

    pub fn disabled(&self) -> bool {
        self.options.disabled.unwrap_or(false)
    }

    pub fn readonly(&self) -> bool {
        self.options.readonly.unwrap_or(false)
    }

    /// Expands this field into one child per position of `range`.
    pub fn multi(&self, range: impl Into<CollectionRange>) -> FieldCollection<'_> {
        FieldCollection::new(self, range.into())
    }

    pub(crate) fn child(&self, key: Key, value: Value) -> Field {
        let mut options = self.options.clone();
        options.label = Some(key.to_string());
        options.multiple = Some(false);
        Field::new(
            self.node.child(key, NodeKind::Field),
            None,
            Some(value),
            options,
            Rc::clone(&self.context),
        )
    }

    pub fn label_tag(&self) -> Component {
        Component::new(ComponentKind::Label, &self.dom.id, Some(self.label()), true)
    }

    pub fn hint_tag(&self) -> Component {
        let hint = self.hint().map(str::to_string);
        let visible = hint.is_some();
        Component::new(ComponentKind::Hint, &self.dom.id, hint, visible)
    }

    pub fn error_tag(&self) -> Component {
        let visible = self.show_errors() && self.has_errors();
        Component::new(ComponentKind::Error, &self.dom.id, self.error_message(), visible)
    }

    pub fn full_error_tag(&self) -> Component {
        let visible = self.show_errors() && self.has_errors();
        Component::new(
            ComponentKind::FullError,
            &self.dom.id,
            self.full_error_message(),
            visible,
        )
    }

    pub fn input(&self) -> Option<&InputComponent> {
        self.input.as_ref()
    }

    /// Locates this field's slice of `params` (the parent's level) and
    /// returns `{input_param => normalized value}`.
    ///
    /// The map is empty when the input omits its key (an unchecked radio button).
    pub fn extract_input(&self, params: &Params) -> Result<ParamMap, FormError> {
        let input = self
            .input
            .as_ref()
            .ok_or_else(|| FormError::NoInputComponent {
                name: self.dom.name.clone(),
            })?;
        Ok(input.extract_input(params))
    }

    /// The `(name, value)` pairs a browser submits for the current value.
    pub fn submission_pairs(&self) -> Vec<(String, String)> {
        self.input
            .as_ref()
            .map(|input| input.submission_pairs(&self.value))
            .unwrap_or_default()
    }
}

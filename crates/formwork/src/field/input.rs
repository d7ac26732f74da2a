//! The value-bearing component of a field.
//!
//! Registering an input component is what makes a field extractable: the
//! component decides the submitted key it reads, the key it extracts into,
//! and how untrusted submitted data is normalized.

use tracing::debug;

use super::Field;
use crate::choices::ChoiceList;
use crate::component::Attributes;
use crate::inflect::singularize;
use crate::prelude_internal::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Input,
    Textarea,
    Hidden,
    Select,
    Checkbox,
    RadioButton,
    CollectionCheckboxes,
    CollectionRadioButtons,
    InputArray,
    FileInput,
    BelongsTo,
    HasMany,
}

impl InputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Input => "input",
            InputKind::Textarea => "textarea",
            InputKind::Hidden => "hidden",
            InputKind::Select => "select",
            InputKind::Checkbox => "checkbox",
            InputKind::RadioButton => "radio_button",
            InputKind::CollectionCheckboxes => "collection_checkboxes",
            InputKind::CollectionRadioButtons => "collection_radio_buttons",
            InputKind::InputArray => "input_array",
            InputKind::FileInput => "file_input",
            InputKind::BelongsTo => "belongs_to",
            InputKind::HasMany => "has_many",
        }
    }

    /// Filters submitted values against a choice list.
    pub fn accepts_choices(&self) -> bool {
        matches!(
            self,
            InputKind::Select
                | InputKind::CollectionCheckboxes
                | InputKind::CollectionRadioButtons
                | InputKind::BelongsTo
                | InputKind::HasMany
        )
    }
}

/// The HTML `type` of an input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    Text,
    Password,
    Email,
    Url,
    Tel,
    Search,
    Number,
    Range,
    Date,
    Time,
    DatetimeLocal,
    Color,
    Checkbox,
    Radio,
    File,
    Hidden,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
            InputType::Email => "email",
            InputType::Url => "url",
            InputType::Tel => "tel",
            InputType::Search => "search",
            InputType::Number => "number",
            InputType::Range => "range",
            InputType::Date => "date",
            InputType::Time => "time",
            InputType::DatetimeLocal => "datetime-local",
            InputType::Color => "color",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::File => "file",
            InputType::Hidden => "hidden",
        }
    }
}

/// Per-component overrides. Unset options fall back to the field's inference.
#[derive(Debug, Clone, Default)]
pub struct InputOptions {
    pub input_type: Option<InputType>,
    /// Key the extracted value is stored under
    pub input_param: Option<String>,
    pub checked_value: Option<String>,
    pub unchecked_value: Option<String>,
    pub multiple: Option<bool>,
    pub include_blank: Option<bool>,
    pub choices: Option<Choices>,
    pub value_attribute: Option<String>,
    pub label_attribute: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputComponent {
    pub kind: InputKind,
    /// Key the submitted value is read from
    pub param_key: String,
    /// Key the extracted value is stored under
    pub input_param: String,
    pub attributes: Attributes,
    pub checked_value: String,
    pub unchecked_value: String,
    /// Permitted values, for choice-backed components
    pub choices: Option<ChoiceList>,
    /// Whether a single select offers a blank option
    pub include_blank: bool,
}

impl InputComponent {
    fn build(field: &Field, kind: InputKind, options: InputOptions) -> Result<Self, FormError> {
        let config = field.context.config();
        let input_param = match (options.input_param, kind) {
            (Some(input_param), _) => input_param,
            (None, InputKind::BelongsTo) => {
                let association = field.association().ok_or_else(|| missing_association(field, kind))?;
                association
                    .foreign_key
                    .clone()
                    .unwrap_or_else(|| format!("{}_id", association.name))
            }
            (None, InputKind::HasMany) => {
                let association = field.association().ok_or_else(|| missing_association(field, kind))?;
                format!("{}_ids", singularize(&association.name))
            }
            (None, _) => field.key_name(),
        };

        let multiple = match kind {
            InputKind::Select | InputKind::FileInput => {
                options.multiple.unwrap_or_else(|| field.multiple())
            }
            InputKind::HasMany | InputKind::CollectionCheckboxes | InputKind::InputArray => true,
            _ => false,
        };

        let choices = if !kind.accepts_choices() {
            None
        } else if options.choices.is_some()
            || options.value_attribute.is_some()
            || options.label_attribute.is_some()
        {
            let mapper = match options.choices.clone().or_else(|| field.choices()) {
                Some(source) => ChoicesMapper::with_accessors(
                    &source,
                    options.value_attribute.as_deref(),
                    options.label_attribute.as_deref(),
                )?,
                None => ChoicesMapper::default(),
            };
            Some(ChoiceList::Flat(mapper))
        } else {
            Some(field.choice_list()?.cloned().unwrap_or_else(empty_choices))
        };

        let input_type = match kind {
            InputKind::Checkbox => Some(InputType::Checkbox),
            InputKind::RadioButton => Some(InputType::Radio),
            InputKind::FileInput => Some(InputType::File),
            InputKind::Hidden => Some(InputType::Hidden),
            InputKind::Input => Some(options.input_type.unwrap_or_else(|| field.input_type())),
            _ => None,
        };

        let checked_value = options
            .checked_value
            .unwrap_or_else(|| config.checked_value.clone());
        let unchecked_value = options
            .unchecked_value
            .unwrap_or_else(|| config.unchecked_value.clone());

        let mut attributes = Attributes {
            id: field.dom.id.clone(),
            name: if kind == InputKind::RadioButton {
                field.dom.single_name().to_string()
            } else if multiple {
                field.dom.multiple_name()
            } else {
                field.dom.name.clone()
            },
            input_type,
            disabled: field.disabled(),
            multiple,
            ..Attributes::default()
        };
        attributes.value = match kind {
            InputKind::Checkbox | InputKind::RadioButton => Some(checked_value.clone()),
            InputKind::Input | InputKind::Textarea | InputKind::Hidden => Some(field.dom_value()),
            _ => None,
        };
        attributes.checked = match kind {
            InputKind::Checkbox => Some(checkbox_checked(
                &field.dom_value(),
                &checked_value,
                &unchecked_value,
            )),
            InputKind::RadioButton => Some(field.dom_value() == checked_value),
            _ => None,
        };
        apply_constraints(&mut attributes, field, kind);
        attributes.classes = Attributes::state_classes(
            kind.as_str(),
            attributes.required,
            field.has_errors(),
            attributes.readonly,
            attributes.disabled,
        );

        Ok(InputComponent {
            kind,
            param_key: field.key_name(),
            input_param,
            attributes,
            checked_value,
            unchecked_value,
            choices,
            include_blank: options
                .include_blank
                .unwrap_or(config.include_blank_choice && !multiple),
        })
    }

    /// `{input_param => normalized value}` read from `params[param_key]`.
    ///
    /// An unchecked radio button yields an empty map.
    pub fn extract_input(&self, params: &Params) -> ParamMap {
        let raw = params.get_or_null(&self.param_key);
        let value = match self.kind {
            InputKind::FileInput => Some(raw.clone()),
            InputKind::Checkbox => Some(Params::text(self.normalize_checkbox(raw))),
            InputKind::RadioButton => self
                .normalize_simple(raw)
                .filter(|value| *value == self.checked_value)
                .map(Params::Text),
            _ if self.attributes.multiple => Some(Params::Array(
                self.positional_values(raw)
                    .filter_map(|value| self.normalize_simple(value))
                    .map(Params::Text)
                    .collect(),
            )),
            _ => Some(self.normalize_simple(raw).map_or(Params::Null, Params::Text)),
        };
        let mut extracted = ParamMap::default();
        if let Some(value) = value {
            extracted.insert(self.input_param.clone(), value);
        }
        extracted
    }

    fn positional_values<'p>(&self, raw: &'p Params) -> Box<dyn Iterator<Item = &'p Params> + 'p> {
        match raw {
            Params::Null => Box::new(core::iter::empty()),
            Params::Text(_) => Box::new(core::iter::once(raw)),
            Params::Array(values) => Box::new(values.iter()),
            Params::Map(map) => Box::new(map.values()),
        }
    }

    /// Non-blank text that passes the choice filter, if there is one.
    fn normalize_simple(&self, raw: &Params) -> Option<String> {
        let Params::Text(text) = raw else {
            if !raw.is_null() {
                debug!(param = %self.param_key, kind = %raw.kind(), "discarding structured value for a scalar input");
            }
            return None;
        };
        if raw.is_blank() {
            return None;
        }
        match &self.choices {
            Some(choices) if !choices.contains(text) => {
                debug!(param = %self.param_key, value = %text, "discarding value outside of choices");
                None
            }
            _ => Some(text.clone()),
        }
    }

    fn normalize_checkbox(&self, raw: &Params) -> String {
        match raw.as_str() {
            Some(value) if value == self.checked_value || value == self.unchecked_value => {
                value.to_string()
            }
            _ => self.unchecked_value.clone(),
        }
    }

    /// The `(name, value)` pairs a browser submits for `value`.
    pub fn submission_pairs(&self, value: &Value) -> Vec<(String, String)> {
        let name = &self.attributes.name;
        let dom_value = value.to_param().unwrap_or_default();
        match self.kind {
            InputKind::FileInput => Vec::new(),
            InputKind::Checkbox => {
                let mut pairs = vec![(name.clone(), self.unchecked_value.clone())];
                if checkbox_checked(&dom_value, &self.checked_value, &self.unchecked_value) {
                    pairs.push((name.clone(), self.checked_value.clone()));
                }
                pairs
            }
            InputKind::RadioButton if dom_value == self.checked_value => {
                vec![(name.clone(), dom_value)]
            }
            InputKind::RadioButton => Vec::new(),
            _ if self.attributes.multiple => core::iter::once((name.clone(), String::new()))
                .chain(
                    value
                        .to_array()
                        .iter()
                        .filter_map(Value::to_param)
                        .map(|element| (name.clone(), element)),
                )
                .collect(),
            _ => vec![(name.clone(), dom_value)],
        }
    }
}

fn empty_choices() -> ChoiceList {
    ChoiceList::Flat(ChoicesMapper::default())
}

fn missing_association(field: &Field, kind: InputKind) -> FormError {
    FormError::MissingAssociation {
        name: field.dom.name.clone(),
        component: kind.as_str().to_string(),
    }
}

/// With the default checked value anything but `""`, `"0"` and `"false"`
/// counts as checked; custom checked values must match exactly.
fn checkbox_checked(dom_value: &str, checked_value: &str, unchecked_value: &str) -> bool {
    if dom_value == unchecked_value {
        return false;
    }
    if checked_value == "1" {
        !["", "0", "false"].contains(&dom_value)
    } else {
        dom_value == checked_value
    }
}

fn apply_constraints(attributes: &mut Attributes, field: &Field, kind: InputKind) {
    match kind {
        InputKind::Select | InputKind::BelongsTo | InputKind::HasMany => {
            attributes.required = field.required();
            attributes.size = field.limit();
            return;
        }
        InputKind::Textarea => {
            attributes.placeholder = field.placeholder().map(str::to_string);
            attributes.minlength = field.minlength();
            attributes.maxlength = field.maxlength();
            attributes.readonly = field.readonly();
            attributes.required = field.required();
            return;
        }
        _ => {}
    }
    let Some(input_type) = attributes.input_type else {
        return;
    };
    match input_type {
        InputType::Text
        | InputType::Password
        | InputType::Email
        | InputType::Tel
        | InputType::Url
        | InputType::Search => {
            attributes.placeholder = field.placeholder().map(str::to_string);
            attributes.minlength = field.minlength();
            attributes.maxlength = field.maxlength();
            attributes.readonly = field.readonly();
            attributes.required = field.required();
            attributes.pattern = field.pattern();
        }
        InputType::Number => {
            attributes.placeholder = field.placeholder().map(str::to_string);
            attributes.readonly = field.readonly();
            attributes.required = field.required();
            attributes.min = field.min();
            attributes.max = field.max();
            attributes.step = field.step();
        }
        InputType::Checkbox | InputType::Radio | InputType::File => {
            attributes.required = field.required();
        }
        InputType::Date | InputType::Time | InputType::DatetimeLocal => {
            attributes.readonly = field.readonly();
            attributes.required = field.required();
            attributes.min = field.min();
            attributes.max = field.max();
        }
        InputType::Range => {
            attributes.min = field.min();
            attributes.max = field.max();
            attributes.step = field.step();
        }
        InputType::Color | InputType::Hidden => {}
    }
}

impl Field {
    /// Registers the input component of this field. A field holds at most one.
    pub fn input_component(
        &mut self,
        kind: InputKind,
        options: InputOptions,
    ) -> Result<&InputComponent, FormError> {
        if let Some(existing) = &self.input {
            return Err(FormError::InputAlreadyDefined {
                name: self.dom.name.clone(),
                existing: existing.kind.as_str().to_string(),
            });
        }
        let component = InputComponent::build(self, kind, options)?;
        if kind == InputKind::FileInput {
            self.context.mark_file_input();
        }
        debug!(name = %self.dom.name, kind = kind.as_str(), "registered input component");
        Ok(self.input.insert(component))
    }

    /// Registers the component [`Field::inferred_component`] picks.
    pub fn auto_input(&mut self) -> Result<&InputComponent, FormError> {
        let kind = self.inferred_component();
        self.input_component(kind, InputOptions::default())
    }

    pub fn input_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::Input, InputOptions::default())
    }

    pub fn textarea_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::Textarea, InputOptions::default())
    }

    pub fn hidden_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::Hidden, InputOptions::default())
    }

    pub fn select_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::Select, InputOptions::default())
    }

    pub fn checkbox_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::Checkbox, InputOptions::default())
    }

    pub fn radio_button_tag(&mut self, checked_value: impl Into<String>) -> Result<&InputComponent, FormError> {
        self.input_component(
            InputKind::RadioButton,
            InputOptions {
                checked_value: Some(checked_value.into()),
                ..InputOptions::default()
            },
        )
    }

    pub fn collection_checkboxes_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::CollectionCheckboxes, InputOptions::default())
    }

    pub fn collection_radio_buttons_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::CollectionRadioButtons, InputOptions::default())
    }

    pub fn input_array_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::InputArray, InputOptions::default())
    }

    pub fn file_input_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::FileInput, InputOptions::default())
    }

    pub fn belongs_to_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::BelongsTo, InputOptions::default())
    }

    pub fn has_many_tag(&mut self) -> Result<&InputComponent, FormError> {
        self.input_component(InputKind::HasMany, InputOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormConfig;
    use crate::field::FieldOptions;
    use crate::object::{Association, AssociationKind};

    #[derive(Debug)]
    struct Article {
        published: Value,
    }

    impl Bindable for Article {
        fn read_attribute(&self, key: &str) -> Option<Value> {
            match key {
                "published" => Some(self.published.clone()),
                "title" => Some("Draft".into()),
                _ => None,
            }
        }

        fn association(&self, key: &str) -> Option<Association> {
            match key {
                "author" => Some(
                    Association::new(AssociationKind::BelongsTo, "author", "User")
                        .with_candidates(Choices::pairs([("Ann", "1"), ("Bob", "2")])),
                ),
                "categories" => Some(
                    Association::new(AssociationKind::HasMany, "categories", "Category")
                        .with_candidates(vec!["1", "2", "3"]),
                ),
                _ => None,
            }
        }
    }

    fn field_on(object: Article, key: &str) -> Field {
        let root = Node::root(Key::Name("article".into()), NodeKind::Namespace);
        Field::new(
            root.child(Key::Name(key.into()), NodeKind::Field),
            Some(Rc::new(object)),
            None,
            FieldOptions::default(),
            Rc::new(FormContext::new(FormConfig::default())),
        )
    }

    fn article(key: &str) -> Field {
        field_on(
            Article {
                published: Value::Null,
            },
            key,
        )
    }

    fn params(pairs: &[(&str, Params)]) -> Params {
        Params::Map(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        )
    }

    fn extracted(field: &Field, params: &Params) -> ParamMap {
        field.extract_input(params).unwrap()
    }

    #[test]
    fn test_second_input_component_is_rejected() {
        let mut title = article("title");
        title.input_tag().unwrap();
        assert_eq!(
            title.textarea_tag().unwrap_err(),
            FormError::InputAlreadyDefined {
                name: "article[title]".into(),
                existing: "input".into(),
            }
        );
    }

    #[test]
    fn test_text_input_attributes() {
        let mut title = article("title");
        title.set_placeholder("A catchy title");
        let input = title.input_tag().unwrap();
        assert_eq!(input.attributes.id, "article_title");
        assert_eq!(input.attributes.name, "article[title]");
        assert_eq!(input.attributes.value.as_deref(), Some("Draft"));
        assert_eq!(input.attributes.input_type, Some(InputType::Text));
        assert_eq!(input.attributes.placeholder.as_deref(), Some("A catchy title"));
        assert!(input.attributes.has_class("optional"));
    }

    #[test]
    fn test_text_extraction_blank_is_null() {
        let mut title = article("title");
        title.input_tag().unwrap();
        let map = extracted(&title, &params(&[("title", Params::text("  "))]));
        assert_eq!(map.get("title"), Some(&Params::Null));
        let map = extracted(&title, &params(&[("title", Params::text("Hi"))]));
        assert_eq!(map.get("title"), Some(&Params::text("Hi")));
        let map = extracted(&title, &Params::Null);
        assert_eq!(map.get("title"), Some(&Params::Null));
    }

    #[test]
    fn test_checkbox_extraction() {
        let mut published = article("published");
        published.checkbox_tag().unwrap();
        let read = |value: Params| extracted(&published, &params(&[("published", value)]));
        assert_eq!(read(Params::text("1")).get("published"), Some(&Params::text("1")));
        assert_eq!(read(Params::text("0")).get("published"), Some(&Params::text("0")));
        assert_eq!(read(Params::text("yes")).get("published"), Some(&Params::text("0")));
        assert_eq!(
            extracted(&published, &Params::Null).get("published"),
            Some(&Params::text("0"))
        );
    }

    #[test]
    fn test_checkbox_checked_state() {
        let checked = |value: Value| {
            let mut field = field_on(Article { published: value }, "published");
            let checked = field.checkbox_tag().unwrap().attributes.checked;
            checked
        };
        assert_eq!(checked(Value::Bool(true)), Some(true));
        assert_eq!(checked(Value::Bool(false)), Some(false));
        assert_eq!(checked(Value::from("0")), Some(false));
        assert_eq!(checked(Value::Null), Some(false));
        assert_eq!(checked(Value::from(1)), Some(true));
    }

    #[test]
    fn test_checkbox_submission_pairs() {
        let mut published = field_on(
            Article {
                published: Value::Bool(true),
            },
            "published",
        );
        published.checkbox_tag().unwrap();
        assert_eq!(
            published.submission_pairs(),
            vec![
                ("article[published]".to_string(), "0".to_string()),
                ("article[published]".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_radio_button_omits_unchecked() {
        let mut size = article("size");
        size.radio_button_tag("large").unwrap();
        assert!(extracted(&size, &params(&[("size", Params::text("small"))])).is_empty());
        assert!(extracted(&size, &Params::Null).is_empty());
        let map = extracted(&size, &params(&[("size", Params::text("large"))]));
        assert_eq!(map.get("size"), Some(&Params::text("large")));
    }

    #[test]
    fn test_select_filters_by_choices() {
        let mut rating = article("rating");
        rating.set_choices(1..=5_i64);
        let select = rating.select_tag().unwrap();
        assert!(select.include_blank);
        assert!(!select.attributes.multiple);
        let read = |value: &str| {
            extracted(&rating, &params(&[("rating", Params::text(value))]))
                .get("rating")
                .cloned()
        };
        assert_eq!(read("3"), Some(Params::text("3")));
        assert_eq!(read("0"), Some(Params::Null));
        assert_eq!(read(""), Some(Params::Null));
    }

    #[test]
    fn test_multiple_select() {
        let mut ratings = article("ratings");
        ratings.set_choices(1..=5_i64).set_multiple(true);
        let select = ratings.select_tag().unwrap();
        assert_eq!(select.attributes.name, "article[ratings][]");
        assert!(!select.include_blank);
        let submitted = Params::Array(
            ["1", "4", "9", ""].into_iter().map(Params::text).collect(),
        );
        let map = extracted(&ratings, &params(&[("ratings", submitted)]));
        assert_eq!(
            map.get("ratings"),
            Some(&Params::Array(vec![Params::text("1"), Params::text("4")]))
        );
        let map = extracted(&ratings, &Params::Null);
        assert_eq!(map.get("ratings"), Some(&Params::Array(vec![])));
    }

    #[test]
    fn test_belongs_to_extracts_foreign_key() {
        let mut author = article("author");
        let component = author.belongs_to_tag().unwrap();
        assert_eq!(component.input_param, "author_id");
        assert_eq!(component.attributes.name, "article[author]");
        let map = extracted(&author, &params(&[("author", Params::text("2"))]));
        assert_eq!(map.get("author_id"), Some(&Params::text("2")));
        let map = extracted(&author, &params(&[("author", Params::text("7"))]));
        assert_eq!(map.get("author_id"), Some(&Params::Null));
    }

    #[test]
    fn test_has_many_extracts_ids() {
        let mut categories = article("categories");
        let component = categories.has_many_tag().unwrap();
        assert_eq!(component.input_param, "category_ids");
        assert!(component.attributes.multiple);
        let submitted = Params::Array(vec![Params::text(""), Params::text("3")]);
        let map = extracted(&categories, &params(&[("categories", submitted)]));
        assert_eq!(map.get("category_ids"), Some(&Params::Array(vec![Params::text("3")])));
    }

    #[test]
    fn test_association_components_need_an_association() {
        let mut title = article("title");
        assert_eq!(
            title.belongs_to_tag().unwrap_err(),
            FormError::MissingAssociation {
                name: "article[title]".into(),
                component: "belongs_to".into(),
            }
        );
    }

    #[test]
    fn test_file_input_marks_form() {
        let mut avatar = article("avatar");
        assert!(!avatar.context().has_file_input());
        avatar.file_input_tag().unwrap();
        assert!(avatar.context().has_file_input());
        let upload = params(&[("avatar", Params::text("blob"))]);
        assert_eq!(extracted(&avatar, &upload).get("avatar"), Some(&Params::text("blob")));
        assert!(avatar.submission_pairs().is_empty());
    }

    #[test]
    fn test_number_constraints() {
        let mut age = article("age");
        age.set_input_type(InputType::Number).set_min(0).set_max(120);
        let input = age.input_tag().unwrap();
        assert_eq!(input.attributes.min, Some(Number::from(0)));
        assert_eq!(input.attributes.max, Some(Number::from(120)));
        assert_eq!(input.attributes.step, Some(Step::By(Number::from(1))));
    }
}

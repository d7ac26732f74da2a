//! The root of a form tree.

use core::fmt::Display;
use core::ops::{Deref, DerefMut};
use std::cell::Cell;

use tracing::debug;

use crate::config::FormConfig;
use crate::inflect::humanize;
use crate::namespace::Namespace;
use crate::prelude_internal::*;

/// State shared by every node of one form.
#[derive(Debug, Default)]
pub struct FormContext {
    config: FormConfig,
    has_file_input: Cell<bool>,
}

impl FormContext {
    pub fn new(config: FormConfig) -> Self {
        Self {
            config,
            has_file_input: Cell::new(false),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Whether any field registered a file input, so the form must be multipart.
    pub fn has_file_input(&self) -> bool {
        self.has_file_input.get()
    }

    pub(crate) fn mark_file_input(&self) {
        self.has_file_input.set(true);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubmitType {
    Create,
    Update,
    /// The object cannot tell whether it is saved, or there is no object
    Submit,
}

impl SubmitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmitType::Create => "create",
            SubmitType::Update => "update",
            SubmitType::Submit => "submit",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    /// Root key; defaults to the object's model name
    pub key: Option<String>,
    pub method: Option<Method>,
    pub action: Option<String>,
    pub config: FormConfig,
}

/// A root [`Namespace`] plus form-level metadata. Dereferences to the root
/// namespace for declaring fields.
#[derive(Debug)]
pub struct Form {
    root: Namespace,
    object: Option<Rc<dyn Bindable>>,
    method: Option<Method>,
    action: Option<String>,
    context: Rc<FormContext>,
}

impl Form {
    /// A form over a bare key, with no bound object.
    pub fn new(key: &str) -> Result<Self, FormError> {
        Self::build(
            None,
            FormOptions {
                key: Some(key.to_string()),
                ..FormOptions::default()
            },
        )
    }

    /// A form keyed by the object's model name.
    pub fn for_object(object: Rc<dyn Bindable>) -> Result<Self, FormError> {
        Self::build(Some(object), FormOptions::default())
    }

    pub fn build(object: Option<Rc<dyn Bindable>>, options: FormOptions) -> Result<Self, FormError> {
        let key = options
            .key
            .or_else(|| Some(object.as_ref()?.model_name()?.param_key))
            .ok_or(FormError::MissingFormKey)?;
        let context = Rc::new(FormContext::new(options.config));
        let root = Namespace::root(Key::name(key)?, object.clone(), Rc::clone(&context));
        debug!(key = %root.key(), bound = object.is_some(), "building form");
        Ok(Self {
            root,
            object,
            method: options.method,
            action: options.action,
            context,
        })
    }

    pub fn namespace(&self) -> &Namespace {
        &self.root
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn config(&self) -> &FormConfig {
        self.context.config()
    }

    fn persisted(&self) -> Option<bool> {
        self.object.as_ref()?.is_persisted()
    }

    /// Explicit, else `patch` for a saved object, `post` for any other
    /// object, and `get` without one.
    pub fn method(&self) -> Method {
        if let Some(method) = self.method {
            return method;
        }
        match (&self.object, self.persisted()) {
            (None, _) => Method::Get,
            (Some(_), Some(true)) => Method::Patch,
            (Some(_), _) => Method::Post,
        }
    }

    /// The method a browser can send: `get` or `post`.
    pub fn standard_method(&self) -> Method {
        match self.method() {
            Method::Get => Method::Get,
            _ => Method::Post,
        }
    }

    /// The value of the hidden `_method` field, for methods browsers cannot send.
    pub fn method_override(&self) -> Option<Method> {
        match self.method() {
            Method::Get | Method::Post => None,
            method => Some(method),
        }
    }

    pub fn submit_type(&self) -> SubmitType {
        match self.persisted() {
            Some(true) => SubmitType::Update,
            Some(false) => SubmitType::Create,
            None => SubmitType::Submit,
        }
    }

    /// `"Create User"`, `"Update User"` or `"Submit Search"`.
    pub fn submit_label(&self) -> String {
        let model = self
            .object
            .as_ref()
            .and_then(|object| object.model_name())
            .map(|model_name| model_name.human)
            .unwrap_or_else(|| humanize(&self.root.key().to_string()));
        format!("{} {model}", humanize(self.submit_type().as_str()))
    }

    /// `key` plus the object's primary key, or `new` for an unsaved object.
    pub fn dom_id(&self) -> String {
        self.root.dom_id()
    }

    pub fn has_file_input(&self) -> bool {
        self.context.has_file_input()
    }

    /// Reads a whole submitted parameter tree, keyed by the form key at the
    /// top level, back into the declared structure.
    pub fn extract_input(&self, params: &Params) -> Result<Params, FormError> {
        self.root.extract_input(params).map(Params::Map)
    }
}

impl Deref for Form {
    type Target = Namespace;

    fn deref(&self) -> &Self::Target {
        &self.root
    }
}

impl DerefMut for Form {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::ModelName;

    #[derive(Debug)]
    struct User {
        persisted: Option<bool>,
    }

    impl Bindable for User {
        fn read_attribute(&self, key: &str) -> Option<Value> {
            (key == "email").then(|| Value::from("ann@example.com"))
        }

        fn is_persisted(&self) -> Option<bool> {
            self.persisted
        }

        fn model_name(&self) -> Option<ModelName> {
            Some(ModelName {
                param_key: "user".into(),
                human: "User".into(),
            })
        }

        fn primary_key(&self) -> Option<Value> {
            Some(if self.persisted == Some(true) {
                Value::from(7)
            } else {
                Value::Null
            })
        }
    }

    fn user_form(persisted: Option<bool>) -> Form {
        Form::for_object(Rc::new(User { persisted })).unwrap()
    }

    #[test]
    fn test_key_from_model_name() {
        let form = user_form(Some(false));
        assert_eq!(form.key(), &Key::Name("user".into()));
        assert_eq!(form.dom_id(), "user_new");
        assert_eq!(user_form(Some(true)).dom_id(), "user_7");
    }

    #[test]
    fn test_explicit_key_wins() {
        let form = Form::build(
            Some(Rc::new(User { persisted: None })),
            FormOptions {
                key: Some("account".into()),
                ..FormOptions::default()
            },
        )
        .unwrap();
        assert_eq!(form.key(), &Key::Name("account".into()));
    }

    #[test]
    fn test_missing_key() {
        #[derive(Debug)]
        struct Anonymous;

        impl Bindable for Anonymous {
            fn read_attribute(&self, _key: &str) -> Option<Value> {
                None
            }
        }

        assert_eq!(
            Form::for_object(Rc::new(Anonymous)).unwrap_err(),
            FormError::MissingFormKey
        );
        assert_eq!(Form::new("").unwrap_err(), FormError::Key(KeyError::Empty));
    }

    #[test]
    fn test_method_inference() {
        assert_eq!(user_form(Some(true)).method(), Method::Patch);
        assert_eq!(user_form(Some(false)).method(), Method::Post);
        assert_eq!(user_form(None).method(), Method::Post);
        assert_eq!(Form::new("search").unwrap().method(), Method::Get);
    }

    #[test]
    fn test_method_override() {
        let form = user_form(Some(true));
        assert_eq!(form.standard_method(), Method::Post);
        assert_eq!(form.method_override(), Some(Method::Patch));
        let search = Form::new("search").unwrap();
        assert_eq!(search.standard_method(), Method::Get);
        assert_eq!(search.method_override(), None);
    }

    #[test]
    fn test_submit_type_and_label() {
        assert_eq!(user_form(Some(false)).submit_label(), "Create User");
        assert_eq!(user_form(Some(true)).submit_label(), "Update User");
        let search = Form::new("site_search").unwrap();
        assert_eq!(search.submit_type(), SubmitType::Submit);
        assert_eq!(search.submit_label(), "Submit Site search");
    }

    #[test]
    fn test_fields_through_deref() {
        let mut form = user_form(Some(false));
        let email = form.field("email").unwrap();
        assert_eq!(email.value(), &Value::from("ann@example.com"));
        assert_eq!(email.dom().name, "user[email]");
    }

    #[test]
    fn test_file_input_is_seen_at_the_root() {
        let mut form = user_form(Some(false));
        assert!(!form.has_file_input());
        form.nest_one("profile")
            .unwrap()
            .field("avatar")
            .unwrap()
            .file_input_tag()
            .unwrap();
        assert!(form.has_file_input());
    }

    #[test]
    fn test_extract_input() {
        let mut form = user_form(Some(false));
        form.field("email").unwrap().input_tag().unwrap();
        let params = formwork_params::parse_query("user[email]=bo%40example.com&commit=Save").unwrap();
        let extracted = form.extract_input(&params).unwrap();
        assert_eq!(extracted, formwork_params::parse_query("user[email]=bo%40example.com").unwrap());
    }
}

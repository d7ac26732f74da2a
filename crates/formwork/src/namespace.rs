//! Composite nodes: memoized children and structured extraction.

use indexmap::map::Entry;
use tracing::trace;

use crate::field::{Field, FieldOptions};
use crate::inflect::underscore;
use crate::namespace_collection::{NamespaceBlock, NamespaceCollection};
use crate::prelude_internal::*;

/// A child of a [`Namespace`].
#[derive(Debug)]
pub enum Child {
    Field(Field),
    Namespace(Namespace),
    Collection(NamespaceCollection),
}

impl Child {
    pub fn node(&self) -> &Rc<Node> {
        match self {
            Child::Field(field) => field.node(),
            Child::Namespace(namespace) => namespace.node(),
            Child::Collection(collection) => collection.node(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        self.node().kind().as_str()
    }

    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Child::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Child::Namespace(namespace) => Some(namespace),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&NamespaceCollection> {
        match self {
            Child::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    /// The child's single-entry contribution to its parent's extracted map.
    pub fn extract_input(&self, params: &Params) -> Result<ParamMap, FormError> {
        match self {
            Child::Field(field) => field.extract_input(params),
            Child::Namespace(namespace) => namespace.extract_input(params),
            Child::Collection(collection) => collection.extract_input(params),
        }
    }

    fn collect_submission_pairs(&self, pairs: &mut Vec<(String, String)>) {
        match self {
            Child::Field(field) => pairs.extend(field.submission_pairs()),
            Child::Namespace(namespace) => namespace.collect_submission_pairs(pairs),
            Child::Collection(collection) => collection
                .namespaces()
                .iter()
                .for_each(|namespace| namespace.collect_submission_pairs(pairs)),
        }
    }

    fn collect_errors(&self, errors: &mut Vec<String>) {
        match self {
            Child::Field(field) => match &field.options().error {
                Some(error) => errors.push(error.clone()),
                None => errors.extend(field.full_errors()),
            },
            Child::Namespace(namespace) => namespace.collect_errors(errors),
            Child::Collection(collection) => collection
                .namespaces()
                .iter()
                .for_each(|namespace| namespace.collect_errors(errors)),
        }
    }
}

/// An internal node bound to a composite object.
///
/// Children are created on first request and memoized by key: asking twice
/// for the same key returns the same child, and asking for a key under a
/// different kind of child is an error.
#[derive(Debug)]
pub struct Namespace {
    node: Rc<Node>,
    dom: DomPath,
    object: Option<Rc<dyn Bindable>>,
    children: IndexMap<Key, Child>,
    context: Rc<FormContext>,
}

impl Namespace {
    pub fn root(key: Key, object: Option<Rc<dyn Bindable>>, context: Rc<FormContext>) -> Self {
        Self::new(Node::root(key, NodeKind::Namespace), object, context)
    }

    pub(crate) fn new(
        node: Rc<Node>,
        object: Option<Rc<dyn Bindable>>,
        context: Rc<FormContext>,
    ) -> Self {
        Self {
            dom: DomPath::resolve(&node),
            node,
            object,
            children: IndexMap::new(),
            context,
        }
    }

    pub fn key(&self) -> &Key {
        self.node.key()
    }

    pub fn node(&self) -> &Rc<Node> {
        &self.node
    }

    pub fn dom(&self) -> &DomPath {
        &self.dom
    }

    pub fn object(&self) -> Option<&Rc<dyn Bindable>> {
        self.object.as_ref()
    }

    pub(crate) fn context(&self) -> &Rc<FormContext> {
        &self.context
    }

    pub fn children(&self) -> impl Iterator<Item = (&Key, &Child)> {
        self.children.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Child> {
        self.children.get(&Key::Name(key.to_string()))
    }

    /// `key` followed by the object's primary key, or `new` when it is unsaved.
    pub fn dom_id(&self) -> String {
        let primary_key = self
            .object
            .as_ref()
            .and_then(|object| object.primary_key())
            .map(|primary_key| primary_key.to_param().unwrap_or_else(|| "new".to_string()));
        match primary_key {
            Some(primary_key) => underscore(&format!("{}_{primary_key}", self.key())),
            None => underscore(&self.key().to_string()),
        }
    }

    /// The field at `key`, created on first request with its value read from
    /// the bound object.
    pub fn field(&mut self, key: &str) -> Result<&mut Field, FormError> {
        self.field_entry(key, None)
    }

    /// Like [`Namespace::field`] with an explicit value. The value only applies
    /// when the field is created by this call.
    pub fn field_with_value(
        &mut self,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Field, FormError> {
        self.field_entry(key, Some(value.into()))
    }

    fn field_entry(&mut self, key: &str, value: Option<Value>) -> Result<&mut Field, FormError> {
        let key = Key::name(key)?;
        let child = match self.children.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(parent = %self.dom.name, key = %entry.key(), "creating field");
                let node = self.node.child(entry.key().clone(), NodeKind::Field);
                entry.insert(Child::Field(Field::new(
                    node,
                    self.object.clone(),
                    value,
                    FieldOptions::default(),
                    Rc::clone(&self.context),
                )))
            }
        };
        match child {
            Child::Field(field) => Ok(field),
            other => Err(kind_mismatch(other, NodeKind::Field)),
        }
    }

    /// A nested namespace bound to the object's `key` attribute, when that is an object.
    pub fn nest_one(&mut self, key: &str) -> Result<&mut Namespace, FormError> {
        let object = self.read_object(key);
        self.namespace_entry(key, object)
    }

    /// A nested namespace bound to `object`. The object only applies when the
    /// namespace is created by this call.
    pub fn nest_one_for(
        &mut self,
        key: &str,
        object: Rc<dyn Bindable>,
    ) -> Result<&mut Namespace, FormError> {
        self.namespace_entry(key, Some(object))
    }

    fn namespace_entry(
        &mut self,
        key: &str,
        object: Option<Rc<dyn Bindable>>,
    ) -> Result<&mut Namespace, FormError> {
        let key = Key::name(key)?;
        let child = match self.children.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(parent = %self.dom.name, key = %entry.key(), "creating namespace");
                let node = self.node.child(entry.key().clone(), NodeKind::Namespace);
                entry.insert(Child::Namespace(Namespace::new(
                    node,
                    object,
                    Rc::clone(&self.context),
                )))
            }
        };
        match child {
            Child::Namespace(namespace) => Ok(namespace),
            other => Err(kind_mismatch(other, NodeKind::Namespace)),
        }
    }

    /// One namespace per object of the `key` attribute, each configured by
    /// `block`. The block is kept to build the extraction template.
    pub fn nest_many(
        &mut self,
        key: &str,
        block: impl Fn(&mut Namespace) -> Result<(), FormError> + 'static,
    ) -> Result<&mut NamespaceCollection, FormError> {
        let objects = self
            .object
            .as_ref()
            .and_then(|object| object.read_attribute(key))
            .map(|value| {
                value
                    .to_array()
                    .iter()
                    .filter_map(|element| element.as_object().cloned())
                    .collect()
            })
            .unwrap_or_default();
        self.collection_entry(key, objects, Rc::new(block))
    }

    /// Like [`Namespace::nest_many`] over explicitly given objects.
    pub fn nest_many_for(
        &mut self,
        key: &str,
        objects: Vec<Rc<dyn Bindable>>,
        block: impl Fn(&mut Namespace) -> Result<(), FormError> + 'static,
    ) -> Result<&mut NamespaceCollection, FormError> {
        self.collection_entry(key, objects, Rc::new(block))
    }

    fn collection_entry(
        &mut self,
        key: &str,
        objects: Vec<Rc<dyn Bindable>>,
        block: NamespaceBlock,
    ) -> Result<&mut NamespaceCollection, FormError> {
        let key = Key::name(key)?;
        let child = match self.children.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                trace!(
                    parent = %self.dom.name,
                    key = %entry.key(),
                    len = objects.len(),
                    "creating namespace collection"
                );
                let node = self.node.child(entry.key().clone(), NodeKind::Collection);
                entry.insert(Child::Collection(NamespaceCollection::new(
                    node,
                    objects,
                    block,
                    Rc::clone(&self.context),
                )?))
            }
        };
        match child {
            Child::Collection(collection) => Ok(collection),
            other => Err(kind_mismatch(other, NodeKind::Collection)),
        }
    }

    fn read_object(&self, key: &str) -> Option<Rc<dyn Bindable>> {
        self.object
            .as_ref()?
            .read_attribute(key)?
            .as_object()
            .cloned()
    }

    /// Extracts `{key => {child results...}}` from the params at the parent's
    /// level. An array means this namespace is an element of a collection and
    /// the children read the first element directly, without wrapping.
    pub fn extract_input(&self, params: &Params) -> Result<ParamMap, FormError> {
        if let Params::Array(elements) = params {
            return self.extract_element(elements.first().unwrap_or(&Params::Null));
        }
        let key = self.key().to_string();
        let input = self.extract_element(params.get_or_null(&key))?;
        let mut extracted = ParamMap::default();
        extracted.insert(key, Params::Map(input));
        Ok(extracted)
    }

    /// Merges every child's extraction against `params`, this namespace's own slice.
    pub(crate) fn extract_element(&self, params: &Params) -> Result<ParamMap, FormError> {
        let mut extracted = ParamMap::default();
        for child in self.children.values() {
            extracted.merge(child.extract_input(params)?);
        }
        Ok(extracted)
    }

    /// Full error messages of every descendant field.
    pub fn errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        self.collect_errors(&mut errors);
        errors
    }

    fn collect_errors(&self, errors: &mut Vec<String>) {
        self.children
            .values()
            .for_each(|child| child.collect_errors(errors));
    }

    /// The `(name, value)` pairs a browser submits for every descendant input.
    pub fn submission_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        self.collect_submission_pairs(&mut pairs);
        pairs
    }

    fn collect_submission_pairs(&self, pairs: &mut Vec<(String, String)>) {
        self.children
            .values()
            .for_each(|child| child.collect_submission_pairs(pairs));
    }
}

fn kind_mismatch(existing: &Child, requested: NodeKind) -> FormError {
    FormError::ChildKindMismatch {
        key: existing.node().key().to_string(),
        existing: existing.kind_name(),
        requested: requested.as_str(),
    }
}

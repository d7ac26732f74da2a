//! Plural namespaces and the template used to read submitted arrays.

use tracing::debug;

use crate::namespace::Namespace;
use crate::prelude_internal::*;

/// Declares the children of one element namespace.
pub type NamespaceBlock = Rc<dyn Fn(&mut Namespace) -> Result<(), FormError>>;

/// One namespace per bound object, all declared by the same block.
///
/// Extraction never looks at the element namespaces. The block also runs
/// once at construction against an unbound template namespace, and every
/// submitted element is read with that template. The number of submitted
/// entries is independent of the number of bound objects, and extraction
/// never reads from a bound object.
pub struct NamespaceCollection {
    node: Rc<Node>,
    dom: DomPath,
    namespaces: Vec<Namespace>,
    template: Namespace,
}

impl core::fmt::Debug for NamespaceCollection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NamespaceCollection")
            .field("node", &self.node)
            .field("namespaces", &self.namespaces)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl NamespaceCollection {
    pub(crate) fn new(
        node: Rc<Node>,
        objects: Vec<Rc<dyn Bindable>>,
        block: NamespaceBlock,
        context: Rc<FormContext>,
    ) -> Result<Self, FormError> {
        let namespaces = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| {
                let mut namespace = Namespace::new(
                    node.child(Key::Index(index), NodeKind::Namespace),
                    Some(object),
                    Rc::clone(&context),
                );
                block(&mut namespace)?;
                Ok(namespace)
            })
            .collect::<Result<Vec<_>, FormError>>()?;
        let dom = DomPath::resolve(&node);
        debug!(collection = %dom.name, "building extraction template");
        let mut template = Namespace::new(
            node.child(Key::Index(0), NodeKind::Namespace),
            None,
            context,
        );
        block(&mut template)?;
        Ok(Self {
            dom,
            node,
            namespaces,
            template,
        })
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

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    pub fn namespaces(&self) -> &[Namespace] {
        &self.namespaces
    }

    pub fn namespaces_mut(&mut self) -> &mut [Namespace] {
        &mut self.namespaces
    }

    /// The namespace every submitted element is read with. It sits at index 0
    /// and has no bound object.
    pub fn template(&self) -> &Namespace {
        &self.template
    }

    /// `{key => [element results...]}`. Submitted maps are read positionally,
    /// and anything that is neither an array nor a map yields no elements.
    pub fn extract_input(&self, params: &Params) -> Result<ParamMap, FormError> {
        let template = &self.template;
        let key = self.key().to_string();
        let elements = params
            .get_or_null(&key)
            .positional()
            .into_iter()
            .map(|element| template.extract_element(element).map(Params::Map))
            .collect::<Result<Vec<_>, FormError>>()?;
        let mut extracted = ParamMap::default();
        extracted.insert(key, Params::Array(elements));
        Ok(extracted)
    }
}

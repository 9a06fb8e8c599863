//! Dependency resolver used to materialize handler classes at request time.
//!
//! Bindings are keyed by class identifier and the requested interface type,
//! so one class can be exposed under several traits.

use once_cell::sync::OnceCell;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use trellis_api::ClassName;

type Erased = Box<dyn Any + Send + Sync>;
type Factory = Box<dyn Fn() -> Erased + Send + Sync>;

enum Binding {
    Instance(Erased),
    Lazy {
        factory: Factory,
        instance: OnceCell<Erased>,
    },
}

impl Binding {
    fn resolve(&self) -> &(dyn Any + Send + Sync) {
        match self {
            Binding::Instance(value) => value.as_ref(),
            Binding::Lazy { factory, instance } => instance.get_or_init(|| factory()).as_ref(),
        }
    }
}

#[derive(Default)]
pub struct Container {
    bindings: HashMap<(ClassName, TypeId), Binding>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an already-built instance.
    pub fn bind<T>(&mut self, class: impl Into<ClassName>, instance: Arc<T>) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings.insert(
            (class.into(), TypeId::of::<Arc<T>>()),
            Binding::Instance(Box::new(instance)),
        );
        self
    }

    /// Bind a factory; the instance is built on first `get` and shared afterwards.
    pub fn bind_lazy<T, F>(&mut self, class: impl Into<ClassName>, factory: F) -> &mut Self
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<T> + Send + Sync + 'static,
    {
        self.bindings.insert(
            (class.into(), TypeId::of::<Arc<T>>()),
            Binding::Lazy {
                factory: Box::new(move || Box::new(factory()) as Erased),
                instance: OnceCell::new(),
            },
        );
        self
    }

    pub fn get<T>(&self, class: &ClassName) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings
            .get(&(class.clone(), TypeId::of::<Arc<T>>()))?
            .resolve()
            .downcast_ref::<Arc<T>>()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

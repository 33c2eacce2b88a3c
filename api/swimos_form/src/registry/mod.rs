// Copyright 2015-2023 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.



use crate::structural::read::event::ReadEvent;
use crate::structural::read::recognizer::{BoxedRecognizer, Recognizer, RecognizerReadable};
use crate::structural::read::ReadError;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tracing::debug;

type Factory<T> = Box<dyn Fn(&RecognizerRegistry) -> BoxedRecognizer<T> + Send + Sync>;

type FactoryMap = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Collects recognizer factories, keyed by the type they produce, before they are frozen into
/// a [`RecognizerRegistry`].
///
/// # Examples
///
/// ```
/// use swimos_form::registry::RegistryBuilder;
///
/// let registry = RegistryBuilder::default()
///     .register_readable::<i32>()
///     .register_readable::<String>()
///     .build();
/// assert!(registry.contains::<i32>());
/// assert!(!registry.contains::<bool>());
/// ```
#[derive(Default)]
pub struct RegistryBuilder {
    factories: FactoryMap,
    names: Vec<&'static str>,
}

impl Debug for RegistryBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("types", &self.names)
            .finish()
    }
}

impl RegistryBuilder {
    /// Register a factory for recognizers of `T`. Registering a second factory for the same type
    /// replaces the first. The factory is passed the frozen registry so that it can create
    /// [`ProxyRecognizer`]s for the types that `T` refers to (including `T` itself).
    pub fn register<T: 'static>(
        mut self,
        factory: impl Fn(&RecognizerRegistry) -> BoxedRecognizer<T> + Send + Sync + 'static,
    ) -> Self {
        let name = type_name::<T>();
        debug!(type_name = name, "Registering recognizer factory.");
        let boxed: Factory<T> = Box::new(factory);
        if self
            .factories
            .insert(TypeId::of::<T>(), Box::new(boxed))
            .is_none()
        {
            self.names.push(name);
        }
        self
    }

    /// Register the recognizer provided by the [`RecognizerReadable`] implementation of `T`.
    pub fn register_readable<T>(self) -> Self
    where
        T: RecognizerReadable + 'static,
        T::Rec: Send + 'static,
    {
        self.register::<T>(|_| Box::new(T::make_recognizer()))
    }

    /// Freeze the registered factories. The registry cannot be modified afterwards.
    pub fn build(self) -> RecognizerRegistry {
        let RegistryBuilder { factories, names } = self;
        debug!(types = ?names, "Recognizer registry frozen.");
        RecognizerRegistry {
            factories: Arc::new(factories),
            names: Arc::new(names),
        }
    }
}

/// An immutable map from types to factories for their recognizers. Cloning the registry is
/// cheap and all clones share the same factories.
#[derive(Clone, Default)]
pub struct RecognizerRegistry {
    factories: Arc<FactoryMap>,
    names: Arc<Vec<&'static str>>,
}

impl Debug for RecognizerRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognizerRegistry")
            .field("types", &self.names)
            .finish()
    }
}

impl RecognizerRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.factories.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Create a fresh recognizer for `T`, if a factory has been registered for it.
    pub fn recognizer_for<T: 'static>(&self) -> Option<BoxedRecognizer<T>> {
        let factory = self
            .factories
            .get(&TypeId::of::<T>())?
            .downcast_ref::<Factory<T>>()?;
        Some(factory(self))
    }

    /// Create a recognizer for `T` that looks up its delegate in this registry when it receives
    /// its first event.
    pub fn proxy<T: 'static>(&self) -> ProxyRecognizer<T> {
        ProxyRecognizer::new(self.clone())
    }
}

/// A [`Recognizer`] that stands in for one resolved from a [`RecognizerRegistry`]. This allows
/// recursive and mutually recursive types to refer to each other's recognizers without
/// constructing them eagerly.
pub struct ProxyRecognizer<T> {
    registry: RecognizerRegistry,
    delegate: Option<BoxedRecognizer<T>>,
}

impl<T> ProxyRecognizer<T> {
    pub fn new(registry: RecognizerRegistry) -> Self {
        ProxyRecognizer {
            registry,
            delegate: None,
        }
    }
}

impl<T: 'static> Recognizer for ProxyRecognizer<T> {
    type Target = T;

    fn feed_event(&mut self, input: ReadEvent) -> Option<Result<Self::Target, ReadError>> {
        if self.delegate.is_none() {
            match self.registry.recognizer_for::<T>() {
                Some(recognizer) => self.delegate = Some(recognizer),
                None => {
                    return Some(Err(ReadError::Message(format!(
                        "No recognizer registered for type {}.",
                        type_name::<T>()
                    ))))
                }
            }
        }
        self.delegate.as_mut()?.feed_event(input)
    }

    fn try_flush(&mut self) -> Option<Result<Self::Target, ReadError>> {
        self.delegate.as_mut()?.try_flush()
    }

    fn reset(&mut self) {
        if let Some(delegate) = self.delegate.as_mut() {
            delegate.reset();
        }
    }
}

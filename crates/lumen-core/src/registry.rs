// Copyright 2025 eraflo
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

//! The variant registry.
//!
//! Registration happens on a [`RegistryBuilder`] during startup. [`RegistryBuilder::build`]
//! freezes it into a [`VariantRegistry`], which has no mutating methods at all and
//! can be shared between threads. There is no process-global registry: whoever
//! decodes passes the registries they want consulted.

use crate::decoder::{decoder_for, DecodeFn};
use crate::node::Tag;
use crate::schema::Variant;
use std::collections::HashMap;
use std::fmt;

/// What a discriminant resolves to.
#[derive(Clone, Copy)]
pub struct VariantEntry {
    /// Creates the decoder for objects with this discriminant.
    pub decode: DecodeFn,
    /// The tag of the nodes that decoder produces.
    pub tag: Tag,
}

impl fmt::Debug for VariantEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantEntry").field("tag", &self.tag).finish()
    }
}

/// Collects variant registrations before they are frozen.
///
/// # Example
///
/// ```
/// use lumen_core::{Field, RegistryBuilder, Tag, Variant};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Fog;
///
/// impl Variant for Fog {
///     const KIND: &'static str = "VENDOR_fog";
///     fn fields() -> &'static [Field<Self>] {
///         &[]
///     }
/// }
///
/// let mut builder = RegistryBuilder::new();
/// let tag = builder.register::<Fog>();
/// let registry = builder.build();
///
/// assert_eq!(tag, Tag::of::<Fog>());
/// assert!(registry.resolve("VENDOR_fog").is_some());
/// assert!(registry.resolve("fog").is_none());
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: HashMap<String, VariantEntry>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers variant `V` under its own discriminant.
    pub fn register<V: Variant>(&mut self) -> Tag {
        self.register_as::<V>(V::KIND)
    }

    /// Registers variant `V` under another discriminant.
    pub fn register_as<V: Variant>(&mut self, name: &str) -> Tag {
        self.register_entry(name, decoder_for::<V>, Tag::of::<V>())
    }

    /// Registers a raw decode function and the tag it produces.
    ///
    /// Registering a name twice replaces the earlier entry and logs a warning.
    pub fn register_entry(&mut self, name: &str, decode: DecodeFn, tag: Tag) -> Tag {
        if let Some(previous) = self
            .entries
            .insert(name.to_string(), VariantEntry { decode, tag })
        {
            log::warn!(
                "Variant '{name}' re-registered: {:?} replaced by {:?}",
                previous.tag,
                tag
            );
        }
        tag
    }

    /// Freezes the registrations.
    #[must_use]
    pub fn build(self) -> VariantRegistry {
        log::debug!("Variant registry frozen with {} entries", self.entries.len());
        VariantRegistry {
            entries: self.entries,
        }
    }
}

/// A frozen, read-only map from discriminant to variant.
#[derive(Debug, Default, Clone)]
pub struct VariantRegistry {
    entries: HashMap<String, VariantEntry>,
}

impl VariantRegistry {
    /// Returns a registry that resolves nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Looks up a discriminant.
    pub fn resolve(&self, name: &str) -> Option<VariantEntry> {
        self.entries.get(name).copied()
    }

    /// Returns `true` if `name` resolves.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates over the registered discriminants, in no particular order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of registered discriminants.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Field;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Haze;

    impl Variant for Haze {
        const KIND: &'static str = "haze";
        fn fields() -> &'static [Field<Self>] {
            &[]
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Mist;

    impl Variant for Mist {
        const KIND: &'static str = "mist";
        fn fields() -> &'static [Field<Self>] {
            &[]
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut builder = RegistryBuilder::new();
        builder.register::<Haze>();
        builder.register_as::<Mist>("VENDOR_mist");
        let registry = builder.build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve("haze").map(|e| e.tag), Some(Tag::of::<Haze>()));
        assert_eq!(
            registry.resolve("VENDOR_mist").map(|e| e.tag),
            Some(Tag::of::<Mist>())
        );
        assert!(registry.resolve("mist").is_none());
    }

    #[test]
    fn test_re_registration_overwrites() {
        let mut builder = RegistryBuilder::new();
        builder.register_as::<Haze>("fx");
        builder.register_as::<Mist>("fx");
        let registry = builder.build();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("fx").map(|e| e.tag), Some(Tag::of::<Mist>()));
    }

    #[test]
    fn test_resolved_decoder_builds_the_tagged_body() {
        let mut builder = RegistryBuilder::new();
        builder.register::<Haze>();
        let entry = builder.build().resolve("haze").unwrap();

        let body = (entry.decode)("haze").finish(true).unwrap();
        assert_eq!(body.tag(), entry.tag);
    }

    #[test]
    fn test_empty_registry() {
        let registry = VariantRegistry::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.kinds().count(), 0);
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VariantRegistry>();
    }
}

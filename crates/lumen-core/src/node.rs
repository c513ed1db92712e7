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

//! The tagged node model.
//!
//! A [`Node`] is the base contract (discriminant plus optional name) wrapped around
//! a type-erased variant body. Core variants and extension variants are stored
//! the same way; the [`Tag`] says which one a node holds.

use crate::schema::{FieldType, FieldValue, Variant};
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a variant type independently of the discriminant string it was
/// decoded from.
#[derive(Clone, Copy)]
pub struct Tag {
    id: TypeId,
    type_name: &'static str,
}

impl Tag {
    /// Returns the tag of variant type `V`.
    pub fn of<V: Any>() -> Self {
        Self {
            id: TypeId::of::<V>(),
            type_name: std::any::type_name::<V>(),
        }
    }

    /// Returns the Rust type name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Tag {}

impl Hash for Tag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self.type_name)
    }
}

/// A snapshot of one field, in canonical order, as the encoder sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSlot {
    /// Property name on the wire.
    pub name: &'static str,
    /// Wire type.
    pub ty: FieldType,
    /// Current value.
    pub value: FieldValue,
    /// Documented default, `None` when the field is required.
    pub default: Option<FieldValue>,
}

/// The object-safe face of a [`Variant`], implemented for every variant.
pub trait VariantBody: fmt::Debug + Send + Sync {
    /// The tag of the concrete variant type.
    fn tag(&self) -> Tag;
    /// The variant's own discriminant.
    fn default_kind(&self) -> &'static str;
    /// Current field values in canonical order.
    fn field_slots(&self) -> Vec<FieldSlot>;
    /// Clones the body behind a new box.
    fn clone_body(&self) -> Box<dyn VariantBody>;
    /// Compares with another body of possibly different type.
    fn eq_body(&self, other: &dyn VariantBody) -> bool;
    /// Upcasts to `Any` for downcasting to the concrete variant.
    fn as_any(&self) -> &dyn Any;
}

impl<V: Variant> VariantBody for V {
    fn tag(&self) -> Tag {
        Tag::of::<V>()
    }

    fn default_kind(&self) -> &'static str {
        V::KIND
    }

    fn field_slots(&self) -> Vec<FieldSlot> {
        V::fields()
            .iter()
            .map(|field| FieldSlot {
                name: field.name,
                ty: field.ty,
                value: (field.get)(self),
                default: field.default,
            })
            .collect()
    }

    fn clone_body(&self) -> Box<dyn VariantBody> {
        Box::new(self.clone())
    }

    fn eq_body(&self, other: &dyn VariantBody) -> bool {
        other
            .as_any()
            .downcast_ref::<V>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A decoded or authored node.
///
/// The discriminant is fixed at construction. Ownership stays with the caller;
/// the codec only borrows a node for the duration of one encode call.
///
/// # Example
///
/// ```
/// use lumen_core::{Field, FieldType, FieldValue, Node, Tag, Variant};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Marker;
///
/// impl Variant for Marker {
///     const KIND: &'static str = "marker";
///     fn fields() -> &'static [Field<Self>] {
///         &[]
///     }
/// }
///
/// let node = Node::new(Marker).named("origin");
/// assert_eq!(node.kind(), "marker");
/// assert_eq!(node.name(), Some("origin"));
/// assert_eq!(node.tag(), Tag::of::<Marker>());
/// ```
pub struct Node {
    kind: String,
    name: Option<String>,
    body: Box<dyn VariantBody>,
}

impl Node {
    /// Creates a node of variant `V` with the variant's own discriminant.
    pub fn new<V: Variant>(variant: V) -> Self {
        Self::with_kind(V::KIND, variant)
    }

    /// Creates a node of variant `V` registered under another discriminant.
    pub fn with_kind<V: Variant>(kind: impl Into<String>, variant: V) -> Self {
        Self {
            kind: kind.into(),
            name: None,
            body: Box::new(variant),
        }
    }

    /// Assembles a node from the pieces the dispatcher collected.
    pub fn from_decoded(kind: String, name: Option<String>, body: Box<dyn VariantBody>) -> Self {
        Self {
            kind,
            name: name.filter(|n| !n.is_empty()),
            body,
        }
    }

    /// Sets the user label. An empty label means no label.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.set_name(name);
        self
    }

    /// Replaces the user label. An empty label means no label.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
    }

    /// The discriminant.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The user label, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The tag of the variant this node holds.
    pub fn tag(&self) -> Tag {
        self.body.tag()
    }

    /// The type-erased variant body.
    pub fn body(&self) -> &dyn VariantBody {
        self.body.as_ref()
    }

    /// Returns the variant if this node holds a `V`.
    pub fn variant<V: Variant>(&self) -> Option<&V> {
        self.body.as_any().downcast_ref::<V>()
    }

    /// Returns `true` if this node holds a `V`.
    pub fn is<V: Variant>(&self) -> bool {
        self.tag() == Tag::of::<V>()
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            name: self.name.clone(),
            body: self.body.clone_body(),
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.name == other.name && self.body.eq_body(other.body())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("body", &self.body)
            .finish()
    }
}

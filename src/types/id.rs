// ABOUTME: Phantom-typed identifiers for objects owned by the deploy server.
// ABOUTME: Prevents accidental swapping of version, component and request IDs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// The kind of server object an [`Id`] points at.
pub trait IdKind {
    const LABEL: &'static str;
}

pub enum VersionMarker {}
pub enum ComponentMarker {}
pub enum RequestMarker {}

impl IdKind for VersionMarker {
    const LABEL: &'static str = "VersionId";
}

impl IdKind for ComponentMarker {
    const LABEL: &'static str = "ComponentId";
}

impl IdKind for RequestMarker {
    const LABEL: &'static str = "RequestId";
}

/// Opaque id assigned by the deploy server.
///
/// All ids are plain strings on the wire; the marker keeps a version id from
/// being polled as a request.
#[must_use = "IDs reference server objects and should not be ignored"]
pub struct Id<T> {
    value: String,
    _kind: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

// The marker is never instantiated, so these are written by hand instead of
// derived with `T: Trait` bounds.

impl<T: IdKind> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(T::LABEL).field(&self.value).finish()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

pub type VersionId = Id<VersionMarker>;
pub type ComponentId = Id<ComponentMarker>;
pub type RequestId = Id<RequestMarker>;

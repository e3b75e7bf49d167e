//! Property registry: type-erased, name-indexed field access.
//!
//! Every scriptable object type implements [`Reflect`] and registers a
//! [`PropertyTable`] once, mapping property names to a getter, a setter and
//! an optional interpolator. Values cross the boundary as the closed
//! [`Value`] union, tagged by [`ValueKind`], so the timeline engine can
//! animate any field by name without knowing the concrete object type.
//!
//! # Blend rules
//!
//! - `Float` and `Vector2` blend linearly.
//! - `Color` blends per channel in straight (non gamma corrected) space.
//! - Angles are plain floats and blend linearly through the zero crossing,
//!   so `AnimateBy("Angle", 360)` makes a full turn instead of standing still.
//! - `Int`, `Bool` and `Enum` have no interpolator.
//!
//! # Example
//!
//! ```ignore
//! let mut registry = PropertyRegistry::default();
//! registry.register_type::<Body>()?;
//! registry.set(&mut body, "Speed", Value::Float(120.0))?;
//! assert_eq!(registry.get(&body, "Speed")?, Value::Float(120.0));
//! ```

use std::any::{Any, TypeId};

use bevy_ecs::prelude::Resource;
use log::debug;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PropertyError;
use crate::geometry::Vector2;

/// Discriminant of a [`Value`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Int,
    Bool,
    Color,
    Vector2,
    Enum,
}

/// A property value tagged with its kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Float(f32),
    Int(i32),
    Bool(bool),
    Color(Color),
    Vector2(Vector2),
    Enum(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Int(_) => ValueKind::Int,
            Value::Bool(_) => ValueKind::Bool,
            Value::Color(_) => ValueKind::Color,
            Value::Vector2(_) => ValueKind::Vector2,
            Value::Enum(_) => ValueKind::Enum,
        }
    }

    /// Linear blend of two values of the same kind.
    ///
    /// Returns `None` for kinds that cannot be blended or mismatched kinds.
    pub fn lerp(&self, to: &Value, t: f32) -> Option<Value> {
        match (self, to) {
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + (b - a) * t)),
            (Value::Vector2(a), Value::Vector2(b)) => Some(Value::Vector2(a.lerp(*b, t))),
            (Value::Color(a), Value::Color(b)) => Some(Value::Color(a.lerp(*b, t))),
            _ => None,
        }
    }

    /// Sum of two values of the same kind, used by relative animations.
    pub fn checked_add(&self, delta: &Value) -> Option<Value> {
        match (self, delta) {
            (Value::Float(a), Value::Float(b)) => Some(Value::Float(a + b)),
            (Value::Int(a), Value::Int(b)) => Some(Value::Int(a.wrapping_add(*b))),
            (Value::Vector2(a), Value::Vector2(b)) => Some(Value::Vector2(*a + *b)),
            (Value::Color(a), Value::Color(b)) => Some(Value::Color(a.saturating_add(*b))),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

impl From<Vector2> for Value {
    fn from(v: Vector2) -> Self {
        Value::Vector2(v)
    }
}

/// Blend rule stored on a descriptor.
pub type Interpolator = fn(&Value, &Value, f32) -> Option<Value>;

pub type Getter<T> = Box<dyn Fn(&T) -> Value + Send + Sync>;
pub type Setter<T> = Box<dyn Fn(&mut T, Value) -> Result<(), PropertyError> + Send + Sync>;

/// Rust types that map onto one [`ValueKind`].
pub trait PropertyType: Sized {
    const KIND: ValueKind;
    fn into_value(self) -> Value;
    fn from_value(value: Value) -> Option<Self>;
    fn interpolator() -> Option<Interpolator> {
        None
    }
}

impl PropertyType for f32 {
    const KIND: ValueKind = ValueKind::Float;
    fn into_value(self) -> Value {
        Value::Float(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
    fn interpolator() -> Option<Interpolator> {
        Some(Value::lerp)
    }
}

impl PropertyType for i32 {
    const KIND: ValueKind = ValueKind::Int;
    fn into_value(self) -> Value {
        Value::Int(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for bool {
    const KIND: ValueKind = ValueKind::Bool;
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }
}

impl PropertyType for Color {
    const KIND: ValueKind = ValueKind::Color;
    fn into_value(self) -> Value {
        Value::Color(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Color(v) => Some(v),
            _ => None,
        }
    }
    fn interpolator() -> Option<Interpolator> {
        Some(Value::lerp)
    }
}

impl PropertyType for Vector2 {
    const KIND: ValueKind = ValueKind::Vector2;
    fn into_value(self) -> Value {
        Value::Vector2(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Vector2(v) => Some(v),
            _ => None,
        }
    }
    fn interpolator() -> Option<Interpolator> {
        Some(Value::lerp)
    }
}

impl PropertyType for String {
    const KIND: ValueKind = ValueKind::Enum;
    fn into_value(self) -> Value {
        Value::Enum(self)
    }
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Enum(v) => Some(v),
            _ => None,
        }
    }
}

/// One named, typed accessor pair.
pub struct PropertyDescriptor<T> {
    pub name: String,
    pub kind: ValueKind,
    getter: Option<Getter<T>>,
    setter: Option<Setter<T>>,
    interpolator: Option<Interpolator>,
}

impl<T> PropertyDescriptor<T> {
    pub fn is_readable(&self) -> bool {
        self.getter.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn is_interpolatable(&self) -> bool {
        self.interpolator.is_some()
    }
}

/// Object types whose fields are reachable by name.
pub trait Reflect: Sized + Send + Sync + 'static {
    /// Name used in diagnostics.
    const TYPE_NAME: &'static str;

    fn register_properties(table: &mut PropertyTable<Self>) -> Result<(), PropertyError>;
}

/// All descriptors of one concrete type.
pub struct PropertyTable<T> {
    type_name: &'static str,
    entries: FxHashMap<String, PropertyDescriptor<T>>,
}

impl<T: 'static> PropertyTable<T> {
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            entries: FxHashMap::default(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Register a raw descriptor. Names are case-sensitive and unique.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: ValueKind,
        getter: Option<Getter<T>>,
        setter: Option<Setter<T>>,
        interpolator: Option<Interpolator>,
    ) -> Result<(), PropertyError> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(PropertyError::DuplicateProperty {
                type_name: self.type_name,
                property: name,
            });
        }
        self.entries.insert(
            name.clone(),
            PropertyDescriptor {
                name,
                kind,
                getter,
                setter,
                interpolator,
            },
        );
        Ok(())
    }

    /// Register a read/write property with the default blend rule of `V`.
    pub fn add<V: PropertyType + 'static>(
        &mut self,
        name: &str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Result<(), PropertyError> {
        self.register(
            name,
            V::KIND,
            Some(Self::wrap_getter(get)),
            Some(Self::wrap_setter::<V>(name, move |obj, v| {
                set(obj, v);
                Ok(())
            })),
            V::interpolator(),
        )
    }

    /// Like [`add`](Self::add) but the setter may reject the value.
    pub fn add_checked<V: PropertyType + 'static>(
        &mut self,
        name: &str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
        set: impl Fn(&mut T, V) -> Result<(), String> + Send + Sync + 'static,
    ) -> Result<(), PropertyError> {
        let property = name.to_string();
        self.register(
            name,
            V::KIND,
            Some(Self::wrap_getter(get)),
            Some(Self::wrap_setter::<V>(name, move |obj, v| {
                set(obj, v).map_err(|reason| PropertyError::InvalidValue {
                    property: property.clone(),
                    reason,
                })
            })),
            V::interpolator(),
        )
    }

    pub fn add_read_only<V: PropertyType + 'static>(
        &mut self,
        name: &str,
        get: impl Fn(&T) -> V + Send + Sync + 'static,
    ) -> Result<(), PropertyError> {
        self.register(
            name,
            V::KIND,
            Some(Self::wrap_getter(get)),
            None,
            V::interpolator(),
        )
    }

    /// Register a write-only property, the way loaders attach named setters.
    pub fn add_setter<V: PropertyType + 'static>(
        &mut self,
        name: &str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Result<(), PropertyError> {
        self.register(
            name,
            V::KIND,
            None,
            Some(Self::wrap_setter::<V>(name, move |obj, v| {
                set(obj, v);
                Ok(())
            })),
            None,
        )
    }

    pub fn descriptor(&self, name: &str) -> Result<&PropertyDescriptor<T>, PropertyError> {
        self.entries
            .get(name)
            .ok_or_else(|| PropertyError::UnknownProperty {
                type_name: self.type_name,
                property: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, object: &T, name: &str) -> Result<Value, PropertyError> {
        let descriptor = self.descriptor(name)?;
        let getter = descriptor
            .getter
            .as_ref()
            .ok_or_else(|| PropertyError::NotReadable {
                type_name: self.type_name,
                property: name.to_string(),
            })?;
        Ok(getter(object))
    }

    pub fn set(&self, object: &mut T, name: &str, value: Value) -> Result<(), PropertyError> {
        let descriptor = self.descriptor(name)?;
        if value.kind() != descriptor.kind {
            return Err(PropertyError::TypeMismatch {
                property: name.to_string(),
                expected: descriptor.kind,
                found: value.kind(),
            });
        }
        let setter = descriptor
            .setter
            .as_ref()
            .ok_or_else(|| PropertyError::NotWritable {
                type_name: self.type_name,
                property: name.to_string(),
            })?;
        setter(object, value)
    }

    pub fn interpolate(
        &self,
        name: &str,
        from: &Value,
        to: &Value,
        t: f32,
    ) -> Result<Value, PropertyError> {
        let descriptor = self.descriptor(name)?;
        let interpolator =
            descriptor
                .interpolator
                .ok_or_else(|| PropertyError::NotInterpolatable {
                    type_name: self.type_name,
                    property: name.to_string(),
                })?;
        for value in [from, to] {
            if value.kind() != descriptor.kind {
                return Err(PropertyError::TypeMismatch {
                    property: name.to_string(),
                    expected: descriptor.kind,
                    found: value.kind(),
                });
            }
        }
        interpolator(from, to, t).ok_or_else(|| PropertyError::NotInterpolatable {
            type_name: self.type_name,
            property: name.to_string(),
        })
    }

    fn wrap_getter<V: PropertyType>(get: impl Fn(&T) -> V + Send + Sync + 'static) -> Getter<T> {
        Box::new(move |obj| get(obj).into_value())
    }

    fn wrap_setter<V: PropertyType>(
        name: &str,
        set: impl Fn(&mut T, V) -> Result<(), PropertyError> + Send + Sync + 'static,
    ) -> Setter<T> {
        let property = name.to_string();
        Box::new(move |obj, value| {
            let found = value.kind();
            let typed = V::from_value(value).ok_or_else(|| PropertyError::TypeMismatch {
                property: property.clone(),
                expected: V::KIND,
                found,
            })?;
            set(obj, typed)
        })
    }
}

/// Registry of property tables for every reflected type in the simulation.
#[derive(Resource, Default)]
pub struct PropertyRegistry {
    tables: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertyRegistry {
    /// Build and store the property table of `T`.
    ///
    /// Fails with [`PropertyError::DuplicateProperty`] if `T` (or a property
    /// it declares) was already registered.
    pub fn register_type<T: Reflect>(&mut self) -> Result<(), PropertyError> {
        let mut table = self
            .tables
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast::<PropertyTable<T>>().ok())
            .map(|boxed| *boxed)
            .unwrap_or_else(|| PropertyTable::new(T::TYPE_NAME));
        let result = T::register_properties(&mut table);
        debug!("Registered {} properties for {}", table.len(), T::TYPE_NAME);
        self.tables.insert(TypeId::of::<T>(), Box::new(table));
        result
    }

    pub fn table<T: Reflect>(&self) -> Option<&PropertyTable<T>> {
        self.tables
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<PropertyTable<T>>())
    }

    /// Table of `T`, created empty on first use.
    pub fn table_mut<T: Reflect>(&mut self) -> &mut PropertyTable<T> {
        self.tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(PropertyTable::<T>::new(T::TYPE_NAME)))
            .downcast_mut::<PropertyTable<T>>()
            .expect("property table stored under the TypeId of another type")
    }

    /// Register one descriptor for `T`.
    pub fn register<T: Reflect>(
        &mut self,
        name: impl Into<String>,
        kind: ValueKind,
        getter: Option<Getter<T>>,
        setter: Option<Setter<T>>,
        interpolator: Option<Interpolator>,
    ) -> Result<(), PropertyError> {
        self.table_mut::<T>()
            .register(name, kind, getter, setter, interpolator)
    }

    /// Attach a write-only named setter to `T`.
    pub fn register_setter<T: Reflect, V: PropertyType + 'static>(
        &mut self,
        name: &str,
        set: impl Fn(&mut T, V) + Send + Sync + 'static,
    ) -> Result<(), PropertyError> {
        self.table_mut::<T>().add_setter(name, set)
    }

    pub fn get<T: Reflect>(&self, object: &T, name: &str) -> Result<Value, PropertyError> {
        self.lookup::<T>(name)?.get(object, name)
    }

    pub fn set<T: Reflect>(
        &self,
        object: &mut T,
        name: &str,
        value: Value,
    ) -> Result<(), PropertyError> {
        self.lookup::<T>(name)?.set(object, name, value)
    }

    pub fn interpolate<T: Reflect>(
        &self,
        name: &str,
        from: &Value,
        to: &Value,
        t: f32,
    ) -> Result<Value, PropertyError> {
        self.lookup::<T>(name)?.interpolate(name, from, to, t)
    }

    /// Pair an object with this registry for name-based access.
    pub fn bind<'a, T: Reflect>(&'a self, object: &'a mut T) -> Bound<'a, T> {
        Bound {
            object,
            registry: self,
        }
    }

    fn lookup<T: Reflect>(&self, name: &str) -> Result<&PropertyTable<T>, PropertyError> {
        self.table::<T>().ok_or_else(|| PropertyError::UnknownProperty {
            type_name: T::TYPE_NAME,
            property: name.to_string(),
        })
    }
}

/// Name-based access to one object, independent of its concrete type.
///
/// This is what actions mutate; see [`crate::components::action`].
pub trait PropertyTarget {
    fn type_name(&self) -> &'static str;
    fn get_property(&self, name: &str) -> Result<Value, PropertyError>;
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError>;
    fn interpolate_property(
        &self,
        name: &str,
        from: &Value,
        to: &Value,
        t: f32,
    ) -> Result<Value, PropertyError>;
}

/// An object borrowed together with the registry that knows its properties.
pub struct Bound<'a, T> {
    object: &'a mut T,
    registry: &'a PropertyRegistry,
}

impl<T: Reflect> PropertyTarget for Bound<'_, T> {
    fn type_name(&self) -> &'static str {
        T::TYPE_NAME
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        self.registry.get(&*self.object, name)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        self.registry.set(&mut *self.object, name, value)
    }

    fn interpolate_property(
        &self,
        name: &str,
        from: &Value,
        to: &Value,
        t: f32,
    ) -> Result<Value, PropertyError> {
        self.registry.interpolate::<T>(name, from, to, t)
    }
}

/// Target of a timeline that is not bound to any object.
pub struct Unbound;

impl PropertyTarget for Unbound {
    fn type_name(&self) -> &'static str {
        "<unbound>"
    }

    fn get_property(&self, name: &str) -> Result<Value, PropertyError> {
        Err(self.unknown(name))
    }

    fn set_property(&mut self, name: &str, _value: Value) -> Result<(), PropertyError> {
        Err(self.unknown(name))
    }

    fn interpolate_property(
        &self,
        name: &str,
        _from: &Value,
        _to: &Value,
        _t: f32,
    ) -> Result<Value, PropertyError> {
        Err(self.unknown(name))
    }
}

impl Unbound {
    fn unknown(&self, name: &str) -> PropertyError {
        PropertyError::UnknownProperty {
            type_name: self.type_name(),
            property: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Lamp {
        brightness: f32,
        level: i32,
        on: bool,
        tint: Color,
        anchor: Vector2,
        label: String,
    }

    impl Reflect for Lamp {
        const TYPE_NAME: &'static str = "Lamp";

        fn register_properties(table: &mut PropertyTable<Self>) -> Result<(), PropertyError> {
            table.add(
                "Brightness",
                |l: &Lamp| l.brightness,
                |l: &mut Lamp, v: f32| l.brightness = v.clamp(0.0, 1.0),
            )?;
            table.add("Level", |l: &Lamp| l.level, |l: &mut Lamp, v: i32| l.level = v)?;
            table.add("On", |l: &Lamp| l.on, |l: &mut Lamp, v: bool| l.on = v)?;
            table.add("Tint", |l: &Lamp| l.tint, |l: &mut Lamp, v: Color| l.tint = v)?;
            table.add_read_only("Anchor", |l: &Lamp| l.anchor)?;
            table.add_setter("Label", |l: &mut Lamp, v: String| l.label = v)?;
            Ok(())
        }
    }

    fn registry() -> PropertyRegistry {
        let mut registry = PropertyRegistry::default();
        registry.register_type::<Lamp>().unwrap();
        registry
    }

    // ==================== GET / SET TESTS ====================

    #[test]
    fn test_set_then_get_round_trips() {
        let registry = registry();
        let mut lamp = Lamp::default();
        for (name, value) in [
            ("Brightness", Value::Float(0.25)),
            ("Level", Value::Int(3)),
            ("On", Value::Bool(true)),
            ("Tint", Value::Color(Color::CYAN)),
        ] {
            registry.set(&mut lamp, name, value.clone()).unwrap();
            assert_eq!(registry.get(&lamp, name).unwrap(), value);
        }
    }

    #[test]
    fn test_setter_may_clamp() {
        let registry = registry();
        let mut lamp = Lamp::default();
        registry
            .set(&mut lamp, "Brightness", Value::Float(3.0))
            .unwrap();
        assert_eq!(
            registry.get(&lamp, "Brightness").unwrap(),
            Value::Float(1.0)
        );
    }

    #[test]
    fn test_unknown_property_is_case_sensitive() {
        let registry = registry();
        let lamp = Lamp::default();
        assert!(matches!(
            registry.get(&lamp, "brightness"),
            Err(PropertyError::UnknownProperty { type_name: "Lamp", .. })
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let registry = registry();
        let mut lamp = Lamp::default();
        let err = registry
            .set(&mut lamp, "Level", Value::Float(1.0))
            .unwrap_err();
        assert_eq!(
            err,
            PropertyError::TypeMismatch {
                property: "Level".into(),
                expected: ValueKind::Int,
                found: ValueKind::Float,
            }
        );
    }

    #[test]
    fn test_read_only_and_write_only() {
        let registry = registry();
        let mut lamp = Lamp::default();
        assert!(matches!(
            registry.set(&mut lamp, "Anchor", Value::Vector2(Vector2::zero())),
            Err(PropertyError::NotWritable { .. })
        ));
        registry
            .set(&mut lamp, "Label", Value::Enum("desk".into()))
            .unwrap();
        assert_eq!(lamp.label, "desk");
        assert!(matches!(
            registry.get(&lamp, "Label"),
            Err(PropertyError::NotReadable { .. })
        ));
    }

    // ==================== REGISTRATION TESTS ====================

    #[test]
    fn test_duplicate_property_rejected() {
        let mut registry = registry();
        let result = registry.register_setter("On", |l: &mut Lamp, v: bool| l.on = v);
        assert!(matches!(
            result,
            Err(PropertyError::DuplicateProperty { type_name: "Lamp", .. })
        ));
    }

    #[test]
    fn test_registering_type_twice_fails() {
        let mut registry = registry();
        assert!(registry.register_type::<Lamp>().is_err());
        // The existing table survives the failed attempt.
        assert!(registry.table::<Lamp>().unwrap().contains("Tint"));
    }

    #[test]
    fn test_register_setter_extends_table() {
        let mut registry = registry();
        registry
            .register_setter("Dim", |l: &mut Lamp, v: f32| l.brightness -= v)
            .unwrap();
        let mut lamp = Lamp {
            brightness: 1.0,
            ..Default::default()
        };
        registry.set(&mut lamp, "Dim", Value::Float(0.5)).unwrap();
        assert!((lamp.brightness - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unregistered_type_reports_unknown_property() {
        let registry = PropertyRegistry::default();
        let lamp = Lamp::default();
        assert!(matches!(
            registry.get(&lamp, "On"),
            Err(PropertyError::UnknownProperty { .. })
        ));
    }

    // ==================== INTERPOLATION TESTS ====================

    #[test]
    fn test_interpolate_scalars_and_colors() {
        let registry = registry();
        let v = registry
            .interpolate::<Lamp>("Brightness", &Value::Float(0.0), &Value::Float(1.0), 0.25)
            .unwrap();
        assert_eq!(v, Value::Float(0.25));
        let c = registry
            .interpolate::<Lamp>(
                "Tint",
                &Value::Color(Color::BLACK),
                &Value::Color(Color::WHITE),
                0.5,
            )
            .unwrap();
        assert_eq!(c, Value::Color(Color::rgb(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_interpolate_without_interpolator_fails() {
        let registry = registry();
        assert!(matches!(
            registry.interpolate::<Lamp>("Level", &Value::Int(0), &Value::Int(4), 0.5),
            Err(PropertyError::NotInterpolatable { .. })
        ));
    }

    #[test]
    fn test_bound_target_forwards_to_registry() {
        let registry = registry();
        let mut lamp = Lamp::default();
        let mut bound = registry.bind(&mut lamp);
        bound.set_property("Level", Value::Int(9)).unwrap();
        assert_eq!(bound.get_property("Level").unwrap(), Value::Int(9));
        assert_eq!(bound.type_name(), "Lamp");
        assert_eq!(lamp.level, 9);
    }

    #[test]
    fn test_unbound_target_rejects_everything() {
        let mut target = Unbound;
        assert!(target.get_property("X").is_err());
        assert!(target.set_property("X", Value::Float(0.0)).is_err());
    }

    #[test]
    fn test_value_checked_add() {
        assert_eq!(
            Value::Float(1.0).checked_add(&Value::Float(2.0)),
            Some(Value::Float(3.0))
        );
        assert_eq!(
            Value::Vector2(Vector2::new(1.0, 1.0)).checked_add(&Value::Vector2(Vector2::new(2.0, -1.0))),
            Some(Value::Vector2(Vector2::new(3.0, 0.0)))
        );
        assert_eq!(Value::Bool(true).checked_add(&Value::Bool(true)), None);
        assert_eq!(Value::Float(1.0).checked_add(&Value::Int(1)), None);
    }
}

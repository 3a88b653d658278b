//! The type registry: logical type names bound to record shapes.
//!
//! Registration computes a shape's storable member list exactly once, by
//! filtering the shape's declared descriptor. The cached list is
//! order-stable for the lifetime of the registration; the persistence
//! layer writes and reads members in this order.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;

use stow_types::{FieldKind, FieldSpec, Record, ShapeDescriptor};

/// Attribute names owned by the base item capability. Never storable
/// members; a shape declaring one has it filtered out.
pub const RESERVED_NAMES: [&str; 3] = ["ID", "Name", "TypeName"];

/// Prefix marking implementation-internal members. Never storable.
pub const INTERNAL_PREFIX: &str = "__";

/// How the registry treats declared members with no codec support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnsupportedPolicy {
    /// Drop unsupported members from the storable list at registration.
    #[default]
    Exclude,
    /// Keep them; the first read or write of an item carrying one fails,
    /// citing the member name and the item's identifier.
    FailOnUse,
}

fn instantiate<T: Record + Default + 'static>() -> Box<dyn Record> {
    Box::new(T::default())
}

/// A logical type name bound to a concrete record shape.
pub struct RegisteredType {
    name: String,
    type_id: TypeId,
    construct: fn() -> Box<dyn Record>,
    fields: Vec<FieldSpec>,
}

impl RegisteredType {
    /// The logical type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The storable member list, in registration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns `true` if the bound shape is `T`.
    pub fn is<T: Record>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Construct a fresh instance of the bound shape.
    pub(crate) fn instantiate(&self) -> Box<dyn Record> {
        (self.construct)()
    }
}

impl fmt::Debug for RegisteredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredType")
            .field("name", &self.name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

/// Maps logical type names to registered record shapes.
pub struct TypeRegistry {
    policy: UnsupportedPolicy,
    types: IndexMap<String, RegisteredType>,
    bound: HashSet<TypeId>,
}

impl TypeRegistry {
    /// An empty registry with the default unsupported-member policy.
    pub fn new() -> Self {
        Self::with_policy(UnsupportedPolicy::default())
    }

    /// An empty registry with an explicit unsupported-member policy.
    pub fn with_policy(policy: UnsupportedPolicy) -> Self {
        Self {
            policy,
            types: IndexMap::new(),
            bound: HashSet::new(),
        }
    }

    /// Bind a logical type name to the shape `T`.
    ///
    /// Returns `false` without side effects if the name is already bound or
    /// `T` is already registered under another name. One shape, one name.
    pub fn register<T: Record + Default + 'static>(&mut self, name: &str) -> bool {
        let type_id = TypeId::of::<T>();
        if self.types.contains_key(name) || self.bound.contains(&type_id) {
            return false;
        }
        let fields = self.storable_fields(T::descriptor());
        self.types.insert(
            name.to_string(),
            RegisteredType {
                name: name.to_string(),
                type_id,
                construct: instantiate::<T>,
                fields,
            },
        );
        self.bound.insert(type_id);
        true
    }

    /// Apply the inclusion rules to a declared descriptor: drop ignored
    /// members, keep the first occurrence per name, drop reserved and
    /// internal-marker names, and handle unsupported kinds per the policy.
    fn storable_fields(&self, descriptor: ShapeDescriptor) -> Vec<FieldSpec> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut fields = Vec::new();
        for spec in descriptor.into_fields() {
            if spec.ignore {
                continue;
            }
            if RESERVED_NAMES.contains(&spec.name.as_str()) {
                continue;
            }
            if spec.name.starts_with(INTERNAL_PREFIX) {
                continue;
            }
            if !seen.insert(spec.name.clone()) {
                continue;
            }
            if spec.kind == FieldKind::Opaque && self.policy == UnsupportedPolicy::Exclude {
                continue;
            }
            fields.push(spec);
        }
        fields
    }

    /// Resolve a logical type name.
    pub fn get(&self, name: &str) -> Option<&RegisteredType> {
        self.types.get(name)
    }

    /// The cached storable member list for a logical type name.
    pub fn fields(&self, name: &str) -> Option<&[FieldSpec]> {
        self.types.get(name).map(|t| t.fields())
    }

    /// Registered logical type names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no types are registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The unsupported-member policy in effect.
    pub fn policy(&self) -> UnsupportedPolicy {
        self.policy
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("policy", &self.policy)
            .field("types", &self.types.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use stow_types::{define_record, FieldError, Value};

    use super::*;

    define_record! {
        struct Worker {
            "Age" => age: i64,
            "Label" => label: String,
        }
    }

    define_record! {
        struct Dept {
            "Budget" => budget: f64,
        }
    }

    // Hand-written shape exercising the inclusion rules: reserved names,
    // the internal marker, duplicates, ignored members, and an opaque one.
    #[derive(Default)]
    struct Exotic {
        kept: i64,
    }

    impl Record for Exotic {
        fn descriptor() -> ShapeDescriptor {
            ShapeDescriptor::new()
                .field(FieldSpec::new("Kept", FieldKind::I64))
                .field(FieldSpec::new("ID", FieldKind::U64))
                .field(FieldSpec::new("Name", FieldKind::Text))
                .field(FieldSpec::new("TypeName", FieldKind::Text))
                .field(FieldSpec::new("__backing", FieldKind::Text))
                .field(FieldSpec::new("Kept", FieldKind::Text))
                .field(FieldSpec::new("Skipped", FieldKind::Text).ignored())
                .field(FieldSpec::opaque("Blob"))
        }

        fn get(&self, field: &str) -> Option<Value> {
            match field {
                "Kept" => Some(Value::I64(self.kept)),
                _ => None,
            }
        }

        fn set(&mut self, field: &str, value: Value) -> Result<(), FieldError> {
            match field {
                "Kept" => {
                    self.kept = value.as_i64().ok_or_else(|| FieldError::KindMismatch {
                        field: field.to_string(),
                        expected: FieldKind::I64,
                        got: value.kind(),
                    })?;
                    Ok(())
                }
                _ => Err(FieldError::NoSuchField(field.to_string())),
            }
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    }

    #[test]
    fn register_binds_name_to_shape() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register::<Worker>("Worker"));
        assert!(registry.get("Worker").unwrap().is::<Worker>());
        assert!(registry.get("Dept").is_none());
    }

    #[test]
    fn register_rejects_bound_name() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register::<Worker>("Worker"));
        assert!(!registry.register::<Dept>("Worker"));
        // The registry is unchanged: "Worker" still resolves to Worker.
        assert!(registry.get("Worker").unwrap().is::<Worker>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_rejects_rebinding_a_shape() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register::<Worker>("Worker"));
        assert!(!registry.register::<Worker>("Employee"));
        assert!(registry.get("Employee").is_none());
    }

    #[test]
    fn fields_are_cached_in_declaration_order() {
        let mut registry = TypeRegistry::new();
        registry.register::<Worker>("Worker");
        let names: Vec<&str> = registry
            .fields("Worker")
            .unwrap()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, ["Age", "Label"]);
    }

    #[test]
    fn inclusion_rules_filter_the_descriptor() {
        let mut registry = TypeRegistry::new();
        registry.register::<Exotic>("Exotic");
        let fields = registry.fields("Exotic").unwrap();
        // Reserved names, the internal marker, the duplicate, the ignored
        // member, and the opaque member are all gone.
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Kept");
        assert_eq!(fields[0].kind, FieldKind::I64);
    }

    #[test]
    fn fail_on_use_policy_keeps_opaque_members() {
        let mut registry = TypeRegistry::with_policy(UnsupportedPolicy::FailOnUse);
        registry.register::<Exotic>("Exotic");
        let fields = registry.fields("Exotic").unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "Blob");
        assert_eq!(fields[1].kind, FieldKind::Opaque);
    }

    #[test]
    fn instantiate_goes_through_default() {
        let mut registry = TypeRegistry::new();
        registry.register::<Worker>("Worker");
        let record = registry.get("Worker").unwrap().instantiate();
        assert_eq!(record.get("Age"), Some(Value::I64(0)));
    }

    #[test]
    fn names_in_registration_order() {
        let mut registry = TypeRegistry::new();
        registry.register::<Dept>("Dept");
        registry.register::<Worker>("Worker");
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, ["Dept", "Worker"]);
    }
}

//! Binding descriptors and the builder units use to declare them.
//!
//! A unit type declares its dependencies once, through [`BindingsBuilder`].
//! The resulting descriptor list is immutable and cached per type by the
//! dependency registry.

use std::any::{TypeId, type_name};

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// The two framework-provided helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Helper {
    /// Child-render function.
    Fetch,
    Escape,
}

/// Where an injected value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "from", content = "helper", rename_all = "lowercase")]
pub enum BindingSource {
    Helper(Helper),
    Global,
}

/// How the value reaches the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BindingKind {
    /// Injected into a named slot before the body runs.
    Slot,
    /// Passed to the render body positionally.
    Parameter { position: usize },
}

/// One injectable dependency of a unit type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDescriptor {
    pub slot_name: String,
    /// Global key to look up; defaults to `slot_name`.
    pub lookup_key: String,
    /// Wrap plain string globals in `Text`.
    pub escape: bool,
    pub declared_type: Option<String>,
    /// The slot accepts "no value".
    pub nullable: bool,
    pub source: BindingSource,
    pub kind: BindingKind,
}

impl BindingDescriptor {
    pub fn helper(&self) -> Option<Helper> {
        match self.source {
            BindingSource::Helper(helper) => Some(helper),
            BindingSource::Global => None,
        }
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self.kind, BindingKind::Parameter { .. })
    }
}

/// Collects the descriptors of one unit type.
///
/// Declaration errors are recorded and reported by [`BindingsBuilder::finish`],
/// so `describe` implementations can chain calls without handling results.
#[derive(Debug)]
pub struct BindingsBuilder {
    unit: String,
    helpers: Vec<(TypeId, Helper)>,
    bindings: Vec<BindingDescriptor>,
    parameters: usize,
    error: Option<DomainError>,
}

impl BindingsBuilder {
    /// `helpers` maps the concrete helper types to their role.
    pub fn new(unit: impl Into<String>, helpers: &[(TypeId, Helper)]) -> Self {
        Self {
            unit: unit.into(),
            helpers: helpers.to_vec(),
            bindings: Vec::new(),
            parameters: 0,
            error: None,
        }
    }

    /// Declare a slot of type `T`.
    ///
    /// If `T` is one of the helper types the slot receives that helper;
    /// otherwise it is resolved from the global store under the slot name.
    pub fn inject<T: 'static>(&mut self, slot: &str) -> SlotDraft<'_> {
        let source = match self.helper_for(TypeId::of::<T>()) {
            Some(helper) => BindingSource::Helper(helper),
            None => BindingSource::Global,
        };
        self.push(slot, Some(type_name::<T>()), source, BindingKind::Slot, false)
    }

    /// Declare a slot without a type; it accepts an absent value.
    pub fn untyped(&mut self, slot: &str) -> SlotDraft<'_> {
        self.push(slot, None, BindingSource::Global, BindingKind::Slot, true)
    }

    /// Declare the next positional render parameter. Only helper types are
    /// accepted.
    pub fn parameter<T: 'static>(&mut self, name: &str) -> &mut Self {
        match self.helper_for(TypeId::of::<T>()) {
            Some(helper) => {
                let kind = BindingKind::Parameter {
                    position: self.parameters,
                };
                self.parameters += 1;
                let _draft = self.push(
                    name,
                    Some(type_name::<T>()),
                    BindingSource::Helper(helper),
                    kind,
                    false,
                );
            }
            None => self.fail(DomainError::InvalidParameterType {
                unit: self.unit.clone(),
                parameter: name.to_owned(),
                declared_type: type_name::<T>().to_owned(),
            }),
        }
        self
    }

    pub fn finish(self) -> Result<Vec<BindingDescriptor>, DomainError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.bindings),
        }
    }

    fn helper_for(&self, id: TypeId) -> Option<Helper> {
        self.helpers
            .iter()
            .find_map(|(helper_id, helper)| (*helper_id == id).then_some(*helper))
    }

    fn push(
        &mut self,
        slot: &str,
        declared_type: Option<&str>,
        source: BindingSource,
        kind: BindingKind,
        nullable: bool,
    ) -> SlotDraft<'_> {
        if self.bindings.iter().any(|b| b.slot_name == slot) {
            self.fail(DomainError::DuplicateSlot {
                unit: self.unit.clone(),
                slot: slot.to_owned(),
            });
            return SlotDraft { binding: None };
        }

        self.bindings.push(BindingDescriptor {
            slot_name: slot.to_owned(),
            lookup_key: slot.to_owned(),
            escape: false,
            declared_type: declared_type.map(str::to_owned),
            nullable,
            source,
            kind,
        });
        SlotDraft {
            binding: self.bindings.last_mut(),
        }
    }

    fn fail(&mut self, err: DomainError) {
        self.error.get_or_insert(err);
    }
}

/// Refines the slot just declared.
#[must_use = "a draft only records options through its methods"]
pub struct SlotDraft<'a> {
    binding: Option<&'a mut BindingDescriptor>,
}

impl SlotDraft<'_> {
    /// Look the global up under `key` instead of the slot name.
    pub fn key(mut self, key: &str) -> Self {
        if let Some(b) = self.binding.as_deref_mut() {
            b.lookup_key = key.to_owned();
        }
        self
    }

    pub fn escaped(mut self) -> Self {
        if let Some(b) = self.binding.as_deref_mut() {
            b.escape = true;
        }
        self
    }

    pub fn optional(mut self) -> Self {
        if let Some(b) = self.binding.as_deref_mut() {
            b.nullable = true;
        }
        self
    }

    /// End of chain.
    pub fn done(self) {}
}

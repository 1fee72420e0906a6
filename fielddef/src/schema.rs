use crate::consts::COLL_NONE;
use crate::constraint::{constraint_def_array_dup, ConstraintDef};
use crate::field_type::FieldType;
use crate::types::{CompressionType, OnConflictAction};
use bumpalo::Bump;

/// A decoded and validated field definition.
///
/// Strings, the default value and the constraint list are borrowed from
/// whichever arena produced the descriptor: the scratch arena passed to the
/// decoder, or the blocks owned by a [`FieldDefArray`](crate::FieldDefArray).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldDef<'a> {
    field_type: FieldType,
    name: &'a str,
    is_nullable: bool,
    nullable_action: OnConflictAction,
    coll_id: u32,
    compression_type: CompressionType,
    default_value: Option<&'a [u8]>,
    default_func_id: u32,
    constraint_def: &'a [ConstraintDef<'a>],
}

impl<'a> FieldDef<'a> {
    pub fn new(name: &'a str, field_type: FieldType) -> Self {
        Self {
            field_type,
            name,
            is_nullable: false,
            nullable_action: OnConflictAction::Default,
            coll_id: COLL_NONE,
            compression_type: CompressionType::None,
            default_value: None,
            default_func_id: 0,
            constraint_def: &[],
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        field_type: FieldType,
        name: &'a str,
        is_nullable: bool,
        nullable_action: OnConflictAction,
        coll_id: u32,
        compression_type: CompressionType,
        default_value: Option<&'a [u8]>,
        default_func_id: u32,
        constraint_def: &'a [ConstraintDef<'a>],
    ) -> Self {
        Self {
            field_type,
            name,
            is_nullable,
            nullable_action,
            coll_id,
            compression_type,
            default_value,
            default_func_id,
            constraint_def,
        }
    }

    /// Mark the field nullable, keeping the nullable action consistent.
    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self.nullable_action = if is_nullable {
            OnConflictAction::None
        } else {
            OnConflictAction::Default
        };
        self
    }

    pub fn with_default_value(mut self, raw: &'a [u8]) -> Self {
        self.default_value = Some(raw);
        self
    }

    pub fn with_constraint_def(mut self, constraint_def: &'a [ConstraintDef<'a>]) -> Self {
        self.constraint_def = constraint_def;
        self
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn nullable_action(&self) -> OnConflictAction {
        self.nullable_action
    }

    pub fn coll_id(&self) -> u32 {
        self.coll_id
    }

    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    /// Raw encoded default value, exactly as it appeared in the definition.
    pub fn default_value(&self) -> Option<&'a [u8]> {
        self.default_value
    }

    pub fn default_value_size(&self) -> usize {
        self.default_value.map_or(0, <[u8]>::len)
    }

    pub fn default_func_id(&self) -> u32 {
        self.default_func_id
    }

    pub fn constraint_def(&self) -> &'a [ConstraintDef<'a>] {
        self.constraint_def
    }

    pub fn constraint_count(&self) -> usize {
        self.constraint_def.len()
    }

    /// Bytes the name and default value occupy in a group block.
    pub(crate) fn payload_size(&self) -> usize {
        self.name.len() + self.default_value_size()
    }

    /// Copy into `block`, relocating the name and default value there and the
    /// constraint list into `constraint_block`.
    pub(crate) fn dup_in<'b>(&self, block: &'b Bump, constraint_block: &'b Bump) -> FieldDef<'b> {
        FieldDef {
            field_type: self.field_type,
            name: block.alloc_str(self.name),
            is_nullable: self.is_nullable,
            nullable_action: self.nullable_action,
            coll_id: self.coll_id,
            compression_type: self.compression_type,
            default_value: self
                .default_value
                .map(|raw| &*block.alloc_slice_copy(raw)),
            default_func_id: self.default_func_id,
            constraint_def: constraint_def_array_dup(self.constraint_def, constraint_block),
        }
    }
}

use crate::consts::TRASH_BYTE;
use crate::constraint::constraint_def_array_size;
use crate::error::{FieldDefError, Result};
use crate::schema::FieldDef;
use bumpalo::Bump;
use ouroboros::self_referencing;
use std::fmt;
use std::mem;
use tracing::debug;

#[self_referencing]
struct FieldDefBlocks {
    // descriptor array, then names and default values
    block: Bump,
    // one per descriptor, empty when it has no constraints
    constraint_blocks: Vec<Bump>,
    size: usize,
    #[borrows(block, constraint_blocks)]
    #[covariant]
    fields: &'this [FieldDef<'this>],
}

/// Field definitions promoted out of a scratch arena into memory they own.
///
/// Built by [`FieldDefArray::duplicate`] from descriptors that borrow from a
/// decoder arena. The copy shares nothing with its source, so the arena can be
/// dropped right after.
pub struct FieldDefArray {
    inner: Option<FieldDefBlocks>,
}

fn out_of_memory(size: usize) -> FieldDefError {
    FieldDefError::OutOfMemory {
        size,
        allocator: "Bump::try_with_capacity",
        object: "field_def",
    }
}

impl FieldDefArray {
    /// An array with no fields. Owns no memory.
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Copy `fields` into one block sized up front, plus one block per
    /// non-empty constraint list.
    pub fn duplicate(fields: &[FieldDef<'_>]) -> Result<Self> {
        if fields.is_empty() {
            return Ok(Self::empty());
        }
        let size = mem::size_of::<FieldDef>() * fields.len()
            + fields.iter().map(FieldDef::payload_size).sum::<usize>();
        let block = Bump::try_with_capacity(size).map_err(|_| out_of_memory(size))?;

        let mut constraint_bytes = 0;
        let constraint_blocks = fields
            .iter()
            .map(|field| {
                if field.constraint_def().is_empty() {
                    return Ok(Bump::new());
                }
                let size = constraint_def_array_size(field.constraint_def());
                constraint_bytes += size;
                Bump::try_with_capacity(size).map_err(|_| out_of_memory(size))
            })
            .collect::<Result<Vec<_>>>()?;

        let inner = FieldDefBlocks::new(block, constraint_blocks, size, |block, constraint_blocks| {
            // The array is carved first so the strings behind it need no
            // padding and the total matches `size` exactly.
            &*block.alloc_slice_fill_with(fields.len(), |i| {
                fields[i].dup_in(block, &constraint_blocks[i])
            })
        });
        debug!(
            count = fields.len(),
            block_size = size,
            constraint_bytes,
            "duplicated field definition array"
        );
        Ok(Self { inner: Some(inner) })
    }

    pub fn fields(&self) -> &[FieldDef<'_>] {
        match &self.inner {
            Some(inner) => *inner.borrow_fields(),
            None => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Size of the group block holding descriptors, names and default values.
    pub fn block_size(&self) -> usize {
        self.inner.as_ref().map_or(0, |inner| *inner.borrow_size())
    }

    /// Release everything the array owns.
    ///
    /// Constraint lists go first. In debug builds the group block is then
    /// overwritten with a trash pattern before it is freed.
    pub fn destroy(self) {
        let count = self.len();
        let block = self.release();
        debug!(count, "destroyed field definition array");
        drop(block);
    }

    /// Free the constraint blocks and hand back the trashed group block.
    fn release(self) -> Option<Bump> {
        let heads = self.inner?.into_heads();
        drop(heads.constraint_blocks);
        let mut block = heads.block;
        if cfg!(debug_assertions) {
            block.reset();
            block.alloc_slice_fill_copy(heads.size, TRASH_BYTE);
        }
        Some(block)
    }
}

impl Default for FieldDefArray {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for FieldDefArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefArray")
            .field("fields", &self.fields())
            .field("block_size", &self.block_size())
            .finish()
    }
}

// SAFETY: the arenas are only allocated from while `duplicate` builds the
// array. Past that point nothing reachable through `&FieldDefArray` touches
// their interior state, so shared access from several threads only reads the
// immutable descriptors.
unsafe impl Sync for FieldDefArray {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{ConstraintDef, ConstraintKind, ForeignKeyDef, ForeignKeyField};
    use crate::field_type::FieldType;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_send_sync() {
        assert_send_sync::<FieldDefArray>();
    }

    #[test]
    fn test_empty() {
        let array = FieldDefArray::duplicate(&[]).unwrap();
        assert!(array.is_empty());
        assert_eq!(array.len(), 0);
        assert_eq!(array.block_size(), 0);
        assert!(array.release().is_none());
        FieldDefArray::default().destroy();
    }

    #[test]
    fn test_duplicate() {
        let default = [0xCD, 0x01, 0x00];
        let constraints = [
            ConstraintDef::new("positive", ConstraintKind::Func { func_id: 12 }),
            ConstraintDef::new(
                "owner",
                ConstraintKind::ForeignKey(ForeignKeyDef::new(Some(600), ForeignKeyField::Name("id"))),
            ),
        ];
        let fields = [
            FieldDef::new("id", FieldType::Unsigned),
            FieldDef::new("count", FieldType::Integer)
                .with_default_value(&default)
                .with_constraint_def(&constraints),
            FieldDef::new("note", FieldType::String).with_nullable(true),
        ];
        let array = FieldDefArray::duplicate(&fields).unwrap();
        assert_eq!(array.fields(), &fields[..]);
        assert_eq!(
            array.block_size(),
            3 * mem::size_of::<FieldDef>() + 2 + 5 + 3 + 4
        );
        let copy = &array.fields()[1];
        assert_ne!(copy.name().as_ptr(), fields[1].name().as_ptr());
        assert_ne!(copy.constraint_def().as_ptr(), constraints.as_ptr());
        assert_eq!(copy.constraint_def()[1].name(), "owner");
        array.destroy();
        // the source is untouched
        assert_eq!(fields[1].name(), "count");
        assert_eq!(fields[1].default_value(), Some(&default[..]));
    }

    #[test]
    fn test_fields_without_constraints_own_no_constraint_memory() {
        let fields = [
            FieldDef::new("a", FieldType::Any),
            FieldDef::new("bb", FieldType::Map).with_default_value(&[0x80]),
        ];
        let array = FieldDefArray::duplicate(&fields).unwrap();
        let inner = array.inner.as_ref().unwrap();
        let blocks = inner.borrow_constraint_blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|block| block.allocated_bytes() == 0));
        assert!(inner.borrow_block().allocated_bytes() >= array.block_size());
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_release_trashes_block() {
        let fields = [
            FieldDef::new("first", FieldType::Double),
            FieldDef::new("second", FieldType::Uuid).with_default_value(&[0xD8, 0x02]),
        ];
        let array = FieldDefArray::duplicate(&fields).unwrap();
        let size = array.block_size();
        let mut block = array.release().unwrap();
        let trashed: Vec<u8> = block
            .iter_allocated_chunks()
            .flatten()
            // SAFETY: every allocated byte was just written by the trash fill.
            .map(|byte| unsafe { byte.assume_init() })
            .collect();
        assert_eq!(trashed.len(), size);
        assert!(trashed.iter().all(|&byte| byte == TRASH_BYTE));
    }
}

use bumpalo::Bump;
use std::mem;

/// A named rule attached to a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstraintDef<'a> {
    name: &'a str,
    kind: ConstraintKind<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConstraintKind<'a> {
    /// Checked by calling a stored function.
    Func { func_id: u32 },
    ForeignKey(ForeignKeyDef<'a>),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForeignKeyDef<'a> {
    /// `None` refers to the space owning the field.
    space_id: Option<u32>,
    field: ForeignKeyField<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ForeignKeyField<'a> {
    Id(u32),
    Name(&'a str),
}

impl<'a> ConstraintDef<'a> {
    pub fn new(name: &'a str, kind: ConstraintKind<'a>) -> Self {
        Self { name, kind }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn kind(&self) -> &ConstraintKind<'a> {
        &self.kind
    }

    pub fn is_foreign_key(&self) -> bool {
        matches!(self.kind, ConstraintKind::ForeignKey(_))
    }

    fn strings_size(&self) -> usize {
        let field_name_len = match self.kind {
            ConstraintKind::ForeignKey(ForeignKeyDef {
                field: ForeignKeyField::Name(name),
                ..
            }) => name.len(),
            _ => 0,
        };
        self.name.len() + field_name_len
    }

    fn dup_in<'b>(&self, bump: &'b Bump) -> ConstraintDef<'b> {
        let kind = match self.kind {
            ConstraintKind::Func { func_id } => ConstraintKind::Func { func_id },
            ConstraintKind::ForeignKey(fkey) => ConstraintKind::ForeignKey(ForeignKeyDef {
                space_id: fkey.space_id,
                field: match fkey.field {
                    ForeignKeyField::Id(id) => ForeignKeyField::Id(id),
                    ForeignKeyField::Name(name) => ForeignKeyField::Name(bump.alloc_str(name)),
                },
            }),
        };
        ConstraintDef {
            name: bump.alloc_str(self.name),
            kind,
        }
    }
}

impl<'a> ForeignKeyDef<'a> {
    pub fn new(space_id: Option<u32>, field: ForeignKeyField<'a>) -> Self {
        Self { space_id, field }
    }

    pub fn space_id(&self) -> Option<u32> {
        self.space_id
    }

    pub fn field(&self) -> ForeignKeyField<'a> {
        self.field
    }
}

/// Exact number of bytes [`constraint_def_array_dup`] needs.
pub(crate) fn constraint_def_array_size(defs: &[ConstraintDef<'_>]) -> usize {
    mem::size_of::<ConstraintDef>() * defs.len()
        + defs.iter().map(ConstraintDef::strings_size).sum::<usize>()
}

/// Copy a constraint list and every string it references into `bump`.
pub(crate) fn constraint_def_array_dup<'b>(
    defs: &[ConstraintDef<'_>],
    bump: &'b Bump,
) -> &'b [ConstraintDef<'b>] {
    if defs.is_empty() {
        return &[];
    }
    // The array goes first so the strings after it need no padding.
    bump.alloc_slice_fill_with(defs.len(), |i| defs[i].dup_in(bump))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_size() {
        let defs = [
            ConstraintDef::new("ck", ConstraintKind::Func { func_id: 7 }),
            ConstraintDef::new(
                "fk",
                ConstraintKind::ForeignKey(ForeignKeyDef::new(
                    Some(512),
                    ForeignKeyField::Name("owner"),
                )),
            ),
        ];
        assert_eq!(
            constraint_def_array_size(&defs),
            2 * mem::size_of::<ConstraintDef>() + 2 + 2 + 5
        );
        assert_eq!(constraint_def_array_size(&[]), 0);
    }

    #[test]
    fn test_array_dup() {
        let defs = [
            ConstraintDef::new("ck", ConstraintKind::Func { func_id: 7 }),
            ConstraintDef::new(
                "fk",
                ConstraintKind::ForeignKey(ForeignKeyDef::new(None, ForeignKeyField::Name("id"))),
            ),
        ];
        let bump = Bump::with_capacity(constraint_def_array_size(&defs));
        let capacity = bump.allocated_bytes();
        let copy = constraint_def_array_dup(&defs, &bump);
        assert_eq!(copy, &defs[..]);
        assert!(!copy[0].is_foreign_key());
        assert!(copy[1].is_foreign_key());
        assert_ne!(copy[1].name().as_ptr(), defs[1].name().as_ptr());
        // everything fit in the precomputed block
        assert_eq!(bump.allocated_bytes(), capacity);
    }

    #[test]
    fn test_empty_dup_does_not_allocate() {
        let bump = Bump::new();
        assert!(constraint_def_array_dup(&[], &bump).is_empty());
        assert_eq!(bump.allocated_bytes(), 0);
    }
}

use super::field_def::decode_field_defs;
use super::msgpack::{parse_ext_header, wire_type};
use crate::consts::COLL_NONE;
use crate::constraint::{ConstraintDef, ConstraintKind, ForeignKeyField};
use crate::field_def_array::FieldDefArray;
use crate::field_type::WireType;
use crate::schema::FieldDef;
use bumpalo::Bump;
use humansize::{file_size_opts, FileSize};
use nom::Offset;
use term_table::row::Row;
use term_table::table_cell::{Alignment, TableCell};
use term_table::Table;

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

fn italic(s: &str) -> String {
    format!("\x1b[3m{s}\x1b[0m")
}

fn strikethrough(s: &str) -> String {
    format!("\x1b[9m{s}\x1b[0m")
}

fn human_size(size: usize) -> String {
    format!(
        "{} ({})",
        size.file_size(file_size_opts::BINARY)
            .unwrap_or_else(|e| e),
        italic(&size.to_string())
    )
}

fn format_default(field: &FieldDef) -> String {
    let raw = match field.default_value() {
        Some(raw) => raw,
        None => return strikethrough("None"),
    };
    let kind = match wire_type(raw) {
        Ok((_, WireType::Ext)) => match parse_ext_header(raw) {
            Ok((_, (ext_type, _))) => ext_type.name().to_string(),
            Err(e) => format!("{e:?}"),
        },
        Ok((_, wire)) => wire.name().to_string(),
        Err(e) => format!("{e:?}"),
    };
    format!("{} {}", raw.len(), italic(&kind))
}

fn format_constraint(constraint: &ConstraintDef) -> String {
    match constraint.kind() {
        ConstraintKind::Func { func_id } => format!("{} (func {func_id})", constraint.name()),
        ConstraintKind::ForeignKey(fkey) => {
            let space = match fkey.space_id() {
                Some(space_id) => space_id.to_string(),
                None => italic("self"),
            };
            let field = match fkey.field() {
                ForeignKeyField::Id(id) => id.to_string(),
                ForeignKeyField::Name(name) => format!("'{name}'"),
            };
            format!("{} (fkey {space}.{field})", constraint.name())
        }
    }
}

fn format_fields(fields: &[FieldDef]) -> String {
    const HEADINGS: [&str; 10] = [
        "#",
        "Name",
        "Type",
        "Nullable",
        "Action",
        "Collation",
        "Compression",
        "Default",
        "Default Func",
        "Constraints",
    ];

    let mut table = Table::new();
    table.add_row(Row::new(vec![TableCell::new_with_alignment(
        bold("Fields"),
        HEADINGS.len(),
        Alignment::Center,
    )]));
    table.add_row(Row::new(
        HEADINGS
            .iter()
            .map(|heading| TableCell::new_with_alignment(heading, 1, Alignment::Center))
            .collect::<Vec<_>>(),
    ));

    for (i, field) in fields.iter().enumerate() {
        let collation = if field.coll_id() == COLL_NONE {
            strikethrough("None")
        } else {
            field.coll_id().to_string()
        };
        let default_func = match field.default_func_id() {
            0 => strikethrough("None"),
            id => id.to_string(),
        };
        let constraints = field
            .constraint_def()
            .iter()
            .map(format_constraint)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::new(vec![
            TableCell::new_with_alignment(i, 1, Alignment::Right),
            TableCell::new(bold(field.name())),
            TableCell::new(field.field_type()),
            TableCell::new(field.is_nullable()),
            TableCell::new(field.nullable_action()),
            TableCell::new_with_alignment(collation, 1, Alignment::Right),
            TableCell::new(field.compression_type()),
            TableCell::new_with_alignment(format_default(field), 1, Alignment::Right),
            TableCell::new_with_alignment(default_func, 1, Alignment::Right),
            TableCell::new(constraints),
        ]));
    }

    table.render()
}

fn format_summary(array: &FieldDefArray, input_size: usize, trailing: usize) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![TableCell::new_with_alignment(
        bold("Summary"),
        2,
        Alignment::Center,
    )]));
    table.add_row(Row::new(vec![
        TableCell::new("Fields"),
        TableCell::new_with_alignment(array.len(), 1, Alignment::Right),
    ]));
    table.add_row(Row::new(vec![
        TableCell::new("Input Size"),
        TableCell::new_with_alignment(human_size(input_size), 1, Alignment::Right),
    ]));
    table.add_row(Row::new(vec![
        TableCell::new("Trailing Bytes"),
        TableCell::new_with_alignment(trailing, 1, Alignment::Right),
    ]));
    table.add_row(Row::new(vec![
        TableCell::new("Block Size"),
        TableCell::new_with_alignment(human_size(array.block_size()), 1, Alignment::Right),
    ]));

    table.render()
}

pub fn inspect(input: &[u8]) -> Result<String, String> {
    let mut out = String::new();

    let bump = Bump::new();
    let (rest, fields) = decode_field_defs(input, &bump, false)
        .map_err(|e| format!("Error Decoding Field Definitions: {e}"))?;
    let consumed = input.offset(rest);
    let array = FieldDefArray::duplicate(fields)
        .map_err(|e| format!("Error Duplicating Field Definitions: {e}"))?;
    drop(bump);

    out.push_str(&format_fields(array.fields()));
    out.push_str("\n\n");
    out.push_str(&format_summary(&array, consumed, rest.len()));
    out.push_str("\n\n");

    array.destroy();
    Ok(out)
}

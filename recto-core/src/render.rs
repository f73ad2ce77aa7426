// Human-readable record rendering

use std::fmt::Write;

use crate::data::Value;
use crate::record::Record;

/// Render a record as a line-oriented dump.
///
/// Line 0 names the schema; each following line is
/// `<position>: <name> (<type>[: <default>]): <value>` with positions
/// counting from 1 (position 0 being the schema slot). An attribute
/// whose resolved value is itself a record recurses with two-space
/// indentation.
pub fn render(record: &Record) -> String {
    let mut out = String::new();
    render_into(record, 0, &mut out);
    out
}

fn render_into(record: &Record, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    let _ = writeln!(out, "{}{}", pad, record.schema().type_name());

    for (position, attr) in record.schema().attributes().iter().enumerate() {
        let value = record
            .get(&attr.name)
            .unwrap_or(Value::Absent);

        let mut line = format!("{}{}: {}", pad, position + 1, attr.name);
        if let Some(tag) = attr.tag {
            if attr.default.is_defined() {
                let _ = write!(line, " ({}: {})", tag, attr.default);
            } else {
                let _ = write!(line, " ({})", tag);
            }
        }

        match value {
            Value::Rec(nested) => {
                let _ = writeln!(out, "{}:", line);
                render_into(&nested, depth + 1, out);
            }
            other => {
                let _ = writeln!(out, "{}: {}", line, other);
            }
        }
    }
}

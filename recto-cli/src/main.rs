use clap::{Parser, Subcommand};
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use recto_core::data::{TypeTag, Value};
use recto_core::query;
use recto_core::record::{Record, Vlist};
use recto_core::render;
use recto_core::schema::AttrSpec;

#[derive(Parser)]
#[command(name = "recto")]
#[command(about = "Schema-described immutable records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every record in a document
    Show {
        /// Input file
        file: PathBuf,
    },
    /// Validate every record's values against the declared types
    Validate {
        /// Input file
        file: PathBuf,
    },
    /// Select, sort, and group records by attribute value
    Query {
        /// Input file
        file: PathBuf,

        /// Equality predicate `attr=value`, repeatable; all must match
        #[arg(short = 'w', long = "where")]
        predicates: Vec<String>,

        /// Sort the selection by this attribute
        #[arg(long)]
        sort_by: Option<String>,

        /// Group the selection by this attribute
        #[arg(long)]
        group_by: Option<String>,
    },
    /// Create an example document
    Example {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonDocument {
    schema: JsonSchema,
    records: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonSchema {
    name: String,
    attributes: Vec<JsonAttribute>,
}

#[derive(Serialize, Deserialize, Debug)]
struct JsonAttribute {
    name: String,
    #[serde(rename = "type")]
    type_code: Option<String>,
    default: Option<serde_json::Value>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Show { file } => {
            show_records(file)?;
        }
        Commands::Validate { file } => {
            validate_records(file)?;
        }
        Commands::Query {
            file,
            predicates,
            sort_by,
            group_by,
        } => {
            query_records(file, predicates, sort_by.as_deref(), group_by.as_deref())?;
        }
        Commands::Example { output } => {
            create_example(output)?;
        }
    }

    Ok(())
}

/// Convert the document's schema description into builder specs. Type
/// codes are strict at this boundary: an unknown code is an error, not a
/// silently-untyped attribute.
fn convert_json_schema(schema: &JsonSchema) -> Result<Vec<AttrSpec>> {
    let mut specs = Vec::with_capacity(schema.attributes.len());
    for attr in &schema.attributes {
        let tag = match &attr.type_code {
            Some(code) => Some(TypeTag::from_code(code)?),
            None => None,
        };
        let default = match &attr.default {
            Some(json) => convert_json_value(json)?,
            None => Value::Absent,
        };
        specs.push(AttrSpec::full(&attr.name, tag, default));
    }
    Ok(specs)
}

fn convert_json_value(json: &serde_json::Value) -> Result<Value> {
    Value::from_json(json).ok_or_else(|| {
        eyre::eyre!("Unsupported value in document (nested records cannot be spelled in JSON): {}", json)
    })
}

fn load_document(file: &PathBuf) -> Result<(JsonSchema, Vec<Record>)> {
    let content = fs::read_to_string(file)?;
    let document: JsonDocument = serde_json::from_str(&content)?;

    let specs = convert_json_schema(&document.schema)?;
    // build the schema once and clone records off the template so every
    // record in the collection shares it
    let template = Record::construct(&document.schema.name, &specs, Vlist::empty(), None)?;

    let mut records = Vec::with_capacity(document.records.len());
    for entry in &document.records {
        let object = entry
            .as_object()
            .ok_or_else(|| eyre::eyre!("Record entry is not an object: {}", entry))?;
        let mut pairs = Vec::with_capacity(object.len());
        for (name, json) in object {
            pairs.push((name.clone(), convert_json_value(json)?));
        }
        let record = Record::construct("", &[], Vlist::Pairs(pairs), Some(&template))?;
        records.push(record);
    }

    Ok((document.schema, records))
}

fn show_records(file: &PathBuf) -> Result<()> {
    let (schema, records) = load_document(file)?;
    println!("{} ({} records)", schema.name, records.len());
    println!();
    for record in &records {
        print!("{}", render::render(record));
        println!();
    }
    Ok(())
}

fn validate_records(file: &PathBuf) -> Result<()> {
    let (_, records) = load_document(file)?;

    let mut failures = 0;
    for (i, record) in records.iter().enumerate() {
        match record.check_types() {
            Ok(()) => println!("Record {}: PASS", i),
            Err(e) => {
                failures += 1;
                println!("Record {}: FAIL - {}", i, e);
            }
        }
    }

    if failures == 0 {
        println!("All {} records validate", records.len());
    } else {
        println!("{} of {} records failed", failures, records.len());
    }
    Ok(())
}

fn query_records(
    file: &PathBuf,
    predicates: &[String],
    sort_by: Option<&str>,
    group_by: Option<&str>,
) -> Result<()> {
    let (_, records) = load_document(file)?;

    let pairs = parse_predicates(predicates)?;
    let mut selected = if pairs.is_empty() {
        records
    } else {
        query::select_by_attrs_values(&records, &pairs)
    };

    if let Some(attr) = sort_by {
        selected = query::sort_by_attr(&selected, attr);
    }

    let output = match group_by {
        Some(attr) => {
            let groups = query::group_by_attr(&selected, attr);
            serde_json::Value::Array(groups.iter().map(|group| records_to_json(group)).collect())
        }
        None => records_to_json(&selected),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Parse `attr=value` predicates. The value side is read as JSON when it
/// parses as JSON (numbers, booleans), and as a bare string otherwise.
fn parse_predicates(predicates: &[String]) -> Result<Vec<(String, Value)>> {
    let mut pairs = Vec::with_capacity(predicates.len());
    for predicate in predicates {
        let (attr, text) = predicate
            .split_once('=')
            .ok_or_else(|| eyre::eyre!("Predicate must be attr=value: {}", predicate))?;
        let value = match serde_json::from_str::<serde_json::Value>(text) {
            Ok(json) => convert_json_value(&json)?,
            Err(_) => Value::Str(text.to_string()),
        };
        pairs.push((attr.to_string(), value));
    }
    Ok(pairs)
}

fn records_to_json(records: &[Record]) -> serde_json::Value {
    serde_json::Value::Array(
        records
            .iter()
            .map(|record| Value::Rec(Box::new(record.clone())).to_json())
            .collect(),
    )
}

fn create_example(output_dir: &PathBuf) -> Result<()> {
    println!("Creating example document in: {}", output_dir.display());

    fs::create_dir_all(output_dir)?;

    let parts_example = serde_json::json!({
        "schema": {
            "name": "Part",
            "attributes": [
                {"name": "part_no", "type": "str"},
                {"name": "size", "type": "num"},
                {"name": "grade", "type": "str", "default": "b"},
                {"name": "holes", "type": "seq"}
            ]
        },
        "records": [
            {"part_no": "alpha", "size": 4},
            {"part_no": "bravo", "size": 0, "grade": "a"},
            {"part_no": "charlie", "size": 1, "holes": [3, 5]},
            {"part_no": "delta", "size": 3, "grade": "a"},
            {"part_no": "echo", "size": 2}
        ]
    });

    let parts_file = output_dir.join("parts.json");
    fs::write(&parts_file, serde_json::to_string_pretty(&parts_example)?)?;
    println!("Created: {}", parts_file.display());

    println!("\nExample usage:");
    println!("  recto show {}", parts_file.display());
    println!(
        "  recto query {} --where grade=a --sort-by size",
        parts_file.display()
    );
    println!("  recto query {} --group-by grade", parts_file.display());

    Ok(())
}

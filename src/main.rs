//! Command-line interface for xmldefinition

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use std::sync::Arc;

#[cfg(feature = "cli")]
use xmldefinition::types::{
    ComplexType, Element, MemoryRegistry, Properties, Property, Type, Value,
};
#[cfg(feature = "cli")]
use xmldefinition::{Encoding, MarshalConfig, Marshaller, UnmarshalConfig, Unmarshaller};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xmldef")]
#[command(author, version, about = "XML type definition inspection and formatting tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Args, Debug)]
struct ReadArgs {
    /// Id the definition is known under, for self references
    #[arg(long, value_name = "ID")]
    self_id: Option<String>,

    /// Drop unknown attributes and unresolvable definitions
    #[arg(long)]
    ignore_unknown: bool,

    /// Load a referenced definition (repeatable)
    #[arg(long = "define", value_name = "ID=PATH")]
    definitions: Vec<String>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Read a definition and display its structure
    Inspect {
        /// Path to the definition file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,

        #[command(flatten)]
        read: ReadArgs,
    },

    /// Read a definition and write it back out
    Format {
        /// Path to the definition file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write an XML declaration
        #[arg(long)]
        declaration: bool,

        /// Write without indentation
        #[arg(long)]
        compact: bool,

        /// Output encoding: UTF-8, ISO-8859-1 or US-ASCII
        #[arg(short, long, default_value = "UTF-8")]
        encoding: String,

        /// Inline supertypes instead of referencing them
        #[arg(long)]
        resolve_extensions: bool,

        /// Inline referenced definitions
        #[arg(long)]
        resolve_definitions: bool,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        read: ReadArgs,
    },
}

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { file, json, read } => cmd_inspect(file, json, read),
        Commands::Format {
            file,
            declaration,
            compact,
            encoding,
            resolve_extensions,
            resolve_definitions,
            output,
            read,
        } => {
            let config = Encoding::from_label(&encoding).map(|encoding| {
                MarshalConfig::new()
                    .with_encoding(encoding)
                    .with_xml_declaration(declaration)
                    .with_pretty_print(!compact)
                    .with_resolve_extensions(resolve_extensions)
                    .with_resolve_definitions(resolve_definitions)
            });
            match config {
                Ok(config) => cmd_format(file, config, output, read),
                Err(e) => Err(e.into()),
            }
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load `--define` files into a registry, each under its own id
#[cfg(feature = "cli")]
fn load_registry(read: &ReadArgs) -> Result<MemoryRegistry, Box<dyn std::error::Error>> {
    let mut registry = MemoryRegistry::new();
    for definition in &read.definitions {
        let (id, path) = definition
            .split_once('=')
            .ok_or_else(|| format!("Invalid definition '{}', expected ID=PATH", definition))?;
        let config = UnmarshalConfig::new()
            .with_self_id(id)
            .with_ignore_unknown(read.ignore_unknown);
        let ty = Unmarshaller::new(config)
            .with_types(Arc::new(registry.clone()))
            .unmarshal_file(path)?;
        registry.register(Type::complex(ty))?;
    }
    Ok(registry)
}

#[cfg(feature = "cli")]
fn read_definition(
    file: &Path,
    read: &ReadArgs,
) -> Result<(ComplexType, Arc<MemoryRegistry>, Vec<String>), Box<dyn std::error::Error>> {
    let registry = Arc::new(load_registry(read)?);
    let mut config = UnmarshalConfig::new().with_ignore_unknown(read.ignore_unknown);
    if let Some(id) = &read.self_id {
        config = config.with_self_id(id.as_str());
    }
    let mut unmarshaller = Unmarshaller::new(config).with_types(registry.clone());
    let ty = unmarshaller.unmarshal_file(file)?;
    let ignored = unmarshaller.ignored_references().to_vec();
    Ok((ty, registry, ignored))
}

#[cfg(feature = "cli")]
fn cmd_inspect(file: PathBuf, json_output: bool, read: ReadArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (ty, _registry, ignored) = read_definition(&file, &read)?;

    if json_output {
        let mut output = serde_json::Map::new();
        output.insert("definition".to_string(), complex_json(&ty));
        output.insert("ignoredReferences".to_string(), serde_json::json!(ignored));
        println!("{}", serde_json::to_string_pretty(&serde_json::Value::Object(output))?);
        return Ok(());
    }

    println!("xmldefinition v{}", xmldefinition::VERSION);
    println!();
    let name = ty.name.as_deref().unwrap_or("(anonymous)");
    match ty.super_type.id() {
        Some(super_type) => println!("structure {} extends {}", name, super_type),
        None => println!("structure {}", name),
    }
    print_children(&ty, 1);

    if !ignored.is_empty() {
        println!();
        println!("Ignored references:");
        for reference in &ignored {
            println!("  - {}", reference);
        }
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn print_children(ty: &ComplexType, level: usize) {
    let indent = "  ".repeat(level);
    for child in ty.children() {
        println!(
            "{}{} {} : {}{}",
            indent,
            tag_of(child),
            child.name,
            type_label(child),
            occurs_label(child)
        );
        for value in child.enumeration() {
            println!("{}  = {}", indent, value_label(value));
        }
        if let Type::Complex(body) = &child.ty {
            if body.id().is_none() {
                print_children(body, level + 1);
            }
        }
    }
    for group in ty.groups() {
        println!(
            "{}group {}{} ({})",
            indent,
            group.kind,
            group.name().map(|n| format!(" {}", n)).unwrap_or_default(),
            group.members.join(", ")
        );
    }
}

#[cfg(feature = "cli")]
fn tag_of(element: &Element) -> &'static str {
    if element.is_attribute() {
        "attribute"
    } else if element.ty.is_complex() {
        "structure"
    } else {
        "field"
    }
}

#[cfg(feature = "cli")]
fn type_label(element: &Element) -> String {
    match &element.ty {
        Type::Simple(simple) => simple
            .id()
            .map(str::to_string)
            .unwrap_or_else(|| simple.kind.to_string()),
        Type::Complex(body) => match (body.id(), &body.wrapped) {
            (Some(id), _) => id.to_string(),
            (None, Some(wrapped)) => format!("{{{}}}", wrapped.kind),
            (None, None) => "{}".to_string(),
        },
        Type::Reference(id) => id.clone(),
    }
}

#[cfg(feature = "cli")]
fn occurs_label(element: &Element) -> String {
    let min = element.properties.min_occurs().unwrap_or(1);
    let max = match element.properties.max_occurs() {
        Some(0) => "unbounded".to_string(),
        Some(max) => max.to_string(),
        None => "1".to_string(),
    };
    if min == 1 && max == "1" {
        String::new()
    } else {
        format!(" [{}..{}]", min, max)
    }
}

#[cfg(feature = "cli")]
fn value_label(value: &Value) -> String {
    use xmldefinition::types::{DefaultConverter, ValueConverter};
    DefaultConverter::new()
        .to_text(value)
        .unwrap_or_else(|_| format!("{:?}", value))
}

#[cfg(feature = "cli")]
fn properties_json(properties: &Properties) -> serde_json::Value {
    let map = properties
        .iter()
        .map(|(property, value)| {
            let value = match (property, value) {
                (Property::MaxOccurs, Value::Integer(0)) => serde_json::json!("unbounded"),
                (_, Value::List(values)) => {
                    serde_json::json!(values.iter().map(value_label).collect::<Vec<_>>())
                }
                (_, other) => serde_json::json!(value_label(other)),
            };
            (property.name().to_string(), value)
        })
        .collect();
    serde_json::Value::Object(map)
}

#[cfg(feature = "cli")]
fn complex_json(ty: &ComplexType) -> serde_json::Value {
    use serde_json::json;

    let children: Vec<serde_json::Value> = ty
        .children()
        .map(|child| {
            let mut entry = json!({
                "name": child.name,
                "kind": tag_of(child),
                "type": type_label(child),
                "properties": properties_json(&child.properties),
            });
            if let Type::Complex(body) = &child.ty {
                if body.id().is_none() {
                    entry["children"] = complex_json(body)["children"].clone();
                }
            }
            entry
        })
        .collect();
    let groups: Vec<serde_json::Value> = ty
        .groups()
        .iter()
        .map(|group| {
            json!({
                "kind": group.kind.identifier(),
                "name": group.name(),
                "members": group.members,
            })
        })
        .collect();

    json!({
        "name": ty.name,
        "superType": ty.super_type.id(),
        "type": ty.wrapped.as_ref().map(|w| w.kind.identifier()),
        "properties": properties_json(&ty.properties),
        "children": children,
        "groups": groups,
    })
}

#[cfg(feature = "cli")]
fn cmd_format(
    file: PathBuf,
    config: MarshalConfig,
    output: Option<PathBuf>,
    read: ReadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ty, registry, _ignored) = read_definition(&file, &read)?;

    let marshaller = Marshaller::new(config).with_registry(registry);
    let mut bytes = marshaller.marshal_to_bytes(&ty, &Properties::new())?;
    bytes.push(b'\n');

    match output {
        Some(path) => {
            fs::write(&path, &bytes)?;
            eprintln!("Definition written to {}", path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&bytes)?;
        }
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}

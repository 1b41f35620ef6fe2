//! The template declaration
//!
//! `template <name> (<body>)` declares a reusable graph template. Argument 0
//! is the declared name; argument 1, when present, is the body paragraph.
//! Each body line is classified into exactly one shape, tested in priority
//! order:
//!
//! 1. *Input declaration*: `name = <type words>` (the words after `=` form
//!    one full angle-bracketed type token, possibly spanning spaces).
//! 2. *Template application*: `v = f arg0 arg1 ...` (more than three words).
//! 3. *Region*: `name = (<nested body>)` (exactly three words).
//! 4. *Literal value*: a single bare word, kept verbatim.
//!
//! Anything else records an `invalid syntax at line N` diagnostic and
//! contributes no payload entry; interpretation continues with the remaining
//! lines.
//!
//! Compilation emits two statements for the consuming runtime: a
//! registration call carrying the structured payload, and a schema
//! registration derived from the input declarations (leaf type names that
//! refer to other registered schemas are resolved by the runtime, not here).

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Map, Value};

use crate::dag::declarations::Declaration;
use crate::dag::document::{Line, Paragraph, Word};

/// Runtime entry point receiving the template payload.
const BUILD_FUNCTION: &str = "dagui.buildTemplate";
/// Runtime entry point receiving the derived schema.
const SCHEMA_FUNCTION: &str = "dagui.registerSchema";

/// Shape of an input declaration's type token sequence once space-joined.
static TYPE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<.+>$").expect("type token pattern is valid"));

/// A parsed template declaration: declared name, body payload, and the
/// semantic diagnostics accumulated while reading the body.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    arguments: Vec<Word>,
    errors: Vec<String>,
    data: Vec<Value>,
}

impl Template {
    /// Interpret a declaration line as a template. Construction never
    /// fails; problems surface through [`Declaration::errors`].
    pub fn new(line: &Line) -> Self {
        let arguments: Vec<Word> = line.words.iter().skip(1).cloned().collect();
        let mut errors = Vec::new();

        let name = match arguments.first().and_then(Word::text) {
            Some(name) => name.to_string(),
            None => {
                errors.push("template declaration requires a name".to_string());
                String::new()
            }
        };

        let data = match arguments.get(1) {
            Some(Word::Paragraph(body)) => paragraph_to_data(body, &mut errors),
            Some(Word::Text(_)) => {
                errors.push("template body must be a bracketed block".to_string());
                Vec::new()
            }
            None => Vec::new(),
        };

        Self {
            name,
            arguments,
            errors,
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The per-line body payload, in body order.
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// The schema derived from the body: a string leaf per input
    /// declaration, nested mappings for regions and single-paragraph
    /// template applications, `null` when nothing remains.
    pub fn schema(&self) -> Value {
        schema_of(&self.data)
    }

    /// The statement registering the template payload with the runtime.
    pub fn build_statement(&self) -> String {
        let payload = json!({
            "templateName": self.name,
            "data": self.data,
        });
        format!("{BUILD_FUNCTION}({payload});")
    }

    /// The statement registering the derived schema with the runtime.
    pub fn schema_statement(&self) -> String {
        let name = Value::String(self.name.clone());
        format!("{SCHEMA_FUNCTION}({name}, {});", self.schema())
    }
}

impl Declaration for Template {
    fn argument(&self, n: usize) -> Option<&Word> {
        self.arguments.get(n)
    }

    fn given_arity(&self) -> usize {
        self.arguments.len()
    }

    fn errors(&self) -> &[String] {
        &self.errors
    }

    fn javascript(&self) -> String {
        format!("{}\n{}", self.build_statement(), self.schema_statement())
    }
}

fn paragraph_to_data(paragraph: &Paragraph, errors: &mut Vec<String>) -> Vec<Value> {
    let mut data = Vec::new();
    for (index, line) in paragraph.lines.iter().enumerate() {
        match line_to_data(line, errors) {
            Some(value) => data.push(value),
            None => errors.push(format!("invalid syntax at line {}", index + 1)),
        }
    }
    data
}

fn line_to_data(line: &Line, errors: &mut Vec<String>) -> Option<Value> {
    // The input-declaration shape is tested first: a multi-word type such as
    // `x = <list of int>` also has the word count of an application, and the
    // full `<...>` token sequence is the more specific reading.
    if let Some(input_type) = input_declaration_type(line) {
        Some(as_input_declaration(line, input_type))
    } else if is_template_application(line) {
        Some(as_template_application(line, errors))
    } else if is_region(line) {
        Some(as_region(line, errors))
    } else if let Some(value) = literal_value(line) {
        Some(value)
    } else {
        None
    }
}

fn word_text(line: &Line, n: usize) -> Option<&str> {
    line.word(n).and_then(Word::text)
}

fn is_assignment(line: &Line) -> bool {
    word_text(line, 0).is_some() && word_text(line, 1) == Some("=")
}

fn is_template_application(line: &Line) -> bool {
    line.length() > 3 && is_assignment(line) && word_text(line, 2).is_some()
}

fn as_template_application(line: &Line, errors: &mut Vec<String>) -> Value {
    let mut object = Map::new();
    object.insert("type".to_string(), json!("templateApplication"));
    object.insert("variableName".to_string(), json!(word_text(line, 0)));
    object.insert("functionName".to_string(), json!(word_text(line, 2)));
    object.insert("arity".to_string(), json!(line.length() - 3));
    for (index, word) in line.words[3..].iter().enumerate() {
        let value = match word {
            Word::Text(text) => json!(text),
            Word::Paragraph(paragraph) => Value::Array(paragraph_to_data(paragraph, errors)),
        };
        object.insert(format!("argument{index}"), value);
    }
    Value::Object(object)
}

fn is_region(line: &Line) -> bool {
    line.length() == 3
        && is_assignment(line)
        && matches!(line.word(2), Some(Word::Paragraph(_)))
}

fn as_region(line: &Line, errors: &mut Vec<String>) -> Value {
    let values = match line.word(2) {
        Some(Word::Paragraph(paragraph)) => paragraph_to_data(paragraph, errors),
        _ => Vec::new(),
    };
    json!({
        "type": "region",
        "regionName": word_text(line, 0),
        "regionValues": values,
    })
}

/// The space-joined, marker-stripped type of an input declaration line, or
/// `None` if the line does not have that shape.
fn input_declaration_type(line: &Line) -> Option<String> {
    if line.length() < 3 || !is_assignment(line) {
        return None;
    }
    let tokens: Option<Vec<&str>> = line.words[2..].iter().map(Word::text).collect();
    let joined = tokens?.join(" ");
    if TYPE_TOKEN.is_match(&joined) {
        Some(joined[1..joined.len() - 1].to_string())
    } else {
        None
    }
}

fn as_input_declaration(line: &Line, input_type: String) -> Value {
    json!({
        "type": "inputDeclaration",
        "inputName": word_text(line, 0),
        "inputType": input_type,
    })
}

/// A line consisting of a single bare word is a literal value entry.
fn literal_value(line: &Line) -> Option<Value> {
    if line.length() == 1 {
        word_text(line, 0).map(|text| Value::String(text.to_string()))
    } else {
        None
    }
}

/// Derive the schema of a body payload: the recursive mirror of the
/// runtime's `BuildTemplate.schema`. Empty mappings are omitted.
fn schema_of(data: &[Value]) -> Value {
    let mut output = Map::new();
    for entry in data {
        match entry.get("type").and_then(Value::as_str) {
            Some("templateApplication") => {
                let single_argument = entry.get("arity").and_then(Value::as_u64) == Some(1);
                if let (true, Some(Value::Array(argument))) =
                    (single_argument, entry.get("argument0"))
                {
                    insert_schema(&mut output, entry.get("variableName"), schema_of(argument));
                }
            }
            Some("region") => {
                if let Some(Value::Array(values)) = entry.get("regionValues") {
                    insert_schema(&mut output, entry.get("regionName"), schema_of(values));
                }
            }
            Some("inputDeclaration") => {
                if let Some(input_type) = entry.get("inputType").cloned() {
                    insert_schema(&mut output, entry.get("inputName"), input_type);
                }
            }
            // Literal values carry no schema.
            _ => {}
        }
    }
    if output.is_empty() {
        Value::Null
    } else {
        Value::Object(output)
    }
}

fn insert_schema(output: &mut Map<String, Value>, key: Option<&Value>, schema: Value) {
    if schema.is_null() {
        return;
    }
    if let Some(key) = key.and_then(Value::as_str) {
        output.insert(key.to_string(), schema);
    }
}

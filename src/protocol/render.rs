//! Python source rendering for generated protocol modules.

use super::transform::{Member, ProtocolDef, ProtocolMember};
use crate::analyzers::python_literals::clean_docstring;
use crate::core::{FunctionDecl, ImportDecl};

pub const DISCLAIMER: &str = "# Auto generated Protocol classes (Do not edit)";

const INDENT: &str = "    ";

/// Imports every generated module needs for the protocol machinery.
pub const PROTOCOL_IMPORTS: [&str; 2] = [
    "from typing import Protocol, runtime_checkable",
    "from abc import abstractmethod",
];

/// Everything that goes into the emitted stub file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedModule {
    /// Imports hoisted from the source modules, already ordered.
    pub imports: Vec<ImportDecl>,
    pub protocols: Vec<ProtocolDef>,
}

pub fn render_module(module: &GeneratedModule) -> String {
    let mut out = String::new();
    out.push_str(DISCLAIMER);
    out.push('\n');
    for import in &module.imports {
        out.push_str(&import.text);
        out.push('\n');
    }
    for import in PROTOCOL_IMPORTS {
        out.push_str(import);
        out.push('\n');
    }

    for protocol in &module.protocols {
        out.push_str("\n\n");
        out.push_str(&render_protocol(protocol));
    }

    out
}

pub fn render_protocol(protocol: &ProtocolDef) -> String {
    let mut out = String::new();
    out.push_str("@runtime_checkable\n");
    if protocol.type_vars.is_empty() {
        out.push_str(&format!("class {}(Protocol):\n", protocol.name));
    } else {
        out.push_str(&format!(
            "class {}(Protocol[{}]):\n",
            protocol.name,
            protocol.type_vars.join(", ")
        ));
    }

    let mut blocks: Vec<String> = Vec::new();
    if let Some(doc) = &protocol.docstring {
        blocks.push(render_docstring(doc, INDENT));
    }

    let attributes: Vec<&Member> = protocol.attributes().collect();
    if !attributes.is_empty() {
        blocks.push(
            attributes
                .iter()
                .map(|attr| render_attribute(attr))
                .collect::<String>(),
        );
    }
    for member in &protocol.members {
        if let ProtocolMember::Call(method) = member {
            blocks.push(render_method(method));
        }
    }

    if blocks.is_empty() {
        out.push_str(INDENT);
        out.push_str("pass\n");
    } else {
        out.push_str(&blocks.join("\n"));
    }
    out
}

fn render_attribute(attr: &Member) -> String {
    let mut out = format!("{}{}: {}\n", INDENT, attr.name, attr.annotation);
    if let Some(doc) = &attr.docstring {
        out.push_str(&render_docstring(&clean_docstring(doc), INDENT));
    }
    out
}

fn render_method(method: &FunctionDecl) -> String {
    let mut out = String::new();
    for decorator in &method.decorators {
        out.push_str(&format!("{}@{}\n", INDENT, decorator));
    }
    out.push_str(&format!("{}def {}({})", INDENT, method.name, method.parameters_text()));
    if let Some(returns) = &method.returns {
        out.push_str(&format!(" -> {}", returns));
    }
    out.push_str(":\n");
    out.push_str(&format!("{INDENT}{INDENT}raise NotImplementedError\n"));
    out
}

/// Render a triple-quoted docstring at the given indentation.
pub fn render_docstring(doc: &str, indent: &str) -> String {
    let mut escaped = doc.replace('\\', "\\\\").replace("\"\"\"", "\\\"\\\"\\\"");

    if !escaped.contains('\n') {
        if escaped.ends_with('"') {
            escaped.pop();
            escaped.push_str("\\\"");
        }
        return format!("{}\"\"\"{}\"\"\"\n", indent, escaped);
    }

    let mut out = format!("{}\"\"\"\n", indent);
    for line in escaped.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out.push_str(indent);
    out.push_str("\"\"\"\n");
    out
}

//! Conversion of stub declarations into structural protocol definitions.
//!
//! These functions are pure: they take declarations by reference and build
//! new protocol values, leaving the parsed modules untouched.

use crate::core::{
    format_parameters, ConstantDecl, Error, Expression, FunctionDecl, Module, Param, ParamKind,
    Result, Statement,
};

/// Name every function protocol's single method is published under.
pub const CALL_METHOD: &str = "__call__";

/// A generated `@runtime_checkable` protocol class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtocolDef {
    pub name: String,
    /// Type variables the protocol is generic over, in first-use order.
    pub type_vars: Vec<String>,
    /// Cleaned class docstring.
    pub docstring: Option<String>,
    pub members: Vec<ProtocolMember>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolMember {
    /// Abstract `__call__` carrying the original signature.
    Call(FunctionDecl),
    Attribute(Member),
}

impl ProtocolDef {
    /// Reference to this protocol usable as an annotation, e.g. `cross[array]`.
    pub fn type_reference(&self) -> String {
        if self.type_vars.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, self.type_vars.join(", "))
        }
    }

    /// The `__call__` method of a function protocol.
    pub fn call_method(&self) -> Option<&FunctionDecl> {
        self.members.iter().find_map(|m| match m {
            ProtocolMember::Call(func) => Some(func),
            _ => None,
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter_map(|m| match m {
            ProtocolMember::Attribute(attr) => Some(attr),
            _ => None,
        })
    }
}

/// A typed attribute of an aggregate protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub annotation: String,
    /// Raw docstring as written after the declaration.
    pub docstring: Option<String>,
    pub type_vars: Vec<String>,
}

impl Member {
    /// Attribute referring to a generated protocol.
    pub fn reference(name: impl Into<String>, protocol: &ProtocolDef) -> Self {
        Self {
            name: name.into(),
            annotation: protocol.type_reference(),
            docstring: None,
            type_vars: protocol.type_vars.clone(),
        }
    }

    /// Attribute for a module-level constant. Constants are never generic.
    pub fn constant(constant: &ConstantDecl, default_type: &str) -> Self {
        Self {
            name: constant.name.clone(),
            annotation: constant
                .annotation
                .clone()
                .unwrap_or_else(|| default_type.to_string()),
            docstring: constant.docstring.clone(),
            type_vars: Vec::new(),
        }
    }
}

/// Collect the names declared as `name = TypeVar("name")`, in order.
///
/// The first positional argument must be a string literal; anything else
/// means the types module is malformed.
pub fn collect_type_vars(types_module: &Module) -> Result<Vec<String>> {
    let mut type_vars = Vec::new();

    for stmt in &types_module.statements {
        let Statement::Constant(constant) = stmt else {
            continue;
        };
        let Some(Expression::Call { function, args }) = &constant.value else {
            continue;
        };
        if function != "TypeVar" {
            continue;
        }
        match args.first() {
            Some(Expression::Str(name)) => type_vars.push(name.clone()),
            _ => {
                return Err(Error::specification(format!(
                    "{}:{}: TypeVar assigned to `{}` needs a string literal name",
                    types_module.path.display(),
                    constant.line,
                    constant.name
                )))
            }
        }
    }

    Ok(type_vars)
}

/// Type variables whose names occur in `text`, keeping declaration order.
pub fn referenced_type_vars(text: &str, type_vars: &[String]) -> Vec<String> {
    type_vars
        .iter()
        .filter(|tv| text.contains(tv.as_str()))
        .cloned()
        .collect()
}

/// Convert a function into a single-method protocol named after it.
pub fn function_to_protocol(func: &FunctionDecl, type_vars: &[String]) -> ProtocolDef {
    let mut call = func.clone();
    call.name = CALL_METHOD.to_string();
    call.docstring = None;
    // Method-style stubs such as `__eq__(self: dtype, ...)` already name
    // their receiver; a second `self` would not compile.
    if call.first_param().map(|p| p.name.as_str()) != Some("self") {
        call.params.insert(0, Param::new("self", ParamKind::PositionalOnly));
    }
    call.decorators.push("abstractmethod".to_string());

    let used = referenced_type_vars(&format_parameters(&call.params), type_vars);

    ProtocolDef {
        name: func.name.clone(),
        type_vars: used,
        docstring: func
            .docstring
            .as_deref()
            .map(crate::analyzers::python_literals::clean_docstring),
        members: vec![ProtocolMember::Call(call)],
    }
}

/// Build an aggregate protocol listing `members` as typed attributes.
pub fn attributes_to_protocol(name: impl Into<String>, members: &[Member]) -> ProtocolDef {
    let mut type_vars: Vec<String> = Vec::new();
    for tv in members.iter().flat_map(|m| m.type_vars.iter()) {
        if !type_vars.contains(tv) {
            type_vars.push(tv.clone());
        }
    }

    ProtocolDef {
        name: name.into(),
        type_vars,
        docstring: None,
        members: members
            .iter()
            .cloned()
            .map(ProtocolMember::Attribute)
            .collect(),
    }
}

/// `linalg` → `LinalgNamespace`
pub fn extension_protocol_name(extension: &str) -> String {
    let mut chars = extension.chars();
    match chars.next() {
        Some(first) => format!("{}{}Namespace", first.to_uppercase(), chars.as_str()),
        None => "Namespace".to_string(),
    }
}

//! Declaration model for parsed specification stub modules.
//!
//! A stub module is read once from Python source and never mutated; the
//! protocol generator and the namespace assembler both derive their
//! artifacts from these types.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A parsed Python source file together with the text it was parsed from.
#[derive(Clone, Debug)]
pub struct PythonAst {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub path: PathBuf,
}

/// Placement of a parameter within a Python signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    VarPositional,
    KeywordOnly,
    VarKeyword,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    pub annotation: Option<String>,
    pub default: Option<String>,
    pub kind: ParamKind,
}

impl Param {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
            kind,
        }
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParamKind::VarPositional => write!(f, "*")?,
            ParamKind::VarKeyword => write!(f, "**")?,
            _ => {}
        }
        write!(f, "{}", self.name)?;
        match (&self.annotation, &self.default) {
            (Some(annotation), Some(default)) => write!(f, ": {} = {}", annotation, default),
            (Some(annotation), None) => write!(f, ": {}", annotation),
            (None, Some(default)) => write!(f, "={}", default),
            (None, None) => Ok(()),
        }
    }
}

/// Render a parameter list the way Python prints it, including the `/` and
/// bare `*` separators.
pub fn format_parameters(params: &[Param]) -> String {
    let mut parts = Vec::with_capacity(params.len() + 2);
    let has_positional_only = params
        .iter()
        .any(|p| p.kind == ParamKind::PositionalOnly);
    let has_var_positional = params
        .iter()
        .any(|p| p.kind == ParamKind::VarPositional);
    let mut slash_pending = has_positional_only;
    let mut star_pending = !has_var_positional;

    for param in params {
        if slash_pending && param.kind != ParamKind::PositionalOnly {
            parts.push("/".to_string());
            slash_pending = false;
        }
        if star_pending && param.kind == ParamKind::KeywordOnly {
            parts.push("*".to_string());
            star_pending = false;
        }
        parts.push(param.to_string());
    }
    if slash_pending {
        parts.push("/".to_string());
    }

    parts.join(", ")
}

/// A positional expression shape, enough to recognise `TypeVar("name")`
/// calls and simple name aliases.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Call { function: String, args: Vec<Expression> },
    Name(String),
    Str(String),
    Other(String),
}

impl Expression {
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expression::Name(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Option<String>,
    /// Decoded docstring exactly as written (not dedented).
    pub docstring: Option<String>,
    pub decorators: Vec<String>,
    pub line: usize,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            docstring: None,
            decorators: Vec::new(),
            line: 0,
        }
    }

    pub fn parameters_text(&self) -> String {
        format_parameters(&self.params)
    }

    pub fn first_param(&self) -> Option<&Param> {
        self.params.first()
    }

    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators.iter().any(|d| d == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstantDecl {
    pub name: String,
    pub annotation: Option<String>,
    pub value: Option<Expression>,
    /// Bare string statement immediately following the assignment.
    pub docstring: Option<String>,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<String>,
    pub methods: Vec<FunctionDecl>,
    pub docstring: Option<String>,
    pub line: usize,
}

impl ClassDecl {
    pub fn method(&self, name: &str) -> Option<&FunctionDecl> {
        self.methods.iter().find(|m| m.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    /// Source text of the statement with whitespace normalised.
    pub text: String,
    pub is_future: bool,
    pub line: usize,
}

/// Top-level statement of a stub module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    Import(ImportDecl),
    Function(FunctionDecl),
    Constant(ConstantDecl),
    /// `__all__ = [...]`
    Exports(Vec<String>),
    /// Bare expression statement, typically a stray string.
    Expression { line: usize },
    Class(ClassDecl),
    /// Anything the tooling has no policy for.
    Unsupported { kind: String, line: usize },
}

/// One parsed stub module, named after its file stem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub path: PathBuf,
    pub statements: Vec<Statement>,
}

impl Module {
    /// Names listed in `__all__`, if the module declares one.
    pub fn exports(&self) -> Option<&[String]> {
        self.statements.iter().find_map(|stmt| match stmt {
            Statement::Exports(names) => Some(names.as_slice()),
            _ => None,
        })
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Function(func) => Some(func),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions().find(|f| f.name == name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Class(class) => Some(class),
            _ => None,
        })
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes().find(|c| c.name == name)
    }

    pub fn constants(&self) -> impl Iterator<Item = &ConstantDecl> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Constant(constant) => Some(constant),
            _ => None,
        })
    }

    pub fn constant(&self, name: &str) -> Option<&ConstantDecl> {
        self.constants().find(|c| c.name == name)
    }

    /// Resolve a class by name, following a single module-level alias such
    /// as `array = _array`.
    pub fn resolve_class(&self, name: &str) -> Option<&ClassDecl> {
        self.class(name).or_else(|| {
            self.constant(name)
                .and_then(|c| c.value.as_ref())
                .and_then(Expression::as_name)
                .and_then(|target| self.class(target))
        })
    }
}

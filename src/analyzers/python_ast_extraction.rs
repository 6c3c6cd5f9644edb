use crate::analyzers::python_literals::{decode_string_literal, normalize_expression};
use crate::analyzers::python_parser::{named_children, node_column, node_line, node_text};
use crate::core::{
    ClassDecl, ConstantDecl, Error, Expression, FunctionDecl, ImportDecl, Module, Param,
    ParamKind, PythonAst, Result, Statement,
};
use std::collections::HashMap;
use tree_sitter::Node;

/// Turns a parsed stub module into the declaration model.
pub struct PythonAstExtractor<'a> {
    ast: &'a PythonAst,
}

impl<'a> PythonAstExtractor<'a> {
    pub fn new(ast: &'a PythonAst) -> Self {
        Self { ast }
    }

    /// Extract the top-level statements of the module
    pub fn extract_module(&self) -> Result<Module> {
        let root = self.ast.tree.root_node();
        let nodes = named_children(&root);

        let statements = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| self.extract_statement(node, nodes.get(idx + 1)))
            .collect::<Result<Vec<_>>>()?;
        self.check_unique_names(&statements)?;

        let name = self
            .ast
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Module {
            name,
            path: self.ast.path.clone(),
            statements,
        })
    }

    /// A name bound twice at module level would silently shadow the first
    /// definition, so it is rejected.
    fn check_unique_names(&self, statements: &[Statement]) -> Result<()> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for stmt in statements {
            let (name, line) = match stmt {
                Statement::Function(func) => (func.name.as_str(), func.line),
                Statement::Class(class) => (class.name.as_str(), class.line),
                Statement::Constant(constant) => (constant.name.as_str(), constant.line),
                _ => continue,
            };
            if let Some(first) = seen.insert(name, line) {
                return Err(Error::specification(format!(
                    "{}: `{}` is defined twice (lines {} and {})",
                    self.ast.path.display(),
                    name,
                    first,
                    line
                )));
            }
        }
        Ok(())
    }

    fn extract_statement(&self, node: &Node, next: Option<&Node>) -> Result<Statement> {
        match node.kind() {
            "import_statement" | "import_from_statement" | "future_import_statement" => {
                Ok(Statement::Import(self.extract_import(node)))
            }
            "function_definition" => Ok(Statement::Function(self.extract_function(node, vec![])?)),
            "class_definition" => Ok(Statement::Class(self.extract_class(node)?)),
            "decorated_definition" => self.extract_decorated(node),
            "expression_statement" => self.extract_expression_statement(node, next),
            kind => Ok(Statement::Unsupported {
                kind: kind.to_string(),
                line: node_line(node),
            }),
        }
    }

    fn extract_import(&self, node: &Node) -> ImportDecl {
        let text = normalize_expression(self.text(node)).replace(",)", ")");
        ImportDecl {
            text,
            is_future: node.kind() == "future_import_statement",
            line: node_line(node),
        }
    }

    fn extract_decorated(&self, node: &Node) -> Result<Statement> {
        let decorators = self.extract_decorators(node);
        let definition = self.required_field(node, "definition")?;
        match definition.kind() {
            "function_definition" => Ok(Statement::Function(
                self.extract_function(&definition, decorators)?,
            )),
            "class_definition" => Ok(Statement::Class(self.extract_class(&definition)?)),
            kind => Ok(Statement::Unsupported {
                kind: kind.to_string(),
                line: node_line(node),
            }),
        }
    }

    /// Extract decorator names from a decorated definition.
    ///
    /// `@abc.abstractmethod` keeps its dotted path and `@dataclass(frozen=True)`
    /// is reduced to the callee.
    fn extract_decorators(&self, node: &Node) -> Vec<String> {
        named_children(node)
            .iter()
            .filter(|child| child.kind() == "decorator")
            .filter_map(|decorator| named_children(decorator).into_iter().next())
            .map(|expr| match expr.kind() {
                "call" => expr
                    .child_by_field_name("function")
                    .map(|f| self.text(&f).to_string())
                    .unwrap_or_default(),
                _ => normalize_expression(self.text(&expr)),
            })
            .collect()
    }

    fn extract_expression_statement(&self, node: &Node, next: Option<&Node>) -> Result<Statement> {
        let children = named_children(node);
        match children.as_slice() {
            [child] if child.kind() == "assignment" => self.extract_assignment(child, next),
            [child] if child.kind() == "augmented_assignment" => Ok(Statement::Unsupported {
                kind: child.kind().to_string(),
                line: node_line(node),
            }),
            _ => Ok(Statement::Expression {
                line: node_line(node),
            }),
        }
    }

    fn extract_assignment(&self, node: &Node, next: Option<&Node>) -> Result<Statement> {
        let left = self.required_field(node, "left")?;
        let right = node.child_by_field_name("right");

        let chained = right.is_some_and(|r| r.kind() == "assignment");
        if left.kind() != "identifier" || chained {
            return Ok(Statement::Unsupported {
                kind: "assignment".to_string(),
                line: node_line(node),
            });
        }

        let name = self.text(&left).to_string();
        if name == "__all__" {
            let value = right.ok_or_else(|| self.shape_error(node, "`__all__` has no value"))?;
            return Ok(Statement::Exports(self.extract_string_list(&value)?));
        }

        Ok(Statement::Constant(ConstantDecl {
            name,
            annotation: node
                .child_by_field_name("type")
                .map(|t| normalize_expression(self.text(&t))),
            value: right.map(|r| self.classify_expression(&r)),
            docstring: next.and_then(|n| self.string_statement(n)),
            line: node_line(node),
        }))
    }

    /// Extract the names of a `__all__ = [...]` list
    fn extract_string_list(&self, node: &Node) -> Result<Vec<String>> {
        if !matches!(node.kind(), "list" | "tuple") {
            return Err(self.shape_error(node, "`__all__` must be a list of string literals"));
        }
        named_children(node)
            .iter()
            .map(|item| {
                self.string_value(item)
                    .ok_or_else(|| self.shape_error(item, "`__all__` entry is not a string literal"))
            })
            .collect()
    }

    /// Classify an expression (call, name, string literal)
    fn classify_expression(&self, node: &Node) -> Expression {
        match node.kind() {
            "call" => {
                let function = node
                    .child_by_field_name("function")
                    .map(|f| self.text(&f).to_string())
                    .unwrap_or_default();
                let args = node
                    .child_by_field_name("arguments")
                    .map(|args| {
                        named_children(&args)
                            .iter()
                            .filter(|arg| arg.kind() != "keyword_argument")
                            .map(|arg| self.classify_expression(arg))
                            .collect()
                    })
                    .unwrap_or_default();
                Expression::Call { function, args }
            }
            "identifier" => Expression::Name(self.text(node).to_string()),
            "string" | "concatenated_string" => match self.string_value(node) {
                Some(value) => Expression::Str(value),
                None => Expression::Other(self.text(node).to_string()),
            },
            _ => Expression::Other(normalize_expression(self.text(node))),
        }
    }

    fn extract_function(&self, node: &Node, decorators: Vec<String>) -> Result<FunctionDecl> {
        let name = self.required_field(node, "name")?;
        let parameters = self.required_field(node, "parameters")?;

        Ok(FunctionDecl {
            name: self.text(&name).to_string(),
            params: self.extract_params(&parameters)?,
            returns: node
                .child_by_field_name("return_type")
                .map(|r| normalize_expression(self.text(&r))),
            docstring: node
                .child_by_field_name("body")
                .and_then(|body| self.block_docstring(&body)),
            decorators,
            line: node_line(node),
        })
    }

    /// Extract parameters in declaration order.
    ///
    /// Everything before a `/` becomes positional-only; everything after a
    /// bare `*` or `*args` becomes keyword-only.
    fn extract_params(&self, node: &Node) -> Result<Vec<Param>> {
        let mut params: Vec<Param> = Vec::new();
        let mut keyword_only = false;

        for child in named_children(node) {
            let regular = if keyword_only {
                ParamKind::KeywordOnly
            } else {
                ParamKind::PositionalOrKeyword
            };

            match child.kind() {
                "positional_separator" => {
                    for param in params.iter_mut() {
                        if param.kind == ParamKind::PositionalOrKeyword {
                            param.kind = ParamKind::PositionalOnly;
                        }
                    }
                }
                "keyword_separator" => keyword_only = true,
                "identifier" => params.push(Param::new(self.text(&child), regular)),
                "list_splat_pattern" | "dictionary_splat_pattern" => {
                    let (name, kind) = self.splat_param(&child)?;
                    keyword_only |= kind == ParamKind::VarPositional;
                    params.push(Param::new(name, kind));
                }
                "typed_parameter" => {
                    let target = named_children(&child)
                        .into_iter()
                        .next()
                        .ok_or_else(|| self.shape_error(&child, "typed parameter without a name"))?;
                    let (name, kind) = match target.kind() {
                        "list_splat_pattern" | "dictionary_splat_pattern" => {
                            self.splat_param(&target)?
                        }
                        _ => (self.text(&target).to_string(), regular),
                    };
                    keyword_only |= kind == ParamKind::VarPositional;
                    let mut param = Param::new(name, kind);
                    param.annotation = self.optional_expression(&child, "type");
                    params.push(param);
                }
                "default_parameter" | "typed_default_parameter" => {
                    let name = self.required_field(&child, "name")?;
                    let mut param = Param::new(self.text(&name), regular);
                    param.annotation = self.optional_expression(&child, "type");
                    param.default = self.optional_expression(&child, "value");
                    params.push(param);
                }
                other => {
                    return Err(self.shape_error(
                        &child,
                        &format!("unsupported parameter form `{}`", other),
                    ))
                }
            }
        }

        Ok(params)
    }

    fn splat_param(&self, node: &Node) -> Result<(String, ParamKind)> {
        let kind = if node.kind() == "list_splat_pattern" {
            ParamKind::VarPositional
        } else {
            ParamKind::VarKeyword
        };
        let name = named_children(node)
            .into_iter()
            .next()
            .map(|ident| self.text(&ident).to_string())
            .ok_or_else(|| self.shape_error(node, "splat parameter without a name"))?;
        Ok((name, kind))
    }

    fn extract_class(&self, node: &Node) -> Result<ClassDecl> {
        let name = self.required_field(node, "name")?;
        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| {
                named_children(&args)
                    .iter()
                    .map(|base| normalize_expression(self.text(base)))
                    .collect()
            })
            .unwrap_or_default();

        let mut methods = Vec::new();
        let mut docstring = None;
        if let Some(body) = node.child_by_field_name("body") {
            docstring = self.block_docstring(&body);
            for member in named_children(&body) {
                match member.kind() {
                    "function_definition" => methods.push(self.extract_function(&member, vec![])?),
                    "decorated_definition" => {
                        let decorators = self.extract_decorators(&member);
                        if let Some(def) = member
                            .child_by_field_name("definition")
                            .filter(|d| d.kind() == "function_definition")
                        {
                            methods.push(self.extract_function(&def, decorators)?);
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(ClassDecl {
            name: self.text(&name).to_string(),
            bases,
            methods,
            docstring,
            line: node_line(node),
        })
    }

    /// Docstring of a function or class body: its first statement, if that
    /// is a bare string literal.
    fn block_docstring(&self, body: &Node) -> Option<String> {
        named_children(body)
            .first()
            .and_then(|first| self.string_statement(first))
    }

    /// Value of an expression statement consisting of one string literal.
    fn string_statement(&self, node: &Node) -> Option<String> {
        if node.kind() != "expression_statement" {
            return None;
        }
        match named_children(node).as_slice() {
            [only] => self.string_value(only),
            _ => None,
        }
    }

    fn string_value(&self, node: &Node) -> Option<String> {
        match node.kind() {
            "string" => decode_string_literal(self.text(node)),
            "concatenated_string" => named_children(node)
                .iter()
                .map(|part| self.string_value(part))
                .collect::<Option<Vec<_>>>()
                .map(|parts| parts.concat()),
            _ => None,
        }
    }

    fn optional_expression(&self, node: &Node, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|value| normalize_expression(self.text(&value)))
    }

    fn required_field<'t>(&self, node: &Node<'t>, field: &str) -> Result<Node<'t>> {
        node.child_by_field_name(field).ok_or_else(|| {
            self.shape_error(node, &format!("`{}` is missing its `{}`", node.kind(), field))
        })
    }

    fn shape_error(&self, node: &Node, message: &str) -> Error {
        Error::parse(&self.ast.path, node_line(node), node_column(node), message)
    }

    fn text(&self, node: &Node) -> &'a str {
        let ast: &'a PythonAst = self.ast;
        node_text(node, &ast.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::python_parser::parse_source;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn extract(code: &str) -> Module {
        let ast = parse_source(code, &PathBuf::from("sample_functions.py"))
            .expect("Failed to parse Python code");
        PythonAstExtractor::new(&ast)
            .extract_module()
            .expect("Failed to extract module")
    }

    fn only_function(module: &Module) -> &FunctionDecl {
        module.functions().next().expect("No function found in module")
    }

    #[test]
    fn test_module_named_after_file_stem() {
        let module = extract("x = 1\n");
        assert_eq!(module.name, "sample_functions");
    }

    #[test]
    fn test_extract_function_signature() {
        let module = extract(indoc! {r#"
            def cross(x1: array, x2: array, /, *, axis: int = -1) -> array:
                """
                Returns the cross product.
                """
        "#});

        let func = only_function(&module);
        assert_eq!(func.name, "cross");
        assert_eq!(func.returns.as_deref(), Some("array"));
        assert_eq!(
            func.params.iter().map(|p| p.kind).collect::<Vec<_>>(),
            vec![
                ParamKind::PositionalOnly,
                ParamKind::PositionalOnly,
                ParamKind::KeywordOnly
            ]
        );
        assert_eq!(func.params[2].default.as_deref(), Some("-1"));
        assert_eq!(func.parameters_text(), "x1: array, x2: array, /, *, axis: int = -1");
        assert_eq!(
            func.docstring.as_deref(),
            Some("\n    Returns the cross product.\n    ")
        );
    }

    #[test]
    fn test_extract_splat_parameters() {
        let module = extract(indoc! {r#"
            def meshgrid(*arrays: array, indexing: str = "xy", **kwargs) -> List[array]:
                ...
        "#});

        let func = only_function(&module);
        assert_eq!(func.params[0].kind, ParamKind::VarPositional);
        assert_eq!(func.params[0].name, "arrays");
        assert_eq!(func.params[1].kind, ParamKind::KeywordOnly);
        assert_eq!(func.params[2].kind, ParamKind::VarKeyword);
        assert_eq!(func.docstring, None);
    }

    #[test]
    fn test_multiline_annotation_is_normalized() {
        let module = extract(indoc! {r#"
            def asarray(
                obj: Union[
                    array, bool, int,
                ],
                /,
                *,
                copy: Optional[bool] = None,
            ) -> array:
                pass
        "#});

        let func = only_function(&module);
        assert_eq!(
            func.parameters_text(),
            "obj: Union[array, bool, int], /, *, copy: Optional[bool] = None"
        );
    }

    #[test]
    fn test_constant_docstring_only_when_immediate() {
        let module = extract(indoc! {r#"
            e = None
            """
            Euler's constant.
            """

            inf = None
            nan = None
            """Not a Number."""
        "#});

        let constants: Vec<_> = module.constants().collect();
        assert_eq!(constants.len(), 3);
        assert_eq!(
            constants[0].docstring.as_deref(),
            Some("\nEuler's constant.\n")
        );
        assert_eq!(constants[1].docstring, None);
        assert_eq!(constants[2].docstring.as_deref(), Some("Not a Number."));
    }

    #[test]
    fn test_exports_and_imports() {
        let module = extract(indoc! {r#"
            from __future__ import annotations
            from ._types import (
                array,
                dtype as Dtype,
            )

            __all__ = ["argsort", "sort"]
        "#});

        assert_eq!(
            module.exports(),
            Some(&["argsort".to_string(), "sort".to_string()][..])
        );
        let imports: Vec<_> = module
            .statements
            .iter()
            .filter_map(|s| match s {
                Statement::Import(import) => Some(import),
                _ => None,
            })
            .collect();
        assert_eq!(imports.len(), 2);
        assert!(imports[0].is_future);
        assert_eq!(imports[1].text, "from ._types import (array, dtype as Dtype)");
    }

    #[test]
    fn test_exports_must_be_string_list() {
        let ast = parse_source("__all__ = names()\n", &PathBuf::from("bad.py")).unwrap();
        let err = PythonAstExtractor::new(&ast).extract_module().unwrap_err();
        assert!(err.to_string().contains("__all__"));
    }

    #[test]
    fn test_typevar_assignment_is_classified_as_call() {
        let module = extract("array = TypeVar(\"array\")\n_T_co = TypeVar(\"_T_co\", covariant=True)\n");
        let constants: Vec<_> = module.constants().collect();
        assert_eq!(
            constants[0].value,
            Some(Expression::Call {
                function: "TypeVar".to_string(),
                args: vec![Expression::Str("array".to_string())],
            })
        );
        assert_eq!(
            constants[1].value,
            Some(Expression::Call {
                function: "TypeVar".to_string(),
                args: vec![Expression::Str("_T_co".to_string())],
            })
        );
    }

    #[test]
    fn test_extract_class_methods_and_decorators() {
        let module = extract(indoc! {r#"
            class _array:
                """The array object."""

                @property
                def dtype(self: array) -> Dtype:
                    """Data type of the array elements."""

                def __add__(self: array, other: Union[int, float, array], /) -> array:
                    """Calculates the sum."""

            array = _array
        "#});

        let class = module.resolve_class("array").expect("array class");
        assert_eq!(class.docstring.as_deref(), Some("The array object."));
        assert_eq!(class.methods.len(), 2);
        assert!(class.methods[0].has_decorator("property"));
        let add = class.method("__add__").unwrap();
        assert_eq!(add.first_param().map(|p| p.name.as_str()), Some("self"));
        assert_eq!(add.params[1].kind, ParamKind::PositionalOnly);
    }

    #[test]
    fn test_other_statements_are_unsupported() {
        let module = extract("if True:\n    x = 1\n__all__ += ['x']\n");
        assert!(matches!(
            module.statements[0],
            Statement::Unsupported { ref kind, line: 1 } if kind == "if_statement"
        ));
        assert!(matches!(module.statements[1], Statement::Unsupported { .. }));
    }

    #[test]
    fn test_repeated_name_is_rejected() {
        let code = indoc! {r#"
            def unique_values(x, /):
                """Old."""

            def unique_values(x, /, *, y=1):
                """New."""
        "#};
        let ast = parse_source(code, &PathBuf::from("set_functions.py")).unwrap();
        let err = PythonAstExtractor::new(&ast).extract_module().unwrap_err();

        assert!(matches!(err, Error::Specification(_)));
        let message = err.to_string();
        assert!(message.contains("`unique_values` is defined twice (lines 1 and 4)"), "{message}");
    }

    #[test]
    fn test_constant_cannot_reuse_function_name() {
        let ast = parse_source(
            "def e():\n    pass\n\ne = 2.718\n",
            &PathBuf::from("constants.py"),
        )
        .unwrap();
        assert!(PythonAstExtractor::new(&ast).extract_module().is_err());
    }

    #[test]
    fn test_bare_string_is_expression_statement() {
        let module = extract("\"\"\"Module docstring.\"\"\"\n");
        assert_eq!(module.statements, vec![Statement::Expression { line: 1 }]);
    }
}

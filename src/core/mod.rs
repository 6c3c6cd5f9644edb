pub mod ast;
pub mod errors;

pub use ast::{
    format_parameters, ClassDecl, ConstantDecl, Expression, FunctionDecl, ImportDecl, Module,
    Param, ParamKind, PythonAst, Statement,
};
pub use errors::{Error, Result, ResultExt};

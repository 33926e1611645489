//! Generic AST nodes
//!
//! The tree format produced by the parser and semantic analysis: a kind tag,
//! ordered children and a string-keyed attribute map, serialized as JSON.

use super::{BinaryOperator, ClassDecl, Expr, MethodDecl, Program, Stmt, UnaryOperator};
use crate::error::{CompileError, CompileResult};
use crate::symbols::{Symbol, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Program,
    ImportStmt,
    ClassDecl,
    VarDecl,
    #[serde(alias = "MainMethod")]
    MethodDecl,
    Param,
    #[serde(alias = "TType")]
    Type,
    ArrayType,
    Vararg,
    AssignStmt,
    ExprStmt,
    ReturnStmt,
    IfElseStmt,
    WhileStmt,
    ScopeStmt,
    #[serde(alias = "IntegerLiteralExpr")]
    IntegerLiteral,
    #[serde(alias = "BooleanLiteralExpr")]
    BooleanLiteral,
    StringLiteral,
    VarRefExpr,
    #[serde(alias = "ThisLiteralExpr")]
    ThisExpr,
    #[serde(
        alias = "AdditiveExpr",
        alias = "MultiplicativeExpr",
        alias = "RelationalExpr",
        alias = "ShortCAndExpr"
    )]
    BinaryExpr,
    UnaryExpr,
    ParenExpr,
    ArrayAccessExpr,
    LengthExpr,
    NewArrayExpr,
    ArrayInitExpr,
    NewClassExpr,
    MethodCallExpr,
}

impl Kind {
    fn is_type(&self) -> bool {
        matches!(self, Kind::Type | Kind::ArrayType | Kind::Vararg)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: Kind,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl Node {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn from_json(text: &str) -> CompileResult<Self> {
        serde_json::from_str(text).map_err(|e| CompileError::malformed("Program", e.to_string()))
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute rendered as a string; numbers and booleans are accepted too.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn attr(&self, key: &str) -> CompileResult<String> {
        self.get(key)
            .ok_or_else(|| CompileError::malformed(self.kind, format!("missing attribute `{}`", key)))
    }

    fn bool_attr(&self, key: &str, default: bool) -> bool {
        self.get(key).map(|v| v == "true").unwrap_or(default)
    }

    fn child(&self, index: usize) -> CompileResult<&Node> {
        self.children.get(index).ok_or_else(|| {
            CompileError::malformed(
                self.kind,
                format!("expected at least {} children, found {}", index + 1, self.children.len()),
            )
        })
    }

    fn expect_kind(&self, kind: Kind) -> CompileResult<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(CompileError::malformed(self.kind, format!("expected a {} node", kind)))
        }
    }
}

impl Program {
    /// Convert a validated `Program` node into the typed AST.
    pub fn from_node(node: &Node) -> CompileResult<Program> {
        node.expect_kind(Kind::Program)?;

        let mut imports = Vec::new();
        let mut class = None;
        for child in &node.children {
            match child.kind {
                Kind::ImportStmt => imports.push(convert_import(child)?),
                Kind::ClassDecl if class.is_none() => class = Some(convert_class(child)?),
                _ => {
                    return Err(CompileError::malformed(
                        child.kind,
                        "unexpected node at program level",
                    ))
                }
            }
        }

        let class = class.ok_or_else(|| CompileError::malformed(Kind::Program, "no class declaration"))?;
        Ok(Program { imports, class })
    }
}

/// Imports arrive either dotted (`a.b.C`) or as a rendered list (`[a, b, C]`).
fn convert_import(node: &Node) -> CompileResult<String> {
    let raw = node.attr("name")?;
    let trimmed = raw
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(&raw);
    Ok(trimmed.replace(", ", "."))
}

fn convert_class(node: &Node) -> CompileResult<ClassDecl> {
    let name = node.attr("name")?;
    let super_class = node.get("extendedClass").or_else(|| node.get("superClass"));

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    for child in &node.children {
        match child.kind {
            Kind::VarDecl => fields.push(convert_symbol(child)?),
            Kind::MethodDecl => methods.push(convert_method(child)?),
            _ => return Err(CompileError::malformed(child.kind, "unexpected node in class body")),
        }
    }

    Ok(ClassDecl {
        name,
        super_class,
        fields,
        methods,
    })
}

fn convert_method(node: &Node) -> CompileResult<MethodDecl> {
    let name = node.attr("name")?;
    let is_main = name == "main";
    let is_static = node.bool_attr("isStatic", is_main);
    let is_public = node.bool_attr("isPublic", true);

    let mut children = node.children.iter().peekable();

    let return_type = match children.peek() {
        Some(first) if first.kind.is_type() => {
            let ty = convert_type(first)?;
            children.next();
            ty
        }
        _ => Type::void(),
    };

    let mut params = Vec::new();
    while let Some(param) = children.next_if(|c| c.kind == Kind::Param) {
        params.push(convert_symbol(param)?);
    }
    if is_main && params.is_empty() {
        params.push(Symbol::new("args", Type::array_of(crate::symbols::STRING)));
    }

    let mut locals = Vec::new();
    while let Some(local) = children.next_if(|c| c.kind == Kind::VarDecl) {
        locals.push(convert_symbol(local)?);
    }

    let body = children.map(convert_stmt).collect::<CompileResult<Vec<_>>>()?;

    Ok(MethodDecl {
        name,
        return_type,
        params,
        locals,
        body,
        is_static,
        is_public,
    })
}

fn convert_symbol(node: &Node) -> CompileResult<Symbol> {
    Ok(Symbol::new(node.attr("name")?, convert_type(node.child(0)?)?))
}

fn convert_type(node: &Node) -> CompileResult<Type> {
    match node.kind {
        Kind::Type => {
            let name = node.attr("name")?;
            if node.bool_attr("isArray", false) {
                Ok(Type::array_of(name))
            } else {
                Ok(Type::new(name))
            }
        }
        Kind::ArrayType => Ok(Type::array_of(convert_type(node.child(0)?)?.name)),
        Kind::Vararg => Ok(Type::vararg_of(convert_type(node.child(0)?)?.name)),
        other => Err(CompileError::malformed(other, "expected a type node")),
    }
}

fn convert_stmt(node: &Node) -> CompileResult<Stmt> {
    let stmt = match node.kind {
        Kind::AssignStmt => Stmt::Assign {
            target: convert_expr(node.child(0)?)?,
            value: convert_expr(node.child(1)?)?,
        },
        Kind::ExprStmt => Stmt::Expr(convert_expr(node.child(0)?)?),
        Kind::ReturnStmt => Stmt::Return(node.children.first().map(convert_expr).transpose()?),
        Kind::IfElseStmt => Stmt::If {
            cond: convert_expr(node.child(0)?)?,
            then_branch: Box::new(convert_stmt(node.child(1)?)?),
            else_branch: Box::new(match node.children.get(2) {
                Some(else_node) => convert_stmt(else_node)?,
                None => Stmt::Block(Vec::new()),
            }),
        },
        Kind::WhileStmt => Stmt::While {
            cond: convert_expr(node.child(0)?)?,
            body: Box::new(convert_stmt(node.child(1)?)?),
        },
        Kind::ScopeStmt => Stmt::Block(
            node.children
                .iter()
                .map(convert_stmt)
                .collect::<CompileResult<Vec<_>>>()?,
        ),
        other => return Err(CompileError::malformed(other, "expected a statement")),
    };
    Ok(stmt)
}

fn convert_expr(node: &Node) -> CompileResult<Expr> {
    let boxed = |index: usize| -> CompileResult<Box<Expr>> { Ok(Box::new(convert_expr(node.child(index)?)?)) };

    let expr = match node.kind {
        Kind::IntegerLiteral => {
            let raw = node.attr("value")?;
            let value = raw
                .parse::<i32>()
                .map_err(|_| CompileError::malformed(node.kind, format!("invalid integer `{}`", raw)))?;
            Expr::IntLiteral(value)
        }
        Kind::BooleanLiteral => match node.attr("value")?.as_str() {
            "true" => Expr::BoolLiteral(true),
            "false" => Expr::BoolLiteral(false),
            other => {
                return Err(CompileError::malformed(node.kind, format!("invalid boolean `{}`", other)))
            }
        },
        Kind::StringLiteral => Expr::StringLiteral(node.attr("value")?),
        Kind::VarRefExpr => Expr::Var(node.attr("name")?),
        Kind::ThisExpr => Expr::This,
        Kind::BinaryExpr => {
            let symbol = node.attr("op")?;
            let op = BinaryOperator::from_symbol(&symbol)
                .ok_or_else(|| CompileError::malformed(node.kind, format!("unknown operator `{}`", symbol)))?;
            Expr::Binary {
                op,
                left: boxed(0)?,
                right: boxed(1)?,
            }
        }
        Kind::UnaryExpr => match node.attr("op")?.as_str() {
            "!" => Expr::Unary {
                op: UnaryOperator::Not,
                operand: boxed(0)?,
            },
            other => {
                return Err(CompileError::malformed(node.kind, format!("unknown operator `{}`", other)))
            }
        },
        Kind::ParenExpr => Expr::Paren(boxed(0)?),
        Kind::ArrayAccessExpr => Expr::ArrayAccess {
            array: boxed(0)?,
            index: boxed(1)?,
        },
        Kind::LengthExpr => Expr::Length(boxed(0)?),
        Kind::NewArrayExpr => {
            // `new int[size]`: an optional element type node precedes the size.
            let first = node.child(0)?;
            if first.kind.is_type() {
                Expr::NewArray {
                    elem: convert_type(first)?.element(),
                    size: boxed(1)?,
                }
            } else {
                Expr::NewArray {
                    elem: Type::int(),
                    size: boxed(0)?,
                }
            }
        }
        Kind::ArrayInitExpr => Expr::ArrayInit(
            node.children
                .iter()
                .map(convert_expr)
                .collect::<CompileResult<Vec<_>>>()?,
        ),
        Kind::NewClassExpr => Expr::NewObject(node.attr("name")?),
        Kind::MethodCallExpr => {
            let name = node.attr("name")?;
            let mut rest = node.children.iter();
            let receiver = if node.bool_attr("hasReceiver", true) {
                let receiver = rest.next().ok_or_else(|| {
                    CompileError::malformed(node.kind, "method call without a receiver")
                })?;
                Some(Box::new(convert_expr(receiver)?))
            } else {
                None
            };
            let args = rest.map(convert_expr).collect::<CompileResult<Vec<_>>>()?;
            Expr::MethodCall {
                receiver,
                name,
                args,
            }
        }
        other => return Err(CompileError::malformed(other, "expected an expression")),
    };
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> CompileResult<Program> {
        let node: Node = serde_json::from_value(value).expect("valid node json");
        Program::from_node(&node)
    }

    #[test]
    fn test_convert_minimal_class() {
        let program = parse(json!({
            "kind": "Program",
            "children": [
                {"kind": "ImportStmt", "attributes": {"name": "[java, util, Math]"}},
                {"kind": "ClassDecl", "attributes": {"name": "A", "extendedClass": "Math"}, "children": [
                    {"kind": "VarDecl", "attributes": {"name": "x"}, "children": [
                        {"kind": "Type", "attributes": {"name": "int"}}
                    ]}
                ]}
            ]
        }))
        .expect("converts");

        assert_eq!(program.imports, vec!["java.util.Math".to_string()]);
        assert_eq!(program.class.name, "A");
        assert_eq!(program.class.super_class.as_deref(), Some("Math"));
        assert_eq!(program.class.fields, vec![Symbol::new("x", Type::int())]);
    }

    #[test]
    fn test_convert_method_with_aliases() {
        let program = parse(json!({
            "kind": "Program",
            "children": [{"kind": "ClassDecl", "attributes": {"name": "A"}, "children": [
                {"kind": "MethodDecl", "attributes": {"name": "f", "isPublic": true}, "children": [
                    {"kind": "TType", "attributes": {"name": "int"}},
                    {"kind": "Param", "attributes": {"name": "xs"}, "children": [
                        {"kind": "Vararg", "children": [{"kind": "TType", "attributes": {"name": "int"}}]}
                    ]},
                    {"kind": "VarDecl", "attributes": {"name": "i"}, "children": [
                        {"kind": "TType", "attributes": {"name": "int"}}
                    ]},
                    {"kind": "ReturnStmt", "children": [
                        {"kind": "AdditiveExpr", "attributes": {"op": "+"}, "children": [
                            {"kind": "VarRefExpr", "attributes": {"name": "i"}},
                            {"kind": "IntegerLiteralExpr", "attributes": {"value": 1}}
                        ]}
                    ]}
                ]}
            ]}]
        }))
        .expect("converts");

        let method = &program.class.methods[0];
        assert_eq!(method.return_type, Type::int());
        assert_eq!(method.params[0].ty, Type::vararg_of("int"));
        assert_eq!(method.locals[0].name, "i");
        assert_eq!(
            method.body,
            vec![Stmt::Return(Some(Expr::binary(
                BinaryOperator::Add,
                Expr::var("i"),
                Expr::int(1)
            )))]
        );
    }

    #[test]
    fn test_main_gets_implicit_args() {
        let program = parse(json!({
            "kind": "Program",
            "children": [{"kind": "ClassDecl", "attributes": {"name": "A"}, "children": [
                {"kind": "MethodDecl", "attributes": {"name": "main"}}
            ]}]
        }))
        .expect("converts");

        let main = &program.class.methods[0];
        assert!(main.is_main());
        assert_eq!(main.return_type, Type::void());
        assert_eq!(main.params, vec![Symbol::new("args", Type::array_of("String"))]);
    }

    #[test]
    fn test_unknown_operator_is_malformed() {
        let err = parse(json!({
            "kind": "Program",
            "children": [{"kind": "ClassDecl", "attributes": {"name": "A"}, "children": [
                {"kind": "MethodDecl", "attributes": {"name": "f"}, "children": [
                    {"kind": "ExprStmt", "children": [
                        {"kind": "BinaryExpr", "attributes": {"op": "%"}, "children": [
                            {"kind": "IntegerLiteral", "attributes": {"value": "1"}},
                            {"kind": "IntegerLiteral", "attributes": {"value": "2"}}
                        ]}
                    ]}
                ]}
            ]}]
        }))
        .unwrap_err();

        assert!(matches!(err, CompileError::MalformedAst { ref kind, .. } if kind == "BinaryExpr"));
    }

    #[test]
    fn test_missing_class_is_malformed() {
        let err = parse(json!({"kind": "Program"})).unwrap_err();
        assert!(err.to_string().contains("no class declaration"));
    }

    #[test]
    fn test_call_without_receiver() {
        let node = Node::new(Kind::MethodCallExpr)
            .with_attr("name", "foo")
            .with_attr("hasReceiver", false)
            .with_child(Node::new(Kind::IntegerLiteral).with_attr("value", 3));
        let expr = convert_expr(&node).expect("converts");
        assert_eq!(
            expr,
            Expr::MethodCall {
                receiver: None,
                name: "foo".to_string(),
                args: vec![Expr::int(3)],
            }
        );
    }
}

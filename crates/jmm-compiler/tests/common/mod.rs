//! AST fixture builders shared by the integration tests.
//!
//! Programs are built as the JSON node trees the upstream stages emit, then
//! go through the same `Node` deserialization as real input.

#![allow(dead_code)]

use jmm_compiler::{CompileResult, CompiledClass, Compiler, Node};
use serde_json::{json, Value};

pub fn ty(name: &str) -> Value {
    json!({"kind": "Type", "attributes": {"name": name}})
}

pub fn array_ty(name: &str) -> Value {
    json!({"kind": "ArrayType", "children": [ty(name)]})
}

pub fn vararg_ty(name: &str) -> Value {
    json!({"kind": "Vararg", "children": [ty(name)]})
}

pub fn var_decl(name: &str, ty: Value) -> Value {
    json!({"kind": "VarDecl", "attributes": {"name": name}, "children": [ty]})
}

pub fn param(name: &str, ty: Value) -> Value {
    json!({"kind": "Param", "attributes": {"name": name}, "children": [ty]})
}

pub fn int(value: i32) -> Value {
    json!({"kind": "IntegerLiteral", "attributes": {"value": value.to_string()}})
}

pub fn boolean(value: bool) -> Value {
    json!({"kind": "BooleanLiteral", "attributes": {"value": value.to_string()}})
}

pub fn var(name: &str) -> Value {
    json!({"kind": "VarRefExpr", "attributes": {"name": name}})
}

pub fn this() -> Value {
    json!({"kind": "ThisExpr"})
}

pub fn binary(op: &str, left: Value, right: Value) -> Value {
    json!({"kind": "BinaryExpr", "attributes": {"op": op}, "children": [left, right]})
}

pub fn not(operand: Value) -> Value {
    json!({"kind": "UnaryExpr", "attributes": {"op": "!"}, "children": [operand]})
}

pub fn paren(inner: Value) -> Value {
    json!({"kind": "ParenExpr", "children": [inner]})
}

pub fn call(receiver: Value, name: &str, args: Vec<Value>) -> Value {
    let mut children = vec![receiver];
    children.extend(args);
    json!({"kind": "MethodCallExpr", "attributes": {"name": name}, "children": children})
}

pub fn new_object(class: &str) -> Value {
    json!({"kind": "NewClassExpr", "attributes": {"name": class}})
}

pub fn new_int_array(size: Value) -> Value {
    json!({"kind": "NewArrayExpr", "children": [size]})
}

pub fn array_init(elements: Vec<Value>) -> Value {
    json!({"kind": "ArrayInitExpr", "children": elements})
}

pub fn index(array: Value, index: Value) -> Value {
    json!({"kind": "ArrayAccessExpr", "children": [array, index]})
}

pub fn length(array: Value) -> Value {
    json!({"kind": "LengthExpr", "children": [array]})
}

pub fn assign(target: Value, value: Value) -> Value {
    json!({"kind": "AssignStmt", "children": [target, value]})
}

pub fn expr_stmt(expr: Value) -> Value {
    json!({"kind": "ExprStmt", "children": [expr]})
}

pub fn ret(value: Value) -> Value {
    json!({"kind": "ReturnStmt", "children": [value]})
}

pub fn if_else(cond: Value, then: Value, otherwise: Value) -> Value {
    json!({"kind": "IfElseStmt", "children": [cond, then, otherwise]})
}

pub fn while_loop(cond: Value, body: Value) -> Value {
    json!({"kind": "WhileStmt", "children": [cond, body]})
}

pub fn block(stmts: Vec<Value>) -> Value {
    json!({"kind": "ScopeStmt", "children": stmts})
}

/// An instance method: return type, params, locals, then statements.
pub fn method(name: &str, ret: Value, params: Vec<Value>, locals: Vec<Value>, body: Vec<Value>) -> Value {
    let mut children = vec![ret];
    children.extend(params);
    children.extend(locals);
    children.extend(body);
    json!({
        "kind": "MethodDecl",
        "attributes": {"name": name, "isPublic": "true", "isStatic": "false"},
        "children": children
    })
}

/// `public static void main(String[] args)`
pub fn main_method(locals: Vec<Value>, body: Vec<Value>) -> Value {
    let mut children = vec![ty("void"), param("args", array_ty("String"))];
    children.extend(locals);
    children.extend(body);
    json!({
        "kind": "MethodDecl",
        "attributes": {"name": "main", "isPublic": "true", "isStatic": "true"},
        "children": children
    })
}

pub fn class(name: &str, super_class: Option<&str>, fields: Vec<Value>, methods: Vec<Value>) -> Value {
    let mut attributes = json!({"name": name});
    if let Some(parent) = super_class {
        attributes["extendedClass"] = json!(parent);
    }
    let mut children = fields;
    children.extend(methods);
    json!({"kind": "ClassDecl", "attributes": attributes, "children": children})
}

pub fn program(imports: &[&str], class: Value) -> Value {
    let mut children: Vec<Value> = imports
        .iter()
        .map(|name| json!({"kind": "ImportStmt", "attributes": {"name": name}}))
        .collect();
    children.push(class);
    json!({"kind": "Program", "children": children})
}

pub fn try_compile(value: Value) -> CompileResult<CompiledClass> {
    let node: Node = serde_json::from_value(value).expect("fixture is a valid node tree");
    Compiler::default().compile_node(&node, None)
}

pub fn compile(value: Value) -> CompiledClass {
    try_compile(value).expect("fixture compiles")
}

/// A single instance method wrapped in class `A`.
pub fn single_method(method: Value) -> Value {
    program(&["io"], class("A", None, vec![], vec![method]))
}

/// The `.method` block whose header starts with `header`.
pub fn method_block<'a>(jasmin: &'a str, header: &str) -> &'a str {
    let start = jasmin
        .find(header)
        .unwrap_or_else(|| panic!("no method `{}` in:\n{}", header, jasmin));
    let rest = &jasmin[start..];
    let end = rest.find(".end method").expect("method is terminated");
    &rest[..end]
}

/// Value of `.limit <kind>` in a method block.
pub fn limit(block: &str, kind: &str) -> u32 {
    let prefix = format!(".limit {} ", kind);
    block
        .lines()
        .find_map(|line| line.trim().strip_prefix(prefix.as_str()))
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("no .limit {} in:\n{}", kind, block))
}

/// Instruction lines of a method block, trimmed, without directives.
pub fn instructions(block: &str) -> Vec<String> {
    block
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.starts_with('.') && !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A class exercising fields, arrays, loops, branches, calls and `main`.
pub fn counter_program() -> Value {
    let add = method(
        "add",
        ty("int"),
        vec![param("a", ty("int")), param("b", ty("int"))],
        vec![var_decl("r", ty("int"))],
        vec![assign(var("r"), binary("+", var("a"), var("b"))), ret(var("r"))],
    );

    let sum_to = method(
        "sumTo",
        ty("int"),
        vec![param("n", ty("int"))],
        vec![var_decl("i", ty("int")), var_decl("sum", ty("int"))],
        vec![
            assign(var("i"), int(0)),
            assign(var("sum"), int(0)),
            while_loop(
                binary("<", var("i"), var("n")),
                block(vec![
                    assign(var("sum"), binary("+", var("sum"), var("i"))),
                    assign(var("i"), binary("+", var("i"), int(1))),
                ]),
            ),
            ret(var("sum")),
        ],
    );

    let check = method(
        "check",
        ty("boolean"),
        vec![param("x", ty("int"))],
        vec![var_decl("r", ty("boolean"))],
        vec![
            if_else(
                binary("&&", binary("<", var("x"), int(10)), not(paren(binary("==", var("x"), int(3))))),
                block(vec![assign(var("r"), boolean(true))]),
                block(vec![assign(var("r"), boolean(false))]),
            ),
            ret(var("r")),
        ],
    );

    let touch = method(
        "touch",
        ty("int"),
        vec![],
        vec![],
        vec![
            assign(var("count"), binary("+", var("count"), int(1))),
            assign(var("data"), new_int_array(int(5))),
            assign(index(var("data"), int(0)), var("count")),
            ret(length(var("data"))),
        ],
    );

    let main = main_method(
        vec![var_decl("c", ty("Counter"))],
        vec![
            assign(var("c"), new_object("Counter")),
            expr_stmt(call(var("io"), "println", vec![call(var("c"), "add", vec![int(1), int(2)])])),
        ],
    );

    program(
        &["io"],
        class(
            "Counter",
            None,
            vec![var_decl("count", ty("int")), var_decl("data", array_ty("int"))],
            vec![add, sum_to, check, touch, main],
        ),
    )
}

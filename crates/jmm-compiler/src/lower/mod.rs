//! AST to IR Lowering
//!
//! Converts the typed AST into the IR representation. Expressions lower to a
//! value plus the instructions that must run before it is valid
//! ([`ExprCode`]); statements lower to instruction sequences.

mod expr;
mod stmt;

pub use expr::ExprCode;

use crate::ast::{MethodDecl, Program};
use crate::context::CompilationContext;
use crate::error::{CompileError, CompileResult};
use crate::ir::{CallInstr, Invocation, IrClass, IrField, IrInstr, IrMethod, IrValue};
use crate::symbols::{MethodSignature, Symbol, SymbolTable, Type};
use tracing::debug;

/// What a name refers to inside the current method.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// Local variable or parameter
    Variable(Type),
    Field(Type),
    /// Current class, superclass or an import
    Class(String),
}

/// Per-method lowering state
#[derive(Debug)]
struct Scope {
    method: String,
    is_static: bool,
    is_main: bool,
    return_type: Type,
    params: Vec<Symbol>,
    locals: Vec<Symbol>,
    temps: Vec<Symbol>,
}

impl Scope {
    fn empty() -> Self {
        Self::for_method(&MethodSignature {
            name: String::new(),
            return_type: Type::void(),
            params: Vec::new(),
            locals: Vec::new(),
            is_static: false,
            is_public: true,
        })
    }

    fn for_method(signature: &MethodSignature) -> Self {
        Self {
            method: signature.name.clone(),
            is_static: signature.is_static,
            is_main: signature.name == "main" && signature.is_static,
            return_type: signature.return_type.clone(),
            params: signature.params.clone(),
            locals: signature.locals.clone(),
            temps: Vec::new(),
        }
    }
}

/// AST to IR lowerer
pub struct Lowerer<'a> {
    symbols: &'a SymbolTable,
    ctx: &'a mut CompilationContext,
    scope: Scope,
}

impl<'a> Lowerer<'a> {
    pub fn new(symbols: &'a SymbolTable, ctx: &'a mut CompilationContext) -> Self {
        Self {
            symbols,
            ctx,
            scope: Scope::empty(),
        }
    }

    /// Lower the program's class: constructor first, then each method in
    /// declaration order.
    pub fn lower_program(&mut self, program: &Program) -> CompileResult<IrClass> {
        let symbols = self.symbols;
        debug!(class = %symbols.class_name, "lowering class");

        let mut class = IrClass::new(symbols.class_name.clone());
        class.super_class = symbols.super_class.clone();
        class.imports = symbols.imports.clone();
        class.fields = symbols
            .fields
            .iter()
            .map(|field| IrField {
                name: field.name.clone(),
                ty: field.ty.clone(),
            })
            .collect();

        class.methods.push(self.lower_constructor());
        for method in &program.class.methods {
            class.methods.push(self.lower_method(method)?);
        }

        Ok(class)
    }

    /// The synthesized no-argument constructor. Its `invokespecial` on `this`
    /// targets the superclass constructor.
    fn lower_constructor(&mut self) -> IrMethod {
        let mut ctor = IrMethod::constructor(self.symbols.class_name.clone());
        ctor.push(IrInstr::Call {
            dest: None,
            call: CallInstr::invoke(
                Invocation::Special,
                self.this_value(),
                "<init>",
                Vec::new(),
                Type::void(),
            ),
        });
        ctor.push(IrInstr::Return(None));
        ctor
    }

    /// Lower a single method body against its symbol-table signature.
    pub fn lower_method(&mut self, decl: &MethodDecl) -> CompileResult<IrMethod> {
        let symbols = self.symbols;
        let signature = symbols
            .method(&decl.name)
            .ok_or_else(|| CompileError::UnresolvedSymbol {
                name: decl.name.clone(),
                method: decl.name.clone(),
            })?;
        self.scope = Scope::for_method(signature);

        let mut method = IrMethod::new(signature.name.clone(), signature.return_type.clone());
        method.is_public = signature.is_public;
        method.is_static = signature.is_static;
        method.params = signature.params.clone();
        method.locals = signature.locals.clone();

        for stmt in &decl.body {
            let code = self.lower_stmt(stmt)?;
            method.extend(code);
        }

        let needs_void_return = self.scope.is_main || method.return_type.is_void();
        if needs_void_return && !method.ends_with_return() {
            method.push(IrInstr::Return(None));
        }

        method.temps = std::mem::take(&mut self.scope.temps);
        debug!(
            method = %method.name,
            instrs = method.body.len(),
            temps = method.temps.len(),
            "lowered method"
        );
        Ok(method)
    }

    /// Allocate a typed temporary in the current method. Counter values whose
    /// name is already taken by a parameter, local or field are skipped.
    fn new_temp(&mut self, ty: Type) -> IrValue {
        let name = loop {
            let candidate = self.ctx.new_temp();
            if !self.is_declared(&candidate) {
                break candidate;
            }
        };
        self.scope.temps.push(Symbol::new(name.clone(), ty.clone()));
        IrValue::temp(name, ty)
    }

    fn is_declared(&self, name: &str) -> bool {
        self.scope
            .params
            .iter()
            .chain(self.scope.locals.iter())
            .any(|s| s.name == name)
            || self.symbols.field(name).is_some()
    }

    fn this_value(&self) -> IrValue {
        IrValue::This(Type::class(self.symbols.class_name.clone()))
    }

    /// Resolve a name: locals, then parameters, then fields, then classes.
    fn resolve_var(&self, name: &str) -> CompileResult<Binding> {
        let declared = self
            .scope
            .locals
            .iter()
            .chain(self.scope.params.iter())
            .find(|s| s.name == name);
        if let Some(symbol) = declared {
            return Ok(Binding::Variable(symbol.ty.clone()));
        }

        if !self.scope.is_static {
            if let Some(field) = self.symbols.field(name) {
                return Ok(Binding::Field(field.ty.clone()));
            }
        }

        if self.symbols.is_class_name(name) {
            return Ok(Binding::Class(name.to_string()));
        }

        Err(CompileError::UnresolvedSymbol {
            name: name.to_string(),
            method: self.scope.method.clone(),
        })
    }
}

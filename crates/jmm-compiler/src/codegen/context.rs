//! Jasmin generator
//!
//! Walks the IR class and emits one `.method` block per method, simulating
//! the operand stack instruction by instruction.

use super::control::{self, CompareLabels};
use super::descriptor::ClassPaths;
use super::emit;
use super::frame::MethodFrame;
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOp, CallInstr, Invocation, IrClass, IrConstant, IrInstr, IrMethod, IrValue, UnaryOp};
use crate::options::CompilerOptions;
use std::fmt::Write;
use tracing::{debug, trace};

/// Code generator that transforms an IR class into Jasmin text
pub struct JasminGenerator<'a> {
    class: &'a IrClass,
    options: &'a CompilerOptions,
    paths: ClassPaths,
    compare_labels: CompareLabels,
}

impl<'a> JasminGenerator<'a> {
    pub fn new(class: &'a IrClass, options: &'a CompilerOptions) -> Self {
        Self {
            class,
            options,
            paths: ClassPaths::new(class),
            compare_labels: CompareLabels::default(),
        }
    }

    /// Generate the whole class listing.
    pub fn generate(&mut self) -> CompileResult<String> {
        debug!(class = %self.class.name, methods = self.class.methods.len(), "generating jasmin");
        let mut out = String::new();

        let _ = writeln!(out, ".class public {}", self.class.name);
        let _ = writeln!(out, ".super {}", self.super_path());
        out.push('\n');

        for field in &self.class.fields {
            let descriptor = self.paths.descriptor(&field.ty)?;
            let _ = writeln!(out, ".field public '{}' {}", field.name, descriptor);
        }
        if !self.class.fields.is_empty() {
            out.push('\n');
        }

        let class = self.class;
        for (i, method) in class.methods.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&self.generate_method(method)?);
        }

        Ok(out)
    }

    fn super_path(&self) -> String {
        match &self.class.super_class {
            Some(parent) => self.paths.class_path(parent),
            None => self.options.root_class.clone(),
        }
    }

    fn generate_method(&mut self, method: &IrMethod) -> CompileResult<String> {
        let mut frame = MethodFrame::new(method, &self.options.indent)?;

        for instr in &method.body {
            self.generate_instr(&mut frame, method, instr)?;
            if frame.depth() != 0 {
                return Err(CompileError::UnbalancedStack {
                    method: method.name.clone(),
                    instr: instr.to_string(),
                    depth: frame.depth(),
                });
            }
        }

        let mut out = String::new();
        if method.is_constructor && self.options.emit_comments {
            out.push_str("; default constructor\n");
        }
        let _ = writeln!(out, "{}", self.method_header(method)?);
        let _ = writeln!(out, "{}.limit stack {}", self.options.indent, frame.max_depth());
        let _ = writeln!(out, "{}.limit locals {}", self.options.indent, frame.locals());

        debug!(
            method = %method.name,
            stack = frame.max_depth(),
            locals = frame.locals(),
            "emitted method"
        );

        for line in frame.into_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out.push_str(".end method\n");
        Ok(out)
    }

    fn method_header(&self, method: &IrMethod) -> CompileResult<String> {
        if method.is_constructor {
            return Ok(".method public <init>()V".to_string());
        }
        if method.is_main() {
            return Ok(".method public static main([Ljava/lang/String;)V".to_string());
        }

        let visibility = if method.is_public { "public" } else { "private" };
        let static_kw = if method.is_static { " static" } else { "" };
        let descriptor = self
            .paths
            .method_descriptor(method.params.iter().map(|p| &p.ty), &method.return_type)?;
        Ok(format!(
            ".method {}{} {}{}",
            visibility, static_kw, method.name, descriptor
        ))
    }

    fn generate_instr(
        &mut self,
        frame: &mut MethodFrame,
        method: &IrMethod,
        instr: &IrInstr,
    ) -> CompileResult<()> {
        trace!(instr = %instr, "emitting");
        match instr {
            IrInstr::Assign { dest, value } => self.generate_assign(frame, dest, value),
            IrInstr::BinaryOp {
                dest,
                op,
                left,
                right,
            } => self.generate_binary(frame, dest, *op, left, right),
            IrInstr::UnaryOp { dest, op, operand } => {
                let UnaryOp::Not = op;
                self.load(frame, operand)?;
                frame.emit("iconst_1");
                frame.push(1);
                frame.emit("ixor");
                frame.pop(1)?;
                self.store_top(frame, dest)
            }
            IrInstr::GetField {
                dest,
                object,
                field,
                ty,
            } => {
                self.load(frame, object)?;
                let owner = self.owner_of(object)?;
                frame.emit(format!(
                    "getfield {}/{} {}",
                    owner,
                    field,
                    self.paths.descriptor(ty)?
                ));
                self.store_top(frame, dest)
            }
            IrInstr::PutField {
                object,
                field,
                value,
            } => {
                self.load(frame, object)?;
                self.load(frame, value)?;
                let owner = self.owner_of(object)?;
                frame.emit(format!(
                    "putfield {}/{} {}",
                    owner,
                    field,
                    self.paths.descriptor(&value.ty())?
                ));
                frame.pop(2)
            }
            IrInstr::Call { dest, call } => self.generate_call(frame, dest.as_ref(), call),
            IrInstr::Return(value) => {
                match value {
                    Some(value) if !method.is_main() => {
                        self.load(frame, value)?;
                        frame.emit(emit::return_op(&value.ty())?);
                        frame.pop(1)?;
                    }
                    _ => frame.emit("return"),
                }
                Ok(())
            }
            IrInstr::Goto(label) => {
                control::emit_goto(frame, label);
                Ok(())
            }
            IrInstr::CondGoto { cond, label } => {
                self.load(frame, cond)?;
                control::emit_cond_goto(frame, label)
            }
            IrInstr::Label(label) => {
                frame.emit_label(label);
                Ok(())
            }
        }
    }

    fn generate_assign(
        &mut self,
        frame: &mut MethodFrame,
        dest: &IrValue,
        value: &IrValue,
    ) -> CompileResult<()> {
        match dest {
            IrValue::Element { array, index, ty } => {
                self.load(frame, array)?;
                self.load(frame, index)?;
                self.load(frame, value)?;
                frame.emit(emit::array_store(ty));
                frame.pop(3)
            }
            _ => {
                self.load(frame, value)?;
                self.store_top(frame, dest)
            }
        }
    }

    fn generate_binary(
        &mut self,
        frame: &mut MethodFrame,
        dest: &IrValue,
        op: BinaryOp,
        left: &IrValue,
        right: &IrValue,
    ) -> CompileResult<()> {
        if let Some((slot, delta)) = self.increment(frame, dest, op, left, right)? {
            frame.emit(format!("iinc {} {}", slot, delta));
            return Ok(());
        }

        self.load(frame, left)?;
        self.load(frame, right)?;
        if let Some(opcode) = emit::binary_op(op) {
            frame.emit(opcode);
            frame.pop(1)?;
        } else if !control::emit_comparison(frame, &mut self.compare_labels, op)? {
            return Err(CompileError::unsupported(format!("binary operator `{}`", op)));
        }
        self.store_top(frame, dest)
    }

    /// `x := x + k`, `x := k + x` or `x := x - k` with `k` in iinc range.
    fn increment(
        &self,
        frame: &MethodFrame,
        dest: &IrValue,
        op: BinaryOp,
        left: &IrValue,
        right: &IrValue,
    ) -> CompileResult<Option<(u16, i8)>> {
        let Some(name) = dest.var_name() else {
            return Ok(None);
        };
        if !dest.ty().is_int() {
            return Ok(None);
        }

        let constant = match (left.var_name(), right.var_name()) {
            (Some(l), _) if l == name => right.as_int(),
            (_, Some(r)) if r == name && op == BinaryOp::Add => left.as_int(),
            _ => None,
        };
        let Some(delta) = constant.and_then(|k| emit::iinc_delta(op, k)) else {
            return Ok(None);
        };
        Ok(Some((frame.slot(name)?, delta)))
    }

    fn generate_call(
        &mut self,
        frame: &mut MethodFrame,
        dest: Option<&IrValue>,
        call: &CallInstr,
    ) -> CompileResult<()> {
        match call.invocation {
            Invocation::New => {
                let class = match &call.target {
                    Some(IrValue::ClassRef(name)) => self.paths.class_path(name),
                    _ => self.paths.class_path(&call.return_type.name),
                };
                frame.emit(format!("new {}", class));
                frame.push(1);
            }
            Invocation::NewArray => {
                let size = call.args.first().ok_or_else(|| {
                    CompileError::internal("array allocation without a size")
                })?;
                self.load(frame, size)?;
                let elem = call.return_type.element();
                let opcode = if elem.is_int() {
                    "newarray int".to_string()
                } else if elem.is_boolean() {
                    "newarray boolean".to_string()
                } else if elem.is_void() {
                    return Err(CompileError::NoDescriptor {
                        ty: call.return_type.to_string(),
                    });
                } else {
                    format!("anewarray {}", self.paths.class_path(&elem.name))
                };
                frame.emit(opcode);
            }
            Invocation::ArrayLength => {
                let array = call.target.as_ref().ok_or_else(|| {
                    CompileError::internal("arraylength without an array operand")
                })?;
                self.load(frame, array)?;
                frame.emit("arraylength");
            }
            Invocation::Static | Invocation::Virtual | Invocation::Special => {
                self.generate_invoke(frame, call)?;
            }
        }

        match dest {
            Some(dest) => self.store_top(frame, dest),
            None if call.returns_value() => {
                frame.emit("pop");
                frame.pop(1)
            }
            None => Ok(()),
        }
    }

    /// `invoke* Owner/name(args)ret`; stack delta is
    /// -1 (receiver, instance calls) - args + 1 (non-void).
    fn generate_invoke(&mut self, frame: &mut MethodFrame, call: &CallInstr) -> CompileResult<()> {
        let method = call.method.as_deref().ok_or_else(|| CompileError::UnresolvedCall {
            callee: call.to_string(),
        })?;
        let target = call.target.as_ref().ok_or_else(|| CompileError::UnresolvedCall {
            callee: call.to_string(),
        })?;

        let owner = match (call.invocation, target) {
            (Invocation::Static, IrValue::ClassRef(name)) => self.paths.class_path(name),
            (Invocation::Static, other) => {
                return Err(CompileError::UnresolvedCall {
                    callee: format!("{}.{}", other, method),
                })
            }
            (Invocation::Special, IrValue::This(_)) => self.super_path(),
            _ => self.owner_of(target)?,
        };

        let receiver = call.invocation != Invocation::Static;
        if receiver {
            self.load(frame, target)?;
        }
        for arg in &call.args {
            self.load(frame, arg)?;
        }

        let arg_types: Vec<_> = call.args.iter().map(IrValue::ty).collect();
        let descriptor = self
            .paths
            .method_descriptor(arg_types.iter(), &call.return_type)?;
        frame.emit(format!(
            "{} {}/{}{}",
            call.invocation.keyword(),
            owner,
            method,
            descriptor
        ));

        let arg_count = u32::try_from(call.args.len())
            .map_err(|_| CompileError::unsupported("call with too many arguments"))?;
        frame.pop(arg_count + u32::from(receiver))?;
        if call.returns_value() {
            frame.push(1);
        }
        Ok(())
    }

    /// Class that declares members reached through `object`.
    fn owner_of(&self, object: &IrValue) -> CompileResult<String> {
        let ty = object.ty();
        if ty.is_array || ty.is_primitive() && !ty.name.eq(crate::symbols::STRING) {
            return Err(CompileError::unsupported(format!(
                "member access on a value of type {}",
                ty
            )));
        }
        Ok(self.paths.class_path(&ty.name))
    }

    /// Push a value.
    fn load(&mut self, frame: &mut MethodFrame, value: &IrValue) -> CompileResult<()> {
        match value {
            IrValue::Literal(IrConstant::Int(v)) => frame.emit(emit::push_int(*v)),
            IrValue::Literal(IrConstant::Bool(b)) => frame.emit(emit::push_bool(*b)),
            IrValue::Literal(IrConstant::Str(s)) => frame.emit(format!("ldc {:?}", s)),
            IrValue::This(_) => frame.emit("aload_0"),
            IrValue::Temp { name, ty } | IrValue::Local { name, ty } => {
                let slot = frame.slot(name)?;
                frame.emit(emit::load(ty, slot)?);
            }
            IrValue::Element { array, index, ty } => {
                self.load(frame, array)?;
                self.load(frame, index)?;
                frame.emit(emit::array_load(ty));
                // two operands in, one element out
                frame.pop(2)?;
            }
            IrValue::ClassRef(name) => {
                return Err(CompileError::unsupported(format!(
                    "class `{}` used as a value",
                    name
                )))
            }
        }
        frame.push(1);
        Ok(())
    }

    /// Pop the top of the stack into a variable.
    fn store_top(&mut self, frame: &mut MethodFrame, dest: &IrValue) -> CompileResult<()> {
        match dest {
            IrValue::Temp { name, ty } | IrValue::Local { name, ty } => {
                let slot = frame.slot(name)?;
                frame.emit(emit::store(ty, slot)?);
                frame.pop(1)
            }
            other => Err(CompileError::unsupported(format!(
                "store into {}",
                other
            ))),
        }
    }
}

//! Expression lowering
//!
//! Every operand handed to an IR instruction is a simple value: a temporary,
//! a declared variable, a literal or `this`. Anything else (field reads,
//! array reads, calls, nested operators) is materialized into a fresh
//! temporary first, so a call used as an operand is evaluated exactly once.

use super::{Binding, Lowerer};
use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{CompileError, CompileResult};
use crate::ir::{BinaryOp, CallInstr, Invocation, IrConstant, IrInstr, IrValue, UnaryOp};
use crate::symbols::{MethodSignature, Type};

/// A lowered expression: its value, valid once `code` has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprCode {
    pub value: IrValue,
    pub code: Vec<IrInstr>,
}

impl ExprCode {
    fn value(value: IrValue) -> Self {
        Self {
            value,
            code: Vec::new(),
        }
    }
}

/// Where a call's result goes.
#[derive(Debug, Clone)]
pub(super) enum CallDest {
    /// A fresh temporary of the return type
    Temp,
    /// An existing variable
    Into(IrValue),
    /// Nowhere; the result of a non-void call is dropped
    Discard,
}

/// Who receives a call.
enum CallTarget {
    Static(String),
    Instance(IrValue),
}

pub(super) fn ir_binary_op(op: BinaryOperator) -> BinaryOp {
    match op {
        BinaryOperator::Add => BinaryOp::Add,
        BinaryOperator::Sub => BinaryOp::Sub,
        BinaryOperator::Mul => BinaryOp::Mul,
        BinaryOperator::Div => BinaryOp::Div,
        BinaryOperator::Less => BinaryOp::Less,
        BinaryOperator::LessEqual => BinaryOp::LessEqual,
        BinaryOperator::Greater => BinaryOp::Greater,
        BinaryOperator::GreaterEqual => BinaryOp::GreaterEqual,
        BinaryOperator::Equal => BinaryOp::Equal,
        BinaryOperator::NotEqual => BinaryOp::NotEqual,
        BinaryOperator::And => BinaryOp::And,
    }
}

impl<'a> Lowerer<'a> {
    /// Lower an expression.
    ///
    /// `hint` is the type expected by the context; it types the result of
    /// calls whose return type the symbol table cannot provide.
    pub fn lower_expr(&mut self, expr: &Expr, hint: &Type) -> CompileResult<ExprCode> {
        match expr {
            Expr::IntLiteral(v) => Ok(ExprCode::value(IrValue::int(*v))),
            Expr::BoolLiteral(b) => Ok(ExprCode::value(IrValue::bool(*b))),
            Expr::StringLiteral(s) => Ok(ExprCode::value(IrValue::Literal(IrConstant::Str(
                s.clone(),
            )))),
            Expr::This => Ok(ExprCode::value(self.this_value())),
            Expr::Paren(inner) => self.lower_expr(inner, hint),
            Expr::Var(name) => self.lower_var(name),
            Expr::Binary { op, left, right } => self.lower_binary(*op, left, right, None),
            Expr::Unary { op, operand } => self.lower_unary(*op, operand),
            Expr::ArrayAccess { array, index } => self.lower_array_access(array, index),
            Expr::Length(array) => self.lower_length(array),
            Expr::NewArray { elem, size } => self.lower_new_array(elem, size),
            Expr::ArrayInit(elements) => self.lower_array_init(elements, hint),
            Expr::NewObject(class) => Ok(self.lower_new_object(class)),
            Expr::MethodCall {
                receiver,
                name,
                args,
            } => {
                let (value, code) =
                    self.lower_call(receiver.as_deref(), name, args, hint, CallDest::Temp)?;
                let value = value.ok_or_else(|| {
                    CompileError::internal(format!("call to `{}` produced no value", name))
                })?;
                Ok(ExprCode { value, code })
            }
        }
    }

    fn lower_var(&mut self, name: &str) -> CompileResult<ExprCode> {
        match self.resolve_var(name)? {
            Binding::Variable(ty) => Ok(ExprCode::value(IrValue::local(name, ty))),
            Binding::Field(ty) => {
                let dest = self.new_temp(ty.clone());
                let code = vec![IrInstr::GetField {
                    dest: dest.clone(),
                    object: self.this_value(),
                    field: name.to_string(),
                    ty,
                }];
                Ok(ExprCode { value: dest, code })
            }
            Binding::Class(class) => Err(CompileError::UnresolvedSymbol {
                name: class,
                method: self.scope.method.clone(),
            }),
        }
    }

    /// Lower `left op right`, writing into `dest` or a fresh temporary.
    pub(super) fn lower_binary(
        &mut self,
        op: BinaryOperator,
        left: &Expr,
        right: &Expr,
        dest: Option<IrValue>,
    ) -> CompileResult<ExprCode> {
        let op = ir_binary_op(op);
        let operand_hint = if op == BinaryOp::And {
            Type::boolean()
        } else {
            Type::int()
        };

        let left = self.lower_expr(left, &operand_hint)?;
        let right = self.lower_expr(right, &operand_hint)?;
        let dest = match dest {
            Some(dest) => dest,
            None => self.new_temp(op.result_type()),
        };

        let mut code = left.code;
        code.extend(right.code);
        code.push(IrInstr::BinaryOp {
            dest: dest.clone(),
            op,
            left: left.value,
            right: right.value,
        });
        Ok(ExprCode { value: dest, code })
    }

    fn lower_unary(&mut self, op: UnaryOperator, operand: &Expr) -> CompileResult<ExprCode> {
        let UnaryOperator::Not = op;
        let operand = self.lower_expr(operand, &Type::boolean())?;
        let negated = self.negate(operand.value);
        let mut code = operand.code;
        code.push(negated.1);
        Ok(ExprCode {
            value: negated.0,
            code,
        })
    }

    /// `tmp := !value`
    pub(super) fn negate(&mut self, value: IrValue) -> (IrValue, IrInstr) {
        let dest = self.new_temp(Type::boolean());
        let instr = IrInstr::UnaryOp {
            dest: dest.clone(),
            op: UnaryOp::Not,
            operand: value,
        };
        (dest, instr)
    }

    fn lower_array_access(&mut self, array: &Expr, index: &Expr) -> CompileResult<ExprCode> {
        let array = self.lower_expr(array, &Type::array_of(crate::symbols::INT))?;
        let index = self.lower_expr(index, &Type::int())?;
        let elem = array.value.ty().element();
        let dest = self.new_temp(elem.clone());

        let mut code = array.code;
        code.extend(index.code);
        code.push(IrInstr::Assign {
            dest: dest.clone(),
            value: IrValue::element(array.value, index.value, elem),
        });
        Ok(ExprCode { value: dest, code })
    }

    fn lower_length(&mut self, array: &Expr) -> CompileResult<ExprCode> {
        let array = self.lower_expr(array, &Type::array_of(crate::symbols::INT))?;
        let dest = self.new_temp(Type::int());
        let mut code = array.code;
        code.push(IrInstr::Call {
            dest: Some(dest.clone()),
            call: CallInstr::array_length(array.value),
        });
        Ok(ExprCode { value: dest, code })
    }

    fn lower_new_array(&mut self, elem: &Type, size: &Expr) -> CompileResult<ExprCode> {
        let size = self.lower_expr(size, &Type::int())?;
        let call = CallInstr::new_array(elem, size.value);
        let dest = self.new_temp(call.return_type.clone());
        let mut code = size.code;
        code.push(IrInstr::Call {
            dest: Some(dest.clone()),
            call,
        });
        Ok(ExprCode { value: dest, code })
    }

    /// `[a, b, c]`: allocate, then store each element in order.
    fn lower_array_init(&mut self, elements: &[Expr], hint: &Type) -> CompileResult<ExprCode> {
        let elem = if hint.is_array {
            hint.element()
        } else {
            Type::int()
        };

        let mut code = Vec::new();
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            let lowered = self.lower_expr(element, &elem)?;
            code.extend(lowered.code);
            values.push(lowered.value);
        }

        let array = self.pack_array(&elem, values, &mut code)?;
        Ok(ExprCode { value: array, code })
    }

    /// Allocate an array of `elem` holding `values`, appending the code.
    fn pack_array(
        &mut self,
        elem: &Type,
        values: Vec<IrValue>,
        code: &mut Vec<IrInstr>,
    ) -> CompileResult<IrValue> {
        let len = i32::try_from(values.len())
            .map_err(|_| CompileError::unsupported("array literal with more than 2^31 elements"))?;
        let call = CallInstr::new_array(elem, IrValue::int(len));
        let array = self.new_temp(call.return_type.clone());
        code.push(IrInstr::Call {
            dest: Some(array.clone()),
            call,
        });

        for (index, value) in (0..len).zip(values) {
            code.push(IrInstr::Assign {
                dest: IrValue::element(array.clone(), IrValue::int(index), elem.clone()),
                value,
            });
        }
        Ok(array)
    }

    /// `new C()`: allocate, then invoke the constructor on the new object.
    fn lower_new_object(&mut self, class: &str) -> ExprCode {
        let alloc = CallInstr::new_object(class);
        let object = self.new_temp(alloc.return_type.clone());
        let code = vec![
            IrInstr::Call {
                dest: Some(object.clone()),
                call: alloc,
            },
            IrInstr::Call {
                dest: None,
                call: CallInstr::invoke(
                    Invocation::Special,
                    object.clone(),
                    "<init>",
                    Vec::new(),
                    Type::void(),
                ),
            },
        ];
        ExprCode {
            value: object,
            code,
        }
    }

    /// Lower a method call.
    ///
    /// Calls on the current class use the symbol table for the return type,
    /// the parameter hints and vararg packing. Calls on a class name are
    /// static; calls on any other receiver are virtual on its declared type.
    pub(super) fn lower_call(
        &mut self,
        receiver: Option<&Expr>,
        name: &str,
        args: &[Expr],
        hint: &Type,
        dest: CallDest,
    ) -> CompileResult<(Option<IrValue>, Vec<IrInstr>)> {
        let symbols = self.symbols;
        let mut code = Vec::new();

        let target = match receiver.map(Expr::unparen) {
            None => {
                let static_callee = symbols.method(name).is_some_and(|m| m.is_static);
                if self.scope.is_static || static_callee {
                    CallTarget::Static(symbols.class_name.clone())
                } else {
                    CallTarget::Instance(self.this_value())
                }
            }
            Some(Expr::Var(var)) if matches!(self.resolve_var(var)?, Binding::Class(_)) => {
                CallTarget::Static(var.clone())
            }
            Some(expr) => {
                let lowered = self.lower_expr(expr, &Type::class(symbols.class_name.clone()))?;
                code.extend(lowered.code);
                CallTarget::Instance(lowered.value)
            }
        };

        let own: Option<&MethodSignature> = match &target {
            CallTarget::Static(class) if *class == symbols.class_name => symbols.method(name),
            CallTarget::Instance(value) => {
                let ty = value.ty();
                if !ty.is_array && ty.name == symbols.class_name {
                    symbols.method(name)
                } else {
                    None
                }
            }
            CallTarget::Static(_) => None,
        };

        let (invocation, target_value) = match target {
            CallTarget::Instance(_) if own.is_some_and(|m| m.is_static) => (
                Invocation::Static,
                IrValue::ClassRef(symbols.class_name.clone()),
            ),
            CallTarget::Instance(value) => (Invocation::Virtual, value),
            CallTarget::Static(class) => (Invocation::Static, IrValue::ClassRef(class)),
        };

        let return_type = own
            .map(|m| m.return_type.clone())
            .unwrap_or_else(|| hint.clone());

        let args = self.lower_args(own, args, &mut code)?;

        let dest = match dest {
            CallDest::Temp => {
                if return_type.is_void() {
                    return Err(CompileError::unsupported(format!(
                        "void call `{}` used as a value",
                        name
                    )));
                }
                Some(self.new_temp(return_type.clone()))
            }
            CallDest::Into(var) => Some(var),
            CallDest::Discard => None,
        };

        code.push(IrInstr::Call {
            dest: dest.clone(),
            call: CallInstr::invoke(invocation, target_value, name, args, return_type),
        });
        Ok((dest, code))
    }

    /// Lower arguments left to right, packing trailing vararg arguments into
    /// a fresh array.
    fn lower_args(
        &mut self,
        callee: Option<&MethodSignature>,
        args: &[Expr],
        code: &mut Vec<IrInstr>,
    ) -> CompileResult<Vec<IrValue>> {
        let params = callee.map(|m| m.params.as_slice()).unwrap_or(&[]);
        let vararg = callee
            .filter(|m| m.is_vararg())
            .and_then(|m| m.params.last())
            .map(|p| p.ty.element());
        let fixed = match vararg {
            Some(_) => params.len() - 1,
            None => args.len(),
        };

        let mut values = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            let hint = match (&vararg, params.get(i)) {
                (Some(elem), _) if i >= fixed => elem.clone(),
                (_, Some(param)) => param.ty.clone(),
                _ => Type::int(),
            };
            let lowered = self.lower_expr(arg, &hint)?;
            code.extend(lowered.code);
            values.push(lowered.value);
        }

        let Some(elem) = vararg else {
            return Ok(values);
        };

        let trailing = values.split_off(fixed.min(values.len()));
        let passes_array = trailing.len() == 1 && trailing[0].ty().is_array;
        if passes_array {
            values.extend(trailing);
        } else {
            let array = self.pack_array(&elem, trailing, code)?;
            values.push(array);
        }
        Ok(values)
    }
}

//! Statement lowering

use super::expr::{ir_binary_op, CallDest};
use super::{Binding, Lowerer};
use crate::ast::{Expr, Stmt};
use crate::error::{CompileError, CompileResult};
use crate::ir::{IrInstr, IrValue};
use crate::symbols::Type;

impl<'a> Lowerer<'a> {
    pub(super) fn lower_stmt(&mut self, stmt: &Stmt) -> CompileResult<Vec<IrInstr>> {
        match stmt {
            Stmt::Assign { target, value } => self.lower_assign(target, value),
            Stmt::Expr(expr) => self.lower_expr_stmt(expr),
            Stmt::Return(value) => self.lower_return(value.as_ref()),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => self.lower_if(cond, then_branch, else_branch),
            Stmt::While { cond, body } => self.lower_while(cond, body),
            Stmt::Block(stmts) => {
                let mut code = Vec::new();
                for stmt in stmts {
                    code.extend(self.lower_stmt(stmt)?);
                }
                Ok(code)
            }
        }
    }

    fn lower_assign(&mut self, target: &Expr, value: &Expr) -> CompileResult<Vec<IrInstr>> {
        match target.unparen() {
            Expr::Var(name) => match self.resolve_var(name)? {
                Binding::Variable(ty) => {
                    let dest = IrValue::local(name, ty.clone());
                    self.lower_into_variable(dest, &ty, value)
                }
                Binding::Field(ty) => {
                    let value = self.lower_expr(value, &ty)?;
                    let mut code = value.code;
                    code.push(IrInstr::PutField {
                        object: self.this_value(),
                        field: name.clone(),
                        value: value.value,
                    });
                    Ok(code)
                }
                Binding::Class(class) => Err(CompileError::malformed(
                    "AssignStmt",
                    format!("cannot assign to class `{}`", class),
                )),
            },
            Expr::ArrayAccess { array, index } => {
                let elem_hint = match array.unparen() {
                    Expr::Var(name) => match self.resolve_var(name)? {
                        Binding::Variable(ty) | Binding::Field(ty) => ty.element(),
                        Binding::Class(_) => Type::int(),
                    },
                    _ => Type::int(),
                };

                let value = self.lower_expr(value, &elem_hint)?;
                let array = self.lower_expr(array, &Type::array_of(elem_hint.name.clone()))?;
                let index = self.lower_expr(index, &Type::int())?;
                let elem = array.value.ty().element();

                let mut code = value.code;
                code.extend(array.code);
                code.extend(index.code);
                code.push(IrInstr::Assign {
                    dest: IrValue::element(array.value, index.value, elem),
                    value: value.value,
                });
                Ok(code)
            }
            other => Err(CompileError::malformed(
                "AssignStmt",
                format!("invalid assignment target {:?}", other),
            )),
        }
    }

    /// Binary results and call results are written straight into the
    /// variable; `x = x + 1` stays one instruction.
    fn lower_into_variable(
        &mut self,
        dest: IrValue,
        ty: &Type,
        value: &Expr,
    ) -> CompileResult<Vec<IrInstr>> {
        match value.unparen() {
            Expr::Binary { op, left, right } if ir_binary_op(*op).result_type() == *ty => {
                Ok(self.lower_binary(*op, left, right, Some(dest))?.code)
            }
            Expr::MethodCall {
                receiver,
                name,
                args,
            } => {
                let (_, code) =
                    self.lower_call(receiver.as_deref(), name, args, ty, CallDest::Into(dest))?;
                Ok(code)
            }
            _ => {
                let value = self.lower_expr(value, ty)?;
                let mut code = value.code;
                code.push(IrInstr::Assign {
                    dest,
                    value: value.value,
                });
                Ok(code)
            }
        }
    }

    fn lower_expr_stmt(&mut self, expr: &Expr) -> CompileResult<Vec<IrInstr>> {
        match expr.unparen() {
            Expr::MethodCall {
                receiver,
                name,
                args,
            } => {
                let (_, code) = self.lower_call(
                    receiver.as_deref(),
                    name,
                    args,
                    &Type::void(),
                    CallDest::Discard,
                )?;
                Ok(code)
            }
            other => Ok(self.lower_expr(other, &Type::void())?.code),
        }
    }

    fn lower_return(&mut self, value: Option<&Expr>) -> CompileResult<Vec<IrInstr>> {
        if self.scope.is_main {
            return Ok(vec![IrInstr::Return(None)]);
        }

        match value {
            None => Ok(vec![IrInstr::Return(None)]),
            Some(value) => {
                let return_type = self.scope.return_type.clone();
                let value = self.lower_expr(value, &return_type)?;
                let mut code = value.code;
                code.push(IrInstr::Return(Some(value.value)));
                Ok(code)
            }
        }
    }

    /// `if (c) goto then; <else>; goto end; then: <then>; end:`
    fn lower_if(
        &mut self,
        cond: &Expr,
        then_branch: &Stmt,
        else_branch: &Stmt,
    ) -> CompileResult<Vec<IrInstr>> {
        let cond = self.lower_expr(cond, &Type::boolean())?;
        let (then_label, end_label) = self.ctx.if_labels();

        let mut code = cond.code;
        code.push(IrInstr::CondGoto {
            cond: cond.value,
            label: then_label.clone(),
        });
        code.extend(self.lower_stmt(else_branch)?);
        code.push(IrInstr::Goto(end_label.clone()));
        code.push(IrInstr::Label(then_label));
        code.extend(self.lower_stmt(then_branch)?);
        code.push(IrInstr::Label(end_label));
        Ok(code)
    }

    /// `cond: <c>; t := !c; if (t) goto end; <body>; goto cond; end:`
    fn lower_while(&mut self, cond: &Expr, body: &Stmt) -> CompileResult<Vec<IrInstr>> {
        let (cond_label, end_label) = self.ctx.while_labels();

        let mut code = vec![IrInstr::Label(cond_label.clone())];
        let cond = self.lower_expr(cond, &Type::boolean())?;
        code.extend(cond.code);
        let (exit, negate) = self.negate(cond.value);
        code.push(negate);
        code.push(IrInstr::CondGoto {
            cond: exit,
            label: end_label.clone(),
        });
        code.extend(self.lower_stmt(body)?);
        code.push(IrInstr::Goto(cond_label));
        code.push(IrInstr::Label(end_label));
        Ok(code)
    }
}

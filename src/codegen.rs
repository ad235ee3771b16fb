//! LLVM lowering for the K language
//!
//! Walks the checked AST and emits LLVM IR through inkwell. All state lives
//! in an explicit [`Codegen`] context: the LLVM module and builder, a scope
//! stack mapping names to stack slots, and the checker's per-assignment
//! resolutions.
//!
//! Every variable gets an alloca in the entry block of `main`; reads load
//! from the slot, writes store into it. Every statement and expression
//! yields a `double` (comparisons are widened with `uitofp` and `printf`'s
//! `i32` result with `sitofp`), which keeps `if` merges a plain two-input
//! `phi double`.

use std::collections::HashMap;

use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::{Linkage, Module};
use inkwell::types::BasicTypeEnum;
use inkwell::values::{
    BasicMetadataValueEnum, BasicValueEnum, FloatValue, FunctionValue, PointerValue,
};
use inkwell::{AddressSpace, FloatPredicate};

use crate::ast::{AssignKind, BinaryOp, Expr, ExprKind, Program, Stmt, StmtKind, UnaryOp};
use crate::diagnostics::Diagnostic;
use crate::span::Span;

/// A variable's stack slot and the type stored in it (`double` for numbers,
/// `ptr` for string bindings).
#[derive(Debug, Clone, Copy)]
struct VarSlot<'ctx> {
    ptr: PointerValue<'ctx>,
    ty: BasicTypeEnum<'ctx>,
}

/// One argument conversion demanded by a print format specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormatArg {
    /// `%f`, `%g`, `%e`, `%.Nf|g|e`: passed as `double`
    Double,
    /// `%d`: the double argument truncated to `i32`
    Int,
    /// `%s`: must be a string literal
    Str,
}

/// LLVM code generator
pub struct Codegen<'ctx> {
    context: &'ctx Context,
    module: Module<'ctx>,
    builder: Builder<'ctx>,
    /// Stack of scopes (innermost last), mirroring the checker's.
    scopes: Vec<HashMap<String, VarSlot<'ctx>>>,
    /// Per-assignment resolutions recorded by the checker.
    assign_kinds: HashMap<Span, AssignKind>,
}

impl<'ctx> Codegen<'ctx> {
    pub fn new(context: &'ctx Context, module_id: &str, source_file: &str) -> Self {
        let module = context.create_module(module_id);
        module.set_source_file_name(source_file);
        let builder = context.create_builder();

        Self {
            context,
            module,
            builder,
            scopes: Vec::new(),
            assign_kinds: HashMap::new(),
        }
    }

    /// Attach the checker's assignment resolutions.
    pub fn with_assign_kinds(mut self, assign_kinds: HashMap<Span, AssignKind>) -> Self {
        self.assign_kinds = assign_kinds;
        self
    }

    /// Lower a whole program into `main`, an `i32()` function ending in
    /// `ret i32 0`.
    pub fn compile_program(&mut self, program: &Program) -> Result<(), Diagnostic> {
        let i32_type = self.context.i32_type();
        let fn_type = i32_type.fn_type(&[], false);
        let main_fn = self.module.add_function("main", fn_type, None);
        let entry = self.context.append_basic_block(main_fn, "entry");
        self.builder.position_at_end(entry);

        self.scopes.push(HashMap::new());
        for stmt in &program.stmts {
            self.codegen_stmt(stmt)?;
        }
        self.scopes.pop();

        self.builder
            .build_return(Some(&i32_type.const_int(0, false)))
            .unwrap();
        Ok(())
    }

    /// Get the LLVM IR as a string
    pub fn print_to_string(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Verify the module
    pub fn verify(&self) -> Result<(), String> {
        self.module.verify().map_err(|e| e.to_string())
    }

    // ============ Statements ============

    fn codegen_stmt(&mut self, stmt: &Stmt) -> Result<FloatValue<'ctx>, Diagnostic> {
        match &stmt.kind {
            StmtKind::Assign { name, value, .. } => self.codegen_assign(stmt.span, name, value),
            StmtKind::Print { format, args } => self.codegen_print(format, args),
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.codegen_if(condition, then_branch, else_branch),
            StmtKind::While { condition, body } => self.codegen_while(condition, body),
            StmtKind::Block(stmts) => self.codegen_block(stmts),
            StmtKind::Expr(expr) => {
                let value = self.codegen_expr(expr)?;
                Ok(self.as_double(value))
            }
        }
    }

    fn codegen_assign(
        &mut self,
        stmt_span: Span,
        name: &str,
        value: &Expr,
    ) -> Result<FloatValue<'ctx>, Diagnostic> {
        let value = self.codegen_expr(value)?;
        let kind = self
            .assign_kinds
            .get(&stmt_span)
            .copied()
            .expect("BUG: assignment was not resolved by the checker");

        match kind {
            // Declarations and shadows get a fresh slot in the current
            // scope; the checker guarantees reassignments hit an existing
            // slot of the same type.
            AssignKind::Declaration | AssignKind::Shadowing => {
                let ty = value.get_type();
                let ptr = self.create_entry_block_alloca(name, ty);
                self.builder.build_store(ptr, value).unwrap();
                self.scopes
                    .last_mut()
                    .expect("BUG: codegen scope stack is empty")
                    .insert(name.to_string(), VarSlot { ptr, ty });
            }
            AssignKind::Reassignment => {
                let slot = self
                    .lookup(name)
                    .expect("BUG: reassignment to a variable without a slot");
                self.builder.build_store(slot.ptr, value).unwrap();
            }
        }

        Ok(self.as_double(value))
    }

    fn codegen_if(
        &mut self,
        condition: &Expr,
        then_branch: &Stmt,
        else_branch: &Stmt,
    ) -> Result<FloatValue<'ctx>, Diagnostic> {
        let f64_type = self.context.f64_type();
        let cond = self.codegen_expr(condition)?;
        let cond = self
            .builder
            .build_float_compare(
                FloatPredicate::ONE,
                self.as_double(cond),
                f64_type.const_float(0.0),
                "ifcond",
            )
            .unwrap();

        let function = self.current_function();
        let then_bb = self.context.append_basic_block(function, "then");
        let else_bb = self.context.append_basic_block(function, "else");
        let merge_bb = self.context.append_basic_block(function, "ifcont");

        self.builder
            .build_conditional_branch(cond, then_bb, else_bb)
            .unwrap();

        self.builder.position_at_end(then_bb);
        let then_value = self.codegen_stmt(then_branch)?;
        self.builder.build_unconditional_branch(merge_bb).unwrap();
        // Nested control flow may have moved the insertion point; the phi
        // wants whichever block the branch actually falls out of.
        let then_end = self.builder.get_insert_block().unwrap();

        self.builder.position_at_end(else_bb);
        let else_value = self.codegen_stmt(else_branch)?;
        self.builder.build_unconditional_branch(merge_bb).unwrap();
        let else_end = self.builder.get_insert_block().unwrap();

        self.builder.position_at_end(merge_bb);
        let phi = self.builder.build_phi(f64_type, "iftmp").unwrap();
        phi.add_incoming(&[(&then_value, then_end), (&else_value, else_end)]);
        Ok(phi.as_basic_value().into_float_value())
    }

    fn codegen_while(
        &mut self,
        condition: &Expr,
        body: &Stmt,
    ) -> Result<FloatValue<'ctx>, Diagnostic> {
        let f64_type = self.context.f64_type();
        let function = self.current_function();
        let cond_bb = self.context.append_basic_block(function, "loopcond");
        let body_bb = self.context.append_basic_block(function, "loop");
        let after_bb = self.context.append_basic_block(function, "afterloop");

        self.builder.build_unconditional_branch(cond_bb).unwrap();

        self.builder.position_at_end(cond_bb);
        let cond = self.codegen_expr(condition)?;
        let cond = self
            .builder
            .build_float_compare(
                FloatPredicate::ONE,
                self.as_double(cond),
                f64_type.const_float(0.0),
                "looptest",
            )
            .unwrap();
        self.builder
            .build_conditional_branch(cond, body_bb, after_bb)
            .unwrap();

        self.builder.position_at_end(body_bb);
        self.codegen_stmt(body)?;
        self.builder.build_unconditional_branch(cond_bb).unwrap();

        self.builder.position_at_end(after_bb);
        Ok(f64_type.const_float(0.0))
    }

    fn codegen_block(&mut self, stmts: &[Stmt]) -> Result<FloatValue<'ctx>, Diagnostic> {
        self.scopes.push(HashMap::new());
        let mut last = self.context.f64_type().const_float(0.0);
        for stmt in stmts {
            last = self.codegen_stmt(stmt)?;
        }
        self.scopes.pop();
        Ok(last)
    }

    // ============ Print ============

    /// Three lowering modes, decided by the shape of the format expression:
    /// a literal with arguments goes through the format walker, a bare
    /// literal collapses `%%` and prints via `"%s"`, and a numeric
    /// expression prints as `"%.15f\n"`.
    fn codegen_print(
        &mut self,
        format: &Expr,
        args: &[Expr],
    ) -> Result<FloatValue<'ctx>, Diagnostic> {
        let call_args: Vec<BasicMetadataValueEnum<'ctx>> = match (&format.kind, args.is_empty()) {
            (ExprKind::Str(text), false) => self.formatted_print_args(format, text, args)?,
            (ExprKind::Str(text), true) => {
                let collapsed = text.replace("%%", "%");
                let fmt = self.global_string("%s");
                let text = self.global_string(&collapsed);
                vec![fmt.into(), text.into()]
            }
            (_, true) => {
                let value = self.codegen_expr(format)?;
                if !value.is_float_value() {
                    return Err(Diagnostic::error(
                        "print requires a numeric expression or a string literal",
                        format.span,
                    ));
                }
                let fmt = self.global_string("%.15f\n");
                vec![fmt.into(), value.into_float_value().into()]
            }
            (_, false) => {
                return Err(Diagnostic::error(
                    "print with arguments requires a string literal format",
                    format.span,
                ))
            }
        };

        let call = self
            .builder
            .build_call(self.printf(), &call_args, "printfcall")
            .unwrap();
        let result = call
            .try_as_basic_value()
            .left()
            .expect("BUG: printf declared without a return value");
        Ok(self.as_double(result))
    }

    /// Walk the format literal, pair each specifier with its argument, and
    /// build the printf argument list. The format string itself is emitted
    /// verbatim; the specifiers are already printf-compatible.
    fn formatted_print_args(
        &mut self,
        format: &Expr,
        text: &str,
        args: &[Expr],
    ) -> Result<Vec<BasicMetadataValueEnum<'ctx>>, Diagnostic> {
        let specs = parse_format_specs(text, format.span)?;
        if specs.len() != args.len() {
            return Err(Diagnostic::error(
                format!(
                    "format string expects {} argument(s), but {} provided",
                    specs.len(),
                    args.len()
                ),
                format.span,
            ));
        }

        let mut call_args: Vec<BasicMetadataValueEnum<'ctx>> =
            vec![self.global_string(text).into()];
        for (spec, arg) in specs.iter().zip(args) {
            match spec {
                FormatArg::Double => {
                    call_args.push(self.numeric_print_arg(arg)?.into());
                }
                FormatArg::Int => {
                    let value = self.numeric_print_arg(arg)?;
                    let truncated = self
                        .builder
                        .build_float_to_signed_int(value, self.context.i32_type(), "fmtint")
                        .unwrap();
                    call_args.push(truncated.into());
                }
                FormatArg::Str => {
                    let ExprKind::Str(text) = &arg.kind else {
                        return Err(Diagnostic::error(
                            "%s format specifier requires string literal argument",
                            arg.span,
                        ));
                    };
                    call_args.push(self.global_string(text).into());
                }
            }
        }
        Ok(call_args)
    }

    fn numeric_print_arg(&mut self, arg: &Expr) -> Result<FloatValue<'ctx>, Diagnostic> {
        let value = self.codegen_expr(arg)?;
        if !value.is_float_value() {
            return Err(Diagnostic::error(
                "format specifier requires a numeric argument",
                arg.span,
            ));
        }
        Ok(value.into_float_value())
    }

    // ============ Expressions ============

    fn codegen_expr(&mut self, expr: &Expr) -> Result<BasicValueEnum<'ctx>, Diagnostic> {
        match &expr.kind {
            ExprKind::Number(value) => Ok(self.context.f64_type().const_float(*value).into()),

            ExprKind::Str(text) => Ok(self.global_string(text).into()),

            ExprKind::Variable(name) => {
                let slot = self
                    .lookup(name)
                    .expect("BUG: unresolved variable reached codegen");
                Ok(self.builder.build_load(slot.ptr, name).unwrap())
            }

            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                let value = self.codegen_expr(operand)?.into_float_value();
                Ok(self.builder.build_float_neg(value, "negtmp").unwrap().into())
            }

            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.codegen_expr(lhs)?.into_float_value();
                let rhs = self.codegen_expr(rhs)?.into_float_value();
                self.codegen_binary(*op, lhs, rhs)
            }
        }
    }

    fn codegen_binary(
        &mut self,
        op: BinaryOp,
        lhs: FloatValue<'ctx>,
        rhs: FloatValue<'ctx>,
    ) -> Result<BasicValueEnum<'ctx>, Diagnostic> {
        let value = match op {
            BinaryOp::Add => self.builder.build_float_add(lhs, rhs, "addtmp").unwrap(),
            BinaryOp::Sub => self.builder.build_float_sub(lhs, rhs, "subtmp").unwrap(),
            BinaryOp::Mul => self.builder.build_float_mul(lhs, rhs, "multmp").unwrap(),
            BinaryOp::Div => self.builder.build_float_div(lhs, rhs, "divtmp").unwrap(),
            BinaryOp::Lt => return Ok(self.widen_comparison(FloatPredicate::OLT, lhs, rhs)),
            BinaryOp::Le => return Ok(self.widen_comparison(FloatPredicate::OLE, lhs, rhs)),
            BinaryOp::Gt => return Ok(self.widen_comparison(FloatPredicate::OGT, lhs, rhs)),
            BinaryOp::Ge => return Ok(self.widen_comparison(FloatPredicate::OGE, lhs, rhs)),
            BinaryOp::Eq => return Ok(self.widen_comparison(FloatPredicate::OEQ, lhs, rhs)),
            BinaryOp::Ne => return Ok(self.widen_comparison(FloatPredicate::ONE, lhs, rhs)),
        };
        Ok(value.into())
    }

    /// Ordered float compare widened back to `double` (1.0/0.0) so every
    /// expression uniformly produces a double.
    fn widen_comparison(
        &self,
        predicate: FloatPredicate,
        lhs: FloatValue<'ctx>,
        rhs: FloatValue<'ctx>,
    ) -> BasicValueEnum<'ctx> {
        let cmp = self
            .builder
            .build_float_compare(predicate, lhs, rhs, "cmptmp")
            .unwrap();
        self.builder
            .build_unsigned_int_to_float(cmp, self.context.f64_type(), "booltmp")
            .unwrap()
            .into()
    }

    // ============ Helpers ============

    fn current_function(&self) -> FunctionValue<'ctx> {
        self.builder
            .get_insert_block()
            .expect("BUG: builder has no insertion point")
            .get_parent()
            .expect("BUG: insertion block is detached from its function")
    }

    /// Stack slots live in the entry block so every use is dominated by the
    /// allocation regardless of control flow.
    fn create_entry_block_alloca(
        &self,
        name: &str,
        ty: BasicTypeEnum<'ctx>,
    ) -> PointerValue<'ctx> {
        let entry = self
            .current_function()
            .get_first_basic_block()
            .expect("BUG: function has no entry block");
        let tmp = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(first) => tmp.position_before(&first),
            None => tmp.position_at_end(entry),
        }
        tmp.build_alloca(ty, name).unwrap()
    }

    fn lookup(&self, name: &str) -> Option<VarSlot<'ctx>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn global_string(&self, text: &str) -> PointerValue<'ctx> {
        self.builder
            .build_global_string_ptr(text, "str")
            .unwrap()
            .as_pointer_value()
    }

    /// Get or declare the external variadic `printf(ptr, ...) -> i32`.
    fn printf(&self) -> FunctionValue<'ctx> {
        self.module.get_function("printf").unwrap_or_else(|| {
            let ptr_type = self.context.i8_type().ptr_type(AddressSpace::default());
            let printf_type = self.context.i32_type().fn_type(&[ptr_type.into()], true);
            self.module
                .add_function("printf", printf_type, Some(Linkage::External))
        })
    }

    /// Coerce a statement value to the uniform `double` shape: ints (printf
    /// results, raw comparisons) are widened, pointers (string values)
    /// contribute 0.0.
    fn as_double(&self, value: BasicValueEnum<'ctx>) -> FloatValue<'ctx> {
        match value {
            BasicValueEnum::FloatValue(v) => v,
            BasicValueEnum::IntValue(v) => self
                .builder
                .build_signed_int_to_float(v, self.context.f64_type(), "int2double")
                .unwrap(),
            _ => self.context.f64_type().const_float(0.0),
        }
    }
}

/// Scan a print format literal and list the argument conversions it demands.
/// `%%` consumes no argument; anything else after `%` must be one of the
/// recognized specifiers.
fn parse_format_specs(text: &str, span: Span) -> Result<Vec<FormatArg>, Diagnostic> {
    let bytes = text.as_bytes();
    let mut specs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        i += 1;
        match bytes.get(i).copied() {
            Some(b'%') => i += 1,
            Some(b'f' | b'g' | b'e') => {
                specs.push(FormatArg::Double);
                i += 1;
            }
            Some(b'd') => {
                specs.push(FormatArg::Int);
                i += 1;
            }
            Some(b's') => {
                specs.push(FormatArg::Str);
                i += 1;
            }
            Some(b'.') => {
                i += 1;
                while matches!(bytes.get(i).copied(), Some(b'0'..=b'9')) {
                    i += 1;
                }
                match bytes.get(i).copied() {
                    Some(b'f' | b'g' | b'e') => {
                        specs.push(FormatArg::Double);
                        i += 1;
                    }
                    _ => {
                        return Err(Diagnostic::error(
                            "invalid format specifier in print format string",
                            span,
                        ))
                    }
                }
            }
            _ => {
                return Err(Diagnostic::error(
                    "invalid format specifier in print format string",
                    span,
                ))
            }
        }
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser, typeck};

    /// Run the whole pipeline on a source snippet and return the IR text,
    /// verifying the module along the way.
    fn compile_ir(source: &str) -> Result<String, Diagnostic> {
        let program = parser::parse(source).expect("parse failed");
        let checked = typeck::check_program(&program).expect("check failed");
        let context = Context::create();
        let mut codegen =
            Codegen::new(&context, "test", "test.k").with_assign_kinds(checked.assign_kinds);
        codegen.compile_program(&program)?;
        codegen.verify().expect("module failed verification");
        Ok(codegen.print_to_string())
    }

    fn compile_ok(source: &str) -> String {
        compile_ir(source).expect("codegen failed")
    }

    #[test]
    fn test_module_shape() {
        let ir = compile_ok("x = 5; print x;");
        assert!(ir.contains("source_filename = \"test.k\""));
        assert!(ir.contains("define i32 @main()"));
        assert!(ir.contains("ret i32 0"));
        assert!(ir.contains("declare i32 @printf(ptr, ...)"));
    }

    #[test]
    fn test_arithmetic_lowering() {
        let ir = compile_ok("x = 1 + 2 * 3 - 4 / 5; print x;");
        assert!(ir.contains("fadd double"));
        assert!(ir.contains("fmul double"));
        assert!(ir.contains("fsub double"));
        assert!(ir.contains("fdiv double"));
    }

    #[test]
    fn test_unary_negation() {
        let ir = compile_ok("x = -3; print x;");
        assert!(ir.contains("fneg double"));
    }

    #[test]
    fn test_comparison_widens_to_double() {
        let ir = compile_ok("x = 1 < 2; print x;");
        assert!(ir.contains("fcmp olt double"));
        assert!(ir.contains("uitofp i1"));
    }

    #[test]
    fn test_variables_load_and_store() {
        let ir = compile_ok("x = 5; y = x * 2; print y;");
        assert!(ir.contains("alloca double"));
        assert!(ir.contains("store double"));
        assert!(ir.contains("load double"));
    }

    #[test]
    fn test_if_produces_phi() {
        let ir = compile_ok("x = 5; if (x > 1) { print x; } else { print 0; }");
        assert!(ir.contains("fcmp ogt double"));
        assert!(ir.contains("br i1"));
        assert!(ir.contains("phi double"));
        assert!(ir.contains("ifcont"));
    }

    #[test]
    fn test_while_block_structure() {
        let ir = compile_ok("mut n = 3; while (n > 0) { n = n - 1; } print n;");
        assert!(ir.contains("loopcond"));
        assert!(ir.contains("afterloop"));
        assert!(ir.contains("fcmp ogt double"));
    }

    #[test]
    fn test_reassignment_reuses_slot() {
        let ir = compile_ok("mut x = 1; x = 2; print x;");
        // One slot, two stores.
        assert_eq!(ir.matches("alloca double").count(), 1);
        assert_eq!(ir.matches("store double").count(), 2);
    }

    #[test]
    fn test_shadowing_allocates_new_slot() {
        let ir = compile_ok("x = 1; { x = 2; print x; } print x;");
        assert_eq!(ir.matches("alloca double").count(), 2);
    }

    #[test]
    fn test_bare_numeric_print_format() {
        let ir = compile_ok("print 42;");
        assert!(ir.contains("%.15f\\0A\\00"));
    }

    #[test]
    fn test_bare_string_print_collapses_percent() {
        let ir = compile_ok(r#"print "100%%\n";"#);
        assert!(ir.contains("100%\\0A\\00"));
        // Emitted through the "%s" call.
        assert!(ir.contains("%s\\00"));
    }

    #[test]
    fn test_formatted_print() {
        let ir = compile_ok(r#"print "pi = %.2f\n", 3.14159;"#);
        assert!(ir.contains("pi = %.2f\\0A\\00"));
        assert!(ir.contains("call i32 (ptr, ...) @printf"));
    }

    #[test]
    fn test_percent_d_truncates() {
        let ir = compile_ok(r#"print "%d\n", 42;"#);
        assert!(ir.contains("fptosi double"));
    }

    #[test]
    fn test_percent_s_takes_literal() {
        let ir = compile_ok(r#"print "%s!\n", "hello";"#);
        assert!(ir.contains("hello\\00"));
    }

    #[test]
    fn test_percent_s_rejects_non_literal() {
        let err = compile_ir(r#"x = 1; print "%s", x;"#).unwrap_err();
        assert!(err
            .message
            .contains("%s format specifier requires string literal argument"));
    }

    #[test]
    fn test_format_arity_mismatch() {
        let err = compile_ir(r#"print "%f %f", 1;"#).unwrap_err();
        assert!(err.message.contains("expects 2 argument(s), but 1 provided"));

        let err = compile_ir(r#"print "no specifiers", 1;"#).unwrap_err();
        assert!(err.message.contains("expects 0 argument(s), but 1 provided"));
    }

    #[test]
    fn test_invalid_specifier() {
        let err = compile_ir(r#"print "%q", 1;"#).unwrap_err();
        assert!(err.message.contains("invalid format specifier"));
    }

    #[test]
    fn test_print_args_require_literal_format() {
        let err = compile_ir("x = 1; print x, 2;").unwrap_err();
        assert!(err
            .message
            .contains("print with arguments requires a string literal format"));
    }

    #[test]
    fn test_string_binding_gets_pointer_slot() {
        let ir = compile_ok(r#"s = "hi"; { s = 1; print s; }"#);
        assert!(ir.contains("alloca ptr"));
        assert!(ir.contains("alloca double"));
    }

    #[test]
    fn test_nested_control_flow_verifies() {
        compile_ok(
            "mut n = 5; mut acc = 0; \
             while (n > 0) { \
               if (n - 2 * (n / 2) == 0) { acc = acc + n; } else { acc = acc - 1; } \
               n = n - 1; \
             } \
             print acc;",
        );
    }

    #[test]
    fn test_format_spec_walker() {
        let span = Span::new(0, 1);
        assert_eq!(
            parse_format_specs("%f %g %e %d %s %.3f %%", span).unwrap(),
            vec![
                FormatArg::Double,
                FormatArg::Double,
                FormatArg::Double,
                FormatArg::Int,
                FormatArg::Str,
                FormatArg::Double,
            ]
        );
        assert!(parse_format_specs("%q", span).is_err());
        assert!(parse_format_specs("%.2d", span).is_err());
        assert!(parse_format_specs("trailing %", span).is_err());
        assert_eq!(parse_format_specs("plain", span).unwrap(), vec![]);
    }
}

//! Recursive-descent parser / evaluator (§4.3). Each grammar production
//! pushes exactly one value onto `state.stack` by the time it returns
//! successfully; binary operators pop two and push one, unary pops one
//! and pushes one, matching the stack discipline the evaluator is
//! specified against.

use brace_lex::{Token, TokenKind};
use brace_registry::Registry;
use brace_util::SourceOffset;
use brace_value::{Operand, Origin, Value};

use crate::attrs::split_variable;
use crate::error::EvalError;
use crate::resolver::{AssignOp, VariableResolver};
use crate::state::EvalState;

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    registry: &'a Registry,
    resolver: &'a mut dyn VariableResolver,
    state: EvalState,
}

impl<'a> Parser<'a> {
    pub fn new(
        tokens: Vec<Token>,
        registry: &'a Registry,
        resolver: &'a mut dyn VariableResolver,
        parse_only: bool,
        group_seq: i64,
        question_seq: i64,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            registry,
            resolver,
            state: EvalState::new(parse_only, group_seq, question_seq),
        }
    }

    pub fn into_state(self) -> EvalState {
        self.state
    }

    /// Parses and evaluates the whole token stream, leaving the final
    /// result as the only entry on the stack (or recording an
    /// [`EvalError::Internal`] if that invariant is somehow violated).
    pub fn run(&mut self) -> Value {
        self.parse_expressions();

        if let Some(tok) = self.peek().cloned() {
            self.state.errors.push(EvalError::syntax(
                format!("unexpected token '{}' after end of expression", tok.lexeme),
                tok.offset,
            ));
        }

        match self.state.stack.len() {
            1 => self.state.stack[0].0.clone(),
            0 => Value::Null,
            _ => {
                let offset = self.end_offset();
                self.state.errors.push(EvalError::internal(
                    format!("stack held {} values after parse, expected 1", self.state.stack.len()),
                    offset,
                ));
                self.state.stack.last().map(|(v, _)| v.clone()).unwrap_or(Value::Null)
            }
        }
    }

    // -- token stream helpers -------------------------------------------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn end_offset(&self) -> SourceOffset {
        self.tokens.last().map(|t| SourceOffset::new(t.offset.get() + t.lexeme.chars().count())).unwrap_or(SourceOffset::ZERO)
    }

    fn push(&mut self, value: Value, origin: Origin) {
        self.state.stack.push((value, origin));
    }

    fn pop(&mut self, offset: SourceOffset) -> Result<(Value, Origin), EvalError> {
        self.state
            .stack
            .pop()
            .ok_or_else(|| EvalError::internal("stack underflow", offset))
    }

    fn origin_of(value: &Value) -> Origin {
        match value {
            Value::Str(_) => Origin::String,
            _ => Origin::Number,
        }
    }

    // -- comma sequencing ------------------------------------------------------

    /// `expressions := expression (',' expression)*`. Evaluates every
    /// comma-separated expression, discarding all but the last value but
    /// recording any errors from every one of them (§7's "accumulate
    /// across comma-separated expressions" policy). Leaves exactly the
    /// last value on the stack.
    fn parse_expressions(&mut self) {
        loop {
            match self.parse_expression() {
                Ok(()) => {}
                Err(err) => {
                    self.state.errors.push(err);
                    self.push(Value::Null, Origin::Word);
                    self.recover_to_next_boundary();
                }
            }

            if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Comma)) {
                // Sequence expression: discard first, keep second.
                let offset = self.peek().map(|t| t.offset).unwrap_or_else(|| self.end_offset());
                if let Err(e) = self.pop(offset) {
                    self.state.errors.push(e);
                }
                self.advance();
                continue;
            }
            break;
        }
    }

    fn recover_to_next_boundary(&mut self) {
        let mut depth = 0i32;
        while let Some(tok) = self.peek() {
            match tok.kind {
                TokenKind::LParen => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::RParen => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                    self.advance();
                }
                TokenKind::Comma if depth == 0 => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // -- grammar ----------------------------------------------------------------

    /// `expression := (variable '=' logicalOr) | logicalOr`
    fn parse_expression(&mut self) -> Result<(), EvalError> {
        if let Some(tok) = self.peek() {
            if matches!(tok.kind, TokenKind::Word | TokenKind::Sgqa) {
                if matches!(self.peek_at(1).map(|t| t.kind), Some(TokenKind::Assign)) {
                    let var_tok = self.advance().expect("peeked");
                    self.advance(); // consume '='
                    self.parse_logical_or()?;
                    let (value, _origin) = self.pop(var_tok.offset)?;
                    return self.assign_variable(&var_tok, value);
                }
            }
        }
        self.parse_logical_or()
    }

    fn assign_variable(&mut self, var_tok: &Token, value: Value) -> Result<(), EvalError> {
        let (root, _attr) = split_variable(&var_tok.lexeme);
        self.state.record_var(&var_tok.lexeme);

        if self.state.parse_only {
            self.push(Value::Num(1.0), Origin::Number);
            return Ok(());
        }

        let read_write = self
            .resolver
            .read(root, Some("readWrite"), Some(&Value::Str("Y".to_string())), self.state.group_seq, self.state.question_seq)
            .map(|v| v.payload() == "Y")
            .unwrap_or(false);

        if !read_write {
            return Err(EvalError::type_error(
                format!("variable '{root}' is not writable"),
                var_tok.offset,
            ));
        }

        let written = self
            .resolver
            .write(AssignOp::Assign, root, value)
            .map_err(|message| EvalError::runtime(message, var_tok.offset))?;
        let origin = Self::origin_of(&written);
        self.push(written, origin);
        Ok(())
    }

    /// `logicalOr := logicalAnd (('||'|'or') logicalAnd)*`
    fn parse_logical_or(&mut self) -> Result<(), EvalError> {
        self.parse_logical_and()?;
        while let Some(offset) = self.match_andor(&["||", "or"]) {
            self.parse_logical_and()?;
            let (right, _) = self.pop(offset)?;
            let (left, _) = self.pop(offset)?;
            let result = brace_value::or(&left, &right);
            self.push(Value::Bool(result), Origin::Word);
        }
        Ok(())
    }

    /// `logicalAnd := equality (('&&'|'and') equality)*`
    fn parse_logical_and(&mut self) -> Result<(), EvalError> {
        self.parse_equality()?;
        while let Some(offset) = self.match_andor(&["&&", "and"]) {
            self.parse_equality()?;
            let (right, _) = self.pop(offset)?;
            let (left, _) = self.pop(offset)?;
            let result = brace_value::and(&left, &right);
            self.push(Value::Bool(result), Origin::Word);
        }
        Ok(())
    }

    /// `equality := relation (('=='|'!='|'eq'|'ne') relation)*`
    fn parse_equality(&mut self) -> Result<(), EvalError> {
        self.parse_relation()?;
        while let Some((op, offset)) = self.match_compare(&["==", "!=", "eq", "ne"]) {
            self.parse_relation()?;
            let (right, right_origin) = self.pop(offset)?;
            let (left, left_origin) = self.pop(offset)?;
            let lo = Operand::new(left, left_origin);
            let ro = Operand::new(right, right_origin);
            let result = if op == "==" || op == "eq" { brace_value::eq(&lo, &ro) } else { brace_value::ne(&lo, &ro) };
            self.push(Value::Bool(result), Origin::Word);
        }
        Ok(())
    }

    /// `relation := additive (('<'|'<='|'>'|'>='|'lt'|'le'|'gt'|'ge') additive)*`
    fn parse_relation(&mut self) -> Result<(), EvalError> {
        self.parse_additive()?;
        while let Some((op, offset)) = self.match_compare(&["<", "<=", ">", ">=", "lt", "le", "gt", "ge"]) {
            self.parse_additive()?;
            let (right, right_origin) = self.pop(offset)?;
            let (left, left_origin) = self.pop(offset)?;
            let lo = Operand::new(left, left_origin);
            let ro = Operand::new(right, right_origin);
            let result = match op.as_str() {
                "<" | "lt" => brace_value::lt(&lo, &ro),
                "<=" | "le" => brace_value::le(&lo, &ro),
                ">" | "gt" => brace_value::gt(&lo, &ro),
                ">=" | "ge" => brace_value::ge(&lo, &ro),
                _ => unreachable!("match_compare only returns the requested lexemes"),
            };
            self.push(Value::Bool(result), Origin::Word);
        }
        Ok(())
    }

    /// `additive := multiplicative (('+'|'-') multiplicative)*`
    fn parse_additive(&mut self) -> Result<(), EvalError> {
        self.parse_multiplicative()?;
        while let Some((op, offset)) = self.match_binop(&["+", "-"]) {
            self.parse_multiplicative()?;
            let (right, right_origin) = self.pop(offset)?;
            let (left, left_origin) = self.pop(offset)?;
            let lo = Operand::new(left, left_origin);
            let ro = Operand::new(right, right_origin);
            let value = if op == "+" { brace_value::add(&lo, &ro) } else { brace_value::sub(&lo, &ro) };
            let origin = Self::origin_of(&value);
            self.push(value, origin);
        }
        Ok(())
    }

    /// `multiplicative := unary (('*'|'/') unary)*`
    fn parse_multiplicative(&mut self) -> Result<(), EvalError> {
        self.parse_unary()?;
        while let Some((op, offset)) = self.match_binop(&["*", "/"]) {
            self.parse_unary()?;
            let (right, right_origin) = self.pop(offset)?;
            let (left, left_origin) = self.pop(offset)?;
            let lo = Operand::new(left, left_origin);
            let ro = Operand::new(right, right_origin);
            let value = if op == "*" { brace_value::mul(&lo, &ro) } else { brace_value::div(&lo, &ro) };
            let origin = Self::origin_of(&value);
            self.push(value, origin);
        }
        Ok(())
    }

    /// `unary := ('+'|'-'|'!')? primary`
    fn parse_unary(&mut self) -> Result<(), EvalError> {
        if let Some(tok) = self.peek() {
            if tok.kind == TokenKind::BinaryOp && (tok.lexeme == "+" || tok.lexeme == "-") {
                let op = tok.lexeme.clone();
                self.advance();
                self.parse_unary()?;
                let (v, _) = self.pop(self.end_offset())?;
                let value = if op == "+" { brace_value::unary_plus(&v) } else { brace_value::unary_minus(&v) };
                self.push(value, Origin::Number);
                return Ok(());
            }
            if tok.kind == TokenKind::Not {
                self.advance();
                self.parse_unary()?;
                let (v, _) = self.pop(self.end_offset())?;
                self.push(Value::Bool(brace_value::not(&v)), Origin::Word);
                return Ok(());
            }
        }
        self.parse_primary()
    }

    /// `primary := '(' expressions ')' | function | variable | literal`
    fn parse_primary(&mut self) -> Result<(), EvalError> {
        let Some(tok) = self.peek().cloned() else {
            return Err(EvalError::syntax("unexpected end of expression", self.end_offset()));
        };

        match tok.kind {
            TokenKind::LParen => {
                self.advance();
                self.parse_expressions();
                self.expect_rparen(tok.offset)
            }
            TokenKind::Number => {
                self.advance();
                let n: f64 = tok.lexeme.parse().unwrap_or(0.0);
                self.push(Value::Num(n), Origin::Number);
                Ok(())
            }
            TokenKind::DqString => {
                self.advance();
                self.push(Value::Str(tok.lexeme.clone()), Origin::DqString);
                Ok(())
            }
            TokenKind::SqString => {
                self.advance();
                self.push(Value::Str(tok.lexeme.clone()), Origin::SqString);
                Ok(())
            }
            TokenKind::Word | TokenKind::Sgqa => {
                if matches!(self.peek_at(1).map(|t| t.kind), Some(TokenKind::LParen)) {
                    self.parse_function_call()
                } else {
                    self.advance();
                    self.read_variable(&tok)
                }
            }
            TokenKind::Other => {
                self.advance();
                Err(EvalError::syntax(format!("unrecognized token '{}'", tok.lexeme), tok.offset))
            }
            _ => {
                self.advance();
                Err(EvalError::syntax(format!("unexpected token '{}'", tok.lexeme), tok.offset))
            }
        }
    }

    fn expect_rparen(&mut self, open_offset: SourceOffset) -> Result<(), EvalError> {
        match self.peek() {
            Some(t) if t.kind == TokenKind::RParen => {
                self.advance();
                Ok(())
            }
            Some(t) => Err(EvalError::syntax(format!("expected ')', found '{}'", t.lexeme), t.offset)),
            None => Err(EvalError::syntax("unbalanced parentheses: missing ')'", open_offset)),
        }
    }

    fn read_variable(&mut self, tok: &Token) -> Result<(), EvalError> {
        let (root, attr) = split_variable(&tok.lexeme);
        self.state.record_var(&tok.lexeme);

        if self.state.parse_only {
            self.push(Value::Num(1.0), Origin::Number);
            return Ok(());
        }

        let relevant = self
            .resolver
            .read(root, Some("relevanceStatus"), Some(&Value::Num(1.0)), self.state.group_seq, self.state.question_seq)
            .map(|v| brace_value::truthy(&v))
            .unwrap_or(true);

        if !relevant && attr.is_none() {
            self.push(Value::Null, Origin::Number);
            return Ok(());
        }

        let value = self
            .resolver
            .read(root, attr, None, self.state.group_seq, self.state.question_seq)
            .map_err(|_| EvalError::syntax(format!("undefined variable '{}'", tok.lexeme), tok.offset))?;

        let origin = if attr.is_some() {
            Self::origin_of(&value)
        } else {
            let onlynum = self
                .resolver
                .read(root, Some("onlynum"), Some(&Value::Bool(false)), self.state.group_seq, self.state.question_seq)
                .map(|v| brace_value::truthy(&v))
                .unwrap_or(false);
            if onlynum { Origin::Number } else { Origin::Word }
        };

        self.push(value, origin);
        Ok(())
    }

    /// `function := WORD '(' [ expression (',' expression)* ] ')'`
    fn parse_function_call(&mut self) -> Result<(), EvalError> {
        let name_tok = self.advance().expect("peeked");
        let open = self.advance().expect("peeked LParen"); // consumes '('

        let mut arg_count = 0usize;
        if !matches!(self.peek().map(|t| t.kind), Some(TokenKind::RParen)) {
            loop {
                self.parse_logical_or()?;
                arg_count += 1;
                if matches!(self.peek().map(|t| t.kind), Some(TokenKind::Comma)) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect_rparen(open.offset)?;

        let mut args = Vec::with_capacity(arg_count);
        for _ in 0..arg_count {
            let (value, _origin) = self.pop(name_tok.offset)?;
            args.push(value);
        }
        args.reverse();

        let symbol = brace_util::Symbol::intern(&name_tok.lexeme);
        let result = self
            .registry
            .dispatch(symbol, &args, self.state.parse_only)
            .map_err(|e| match e {
                brace_registry::RegistryError::UnknownFunction(name) => {
                    EvalError::syntax(format!("undefined function '{name}'"), name_tok.offset)
                }
                brace_registry::RegistryError::Arity { .. } => EvalError::arity(e.to_string(), name_tok.offset),
            })?;

        let origin = Self::origin_of(&result);
        self.push(result, origin);
        Ok(())
    }

    fn match_andor(&mut self, allowed: &[&str]) -> Option<SourceOffset> {
        let tok = self.peek()?;
        if tok.kind == TokenKind::AndOr && allowed.contains(&tok.lexeme.as_str()) {
            let offset = tok.offset;
            self.advance();
            Some(offset)
        } else {
            None
        }
    }

    fn match_compare(&mut self, allowed: &[&str]) -> Option<(String, SourceOffset)> {
        let tok = self.peek()?;
        if tok.kind == TokenKind::Compare && allowed.contains(&tok.lexeme.as_str()) {
            let result = (tok.lexeme.clone(), tok.offset);
            self.advance();
            Some(result)
        } else {
            None
        }
    }

    fn match_binop(&mut self, allowed: &[&str]) -> Option<(String, SourceOffset)> {
        let tok = self.peek()?;
        if tok.kind == TokenKind::BinaryOp && allowed.contains(&tok.lexeme.as_str()) {
            let result = (tok.lexeme.clone(), tok.offset);
            self.advance();
            Some(result)
        } else {
            None
        }
    }
}

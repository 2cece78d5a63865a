//! Stack-based virtual machine for executing bytecode.

use crate::bytecode::chunk::BytecodeProgram;
use crate::bytecode::instruction::OpCode;
use crate::error::VmError;
use crate::numeric::floor_div;

/// Result type for VM operations.
pub type VmResult<T> = Result<T, VmError>;

/// Executes a compiled program one instruction at a time.
///
/// Stack words are untyped `i32`; booleans are 1 and 0.
#[derive(Debug)]
pub struct Vm<'a> {
    program: &'a BytecodeProgram,
    stack: Vec<i32>,
    ip: usize,
    step_limit: Option<u64>,
    steps: u64,
}

impl<'a> Vm<'a> {
    pub fn new(program: &'a BytecodeProgram) -> Self {
        Self {
            program,
            stack: Vec::new(),
            ip: 0,
            step_limit: None,
            steps: 0,
        }
    }

    /// Fault once more than `limit` instructions have run.
    pub fn with_step_limit(mut self, limit: Option<u64>) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn has_next(&self) -> bool {
        self.ip < self.program.code.len()
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    pub fn stack(&self) -> &[i32] {
        &self.stack
    }

    /// Run to the end of the code and return the operand stack.
    pub fn run(mut self) -> VmResult<Vec<i32>> {
        while self.has_next() {
            self.step()?;
        }
        tracing::debug!(steps = self.steps, depth = self.stack.len(), "vm halted");
        Ok(self.stack)
    }

    /// Execute the instruction at `ip`. Does nothing once the code is exhausted.
    pub fn step(&mut self) -> VmResult<()> {
        let Some(byte) = self.program.code.get(self.ip) else {
            return Ok(());
        };
        let op = OpCode::from_u8(byte).ok_or(VmError::UnknownOpcode {
            opcode: byte,
            ip: self.ip,
        })?;

        if let Some(limit) = self.step_limit {
            if self.steps >= limit {
                return Err(VmError::StepLimitExceeded(limit));
            }
        }
        self.steps += 1;

        tracing::trace!(ip = self.ip, %op, stack = ?self.stack, "step");

        let mut next = self.ip + op.length();
        match op {
            OpCode::Noop => {}
            OpCode::LoadI => {
                let address = usize::from(self.operand(op)?);
                let value = self
                    .program
                    .constants
                    .get(address)
                    .ok_or(VmError::BadConstantAddress {
                        address,
                        ip: self.ip,
                    })?;
                self.push(value);
            }
            OpCode::AddI => self.arithmetic(|a, b| a.checked_add(b))?,
            OpCode::SubI => self.arithmetic(|a, b| a.checked_sub(b))?,
            OpCode::MulI => self.arithmetic(|a, b| a.checked_mul(b))?,
            OpCode::DivI => {
                if self.peek()? == 0 {
                    return Err(VmError::DivisionByZero { ip: self.ip });
                }
                self.arithmetic(floor_div)?;
            }
            OpCode::PopI => {
                self.pop()?;
            }
            OpCode::PushBT => self.push(1),
            OpCode::PushBF => self.push(0),
            OpCode::EqI => self.comparison(|a, b| a == b)?,
            OpCode::NeqI => self.comparison(|a, b| a != b)?,
            OpCode::GtI => self.comparison(|a, b| a > b)?,
            OpCode::GteI => self.comparison(|a, b| a >= b)?,
            OpCode::LtI => self.comparison(|a, b| a < b)?,
            OpCode::LteI => self.comparison(|a, b| a <= b)?,
            OpCode::MinusI => {
                let value = self.pop()?;
                let negated = value
                    .checked_neg()
                    .ok_or(VmError::IntegerOverflow { ip: self.ip })?;
                self.push(negated);
            }
            OpCode::BangB => match self.pop()? {
                0 => self.push(1),
                1 => self.push(0),
                value => return Err(VmError::NotABoolean { value, ip: self.ip }),
            },
            OpCode::Jump => next = usize::from(self.operand(op)?),
            OpCode::JumpF => {
                let target = usize::from(self.operand(op)?);
                if self.pop()? == 0 {
                    next = target;
                }
            }
        }

        self.ip = next;
        Ok(())
    }

    fn operand(&self, op: OpCode) -> VmResult<u16> {
        self.program
            .read_u16(self.ip + 1)
            .ok_or(VmError::TruncatedInstruction {
                mnemonic: op.mnemonic(),
                ip: self.ip,
            })
    }

    fn push(&mut self, value: i32) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> VmResult<i32> {
        self.stack
            .pop()
            .ok_or(VmError::StackUnderflow { ip: self.ip })
    }

    fn peek(&self) -> VmResult<i32> {
        self.stack
            .last()
            .copied()
            .ok_or(VmError::StackUnderflow { ip: self.ip })
    }

    fn arithmetic(&mut self, apply: fn(i64, i64) -> Option<i64>) -> VmResult<()> {
        let right = self.pop()?;
        let left = self.pop()?;
        let result = apply(i64::from(left), i64::from(right))
            .and_then(|value| i32::try_from(value).ok())
            .ok_or(VmError::IntegerOverflow { ip: self.ip })?;
        self.push(result);
        Ok(())
    }

    fn comparison(&mut self, compare: fn(i32, i32) -> bool) -> VmResult<()> {
        let right = self.pop()?;
        let left = self.pop()?;
        self.push(i32::from(compare(left, right)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::Compiler;
    use crate::interpreter::{Interpreter, Value};
    use pretty_assertions::assert_eq;

    fn compile(source: &str) -> BytecodeProgram {
        let tokens = crate::lexer::Scanner::new(source).scan_tokens().unwrap();
        let program = crate::parser::Parser::new(tokens).parse().unwrap();
        Compiler::new().compile(&program).unwrap()
    }

    /// Compile `expr` without the trailing POPI so its value stays on the stack.
    fn eval_expression(expr: &str) -> VmResult<Vec<i32>> {
        let mut program = compile(&format!("{expr};"));
        let mut code = program.code.as_bytes().to_vec();
        assert_eq!(code.pop(), Some(OpCode::PopI as u8));
        program.code = crate::bytecode::ByteBuffer::new();
        for byte in code {
            program.code.push_byte(byte);
        }
        Vm::new(&program).run()
    }

    fn raw(code: &[u8]) -> BytecodeProgram {
        let mut program = BytecodeProgram::new();
        for &byte in code {
            program.code.push_byte(byte);
        }
        program
    }

    #[test]
    fn test_statements_leave_empty_stack() {
        assert_eq!(Vm::new(&compile(";23;;46;")).run().unwrap(), Vec::<i32>::new());
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_expression("20/(10-6)").unwrap(), vec![5]);
        assert_eq!(eval_expression("1+2*3").unwrap(), vec![7]);
        assert_eq!(eval_expression("-7/2").unwrap(), vec![-4]);
        assert_eq!(eval_expression("-3").unwrap(), vec![-3]);
    }

    #[test]
    fn test_booleans_are_words() {
        assert_eq!(eval_expression("!(2<=4)").unwrap(), vec![0]);
        assert_eq!(eval_expression("true").unwrap(), vec![1]);
        assert_eq!(eval_expression("3 != 4").unwrap(), vec![1]);
        assert_eq!(eval_expression("true == false").unwrap(), vec![0]);
    }

    #[test]
    fn test_step_and_has_next() {
        let program = compile("1;");
        let mut vm = Vm::new(&program);
        assert!(vm.has_next());
        vm.step().unwrap();
        assert_eq!(vm.stack(), &[1]);
        assert_eq!(vm.ip(), 3);
        vm.step().unwrap();
        assert!(!vm.has_next());
        assert_eq!(vm.stack(), &[] as &[i32]);
    }

    #[test]
    fn test_if_branches() {
        let program = compile("if (2+3>5) {10;} else {20;}");
        let mut vm = Vm::new(&program);
        let mut seen = Vec::new();
        while vm.has_next() {
            vm.step().unwrap();
            seen.extend(vm.stack().last().copied());
        }
        assert!(seen.contains(&20));
        assert!(!seen.contains(&10));
    }

    #[test]
    fn test_faults() {
        assert_eq!(
            eval_expression("1/0"),
            Err(VmError::DivisionByZero { ip: 6 })
        );
        assert_eq!(
            eval_expression("2147483647+1"),
            Err(VmError::IntegerOverflow { ip: 6 })
        );
        assert_eq!(
            eval_expression("!3"),
            Err(VmError::NotABoolean { value: 3, ip: 3 })
        );
        assert_eq!(
            Vm::new(&raw(&[OpCode::PopI as u8])).run(),
            Err(VmError::StackUnderflow { ip: 0 })
        );
        assert_eq!(
            Vm::new(&raw(&[0xEE])).run(),
            Err(VmError::UnknownOpcode { opcode: 0xEE, ip: 0 })
        );
        assert_eq!(
            Vm::new(&raw(&[OpCode::LoadI as u8, 0])).run(),
            Err(VmError::TruncatedInstruction {
                mnemonic: "LOADI",
                ip: 0
            })
        );
        assert_eq!(
            Vm::new(&raw(&[OpCode::LoadI as u8, 0, 8])).run(),
            Err(VmError::BadConstantAddress { address: 8, ip: 0 })
        );
    }

    #[test]
    fn test_step_limit() {
        // JUMP 0 forever.
        let program = raw(&[OpCode::Jump as u8, 0, 0]);
        assert_eq!(
            Vm::new(&program).with_step_limit(Some(50)).run(),
            Err(VmError::StepLimitExceeded(50))
        );
    }

    #[test]
    fn test_matches_evaluator() {
        for expr in [
            "1+2*3",
            "(1+2)*3",
            "50/20",
            "-9/4",
            "10-3-2",
            "1+2+3+4==4+3+2+1",
            "!false==true",
            "2>=2",
            "5<3",
            "-(4*-2)",
        ] {
            let tokens = crate::lexer::Scanner::new(&format!("{expr};"))
                .scan_tokens()
                .unwrap();
            let program = crate::parser::Parser::new(tokens).parse().unwrap();
            let expected = match Interpreter::with_output(Vec::new())
                .interpret(&program)
                .unwrap()
            {
                Value::Int(n) => n as i32,
                Value::Bool(b) => i32::from(b),
                other => panic!("unexpected value {other}"),
            };
            assert_eq!(eval_expression(expr).unwrap(), vec![expected], "{expr}");
        }
    }
}

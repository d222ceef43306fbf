use super::kind::{
    Argument, CallArg, Command, ObjectArg, ProgrammableMoveCall, ProgrammableTransaction,
    TransactionKind,
};
use super::TxError;
use crate::schema::{self, ObjectId};
use serde::Serialize;

/// Accumulates inputs and commands for one programmable transaction.
///
/// Object inputs are de-duplicated by id (a transaction may reference an
/// object only once); pure inputs never are.
#[derive(Debug, Default)]
pub struct ProgrammableTransactionBuilder {
    inputs: Vec<CallArg>,
    commands: Vec<Command>,
}

impl ProgrammableTransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a BCS-encoded pure value as a new input.
    pub fn pure<T: Serialize>(&mut self, value: &T) -> Result<Argument, TxError> {
        let bytes = schema::encode(value)?;
        self.push_input(CallArg::Pure(bytes))
    }

    /// Adds an object input, or returns the existing input for the same id.
    ///
    /// Two shared references to one object merge into a single input that
    /// is mutable if either was.
    pub fn object(&mut self, arg: ObjectArg) -> Result<Argument, TxError> {
        let id = arg.id();
        let existing = self.inputs.iter().position(|input| match input {
            CallArg::Object(obj) => obj.id() == id,
            CallArg::Pure(_) => false,
        });

        let Some(index) = existing else {
            return self.push_input(CallArg::Object(arg));
        };

        match (&mut self.inputs[index], arg) {
            (
                CallArg::Object(ObjectArg::SharedObject { mutable, .. }),
                ObjectArg::SharedObject {
                    mutable: wanted, ..
                },
            ) => *mutable |= wanted,
            (CallArg::Object(current), requested) if *current == requested => {}
            _ => return Err(TxError::ConflictingObjectArg(id)),
        }
        Ok(Argument::Input(index_u16(index)?))
    }

    pub fn clock(&mut self) -> Result<Argument, TxError> {
        self.object(ObjectArg::CLOCK)
    }

    /// Appends a Move call and returns its (whole) result.
    pub fn move_call(
        &mut self,
        package: ObjectId,
        module: &str,
        function: &str,
        arguments: Vec<Argument>,
    ) -> Result<Argument, TxError> {
        self.push_command(Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_arguments: Vec::new(),
            arguments,
        })))
    }

    pub fn transfer_objects(
        &mut self,
        objects: Vec<Argument>,
        recipient: Argument,
    ) -> Result<(), TxError> {
        self.push_command(Command::TransferObjects(objects, recipient))?;
        Ok(())
    }

    pub fn finish(self) -> TransactionKind {
        TransactionKind::ProgrammableTransaction(ProgrammableTransaction {
            inputs: self.inputs,
            commands: self.commands,
        })
    }

    fn push_input(&mut self, input: CallArg) -> Result<Argument, TxError> {
        let index = index_u16(self.inputs.len())?;
        self.inputs.push(input);
        Ok(Argument::Input(index))
    }

    fn push_command(&mut self, command: Command) -> Result<Argument, TxError> {
        let index = index_u16(self.commands.len())?;
        self.commands.push(command);
        Ok(Argument::Result(index))
    }
}

fn index_u16(index: usize) -> Result<u16, TxError> {
    u16::try_from(index).map_err(|_| TxError::TooManyArguments)
}

/// The `i`-th value of a call returning a tuple.
pub fn nested(result: Argument, i: u16) -> Argument {
    match result {
        Argument::Result(cmd) => Argument::NestedResult(cmd, i),
        other => other,
    }
}

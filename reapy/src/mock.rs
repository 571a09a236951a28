//! Scripted host for unit tests.
use crate::{
    errors::{ReapyError, ReapyResult},
    Call, Host, Value,
};
use std::{cell::RefCell, collections::VecDeque};

#[derive(Debug)]
enum Reply {
    Value(Value),
    Error(String),
}

/// Records every call and answers with queued values.
///
/// When the queue is empty, answers with the fallback value, or with
/// [Value::Unit] if none set.
#[derive(Debug, Default)]
pub struct MockHost {
    calls: RefCell<Vec<Call>>,
    replies: RefCell<VecDeque<Reply>>,
    fallback: RefCell<Option<Value>>,
}
impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_value(&self, value: Value) {
        self.replies.borrow_mut().push_back(Reply::Value(value));
    }

    pub fn push_values(&self, values: impl IntoIterator<Item = Value>) {
        for value in values {
            self.push_value(value);
        }
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.replies
            .borrow_mut()
            .push_back(Reply::Error(message.into()));
    }

    pub fn set_fallback(&self, value: Value) {
        *self.fallback.borrow_mut() = Some(value);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn last_call(&self) -> Option<Call> {
        self.calls.borrow().last().cloned()
    }
}
impl Host for MockHost {
    fn call(&self, call: Call) -> ReapyResult<Value> {
        self.calls.borrow_mut().push(call);
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Value(value)) => Ok(value),
            Some(Reply::Error(message)) => Err(ReapyError::Host(message)),
            None => Ok(self.fallback.borrow().clone().unwrap_or(Value::Unit)),
        }
    }
}

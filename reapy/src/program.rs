//! Batched host calls.
//!
//! Listing the tracks of a project costs one call for the count and one
//! call per track. Inside REAPER that is cheap, but from a distant client
//! every call is a socket round trip. [Program] describes such sequences
//! as data, so the whole batch travels to the host once and only the
//! results come back.
//!
//! ```no_run
//! # use reapy::{Call, Host, Program, ProjectId, Step};
//! # fn f(host: &dyn Host, project: ProjectId) -> reapy::errors::ReapyResult<()> {
//! let mut program = Program::new();
//! let tracks = program.push(Step::Collect {
//!     count: Call::CountTracks { project },
//!     each: Call::GetTrack { project, index: 0 },
//! });
//! let mut output = host.run(&program)?;
//! let tracks = output.take(tracks)?.into_list()?;
//! # Ok(())
//! # }
//! ```
use crate::{
    errors::{ReapyError, ReapyResult},
    Call, Host, Value,
};
use log::{debug, warn};
use serde_derive::{Deserialize, Serialize};

/// Hard stop for [Step::CollectUntilEnd] without an explicit limit.
pub const DEFAULT_COLLECT_LIMIT: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    Call(Call),
    /// Evaluate `count`, then `each` for every index in `0..count`.
    ///
    /// `count` may return an int, or an output tuple whose first element
    /// is the count.
    Collect { count: Call, each: Call },
    /// Evaluate `each` for `0, 1, ...` until it returns an end value
    /// (see [Value::is_end]). The end value is not included.
    CollectUntilEnd { each: Call, limit: Option<usize> },
}

/// Position of a step result in [ProgramOutput].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output(usize);
impl Output {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    steps: Vec<Step>,
}
impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step and get the handle to its result.
    pub fn push(&mut self, step: Step) -> Output {
        self.steps.push(step);
        Output(self.steps.len() - 1)
    }

    /// Append a single call.
    pub fn call(&mut self, call: Call) -> Output {
        self.push(Step::Call(call))
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step against the host, one call at a time.
    ///
    /// The first failing call aborts the program.
    pub fn execute<H: Host + ?Sized>(
        &self,
        host: &H,
    ) -> ReapyResult<ProgramOutput> {
        debug!("execute program of {} steps", self.steps.len());
        let mut values = Vec::with_capacity(self.steps.len());
        for step in self.steps.iter() {
            let value = match step {
                Step::Call(call) => host.call(call.clone())?,
                Step::Collect { count, each } => {
                    let n = match host.call(count.clone())? {
                        Value::List(list) => match list.into_iter().next() {
                            Some(first) => first.into_int()?,
                            None => 0,
                        },
                        other => other.into_int()?,
                    };
                    let mut collected = Vec::with_capacity(n.max(0) as usize);
                    for index in 0..n {
                        collected.push(host.call(each.at_index(index)?)?);
                    }
                    Value::List(collected)
                }
                Step::CollectUntilEnd { each, limit } => {
                    let limit = limit.unwrap_or(DEFAULT_COLLECT_LIMIT);
                    let mut collected = Vec::new();
                    let mut ended = false;
                    for index in 0..limit {
                        let value = host.call(each.at_index(index as i32)?)?;
                        if value.is_end() {
                            ended = true;
                            break;
                        }
                        collected.push(value);
                    }
                    if !ended {
                        warn!(
                            "{} stopped at limit {}, output may be truncated",
                            each, limit
                        );
                    }
                    Value::List(collected)
                }
            };
            values.push(value);
        }
        Ok(ProgramOutput { values })
    }
}

/// Results of [Program] steps, in step order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgramOutput {
    values: Vec<Value>,
}
impl ProgramOutput {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, output: Output) -> ReapyResult<&Value> {
        self.values
            .get(output.0)
            .ok_or(ReapyError::OutputMissing(output.0))
    }

    /// Move the value out, leaving [Value::Unit] in its place.
    pub fn take(&mut self, output: Output) -> ReapyResult<Value> {
        let slot = self
            .values
            .get_mut(output.0)
            .ok_or(ReapyError::OutputMissing(output.0))?;
        Ok(std::mem::replace(slot, Value::Unit))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

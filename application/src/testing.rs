//! Test doubles shared by the application tests.

use crate::ports::agent::{Agent, AgentError};
use crate::ports::observability::{ObservabilitySink, ResilienceEvent, ResilienceEventKind};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type Step = (Duration, Result<String, AgentError>);

/// Agent that replays a script of (delay, result) steps.
///
/// Once the script is exhausted it answers with `default_reply`.
pub(crate) struct ScriptedAgent {
    name: String,
    script: Mutex<VecDeque<Step>>,
    default_reply: String,
    inputs: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(VecDeque::new()),
            default_reply: format!("{name} done"),
            inputs: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn replying(name: &str, reply: &str) -> Self {
        let mut agent = Self::new(name);
        agent.default_reply = reply.to_string();
        agent
    }

    pub fn then_ok(self, reply: &str) -> Self {
        self.push(Duration::ZERO, Ok(reply.to_string()))
    }

    pub fn then_err(self, error: AgentError) -> Self {
        self.push(Duration::ZERO, Err(error))
    }

    pub fn then_delayed(self, delay: Duration, reply: &str) -> Self {
        self.push(delay, Ok(reply.to_string()))
    }

    pub fn then_delayed_err(self, delay: Duration, error: AgentError) -> Self {
        self.push(delay, Err(error))
    }

    fn push(self, delay: Duration, result: Result<String, AgentError>) -> Self {
        self.script.lock().unwrap().push_back((delay, result));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(input.to_string());
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some((delay, result)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                result
            }
            None => Ok(self.default_reply.clone()),
        }
    }
}

/// Agent computing its output with a closure, after an optional delay.
pub(crate) struct FnAgent<F> {
    name: String,
    delay: Duration,
    f: F,
}

impl<F> FnAgent<F>
where
    F: Fn(&str) -> Result<String, AgentError> + Send + Sync,
{
    pub fn new(name: &str, f: F) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            f,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl<F> Agent for FnAgent<F>
where
    F: Fn(&str) -> Result<String, AgentError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.f)(input)
    }
}

/// Sink keeping every event in memory.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<ResilienceEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<ResilienceEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<ResilienceEventKind> {
        self.events().into_iter().map(|e| e.kind).collect()
    }
}

impl ObservabilitySink for RecordingSink {
    fn record(&self, event: ResilienceEvent) {
        self.events.lock().unwrap().push(event);
    }
}

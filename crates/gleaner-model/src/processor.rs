//! The processor capability and the context-aware function adapter.

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Result;
use crate::value::Value;

/// A transformation unit used in input and output pipelines.
///
/// Processors are stateless apart from construction-time parameters. Every
/// call receives the loader context; processors that have no use for it
/// simply ignore it. Errors propagate to the caller untouched.
pub trait Processor: Send + Sync + fmt::Debug {
    /// Transform a value (or a batch held in a `Value::List`).
    fn process(&self, value: Value, context: &Context) -> Result<Value>;
}

/// Shared handle to a processor.
pub type ProcessorRef = Arc<dyn Processor>;

/// Conversion of concrete processors into [`ProcessorRef`] handles.
pub trait ProcessorExt: Processor + Sized + 'static {
    fn shared(self) -> ProcessorRef {
        Arc::new(self)
    }
}

impl<P: Processor + Sized + 'static> ProcessorExt for P {}

impl<P: Processor + ?Sized> Processor for Arc<P> {
    fn process(&self, value: Value, context: &Context) -> Result<Value> {
        (**self).process(value, context)
    }
}

impl<P: Processor + ?Sized> Processor for Box<P> {
    fn process(&self, value: Value, context: &Context) -> Result<Value> {
        (**self).process(value, context)
    }
}

type PlainFn = dyn Fn(Value) -> Result<Value> + Send + Sync;
type ContextFn = dyn Fn(Value, &Context) -> Result<Value> + Send + Sync;

enum Callable {
    Plain(Box<PlainFn>),
    WithContext(Box<ContextFn>),
}

/// Adapts a closure into a [`Processor`].
///
/// A closure built with [`FnProcessor::with_context`] declares that it takes
/// the context and is called as `f(value, context)`; one built with
/// [`FnProcessor::new`] is called as `f(value)`.
pub struct FnProcessor {
    name: String,
    callable: Callable,
}

impl FnProcessor {
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callable: Callable::Plain(Box::new(f)),
        }
    }

    pub fn with_context<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Value, &Context) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            callable: Callable::WithContext(Box::new(f)),
        }
    }

    /// Whether the wrapped function receives the context.
    pub fn accepts_context(&self) -> bool {
        matches!(self.callable, Callable::WithContext(_))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for FnProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnProcessor")
            .field("name", &self.name)
            .field("accepts_context", &self.accepts_context())
            .finish()
    }
}

impl Processor for FnProcessor {
    fn process(&self, value: Value, context: &Context) -> Result<Value> {
        match &self.callable {
            Callable::Plain(f) => f(value),
            Callable::WithContext(f) => f(value, context),
        }
    }
}

/// Shorthand for a plain, context-free function processor.
pub fn from_fn<F>(name: impl Into<String>, f: F) -> ProcessorRef
where
    F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(FnProcessor::new(name, f))
}

/// Shorthand for a context-aware function processor.
pub fn from_fn_with_context<F>(name: impl Into<String>, f: F) -> ProcessorRef
where
    F: Fn(Value, &Context) -> Result<Value> + Send + Sync + 'static,
{
    Arc::new(FnProcessor::with_context(name, f))
}

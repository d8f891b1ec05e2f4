//! Adapter from one foreign callable to the four call shapes.
//!
//! # Design Decisions
//! - The callable is stored once; the shape is chosen per call
//! - Arguments and results are JSON values, the lingua franca with scripts
//! - Void shapes still run the callable and drop its result

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("Script function failed: {0}")]
    Failed(String),
}

/// A function value owned by the scripting engine.
pub trait ForeignCallable: Send + Sync {
    fn execute(&self, args: &[Value]) -> Result<Value, BridgeError>;
}

impl<F> ForeignCallable for F
where
    F: Fn(&[Value]) -> Result<Value, BridgeError> + Send + Sync,
{
    fn execute(&self, args: &[Value]) -> Result<Value, BridgeError> {
        self(args)
    }
}

/// How the caller wants to invoke the callable.
#[derive(Debug, Clone, PartialEq)]
pub enum CallShape {
    /// No argument, value returned.
    Supplier,
    /// One argument, value returned.
    Function(Value),
    /// One argument, nothing returned.
    Consumer(Value),
    /// No argument, nothing returned.
    Runnable,
}

#[derive(Clone)]
pub struct AsyncBridge {
    value: Arc<dyn ForeignCallable>,
}

impl fmt::Debug for AsyncBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncBridge").finish_non_exhaustive()
    }
}

pub type Supplier = Box<dyn Fn() -> Result<Value, BridgeError> + Send + Sync>;
pub type Function = Box<dyn Fn(Value) -> Result<Value, BridgeError> + Send + Sync>;
pub type Consumer = Box<dyn Fn(Value) -> Result<(), BridgeError> + Send + Sync>;
pub type Runnable = Box<dyn Fn() -> Result<(), BridgeError> + Send + Sync>;

impl AsyncBridge {
    pub fn of(value: impl ForeignCallable + 'static) -> Self {
        Self {
            value: Arc::new(value),
        }
    }

    pub fn from_arc(value: Arc<dyn ForeignCallable>) -> Self {
        Self { value }
    }

    /// Invoke the callable in the given shape.
    ///
    /// Value-producing shapes return `Some`, void shapes `None`.
    pub fn call(&self, shape: CallShape) -> Result<Option<Value>, BridgeError> {
        let result = match shape {
            CallShape::Supplier => self.value.execute(&[]).map(Some),
            CallShape::Function(arg) => self.value.execute(&[arg]).map(Some),
            CallShape::Consumer(arg) => self.value.execute(&[arg]).map(|_| None),
            CallShape::Runnable => self.value.execute(&[]).map(|_| None),
        };
        if let Err(e) = &result {
            tracing::debug!(error = %e, "Script callable failed");
        }
        result
    }

    pub fn get(&self) -> Result<Value, BridgeError> {
        self.call(CallShape::Supplier).map(Option::unwrap_or_default)
    }

    pub fn apply(&self, arg: Value) -> Result<Value, BridgeError> {
        self.call(CallShape::Function(arg)).map(Option::unwrap_or_default)
    }

    pub fn accept(&self, arg: Value) -> Result<(), BridgeError> {
        self.call(CallShape::Consumer(arg)).map(drop)
    }

    pub fn run(&self) -> Result<(), BridgeError> {
        self.call(CallShape::Runnable).map(drop)
    }

    pub fn into_supplier(self) -> Supplier {
        Box::new(move || self.get())
    }

    pub fn into_function(self) -> Function {
        Box::new(move |arg| self.apply(arg))
    }

    pub fn into_consumer(self) -> Consumer {
        Box::new(move |arg| self.accept(arg))
    }

    pub fn into_runnable(self) -> Runnable {
        Box::new(move || self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every argument list it is called with.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<Vec<Value>>>,
    }

    impl ForeignCallable for Recorder {
        fn execute(&self, args: &[Value]) -> Result<Value, BridgeError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(args.to_vec());
            Ok(json!(calls.len()))
        }
    }

    #[test]
    fn test_every_shape_reaches_the_same_callable() {
        let recorder = Arc::new(Recorder::default());
        let bridge = AsyncBridge::from_arc(recorder.clone());

        assert_eq!(bridge.call(CallShape::Supplier).unwrap(), Some(json!(1)));
        assert_eq!(bridge.call(CallShape::Function(json!("x"))).unwrap(), Some(json!(2)));
        assert_eq!(bridge.call(CallShape::Consumer(json!({"k": 1}))).unwrap(), None);
        assert_eq!(bridge.call(CallShape::Runnable).unwrap(), None);

        let calls = recorder.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![vec![], vec![json!("x")], vec![json!({"k": 1})], vec![]]
        );
    }

    #[test]
    fn test_adapters_are_reusable() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let bridge = AsyncBridge::of(move |args: &[Value]| -> Result<Value, BridgeError> {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(args.first().cloned().unwrap_or(json!("none")))
        });

        let supplier = bridge.clone().into_supplier();
        let function = bridge.clone().into_function();
        let consumer = bridge.clone().into_consumer();
        let runnable = bridge.into_runnable();

        assert_eq!(supplier().unwrap(), json!("none"));
        assert_eq!(supplier().unwrap(), json!("none"));
        assert_eq!(function(json!(7)).unwrap(), json!(7));
        consumer(json!(1)).unwrap();
        runnable().unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_failures_propagate() {
        let bridge = AsyncBridge::of(|_: &[Value]| -> Result<Value, BridgeError> {
            Err(BridgeError::Failed("boom".into()))
        });
        assert_eq!(bridge.get(), Err(BridgeError::Failed("boom".into())));
        assert!(bridge.run().is_err());
    }

    #[test]
    fn test_bridge_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AsyncBridge>();
    }
}

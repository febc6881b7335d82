use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::{json, Value};

use super::event::Event;
use super::store::Store;
use super::subscription::Subscription;
use super::Unit;

type Handler = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, Value>> + Send + Sync>;

/// Units derived from an effect, addressed by their dotted sub-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectSubKey {
    Done,
    DoneData,
    Fail,
    FailData,
    Finally,
    Pending,
    InFlight,
}

impl EffectSubKey {
    pub const ALL: [EffectSubKey; 7] = [
        EffectSubKey::Done,
        EffectSubKey::DoneData,
        EffectSubKey::Fail,
        EffectSubKey::FailData,
        EffectSubKey::Finally,
        EffectSubKey::Pending,
        EffectSubKey::InFlight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectSubKey::Done => "done",
            EffectSubKey::DoneData => "doneData",
            EffectSubKey::Fail => "fail",
            EffectSubKey::FailData => "failData",
            EffectSubKey::Finally => "finally",
            EffectSubKey::Pending => "pending",
            EffectSubKey::InFlight => "inFlight",
        }
    }
}

/// An async operation exposed as a unit.
///
/// Calling the effect emits the params on its own stream, then reports the
/// outcome through the derived events. `pending` and `in_flight` track
/// running calls.
#[derive(Clone)]
pub struct Effect {
    inner: Arc<EffectInner>,
}

struct EffectInner {
    handler: Handler,
    invocations: Event,
    done: Event,
    done_data: Event,
    fail: Event,
    fail_data: Event,
    finally: Event,
    pending: Store,
    in_flight: Store,
}

impl Effect {
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, Value>> + Send + 'static,
    {
        let handler: Handler = Arc::new(move |params| handler(params).boxed());
        Self {
            inner: Arc::new(EffectInner {
                handler,
                invocations: Event::new(),
                done: Event::new(),
                done_data: Event::new(),
                fail: Event::new(),
                fail_data: Event::new(),
                finally: Event::new(),
                pending: Store::new(false),
                in_flight: Store::new(0),
            }),
        }
    }

    pub async fn call(&self, params: impl Into<Value>) -> Result<Value, Value> {
        let inner = &self.inner;
        let params = params.into();

        inner.invocations.emit(params.clone());
        let running_call = RunningCall::start(inner);
        let outcome = (inner.handler)(params.clone()).await;
        drop(running_call);

        match &outcome {
            Ok(result) => {
                inner.finally.emit(json!({
                    "status": "done",
                    "params": params,
                    "result": result,
                }));
                inner.done.emit(json!({ "params": params, "result": result }));
                inner.done_data.emit(result.clone());
            }
            Err(error) => {
                inner.finally.emit(json!({
                    "status": "fail",
                    "params": params,
                    "error": error,
                }));
                inner.fail.emit(json!({ "params": params, "error": error }));
                inner.fail_data.emit(error.clone());
            }
        }
        outcome
    }

    /// Watches invocations; the callback receives the call params.
    pub fn watch(&self, f: impl Fn(&Value) + Send + Sync + 'static) -> Subscription {
        self.inner.invocations.watch(f)
    }

    pub fn done(&self) -> &Event {
        &self.inner.done
    }

    pub fn done_data(&self) -> &Event {
        &self.inner.done_data
    }

    pub fn fail(&self) -> &Event {
        &self.inner.fail
    }

    pub fn fail_data(&self) -> &Event {
        &self.inner.fail_data
    }

    pub fn finally(&self) -> &Event {
        &self.inner.finally
    }

    pub fn pending(&self) -> &Store {
        &self.inner.pending
    }

    pub fn in_flight(&self) -> &Store {
        &self.inner.in_flight
    }

    pub fn derived(&self, key: EffectSubKey) -> Unit {
        match key {
            EffectSubKey::Done => Unit::Event(self.inner.done.clone()),
            EffectSubKey::DoneData => Unit::Event(self.inner.done_data.clone()),
            EffectSubKey::Fail => Unit::Event(self.inner.fail.clone()),
            EffectSubKey::FailData => Unit::Event(self.inner.fail_data.clone()),
            EffectSubKey::Finally => Unit::Event(self.inner.finally.clone()),
            EffectSubKey::Pending => Unit::Store(self.inner.pending.clone()),
            EffectSubKey::InFlight => Unit::Store(self.inner.in_flight.clone()),
        }
    }
}

impl EffectInner {
    fn sync_pending(&self) {
        let busy = Value::Bool(running(&self.in_flight.get_state()) > 0);
        if self.pending.get_state() != busy {
            self.pending.set_state(busy);
        }
    }
}

/// Counts one call in `in_flight` for as long as it lives. Dropping it
/// settles the counter even when the call future is cancelled or the
/// handler panics.
struct RunningCall<'a> {
    inner: &'a EffectInner,
}

impl<'a> RunningCall<'a> {
    fn start(inner: &'a EffectInner) -> Self {
        inner.in_flight.update(|n| Value::from(running(n) + 1));
        inner.sync_pending();
        Self { inner }
    }
}

impl Drop for RunningCall<'_> {
    fn drop(&mut self) {
        self.inner
            .in_flight
            .update(|n| Value::from(running(n).saturating_sub(1)));
        self.inner.sync_pending();
    }
}

fn running(count: &Value) -> u64 {
    count.as_u64().unwrap_or(0)
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("pending", &self.inner.pending.get_state())
            .field("in_flight", &self.inner.in_flight.get_state())
            .finish()
    }
}

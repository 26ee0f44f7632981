//! Mapping observability boundary.
//!
//! Engine logic MUST NOT depend on a concrete sink. All instrumentation
//! flows through [`MappingEvent`] and [`MappingSink`]; the default sink
//! drops everything. This module is the only bridge between traversal
//! logic and whatever telemetry the surrounding pipeline installs.

use std::cell::RefCell;

thread_local! {
    static SINK: RefCell<Option<Box<dyn MappingSink>>> = const { RefCell::new(None) };
}

///
/// MappingEvent
///

#[derive(Clone, Copy, Debug)]
pub enum MappingEvent<'a> {
    ValueExtracted { target: &'a str, path: &'a str },
    ValueInjected { target: &'a str, path: &'a str },
    MappingFailed {
        target: &'a str,
        path: &'a str,
        /// True for engine/model defects, false for user-triggerable
        /// failures; diagnostics keep the two apart.
        internal: bool,
    },
}

///
/// MappingSink
///

pub trait MappingSink {
    fn record(&self, event: &MappingEvent<'_>);
}

/// Install a sink for the current thread; `None` restores the no-op
/// default. Document processing is single-threaded, so a thread-local
/// sink covers one pipeline.
pub fn set_sink(sink: Option<Box<dyn MappingSink>>) {
    SINK.with(|cell| *cell.borrow_mut() = sink);
}

pub(crate) fn emit(event: &MappingEvent<'_>) {
    SINK.with(|cell| {
        if let Some(sink) = cell.borrow().as_ref() {
            sink.record(event);
        }
    });
}

///
/// TESTS
///

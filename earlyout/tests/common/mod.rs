//! Common test utilities and macros

#![allow(dead_code)]

use earlyout::{Carrier, ErrorCode, invoke};
use std::cell::RefCell;
use std::rc::Rc;

/// Ordered record of constructions, drops and markers.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.0.borrow_mut().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|event| event.starts_with(prefix))
            .count()
    }

    /// A resource that logs its construction now and its drop later.
    pub fn tracked(&self, name: &'static str) -> Tracked {
        self.record(format!("new {name}"));
        Tracked {
            name,
            journal: self.clone(),
        }
    }
}

pub struct Tracked {
    name: &'static str,
    journal: Journal,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.journal.record(format!("drop {}", self.name));
    }
}

pub fn leaf_value(value: u64) -> Carrier<u64> {
    invoke("leaf_value", move |frame| frame.finish(value))
}

pub fn leaf_error(code: u64) -> Carrier<u64> {
    invoke("leaf_error", move |frame| frame.fail(ErrorCode::new(code)))
}

/// Consumes a carrier and compares it with an expected standard result.
#[macro_export]
macro_rules! check_carrier {
    ($test_name:ident, carrier=$carrier:expr, result=$expected:expr) => {
        #[test]
        fn $test_name() {
            let carrier = $carrier;
            let expected: Result<_, earlyout::ErrorCode> = $expected;
            assert_eq!(carrier.is_ok(), expected.is_ok());
            assert_eq!(carrier.into_result(), expected);
        }
    };
}

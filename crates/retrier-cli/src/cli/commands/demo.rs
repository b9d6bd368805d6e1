//! `retrier demo` – hand-rolled retry loops next to declarative policies,
//! run against a scripted flaky operation.

use anyhow::Result;
use retrier_core::net::{self, NetStatus, ProbeError};
use retrier_core::policy::Policy;
use retrier_core::schedule::Schedule;
use std::time::Duration;

/// Scripted flaky operation: fails with a timeout `failures` times, then
/// succeeds. `None` means it never succeeds.
struct FlakyOp {
    failures: Option<u32>,
    calls: u32,
}

impl FlakyOp {
    fn new(failures: Option<u32>) -> Self {
        Self { failures, calls: 0 }
    }

    fn call(&mut self) -> Result<u32, ProbeError> {
        self.calls += 1;
        match self.failures {
            Some(n) if self.calls > n => Ok(self.calls),
            _ => Err(ProbeError::Net(NetStatus::Timeout)),
        }
    }
}

pub fn run_demo(fail: Option<u32>, fast: bool) -> Result<()> {
    demo_budget_loop(fail);
    demo_counting_loop(fail);
    demo_retry(fail);
    demo_wait_and_retry(fail, fast);
    Ok(())
}

/// Baseline 1: retry budget counted down by hand inside a bare loop.
fn demo_budget_loop(fail: Option<u32>) {
    println!("== manual retry, budget countdown ==");
    let mut op = FlakyOp::new(fail);
    let mut budget = 3;
    loop {
        match op.call() {
            Ok(calls) => {
                println!("succeeded on call {calls}");
                return;
            }
            Err(err) if budget > 0 => {
                budget -= 1;
                println!("operation failed ({err}), retrying");
            }
            Err(err) => {
                println!("still failing, giving up: {err}");
                return;
            }
        }
    }
}

/// Baseline 2: while-style loop counting tries upward.
fn demo_counting_loop(fail: Option<u32>) {
    println!("== manual retry, counting loop ==");
    let mut op = FlakyOp::new(fail);
    let mut tries = 1;
    while tries <= 3 {
        match op.call() {
            Ok(calls) => {
                println!("succeeded on call {calls}");
                return;
            }
            Err(err) => {
                println!("operation failed ({err}), try {tries} of 3");
                tries += 1;
            }
        }
    }
    println!("still failing, giving up");
}

/// Immediate-retry policy: three retries, the full transient-status table
/// plus transient HTTP statuses, observer reporting the retry index.
fn demo_retry(fail: Option<u32>) {
    println!("== policy: retry ==");
    let policy: Policy<ProbeError> = Policy::builder(Schedule::Count(3))
        .retry_if(|e| matches!(e, ProbeError::Net(s) if s.is_transient()))
        .retry_if(|e| matches!(e, ProbeError::Http(code) if net::http_status_transient(*code)))
        .on_retry(|err, retry| {
            println!("operation failed ({err}), retrying ({} of 3)", retry.attempt);
        })
        .build();

    let mut op = FlakyOp::new(fail);
    match policy.execute(|| op.call()) {
        Ok(calls) => println!("succeeded on call {calls}"),
        Err(err) => println!("retries exhausted, giving up: {err}"),
    }
}

/// Wait-and-retry policy: delays of 1s, 2s, 3s, timeouts only, observer
/// reporting the upcoming delay.
fn demo_wait_and_retry(fail: Option<u32>, fast: bool) {
    println!("== policy: wait and retry ==");
    let unit = if fast {
        Duration::from_millis(10)
    } else {
        Duration::from_secs(1)
    };
    let policy: Policy<ProbeError> =
        Policy::builder(Schedule::Delays(vec![unit, unit * 2, unit * 3]))
            .retry_if(|e| matches!(e, ProbeError::Net(NetStatus::Timeout)))
            .on_retry(|err, retry| {
                println!(
                    "operation failed ({err}), waiting {:?} before retrying",
                    retry.delay
                );
            })
            .build();

    let mut op = FlakyOp::new(fail);
    match policy.execute(|| op.call()) {
        Ok(calls) => println!("succeeded on call {calls}"),
        Err(err) => println!("retries exhausted, giving up: {err}"),
    }
}

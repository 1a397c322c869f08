use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use callgate::{AdmissionController, ConfigError, ControllerConfig};
use futures::future::join_all;
use tokio::time::sleep;

/// Records the order in which operations start.
#[derive(Clone, Default)]
struct StartLog(Arc<Mutex<Vec<usize>>>);

impl StartLog {
    fn push(&self, i: usize) {
        self.0.lock().unwrap().push(i);
    }

    fn get(&self) -> Vec<usize> {
        self.0.lock().unwrap().clone()
    }
}

/// Tracks live and peak concurrency as seen by the operations themselves.
#[derive(Clone, Default)]
struct Gauge {
    live: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Gauge {
    fn enter(&self) {
        let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[test]
fn test_construction() {
    let gate = AdmissionController::new(2).unwrap();
    assert_eq!(gate.limit(), 2);
    assert_eq!(gate.running(), 0);
    assert_eq!(gate.queued(), 0);

    let custom = AdmissionController::new(5).unwrap();
    assert_eq!(custom.limit(), 5);

    let named =
        AdmissionController::with_config(ControllerConfig::new(3).with_name("orders")).unwrap();
    assert_eq!(named.name(), "orders");

    assert_eq!(AdmissionController::new(0).unwrap_err(), ConfigError::ZeroLimit);
}

#[tokio::test]
async fn test_immediate_operation_runs_once() {
    let gate = AdmissionController::new(2).unwrap();
    let calls = Arc::new(AtomicUsize::new(0));

    let c = Arc::clone(&calls);
    let out = gate
        .add(move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>("success")
        })
        .await;

    assert_eq!(out, Ok("success"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_running_never_exceeds_limit() {
    for limit in [1usize, 2, 3, 7] {
        let gate = AdmissionController::new(limit).unwrap();
        let gauge = Gauge::default();

        let ops = (0..20).map(|i| {
            let gauge = gauge.clone();
            let observer = gate.clone();
            gate.add(move || async move {
                gauge.enter();
                assert!(observer.running() <= observer.limit());
                sleep(Duration::from_millis(10 + (i % 3) as u64 * 5)).await;
                gauge.exit();
                i
            })
        });

        let out = join_all(ops).await;
        assert_eq!(out, (0..20).collect::<Vec<_>>());
        assert_eq!(gauge.peak(), limit, "limit {limit}");
        assert!(gate.is_idle());
    }
}

#[tokio::test(start_paused = true)]
async fn test_all_delayed_operations_complete() {
    let gate = AdmissionController::new(2).unwrap();
    let done = Arc::new(Mutex::new(Vec::new()));

    let ops = (0..3).map(|i| {
        let done = Arc::clone(&done);
        gate.add(move || async move {
            sleep(Duration::from_millis(100)).await;
            done.lock().unwrap().push(format!("api-{i}"));
            format!("result-{i}")
        })
    });
    let results = join_all(ops).await;

    assert_eq!(results, vec!["result-0", "result-1", "result-2"]);
    let mut done = done.lock().unwrap().clone();
    done.sort();
    assert_eq!(done, vec!["api-0", "api-1", "api-2"]);
}

#[tokio::test(start_paused = true)]
async fn test_queued_pair_admitted_in_order() {
    let gate = AdmissionController::new(2).unwrap();
    let starts = StartLog::default();
    let started_at = Arc::new(Mutex::new(Vec::new()));
    let origin = tokio::time::Instant::now();

    let ops = (0..4).map(|i| {
        let starts = starts.clone();
        let started_at = Arc::clone(&started_at);
        gate.add(move || async move {
            starts.push(i);
            started_at.lock().unwrap().push((i, origin.elapsed()));
            sleep(Duration::from_millis(50)).await;
            format!("result-{i}")
        })
    });
    join_all(ops).await;

    assert_eq!(starts.get(), vec![0, 1, 2, 3]);
    let started_at = started_at.lock().unwrap().clone();
    for (i, at) in started_at {
        if i < 2 {
            assert_eq!(at, Duration::ZERO, "op {i} should start immediately");
        } else {
            assert!(at >= Duration::from_millis(50), "op {i} started before a slot freed");
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_limit_one_serializes() {
    let gate = AdmissionController::new(1).unwrap();
    let starts = StartLog::default();
    let gauge = Gauge::default();

    let ops = [0usize, 1, 2, 3].map(|i| {
        let starts = starts.clone();
        let gauge = gauge.clone();
        gate.add(move || async move {
            gauge.enter();
            starts.push(i);
            sleep(Duration::from_millis(50)).await;
            gauge.exit();
            format!("result-{i}")
        })
    });
    join_all(ops).await;

    assert_eq!(starts.get(), vec![0, 1, 2, 3]);
    assert_eq!(gauge.peak(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_queue_bookkeeping_drains() {
    let gate = AdmissionController::new(2).unwrap();

    let mut ops: Vec<_> = (1..=4)
        .map(|i| {
            Box::pin(gate.add(move || async move {
                sleep(Duration::from_millis(10)).await;
                format!("result{i}")
            }))
        })
        .collect();

    // Poll each submission once so it is either admitted or queued.
    for op in ops.iter_mut() {
        assert!(futures::poll!(op.as_mut()).is_pending());
    }

    let snap = gate.snapshot();
    assert_eq!(snap.running, 2);
    assert_eq!(snap.queued, 2);

    let results = join_all(ops).await;
    assert_eq!(results, vec!["result1", "result2", "result3", "result4"]);
    assert!(gate.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_queue_holds_excess_submissions() {
    let gate = AdmissionController::new(2).unwrap();

    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.add(move || async move {
                    sleep(Duration::from_millis(20)).await;
                    format!("result{i}")
                })
                .await
            })
        })
        .collect();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }

    assert_eq!(gate.running(), 2);
    assert_eq!(gate.queued(), 2);

    for (i, h) in handles.into_iter().enumerate() {
        assert_eq!(h.await.unwrap(), format!("result{}", i + 1));
    }
    assert_eq!(gate.running(), 0);
    assert_eq!(gate.queued(), 0);
}

#[tokio::test]
async fn test_failure_is_returned_to_its_caller() {
    let gate = AdmissionController::new(2).unwrap();
    let out: Result<(), String> = gate.add(|| async { Err("api failed".to_string()) }).await;
    assert_eq!(out, Err("api failed".to_string()));
    assert!(gate.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_failure_does_not_affect_siblings() {
    let gate = AdmissionController::new(2).unwrap();

    let ok1 = gate.add(|| async {
        sleep(Duration::from_millis(10)).await;
        Ok::<_, anyhow::Error>("success")
    });
    let bad = gate.add(|| async {
        sleep(Duration::from_millis(5)).await;
        Err::<&str, _>(anyhow::anyhow!("api2 failed"))
    });
    let ok3 = gate.add(|| async { Ok::<_, anyhow::Error>("success") });

    let (ok1, bad, ok3) = tokio::join!(ok1, bad, ok3);
    assert_eq!(ok1.unwrap(), "success");
    assert_eq!(bad.unwrap_err().to_string(), "api2 failed");
    assert_eq!(ok3.unwrap(), "success");
    assert!(gate.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_failures_release_slots_for_queued_work() {
    let gate = AdmissionController::new(1).unwrap();

    let ops = (0..5).map(|i| {
        gate.add(move || async move {
            sleep(Duration::from_millis(5)).await;
            if i % 2 == 0 { Err(i) } else { Ok(i) }
        })
    });

    let results = join_all(ops).await;
    assert_eq!(results, vec![Err(0), Ok(1), Err(2), Ok(3), Err(4)]);
    assert!(gate.is_idle());
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_state_immediately() {
    let gate = AdmissionController::new(1).unwrap();

    let handles: Vec<_> = (0..3)
        .map(|i| {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.add(move || async move {
                    sleep(Duration::from_millis(30)).await;
                    i
                })
                .await
            })
        })
        .collect();
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
    assert_eq!(gate.running(), 1);
    assert_eq!(gate.queued(), 2);

    gate.reset();
    assert_eq!(gate.running(), 0);
    assert_eq!(gate.queued(), 0);

    // Every submitted operation still completes.
    let mut out: Vec<i32> = join_all(handles).await.into_iter().map(Result::unwrap).collect();
    out.sort_unstable();
    assert_eq!(out, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_works_after_reset() {
    let gate = AdmissionController::new(2).unwrap();
    gate.reset();

    let calls = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&calls);
    let out = gate
        .add(move || async move {
            c.fetch_add(1, Ordering::SeqCst);
            "result"
        })
        .await;

    assert_eq!(out, "result");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_many_immediate_operations_keep_submission_order() {
    let gate = AdmissionController::new(10).unwrap();

    let ops = (0..20).map(|i| gate.add(move || async move { format!("result-{i}") }));
    let results = join_all(ops).await;

    assert_eq!(results.len(), 20);
    for (i, r) in results.iter().enumerate() {
        assert_eq!(r, &format!("result-{i}"));
    }
}

#[tokio::test(start_paused = true)]
async fn test_long_and_quick_operations_both_resolve() {
    let gate = AdmissionController::new(2).unwrap();

    let long = gate.add(|| async {
        sleep(Duration::from_millis(200)).await;
        "long-result"
    });
    let quick = gate.add(|| async { "quick-result" });

    assert_eq!(tokio::join!(long, quick), ("long-result", "quick-result"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_multi_thread_burst_respects_limit() {
    let gate = AdmissionController::new(3).unwrap();
    let gauge = Gauge::default();

    let handles: Vec<_> = (0..64)
        .map(|i| {
            let gate = gate.clone();
            let gauge = gauge.clone();
            tokio::spawn(async move {
                gate.add(move || async move {
                    gauge.enter();
                    sleep(Duration::from_millis(2)).await;
                    gauge.exit();
                    i
                })
                .await
            })
        })
        .collect();

    let mut out: Vec<usize> = join_all(handles).await.into_iter().map(Result::unwrap).collect();
    out.sort_unstable();
    assert_eq!(out, (0..64).collect::<Vec<_>>());
    assert!(gauge.peak() <= 3);
    assert!(gate.is_idle());
}

//! Event queue and codec benchmarks.
//!
//! Measures the per-event costs on the hot paths:
//! - Queueing before readiness (distinct names and repeated names)
//! - Draining the queue
//! - Building delivery scripts
//! - Parsing inbound envelopes
//!
//! Run with: cargo bench --bench event_queue
//! Results saved to: target/criterion/

use std::hint::black_box;

use blaze_bridge::{InboundEvent, OutboundEvent, PendingEvents};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::{Value, json};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const EVENT_COUNTS: &[usize] = &[10, 100, 1_000];

fn payload(n: usize) -> Value {
    json!({
        "action": "process",
        "sequence": n,
        "order": { "id": format!("order-{n}"), "amount": 499, "currency": "INR" },
    })
}

// ============================================================================
// Benchmark: Queue
// ============================================================================

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");

    for &count in EVENT_COUNTS {
        group.bench_with_input(BenchmarkId::new("insert_same_name", count), &count, |b, &n| {
            b.iter(|| {
                let mut queue = PendingEvents::new();
                for i in 0..n {
                    queue.insert("process", payload(i));
                }
                black_box(queue.len())
            });
        });

        group.bench_with_input(
            BenchmarkId::new("insert_and_take_distinct", count),
            &count,
            |b, &n| {
                b.iter(|| {
                    let mut queue = PendingEvents::new();
                    for i in 0..n {
                        queue.insert(format!("event-{i}"), payload(i));
                    }
                    black_box(queue.take())
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark: Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    let event = OutboundEvent::new("process", payload(1), "blaze");
    group.bench_function("to_script", |b| {
        b.iter(|| black_box(&event).to_script("onSDKEvent"))
    });

    let raw = json!({
        "eventName": "invokeMethod",
        "eventData": json!({
            "methodName": "saveToStorage",
            "requestId": "req-1",
            "params": json!({ "key": "token", "value": "abc" }).to_string(),
        })
        .to_string(),
    })
    .to_string();
    group.bench_function("inbound_parse", |b| {
        b.iter(|| InboundEvent::from_json(black_box(&raw)).map(InboundEvent::parse))
    });

    group.finish();
}

criterion_group!(benches, bench_queue, bench_codec);
criterion_main!(benches);

use pdgraph::core::JobQueue;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn fifo_order_and_nonblocking_drain() {
    let queue = JobQueue::new();
    queue.push(1);
    queue.push(2);
    queue.push(3);
    assert_eq!(queue.len(), 3);
    assert_eq!(queue.drain(), vec![1, 2, 3]);
    assert!(queue.is_empty());
}

#[test]
fn pop_timeout_returns_none_on_sustained_emptiness() {
    let queue: JobQueue<u32> = JobQueue::new();
    let start = Instant::now();
    assert_eq!(queue.pop_timeout(Duration::from_millis(50)), None);
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn pop_timeout_wakes_up_for_late_pushes() {
    let queue = Arc::new(JobQueue::new());
    let producer = Arc::clone(&queue);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.push(7u32);
    });
    assert_eq!(queue.pop_timeout(Duration::from_secs(2)), Some(7));
    handle.join().unwrap();
}

#[test]
fn each_item_is_delivered_to_exactly_one_consumer() {
    let queue = Arc::new(JobQueue::new());
    for i in 0..100u32 {
        queue.push(i);
    }

    let mut handles = Vec::new();
    for _ in 0..4 {
        let consumer = Arc::clone(&queue);
        handles.push(thread::spawn(move || {
            let mut taken = Vec::new();
            while let Some(item) = consumer.pop_timeout(Duration::from_millis(100)) {
                taken.push(item);
            }
            taken
        }));
    }

    let mut all: Vec<u32> = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }
    assert_eq!(all.len(), 100, "no item lost, none duplicated");
    let unique: HashSet<u32> = all.iter().copied().collect();
    assert_eq!(unique.len(), 100);
}

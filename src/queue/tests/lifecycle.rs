//! Tests for queue shutdown

#[cfg(test)]
mod tests {
    use crate::queue::api::{MultiQueue, MultiQueueConfig, QueueError};
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_close_unblocks_waiting_get() {
        let queue = Arc::new(MultiQueue::<String>::init("shutdown", 8, 2, 1).unwrap());
        let (tx, rx) = mpsc::channel();

        let reader = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || {
                let result = queue.get(0);
                tx.send(()).unwrap();
                result
            })
        };

        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err(), "reader should still be blocked");

        queue.close();
        rx.recv_timeout(Duration::from_secs(2))
            .expect("close must wake the blocked reader promptly");

        match reader.join().unwrap() {
            Err(QueueError::Closed { name }) => assert_eq!(name, "shutdown"),
            other => panic!("Expected Closed, got {:?}", other),
        }
        println!("✓ Close wakes blocked consumer");
    }

    #[test]
    fn test_close_unblocks_waiting_gets_with_partial_batch() {
        let queue = Arc::new(MultiQueue::init("partial", 8, 1, 1).unwrap());
        queue.puts(&[0, 0], vec![1, 2]).unwrap();

        let reader = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.gets(0, 5))
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();

        assert_eq!(reader.join().unwrap().unwrap(), vec![1, 2]);
        assert!(queue.gets(0, 5).unwrap_err().is_closed());
    }

    #[test]
    fn test_close_unblocks_waiting_producer() {
        let queue = Arc::new(MultiQueue::init("full", 1, 1, 1).unwrap());
        queue.put(0, 1).unwrap();

        let writer = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.put(0, 2))
        };

        thread::sleep(Duration::from_millis(50));
        assert!(!writer.is_finished(), "producer should be blocked on a full partition");
        queue.close();

        assert!(writer.join().unwrap().unwrap_err().is_closed());
        assert_eq!(queue.get(0).unwrap(), 1);
        assert!(queue.get(0).unwrap_err().is_closed());
    }

    #[test]
    fn test_buffered_items_drain_after_close() {
        let queue = MultiQueue::init("drain", 64, 2, 2).unwrap();
        queue.puts(&[0, 1, 0, 1, 0], vec!["a", "b", "c", "d", "e"]).unwrap();
        queue.close();

        assert!(queue.put(0, "f").unwrap_err().is_closed());
        assert!(queue.puts(&[0], vec!["f"]).unwrap_err().is_closed());
        assert!(queue.puts_exact(&[0], vec!["f"]).unwrap_err().is_closed());

        assert_eq!(queue.get(0).unwrap(), "a");
        assert_eq!(queue.gets(0, 5).unwrap(), vec!["c", "e"]);
        assert_eq!(queue.try_get(1).unwrap(), Some("b"));
        assert_eq!(queue.gets_available(1, 5).unwrap(), vec!["d"]);

        for partition in 0..2 {
            assert!(queue.get(partition).unwrap_err().is_closed());
            assert!(queue.try_get(partition).unwrap_err().is_closed());
            assert!(queue.gets_available(partition, 1).unwrap_err().is_closed());
            assert!(queue
                .get_timeout(partition, Duration::from_millis(1))
                .unwrap_err()
                .is_closed());
        }
    }

    #[test]
    fn test_close_wakes_get_timeout_early() {
        let queue = MultiQueue::<u8>::shared(MultiQueueConfig::new("timeout", 8, 1, 1)).unwrap();

        let reader = {
            let queue = Arc::clone(&queue);
            thread::spawn(move || queue.get_timeout(0, Duration::from_secs(30)))
        };

        thread::sleep(Duration::from_millis(50));
        queue.close();
        assert!(reader.join().unwrap().unwrap_err().is_closed());
    }

    #[test]
    fn test_close_wakes_every_consumer() {
        let queue = MultiQueue::<u32>::shared(MultiQueueConfig::new("many", 64, 4, 1)).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|partition| {
                let consumer = queue.create_consumer(format!("c{}", partition), partition).unwrap();
                thread::spawn(move || consumer.read_batch(10))
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.close();

        for reader in readers {
            assert!(reader.join().unwrap().unwrap_err().is_closed());
        }
    }
}

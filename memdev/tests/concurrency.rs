//! Lock discipline across threads

mod common;

use common::{contents, session, small_table};
use memdev::{CancelToken, UnitError, Whence};
use std::thread;
use std::time::Duration;

#[test]
fn test_concurrent_writes_do_not_interleave() {
    let table = small_table(1);

    for _round in 0..20 {
        thread::scope(|scope| {
            for tag in 1..=8u8 {
                let mut s = session(&table, "mycdrv0");
                scope.spawn(move || {
                    let block = [tag; 1000];
                    s.seek(0, Whence::Start).unwrap();
                    assert_eq!(s.write(&block).unwrap(), 1000);
                });
            }
        });

        let data = contents(&session(&table, "mycdrv0"));
        let first = data[0];
        assert!((1..=8).contains(&first));
        assert!(data[..1000].iter().all(|&b| b == first));
    }
}

#[test]
fn test_units_are_independent() {
    let table = small_table(4);

    thread::scope(|scope| {
        for index in 0..4u8 {
            let mut s = session(&table, &format!("mycdrv{index}"));
            scope.spawn(move || {
                for _ in 0..100 {
                    s.seek(0, Whence::Start).unwrap();
                    s.write(&[index + 1; 16]).unwrap();
                }
            });
        }
    });

    for index in 0..4u8 {
        let data = contents(&session(&table, &format!("mycdrv{index}")));
        assert_eq!(&data[..16], &[index + 1; 16]);
        assert!(data[16..].iter().all(|&b| b == 0));
    }
}

#[test]
fn test_pending_interrupt_fails_without_touching_unit() {
    let table = small_table(1);
    let mut s = session(&table, "mycdrv0");
    let unit = s.unit().clone();

    let guard = unit.lock(&CancelToken::new()).unwrap();
    s.cancel_token().cancel();
    assert!(matches!(s.write(b"never"), Err(UnitError::Interrupted)));
    assert_eq!(s.position(), 0);
    drop(guard);

    // the interrupt was consumed by the failed wait
    assert!(!s.cancel_token().is_cancelled());
    let mut out = [0xffu8; 5];
    assert_eq!(s.read(&mut out).unwrap(), 5);
    assert_eq!(out, [0u8; 5]);
}

#[test]
fn test_free_lock_consumes_pending_interrupt() {
    let table = small_table(1);
    let mut s = session(&table, "mycdrv0");
    let unit = s.unit().clone();

    s.cancel_token().cancel();
    assert_eq!(s.write(b"ok").unwrap(), 2);
    assert!(!s.cancel_token().is_cancelled());

    // a later operation that has to wait was never interrupted
    s.seek(0, Whence::Start).unwrap();
    let guard = unit.lock(&CancelToken::new()).unwrap();
    let blocked = thread::spawn(move || {
        let mut out = [0u8; 2];
        let result = s.read(&mut out);
        (result, out)
    });

    thread::sleep(Duration::from_millis(30));
    drop(guard);
    let (result, out) = blocked.join().unwrap();

    assert_eq!(result.unwrap(), 2);
    assert_eq!(&out, b"ok");
}

#[test]
fn test_interrupt_from_another_thread() {
    let table = small_table(1);
    let mut s = session(&table, "mycdrv0");
    let unit = s.unit().clone();
    let cancel = s.cancel_token();

    let guard = unit.lock(&CancelToken::new()).unwrap();
    let blocked = thread::spawn(move || {
        let result = s.seek(5000, Whence::Start);
        (result, s)
    });

    thread::sleep(Duration::from_millis(50));
    cancel.cancel();
    let (result, s) = blocked.join().unwrap();
    drop(guard);

    assert!(matches!(result, Err(UnitError::Interrupted)));
    assert_eq!(s.position(), 0);
    assert_eq!(contents(&s).len(), 1024);
}

#[test]
fn test_waiter_proceeds_after_release() {
    let table = small_table(1);
    let mut s = session(&table, "mycdrv0");
    let unit = s.unit().clone();

    let guard = unit.lock(&CancelToken::new()).unwrap();
    let blocked = thread::spawn(move || {
        let n = s.write(b"after").unwrap();
        (n, s)
    });

    thread::sleep(Duration::from_millis(30));
    drop(guard);
    let (n, s) = blocked.join().unwrap();

    assert_eq!(n, 5);
    assert_eq!(&contents(&s)[..5], b"after");
}

use std::cell::RefCell;
use std::rc::Rc;

use scanstate::{StableFn, StableValue, Store};

#[test]
fn holds_the_latest_value() {
	let value = StableValue::new(1);
	value.set(2);
	value.set(3);

	assert_eq!(value.get(), 3);
	assert_eq!(*value.current(), 3);
	assert_eq!(value.with(|n| n * 2), 6);
}

#[test]
fn captured_handle_reads_fresh_values() {
	let store = Store::new(0);
	let query = StableValue::new(String::from("milk"));
	let log = Rc::new(RefCell::new(Vec::new()));

	let _sub = store.subscribe({
		let query = query.clone();
		let log = log.clone();
		move |page: &i32| log.borrow_mut().push(format!("{} #{page}", *query.current()))
	});

	store.set(1);
	query.set(String::from("oat milk"));
	store.set(2);

	assert_eq!(*log.borrow(), vec!["milk #1", "oat milk #2"]);
	assert_eq!(store.subscriber_count(), 1);
}

#[test]
fn callback_may_replace_itself() {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let handler: StableFn<u32> = StableValue::from_fn(|_: &u32| {});

	handler.set_fn({
		let handler = handler.clone();
		let calls = calls.clone();
		move |n: &u32| {
			calls.borrow_mut().push(*n);
			let calls = calls.clone();
			handler.set_fn(move |n: &u32| calls.borrow_mut().push(n * 100));
		}
	});

	handler.call(&1);
	handler.call(&2);

	assert_eq!(*calls.borrow(), vec![1, 200]);
}

#[test]
fn clones_share_the_slot() {
	let a = StableValue::new("a");
	let b = a.clone();
	b.set("b");

	assert_eq!(a.get(), "b");
	assert!(a.ptr_eq(&b));
}

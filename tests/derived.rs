use std::cell::{Cell, RefCell};
use std::rc::Rc;

use mockall::predicate::eq;
use scanstate::{derived, Derived, Store, Value};

mod mock;
use mock::Spy;

#[test]
fn initial_value_is_computed_immediately() {
	let source = Store::new(4);
	let doubled = source.map(|n| n * 2);

	assert_eq!(doubled.get(), 8);
	assert_eq!(*doubled.snapshot(), 8);
}

#[test]
fn follows_the_source() {
	let source = Store::new(1);
	let label = Derived::new(&source, |n: &i32| format!("#{n}"));

	for n in [2, 3, 7] {
		source.set(n);
		assert_eq!(label.get(), format!("#{n}"));
		assert_eq!(label.get(), format!("#{}", source.get()));
	}
}

#[test]
fn equal_results_are_coalesced() {
	let source = Store::new(0i64);
	let parity = source.map(|n| n % 2);
	let mock = mock::SharedMock::new();

	mock.get().expect_trigger().with(eq(1)).times(1).return_const(());

	let _sub = parity.subscribe({
		let mock = mock.clone();
		move |value| mock.get().trigger(*value)
	});

	source.set(1);
	source.set(3);
	source.set(5);

	mock.get().checkpoint();
	assert_eq!(parity.get(), 1);
}

#[test]
fn derives_once_per_source_notification() {
	let runs = Rc::new(Cell::new(0));
	let source = Store::new(1);

	let _derived = Derived::new(&source, {
		let runs = runs.clone();
		move |n: &i32| {
			runs.set(runs.get() + 1);
			*n > 0
		}
	});
	assert_eq!(runs.get(), 1);

	source.set(2);
	assert_eq!(runs.get(), 2);

	source.set(2);
	assert_eq!(runs.get(), 2);
}

#[test]
fn downstream_sees_update_before_set_returns() {
	let source = Store::new(1);
	let squared = source.map(|n| n * n);
	let seen = Rc::new(RefCell::new(Vec::new()));

	let _sub = squared.subscribe({
		let seen = seen.clone();
		move |value: &i32| seen.borrow_mut().push(*value)
	});

	source.set(3);
	assert_eq!(*seen.borrow(), vec![9]);
}

#[test]
fn chains_of_derived_stores() {
	let source = Store::new(2);
	let doubled = source.map(|n| n * 2);
	let described = doubled.map(|n| if *n > 5 { "big" } else { "small" });

	assert_eq!(described.get(), "small");
	source.set(3);
	assert_eq!(doubled.get(), 6);
	assert_eq!(described.get(), "big");
}

#[test]
fn dispose_releases_the_source() {
	let source = Store::new(1);
	let derived = source.map(|n| n + 1);
	assert_eq!(source.subscriber_count(), 1);
	assert!(!derived.is_disposed());

	derived.dispose();
	assert!(derived.is_disposed());
	assert_eq!(source.subscriber_count(), 0);

	source.set(10);
	assert_eq!(derived.get(), 2);

	derived.dispose();
}

#[test]
fn dropping_the_last_handle_releases_the_source() {
	let source = Store::new(1);
	let derived = source.map(|n| n + 1);
	let other = derived.clone();

	std::mem::drop(derived);
	assert_eq!(source.subscriber_count(), 1);

	std::mem::drop(other);
	assert_eq!(source.subscriber_count(), 0);

	source.set(2);
}

#[test]
fn derive_from_erased_value() {
	let source = Store::new(String::from("abc"));
	let value: Value<String> = source.clone().into();
	let length = Derived::new(&value, |text: &String| text.len());

	source.set(String::from("abcdef"));
	assert_eq!(length.get(), 6);

	let erased: Value<usize> = length.clone().into();
	assert_eq!(erased.get(), 6);
}

#[test]
fn derived_macro_clones_captures() {
	let source = Store::new(2);
	let factor = Store::new(10);

	let scaled = derived!((factor) source, n => *n * factor.get());
	assert_eq!(scaled.get(), 20);

	source.set(3);
	assert_eq!(scaled.get(), 30);
}

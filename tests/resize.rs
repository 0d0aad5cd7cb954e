use std::cell::RefCell;
use std::rc::Rc;

use scanstate::{ResizeEvent, ResizeRegistry, StableFn, StableValue, Subscription};

fn event(width: u32, height: u32) -> ResizeEvent {
	ResizeEvent { width, height }
}

#[test]
fn dispatches_to_every_listener() {
	let registry = ResizeRegistry::new();
	let log = Rc::new(RefCell::new(Vec::new()));

	let subs: Vec<Subscription> = ["header", "camera"]
		.into_iter()
		.map(|name| {
			let log = log.clone();
			registry.register(StableValue::from_fn(move |event: &ResizeEvent| {
				log.borrow_mut().push((name, event.width))
			}))
		})
		.collect();

	registry.dispatch(event(320, 640));

	assert_eq!(*log.borrow(), vec![("header", 320), ("camera", 320)]);
	assert_eq!(registry.len(), subs.len());
}

#[test]
fn unregistered_listeners_stop_receiving() {
	let registry = ResizeRegistry::new();
	let count = Rc::new(RefCell::new(0));

	let sub = registry.register(StableValue::from_fn({
		let count = count.clone();
		move |_: &ResizeEvent| *count.borrow_mut() += 1
	}));

	registry.dispatch(event(1, 1));
	sub.unsubscribe();
	registry.dispatch(event(2, 2));

	assert_eq!(*count.borrow(), 1);
	assert!(registry.is_empty());
}

#[test]
fn listeners_see_their_latest_callback() {
	let registry = ResizeRegistry::new();
	let log = Rc::new(RefCell::new(Vec::new()));

	let listener: StableFn<ResizeEvent> = StableValue::from_fn({
		let log = log.clone();
		move |event: &ResizeEvent| log.borrow_mut().push(format!("old {}", event.height))
	});
	let _sub = registry.register(listener.clone());

	registry.dispatch(event(0, 100));

	listener.set_fn({
		let log = log.clone();
		move |event: &ResizeEvent| log.borrow_mut().push(format!("new {}", event.height))
	});
	registry.dispatch(event(0, 200));

	assert_eq!(*log.borrow(), vec!["old 100", "new 200"]);
	assert_eq!(registry.len(), 1);
}

#[test]
fn listeners_added_during_dispatch_wait_for_the_next_event() {
	let registry = ResizeRegistry::new();
	let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
	let seen = Rc::new(RefCell::new(Vec::new()));

	let _sub = registry.register(StableValue::from_fn({
		let registry = registry.clone();
		let late = late.clone();
		let seen = seen.clone();
		move |_: &ResizeEvent| {
			if late.borrow().is_empty() {
				let seen = seen.clone();
				let sub = registry.register(StableValue::from_fn(move |event: &ResizeEvent| {
					seen.borrow_mut().push(event.width)
				}));
				late.borrow_mut().push(sub);
			}
		}
	}));

	registry.dispatch(event(10, 10));
	assert!(seen.borrow().is_empty());

	registry.dispatch(event(20, 20));
	assert_eq!(*seen.borrow(), vec![20]);
}

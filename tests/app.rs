use scanstate::{AppConfig, AppState, KeyValueStorage, ResizeEvent, ScanMode, StableValue};

fn init_tracing() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_env_filter("scanstate=trace")
		.try_init();
}

#[test]
fn config_defaults() {
	let config = AppConfig::from_json("{}").unwrap();
	assert_eq!(config.initial_scan_mode, ScanMode::Scan);
	assert_eq!(config.storage_path, None);
}

#[test]
fn config_from_json() {
	let config = AppConfig::from_json(r#"{ "initial_scan_mode": "input" }"#).unwrap();
	assert_eq!(config.initial_scan_mode, ScanMode::Input);

	assert!(AppConfig::from_json(r#"{ "initial_scan_mode": "camera" }"#).is_err());
}

#[test]
fn in_memory_state() {
	init_tracing();

	let state = AppState::open(&AppConfig::default()).unwrap();
	let loading = state.loading.observe();

	let request = state.loading.track();
	assert!(loading.get());

	state.scan_mode.next();
	assert_eq!(state.scan_mode.get(), ScanMode::Input);

	let _header = state.header.push(String::from("Scan a product"));
	assert_eq!(state.header.current().as_deref(), Some("Scan a product"));

	let resized = StableValue::new(ResizeEvent::default());
	let _listener = state.resize.register(StableValue::from_fn({
		let resized = resized.clone();
		move |event: &ResizeEvent| resized.set(*event)
	}));
	state.resize.dispatch(ResizeEvent {
		width: 390,
		height: 844,
	});
	assert_eq!(resized.get().width, 390);

	request.release();
	assert!(!loading.get());
}

#[test]
fn settings_persist_across_app_instances() {
	init_tracing();

	let dir = tempfile::tempdir().unwrap();
	let config = AppConfig {
		initial_scan_mode: ScanMode::Upload,
		storage_path: Some(dir.path().join("state.json")),
	};

	{
		let state = AppState::open(&config).unwrap();
		assert_eq!(state.scan_mode.get(), ScanMode::Upload);

		let sound = state.setting("sound", true);
		sound.set(false);
	}

	let state = AppState::open(&config).unwrap();
	assert!(!state.setting("sound", true).get());
	assert_eq!(
		state.storage().get("sound").unwrap().as_deref(),
		Some("false")
	);
}

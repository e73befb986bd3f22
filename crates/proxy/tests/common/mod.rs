//! Contracts and helpers shared by the adapter integration tests.

use std::time::Duration;

use standin::testing::RecordingSink;
use standin::{Pending, Result, ValueMap};

#[standin::contract]
pub trait Counter {
	#[watch]
	fn label(&self) -> Option<String>;
	#[property]
	fn count(&self) -> i64;
	#[property]
	fn ratio(&self) -> f64;
	fn increment(&self, amount: i64) -> Result<()>;
	fn reset(&self) -> Result<()>;
	fn save_async(&self, path: String) -> Result<Pending>;
	fn dispatch(&self, properties: ValueMap) -> Result<()>;
	fn dispose(&self) -> Result<()>;
	fn dispose_async(&self) -> Result<Pending>;
}

#[standin::contract]
pub trait Pet {
	#[property]
	fn name(&self) -> String;
	#[property]
	fn age(&self) -> u32;
}

#[standin::contract(name = "Household", adapter = HouseholdHandle)]
pub trait Owner {
	#[watch]
	fn title(&self) -> Option<String>;
	#[property]
	fn pet(&self) -> PetProxy;
	#[property]
	fn pets(&self) -> Vec<PetProxy>;
	#[property]
	fn tags(&self) -> Vec<String>;
}

#[standin::contract]
pub trait Settings {
	#[property]
	fn companion(&self) -> Option<PetProxy>;
}

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

/// Yields until the sink has completed `expected` operations.
#[allow(dead_code)]
pub async fn settle(sink: &RecordingSink, expected: usize) {
	let wait = async {
		while sink.completed() < expected {
			tokio::task::yield_now().await;
		}
	};
	if tokio::time::timeout(Duration::from_secs(1), wait).await.is_err() {
		panic!("sink completed {} of {expected} operations", sink.completed());
	}
}

use std::future::Future;
use std::sync::OnceLock;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(1)
			.thread_name("standin-dispatch")
			.build()
			.expect("failed to build standin fallback tokio runtime")
	});
	runtime.handle().clone()
}

/// Launches a forwarded operation nobody will await.
///
/// Runs on the ambient tokio runtime, or on a lazily built process-wide
/// runtime when the caller is not inside one.
pub(crate) fn spawn_detached<F>(member: &str, fut: F)
where
	F: Future<Output = ()> + Send + 'static,
{
	tracing::trace!(member, "proxy.spawn_detached");
	drop(runtime_handle().spawn(fut));
}

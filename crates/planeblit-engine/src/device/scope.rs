/// Runs `f` inside validation and out-of-memory error scopes and returns the
/// description of the first GPU error raised by it.
///
/// wgpu reports most errors asynchronously to an uncaptured-error handler that
/// panics by default. Every state-mutating call in this crate goes through
/// here instead, so failures surface as typed errors at the call site.
pub(crate) fn check_no_gpu_error<T>(
    device: &wgpu::Device,
    f: impl FnOnce() -> T,
) -> Result<T, String> {
    let oom_scope = device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
    let validation_scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let value = f();

    // Scopes are popped innermost first.
    let validation = pollster::block_on(validation_scope.pop());
    let oom = pollster::block_on(oom_scope.pop());

    match validation.or(oom) {
        Some(err) => Err(err.to_string()),
        None => Ok(value),
    }
}

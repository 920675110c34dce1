use once_cell::unsync::OnceCell;
use std::marker::PhantomData;

/// A function that runs at most once.
///
/// The first [`call`](RunOnce::call) runs the wrapped function with its
/// argument and caches the result. Every later call returns that cached
/// result and ignores its argument.
///
/// ```
/// use sheetkit::func::once;
///
/// let greet = once(|value: i32| format!("Input value was {}", value));
/// assert_eq!(greet.call(123), "Input value was 123");
/// assert_eq!(greet.call(2), "Input value was 123");
/// ```
pub struct RunOnce<A, R, F>
where
    F: Fn(A) -> R,
{
    f: F,
    result: OnceCell<R>,
    _arg: PhantomData<fn(A)>,
}

impl<A, R, F> RunOnce<A, R, F>
where
    F: Fn(A) -> R,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            result: OnceCell::new(),
            _arg: PhantomData,
        }
    }

    pub fn call(&self, arg: A) -> &R {
        self.result.get_or_init(|| (self.f)(arg))
    }

    /// Whether the function has run yet.
    pub fn has_run(&self) -> bool {
        self.result.get().is_some()
    }

    /// The cached result, if any, without running anything.
    pub fn get(&self) -> Option<&R> {
        self.result.get()
    }
}

pub fn once<A, R, F>(f: F) -> RunOnce<A, R, F>
where
    F: Fn(A) -> R,
{
    RunOnce::new(f)
}

/// declares a `Context` trait that attaches a message to a failure while
/// converting it into the given error type.
///
/// each crate that owns an error type invokes this once and then implements
/// the trait for `Result` and `Option`.
#[macro_export]
macro_rules! context_trait {
    ($e:path) => {
        pub trait Context<T, E> {
            fn context<C>(self, cxt: C) -> std::result::Result<T, $e>
            where
                C: Into<String>;
        }
    };
}

/// implements `From<$src>` for an error type that exposes a
/// `new().source(..)` builder.
#[macro_export]
macro_rules! simple_catch {
    ($err:ty, $src:path) => {
        impl From<$src> for $err {
            fn from(err: $src) -> Self {
                <$err>::new().source(err)
            }
        }
    };
}

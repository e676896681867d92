// Crate-local logging wrappers so call sites don't couple to the log facade
// directly and levels can be stripped in one place if needed.

#[macro_export]
macro_rules! vermeer_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! vermeer_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! vermeer_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! vermeer_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! vermeer_trace {
    ($($arg:tt)*) => {
        log::trace!($($arg)*)
    };
}

/// Unwraps a `Result` or panics with the given context message.
#[macro_export]
macro_rules! expect {
    ($result:expr, $msg:expr) => {
        match $result {
            Ok(t) => t,
            Err(why) => {
                panic!("{}: {:?}", $msg, why);
            }
        }
    };
}

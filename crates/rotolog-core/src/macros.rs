//! Convenience macros.
//!
//! `info!(logger, a, b)` renders `[info] [a b]`; `infof!(logger, "x = {}", x)`
//! renders `[info] x = 1`. The caller location recorded is the macro
//! invocation site.

#[doc(hidden)]
#[macro_export]
macro_rules! __values {
    ($logger:expr, $method:ident $(, $value:expr)* $(,)?) => {
        $logger.$method(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

#[macro_export]
macro_rules! trace {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::__values!($logger, trace $(, $value)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::__values!($logger, debug $(, $value)*)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::__values!($logger, info $(, $value)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::__values!($logger, warn $(, $value)*)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::__values!($logger, error $(, $value)*)
    };
}

/// Log the values, then exit the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::__values!($logger, fatal $(, $value)*)
    };
}

#[macro_export]
macro_rules! tracef {
    ($logger:expr, $($arg:tt)+) => {
        $logger.tracef(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debugf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debugf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! infof {
    ($logger:expr, $($arg:tt)+) => {
        $logger.infof(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! warnf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warnf(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! errorf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.errorf(::std::format_args!($($arg)+))
    };
}

/// Formatted variant of [`fatal!`].
#[macro_export]
macro_rules! fatalf {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatalf(::std::format_args!($($arg)+))
    };
}

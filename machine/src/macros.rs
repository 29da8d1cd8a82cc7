/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Log macros writing into an explicitly passed console.
//!
//! The console is any `console::interface::Write`. Output errors are dropped: a log line
//! must never be the reason a fault path stops short of the halt.

/// Prints a raw line, as register dumps and boot progress do.
#[macro_export]
macro_rules! println {
    ($console:expr, $string:expr) => ({
        $crate::macros::_print($console, format_args!(concat!($string, "\n")));
    });
    ($console:expr, $format_string:expr, $($arg:tt)*) => ({
        $crate::macros::_print(
            $console,
            format_args!(concat!($format_string, "\n"), $($arg)*),
        );
    })
}

/// Prints info text, with a newline.
#[macro_export]
macro_rules! info {
    ($console:expr, $string:expr) => ({
        $crate::macros::_print($console, format_args!(concat!("[I] ", $string, "\n")));
    });
    ($console:expr, $format_string:expr, $($arg:tt)*) => ({
        $crate::macros::_print(
            $console,
            format_args!(concat!("[I] ", $format_string, "\n"), $($arg)*),
        );
    })
}

/// Prints warning text, with a newline.
#[macro_export]
macro_rules! warn {
    ($console:expr, $string:expr) => ({
        $crate::macros::_print($console, format_args!(concat!("[W] ", $string, "\n")));
    });
    ($console:expr, $format_string:expr, $($arg:tt)*) => ({
        $crate::macros::_print(
            $console,
            format_args!(concat!("[W] ", $format_string, "\n"), $($arg)*),
        );
    })
}

#[doc(hidden)]
pub fn _print(console: &dyn crate::console::interface::Write, args: core::fmt::Arguments) {
    let _ = console.write_fmt(args);
}

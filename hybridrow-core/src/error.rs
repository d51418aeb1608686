// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Error taxonomy of the row engine.
//!
//! Error constructors sit on every decode and mutation path, so they are kept
//! `#[cold]` and out of line to leave the successful paths tight.

use std::borrow::Cow;

use thiserror::Error;

/// Set HYBRIDROW_PANIC_ON_ERROR at compile time to panic where an error is created.
pub const PANIC_ON_ERROR: bool = option_env!("HYBRIDROW_PANIC_ON_ERROR").is_some();

#[inline(always)]
pub const fn should_panic_on_error() -> bool {
    PANIC_ON_ERROR
}

/// Flat result code for callers that switch on the error class rather than
/// the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    Failure,
    TypeMismatch,
    NotFound,
    Exists,
    InsufficientPermissions,
    TypeConstraint,
    InvalidRow,
    TooFewBytes,
}

/// Error type for row buffer, cursor, reader and writer operations.
///
/// # Always use the constructor functions
///
/// Build errors through [`Error::type_mismatch`], [`Error::not_found`] and the
/// other constructors rather than the variants, so `HYBRIDROW_PANIC_ON_ERROR`
/// can report the exact creation site:
///
/// ```rust
/// use hybridrow_core::error::{Error, ResultCode};
///
/// let err = Error::not_found("no such column: title");
/// assert_eq!(err.code(), ResultCode::NotFound);
/// ```
///
/// `TypeMismatch`, `NotFound`, `Exists`, `InsufficientPermissions` and
/// `TypeConstraint` are recoverable. `InvalidRow`, `TooFewBytes` and `Unknown`
/// mean the row is structurally broken and should not be read further.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The stored type code differs from the requested one.
    #[error("type mismatch: {0}")]
    TypeMismatch(Cow<'static, str>),

    /// No such column, path or collection member.
    #[error("not found: {0}")]
    NotFound(Cow<'static, str>),

    /// A uniqueness scope already holds an equal element.
    #[error("already exists: {0}")]
    Exists(Cow<'static, str>),

    /// Direct mutation of a child owned by an immutable or uniqueness scope.
    #[error("insufficient permissions: {0}")]
    InsufficientPermissions(Cow<'static, str>),

    /// The operation is structurally disallowed in this scope.
    #[error("type constraint: {0}")]
    TypeConstraint(Cow<'static, str>),

    /// The row bytes are corrupt.
    #[error("invalid row: {0}")]
    InvalidRow(Cow<'static, str>),

    /// Decode ran past the end of the buffer.
    #[error("too few bytes: {0} + {1} > {2}")]
    TooFewBytes(usize, usize, usize),

    /// Stream transport failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic failure.
    #[error("{0}")]
    Unknown(Cow<'static, str>),
}

macro_rules! message_constructor {
    ($(#[$doc:meta])* $name:ident => $variant:ident) => {
        $(#[$doc])*
        #[inline(always)]
        #[cold]
        #[track_caller]
        pub fn $name<S: Into<Cow<'static, str>>>(s: S) -> Self {
            let err = Error::$variant(s.into());
            if PANIC_ON_ERROR {
                panic!("HYBRIDROW_PANIC_ON_ERROR: {}", err);
            }
            err
        }
    };
}

impl Error {
    message_constructor!(
        /// Creates a new [`Error::TypeMismatch`].
        type_mismatch => TypeMismatch
    );
    message_constructor!(
        /// Creates a new [`Error::NotFound`].
        not_found => NotFound
    );
    message_constructor!(
        /// Creates a new [`Error::Exists`].
        exists => Exists
    );
    message_constructor!(
        /// Creates a new [`Error::InsufficientPermissions`].
        insufficient_permissions => InsufficientPermissions
    );
    message_constructor!(
        /// Creates a new [`Error::TypeConstraint`].
        type_constraint => TypeConstraint
    );
    message_constructor!(
        /// Creates a new [`Error::InvalidRow`].
        invalid_row => InvalidRow
    );
    message_constructor!(
        /// Creates a new [`Error::Unknown`].
        unknown => Unknown
    );

    /// Creates a new [`Error::TooFewBytes`] for a read of `needed` bytes at
    /// `offset` from a buffer of `available` bytes.
    ///
    /// ```
    /// use hybridrow_core::error::Error;
    ///
    /// let err = Error::too_few_bytes(10, 8, 12);
    /// assert_eq!(err.to_string(), "too few bytes: 10 + 8 > 12");
    /// ```
    #[inline(always)]
    #[cold]
    #[track_caller]
    pub fn too_few_bytes(offset: usize, needed: usize, available: usize) -> Self {
        let err = Error::TooFewBytes(offset, needed, available);
        if PANIC_ON_ERROR {
            panic!("HYBRIDROW_PANIC_ON_ERROR: {}", err);
        }
        err
    }

    pub fn code(&self) -> ResultCode {
        match self {
            Error::TypeMismatch(_) => ResultCode::TypeMismatch,
            Error::NotFound(_) => ResultCode::NotFound,
            Error::Exists(_) => ResultCode::Exists,
            Error::InsufficientPermissions(_) => ResultCode::InsufficientPermissions,
            Error::TypeConstraint(_) => ResultCode::TypeConstraint,
            Error::InvalidRow(_) => ResultCode::InvalidRow,
            Error::TooFewBytes(..) => ResultCode::TooFewBytes,
            Error::Io(_) | Error::Unknown(_) => ResultCode::Failure,
        }
    }

    /// True for the classes after which the row must not be traversed further.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.code(),
            ResultCode::InvalidRow | ResultCode::TooFewBytes | ResultCode::Failure
        )
    }
}

/// Ensures a condition is true; otherwise returns an [`enum@Error`].
///
/// ```
/// use hybridrow_core::ensure;
/// use hybridrow_core::error::Error;
///
/// fn check_len(n: usize) -> Result<(), Error> {
///     ensure!(n > 0, "length must be positive");
///     ensure!(n < 10, Error::type_constraint(format!("length {} too large", n)));
///     Ok(())
/// }
/// assert!(check_len(3).is_ok());
/// assert!(check_len(12).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal) => {
        if !$cond {
            return Err($crate::error::Error::unknown($msg));
        }
    };
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::error::Error::unknown(format!($fmt, $($arg)*)));
        }
    };
}

/// Returns early with an [`Error::InvalidRow`].
///
/// ```
/// use hybridrow_core::bail;
/// use hybridrow_core::error::Error;
///
/// fn corrupt(code: u8) -> Result<(), Error> {
///     bail!("unknown layout code {}", code);
/// }
/// assert!(corrupt(99).is_err());
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::error::Error::invalid_row($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error::invalid_row(format!($fmt, $($arg)*)))
    };
}

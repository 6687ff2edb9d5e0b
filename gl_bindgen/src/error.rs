////////////////////////////////////////////////////////////////////////////////////
// Copyright (c) 2020 DasEtwas - All Rights Reserved                               /
//      Unauthorized copying of this file, via any medium is strictly prohibited   /
//      Proprietary and confidential                                               /
////////////////////////////////////////////////////////////////////////////////////

use std::io;

use thiserror::Error;

/// Errors reported by [`generate`](crate::generate).
///
/// Every variant except [`Error::Io`] is a precondition violation and is
/// raised before a single byte reaches the writer. Sink failures can occur
/// at any point during emission and are not rolled back.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown api: {0}")]
    UnknownApi(String),
    #[error("unknown version: {0}.{1}")]
    UnknownVersion(u8, u8),
    #[error("unknown profile: {0}")]
    UnknownProfile(String),
    #[error("unknown extension: {0}")]
    UnknownExtension(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DrawError {
    #[error("While drawing VFAT {vfat}: {err}")]
    Overlay { vfat: usize, err: String },

    #[error("While drawing canvas '{canvas}': {err}")]
    Canvas { canvas: String, err: String },

    #[error("Couldn't write {file}: {err}")]
    Png { file: PathBuf, err: String },
}

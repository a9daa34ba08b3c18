// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GainError {
    #[error("The gain curve has {currents} currents but {gains} gains; they must be paired")]
    LengthMismatch { currents: usize, gains: usize },

    #[error("The gain curve needs at least 2 distinct currents to be fit, but it has {0}")]
    Underdetermined(usize),

    #[error("Gain sample {index} is {gain}, but gains must be finite and strictly positive to take their logarithm")]
    NonPositiveGain { index: usize, gain: f64 },

    #[error("Current sample {index} is {current}, but currents must be finite")]
    NonFiniteCurrent { index: usize, current: f64 },

    #[error("{file}:{line}: Couldn't parse '{text}' as a (current, gain) pair")]
    Parse {
        file: PathBuf,
        line: usize,
        text: String,
    },

    #[error("Couldn't read gain curve file {file}: {err}")]
    IO { file: PathBuf, err: std::io::Error },
}

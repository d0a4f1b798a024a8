//! Metric keys recorded by the training pipeline
//!
//! Every case carries the same closed set of 18 error metrics:
//!
//! ```text
//! {train, valid}                      x {rmse, nrmse, l1}   (6)
//! {dens, ptemp, uwnd, wwnd} x valid   x {rmse, nrmse, l1}   (12)
//! ```
//!
//! [`MetricKey::ALL`] fixes the column order used by the dataset records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of metric keys per case.
pub const METRIC_COUNT: usize = 18;

/// One of the 18 tracked error metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    /// Training RMSE
    TrainRmse,
    /// Training NRMSE
    TrainNrmse,
    /// Training L1
    TrainL1,
    /// Validation RMSE
    ValidRmse,
    /// Validation NRMSE
    ValidNrmse,
    /// Validation L1
    ValidL1,
    /// Density validation RMSE
    DensValidRmse,
    /// Density validation NRMSE
    DensValidNrmse,
    /// Density validation L1
    DensValidL1,
    /// Potential temperature validation RMSE
    PtempValidRmse,
    /// Potential temperature validation NRMSE
    PtempValidNrmse,
    /// Potential temperature validation L1
    PtempValidL1,
    /// Zonal wind validation RMSE
    UwndValidRmse,
    /// Zonal wind validation NRMSE
    UwndValidNrmse,
    /// Zonal wind validation L1
    UwndValidL1,
    /// Vertical wind validation RMSE
    WwndValidRmse,
    /// Vertical wind validation NRMSE
    WwndValidNrmse,
    /// Vertical wind validation L1
    WwndValidL1,
}

impl MetricKey {
    /// All keys, in record column order.
    pub const ALL: [Self; METRIC_COUNT] = [
        Self::TrainRmse,
        Self::TrainNrmse,
        Self::TrainL1,
        Self::ValidRmse,
        Self::ValidNrmse,
        Self::ValidL1,
        Self::DensValidRmse,
        Self::DensValidNrmse,
        Self::DensValidL1,
        Self::PtempValidRmse,
        Self::PtempValidNrmse,
        Self::PtempValidL1,
        Self::UwndValidRmse,
        Self::UwndValidNrmse,
        Self::UwndValidL1,
        Self::WwndValidRmse,
        Self::WwndValidNrmse,
        Self::WwndValidL1,
    ];

    /// Column index into per-case metric arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical JSON field name (`valid_rmse`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrainRmse => "train_rmse",
            Self::TrainNrmse => "train_nrmse",
            Self::TrainL1 => "train_l1",
            Self::ValidRmse => "valid_rmse",
            Self::ValidNrmse => "valid_nrmse",
            Self::ValidL1 => "valid_l1",
            Self::DensValidRmse => "dens_valid_rmse",
            Self::DensValidNrmse => "dens_valid_nrmse",
            Self::DensValidL1 => "dens_valid_l1",
            Self::PtempValidRmse => "ptemp_valid_rmse",
            Self::PtempValidNrmse => "ptemp_valid_nrmse",
            Self::PtempValidL1 => "ptemp_valid_l1",
            Self::UwndValidRmse => "uwnd_valid_rmse",
            Self::UwndValidNrmse => "uwnd_valid_nrmse",
            Self::UwndValidL1 => "uwnd_valid_l1",
            Self::WwndValidRmse => "wwnd_valid_rmse",
            Self::WwndValidNrmse => "wwnd_valid_nrmse",
            Self::WwndValidL1 => "wwnd_valid_l1",
        }
    }

    /// Display label (`PTemp Valid NRMSE`).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TrainRmse => "Train RMSE",
            Self::TrainNrmse => "Train NRMSE",
            Self::TrainL1 => "Train L1",
            Self::ValidRmse => "Valid RMSE",
            Self::ValidNrmse => "Valid NRMSE",
            Self::ValidL1 => "Valid L1",
            Self::DensValidRmse => "Dens Valid RMSE",
            Self::DensValidNrmse => "Dens Valid NRMSE",
            Self::DensValidL1 => "Dens Valid L1",
            Self::PtempValidRmse => "PTemp Valid RMSE",
            Self::PtempValidNrmse => "PTemp Valid NRMSE",
            Self::PtempValidL1 => "PTemp Valid L1",
            Self::UwndValidRmse => "UWnd Valid RMSE",
            Self::UwndValidNrmse => "UWnd Valid NRMSE",
            Self::UwndValidL1 => "UWnd Valid L1",
            Self::WwndValidRmse => "WWnd Valid RMSE",
            Self::WwndValidNrmse => "WWnd Valid NRMSE",
            Self::WwndValidL1 => "WWnd Valid L1",
        }
    }

    /// Physical variable group, `None` for the aggregate train/valid metrics.
    #[must_use]
    pub const fn variable(self) -> Option<Variable> {
        match self {
            Self::DensValidRmse | Self::DensValidNrmse | Self::DensValidL1 => Some(Variable::Dens),
            Self::PtempValidRmse | Self::PtempValidNrmse | Self::PtempValidL1 => {
                Some(Variable::Ptemp)
            }
            Self::UwndValidRmse | Self::UwndValidNrmse | Self::UwndValidL1 => Some(Variable::Uwnd),
            Self::WwndValidRmse | Self::WwndValidNrmse | Self::WwndValidL1 => Some(Variable::Wwnd),
            _ => None,
        }
    }

    /// Error measure of this key.
    #[must_use]
    pub const fn measure(self) -> Measure {
        match self.index() % 3 {
            0 => Measure::Rmse,
            1 => Measure::Nrmse,
            _ => Measure::L1,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = Error;

    /// Accepts the canonical name in any case, so chart keys such as
    /// `Train_RMSE` resolve as well.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| Error::InvalidInput(format!("unknown metric key '{s}'")))
    }
}

/// Physical variable group of a per-variable metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    /// Density
    Dens,
    /// Potential temperature
    Ptemp,
    /// Zonal wind
    Uwnd,
    /// Vertical wind
    Wwnd,
}

/// Error measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Root mean squared error
    Rmse,
    /// Normalized RMSE
    Nrmse,
    /// Mean absolute error
    L1,
}

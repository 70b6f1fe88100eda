use crate::error::{Result, SubsidenceError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Groundwater pumping scenarios simulated through 2060, in the order the
/// model runs are produced.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum PumpingScenario {
    /// 500,000 m3/day
    Pump500,
    /// 250,000 m3/day
    Pump250,
    /// 1,000,000 m3/day
    Pump1000,
    /// 500,000 m3/day, lowered to 250,000 m3/day later
    Delayed250,
    /// Pumping stops
    NoPumping,
}

impl PumpingScenario {
    pub const ALL: [PumpingScenario; 5] = [
        PumpingScenario::Pump500,
        PumpingScenario::Pump250,
        PumpingScenario::Pump1000,
        PumpingScenario::Delayed250,
        PumpingScenario::NoPumping,
    ];

    /// Series label in the forecast line chart.
    pub fn label(&self) -> &'static str {
        match self {
            PumpingScenario::Pump500 => "500,000 m³/day",
            PumpingScenario::Pump250 => "250,000 m³/day",
            PumpingScenario::Pump1000 => "1,000,000 m³/day",
            PumpingScenario::Delayed250 => "Delayed 250,000 m³/day",
            PumpingScenario::NoPumping => "No Pumping",
        }
    }

    /// Swatch label in the forecast map legend.
    pub fn short_label(&self) -> &'static str {
        match self {
            PumpingScenario::Pump500 => "500,000",
            PumpingScenario::Pump250 => "250,000",
            PumpingScenario::Pump1000 => "1,000,000",
            PumpingScenario::Delayed250 => "Delayed 250,000",
            PumpingScenario::NoPumping => "No Pumping",
        }
    }

    /// Directory holding this scenario's model exports.
    pub fn slug(&self) -> &'static str {
        match self {
            PumpingScenario::Pump500 => "pump500",
            PumpingScenario::Pump250 => "pump250",
            PumpingScenario::Pump1000 => "pump1000",
            PumpingScenario::Delayed250 => "delayed250",
            PumpingScenario::NoPumping => "nopump",
        }
    }

    /// Line and swatch color.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            // hotpink
            PumpingScenario::Pump500 => (255, 105, 180),
            // tab:orange
            PumpingScenario::Pump250 => (255, 127, 14),
            // tab:red
            PumpingScenario::Pump1000 => (214, 39, 40),
            // tab:green
            PumpingScenario::Delayed250 => (44, 160, 44),
            // tab:purple
            PumpingScenario::NoPumping => (148, 103, 189),
        }
    }
}

impl fmt::Display for PumpingScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_label())
    }
}

/// Model parameter varied in a sensitivity run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum SensitivityParameter {
    /// Inelastic specific storage
    Sskv,
    /// Elastic specific storage
    Sske,
    /// Vertical hydraulic conductivity
    K,
    /// Clay layer thickness
    Thickness,
}

impl SensitivityParameter {
    pub fn title(&self) -> &'static str {
        match self {
            SensitivityParameter::Sskv => "Inelastic Specific Storage\nSensitivity Analysis",
            SensitivityParameter::Sske => "Elastic Specific Storage\nSensitivity Analysis",
            SensitivityParameter::K => "Vertical Hydraulic Conductivity\nSensitivity Analysis",
            SensitivityParameter::Thickness => "Thickness Sensitivity Analysis",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            SensitivityParameter::Sskv => "Sskv",
            SensitivityParameter::Sske => "Sske",
            SensitivityParameter::K => "K",
            SensitivityParameter::Thickness => "thick",
        }
    }
}

impl FromStr for SensitivityParameter {
    type Err = SubsidenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Sskv" => Ok(SensitivityParameter::Sskv),
            "Sske" => Ok(SensitivityParameter::Sske),
            "K" => Ok(SensitivityParameter::K),
            "thick" | "thickness" => Ok(SensitivityParameter::Thickness),
            other => Err(SubsidenceError::UnknownName {
                kind: "sensitivity parameter",
                name: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_scenario_order_and_slugs_are_unique() {
        let slugs: HashSet<&str> = PumpingScenario::ALL.iter().map(|s| s.slug()).collect();
        assert_eq!(slugs.len(), PumpingScenario::ALL.len());
        assert_eq!(PumpingScenario::ALL[2], PumpingScenario::Pump1000);
        assert_eq!(PumpingScenario::ALL[4].to_string(), "No Pumping");
    }

    #[test]
    fn test_sensitivity_parameter_from_str() {
        assert_eq!(
            "thick".parse::<SensitivityParameter>().unwrap(),
            SensitivityParameter::Thickness
        );
        assert_eq!("Sske".parse::<SensitivityParameter>().unwrap().slug(), "Sske");
        assert!("porosity".parse::<SensitivityParameter>().is_err());
    }
}

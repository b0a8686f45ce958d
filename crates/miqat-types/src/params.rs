use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::MiqatError;
use crate::time::TimeName;

/// The kind of adjustment applied to a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentType {
    /// Sun angle below the horizon.
    Degree,
    /// Fixed clock offset from a reference time.
    Minute,
    /// Delegates to a named juristic rule.
    Method,
    /// Raw Asr shadow factor.
    Factor,
}

/// Juristic rule used for the Asr shadow factor and the Midnight rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdjustmentMethod {
    #[default]
    Standard,
    Hanafi,
    Jafari,
}

impl AdjustmentMethod {
    /// Asr shadow length multiplier.
    pub fn asr_factor(&self) -> f64 {
        match self {
            AdjustmentMethod::Hanafi => 2.0,
            AdjustmentMethod::Standard | AdjustmentMethod::Jafari => 1.0,
        }
    }
}

impl fmt::Display for AdjustmentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdjustmentMethod::Standard => "Standard",
            AdjustmentMethod::Hanafi => "Hanafi",
            AdjustmentMethod::Jafari => "Jafari",
        };
        f.write_str(s)
    }
}

impl FromStr for AdjustmentMethod {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Standard" | "Shafi" => Ok(AdjustmentMethod::Standard),
            "Hanafi" => Ok(AdjustmentMethod::Hanafi),
            "Jafari" => Ok(AdjustmentMethod::Jafari),
            other => Err(MiqatError::invalid_config(format!("Unknown juristic method: {}", other))),
        }
    }
}

/// High-latitude correction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElevationMethod {
    /// No correction.
    None,
    /// Middle of the night.
    #[default]
    NightMiddle,
    /// 1/7th of the night.
    OneSeventh,
    /// angle/60th of the night.
    AngleBased,
}

impl FromStr for ElevationMethod {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(ElevationMethod::None),
            "NightMiddle" => Ok(ElevationMethod::NightMiddle),
            "OneSeventh" => Ok(ElevationMethod::OneSeventh),
            "AngleBased" => Ok(ElevationMethod::AngleBased),
            other => Err(MiqatError::invalid_config(format!(
                "Unknown elevation method: {}",
                other
            ))),
        }
    }
}

/// Adjustment payload. The variant is the adjustment type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Adjustment {
    Degree(f64),
    Minute(f64),
    Method(AdjustmentMethod),
    Factor(f64),
}

impl Adjustment {
    pub fn kind(&self) -> AdjustmentType {
        match self {
            Adjustment::Degree(_) => AdjustmentType::Degree,
            Adjustment::Minute(_) => AdjustmentType::Minute,
            Adjustment::Method(_) => AdjustmentType::Method,
            Adjustment::Factor(_) => AdjustmentType::Factor,
        }
    }

    /// Numeric payload; `0.0` for `Method`.
    pub fn value(&self) -> f64 {
        match self {
            Adjustment::Degree(v) | Adjustment::Minute(v) | Adjustment::Factor(v) => *v,
            Adjustment::Method(_) => 0.0,
        }
    }

    pub fn method(&self) -> Option<AdjustmentMethod> {
        match self {
            Adjustment::Method(m) => Some(*m),
            _ => None,
        }
    }
}

/// An adjustment bound to a specific time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentParam {
    pub time: TimeName,
    pub adjustment: Adjustment,
}

impl AdjustmentParam {
    pub fn new(time: TimeName, adjustment: Adjustment) -> Self {
        Self { time, adjustment }
    }

    pub fn degree(time: TimeName, degrees: f64) -> Self {
        Self::new(time, Adjustment::Degree(degrees))
    }

    pub fn minute(time: TimeName, minutes: f64) -> Self {
        Self::new(time, Adjustment::Minute(minutes))
    }

    pub fn method(time: TimeName, method: AdjustmentMethod) -> Self {
        Self::new(time, Adjustment::Method(method))
    }

    pub fn factor(time: TimeName, factor: f64) -> Self {
        Self::new(time, Adjustment::Factor(factor))
    }

    pub fn kind(&self) -> AdjustmentType {
        self.adjustment.kind()
    }
}

/// A named calculation convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerMethod {
    pub name: String,
    pub params: SmallVec<[AdjustmentParam; 4]>,
    /// Overrides the active high-latitude strategy when set.
    pub elevation: Option<ElevationMethod>,
}

impl PrayerMethod {
    /// Creates a method. Later params replace earlier ones for the same time.
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = AdjustmentParam>) -> Self {
        let mut method = Self {
            name: name.into(),
            params: SmallVec::new(),
            elevation: None,
        };
        for param in params {
            method.set(param);
        }
        method
    }

    pub fn elevation(mut self, elevation: ElevationMethod) -> Self {
        self.elevation = Some(elevation);
        self
    }

    /// Backfills every time in `defaults` that this method leaves unset.
    pub fn with_defaults(mut self, defaults: &[AdjustmentParam]) -> Self {
        for item in defaults {
            if self.get(item.time).is_none() {
                self.params.push(*item);
            }
        }
        self
    }

    pub fn get(&self, time: TimeName) -> Option<&AdjustmentParam> {
        self.params.iter().find(|p| p.time == time)
    }

    fn set(&mut self, param: AdjustmentParam) {
        match self.params.iter_mut().find(|p| p.time == param.time) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
    }
}

//! Physical units and quantities reported by a health store.

use core::fmt;

/// The physical dimension a [`Unit`] measures.
///
/// Two units convert into each other only if they share a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Count,
    Length,
    Energy,
    Time,
    Mass,
    Ratio,
    Frequency,
    Pressure,
    Temperature,
    Concentration,
    Volume,
    FlowRate,
}

/// A physical unit used by the metric catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Unit {
    Count,
    Meter,
    Kilometer,
    Kilocalorie,
    Kilojoule,
    Minute,
    Hour,
    Second,
    Millisecond,
    Kilogram,
    Gram,
    Percent,
    CountPerMinute,
    MillimeterOfMercury,
    DegreeCelsius,
    GramPerDeciliter,
    MilligramPerDeciliter,
    Liter,
    Milliliter,
    LiterPerMinute,
}

impl Unit {
    /// The dimension this unit measures.
    pub const fn dimension(self) -> Dimension {
        match self {
            Unit::Count => Dimension::Count,
            Unit::Meter | Unit::Kilometer => Dimension::Length,
            Unit::Kilocalorie | Unit::Kilojoule => Dimension::Energy,
            Unit::Minute | Unit::Hour | Unit::Second | Unit::Millisecond => Dimension::Time,
            Unit::Kilogram | Unit::Gram => Dimension::Mass,
            Unit::Percent => Dimension::Ratio,
            Unit::CountPerMinute => Dimension::Frequency,
            Unit::MillimeterOfMercury => Dimension::Pressure,
            Unit::DegreeCelsius => Dimension::Temperature,
            Unit::GramPerDeciliter | Unit::MilligramPerDeciliter => Dimension::Concentration,
            Unit::Liter | Unit::Milliliter => Dimension::Volume,
            Unit::LiterPerMinute => Dimension::FlowRate,
        }
    }

    /// Multiplier from this unit to the base unit of its dimension.
    const fn base_factor(self) -> f64 {
        match self {
            Unit::Kilometer => 1000.0,
            Unit::Kilojoule => 1.0 / 4.184,
            Unit::Hour => 60.0,
            Unit::Second => 1.0 / 60.0,
            Unit::Millisecond => 1.0 / 60_000.0,
            Unit::Gram => 0.001,
            Unit::MilligramPerDeciliter => 0.001,
            Unit::Milliliter => 0.001,
            _ => 1.0,
        }
    }

    /// Whether a value in this unit can be expressed in `other`.
    pub fn is_compatible_with(self, other: Unit) -> bool {
        self.dimension() == other.dimension()
    }

    /// Short symbol used in reports.
    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Count => "count",
            Unit::Meter => "m",
            Unit::Kilometer => "km",
            Unit::Kilocalorie => "kcal",
            Unit::Kilojoule => "kJ",
            Unit::Minute => "min",
            Unit::Hour => "hr",
            Unit::Second => "s",
            Unit::Millisecond => "ms",
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Percent => "%",
            Unit::CountPerMinute => "count/min",
            Unit::MillimeterOfMercury => "mmHg",
            Unit::DegreeCelsius => "degC",
            Unit::GramPerDeciliter => "g/dL",
            Unit::MilligramPerDeciliter => "mg/dL",
            Unit::Liter => "L",
            Unit::Milliliter => "mL",
            Unit::LiterPerMinute => "L/min",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A value with its native unit, as returned by a statistics query.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Express this quantity in `unit`.
    ///
    /// Returns `None` when the units measure different dimensions.
    pub fn value_in(&self, unit: Unit) -> Option<f64> {
        if !self.unit.is_compatible_with(unit) {
            return None;
        }
        if self.unit == unit {
            return Some(self.value);
        }
        Some(self.value * self.unit.base_factor() / unit.base_factor())
    }
}

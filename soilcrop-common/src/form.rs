//! Form field state
//!
//! The ten user-editable fields of the recommendation form, held as raw
//! strings until a submission coerces them. One value is passed explicitly
//! to the request builder; nothing here is shared or persisted.

use crate::vocabulary::SoilTypeVocabulary;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one form field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    SoilType,
    SoilDepth,
    Ph,
    BulkDensity,
    ElectricalConductivity,
    OrganicCarbon,
    MoistureRetention,
    WaterCapacity,
    InfiltrationRate,
    ClayPercentage,
}

impl FormField {
    /// All fields in form order
    pub const ALL: [FormField; 10] = [
        FormField::SoilType,
        FormField::SoilDepth,
        FormField::Ph,
        FormField::BulkDensity,
        FormField::ElectricalConductivity,
        FormField::OrganicCarbon,
        FormField::MoistureRetention,
        FormField::WaterCapacity,
        FormField::InfiltrationRate,
        FormField::ClayPercentage,
    ];

    /// The nine fields coerced to numbers
    pub const NUMERIC: [FormField; 9] = [
        FormField::SoilDepth,
        FormField::Ph,
        FormField::BulkDensity,
        FormField::ElectricalConductivity,
        FormField::OrganicCarbon,
        FormField::MoistureRetention,
        FormField::WaterCapacity,
        FormField::InfiltrationRate,
        FormField::ClayPercentage,
    ];

    /// Snake-case key used in the form API
    pub fn key(&self) -> &'static str {
        match self {
            FormField::SoilType => "soil_type",
            FormField::SoilDepth => "soil_depth",
            FormField::Ph => "ph",
            FormField::BulkDensity => "bulk_density",
            FormField::ElectricalConductivity => "electrical_conductivity",
            FormField::OrganicCarbon => "organic_carbon",
            FormField::MoistureRetention => "moisture_retention",
            FormField::WaterCapacity => "water_capacity",
            FormField::InfiltrationRate => "infiltration_rate",
            FormField::ClayPercentage => "clay_percentage",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Current, unvalidated values of the form
///
/// `None` means unset. An empty or whitespace-only string counts as unset
/// too; [`FormFieldState::set`] normalizes it to `None`, and values that
/// arrive through deserialization are checked the same way at validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFieldState {
    pub soil_type: Option<String>,
    pub soil_depth: Option<String>,
    pub ph: Option<String>,
    pub bulk_density: Option<String>,
    pub electrical_conductivity: Option<String>,
    pub organic_carbon: Option<String>,
    pub moisture_retention: Option<String>,
    pub water_capacity: Option<String>,
    pub infiltration_rate: Option<String>,
    pub clay_percentage: Option<String>,
}

impl FormFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, field: FormField) -> &Option<String> {
        match field {
            FormField::SoilType => &self.soil_type,
            FormField::SoilDepth => &self.soil_depth,
            FormField::Ph => &self.ph,
            FormField::BulkDensity => &self.bulk_density,
            FormField::ElectricalConductivity => &self.electrical_conductivity,
            FormField::OrganicCarbon => &self.organic_carbon,
            FormField::MoistureRetention => &self.moisture_retention,
            FormField::WaterCapacity => &self.water_capacity,
            FormField::InfiltrationRate => &self.infiltration_rate,
            FormField::ClayPercentage => &self.clay_percentage,
        }
    }

    fn slot_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::SoilType => &mut self.soil_type,
            FormField::SoilDepth => &mut self.soil_depth,
            FormField::Ph => &mut self.ph,
            FormField::BulkDensity => &mut self.bulk_density,
            FormField::ElectricalConductivity => &mut self.electrical_conductivity,
            FormField::OrganicCarbon => &mut self.organic_carbon,
            FormField::MoistureRetention => &mut self.moisture_retention,
            FormField::WaterCapacity => &mut self.water_capacity,
            FormField::InfiltrationRate => &mut self.infiltration_rate,
            FormField::ClayPercentage => &mut self.clay_percentage,
        }
    }

    /// Raw value of a field if it is set (non-blank)
    pub fn get(&self, field: FormField) -> Option<&str> {
        self.slot(field)
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    pub fn is_set(&self, field: FormField) -> bool {
        self.get(field).is_some()
    }

    /// Store a raw value; blank input unsets the field
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
    }

    pub fn unset(&mut self, field: FormField) {
        *self.slot_mut(field) = None;
    }

    /// Unset every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Select a soil type offered by the vocabulary
    ///
    /// A label the vocabulary does not contain leaves the field unset.
    /// Returns whether the selection was accepted.
    pub fn select_soil_type(&mut self, label: &str, vocabulary: &SoilTypeVocabulary) -> bool {
        if vocabulary.contains(label) {
            self.soil_type = Some(label.to_string());
            true
        } else {
            self.soil_type = None;
            false
        }
    }

    /// Unset the soil type unless the vocabulary offers it
    ///
    /// Used when a form arrives from outside (the browser, the CLI) and was
    /// not filled through [`FormFieldState::select_soil_type`].
    pub fn constrain_soil_type(&mut self, vocabulary: &SoilTypeVocabulary) {
        if let Some(label) = self.soil_type.take() {
            self.select_soil_type(&label, vocabulary);
        }
    }

    /// Fields that are currently unset, in form order
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|field| !self.is_set(*field))
            .collect()
    }
}

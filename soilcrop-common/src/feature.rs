//! Feature record sent to the scoring service
//!
//! Attribute names are part of the scorer's wire contract and must match
//! byte for byte, including the embedded units and the double space in
//! `Soil moisture retention  (%)`.

use crate::form::{FormField, FormFieldState};
use crate::outcome::PredictionError;
use serde::Serialize;

/// Strictly typed scorer payload
///
/// Fields are private: the only way to obtain a record is coercing a
/// complete [`FormFieldState`], so every numeric value is finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    #[serde(rename = "Soil Type")]
    soil_type: String,
    #[serde(rename = "Soil depth(cm)")]
    soil_depth: f64,
    #[serde(rename = "pH")]
    ph: f64,
    #[serde(rename = "Bulk density Gm/cc")]
    bulk_density: f64,
    #[serde(rename = "Ec (dsm-1)")]
    electrical_conductivity: f64,
    #[serde(rename = "Organic carbon (%)")]
    organic_carbon: f64,
    #[serde(rename = "Soil moisture retention  (%)")]
    moisture_retention: f64,
    #[serde(rename = "Available water capacity(m/m)")]
    water_capacity: f64,
    #[serde(rename = "Infiltration rate cm/hr")]
    infiltration_rate: f64,
    #[serde(rename = "Clay %")]
    clay_percentage: f64,
}

/// Wire attribute name for a form field
pub fn wire_name(field: FormField) -> &'static str {
    match field {
        FormField::SoilType => "Soil Type",
        FormField::SoilDepth => "Soil depth(cm)",
        FormField::Ph => "pH",
        FormField::BulkDensity => "Bulk density Gm/cc",
        FormField::ElectricalConductivity => "Ec (dsm-1)",
        FormField::OrganicCarbon => "Organic carbon (%)",
        FormField::MoistureRetention => "Soil moisture retention  (%)",
        FormField::WaterCapacity => "Available water capacity(m/m)",
        FormField::InfiltrationRate => "Infiltration rate cm/hr",
        FormField::ClayPercentage => "Clay %",
    }
}

/// Parse a raw numeric input; only finite values count
fn coerce_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FeatureRecord {
    /// Check every field is set
    pub fn validate(form: &FormFieldState) -> Result<(), PredictionError> {
        let missing = form.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PredictionError::IncompleteInput { fields: missing })
        }
    }

    /// Coerce a validated form
    ///
    /// A numeric field that does not parse to a finite number is reported
    /// the same way as an unset one.
    pub fn coerce(form: &FormFieldState) -> Result<Self, PredictionError> {
        let mut values = [0.0_f64; 9];
        let mut invalid = Vec::new();

        for (slot, field) in values.iter_mut().zip(FormField::NUMERIC) {
            match form.get(field).and_then(coerce_number) {
                Some(value) => *slot = value,
                None => invalid.push(field),
            }
        }

        let soil_type = form.get(FormField::SoilType);
        if soil_type.is_none() {
            invalid.insert(0, FormField::SoilType);
        }
        let soil_type = match soil_type {
            Some(label) if invalid.is_empty() => label.to_string(),
            _ => return Err(PredictionError::IncompleteInput { fields: invalid }),
        };

        let [
            soil_depth,
            ph,
            bulk_density,
            electrical_conductivity,
            organic_carbon,
            moisture_retention,
            water_capacity,
            infiltration_rate,
            clay_percentage,
        ] = values;

        Ok(Self {
            soil_type,
            soil_depth,
            ph,
            bulk_density,
            electrical_conductivity,
            organic_carbon,
            moisture_retention,
            water_capacity,
            infiltration_rate,
            clay_percentage,
        })
    }

    pub fn soil_type(&self) -> &str {
        &self.soil_type
    }

    /// Numeric value for a field; `None` for the soil type
    pub fn value(&self, field: FormField) -> Option<f64> {
        match field {
            FormField::SoilType => None,
            FormField::SoilDepth => Some(self.soil_depth),
            FormField::Ph => Some(self.ph),
            FormField::BulkDensity => Some(self.bulk_density),
            FormField::ElectricalConductivity => Some(self.electrical_conductivity),
            FormField::OrganicCarbon => Some(self.organic_carbon),
            FormField::MoistureRetention => Some(self.moisture_retention),
            FormField::WaterCapacity => Some(self.water_capacity),
            FormField::InfiltrationRate => Some(self.infiltration_rate),
            FormField::ClayPercentage => Some(self.clay_percentage),
        }
    }
}

impl TryFrom<&FormFieldState> for FeatureRecord {
    type Error = PredictionError;

    fn try_from(form: &FormFieldState) -> Result<Self, Self::Error> {
        Self::validate(form)?;
        Self::coerce(form)
    }
}

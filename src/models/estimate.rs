use serde::{Deserialize, Serialize};

use super::lenient;

pub const CURRENCY: &str = "EUR";

/// Structured cost estimate produced from a provider reply.
///
/// Deserialization is permissive everywhere except `totalEstimate`, which must
/// be present: an estimate without a headline number is useless to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub total_estimate: TotalEstimate,
    #[serde(default, deserialize_with = "lenient::object")]
    pub breakdown: Option<CostBreakdown>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub timeline: Option<ScheduleEstimate>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub risks: Vec<Risk>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    pub notes: Option<String>,
}

/// Headline price range. Always satisfies `0 <= min <= average <= max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTotal")]
pub struct TotalEstimate {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub currency: String,
}

#[derive(Deserialize)]
struct RawTotal {
    #[serde(default, deserialize_with = "lenient::number")]
    min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    average: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_text")]
    currency: Option<String>,
}

impl From<RawTotal> for TotalEstimate {
    fn from(raw: RawTotal) -> Self {
        if let Some(currency) = raw.currency.as_deref() {
            if !currency.trim().eq_ignore_ascii_case(CURRENCY) {
                tracing::warn!(currency, "provider quoted a non-EUR currency, relabelling");
            }
        }
        TotalEstimate::new(
            raw.min.unwrap_or(0.0),
            raw.max.unwrap_or(0.0),
            raw.average,
        )
    }
}

impl TotalEstimate {
    /// Builds a range in EUR, repairing whatever ordering the inputs violate.
    /// A missing average becomes the midpoint.
    pub fn new(min: f64, max: f64, average: Option<f64>) -> Self {
        let (mut min, mut max) = (min.max(0.0), max.max(0.0));
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        let average = average
            .map(|a| a.clamp(min, max))
            .unwrap_or((min + max) / 2.0);

        Self {
            min,
            max,
            average,
            currency: CURRENCY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    #[serde(default, deserialize_with = "lenient::object")]
    pub materials: Option<MaterialsCost>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub labor: Option<LaborCost>,
    /// `None` when the provider gave no figure; `Some(0.0)` means no permits are needed.
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub permits: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub contingency: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_amount")]
    pub overhead: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialsCost {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<MaterialLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    #[serde(default, deserialize_with = "lenient::text")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub unit_cost: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub total: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaborCost {
    #[serde(default, deserialize_with = "lenient::amount")]
    pub cost: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub hours: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub hourly_rate: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEstimate {
    #[serde(default, deserialize_with = "days")]
    pub estimated_days: u32,
    #[serde(default, deserialize_with = "lenient::list")]
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phase {
    #[serde(default, deserialize_with = "lenient::text")]
    pub phase: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Risk {
    #[serde(default, deserialize_with = "lenient::text")]
    pub risk: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mitigation: String,
    #[serde(default)]
    pub impact: Impact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "serde_json::Value")]
pub enum Impact {
    Low,
    #[default]
    Medium,
    High,
}

impl From<serde_json::Value> for Impact {
    fn from(value: serde_json::Value) -> Self {
        match value.as_str().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("low") => Impact::Low,
            Some("high") => Impact::High,
            _ => Impact::Medium,
        }
    }
}

fn days<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let days = lenient::number(deserializer)?.unwrap_or(0.0);
    Ok(days.round().clamp(0.0, u32::MAX as f64) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_total_estimate_repairs_ordering() {
        let t = TotalEstimate::new(9000.0, 4000.0, Some(12000.0));
        assert_eq!((t.min, t.max, t.average), (4000.0, 9000.0, 9000.0));
        assert_eq!(t.currency, "EUR");

        let t = TotalEstimate::new(-50.0, 1000.0, None);
        assert_eq!((t.min, t.max, t.average), (0.0, 1000.0, 500.0));
    }

    #[test]
    fn test_total_estimate_from_wire() {
        let t: TotalEstimate = serde_json::from_value(json!({
            "min": "12,000", "max": 18000, "currency": "USD"
        }))
        .unwrap();
        assert_eq!(t.min, 12000.0);
        assert_eq!(t.average, 15000.0);
        assert_eq!(t.currency, "EUR");
    }

    #[test]
    fn test_missing_total_estimate_is_an_error() {
        let result: Result<EstimateResult, _> =
            serde_json::from_value(json!({ "recommendations": ["Get three quotes"] }));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_permits_differs_from_absent() {
        let b: CostBreakdown =
            serde_json::from_value(json!({ "permits": 0, "overhead": null })).unwrap();
        assert_eq!(b.permits, Some(0.0));
        assert_eq!(b.contingency, None);
        assert_eq!(b.overhead, None);
    }

    #[test]
    fn test_breakdown_defaults_inside_present_objects() {
        let b: CostBreakdown = serde_json::from_value(json!({
            "materials": { "items": [{ "item": "Tiles", "quantity": 40, "unitCost": "25" }] },
            "labor": { "hours": 32 },
            "contingency": 1500
        }))
        .unwrap();
        let materials = b.materials.as_ref().unwrap();
        assert_eq!(materials.cost, 0.0);
        assert_eq!(materials.items[0].quantity, "40");
        assert_eq!(materials.items[0].unit_cost, 25.0);
        assert_eq!(materials.items[0].total, 0.0);
        assert_eq!(b.labor.as_ref().unwrap().hourly_rate, 0.0);
        assert_eq!(b.contingency, Some(1500.0));
        assert_eq!(b.permits, None);
    }

    #[test]
    fn test_impact_parsing() {
        let risks: Vec<Risk> = serde_json::from_value(json!([
            { "risk": "Hidden water damage", "mitigation": "Inspect subfloor", "impact": "HIGH" },
            { "risk": "Delivery delays", "impact": "severe" },
            { "risk": "Weather" }
        ]))
        .unwrap();
        assert_eq!(risks[0].impact, Impact::High);
        assert_eq!(risks[1].impact, Impact::Medium);
        assert_eq!(risks[2].impact, Impact::Medium);
        assert_eq!(serde_json::to_value(Impact::Low).unwrap(), json!("low"));
    }

    #[test]
    fn test_estimated_days_rounding() {
        let s: ScheduleEstimate =
            serde_json::from_value(json!({ "estimatedDays": "14.6", "phases": "tbd" })).unwrap();
        assert_eq!(s.estimated_days, 15);
        assert!(s.phases.is_empty());

        let s: ScheduleEstimate = serde_json::from_value(json!({ "estimatedDays": -3 })).unwrap();
        assert_eq!(s.estimated_days, 0);
    }
}

use serde::{Deserialize, Serialize};

use super::lenient;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecommendations {
    #[serde(default, deserialize_with = "lenient::list")]
    pub recommended: Vec<MaterialOption>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub budget_options: Vec<MaterialOption>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub premium_options: Vec<MaterialOption>,
}

impl MaterialRecommendations {
    pub fn is_empty(&self) -> bool {
        self.recommended.is_empty() && self.budget_options.is_empty() && self.premium_options.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialOption {
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub material: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub brand: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub price_range: String,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub pros: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub cons: Vec<String>,
}

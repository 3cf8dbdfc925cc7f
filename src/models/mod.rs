pub mod analysis;
pub mod estimate;
pub mod intake;
pub mod lenient;
pub mod materials;
pub mod photo;

pub use analysis::{ImageAnalysis, ImageAnalysisRequest};
pub use estimate::{
    CostBreakdown, EstimateResult, Impact, LaborCost, MaterialLine, MaterialsCost, Phase, Risk,
    ScheduleEstimate, TotalEstimate,
};
pub use intake::{ProjectIntake, Timeline, PROJECT_TYPES};
pub use materials::{MaterialOption, MaterialRecommendations};
pub use photo::Photo;

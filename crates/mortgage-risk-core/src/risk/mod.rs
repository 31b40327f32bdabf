pub mod interpolation;
pub mod scoring;

pub use interpolation::{InterpolationTable, RiskTables};
pub use scoring::{
    assess_risk, clamp_score, risk_category, score, score_components, RiskAssessment,
    RiskCategory, RiskComponents, RiskInput,
};

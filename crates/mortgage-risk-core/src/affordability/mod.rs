pub mod housing_cost;
pub mod ratios;

pub use housing_cost::{
    analyze_affordability, housing_cost, renovation_reserve, AffordabilityInput,
    AffordabilityOutput, EmergencyFund, HousingCost, IncomeAllocation,
};
pub use ratios::{dti, dti_tier, housing_ratio, housing_tier, ltv, ltv_tier, RatioTier};

pub mod structures;

pub use structures::{
    recommend, recommend_structure, ApprovalTier, LoanCandidate, Preferences, Recommendation,
    RecommendationInput, SelectionRule, StructureClass, TargetApproval,
};

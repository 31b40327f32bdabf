pub mod life_events;
pub mod scenario;

pub use life_events::build_life_event_scenarios;
pub use scenario::{
    baseline, build_stress_scenarios, evaluate, run_stress_test, BaselineMetrics, ImpactLevel,
    Scenario, ScenarioResult, StressTestInput, StressTestOutput,
};

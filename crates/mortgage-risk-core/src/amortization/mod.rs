pub mod payment;
pub mod schedule;

pub use payment::{
    compare_payment, loan_payment, monthly_payment, total_interest, PaymentComparison,
    MAX_TERM_YEARS,
};
pub use schedule::{
    analyze_amortization, schedule, yearly_summary, AmortizationInput, AmortizationOutput,
    PaymentRecord, YearlySummary,
};

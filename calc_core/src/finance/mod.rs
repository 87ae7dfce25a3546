//! # Finance
//!
//! - [`bond`] - Bond price, accrued interest, duration, convexity, yield to maturity
//! - [`returns`] - CAGR, mean / volatility / Sharpe, maximum drawdown
//! - [`tax`] - Federal income tax, FICA and gross-up
//! - [`inflation`] - Inflation adjustment and real return
//!
//! Rates on these inputs are percentages: `5.0` means 5%.

pub mod bond;
pub mod inflation;
pub mod returns;
pub mod tax;

pub use bond::{BondInput, BondResult, PaymentFrequency, PriceClassification, YieldInput, YieldResult};
pub use inflation::{InflationDirection, InflationInput, InflationResult};
pub use returns::{CagrInput, CagrResult, Deviation, ReturnsInput, ReturnsResult};
pub use tax::{Deduction, FilingStatus, GrossUpInput, GrossUpResult, TaxInput, TaxResult, TaxYear};

pub mod audit;
pub mod metrics;

#[cfg(test)]
mod tests;

pub use audit::audit_conservation;
pub use metrics::TokenMetrics;

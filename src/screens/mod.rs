pub mod calculator;
pub mod confirm_quit;
pub mod explanation;

// Re-exports so screens are reachable as crate::screens::XYZScreen
pub use calculator::CalculatorScreen;
pub use confirm_quit::ConfirmQuitScreen;
pub use explanation::ExplanationScreen;

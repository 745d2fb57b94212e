// Onboarding module - the seven-step profile wizard

pub mod wizard;

#[cfg(test)]
mod tests;

pub use wizard::{Advance, OnboardingWizard, WizardStep};

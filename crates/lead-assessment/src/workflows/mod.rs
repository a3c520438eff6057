pub mod assessment;
pub mod intake;
